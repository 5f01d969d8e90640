use crate::core::models::component::{BaseLetter, Moiety, SugarVariant};
use crate::core::models::topology::BondClass;
use thiserror::Error;

/// Why two components may not be connected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    #[error("components are already connected")]
    AlreadyConnected,
    #[error("two components of the same non-base kind cannot bond")]
    SameNonBaseType,
    #[error("a phosphate can only bond to a sugar")]
    PhosphateRequiresSugar,
    #[error("deoxyribose cannot carry uracil and ribose cannot carry thymine")]
    SugarBaseIncompatible,
    #[error("bases do not form a complementary pair")]
    InvalidBasePair,
}

/// Watson-Crick complementarity for DNA and RNA, in either order.
pub fn is_valid_pair(a: BaseLetter, b: BaseLetter) -> bool {
    use BaseLetter::*;
    matches!(
        (a, b),
        (A, T) | (T, A) | (A, U) | (U, A) | (C, G) | (G, C)
    )
}

pub fn is_sugar_base_compatible(sugar: SugarVariant, base: BaseLetter) -> bool {
    !matches!(
        (sugar, base),
        (SugarVariant::Deoxyribose, BaseLetter::U) | (SugarVariant::Ribose, BaseLetter::T)
    )
}

/// Applies the chemistry rules to two parts that are not yet connected.
///
/// The caller is responsible for the duplicate-edge check, which needs graph context.
pub fn evaluate(a: &Moiety, b: &Moiety) -> Result<BondClass, Rejection> {
    match (a, b) {
        (Moiety::Base(x), Moiety::Base(y)) => {
            if is_valid_pair(*x, *y) {
                Ok(BondClass::Hydrogen)
            } else {
                Err(Rejection::InvalidBasePair)
            }
        }
        (Moiety::Phosphate, Moiety::Phosphate) | (Moiety::Sugar(_), Moiety::Sugar(_)) => {
            Err(Rejection::SameNonBaseType)
        }
        (Moiety::Phosphate, Moiety::Sugar(_)) | (Moiety::Sugar(_), Moiety::Phosphate) => {
            Ok(BondClass::Strong)
        }
        (Moiety::Phosphate, Moiety::Base(_)) | (Moiety::Base(_), Moiety::Phosphate) => {
            Err(Rejection::PhosphateRequiresSugar)
        }
        (Moiety::Sugar(sugar), Moiety::Base(base)) | (Moiety::Base(base), Moiety::Sugar(sugar)) => {
            if is_sugar_base_compatible(*sugar, *base) {
                Ok(BondClass::Weak)
            } else {
                Err(Rejection::SugarBaseIncompatible)
            }
        }
    }
}

/// Full validation including the duplicate-edge rule, which always wins.
pub fn validate(a: &Moiety, b: &Moiety, already_connected: bool) -> Result<BondClass, Rejection> {
    if already_connected {
        return Err(Rejection::AlreadyConnected);
    }
    evaluate(a, b)
}

/// Bond class a connection between the two kinds would carry, regardless of validity.
pub fn classify_bond(a: &Moiety, b: &Moiety) -> BondClass {
    match (a, b) {
        (Moiety::Base(_), Moiety::Base(_)) => BondClass::Hydrogen,
        (Moiety::Sugar(_), Moiety::Base(_)) | (Moiety::Base(_), Moiety::Sugar(_)) => {
            BondClass::Weak
        }
        _ => BondClass::Strong,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_moieties() -> Vec<Moiety> {
        let mut all = vec![
            Moiety::Phosphate,
            Moiety::Sugar(SugarVariant::Deoxyribose),
            Moiety::Sugar(SugarVariant::Ribose),
        ];
        all.extend(BaseLetter::ALL.iter().map(|&letter| Moiety::Base(letter)));
        all
    }

    #[test]
    fn base_pair_table_is_exhaustive() {
        use BaseLetter::*;
        let expected = [(A, T), (T, A), (A, U), (U, A), (C, G), (G, C)];
        for &x in &BaseLetter::ALL {
            for &y in &BaseLetter::ALL {
                assert_eq!(
                    is_valid_pair(x, y),
                    expected.contains(&(x, y)),
                    "unexpected result for pair {}{}",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn validation_is_symmetric_for_all_combinations() {
        for a in all_moieties() {
            for b in all_moieties() {
                assert_eq!(evaluate(&a, &b), evaluate(&b, &a), "{} vs {}", a, b);
                assert_eq!(classify_bond(&a, &b), classify_bond(&b, &a));
            }
        }
    }

    #[test]
    fn duplicate_rule_takes_precedence() {
        let result = validate(
            &Moiety::Phosphate,
            &Moiety::Sugar(SugarVariant::Ribose),
            true,
        );
        assert_eq!(result, Err(Rejection::AlreadyConnected));
    }

    #[test]
    fn same_non_base_kinds_are_rejected() {
        assert_eq!(
            evaluate(&Moiety::Phosphate, &Moiety::Phosphate),
            Err(Rejection::SameNonBaseType)
        );
        assert_eq!(
            evaluate(
                &Moiety::Sugar(SugarVariant::Ribose),
                &Moiety::Sugar(SugarVariant::Deoxyribose)
            ),
            Err(Rejection::SameNonBaseType)
        );
    }

    #[test]
    fn phosphate_bonds_only_to_sugar() {
        assert_eq!(
            evaluate(&Moiety::Phosphate, &Moiety::Sugar(SugarVariant::Deoxyribose)),
            Ok(BondClass::Strong)
        );
        assert_eq!(
            evaluate(&Moiety::Base(BaseLetter::A), &Moiety::Phosphate),
            Err(Rejection::PhosphateRequiresSugar)
        );
    }

    #[test]
    fn sugar_base_compatibility_follows_dna_rna_rules() {
        let dna = Moiety::Sugar(SugarVariant::Deoxyribose);
        let rna = Moiety::Sugar(SugarVariant::Ribose);
        assert_eq!(
            evaluate(&dna, &Moiety::Base(BaseLetter::U)),
            Err(Rejection::SugarBaseIncompatible)
        );
        assert_eq!(
            evaluate(&Moiety::Base(BaseLetter::T), &rna),
            Err(Rejection::SugarBaseIncompatible)
        );
        assert_eq!(
            evaluate(&dna, &Moiety::Base(BaseLetter::T)),
            Ok(BondClass::Weak)
        );
        assert_eq!(
            evaluate(&rna, &Moiety::Base(BaseLetter::U)),
            Ok(BondClass::Weak)
        );
        for letter in [BaseLetter::A, BaseLetter::C, BaseLetter::G] {
            assert_eq!(evaluate(&dna, &Moiety::Base(letter)), Ok(BondClass::Weak));
            assert_eq!(evaluate(&rna, &Moiety::Base(letter)), Ok(BondClass::Weak));
        }
    }

    #[test]
    fn complementary_bases_form_hydrogen_bonds() {
        assert_eq!(
            evaluate(&Moiety::Base(BaseLetter::G), &Moiety::Base(BaseLetter::C)),
            Ok(BondClass::Hydrogen)
        );
        assert_eq!(
            evaluate(&Moiety::Base(BaseLetter::G), &Moiety::Base(BaseLetter::G)),
            Err(Rejection::InvalidBasePair)
        );
    }

    #[test]
    fn accepted_bonds_agree_with_classification() {
        for a in all_moieties() {
            for b in all_moieties() {
                if let Ok(bond) = evaluate(&a, &b) {
                    assert_eq!(bond, classify_bond(&a, &b));
                }
            }
        }
    }

    #[test]
    fn classify_bond_defaults_to_strong_for_unbondable_kinds() {
        assert_eq!(
            classify_bond(&Moiety::Phosphate, &Moiety::Base(BaseLetter::A)),
            BondClass::Strong
        );
    }
}
