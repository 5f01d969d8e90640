use crate::core::assembly::Assembly;
use crate::core::chemistry::rules;
use crate::core::models::component::BaseLetter;
use crate::core::models::ids::{ChainId, ComponentId};
use crate::core::models::topology::BondClass;
use tracing::{info, instrument, warn};

/// Two complete chains joined through their representative bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainPairing {
    pub first_chain: ChainId,
    pub second_chain: ChainId,
    pub first_base: ComponentId,
    pub second_base: ComponentId,
    pub letters: (BaseLetter, BaseLetter),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingReport {
    /// Hydrogen connections removed before the scan.
    pub cleared: usize,
    /// Complete chains found after clearing.
    pub complete_chains: usize,
    pub pairs: Vec<ChainPairing>,
}

impl PairingReport {
    pub fn count(&self) -> usize {
        self.pairs.len()
    }

    /// Fewer than two complete chains existed, so nothing could pair.
    pub fn is_insufficient(&self) -> bool {
        self.complete_chains < 2
    }
}

/// Rebuilds all base pairings between complete chains from scratch.
///
/// Every hydrogen connection is removed first. Each complete chain is then represented
/// by its first base member, and every unordered pair of chains whose representatives
/// are complementary gets a hydrogen connection between those two bases.
///
/// Pairing connections do not merge chains, so the chain ids in the report stay valid and
/// a rerun finds the same complete chains under every recompute policy.
#[instrument(skip_all, name = "pairing_workflow")]
pub fn validate_pairing(assembly: &mut Assembly) -> PairingReport {
    let hydrogen: Vec<(ComponentId, ComponentId)> = assembly
        .edges()
        .into_iter()
        .filter(|&(_, _, bond)| bond == BondClass::Hydrogen)
        .map(|(a, b, _)| (a, b))
        .collect();
    let cleared = hydrogen
        .into_iter()
        .filter(|&(a, b)| assembly.disconnect(a, b))
        .count();

    let representatives: Vec<(ChainId, Option<(ComponentId, BaseLetter)>)> = assembly
        .chains_iter()
        .filter(|(_, chain)| chain.is_complete())
        .map(|(chain_id, chain)| (chain_id, first_base(assembly, chain.members())))
        .collect();

    let mut report = PairingReport {
        cleared,
        complete_chains: representatives.len(),
        pairs: Vec::new(),
    };
    if report.is_insufficient() {
        info!(
            complete_chains = report.complete_chains,
            "Not enough complete chains to pair."
        );
        return report;
    }

    for (i, (first_chain, first)) in representatives.iter().enumerate() {
        let Some((first_base, first_letter)) = *first else {
            continue;
        };
        for (second_chain, second) in &representatives[i + 1..] {
            let Some((second_base, second_letter)) = *second else {
                continue;
            };
            if !rules::is_valid_pair(first_letter, second_letter) {
                continue;
            }
            match assembly.pair_bases(first_base, second_base) {
                Ok(_) => report.pairs.push(ChainPairing {
                    first_chain: *first_chain,
                    second_chain: *second_chain,
                    first_base,
                    second_base,
                    letters: (first_letter, second_letter),
                }),
                Err(reason) => warn!(%reason, "Complementary bases could not be paired."),
            }
        }
    }

    info!(
        pairs = report.count(),
        cleared = report.cleared,
        "Base pairing validation complete."
    );
    report
}

fn first_base(assembly: &Assembly, members: &[ComponentId]) -> Option<(ComponentId, BaseLetter)> {
    members.iter().find_map(|&id| {
        assembly
            .component(id)
            .and_then(|component| component.moiety.base_letter())
            .map(|letter| (id, letter))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembly::ChainRecompute;
    use crate::core::models::component::{Moiety, SugarVariant};

    const POLICIES: [ChainRecompute; 2] =
        [ChainRecompute::Traverse, ChainRecompute::TrustMembership];

    fn strand(assembly: &mut Assembly, letter: BaseLetter) -> [ComponentId; 3] {
        let p = assembly.add_component(Moiety::Phosphate);
        let s = assembly.add_component(Moiety::Sugar(SugarVariant::Deoxyribose));
        let b = assembly.add_component(Moiety::Base(letter));
        assembly.connect(p, s).unwrap();
        assembly.connect(s, b).unwrap();
        [p, s, b]
    }

    #[test]
    fn complementary_strands_pair_once() {
        let mut assembly = Assembly::new();
        let [_, _, a] = strand(&mut assembly, BaseLetter::A);
        let [_, _, t] = strand(&mut assembly, BaseLetter::T);

        let report = validate_pairing(&mut assembly);
        assert_eq!(report.count(), 1);
        assert_eq!(report.cleared, 0);
        assert!(!report.is_insufficient());
        assert_eq!(assembly.bond_between(a, t), Some(BondClass::Hydrogen));
        let hydrogen = assembly
            .edges()
            .into_iter()
            .filter(|&(_, _, bond)| bond == BondClass::Hydrogen)
            .count();
        assert_eq!(hydrogen, 1);
    }

    #[test]
    fn rerun_clears_and_recreates_the_same_pairing() {
        let mut assembly = Assembly::new();
        let [_, _, c] = strand(&mut assembly, BaseLetter::C);
        let [_, _, g] = strand(&mut assembly, BaseLetter::G);

        validate_pairing(&mut assembly);
        let report = validate_pairing(&mut assembly);
        assert_eq!(report.cleared, 1);
        assert_eq!(report.count(), 1);
        assert_eq!(assembly.bond_between(c, g), Some(BondClass::Hydrogen));
        assert!(assembly.is_consistent());
    }

    #[test]
    fn rerun_finds_both_chains_under_every_policy() {
        for policy in POLICIES {
            let mut assembly = Assembly::with_policy(policy);
            let [_, _, a] = strand(&mut assembly, BaseLetter::A);
            let [_, _, t] = strand(&mut assembly, BaseLetter::T);

            let first = validate_pairing(&mut assembly);
            assert_eq!(assembly.chains_iter().count(), 2, "chains merged under {}", policy);
            let second = validate_pairing(&mut assembly);

            assert_eq!(first.count(), 1, "first run under {}", policy);
            assert_eq!(second.count(), 1, "second run under {}", policy);
            assert_eq!(second.cleared, 1);
            assert!(!second.is_insufficient());
            assert_eq!(assembly.bond_between(a, t), Some(BondClass::Hydrogen));
            assert!(assembly.is_consistent(), "inconsistent under {}", policy);
        }
    }

    #[test]
    fn reported_chains_survive_the_pairing() {
        let mut assembly = Assembly::new();
        let [_, _, g] = strand(&mut assembly, BaseLetter::G);
        let [_, _, c] = strand(&mut assembly, BaseLetter::C);

        let report = validate_pairing(&mut assembly);
        let pair = report.pairs[0];
        assert_eq!((pair.first_base, pair.second_base), (g, c));
        assert_ne!(pair.first_chain, pair.second_chain);
        assert!(assembly.is_chain_complete(pair.first_chain));
        assert!(assembly.is_chain_complete(pair.second_chain));
        assert_eq!(
            assembly.component(c).unwrap().chain_id(),
            Some(pair.second_chain)
        );
    }

    #[test]
    fn non_complementary_strands_do_not_pair() {
        let mut assembly = Assembly::new();
        strand(&mut assembly, BaseLetter::A);
        strand(&mut assembly, BaseLetter::G);
        let report = validate_pairing(&mut assembly);
        assert_eq!(report.count(), 0);
        assert_eq!(report.complete_chains, 2);
    }

    #[test]
    fn single_complete_chain_is_insufficient() {
        let mut assembly = Assembly::new();
        strand(&mut assembly, BaseLetter::A);
        let lone_t = assembly.add_component(Moiety::Base(BaseLetter::T));

        let report = validate_pairing(&mut assembly);
        assert!(report.is_insufficient());
        assert_eq!(report.count(), 0);
        assert!(assembly.component(lone_t).unwrap().links().is_empty());
    }

    #[test]
    fn hand_made_hydrogen_links_are_cleared() {
        let mut assembly = Assembly::new();
        let a = assembly.add_component(Moiety::Base(BaseLetter::A));
        let u = assembly.add_component(Moiety::Base(BaseLetter::U));
        assembly.connect(a, u).unwrap();

        let report = validate_pairing(&mut assembly);
        assert_eq!(report.cleared, 1);
        assert!(report.is_insufficient());
        assert_eq!(assembly.bond_between(a, u), None);
        assert_eq!(assembly.chains_iter().count(), 0);
    }
}
