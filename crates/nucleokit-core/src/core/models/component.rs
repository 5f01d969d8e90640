use super::ids::{ChainId, ComponentId};
use super::topology::{BondClass, Link};
use nalgebra::Point2;
use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The three building blocks of a nucleotide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Phosphate,
    Sugar,
    Base,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 3] = [
        ComponentKind::Phosphate,
        ComponentKind::Sugar,
        ComponentKind::Base,
    ];
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ComponentKind::Phosphate => "phosphate",
                ComponentKind::Sugar => "sugar",
                ComponentKind::Base => "base",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SugarVariant {
    Deoxyribose, // DNA backbone sugar
    Ribose,      // RNA backbone sugar
}

impl fmt::Display for SugarVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SugarVariant::Deoxyribose => "deoxyribose",
                SugarVariant::Ribose => "ribose",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseLetter {
    A, // Adenine
    T, // Thymine (DNA only)
    U, // Uracil (RNA only)
    C, // Cytosine
    G, // Guanine
}

impl BaseLetter {
    pub const ALL: [BaseLetter; 5] = [
        BaseLetter::A,
        BaseLetter::T,
        BaseLetter::U,
        BaseLetter::C,
        BaseLetter::G,
    ];

    pub fn as_char(self) -> char {
        match self {
            BaseLetter::A => 'A',
            BaseLetter::T => 'T',
            BaseLetter::U => 'U',
            BaseLetter::C => 'C',
            BaseLetter::G => 'G',
        }
    }
}

impl fmt::Display for BaseLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

static BASE_ALIASES: Map<&'static str, BaseLetter> = phf_map! {
    "A" => BaseLetter::A, "ADENINE" => BaseLetter::A,
    "T" => BaseLetter::T, "THYMINE" => BaseLetter::T,
    "U" => BaseLetter::U, "URACIL" => BaseLetter::U,
    "C" => BaseLetter::C, "CYTOSINE" => BaseLetter::C,
    "G" => BaseLetter::G, "GUANINE" => BaseLetter::G,
};

static SUGAR_ALIASES: Map<&'static str, SugarVariant> = phf_map! {
    "deoxyribose" => SugarVariant::Deoxyribose,
    "dna-sugar" => SugarVariant::Deoxyribose,
    "dna" => SugarVariant::Deoxyribose,
    "ribose" => SugarVariant::Ribose,
    "rna-sugar" => SugarVariant::Ribose,
    "rna" => SugarVariant::Ribose,
};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseMoietyError {
    #[error("Unknown component kind '{0}'. Expected 'phosphate', 'sugar:<variant>' or 'base:<letter>'.")]
    UnknownKind(String),
    #[error("Unknown sugar variant '{0}'. Expected 'deoxyribose' or 'ribose'.")]
    UnknownSugar(String),
    #[error("Unknown base '{0}'. Expected one of A, T, U, C, G.")]
    UnknownBase(String),
    #[error("Component kind '{0}' requires a detail after ':'.")]
    MissingDetail(&'static str),
    #[error("Phosphate takes no detail, got '{0}'.")]
    UnexpectedDetail(String),
}

impl FromStr for SugarVariant {
    type Err = ParseMoietyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SUGAR_ALIASES
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| ParseMoietyError::UnknownSugar(s.to_string()))
    }
}

impl FromStr for BaseLetter {
    type Err = ParseMoietyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BASE_ALIASES
            .get(s.trim().to_ascii_uppercase().as_str())
            .copied()
            .ok_or_else(|| ParseMoietyError::UnknownBase(s.to_string()))
    }
}

/// What a component is, with the subtype that only makes sense for its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Moiety {
    Phosphate,
    Sugar(SugarVariant),
    Base(BaseLetter),
}

impl Moiety {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Moiety::Phosphate => ComponentKind::Phosphate,
            Moiety::Sugar(_) => ComponentKind::Sugar,
            Moiety::Base(_) => ComponentKind::Base,
        }
    }

    pub fn sugar_variant(&self) -> Option<SugarVariant> {
        match self {
            Moiety::Sugar(variant) => Some(*variant),
            _ => None,
        }
    }

    pub fn base_letter(&self) -> Option<BaseLetter> {
        match self {
            Moiety::Base(letter) => Some(*letter),
            _ => None,
        }
    }
}

impl fmt::Display for Moiety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Moiety::Phosphate => write!(f, "phosphate"),
            Moiety::Sugar(variant) => write!(f, "sugar:{}", variant),
            Moiety::Base(letter) => write!(f, "base:{}", letter),
        }
    }
}

impl FromStr for Moiety {
    type Err = ParseMoietyError;

    /// Parses `phosphate`, `sugar:<variant>` or `base:<letter>`.
    ///
    /// A bare sugar variant (`ribose`) or base name (`adenine`, `G`) is accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (head, detail) = match trimmed.split_once(':') {
            Some((head, detail)) => (head.trim(), Some(detail.trim())),
            None => (trimmed, None),
        };

        match (head.to_ascii_lowercase().as_str(), detail) {
            ("phosphate" | "p", None) => Ok(Moiety::Phosphate),
            ("phosphate" | "p", Some(detail)) => {
                Err(ParseMoietyError::UnexpectedDetail(detail.to_string()))
            }
            ("sugar", Some(detail)) => detail.parse().map(Moiety::Sugar),
            ("sugar", None) => Err(ParseMoietyError::MissingDetail("sugar")),
            ("base", Some(detail)) => detail.parse().map(Moiety::Base),
            ("base", None) => Err(ParseMoietyError::MissingDetail("base")),
            (_, None) => head
                .parse::<SugarVariant>()
                .map(Moiety::Sugar)
                .or_else(|_| head.parse::<BaseLetter>().map(Moiety::Base))
                .map_err(|_| ParseMoietyError::UnknownKind(s.to_string())),
            (_, Some(_)) => Err(ParseMoietyError::UnknownKind(s.to_string())),
        }
    }
}

/// One nucleotide part placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub moiety: Moiety,
    pub label: String,                       // Display label, e.g. "component-3"
    pub position: Point2<f64>,               // Center of the part in canvas coordinates
    pub(crate) rotation_deg: f64,            // Cumulative rotation, kept in [0, 360)
    pub(crate) chain_id: Option<ChainId>,    // Owning chain, mirrored by Chain::members
    pub(crate) links: Vec<Link>,             // Mirrored on every peer
}

impl Component {
    pub(crate) fn new(moiety: Moiety, label: String, position: Point2<f64>) -> Self {
        Self {
            moiety,
            label,
            position,
            rotation_deg: 0.0,
            chain_id: None,
            links: Vec::new(),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.moiety.kind()
    }

    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }

    pub fn chain_id(&self) -> Option<ChainId> {
        self.chain_id
    }

    pub fn is_chained(&self) -> bool {
        self.chain_id.is_some()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn bond_to(&self, peer: ComponentId) -> Option<BondClass> {
        self.links
            .iter()
            .find(|link| link.peer == peer)
            .map(|link| link.bond)
    }

    pub fn is_linked_to(&self, peer: ComponentId) -> bool {
        self.bond_to(peer).is_some()
    }

    pub(crate) fn push_link(&mut self, peer: ComponentId, bond: BondClass) -> bool {
        if self.is_linked_to(peer) {
            return false;
        }
        self.links.push(Link::new(peer, bond));
        true
    }

    pub(crate) fn drop_link(&mut self, peer: ComponentId) -> bool {
        let before = self.links.len();
        self.links.retain(|link| link.peer != peer);
        self.links.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_component_id(n: u64) -> ComponentId {
        ComponentId::from(KeyData::from_ffi(n))
    }

    fn sample(moiety: Moiety) -> Component {
        Component::new(moiety, "component-0".to_string(), Point2::new(10.0, 20.0))
    }

    #[test]
    fn new_component_has_expected_default_fields() {
        let component = sample(Moiety::Sugar(SugarVariant::Ribose));
        assert_eq!(component.kind(), ComponentKind::Sugar);
        assert_eq!(component.position, Point2::new(10.0, 20.0));
        assert_eq!(component.rotation_deg(), 0.0);
        assert!(component.chain_id().is_none());
        assert!(component.links().is_empty());
    }

    #[test]
    fn push_link_refuses_duplicate_peer() {
        let mut component = sample(Moiety::Phosphate);
        let peer = dummy_component_id(7);
        assert!(component.push_link(peer, BondClass::Strong));
        assert!(!component.push_link(peer, BondClass::Weak));
        assert_eq!(component.links().len(), 1);
        assert_eq!(component.bond_to(peer), Some(BondClass::Strong));
    }

    #[test]
    fn drop_link_reports_whether_anything_was_removed() {
        let mut component = sample(Moiety::Phosphate);
        let peer = dummy_component_id(3);
        component.push_link(peer, BondClass::Strong);
        assert!(component.drop_link(peer));
        assert!(!component.drop_link(peer));
        assert!(!component.is_linked_to(peer));
    }

    #[test]
    fn moiety_accessors_only_expose_matching_detail() {
        let sugar = Moiety::Sugar(SugarVariant::Deoxyribose);
        assert_eq!(sugar.sugar_variant(), Some(SugarVariant::Deoxyribose));
        assert_eq!(sugar.base_letter(), None);

        let base = Moiety::Base(BaseLetter::G);
        assert_eq!(base.base_letter(), Some(BaseLetter::G));
        assert_eq!(base.sugar_variant(), None);
        assert_eq!(Moiety::Phosphate.kind(), ComponentKind::Phosphate);
    }

    #[test]
    fn from_str_parses_qualified_specs() {
        assert_eq!("phosphate".parse::<Moiety>(), Ok(Moiety::Phosphate));
        assert_eq!(
            "sugar:deoxyribose".parse::<Moiety>(),
            Ok(Moiety::Sugar(SugarVariant::Deoxyribose))
        );
        assert_eq!(
            "Sugar:RNA".parse::<Moiety>(),
            Ok(Moiety::Sugar(SugarVariant::Ribose))
        );
        assert_eq!("base:a".parse::<Moiety>(), Ok(Moiety::Base(BaseLetter::A)));
        assert_eq!(
            "base:guanine".parse::<Moiety>(),
            Ok(Moiety::Base(BaseLetter::G))
        );
    }

    #[test]
    fn from_str_accepts_bare_variants_and_bases() {
        assert_eq!(
            "ribose".parse::<Moiety>(),
            Ok(Moiety::Sugar(SugarVariant::Ribose))
        );
        assert_eq!("U".parse::<Moiety>(), Ok(Moiety::Base(BaseLetter::U)));
        assert_eq!(
            " cytosine ".parse::<Moiety>(),
            Ok(Moiety::Base(BaseLetter::C))
        );
    }

    #[test]
    fn from_str_rejects_malformed_specs() {
        assert_eq!(
            "sugar".parse::<Moiety>(),
            Err(ParseMoietyError::MissingDetail("sugar"))
        );
        assert_eq!(
            "base:X".parse::<Moiety>(),
            Err(ParseMoietyError::UnknownBase("X".to_string()))
        );
        assert_eq!(
            "phosphate:extra".parse::<Moiety>(),
            Err(ParseMoietyError::UnexpectedDetail("extra".to_string()))
        );
        assert!(matches!(
            "lipid".parse::<Moiety>(),
            Err(ParseMoietyError::UnknownKind(_))
        ));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for moiety in [
            Moiety::Phosphate,
            Moiety::Sugar(SugarVariant::Ribose),
            Moiety::Base(BaseLetter::T),
        ] {
            assert_eq!(moiety.to_string().parse::<Moiety>(), Ok(moiety));
        }
    }
}
