use super::ids::ComponentId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Classification of a connection between two components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondClass {
    Hydrogen, // Base-base pairing
    #[default]
    Strong, // Phosphate-sugar backbone
    Weak,   // Sugar-base glycosidic
}

impl BondClass {
    pub fn description(&self) -> &'static str {
        match self {
            BondClass::Hydrogen => "hydrogen bond",
            BondClass::Strong => "covalent bond",
            BondClass::Weak => "glycosidic bond",
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond class string")]
pub struct ParseBondClassError;

impl FromStr for BondClass {
    type Err = ParseBondClassError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "h" | "hydrogen" | "hydrogen-bond" => Ok(Self::Hydrogen),
            "s" | "strong" | "strong-bond" | "covalent" => Ok(Self::Strong),
            "w" | "weak" | "weak-bond" | "glycosidic" => Ok(Self::Weak),
            _ => Err(ParseBondClassError),
        }
    }
}

impl fmt::Display for BondClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Hydrogen => "Hydrogen",
                Self::Strong => "Strong",
                Self::Weak => "Weak",
            }
        )
    }
}

/// One endpoint's view of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    pub peer: ComponentId, // Component on the other end
    pub bond: BondClass,   // Identical on both mirrored entries
}

impl Link {
    pub fn new(peer: ComponentId, bond: BondClass) -> Self {
        Self { peer, bond }
    }
}
