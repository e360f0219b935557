//! Core type definitions for tree records and harvest measurements.
//!
//! Enum spellings match the values stored by earlier releases, so
//! `TreeSize` is kebab-case and `TreeCondition` keeps the upper-case `RIP`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size class of a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TreeSize {
    /// Seedling or freshly planted tree.
    VerySmall,
    /// Young tree.
    Small,
    /// Established tree.
    #[default]
    Medium,
    /// Mature tree.
    Large,
}

impl TreeSize {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::VerySmall => "Very Small",
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }
}

impl fmt::Display for TreeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VerySmall => write!(f, "very-small"),
            Self::Small => write!(f, "small"),
            Self::Medium => write!(f, "medium"),
            Self::Large => write!(f, "large"),
        }
    }
}

impl std::str::FromStr for TreeSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "very-small" => Ok(Self::VerySmall),
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(format!("Invalid tree size: {}", s)),
        }
    }
}

/// Health condition of a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeCondition {
    #[default]
    Good,
    Medium,
    Bad,
    /// The tree is dead.
    #[serde(rename = "RIP")]
    Rip,
}

impl TreeCondition {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Medium => "Medium",
            Self::Bad => "Bad",
            Self::Rip => "RIP",
        }
    }
}

impl fmt::Display for TreeCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Medium => write!(f, "medium"),
            Self::Bad => write!(f, "bad"),
            Self::Rip => write!(f, "RIP"),
        }
    }
}

impl std::str::FromStr for TreeCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(Self::Good),
            "medium" => Ok(Self::Medium),
            "bad" => Ok(Self::Bad),
            "RIP" | "rip" => Ok(Self::Rip),
            _ => Err(format!("Invalid tree condition: {}", s)),
        }
    }
}

/// Fractional part of a harvest measurement, in quarter cartons.
///
/// Serialized as the plain number (`0`, `0.25`, `0.5`, `0.75`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Quarters {
    #[default]
    Zero,
    Quarter,
    Half,
    ThreeQuarters,
}

impl Quarters {
    /// All values in ascending order.
    pub const ALL: [Quarters; 4] = [
        Quarters::Zero,
        Quarters::Quarter,
        Quarters::Half,
        Quarters::ThreeQuarters,
    ];

    /// Numeric value in cartons.
    pub fn value(self) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::Quarter => 0.25,
            Self::Half => 0.5,
            Self::ThreeQuarters => 0.75,
        }
    }
}

impl From<Quarters> for f64 {
    fn from(q: Quarters) -> Self {
        q.value()
    }
}

impl TryFrom<f64> for Quarters {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|q| q.value() == value)
            .ok_or_else(|| format!("Invalid quarters value: {}", value))
    }
}

impl fmt::Display for Quarters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value())
    }
}

impl std::str::FromStr for Quarters {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid quarters value: {}", s))?;
        Self::try_from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_size_serialization() {
        let json = serde_json::to_string(&TreeSize::VerySmall).unwrap();
        assert_eq!(json, r#""very-small""#);

        let size: TreeSize = serde_json::from_str(r#""large""#).unwrap();
        assert_eq!(size, TreeSize::Large);
    }

    #[test]
    fn test_tree_size_from_str() {
        assert_eq!("very-small".parse::<TreeSize>(), Ok(TreeSize::VerySmall));
        assert!("huge".parse::<TreeSize>().is_err());
        assert_eq!(TreeSize::default(), TreeSize::Medium);
    }

    #[test]
    fn test_condition_rip_spelling() {
        let json = serde_json::to_string(&TreeCondition::Rip).unwrap();
        assert_eq!(json, r#""RIP""#);

        let cond: TreeCondition = serde_json::from_str(r#""RIP""#).unwrap();
        assert_eq!(cond, TreeCondition::Rip);

        assert!(serde_json::from_str::<TreeCondition>(r#""rip""#).is_err());
        assert_eq!("rip".parse::<TreeCondition>(), Ok(TreeCondition::Rip));
    }

    #[test]
    fn test_condition_labels() {
        assert_eq!(TreeCondition::Good.label(), "Good");
        assert_eq!(TreeCondition::Rip.label(), "RIP");
        assert_eq!(TreeCondition::Bad.to_string(), "bad");
    }

    #[test]
    fn test_quarters_serialize_as_number() {
        assert_eq!(serde_json::to_string(&Quarters::Quarter).unwrap(), "0.25");
        assert_eq!(serde_json::to_string(&Quarters::Half).unwrap(), "0.5");

        let q: Quarters = serde_json::from_str("0.75").unwrap();
        assert_eq!(q, Quarters::ThreeQuarters);

        // Integer zero as written by older releases
        let q: Quarters = serde_json::from_str("0").unwrap();
        assert_eq!(q, Quarters::Zero);
    }

    #[test]
    fn test_quarters_rejects_other_fractions() {
        assert!(serde_json::from_str::<Quarters>("0.3").is_err());
        assert!(serde_json::from_str::<Quarters>("1").is_err());
        assert!("0.1".parse::<Quarters>().is_err());
    }

    #[test]
    fn test_quarters_from_str() {
        assert_eq!("0.50".parse::<Quarters>(), Ok(Quarters::Half));
        assert_eq!("0".parse::<Quarters>(), Ok(Quarters::Zero));
        assert_eq!(Quarters::Quarter.to_string(), "0.25");
    }
}
