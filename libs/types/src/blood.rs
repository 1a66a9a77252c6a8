//! ABO/Rh blood types and the donation compatibility relation
//!
//! The relation is directional: `donor.can_donate_to(needed)` answers
//! whether blood of type `donor` may be given to a recipient needing
//! `needed`. It is a fixed table, not derived from antigen arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the 8 canonical ABO/Rh blood types
///
/// Serialized as its canonical label ("O+", "AB-", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "O+")]
    OPos,
    #[serde(rename = "O-")]
    ONeg,
    #[serde(rename = "A+")]
    APos,
    #[serde(rename = "A-")]
    ANeg,
    #[serde(rename = "B+")]
    BPos,
    #[serde(rename = "B-")]
    BNeg,
    #[serde(rename = "AB+")]
    AbPos,
    #[serde(rename = "AB-")]
    AbNeg,
}

/// Label did not name one of the 8 canonical types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown blood type: {0:?}")]
pub struct BloodTypeParseError(pub String);

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APos,
        BloodType::ANeg,
        BloodType::BPos,
        BloodType::BNeg,
        BloodType::OPos,
        BloodType::ONeg,
        BloodType::AbPos,
        BloodType::AbNeg,
    ];

    /// Canonical label
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::OPos => "O+",
            BloodType::ONeg => "O-",
            BloodType::APos => "A+",
            BloodType::ANeg => "A-",
            BloodType::BPos => "B+",
            BloodType::BNeg => "B-",
            BloodType::AbPos => "AB+",
            BloodType::AbNeg => "AB-",
        }
    }

    /// Whether a donor of this type may serve a need of type `needed`.
    pub fn can_donate_to(self, needed: BloodType) -> bool {
        use BloodType::*;

        match (self, needed) {
            (donor, needed) if donor == needed => true,
            (ONeg, _) => true,
            (OPos, APos | BPos | AbPos) => true,
            (ANeg, APos | AbNeg | AbPos) => true,
            (APos, AbPos) => true,
            (BNeg, BPos | AbNeg | AbPos) => true,
            (BPos, AbPos) => true,
            (AbNeg, AbPos) => true,
            (OPos | APos | ANeg | BPos | BNeg | AbPos | AbNeg, _) => false,
        }
    }

    /// Every need type this donor type can serve, in `ALL` order
    pub fn compatible_recipients(self) -> Vec<BloodType> {
        Self::ALL
            .into_iter()
            .filter(|needed| self.can_donate_to(*needed))
            .collect()
    }
}

/// Free-function form of [`BloodType::can_donate_to`].
pub fn is_compatible(donor: BloodType, needed: BloodType) -> bool {
    donor.can_donate_to(needed)
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = BloodTypeParseError;

    /// Exact, case-sensitive match on the canonical label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BloodType::ALL
            .into_iter()
            .find(|bt| bt.as_str() == s)
            .ok_or_else(|| BloodTypeParseError(s.to_string()))
    }
}
