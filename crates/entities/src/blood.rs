//! Blood type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the eight canonical ABO/Rh blood types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    /// A positive.
    #[serde(rename = "A+")]
    APositive,
    /// A negative.
    #[serde(rename = "A-")]
    ANegative,
    /// B positive.
    #[serde(rename = "B+")]
    BPositive,
    /// B negative.
    #[serde(rename = "B-")]
    BNegative,
    /// AB positive, the universal recipient.
    #[serde(rename = "AB+")]
    AbPositive,
    /// AB negative.
    #[serde(rename = "AB-")]
    AbNegative,
    /// O positive.
    #[serde(rename = "O+")]
    OPositive,
    /// O negative, the universal donor.
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    /// All blood types, in the order they are offered in forms.
    pub const ALL: [BloodType; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::AbPositive,
        Self::AbNegative,
        Self::OPositive,
        Self::ONegative,
    ];

    /// Returns the canonical label, e.g. `"AB-"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }

    /// Parses a blood type label, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        let label = s.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|t| t.as_str() == label)
    }

    /// Whether the Rh factor is negative.
    pub fn is_rh_negative(&self) -> bool {
        self.as_str().ends_with('-')
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
