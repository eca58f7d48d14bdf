//! The ternary judgment every feature check reduces to.
//!
//! Scores are categorical, not numeric: arithmetic on them is meaningless.
//! The {+1, 0, -1} encoding the downstream classifier expects is applied
//! only at the serialization boundary.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Outcome of a single feature check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TernaryScore {
    /// Legitimate-leaning, encoded as +1
    Legitimate,
    /// Suspicious or neutral, encoded as 0
    Suspicious,
    /// Phishing-leaning, encoded as -1
    Phishing,
}

impl TernaryScore {
    /// Encoding consumed by the downstream model.
    pub fn as_i8(self) -> i8 {
        match self {
            TernaryScore::Legitimate => 1,
            TernaryScore::Suspicious => 0,
            TernaryScore::Phishing => -1,
        }
    }

    /// Decode a model-side value. Returns `None` for anything outside
    /// {-1, 0, 1}.
    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            1 => Some(TernaryScore::Legitimate),
            0 => Some(TernaryScore::Suspicious),
            -1 => Some(TernaryScore::Phishing),
            _ => None,
        }
    }
}

impl fmt::Display for TernaryScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TernaryScore::Legitimate => "legitimate",
            TernaryScore::Suspicious => "suspicious",
            TernaryScore::Phishing => "phishing",
        };
        write!(f, "{}", s)
    }
}

impl Serialize for TernaryScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_i8())
    }
}

impl<'de> Deserialize<'de> for TernaryScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i8::deserialize(deserializer)?;
        TernaryScore::from_i8(value).ok_or_else(|| {
            serde::de::Error::custom(format!("ternary score out of range: {}", value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_round_trip() {
        for score in [
            TernaryScore::Legitimate,
            TernaryScore::Suspicious,
            TernaryScore::Phishing,
        ] {
            assert_eq!(TernaryScore::from_i8(score.as_i8()), Some(score));
        }
        assert_eq!(TernaryScore::from_i8(2), None);
        assert_eq!(TernaryScore::from_i8(-2), None);
    }

    #[test]
    fn test_serde_as_integer() {
        let json = serde_json::to_string(&TernaryScore::Phishing).unwrap();
        assert_eq!(json, "-1");
        let back: TernaryScore = serde_json::from_str("0").unwrap();
        assert_eq!(back, TernaryScore::Suspicious);
        assert!(serde_json::from_str::<TernaryScore>("3").is_err());
    }
}
