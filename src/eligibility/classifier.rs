use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::ruleset::RuleSet;

/// Canonical postal area code: exactly four ASCII digits, left-zero-padded.
/// All rule lookups operate on this form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Postcode(String);

impl Postcode {
    /// Parses user- or rule-supplied input into canonical form. Anything
    /// other than one to four digits is rejected rather than coerced.
    pub fn parse(raw: &str) -> Result<Self, PostcodeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.len() > 4
            || !trimmed.bytes().all(|byte| byte.is_ascii_digit())
        {
            return Err(PostcodeError::Unclassifiable {
                value: raw.to_string(),
            });
        }
        Ok(Self(format!("{trimmed:0>4}")))
    }

    pub(crate) fn from_numeric(code: u32) -> Self {
        Self(format!("{code:04}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// State or territory the postal area belongs to, determined by the
    /// leading digit alone. Leading `1` has no mapping in the scheme and
    /// falls back to [`State::Other`].
    pub fn state(&self) -> State {
        match self.0.as_bytes()[0] {
            b'2' => State::Nsw,
            b'3' => State::Vic,
            b'4' => State::Qld,
            b'5' => State::Sa,
            b'6' => State::Wa,
            b'7' => State::Tas,
            b'0' | b'8' | b'9' => State::Nt,
            _ => State::Other,
        }
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Postcode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Postcode::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Raised when input cannot be read as a postal area code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostcodeError {
    Unclassifiable { value: String },
}

impl fmt::Display for PostcodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostcodeError::Unclassifiable { value } => {
                write!(f, "'{value}' is not a 1-4 digit postal area code")
            }
        }
    }
}

impl std::error::Error for PostcodeError {}

/// Australian state or territory relevant to the scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum State {
    #[serde(rename = "NSW")]
    Nsw,
    #[serde(rename = "VIC")]
    Vic,
    #[serde(rename = "QLD")]
    Qld,
    #[serde(rename = "SA")]
    Sa,
    #[serde(rename = "WA")]
    Wa,
    #[serde(rename = "TAS")]
    Tas,
    #[serde(rename = "NT")]
    Nt,
    Other,
}

impl State {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nsw => "NSW",
            Self::Vic => "VIC",
            Self::Qld => "QLD",
            Self::Sa => "SA",
            Self::Wa => "WA",
            Self::Tas => "TAS",
            Self::Nt => "NT",
            Self::Other => "Other",
        }
    }
}

/// Geographic tier memberships for one postal area. Tiers overlap freely;
/// northern postcodes are frequently also remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierMembership {
    pub regional: bool,
    pub remote_or_very_remote: bool,
    pub northern: bool,
}

impl TierMembership {
    pub fn any(&self) -> bool {
        self.regional || self.remote_or_very_remote || self.northern
    }
}

/// Evaluates tier membership against an immutable rule set. Every
/// predicate is a pure function of the rules and the postcode.
pub struct Classifier {
    rules: RuleSet,
}

impl Classifier {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn is_regional(&self, postcode: &Postcode) -> bool {
        self.rules.regional(postcode.state()).contains(postcode)
    }

    /// Tourism postcodes count as remote regardless of their state's
    /// range rules.
    pub fn is_remote_or_very_remote(&self, postcode: &Postcode) -> bool {
        self.rules
            .remote_very_remote(postcode.state())
            .contains(postcode)
            || self.rules.tourism_extra().contains(postcode)
    }

    pub fn is_northern(&self, postcode: &Postcode) -> bool {
        let northern = self.rules.northern();
        (postcode.state() == State::Nt && northern.nt_all)
            || northern.postcodes.contains(postcode)
    }

    pub fn tiers(&self, postcode: &Postcode) -> TierMembership {
        TierMembership {
            regional: self.is_regional(postcode),
            remote_or_very_remote: self.is_remote_or_very_remote(postcode),
            northern: self.is_northern(postcode),
        }
    }
}
