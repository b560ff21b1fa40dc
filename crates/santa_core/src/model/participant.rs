//! Participant identity and profile.
//!
//! # Responsibility
//! - Normalize participant identifiers (trim + lowercase) on every entry path.
//! - Carry display name and opaque auth material without interpreting it.
//!
//! # Invariants
//! - A `ParticipantId` is trimmed, lowercased, non-empty and free of control
//!   characters; spaces, punctuation and non-ASCII letters are kept.
//! - Auth material round-trips through the store untouched.

use super::ModelError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static CONTROL_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Cc}").expect("valid control character regex"));

/// Stable, case-normalized participant key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Parses and normalizes a raw identifier.
    ///
    /// Surrounding whitespace is dropped and letters are lowercased, so
    /// `" Matt "` and `"matt"` name the same participant.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() || CONTROL_CHAR_RE.is_match(&normalized) {
            return Err(ModelError::InvalidParticipantId(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ParticipantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ParticipantId {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ParticipantId> for String {
    fn from(value: ParticipantId) -> Self {
        value.0
    }
}

/// Participant profile as persisted in the store document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Human-readable name shown to the giver.
    pub display: String,
    /// Credential fields owned by the front end (e.g. `password_hash`).
    #[serde(flatten)]
    pub auth: BTreeMap<String, Value>,
}

impl Participant {
    /// Creates a participant with no auth material.
    pub fn new(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            auth: BTreeMap::new(),
        }
    }
}
