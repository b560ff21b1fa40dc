//! Domain model for participants, periods and assignments.
//!
//! # Responsibility
//! - Define canonical identifier types shared by engine, store and service.
//! - Keep identifier normalization in one place.
//!
//! # Invariants
//! - Every participant is keyed by a normalized `ParticipantId`.
//! - Periods order numerically, never lexically.
//! - Two stored keys that normalize to the same id are rejected, never merged.

pub mod assignment;
pub mod document;
pub mod participant;
pub mod period;

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Parse/validation errors for model identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidParticipantId(String),
    InvalidPeriod(String),
    DuplicateKey(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParticipantId(value) => {
                write!(f, "participant id is invalid: `{value}`")
            }
            Self::InvalidPeriod(value) => {
                write!(f, "period must be a non-negative integer, got `{value}`")
            }
            Self::DuplicateKey(value) => {
                write!(f, "more than one stored key normalizes to `{value}`")
            }
        }
    }
}

impl Error for ModelError {}

/// Parses the string keys of a stored map, failing when two keys collapse
/// into the same normalized key.
pub(crate) fn parse_unique_keys<K, V>(
    raw: BTreeMap<String, V>,
) -> Result<BTreeMap<K, V>, ModelError>
where
    K: FromStr<Err = ModelError> + Ord + Display,
{
    let mut parsed = BTreeMap::new();
    for (key, value) in raw {
        match parsed.entry(key.parse::<K>()?) {
            Entry::Occupied(entry) => {
                return Err(ModelError::DuplicateKey(entry.key().to_string()));
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }
    Ok(parsed)
}
