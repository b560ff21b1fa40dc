//! Whole-store document shape.
//!
//! # Responsibility
//! - Mirror the persisted `{participants, history, assignments}` layout.
//! - Provide the one in-memory mutation used when a period is committed.
//!
//! # Invariants
//! - `record_period` writes `assignments` and `history` together.
//! - Ids in `history`/`assignments` may refer to former participants.
//! - Participant and period keys are unique after normalization.

use super::assignment::{Assignment, AssignmentDefect};
use super::participant::{Participant, ParticipantId};
use super::period::Period;
use super::{parse_unique_keys, ModelError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Persisted participants, rolling history and committed assignments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDocument")]
pub struct SantaDocument {
    pub participants: BTreeMap<ParticipantId, Participant>,
    pub history: BTreeMap<Period, Assignment>,
    pub assignments: BTreeMap<Period, Assignment>,
}

/// Document as read from disk, before key normalization.
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    participants: BTreeMap<String, Participant>,
    #[serde(default)]
    history: BTreeMap<String, Assignment>,
    #[serde(default)]
    assignments: BTreeMap<String, Assignment>,
}

impl TryFrom<RawDocument> for SantaDocument {
    type Error = ModelError;

    fn try_from(raw: RawDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            participants: parse_unique_keys(raw.participants)?,
            history: parse_unique_keys(raw.history)?,
            assignments: parse_unique_keys(raw.assignments)?,
        })
    }
}

/// Structural defect found while validating a loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDefect {
    pub section: &'static str,
    pub period: Period,
    pub defect: AssignmentDefect,
}

impl Display for DocumentDefect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.section, self.period, self.defect)
    }
}

impl Error for DocumentDefect {}

impl SantaDocument {
    /// Current roster in stable key order.
    pub fn roster(&self) -> Vec<ParticipantId> {
        self.participants.keys().cloned().collect()
    }

    pub fn is_assigned(&self, period: Period) -> bool {
        self.assignments.contains_key(&period)
    }

    /// Stores `assignment` as both the committed result and history for `period`.
    pub fn record_period(&mut self, period: Period, assignment: Assignment) {
        self.history.insert(period, assignment.clone());
        self.assignments.insert(period, assignment);
    }

    /// Checks every stored period is a derangement over its own givers.
    pub fn validate(&self) -> Result<(), DocumentDefect> {
        let sections = [
            ("history", &self.history),
            ("assignments", &self.assignments),
        ];
        for (section, periods) in sections {
            for (period, assignment) in periods {
                assignment
                    .check_derangement()
                    .map_err(|defect| DocumentDefect {
                        section,
                        period: *period,
                        defect,
                    })?;
            }
        }
        Ok(())
    }
}
