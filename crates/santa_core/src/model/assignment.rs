//! Giver → receiver mapping for one period.
//!
//! # Invariants
//! - A committed assignment is a derangement over its own giver set: every
//!   giver appears once as a receiver and nobody receives themselves.
//! - Giver keys are unique after normalization; colliding keys fail to load.

use super::participant::ParticipantId;
use super::{parse_unique_keys, ModelError};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Iter;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// Completed giver → receiver mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, ParticipantId>",
    into = "BTreeMap<ParticipantId, ParticipantId>"
)]
pub struct Assignment(BTreeMap<ParticipantId, ParticipantId>);

/// First structural defect found in an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentDefect {
    SelfAssigned(ParticipantId),
    DuplicateReceiver(ParticipantId),
    ReceiverNotGiver(ParticipantId),
}

impl Display for AssignmentDefect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfAssigned(id) => write!(f, "`{id}` is assigned to themselves"),
            Self::DuplicateReceiver(id) => {
                write!(f, "`{id}` receives from more than one giver")
            }
            Self::ReceiverNotGiver(id) => {
                write!(f, "receiver `{id}` is not a giver in this period")
            }
        }
    }
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `giver → receiver`, returning the previous receiver if any.
    pub fn insert(
        &mut self,
        giver: ParticipantId,
        receiver: ParticipantId,
    ) -> Option<ParticipantId> {
        self.0.insert(giver, receiver)
    }

    pub fn receiver_for(&self, giver: &ParticipantId) -> Option<&ParticipantId> {
        self.0.get(giver)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, ParticipantId, ParticipantId> {
        self.0.iter()
    }

    pub fn givers(&self) -> impl Iterator<Item = &ParticipantId> {
        self.0.keys()
    }

    pub fn receivers(&self) -> impl Iterator<Item = &ParticipantId> {
        self.0.values()
    }

    /// Checks the derangement invariant over this assignment's givers.
    pub fn check_derangement(&self) -> Result<(), AssignmentDefect> {
        let mut seen = BTreeSet::new();
        for (giver, receiver) in &self.0 {
            if giver == receiver {
                return Err(AssignmentDefect::SelfAssigned(giver.clone()));
            }
            if !self.0.contains_key(receiver) {
                return Err(AssignmentDefect::ReceiverNotGiver(receiver.clone()));
            }
            if !seen.insert(receiver) {
                return Err(AssignmentDefect::DuplicateReceiver(receiver.clone()));
            }
        }
        Ok(())
    }
}

impl FromIterator<(ParticipantId, ParticipantId)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, ParticipantId)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl TryFrom<BTreeMap<String, ParticipantId>> for Assignment {
    type Error = ModelError;

    fn try_from(raw: BTreeMap<String, ParticipantId>) -> Result<Self, Self::Error> {
        parse_unique_keys(raw).map(Self)
    }
}

impl From<Assignment> for BTreeMap<ParticipantId, ParticipantId> {
    fn from(value: Assignment) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a Assignment {
    type Item = (&'a ParticipantId, &'a ParticipantId);
    type IntoIter = Iter<'a, ParticipantId, ParticipantId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
