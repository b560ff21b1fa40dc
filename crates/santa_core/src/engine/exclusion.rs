//! Per-giver exclusion sets.
//!
//! # Responsibility
//! - Hold the static permanent-exclusion table.
//! - Merge self, permanent and rolling-window exclusions per giver.
//!
//! # Invariants
//! - Every roster member excludes themselves.
//! - Exclusion sets only ever contain current roster members, so
//!   `set.len() < roster.len()` means at least one candidate remains.
//! - History is read-only input.
//! - Permanent-table giver keys are unique after normalization.

use crate::model::assignment::Assignment;
use crate::model::participant::ParticipantId;
use crate::model::period::Period;
use crate::model::{parse_unique_keys, ModelError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Static giver → never-receive table (spouses and similar).
///
/// Entries are directional; a spouse pair is normally stored both ways.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, BTreeSet<ParticipantId>>",
    into = "BTreeMap<ParticipantId, BTreeSet<ParticipantId>>"
)]
pub struct PermanentExclusions(BTreeMap<ParticipantId, BTreeSet<ParticipantId>>);

impl TryFrom<BTreeMap<String, BTreeSet<ParticipantId>>> for PermanentExclusions {
    type Error = ModelError;

    fn try_from(raw: BTreeMap<String, BTreeSet<ParticipantId>>) -> Result<Self, Self::Error> {
        parse_unique_keys(raw).map(Self)
    }
}

impl From<PermanentExclusions> for BTreeMap<ParticipantId, BTreeSet<ParticipantId>> {
    fn from(value: PermanentExclusions) -> Self {
        value.0
    }
}

impl PermanentExclusions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forbids `giver → receiver` in one direction.
    pub fn insert(&mut self, giver: ParticipantId, receiver: ParticipantId) {
        self.0.entry(giver).or_default().insert(receiver);
    }

    /// Forbids the pair in both directions.
    pub fn insert_pair(&mut self, a: ParticipantId, b: ParticipantId) {
        self.insert(a.clone(), b.clone());
        self.insert(b, a);
    }

    /// Receivers `giver` may never draw; empty when the giver has no entry.
    pub fn excluded_for<'a>(
        &'a self,
        giver: &ParticipantId,
    ) -> impl Iterator<Item = &'a ParticipantId> + 'a {
        self.0.get(giver).into_iter().flatten()
    }

    /// Lists `(a, b)` where `a` excludes `b` but `b` does not exclude `a`.
    pub fn asymmetric_pairs(&self) -> Vec<(ParticipantId, ParticipantId)> {
        let mut pairs = Vec::new();
        for (giver, banned) in &self.0 {
            for receiver in banned {
                if receiver == giver {
                    continue;
                }
                let mirrored = self
                    .0
                    .get(receiver)
                    .is_some_and(|back| back.contains(giver));
                if !mirrored {
                    pairs.push((giver.clone(), receiver.clone()));
                }
            }
        }
        pairs
    }

    /// Number of givers with at least one entry.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Roster plus the exclusion set of every roster member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionTable {
    roster: Vec<ParticipantId>,
    sets: HashMap<ParticipantId, HashSet<ParticipantId>>,
}

impl ExclusionTable {
    /// Creates a table where everyone only excludes themselves.
    ///
    /// Duplicate ids keep their first position.
    pub fn new(roster: impl IntoIterator<Item = ParticipantId>) -> Self {
        let mut ordered = Vec::new();
        let mut sets = HashMap::new();
        for id in roster {
            if sets.contains_key(&id) {
                continue;
            }
            sets.insert(id.clone(), HashSet::from([id.clone()]));
            ordered.push(id);
        }
        Self {
            roster: ordered,
            sets,
        }
    }

    pub fn roster(&self) -> &[ParticipantId] {
        &self.roster
    }

    /// Adds `receiver` to `giver`'s set.
    ///
    /// Returns `false` when either id is off-roster or the exclusion already
    /// existed.
    pub fn exclude(&mut self, giver: &ParticipantId, receiver: &ParticipantId) -> bool {
        if !self.sets.contains_key(receiver) {
            return false;
        }
        match self.sets.get_mut(giver) {
            Some(set) => set.insert(receiver.clone()),
            None => false,
        }
    }

    /// Forbids every roster member for `giver`.
    pub fn exclude_all(&mut self, giver: &ParticipantId) {
        if let Some(set) = self.sets.get_mut(giver) {
            set.extend(self.roster.iter().cloned());
        }
    }

    pub fn excluded_for(&self, giver: &ParticipantId) -> Option<&HashSet<ParticipantId>> {
        self.sets.get(giver)
    }

    /// Off-roster givers are treated as excluding everyone.
    pub fn is_excluded(&self, giver: &ParticipantId, receiver: &ParticipantId) -> bool {
        self.sets
            .get(giver)
            .map_or(true, |set| set.contains(receiver))
    }

    /// Number of roster members `giver` could still receive.
    pub fn candidate_count(&self, giver: &ParticipantId) -> usize {
        self.sets
            .get(giver)
            .map_or(0, |set| self.roster.len().saturating_sub(set.len()))
    }
}

/// Builds exclusion sets for `roster`.
///
/// Uses the `window` most recent periods of `history` by numeric period
/// order. Givers and receivers that are no longer on the roster are skipped.
pub fn build_exclusions(
    roster: &[ParticipantId],
    permanent: &PermanentExclusions,
    history: &BTreeMap<Period, Assignment>,
    window: usize,
) -> ExclusionTable {
    let mut table = ExclusionTable::new(roster.iter().cloned());

    for giver in roster {
        for banned in permanent.excluded_for(giver) {
            table.exclude(giver, banned);
        }
    }

    let recent: Vec<(&Period, &Assignment)> = history.iter().rev().take(window).collect();
    for (_, assignment) in &recent {
        for (giver, receiver) in assignment.iter() {
            table.exclude(giver, receiver);
        }
    }

    debug!(
        "event=exclusions_built module=engine status=ok roster_size={} window={} periods_used={} newest_period={}",
        table.roster().len(),
        window,
        recent.len(),
        recent
            .first()
            .map_or_else(|| "none".to_string(), |(period, _)| period.to_string())
    );

    table
}
