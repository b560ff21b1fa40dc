//! Exclusion-constrained assignment engine.
//!
//! # Responsibility
//! - Derive per-giver exclusion sets from permanent rules and rolling history.
//! - Reject empty rosters and rosters where some giver has no admissible
//!   receiver.
//! - Search for a fixed-point-free bijection that honors every exclusion.
//!
//! # Invariants
//! - Every stage is pure; nothing here touches the store.
//! - The only randomness is the single roster shuffle inside `assign`.

pub mod assigner;
pub mod exclusion;
pub mod feasibility;

use crate::model::assignment::Assignment;
use crate::model::participant::ParticipantId;
use crate::model::period::Period;
use rand::Rng;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use assigner::assign;
pub use exclusion::{build_exclusions, ExclusionTable, PermanentExclusions};
pub use feasibility::validate_feasibility;

pub type EngineResult<T> = Result<T, EngineError>;

/// Engine failures. All are expected outcomes, not bugs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Nobody is on the roster, so there is nothing worth committing.
    EmptyRoster,
    /// `giver`'s exclusion set already covers the whole roster.
    InfeasibleConstraints { giver: ParticipantId },
    /// Backtracking exhausted every candidate without finding a bijection.
    NoValidAssignment,
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRoster => write!(f, "roster is empty"),
            Self::InfeasibleConstraints { giver } => {
                write!(f, "`{giver}` has no valid recipients")
            }
            Self::NoValidAssignment => write!(f, "no valid assignment found"),
        }
    }
}

impl Error for EngineError {}

/// Runs build → feasibility → search for one period.
///
/// Feasibility is checked before the search starts, so an over-constrained
/// giver fails fast with `InfeasibleConstraints`.
pub fn plan_assignment<R: Rng + ?Sized>(
    roster: &[ParticipantId],
    permanent: &PermanentExclusions,
    history: &BTreeMap<Period, Assignment>,
    window: usize,
    rng: &mut R,
) -> EngineResult<Assignment> {
    let table = build_exclusions(roster, permanent, history, window);
    validate_feasibility(&table)?;
    assign(&table, rng)
}
