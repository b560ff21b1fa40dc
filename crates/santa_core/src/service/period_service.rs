//! Yearly assignment orchestration.
//!
//! # Responsibility
//! - Decide whether a period needs an assignment and commit it once.
//! - Answer "who does X give to this period" for front ends.
//!
//! # Invariants
//! - A period is either fully committed (assignments + history in one write)
//!   or absent; engine or store failures never leave partial state.
//! - Re-running `ensure_period_assigned` for a committed period never writes.
//! - Read-decide-write runs under `commit_lock`; separate processes sharing
//!   one store can still race and the last write wins.

use super::{ServiceError, ServiceResult};
use crate::config::SantaConfig;
use crate::engine::{build_exclusions, plan_assignment, ExclusionTable};
use crate::model::assignment::Assignment;
use crate::model::participant::ParticipantId;
use crate::model::period::Period;
use crate::store::AssignmentStore;
use log::{error, info, warn};
use rand::Rng;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Whether a period already has a committed assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodStatus {
    NoAssignmentYet,
    Committed,
}

/// Result of one `ensure_period_assigned` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The period was committed earlier; nothing was written.
    AlreadyAssigned,
    /// A new assignment was computed and persisted.
    Committed(Assignment),
}

/// Recipient lookup result for one giver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub period: Period,
    pub giver: ParticipantId,
    pub receiver: ParticipantId,
    /// Receiver display name, or the receiver id if they left the roster.
    pub display: String,
}

/// Orchestrates exclusion building, search and commit for one store.
pub struct PeriodService<S: AssignmentStore> {
    store: S,
    config: SantaConfig,
    commit_lock: Mutex<()>,
}

impl<S: AssignmentStore> PeriodService<S> {
    /// Creates a service over `store` with an explicit configuration value.
    ///
    /// One-way permanent exclusions are allowed but logged as warnings.
    pub fn new(store: S, config: SantaConfig) -> Self {
        for (giver, receiver) in config.permanent_exclusions.asymmetric_pairs() {
            warn!(
                "event=permanent_exclusions module=service status=warn reason=asymmetric giver={} receiver={}",
                giver, receiver
            );
        }
        Self {
            store,
            config,
            commit_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &SantaConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn status(&self, period: Period) -> ServiceResult<PeriodStatus> {
        let document = self.store.load()?;
        Ok(if document.is_assigned(period) {
            PeriodStatus::Committed
        } else {
            PeriodStatus::NoAssignmentYet
        })
    }

    /// Ensures `period` has an assignment, using thread-local randomness.
    pub fn ensure_period_assigned(&self, period: Period) -> ServiceResult<EnsureOutcome> {
        self.ensure_period_assigned_with_rng(period, &mut rand::thread_rng())
    }

    /// Ensures `period` has an assignment; safe to call redundantly.
    ///
    /// # Errors
    /// - `Engine(EmptyRoster)` when nobody is on the roster.
    /// - `Engine(InfeasibleConstraints)` / `Engine(NoValidAssignment)` when the
    ///   current roster and exclusions admit no assignment.
    /// - `Store` when loading or replacing the document fails.
    pub fn ensure_period_assigned_with_rng<R: Rng + ?Sized>(
        &self,
        period: Period,
        rng: &mut R,
    ) -> ServiceResult<EnsureOutcome> {
        let _guard = self
            .commit_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let started_at = Instant::now();

        let mut document = self.store.load()?;
        if document.is_assigned(period) {
            info!(
                "event=period_ensure module=service status=skip period={} reason=already_assigned",
                period
            );
            return Ok(EnsureOutcome::AlreadyAssigned);
        }

        info!(
            "event=period_ensure module=service status=start period={} roster_size={}",
            period,
            document.participants.len()
        );

        let roster = document.roster();
        let assignment = plan_assignment(
            &roster,
            &self.config.permanent_exclusions,
            &document.history,
            self.config.exclusion_window,
            rng,
        )
        .map_err(|err| {
            error!(
                "event=period_ensure module=service status=error period={} stage=engine error={}",
                period, err
            );
            ServiceError::from(err)
        })?;

        document.record_period(period, assignment.clone());
        self.store.replace(&document)?;

        info!(
            "event=period_ensure module=service status=ok period={} pairs={} duration_ms={}",
            period,
            assignment.len(),
            started_at.elapsed().as_millis()
        );
        Ok(EnsureOutcome::Committed(assignment))
    }

    /// Exclusion sets the next computed period would use.
    pub fn exclusions(&self) -> ServiceResult<ExclusionTable> {
        let document = self.store.load()?;
        Ok(build_exclusions(
            &document.roster(),
            &self.config.permanent_exclusions,
            &document.history,
            self.config.exclusion_window,
        ))
    }

    /// Returns `giver`'s recipient for an already committed `period`.
    pub fn recipient_for(&self, period: Period, giver: &ParticipantId) -> ServiceResult<Recipient> {
        let document = self.store.load()?;
        let assignment = document
            .assignments
            .get(&period)
            .ok_or(ServiceError::PeriodNotAssigned(period))?;
        let receiver = assignment
            .receiver_for(giver)
            .ok_or_else(|| ServiceError::UnknownParticipant(giver.clone()))?;

        let display = match document.participants.get(receiver) {
            Some(participant) => participant.display.clone(),
            None => {
                warn!(
                    "event=recipient_lookup module=service status=warn period={} reason=receiver_not_in_roster",
                    period
                );
                receiver.to_string()
            }
        };

        info!(
            "event=recipient_lookup module=service status=ok period={}",
            period
        );
        Ok(Recipient {
            period,
            giver: giver.clone(),
            receiver: receiver.clone(),
            display,
        })
    }
}
