//! Multi-period dry runs.
//!
//! Simulated periods feed a scratch copy of history, so each forecast year
//! avoids the receivers of the years simulated before it. The store is read
//! once and never written.

use super::period_service::PeriodService;
use super::{ServiceError, ServiceResult};
use crate::engine::plan_assignment;
use crate::model::assignment::Assignment;
use crate::model::period::Period;
use crate::store::AssignmentStore;
use log::info;
use rand::Rng;

impl<S: AssignmentStore> PeriodService<S> {
    /// Simulates `count` consecutive periods starting at `start`.
    ///
    /// Fails with the first engine error, or with `PeriodOutOfRange` when the
    /// run would pass the last representable period; periods simulated
    /// before the failure are discarded.
    pub fn forecast<R: Rng + ?Sized>(
        &self,
        start: Period,
        count: usize,
        rng: &mut R,
    ) -> ServiceResult<Vec<(Period, Assignment)>> {
        let document = self.store().load()?;
        let roster = document.roster();
        let config = self.config();
        let mut history = document.history;

        let mut forecast = Vec::with_capacity(count);
        let mut next = Some(start);
        for _ in 0..count {
            let period = next.ok_or(ServiceError::PeriodOutOfRange { start, count })?;
            let assignment = plan_assignment(
                &roster,
                &config.permanent_exclusions,
                &history,
                config.exclusion_window,
                rng,
            )?;
            history.insert(period, assignment.clone());
            forecast.push((period, assignment));
            next = period.next();
        }

        info!(
            "event=forecast module=service status=ok start={} periods={}",
            start,
            forecast.len()
        );
        Ok(forecast)
    }
}
