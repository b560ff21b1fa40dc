//! Pre-search feasibility check.

use super::exclusion::ExclusionTable;
use super::{EngineError, EngineResult};
use log::{debug, warn};

/// Confirms the roster is non-empty and every giver has at least one
/// admissible receiver.
///
/// Stops at the first giver whose exclusion set covers the roster. Passing
/// does not guarantee a bijection exists.
pub fn validate_feasibility(table: &ExclusionTable) -> EngineResult<()> {
    let roster_size = table.roster().len();
    if roster_size == 0 {
        warn!("event=feasibility_check module=engine status=error error_code=empty_roster");
        return Err(EngineError::EmptyRoster);
    }
    for giver in table.roster() {
        let excluded = table.excluded_for(giver).map_or(roster_size, |set| set.len());
        if excluded >= roster_size {
            warn!(
                "event=feasibility_check module=engine status=error error_code=infeasible_constraints giver={} excluded={} roster_size={}",
                giver, excluded, roster_size
            );
            return Err(EngineError::InfeasibleConstraints {
                giver: giver.clone(),
            });
        }
    }

    debug!(
        "event=feasibility_check module=engine status=ok roster_size={}",
        roster_size
    );
    Ok(())
}
