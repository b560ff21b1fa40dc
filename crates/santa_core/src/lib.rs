//! Core logic for the yearly gift-exchange draw.
//! This crate owns the assignment invariants; front ends only trigger and display.

pub mod config;
pub mod engine;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{load_config, ConfigError, ConfigResult, SantaConfig, DEFAULT_EXCLUSION_WINDOW};
pub use engine::{
    assign, build_exclusions, plan_assignment, validate_feasibility, EngineError, EngineResult,
    ExclusionTable, PermanentExclusions,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::assignment::{Assignment, AssignmentDefect};
pub use model::document::{DocumentDefect, SantaDocument};
pub use model::participant::{Participant, ParticipantId};
pub use model::period::Period;
pub use model::ModelError;
pub use service::period_service::{EnsureOutcome, PeriodService, PeriodStatus, Recipient};
pub use service::{ServiceError, ServiceResult};
pub use store::{AssignmentStore, JsonFileStore, MemoryStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
