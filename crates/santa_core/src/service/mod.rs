//! Period use-case services.
//!
//! # Responsibility
//! - Orchestrate engine runs against the store for one period.
//! - Keep triggers and front ends decoupled from engine and storage details.

pub mod forecast;
pub mod period_service;

use crate::engine::EngineError;
use crate::model::participant::ParticipantId;
use crate::model::period::Period;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced to triggers and front ends. Nothing is retried here.
#[derive(Debug)]
pub enum ServiceError {
    Engine(EngineError),
    Store(StoreError),
    UnknownParticipant(ParticipantId),
    PeriodNotAssigned(Period),
    /// Forecasting `count` periods from `start` runs past the last period.
    PeriodOutOfRange { start: Period, count: usize },
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Engine(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::UnknownParticipant(id) => write!(f, "participant has no assignment: {id}"),
            Self::PeriodNotAssigned(period) => write!(f, "period {period} is not assigned yet"),
            Self::PeriodOutOfRange { start, count } => {
                write!(f, "cannot forecast {count} periods starting at {start}")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Engine(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::UnknownParticipant(_)
            | Self::PeriodNotAssigned(_)
            | Self::PeriodOutOfRange { .. } => None,
        }
    }
}

impl From<EngineError> for ServiceError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
