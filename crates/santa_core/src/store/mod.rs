//! Whole-document persistence contracts and implementations.
//!
//! # Responsibility
//! - Load the full store document and replace it atomically.
//! - Reject structurally invalid documents on load.
//!
//! # Invariants
//! - No partial reads or writes: callers always see a whole document.
//! - A failed `replace` leaves the previously stored document intact.

mod json_file;
mod memory;

use crate::model::document::SantaDocument;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure while loading or replacing the store document.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    InvalidDocument(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "store I/O failed at `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "store document is not valid JSON: {err}"),
            Self::InvalidDocument(message) => write!(f, "invalid store document: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::InvalidDocument(_) => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Load-whole / replace-whole persistence primitive.
pub trait AssignmentStore {
    fn load(&self) -> StoreResult<SantaDocument>;
    fn replace(&self, document: &SantaDocument) -> StoreResult<()>;
}

impl<T: AssignmentStore + ?Sized> AssignmentStore for &T {
    fn load(&self) -> StoreResult<SantaDocument> {
        (**self).load()
    }

    fn replace(&self, document: &SantaDocument) -> StoreResult<()> {
        (**self).replace(document)
    }
}
