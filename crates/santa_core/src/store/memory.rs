//! In-process store for simulations and tests.

use super::{AssignmentStore, StoreResult};
use crate::model::document::SantaDocument;
use std::sync::{Mutex, PoisonError};

/// Mutex-guarded document that counts successful replaces.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    document: SantaDocument,
    replace_count: usize,
}

impl MemoryStore {
    pub fn new(document: SantaDocument) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                document,
                replace_count: 0,
            }),
        }
    }

    /// Number of `replace` calls since construction.
    pub fn replace_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace_count
    }

    /// Snapshot of the stored document.
    pub fn snapshot(&self) -> SantaDocument {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .document
            .clone()
    }
}

impl AssignmentStore for MemoryStore {
    fn load(&self) -> StoreResult<SantaDocument> {
        Ok(self.snapshot())
    }

    fn replace(&self, document: &SantaDocument) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.document = document.clone();
        state.replace_count += 1;
        Ok(())
    }
}
