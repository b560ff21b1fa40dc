//! JSON file store with atomic replace.
//!
//! # Responsibility
//! - Read the whole store document from one JSON file.
//! - Write a sibling temp file, fsync it, and rename it over the target.
//!
//! # Invariants
//! - The temp file lives in the target directory so the rename stays on one
//!   filesystem.
//! - Loaded documents pass `SantaDocument::validate()`.
//! - Well-formed JSON that is not a valid store document (bad or colliding
//!   keys, wrong shapes) is `InvalidDocument`; syntax errors stay `Json`.

use super::{AssignmentStore, StoreError, StoreResult};
use crate::model::document::SantaDocument;
use log::{error, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use serde_json::error::Category;
use tempfile::NamedTempFile;

/// Store backed by a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> StoreResult<SantaDocument> {
        let raw = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let document: SantaDocument =
            serde_json::from_str(&raw).map_err(|err| match err.classify() {
                Category::Data => StoreError::InvalidDocument(err.to_string()),
                _ => StoreError::Json(err),
            })?;
        document
            .validate()
            .map_err(|defect| StoreError::InvalidDocument(defect.to_string()))?;
        Ok(document)
    }

    fn write_document(&self, document: &SantaDocument) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_err = |source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut temp = NamedTempFile::new_in(dir).map_err(io_err)?;
        serde_json::to_writer_pretty(&mut temp, document)?;
        temp.write_all(b"\n").map_err(io_err)?;
        temp.as_file().sync_all().map_err(io_err)?;
        temp.persist(&self.path).map_err(|err| StoreError::Io {
            path: self.path.clone(),
            source: err.error,
        })?;
        Ok(())
    }
}

impl AssignmentStore for JsonFileStore {
    fn load(&self) -> StoreResult<SantaDocument> {
        let started_at = Instant::now();
        match self.read_document() {
            Ok(document) => {
                info!(
                    "event=store_load module=store status=ok participants={} history_periods={} assigned_periods={} duration_ms={}",
                    document.participants.len(),
                    document.history.len(),
                    document.assignments.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(document)
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn replace(&self, document: &SantaDocument) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.write_document(document) {
            Ok(()) => {
                info!(
                    "event=store_replace module=store status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_replace module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}
