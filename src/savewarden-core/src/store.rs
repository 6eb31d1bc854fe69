//! Filesystem access for the save directory: listing and deletion.
//!
//! [`SaveStore`] is the seam between the reconciliation cycle and the
//! filesystem; [`SaveDirectory`] is the real implementation.

use async_trait::async_trait;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::codec::{Save, decode, encode, is_candidate_name};
use crate::error::{DecodeError, DeletionError, Result, WardenError};
use crate::snapshot::{DirectorySnapshot, SnapshotRead};

/// Outcome of a successful deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionOutcome {
    /// The file was removed.
    Removed,
    /// The file was already absent, which is the desired end state.
    AlreadyGone,
}

/// Source of snapshots and sink of deletions for [`crate::run_cycle`].
#[async_trait]
pub trait SaveStore: Send + Sync {
    /// List and decode the current saves.
    async fn snapshot(&self) -> Result<SnapshotRead>;

    /// Remove one save file.
    async fn remove(&self, save: &Save) -> std::result::Result<DeletionOutcome, DeletionError>;
}

/// The configured save directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDirectory {
    root: PathBuf,
}

impl SaveDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory being watched.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Physical location of `save`.
    pub fn path_for(&self, save: &Save) -> PathBuf {
        self.root.join(encode(save))
    }

    /// List the directory and decode every candidate file.
    ///
    /// A listing failure is returned as [`WardenError::ListDir`]: a partial
    /// listing would look like vanished slots, so there is no fallback.
    /// Undecodable names are collected in [`SnapshotRead::rejected`].
    pub async fn snapshot(&self) -> Result<SnapshotRead> {
        let list_err = |source: std::io::Error| WardenError::ListDir {
            path: self.root.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(list_err)?;
        let mut saves = Vec::new();
        let mut rejected = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
            let raw_name = entry.file_name();
            let Some(name) = raw_name.to_str() else {
                let lossy = raw_name.to_string_lossy();
                if is_candidate_name(&lossy) {
                    rejected.push(DecodeError::NonUtf8Name {
                        filename: lossy.into_owned(),
                    });
                }
                continue;
            };

            if !is_candidate_name(name) {
                trace!(name, "ignoring non-save entry");
                continue;
            }

            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => {}
                Ok(_) => {
                    debug!(name, "skipping save-named entry that is not a regular file");
                    continue;
                }
                // Removed between listing and inspection.
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(list_err(e)),
            }

            match decode(name) {
                Ok(save) => saves.push(save),
                Err(err) => rejected.push(err),
            }
        }

        rejected.sort_by(|a, b| a.filename().cmp(b.filename()));
        let snapshot = DirectorySnapshot::new(saves);
        debug!(
            dir = %self.root.display(),
            saves = snapshot.len(),
            rejected = rejected.len(),
            "read save directory"
        );

        Ok(SnapshotRead { snapshot, rejected })
    }

    /// Remove exactly the file identified by `save`.
    pub async fn remove(&self, save: &Save) -> std::result::Result<DeletionOutcome, DeletionError> {
        let path = self.path_for(save);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "removed save file");
                Ok(DeletionOutcome::Removed)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "save file already gone");
                Ok(DeletionOutcome::AlreadyGone)
            }
            Err(source) if source.kind() == ErrorKind::PermissionDenied => {
                Err(DeletionError::PermissionDenied { path, source })
            }
            Err(source) => Err(DeletionError::Io { path, source }),
        }
    }
}

#[async_trait]
impl SaveStore for SaveDirectory {
    async fn snapshot(&self) -> Result<SnapshotRead> {
        SaveDirectory::snapshot(self).await
    }

    async fn remove(&self, save: &Save) -> std::result::Result<DeletionOutcome, DeletionError> {
        SaveDirectory::remove(self, save).await
    }
}
