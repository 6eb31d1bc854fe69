//! Savewarden Core - keeps exactly one generation of every save slot.
//!
//! A save directory accumulates files named `<slot>[~<generation>].tunic`.
//! This crate decides, poll after poll, which generation of each slot is
//! protected and which siblings get deleted.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌─────────────────────┐
//! │ SaveDirectory│──▶│ DirectorySnapshot│──▶│ reconcile(tracker,  │
//! │  (tokio::fs) │   │  (decoded Saves) │   │          snapshot)  │
//! └──────┬───────┘   └──────────────────┘   └──────────┬──────────┘
//!        │                                             │
//!        │◀──────────── DeletionRequest ───────────────┤
//!        │                                             ▼
//!        │                                  ProtectionTracker + Notifications
//! ```
//!
//! - `codec` - filename <-> [`Save`]
//! - `tracker` - slot name -> protected generation
//! - `reconcile` - the pure decision algorithm
//! - `snapshot` - decoded directory listing
//! - `store` - directory listing and deletion
//! - `cycle` - one full poll: snapshot, reconcile, delete
//! - `config` - persisted configuration and its location
//!
//! # Example
//!
//! ```rust,no_run
//! use savewarden_core::{CycleOptions, ProtectionTracker, SaveDirectory, run_cycle};
//!
//! #[tokio::main]
//! async fn main() -> savewarden_core::Result<()> {
//!     let dir = SaveDirectory::new("/path/to/SAVES");
//!     let mut tracker = ProtectionTracker::new();
//!
//!     let report = run_cycle(&dir, &tracker, CycleOptions::default()).await?;
//!     for line in report.lines() {
//!         println!("{line}");
//!     }
//!     tracker = report.tracker;
//!     assert!(tracker.len() <= report.snapshot_len);
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod config;
pub mod cycle;
pub mod error;
pub mod reconcile;
pub mod snapshot;
pub mod store;
pub mod tracker;

pub use codec::{
    GENERATION_DELIMITER, GENERATION_WIDTH, SAVE_EXTENSION, Save, decode, encode,
    is_candidate_name,
};
pub use config::{
    APP_NAME, CONFIG_DIR_ENV, CONFIG_FILE, DEFAULT_POLL_INTERVAL, WardenConfig,
    default_config_path, savewarden_config_dir,
};
pub use cycle::{CycleOptions, CycleReport, DeletionFailure, run_cycle};
pub use error::{ConfigError, DecodeError, DeletionError, Result, WardenError};
pub use reconcile::{
    DeletionReason, DeletionRequest, Notification, Reconciliation, reconcile,
};
pub use snapshot::{DirectorySnapshot, SnapshotRead};
pub use store::{DeletionOutcome, SaveDirectory, SaveStore};
pub use tracker::ProtectionTracker;

#[cfg(test)]
mod tests;
