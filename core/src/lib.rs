//! Seasonal lot snapshots.
//!
//! Captures the placed objects of a lot into one of four season slots and
//! rebuilds the lot from a slot later, optionally as part of a season change.
//!
//! # Modules
//!
//! - [`store`] -- the in-memory slot table.
//! - [`controller`] -- capture, clear, and restore against a host.
//! - [`host`] -- the capabilities a host game must provide.
//! - [`season`] -- slot keys, host seasons, and the season-change bridge.
//! - [`command`] -- text commands and their output lines.
//! - [`sandbox`] -- an in-memory host lot for tools and tests.

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod record;
pub mod report;
pub mod sandbox;
pub mod season;
pub mod store;
pub mod types;

pub use config::ControllerConfig;
pub use controller::SnapshotController;
pub use error::{HostError, SnapshotError, SnapshotResult};
pub use record::PlacementRecord;
pub use report::{BatchReport, CaptureReport, ClearReport, RestoreOutcome, SkipReason};
pub use season::{SeasonType, SnapshotKey};
pub use store::SnapshotStore;

use uuid::Uuid;

/// Everything one session of the tool owns.
///
/// Build one at session start and pass it to every command. Dropping it
/// drops every snapshot.
#[derive(Debug)]
pub struct SeasonalContext {
    pub session_id: Uuid,
    pub store:      SnapshotStore,
    pub config:     ControllerConfig,
}

impl SeasonalContext {
    pub fn new(config: ControllerConfig) -> Self {
        let session_id = Uuid::new_v4();
        log::info!("session={session_id} started");
        Self {
            session_id,
            store: SnapshotStore::new(),
            config,
        }
    }

    pub fn controller(&mut self) -> SnapshotController<'_> {
        SnapshotController::new(&mut self.store, &self.config, self.session_id)
    }
}

impl Default for SeasonalContext {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}
