//! Per-item outcomes of bulk capture, clear, and restore.
//!
//! Bulk operations never abort on one bad object. Each skipped item is
//! recorded here with its reason so callers can see what was dropped.

use crate::types::{DefinitionId, ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Captured object had no definition, or restore could not resolve it.
    UnresolvedDefinition,
    UnreadablePlacement(String),
    DestroyFailed(String),
    InstantiationFailed(String),
    /// The factory returned no object and no error.
    NothingInstantiated,
    PlacementFailed(String),
}

impl SkipReason {
    /// Failures worth echoing to the player, as opposed to quiet filtering.
    pub fn is_spawn_error(&self) -> bool {
        matches!(self, Self::InstantiationFailed(_) | Self::PlacementFailed(_))
    }
}

/// What a skipped item was.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkippedSubject {
    /// A live object seen during capture or clear.
    Object(ObjectId),
    /// A stored record, by position in the snapshot.
    Record { index: usize, definition_id: DefinitionId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub subject: SkippedSubject,
    pub reason:  SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub succeeded: usize,
    pub skipped:   Vec<SkippedItem>,
}

impl BatchReport {
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_skip(&mut self, subject: SkippedSubject, reason: SkipReason) {
        self.skipped.push(SkippedItem { subject, reason });
    }

    pub fn attempted(&self) -> usize {
        self.succeeded + self.skipped.len()
    }
}

/// Result of a capture. `batch.succeeded` is the number of records stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureReport {
    pub batch: BatchReport,
    /// Actor-class objects passed over.
    pub actors_excluded: usize,
}

impl CaptureReport {
    pub fn captured(&self) -> usize {
        self.batch.succeeded
    }
}

/// Result of clearing the lot. `batch.succeeded` is the number destroyed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearReport {
    pub batch: BatchReport,
}

impl ClearReport {
    pub fn destroyed(&self) -> usize {
        self.batch.succeeded
    }
}

/// Result of a restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RestoreOutcome {
    /// The slot was empty. Nothing was cleared or created.
    NoSnapshot,
    Restored { cleared: ClearReport, batch: BatchReport },
}

impl RestoreOutcome {
    /// Objects created. Zero for `NoSnapshot`.
    pub fn restored(&self) -> usize {
        match self {
            Self::NoSnapshot => 0,
            Self::Restored { batch, .. } => batch.succeeded,
        }
    }
}
