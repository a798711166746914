//! In-memory snapshot table.
//!
//! RULE: every slot exists from construction on. Unknown keys are rejected,
//! never inserted. A slot is only ever replaced whole.
//! Nothing here outlives the process.

use crate::{
    error::SnapshotResult,
    record::PlacementRecord,
    season::SnapshotKey,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default)]
struct Slot {
    records:     Vec<PlacementRecord>,
    captured_at: Option<DateTime<Utc>>,
}

/// One line of `SnapshotStore::summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSummary {
    pub key:          SnapshotKey,
    pub record_count: usize,
    pub captured_at:  Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    slots: [Slot; 4],
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored records for `key`, in capture order.
    pub fn get(&self, key: &str) -> SnapshotResult<&[PlacementRecord]> {
        let key: SnapshotKey = key.parse()?;
        Ok(self.records(key))
    }

    /// Overwrite the slot for `key` with `records`.
    pub fn replace(&mut self, key: &str, records: Vec<PlacementRecord>) -> SnapshotResult<()> {
        let key: SnapshotKey = key.parse()?;
        self.replace_slot(key, records);
        Ok(())
    }

    pub fn records(&self, key: SnapshotKey) -> &[PlacementRecord] {
        &self.slots[key.index()].records
    }

    pub fn replace_slot(&mut self, key: SnapshotKey, records: Vec<PlacementRecord>) {
        self.slots[key.index()] = Slot {
            records,
            captured_at: Some(Utc::now()),
        };
    }

    /// Empty one slot. The slot itself stays.
    pub fn clear(&mut self, key: SnapshotKey) {
        self.slots[key.index()] = Slot::default();
    }

    pub fn captured_at(&self, key: SnapshotKey) -> Option<DateTime<Utc>> {
        self.slots[key.index()].captured_at
    }

    pub fn summary(&self) -> Vec<SlotSummary> {
        SnapshotKey::ALL
            .iter()
            .map(|&key| SlotSummary {
                key,
                record_count: self.records(key).len(),
                captured_at:  self.captured_at(key),
            })
            .collect()
    }
}
