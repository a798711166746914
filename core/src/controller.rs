//! Capture, clear, and restore of the lot's placed objects.
//!
//! All three are best-effort over objects: one object that cannot be read,
//! destroyed, or rebuilt is recorded in the batch report and the loop moves
//! on. Only an invalid key aborts an operation, and it does so before any
//! object or slot is touched.

use crate::{
    config::ControllerConfig,
    error::SnapshotResult,
    host::{LiveEntity, LotHost, LotObjectEnumerator},
    record::PlacementRecord,
    report::{BatchReport, CaptureReport, ClearReport, RestoreOutcome, SkipReason, SkippedSubject},
    season::SnapshotKey,
    store::SnapshotStore,
};
use uuid::Uuid;

pub struct SnapshotController<'a> {
    store:      &'a mut SnapshotStore,
    config:     &'a ControllerConfig,
    session_id: Uuid,
}

impl<'a> SnapshotController<'a> {
    pub fn new(store: &'a mut SnapshotStore, config: &'a ControllerConfig, session_id: Uuid) -> Self {
        Self { store, config, session_id }
    }

    /// Record every placeable object on the lot into `key`'s slot.
    ///
    /// Actors are passed over. Objects without a definition or with an
    /// unreadable placement are skipped. The slot is replaced even when
    /// nothing was captured.
    pub fn capture<L>(&mut self, key: &str, lot: &L) -> SnapshotResult<CaptureReport>
    where
        L: LotObjectEnumerator + ?Sized,
    {
        let key: SnapshotKey = key.parse()?;
        let mut batch = BatchReport::default();
        let mut actors_excluded = 0;
        let mut records = Vec::new();

        for entity in lot.list() {
            if entity.is_actor() {
                actors_excluded += 1;
                continue;
            }
            match read_record(&entity) {
                Ok(record) => {
                    log::debug!(
                        "session={} capture[{key}]: {} {} at level {}",
                        self.session_id,
                        entity.object_id(),
                        record.definition_id(),
                        record.level().0,
                    );
                    records.push(record);
                    batch.record_success();
                }
                Err(reason) => {
                    log::warn!(
                        "session={} capture[{key}]: skipping {}: {reason:?}",
                        self.session_id,
                        entity.object_id(),
                    );
                    batch.record_skip(SkippedSubject::Object(entity.object_id()), reason);
                }
            }
        }

        self.store.replace_slot(key, records);
        log::info!(
            "session={} capture[{key}]: stored {} records ({} skipped, {actors_excluded} actors)",
            self.session_id,
            batch.succeeded,
            batch.skipped.len(),
        );
        Ok(CaptureReport { batch, actors_excluded })
    }

    /// Destroy every non-actor object on the lot.
    pub fn clear_live<L>(&self, lot: &mut L) -> ClearReport
    where
        L: LotObjectEnumerator + ?Sized,
    {
        let mut batch = BatchReport::default();

        for entity in lot.list() {
            if entity.is_actor() {
                continue;
            }
            let object_id = entity.object_id();
            match lot.destroy(entity, &self.config.destroy_cause) {
                Ok(()) => batch.record_success(),
                Err(e) => {
                    log::warn!("session={} clear: could not destroy {object_id}: {e}", self.session_id);
                    batch.record_skip(
                        SkippedSubject::Object(object_id),
                        SkipReason::DestroyFailed(e.to_string()),
                    );
                }
            }
        }

        log::info!(
            "session={} clear: destroyed {} objects ({} failed)",
            self.session_id,
            batch.succeeded,
            batch.skipped.len(),
        );
        ClearReport { batch }
    }

    /// Replace the lot's objects with the ones stored under `key`.
    ///
    /// An empty slot returns `NoSnapshot` and leaves the lot alone.
    /// Otherwise the lot is cleared first, then each record is rebuilt
    /// in stored order on the current zone.
    pub fn restore<H>(&self, key: &str, host: &mut H) -> SnapshotResult<RestoreOutcome>
    where
        H: LotHost + ?Sized,
    {
        let key: SnapshotKey = key.parse()?;
        let records = self.store.records(key);
        if records.is_empty() {
            log::info!("session={} restore[{key}]: no snapshot", self.session_id);
            return Ok(RestoreOutcome::NoSnapshot);
        }

        let cleared = self.clear_live(host);
        let zone_id = host.current_zone_id();
        let mut batch = BatchReport::default();

        for (index, record) in records.iter().enumerate() {
            let subject = SkippedSubject::Record {
                index,
                definition_id: record.definition_id(),
            };
            match self.spawn(host, record) {
                Ok(()) => batch.record_success(),
                Err(reason) => {
                    log::warn!(
                        "session={} restore[{key}]: record {index} ({}) skipped: {reason:?}",
                        self.session_id,
                        record.definition_id(),
                    );
                    batch.record_skip(subject, reason);
                }
            }
        }

        log::info!(
            "session={} restore[{key}]: restored {} of {} records in zone {}",
            self.session_id,
            batch.succeeded,
            records.len(),
            zone_id.0,
        );
        Ok(RestoreOutcome::Restored { cleared, batch })
    }

    fn spawn<H>(&self, host: &mut H, record: &PlacementRecord) -> Result<(), SkipReason>
    where
        H: LotHost + ?Sized,
    {
        let definition = host
            .resolve_type(record.definition_id())
            .ok_or(SkipReason::UnresolvedDefinition)?;

        let mut object = host
            .instantiate(&definition)
            .map_err(|e| SkipReason::InstantiationFailed(e.to_string()))?
            .ok_or(SkipReason::NothingInstantiated)?;

        let location = record.location_in(host.current_zone_id(), self.config.surface_type);
        object
            .set_location(location)
            .map_err(|e| SkipReason::PlacementFailed(e.to_string()))?;

        log::debug!(
            "session={} restore: {} placed as {}",
            self.session_id,
            record.definition_id(),
            object.object_id(),
        );
        Ok(())
    }
}

fn read_record<E: LiveEntity>(entity: &E) -> Result<PlacementRecord, SkipReason> {
    let definition_id = entity.definition_id().ok_or(SkipReason::UnresolvedDefinition)?;
    let transform = entity
        .transform()
        .map_err(|e| SkipReason::UnreadablePlacement(e.to_string()))?;
    let level = entity
        .level()
        .map_err(|e| SkipReason::UnreadablePlacement(e.to_string()))?;
    Ok(PlacementRecord::new(
        definition_id,
        transform.translation,
        transform.orientation,
        level,
    ))
}
