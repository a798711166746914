//! Capture tests: what gets recorded from a live lot, and what does not.

use seasonal_lot_core::{
    error::{HostError, HostResult},
    host::{LiveEntity, LotObjectEnumerator},
    report::{SkipReason, SkippedSubject},
    sandbox::SandboxLot,
    types::{DefinitionId, Level, Location, ObjectId, Quaternion, Transform, Vec3, ZoneId},
    PlacementRecord, SeasonalContext, SnapshotError, SnapshotKey,
};

fn build() -> (SeasonalContext, SandboxLot) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut lot = SandboxLot::new(ZoneId(7));
    lot.define(DefinitionId(42), "Lamp").define(DefinitionId(43), "Chair");
    (SeasonalContext::default(), lot)
}

#[test]
fn single_object_is_captured_with_its_placement() {
    let (mut ctx, mut lot) = build();
    lot.place(DefinitionId(42), Vec3::new(1.0, 2.0, 0.0), Quaternion::IDENTITY, Level(0));

    let report = ctx.controller().capture("summer", &lot).unwrap();
    assert_eq!(report.captured(), 1);

    let expected = PlacementRecord::new(
        DefinitionId(42),
        Vec3::new(1.0, 2.0, 0.0),
        Quaternion::IDENTITY,
        Level(0),
    );
    assert_eq!(ctx.store.get("summer").unwrap(), &[expected]);
}

#[test]
fn actors_are_excluded() {
    let (mut ctx, mut lot) = build();
    lot.place(DefinitionId(42), Vec3::new(1.0, 0.0, 1.0), Quaternion::IDENTITY, Level(0));
    lot.place_actor(Vec3::new(2.0, 0.0, 2.0));
    lot.place(DefinitionId(43), Vec3::new(3.0, 0.0, 3.0), Quaternion::IDENTITY, Level(1));
    lot.place_actor(Vec3::new(4.0, 0.0, 4.0));
    lot.place(DefinitionId(42), Vec3::new(5.0, 0.0, 5.0), Quaternion::IDENTITY, Level(0));

    let report = ctx.controller().capture("spring", &lot).unwrap();

    assert_eq!(report.captured(), 3, "three placeable objects");
    assert_eq!(report.actors_excluded, 2);
    assert!(report.batch.skipped.is_empty(), "actors are not skips: {:?}", report.batch.skipped);
    assert_eq!(ctx.store.records(SnapshotKey::Spring).len(), 3);
}

#[test]
fn records_keep_enumeration_order() {
    let (mut ctx, mut lot) = build();
    let xs = [9.0, 1.0, 5.0, 3.0];
    for x in xs {
        lot.place(DefinitionId(43), Vec3::new(x, 0.0, 0.0), Quaternion::IDENTITY, Level(0));
    }

    ctx.controller().capture("fall", &lot).unwrap();

    let captured: Vec<f32> = ctx
        .store
        .records(SnapshotKey::Fall)
        .iter()
        .map(|r| r.position().x)
        .collect();
    assert_eq!(captured, xs);
}

#[test]
fn unconvertible_objects_are_skipped_with_reasons() {
    let (mut ctx, mut lot) = build();
    lot.place(DefinitionId(42), Vec3::new(1.0, 0.0, 0.0), Quaternion::IDENTITY, Level(0));
    let orphan = lot.place_without_definition(Vec3::new(2.0, 0.0, 0.0));
    let broken = lot.place(DefinitionId(43), Vec3::new(3.0, 0.0, 0.0), Quaternion::IDENTITY, Level(0));
    lot.mark_unreadable(broken);

    let report = ctx.controller().capture("winter", &lot).unwrap();

    assert_eq!(report.captured(), 1);
    assert_eq!(report.batch.skipped.len(), 2);
    assert_eq!(report.batch.skipped[0].subject, SkippedSubject::Object(orphan));
    assert_eq!(report.batch.skipped[0].reason, SkipReason::UnresolvedDefinition);
    assert_eq!(report.batch.skipped[1].subject, SkippedSubject::Object(broken));
    assert!(
        matches!(report.batch.skipped[1].reason, SkipReason::UnreadablePlacement(_)),
        "got {:?}",
        report.batch.skipped[1].reason
    );
    assert_eq!(ctx.store.records(SnapshotKey::Winter).len(), 1);
}

#[test]
fn capture_replaces_the_slot_wholesale() {
    let (mut ctx, mut lot) = build();
    lot.place(DefinitionId(42), Vec3::new(1.0, 0.0, 0.0), Quaternion::IDENTITY, Level(0));
    lot.place(DefinitionId(42), Vec3::new(2.0, 0.0, 0.0), Quaternion::IDENTITY, Level(0));
    ctx.controller().capture("summer", &lot).unwrap();
    assert_eq!(ctx.store.records(SnapshotKey::Summer).len(), 2);

    let empty = SandboxLot::new(ZoneId(7));
    let report = ctx.controller().capture("summer", &empty).unwrap();

    assert_eq!(report.captured(), 0);
    assert!(ctx.store.records(SnapshotKey::Summer).is_empty(), "old records must not survive");
    assert!(ctx.store.captured_at(SnapshotKey::Summer).is_some());
}

#[test]
fn capture_leaves_the_lot_alone() {
    let (mut ctx, mut lot) = build();
    lot.place(DefinitionId(42), Vec3::new(1.0, 0.0, 0.0), Quaternion::IDENTITY, Level(0));
    lot.place_actor(Vec3::new(2.0, 0.0, 0.0));
    let before = lot.objects();

    ctx.controller().capture("summer", &lot).unwrap();

    assert_eq!(lot.objects(), before);
}

#[test]
fn invalid_key_is_rejected_without_mutating_the_store() {
    let (mut ctx, mut lot) = build();
    lot.place(DefinitionId(42), Vec3::new(1.0, 0.0, 0.0), Quaternion::IDENTITY, Level(0));

    let err = ctx.controller().capture("autumn", &lot).unwrap_err();

    assert!(matches!(err, SnapshotError::InvalidKey { ref key } if key == "autumn"), "got {err:?}");
    for slot in ctx.store.summary() {
        assert_eq!(slot.record_count, 0, "{} should be untouched", slot.key);
        assert_eq!(slot.captured_at, None);
    }
}

// ── A host that is not the sandbox ─────────────────────────────

#[derive(Clone)]
struct FixedEntity {
    id:    u64,
    def:   Option<u64>,
    actor: bool,
}

impl LiveEntity for FixedEntity {
    fn object_id(&self) -> ObjectId { ObjectId(self.id) }
    fn is_actor(&self) -> bool { self.actor }
    fn definition_id(&self) -> Option<DefinitionId> { self.def.map(DefinitionId) }
    fn transform(&self) -> HostResult<Transform> {
        Ok(Transform {
            translation: Vec3::new(self.id as f32, 0.0, 0.0),
            orientation: Quaternion::IDENTITY,
        })
    }
    fn level(&self) -> HostResult<Level> { Ok(Level(0)) }
    fn set_location(&mut self, _location: Location) -> HostResult<()> {
        Err(HostError::Placement("read-only host".into()))
    }
}

struct FixedLot(Vec<FixedEntity>);

impl LotObjectEnumerator for FixedLot {
    type Entity = FixedEntity;
    fn list(&self) -> Vec<FixedEntity> { self.0.clone() }
    fn destroy(&mut self, _entity: FixedEntity, _cause: &str) -> HostResult<()> {
        Err(HostError::Destroy("read-only host".into()))
    }
}

#[test]
fn any_enumerator_can_back_a_capture() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut ctx = SeasonalContext::default();
    let lot = FixedLot(vec![
        FixedEntity { id: 1, def: Some(10), actor: false },
        FixedEntity { id: 2, def: None, actor: true },
        FixedEntity { id: 3, def: Some(11), actor: false },
    ]);

    let report = ctx.controller().capture("winter", &lot).unwrap();

    assert_eq!(report.captured(), 2);
    let defs: Vec<DefinitionId> = ctx
        .store
        .records(SnapshotKey::Winter)
        .iter()
        .map(|r| r.definition_id())
        .collect();
    assert_eq!(defs, vec![DefinitionId(10), DefinitionId(11)]);
}
