//! Season change tests: service lookup, host calls, and the follow-up restore.

use seasonal_lot_core::{
    command::{self, CommandReport, LotCommand, SET_SEASON_USAGE},
    report::RestoreOutcome,
    sandbox::SandboxLot,
    season::{self, SeasonSetSource},
    types::{DefinitionId, Level, Quaternion, Vec3, ZoneId},
    SeasonType, SeasonalContext, SnapshotError, SnapshotKey,
};

fn build() -> (SeasonalContext, SandboxLot) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut lot = SandboxLot::new(ZoneId(11));
    lot.define(DefinitionId(7), "Snowman").define(DefinitionId(8), "Sled");
    lot.place(DefinitionId(7), Vec3::new(1.0, 0.0, 1.0), Quaternion::IDENTITY, Level(0));
    lot.place(DefinitionId(8), Vec3::new(2.0, 0.0, 1.0), Quaternion::IDENTITY, Level(0));
    (SeasonalContext::default(), lot)
}

fn set_season(ctx: &mut SeasonalContext, lot: &mut SandboxLot, season: Option<i64>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    command::execute(ctx, lot, &LotCommand::SetSeason { season }, &mut out);
    out
}

#[test]
fn season_change_restores_the_matching_slot() {
    let (mut ctx, mut lot) = build();
    ctx.controller().capture("winter", &lot).unwrap();
    let before = lot.object_ids();

    let out = set_season(&mut ctx, &mut lot, Some(SeasonType::Winter.value()));

    assert_eq!(
        out,
        vec!["Loaded 2 objects for winter.", "Season changed to winter + objects loaded."]
    );
    let seasons = lot.seasons();
    assert_eq!(seasons.current, Some(SeasonType::Winter));
    assert_eq!(seasons.last_source, Some(SeasonSetSource::Cheat));
    assert_eq!(seasons.region_resets, 1);
    assert_eq!(seasons.forecast_resets, 1);
    assert!(lot.object_ids().iter().all(|id| !before.contains(id)), "objects were rebuilt");
}

#[test]
fn season_change_without_snapshot_reports_it() {
    let (mut ctx, mut lot) = build();
    let before = lot.objects();

    let out = set_season(&mut ctx, &mut lot, Some(1));

    assert_eq!(
        out,
        vec!["No snapshot saved for fall.", "Season changed to fall, but no snapshot found."]
    );
    assert_eq!(lot.seasons().current, Some(SeasonType::Fall));
    assert_eq!(lot.objects(), before, "empty slot leaves the lot alone");
}

#[test]
fn missing_season_service_changes_nothing() {
    let (mut ctx, mut lot) = build();
    ctx.controller().capture("summer", &lot).unwrap();
    lot.set_season_service_available(false);
    let before = lot.objects();

    let out = set_season(&mut ctx, &mut lot, Some(0));

    assert_eq!(out, vec!["SeasonService not available."]);
    assert_eq!(lot.seasons().current, None);
    assert_eq!(lot.objects(), before);
    assert_eq!(lot.instantiations(), 0);
}

#[test]
fn failing_season_service_skips_the_restore() {
    let (mut ctx, mut lot) = build();
    ctx.controller().capture("spring", &lot).unwrap();
    lot.seasons_mut().fail_next_change = true;
    let before = lot.objects();

    let err = season::change_season(&mut ctx, &mut lot, SeasonType::Spring).unwrap_err();

    assert!(matches!(err, SnapshotError::ServiceUnavailable { .. }), "got {err:?}");
    assert_eq!(lot.objects(), before);
}

#[test]
fn out_of_range_season_prints_usage() {
    let (mut ctx, mut lot) = build();

    for value in [4, -1, 99] {
        let out = set_season(&mut ctx, &mut lot, Some(value));
        assert_eq!(out, vec![SET_SEASON_USAGE], "value {value}");
    }
    assert_eq!(lot.seasons().current, None);
    assert_eq!(lot.seasons().region_resets, 0);
}

#[test]
fn change_season_reports_key_and_outcome() {
    let (mut ctx, mut lot) = build();
    ctx.controller().capture("summer", &lot).unwrap();

    let change = season::change_season(&mut ctx, &mut lot, SeasonType::Summer).unwrap();

    assert_eq!(change.key, Some(SnapshotKey::Summer));
    assert!(change.snapshot_found());
    assert_eq!(change.restore.as_ref().map(RestoreOutcome::restored), Some(2));

    let change = season::change_season(&mut ctx, &mut lot, SeasonType::Winter).unwrap();
    assert_eq!(change.restore, Some(RestoreOutcome::NoSnapshot));
    assert!(!change.snapshot_found());
}

#[test]
fn command_report_carries_the_season_change() {
    let (mut ctx, mut lot) = build();
    let mut out: Vec<String> = Vec::new();

    let cmd = LotCommand::parse("seasonal.set_season spring").unwrap();
    let report = command::execute(&mut ctx, &mut lot, &cmd, &mut out);

    let CommandReport::SeasonChanged { change } = report else {
        panic!("expected SeasonChanged, got {report:?}");
    };
    assert_eq!(change.season, SeasonType::Spring);
    assert_eq!(change.key, Some(SnapshotKey::Spring));
}
