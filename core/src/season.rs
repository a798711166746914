//! Snapshot slots, host seasons, and the bridge between them.
//!
//! Slots are a closed set of four labels. The host's season enum is mapped
//! onto them by a total table; there is no "unknown slot" at runtime.

use crate::{
    error::{HostResult, SnapshotError, SnapshotResult},
    host::LotHost,
    report::RestoreOutcome,
    SeasonalContext,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A snapshot slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKey {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl SnapshotKey {
    /// Every slot, in display order.
    pub const ALL: [SnapshotKey; 4] = [Self::Spring, Self::Summer, Self::Fall, Self::Winter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall   => "fall",
            Self::Winter => "winter",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Spring => 0,
            Self::Summer => 1,
            Self::Fall   => 2,
            Self::Winter => 3,
        }
    }

    /// `["spring", "summer", "fall", "winter"]`
    pub fn valid_list() -> String {
        let quoted: Vec<String> = Self::ALL.iter().map(|k| format!("\"{}\"", k.as_str())).collect();
        format!("[{}]", quoted.join(", "))
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapshotKey {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SnapshotError::InvalidKey { key: s.to_string() })
    }
}

/// The host's season enumeration. Discriminants match the host's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i64)]
pub enum SeasonType {
    Summer = 0,
    Fall   = 1,
    Winter = 2,
    Spring = 3,
}

impl SeasonType {
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Summer),
            1 => Some(Self::Fall),
            2 => Some(Self::Winter),
            3 => Some(Self::Spring),
            _ => None,
        }
    }

    pub fn value(&self) -> i64 {
        *self as i64
    }

    /// Slot holding this season's objects.
    ///
    /// Returns an `Option` so hosts with extra seasons can be added
    /// without pretending every season has a slot.
    pub fn snapshot_key(&self) -> Option<SnapshotKey> {
        Some(match self {
            Self::Summer => SnapshotKey::Summer,
            Self::Fall   => SnapshotKey::Fall,
            Self::Winter => SnapshotKey::Winter,
            Self::Spring => SnapshotKey::Spring,
        })
    }
}

/// Who asked for a season change. Hosts may treat cheats differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonSetSource {
    Cheat,
    Gameplay,
}

/// The host's season and weather controls.
pub trait SeasonControl {
    /// Drop any region-specific season overrides.
    fn reset_region_season_params(&mut self) -> HostResult<()>;

    fn set_season(&mut self, season: SeasonType, source: SeasonSetSource) -> HostResult<()>;

    /// Regenerate weather forecasts for the new season.
    fn reset_forecasts(&mut self) -> HostResult<()>;

    /// Full season switch: region reset, season set, forecasts reset.
    fn change_season(&mut self, season: SeasonType) -> HostResult<()> {
        self.reset_region_season_params()?;
        self.set_season(season, SeasonSetSource::Cheat)?;
        self.reset_forecasts()
    }
}

/// Lookup for the season service, which not every host session has.
pub trait SeasonServices {
    fn season_service(&mut self) -> Option<&mut dyn SeasonControl>;
}

/// Result of a season change request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonChange {
    pub season: SeasonType,
    /// `None` when the season has no slot.
    pub key:     Option<SnapshotKey>,
    /// `None` when no restore was attempted.
    pub restore: Option<RestoreOutcome>,
}

impl SeasonChange {
    /// True when a stored snapshot existed for the new season.
    pub fn snapshot_found(&self) -> bool {
        matches!(self.restore, Some(RestoreOutcome::Restored { .. }))
    }
}

/// Switch the host season, then restore that season's snapshot.
///
/// A missing season service is reported as `ServiceUnavailable` and
/// nothing else happens. A failure inside the service itself is reported
/// the same way, before any object is touched.
pub fn change_season<H>(
    ctx: &mut SeasonalContext,
    host: &mut H,
    season: SeasonType,
) -> SnapshotResult<SeasonChange>
where
    H: LotHost + SeasonServices,
{
    let service = host
        .season_service()
        .ok_or(SnapshotError::ServiceUnavailable { service: "SeasonService" })?;

    if let Err(e) = service.change_season(season) {
        log::warn!("session={} season: change to {season:?} failed: {e}", ctx.session_id);
        return Err(SnapshotError::ServiceUnavailable { service: "SeasonService" });
    }
    log::info!("session={} season: changed to {season:?}", ctx.session_id);

    let key = season.snapshot_key();
    let restore = match key {
        Some(key) => Some(ctx.controller().restore(key.as_str(), host)?),
        None => None,
    };

    Ok(SeasonChange { season, key, restore })
}
