use crate::{
    error::{CommandParseError, SnapshotError},
    host::LotHost,
    report::{CaptureReport, RestoreOutcome, SkipReason},
    season::{self, SeasonChange, SeasonServices, SeasonType, SnapshotKey},
    store::SlotSummary,
    SeasonalContext,
};
use serde::{Deserialize, Serialize};

pub const SET_SEASON_USAGE: &str = "You must specify a season: 0=Summer, 1=Fall, 2=Winter, 3=Spring";

/// All console commands.
/// Variants may be added, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum LotCommand {
    SnapshotSave { season: Option<String> },
    SnapshotLoad { season: Option<String> },
    SnapshotList,
    SnapshotClear { season: Option<String> },
    /// Host season value, 0..=3. Anything else prints usage.
    SetSeason { season: Option<i64> },
}

impl LotCommand {
    /// Parse the console form, e.g. `seasonal.snapshot_save summer`.
    ///
    /// Argument validation is left to `execute` so bad arguments are
    /// answered with the command's own message.
    pub fn parse(line: &str) -> Result<Self, CommandParseError> {
        let mut parts = line.split_whitespace();
        let name = parts.next().ok_or(CommandParseError::Empty)?;
        let arg = parts.next().map(str::to_string);

        match name {
            "seasonal.snapshot_save" => Ok(Self::SnapshotSave { season: arg }),
            "seasonal.snapshot_load" => Ok(Self::SnapshotLoad { season: arg }),
            "seasonal.snapshot_list" => Ok(Self::SnapshotList),
            "seasonal.snapshot_clear" => Ok(Self::SnapshotClear { season: arg }),
            "seasonal.set_season" => Ok(Self::SetSeason {
                season: arg.as_deref().map(parse_season_value),
            }),
            other => Err(CommandParseError::UnknownCommand(other.to_string())),
        }
    }
}

/// Accepts the numeric value or the season name. Unknown names map to -1,
/// which `execute` rejects with the usage line.
fn parse_season_value(arg: &str) -> i64 {
    if let Ok(value) = arg.parse::<i64>() {
        return value;
    }
    match arg.to_ascii_lowercase().as_str() {
        "summer" => SeasonType::Summer.value(),
        "fall" => SeasonType::Fall.value(),
        "winter" => SeasonType::Winter.value(),
        "spring" => SeasonType::Spring.value(),
        _ => -1,
    }
}

/// Where command output lines go.
pub trait OutputSink {
    fn write_line(&mut self, line: &str);
}

impl OutputSink for Vec<String> {
    fn write_line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Structured result of a command, alongside its output lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandReport {
    Saved { key: SnapshotKey, report: CaptureReport },
    Loaded { key: SnapshotKey, outcome: RestoreOutcome },
    Listed { slots: Vec<SlotSummary> },
    Cleared { key: SnapshotKey },
    SeasonChanged { change: SeasonChange },
    Rejected { message: String },
}

/// Run one command against the context and host, writing its output to `out`.
pub fn execute<H>(
    ctx: &mut SeasonalContext,
    host: &mut H,
    command: &LotCommand,
    out: &mut dyn OutputSink,
) -> CommandReport
where
    H: LotHost + SeasonServices,
{
    match command {
        LotCommand::SnapshotSave { season } => {
            let key = match parse_key(season.as_deref(), out) {
                Ok(key) => key,
                Err(report) => return report,
            };
            match ctx.controller().capture(key.as_str(), &*host) {
                Ok(report) => {
                    out.write_line(&format!("Saved {} objects for {key}.", report.captured()));
                    CommandReport::Saved { key, report }
                }
                Err(e) => reject(e, out),
            }
        }
        LotCommand::SnapshotLoad { season } => {
            let key = match parse_key(season.as_deref(), out) {
                Ok(key) => key,
                Err(report) => return report,
            };
            match ctx.controller().restore(key.as_str(), host) {
                Ok(outcome) => {
                    write_restore(ctx, key, &outcome, out);
                    CommandReport::Loaded { key, outcome }
                }
                Err(e) => reject(e, out),
            }
        }
        LotCommand::SnapshotList => {
            let slots = ctx.store.summary();
            for slot in &slots {
                match slot.captured_at {
                    Some(at) => out.write_line(&format!(
                        "{}: {} objects (saved {})",
                        slot.key,
                        slot.record_count,
                        at.format("%Y-%m-%d %H:%M:%S UTC"),
                    )),
                    None => out.write_line(&format!("{}: empty", slot.key)),
                }
            }
            CommandReport::Listed { slots }
        }
        LotCommand::SnapshotClear { season } => {
            let key = match parse_key(season.as_deref(), out) {
                Ok(key) => key,
                Err(report) => return report,
            };
            ctx.store.clear(key);
            out.write_line(&format!("Cleared snapshot for {key}."));
            CommandReport::Cleared { key }
        }
        LotCommand::SetSeason { season } => {
            let Some(season) = season.and_then(SeasonType::from_value) else {
                out.write_line(SET_SEASON_USAGE);
                return CommandReport::Rejected { message: SET_SEASON_USAGE.to_string() };
            };
            match season::change_season(ctx, host, season) {
                Ok(change) => {
                    write_season_change(ctx, &change, out);
                    CommandReport::SeasonChanged { change }
                }
                Err(e) => reject(e, out),
            }
        }
    }
}

fn parse_key(season: Option<&str>, out: &mut dyn OutputSink) -> Result<SnapshotKey, CommandReport> {
    season
        .unwrap_or_default()
        .parse::<SnapshotKey>()
        .map_err(|e| reject(e, out))
}

fn reject(e: SnapshotError, out: &mut dyn OutputSink) -> CommandReport {
    let message = e.to_string();
    out.write_line(&message);
    CommandReport::Rejected { message }
}

fn write_restore(
    ctx: &SeasonalContext,
    key: SnapshotKey,
    outcome: &RestoreOutcome,
    out: &mut dyn OutputSink,
) {
    match outcome {
        RestoreOutcome::NoSnapshot => out.write_line(&format!("No snapshot saved for {key}.")),
        RestoreOutcome::Restored { batch, .. } => {
            if ctx.config.report_spawn_errors {
                for item in batch.skipped.iter().filter(|i| i.reason.is_spawn_error()) {
                    out.write_line(&format!("Error spawning: {}", describe(&item.reason)));
                }
            }
            out.write_line(&format!("Loaded {} objects for {key}.", batch.succeeded));
        }
    }
}

fn write_season_change(ctx: &SeasonalContext, change: &SeasonChange, out: &mut dyn OutputSink) {
    let (Some(key), Some(outcome)) = (change.key, change.restore.as_ref()) else {
        out.write_line(&format!("Season changed to {:?}, but no snapshot found.", change.season));
        return;
    };
    write_restore(ctx, key, outcome, out);
    if change.snapshot_found() {
        out.write_line(&format!("Season changed to {key} + objects loaded."));
    } else {
        out.write_line(&format!("Season changed to {key}, but no snapshot found."));
    }
}

fn describe(reason: &SkipReason) -> String {
    match reason {
        SkipReason::InstantiationFailed(msg) | SkipReason::PlacementFailed(msg) => msg.clone(),
        other => format!("{other:?}"),
    }
}
