//! lot-console: headless console for seasonal lot snapshots.
//!
//! Drives the snapshot commands against an in-memory demo lot.
//!
//! Usage:
//!   lot-console                      # one console command per stdin line
//!   lot-console --config ctl.json    # load controller settings
//!   lot-console --ipc-mode           # JSON request/response per line

use anyhow::Result;
use seasonal_lot_core::{
    command::{self, CommandReport, LotCommand},
    sandbox::{ObjectView, SandboxLot},
    season::SeasonType,
    ControllerConfig, SeasonalContext,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    GetState,
    Command { command: LotCommand },
    Quit,
}

#[derive(serde::Serialize)]
struct IpcResponse<'a> {
    lines:   &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    report:  Option<&'a CommandReport>,
    state:   LotState,
}

#[derive(serde::Serialize)]
struct LotState {
    season:  Option<SeasonType>,
    objects: Vec<ObjectView>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let config = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => ControllerConfig::load(&w[1])?,
        None => ControllerConfig::default(),
    };

    log::info!("lot-console starting (ipc_mode={ipc_mode})");
    let mut ctx = SeasonalContext::new(config);
    let mut lot = SandboxLot::demo();

    if ipc_mode {
        run_ipc_loop(&mut ctx, &mut lot)
    } else {
        println!("lot-console (session {})", ctx.session_id);
        println!("  commands: seasonal.snapshot_save|snapshot_load|snapshot_clear <season>,");
        println!("            seasonal.snapshot_list, seasonal.set_season <0-3>, objects, quit");
        println!();
        run_console(&mut ctx, &mut lot)
    }
}

fn run_console(ctx: &mut SeasonalContext, lot: &mut SandboxLot) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        match line {
            "" => continue,
            "quit" | "exit" => break,
            "objects" => print_objects(lot),
            _ => match LotCommand::parse(line) {
                Ok(cmd) => {
                    let mut lines: Vec<String> = Vec::new();
                    command::execute(ctx, lot, &cmd, &mut lines);
                    for l in &lines {
                        writeln!(stdout, "{l}")?;
                    }
                }
                Err(e) => writeln!(stdout, "{e}")?,
            },
        }
        stdout.flush()?;
    }
    Ok(())
}

fn run_ipc_loop(ctx: &mut SeasonalContext, lot: &mut SandboxLot) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let request: IpcRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let mut lines: Vec<String> = Vec::new();
        let report = match request {
            IpcRequest::Quit => break,
            IpcRequest::GetState => None,
            IpcRequest::Command { command } => Some(command::execute(ctx, lot, &command, &mut lines)),
        };
        let response = IpcResponse {
            lines:  &lines,
            report: report.as_ref(),
            state:  lot_state(lot),
        };
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn lot_state(lot: &SandboxLot) -> LotState {
    LotState {
        season:  lot.seasons().current,
        objects: lot.objects(),
    }
}

fn print_objects(lot: &SandboxLot) {
    let objects = lot.objects();
    println!("=== LOT OBJECTS ({}) ===", objects.len());
    for o in objects {
        let name = match (o.actor, o.definition) {
            (true, _) => "<sim>".to_string(),
            (false, Some(def)) => lot.definition_name(def).unwrap_or("<unknown>").to_string(),
            (false, None) => "<no definition>".to_string(),
        };
        let p = o.transform.translation;
        println!(
            "  {:<8} {:<16} ({:.1}, {:.1}, {:.1}) level {}",
            o.id.to_string(),
            name,
            p.x,
            p.y,
            p.z,
            o.level.0
        );
    }
}
