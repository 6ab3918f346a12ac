//! Command dispatch and handlers.

pub mod list;
pub mod run;

use std::env;
use std::path::PathBuf;

use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command};
use crate::config::OrchestratorConfig;
use crate::context::ServiceContext;
use crate::error::OrchestratorError;
use crate::task::TaskSet;

/// Environment variable naming a directory to record port interactions into.
pub const RECORD_ENV: &str = "DEVTASK_RECORD";

/// Dispatch a parsed command to its handler and return the exit status.
///
/// When `DEVTASK_RECORD` is set to a directory path, all port interactions
/// are recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns an error string if configuration cannot be loaded, the task name
/// does not resolve, or the main command cannot be launched.
pub fn dispatch(cli: &Cli) -> Result<u8, String> {
    let config = load_config(cli).map_err(|e| e.to_string())?;
    let tasks = TaskSet::from_config(&config).map_err(|e| e.to_string())?;

    match &cli.command {
        Command::List => {
            print!("{}", list::render(&tasks));
            Ok(0)
        }
        Command::Run { task, dry_run } => {
            // Resolve before any port exists so an unknown name spawns nothing.
            let def = tasks.resolve(task).map_err(|e| e.to_string())?;
            if *dry_run {
                print!("{}", run::render_plan(def));
                return Ok(0);
            }
            with_context(|ctx| run::run(ctx, def))
        }
    }
}

fn load_config(cli: &Cli) -> Result<OrchestratorConfig, OrchestratorError> {
    Ok(OrchestratorConfig::layered(cli.global.config.as_deref(), &cli.global.overrides())?)
}

/// Run `f` against a live context, recording it when `DEVTASK_RECORD` is set.
fn with_context<F>(f: F) -> Result<u8, String>
where
    F: FnOnce(&ServiceContext) -> Result<u8, String>,
{
    let Ok(path) = env::var(RECORD_ENV) else {
        return f(&ServiceContext::live());
    };

    let (ctx, session) = ServiceContext::recording_at(&PathBuf::from(path))
        .map_err(|e| OrchestratorError::Recording(e).to_string())?;
    let result = f(&ctx);

    // Finish recording after command completes (even on error).
    // Drop context first to release Arc references.
    drop(ctx);
    finish_recording(session)?;

    result
}

/// Finish a recording session and report the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir =
        session.finish().map_err(|e| OrchestratorError::Recording(e).to_string())?;
    tracing::info!(dir = %output_dir.display(), "recording saved");
    Ok(())
}
