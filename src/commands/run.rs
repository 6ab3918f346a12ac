//! `devtask run` command.

use std::fmt::Write as _;

use crate::context::ServiceContext;
use crate::orchestrator::Orchestrator;
use crate::task::{RunMode, TaskDefinition};

/// Execute `def` and return the exit status for this process.
///
/// A blocking task's status is its child's; a detached task reports its
/// pid on stdout and succeeds.
///
/// # Errors
///
/// Returns an error string if the main command cannot be launched.
pub fn run(ctx: &ServiceContext, def: &TaskDefinition) -> Result<u8, String> {
    let outcome = Orchestrator::new(ctx).run_task(def).map_err(|e| e.to_string())?;
    if let Some(pid) = outcome.pid {
        println!("{} started in the background (pid {pid})", def.name());
    }
    Ok(outcome.exit_status())
}

/// Describe what `run` would do for `def`.
#[must_use]
pub fn render_plan(def: &TaskDefinition) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "task: {} ({})", def.name(), def.run_mode());
    if let Some(step) = def.precede() {
        let _ = writeln!(out, "before: {step}");
    }
    let _ = writeln!(out, "run: {}", def.command());
    if def.run_mode() == RunMode::Detached {
        match &def.command().log_file {
            Some(path) => {
                let _ = writeln!(out, "output: {}", path.display());
            }
            None => {
                let _ = writeln!(out, "output: discarded");
            }
        }
    }
    out
}
