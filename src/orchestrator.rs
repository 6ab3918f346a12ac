//! Runs a task: optional cleanup step, then the main command.
//!
//! Each call is one linear sequence. The precede step always finishes (or
//! fails) before the main command starts, and its failure never stops the
//! launch. Only a main command that cannot be spawned is an error; a child
//! exiting non-zero is reported through [`ExitOutcome::code`].

use tracing::{debug, info, warn};

use crate::context::ServiceContext;
use crate::error::OrchestratorError;
use crate::task::{Precede, RunMode, TaskDefinition};

/// What happened during the cleanup step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrecedeOutcome {
    /// The process table was searched; `count` processes were signalled.
    Terminated {
        /// Number of processes signalled.
        count: usize,
    },
    /// The shell command exited with status 0.
    Completed,
    /// The step failed and was ignored.
    Failed {
        /// Why it failed.
        reason: String,
    },
}

/// Result of running one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Child exit code; `None` for detached launches.
    pub code: Option<i32>,
    /// Whether the main command was started.
    pub launched: bool,
    /// Pid of a detached child.
    pub pid: Option<u32>,
    /// Cleanup result, when the task has a cleanup step.
    pub precede: Option<PrecedeOutcome>,
}

impl ExitOutcome {
    /// Exit status this process should end with.
    ///
    /// Detached launches report success. A blocking child's code is passed
    /// through when it fits in a byte; any other non-zero code becomes 1 so
    /// that a failure is never truncated into success.
    #[must_use]
    pub fn exit_status(&self) -> u8 {
        match self.code {
            None | Some(0) => 0,
            Some(code) => u8::try_from(code).unwrap_or(1),
        }
    }
}

/// Executes task definitions against a set of ports.
pub struct Orchestrator<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> Orchestrator<'a> {
    /// Creates an orchestrator using `ctx` for all process operations.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Runs `def`'s cleanup step, if any, then its main command.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::Launch`] if the main command cannot be
    /// spawned. Cleanup failures are recorded in the outcome instead.
    pub fn run_task(&self, def: &TaskDefinition) -> Result<ExitOutcome, OrchestratorError> {
        let precede = def.precede().map(|step| self.run_precede(def.name(), step));
        let command = def.command();
        let launch_error = |source| OrchestratorError::Launch {
            program: command.program.clone(),
            source,
        };

        info!(task = def.name(), mode = %def.run_mode(), %command, "launching");
        match def.run_mode() {
            RunMode::Blocking => {
                let code = self.ctx.launcher.run_blocking(command).map_err(launch_error)?;
                if code == 0 {
                    debug!(task = def.name(), "child exited cleanly");
                } else {
                    info!(task = def.name(), code, "child exited with non-zero status");
                }
                Ok(ExitOutcome { code: Some(code), launched: true, pid: None, precede })
            }
            RunMode::Detached => {
                let pid = self.ctx.launcher.spawn_detached(command).map_err(launch_error)?;
                info!(task = def.name(), pid, "child detached");
                Ok(ExitOutcome { code: None, launched: true, pid: Some(pid), precede })
            }
        }
    }

    fn run_precede(&self, task: &str, step: &Precede) -> PrecedeOutcome {
        let outcome = match step {
            Precede::TerminateMatching { pattern } => {
                match self.ctx.processes.terminate_matching(pattern) {
                    Ok(count) => PrecedeOutcome::Terminated { count },
                    Err(e) => PrecedeOutcome::Failed { reason: e.to_string() },
                }
            }
            Precede::Shell { command } => match self.ctx.shell.run(command) {
                Ok(output) if output.success() => PrecedeOutcome::Completed,
                Ok(output) => {
                    let stderr = output.stderr.trim();
                    let reason = if stderr.is_empty() {
                        format!("exited with code {}", output.exit_code)
                    } else {
                        format!("exited with code {}: {stderr}", output.exit_code)
                    };
                    PrecedeOutcome::Failed { reason }
                }
                Err(e) => PrecedeOutcome::Failed { reason: e.to_string() },
            },
        };

        match &outcome {
            PrecedeOutcome::Failed { reason } => {
                warn!(task, %step, %reason, "cleanup step failed, continuing");
            }
            PrecedeOutcome::Terminated { count } => {
                debug!(task, %step, count, "cleanup step finished");
            }
            PrecedeOutcome::Completed => debug!(task, %step, "cleanup step finished"),
        }
        outcome
    }
}
