//! Process launcher port for the main command of a task.

use crate::error::PortError;
use crate::task::CommandLine;

/// Starts child processes.
///
/// Abstracting process creation allows deterministic replay by recording
/// and replaying exit codes and pids during cassette playback.
pub trait ProcessLauncher: Send + Sync {
    /// Spawns `command` with inherited stdio and waits for it to exit.
    ///
    /// Returns the child's exit code. A child killed by signal `N` reports
    /// `128 + N`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or waited on.
    fn run_blocking(&self, command: &CommandLine) -> Result<i32, PortError>;

    /// Spawns `command` in its own process group and returns its pid
    /// without waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn spawn_detached(&self, command: &CommandLine) -> Result<u32, PortError>;
}
