//! Service context bundling all port trait objects.

use std::path::Path;

use crate::adapters::live::{LiveProcessLauncher, LiveProcessTable, LiveShellExecutor};
use crate::adapters::recording::{
    RecordingProcessLauncher, RecordingProcessTable, RecordingShellExecutor,
};
use crate::adapters::replaying::{
    ReplayingProcessLauncher, ReplayingProcessTable, ReplayingShellExecutor,
};
use crate::cassette::config::CassetteConfig;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::error::PortError;
use crate::ports::{ProcessLauncher, ProcessTable, ShellExecutor, ShellOutput};
use crate::task::CommandLine;

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying).
pub struct ServiceContext {
    /// Spawns the main command of a task.
    pub launcher: Box<dyn ProcessLauncher>,
    /// Finds and signals conflicting processes.
    pub processes: Box<dyn ProcessTable>,
    /// Runs shell cleanup commands.
    pub shell: Box<dyn ShellExecutor>,
}

impl ServiceContext {
    /// Creates a live context backed by the operating system.
    #[must_use]
    pub fn live() -> Self {
        Self {
            launcher: Box::new(LiveProcessLauncher),
            processes: Box::new(LiveProcessTable),
            shell: Box::new(LiveShellExecutor),
        }
    }

    /// Creates a live context whose port calls are captured by a recording
    /// session in `dir`.
    ///
    /// Drop the context before calling [`RecordingSession::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(dir: &Path) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::at(dir)?;
        let ctx = Self {
            launcher: Box::new(RecordingProcessLauncher::new(
                Box::new(LiveProcessLauncher),
                session.launcher.clone(),
            )),
            processes: Box::new(RecordingProcessTable::new(
                Box::new(LiveProcessTable),
                session.processes.clone(),
            )),
            shell: Box::new(RecordingShellExecutor::new(
                Box::new(LiveShellExecutor),
                session.shell.clone(),
            )),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a monolithic cassette file.
    ///
    /// Each port gets its own replayer over the same cassette, so per-port
    /// queues are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = CassetteConfig::read_cassette(path)?;
        Ok(Self {
            launcher: Box::new(ReplayingProcessLauncher::new(CassetteReplayer::new(&cassette))),
            processes: Box::new(ReplayingProcessTable::new(CassetteReplayer::new(&cassette))),
            shell: Box::new(ReplayingShellExecutor::new(CassetteReplayer::new(&cassette))),
        })
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette use an adapter that panics with
    /// a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        Ok(Self {
            launcher: match replayers.launcher {
                Some(r) => Box::new(ReplayingProcessLauncher::new(r)),
                None => Box::new(PanickingProcessLauncher),
            },
            processes: match replayers.processes {
                Some(r) => Box::new(ReplayingProcessTable::new(r)),
                None => Box::new(PanickingProcessTable),
            },
            shell: match replayers.shell {
                Some(r) => Box::new(ReplayingShellExecutor::new(r)),
                None => Box::new(PanickingShellExecutor),
            },
        })
    }
}

// --- Panicking adapters for unspecified ports ---

struct PanickingProcessLauncher;
impl ProcessLauncher for PanickingProcessLauncher {
    fn run_blocking(&self, command: &CommandLine) -> Result<i32, PortError> {
        panic!("Launcher port not configured in CassetteConfig; tried to run {command}");
    }

    fn spawn_detached(&self, command: &CommandLine) -> Result<u32, PortError> {
        panic!("Launcher port not configured in CassetteConfig; tried to spawn {command}");
    }
}

struct PanickingProcessTable;
impl ProcessTable for PanickingProcessTable {
    fn terminate_matching(&self, pattern: &str) -> Result<usize, PortError> {
        panic!("Processes port not configured in CassetteConfig; tried to match {pattern:?}");
    }
}

struct PanickingShellExecutor;
impl ShellExecutor for PanickingShellExecutor {
    fn run(&self, command: &str) -> Result<ShellOutput, PortError> {
        panic!("Shell port not configured in CassetteConfig; tried to run {command:?}");
    }
}
