//! Error types for task resolution and launching.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Boxed error returned by port implementations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that abort a task before or while its main command starts.
///
/// A failing precede step never shows up here; it is reported through
/// [`crate::orchestrator::PrecedeOutcome::Failed`] instead.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The requested task name is not defined.
    #[error("unknown task '{name}' (available: {})", available.join(", "))]
    UnknownTask {
        /// Name that was requested.
        name: String,
        /// Names that would have resolved.
        available: Vec<String>,
    },

    /// Two definitions share a name.
    #[error("task '{0}' is defined more than once")]
    DuplicateTask(String),

    /// A definition has nothing to execute.
    #[error("task '{0}' has an empty command")]
    EmptyCommand(String),

    /// The main command could not be spawned.
    #[error("failed to launch '{}': {source}", program.display())]
    Launch {
        /// Program that failed to start.
        program: PathBuf,
        /// Underlying spawn failure.
        #[source]
        source: PortError,
    },

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A recording session could not be set up or written.
    #[error("recording failed: {0}")]
    Recording(String),
}
