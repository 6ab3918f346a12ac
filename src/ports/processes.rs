//! Process table port for best-effort conflict cleanup.

use crate::error::PortError;

/// Finds and signals running processes.
pub trait ProcessTable: Send + Sync {
    /// Sends a termination signal to every process, other than the caller,
    /// whose full command line contains `pattern`.
    ///
    /// Returns how many processes were signalled; zero matches is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if the process table cannot be read.
    fn terminate_matching(&self, pattern: &str) -> Result<usize, PortError>;
}
