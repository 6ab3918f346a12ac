//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between task orchestration and the
//! operating system (process spawning, the process table, the shell).
//! Implementations live in `src/adapters/`.

pub mod launcher;
pub mod processes;
pub mod shell;

pub use launcher::ProcessLauncher;
pub use processes::ProcessTable;
pub use shell::{ShellExecutor, ShellOutput};
