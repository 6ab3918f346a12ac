//! Live adapters for real external interactions.

pub mod launcher;
pub mod processes;
pub mod shell;

pub use launcher::LiveProcessLauncher;
pub use processes::LiveProcessTable;
pub use shell::LiveShellExecutor;
