//! Core library entry for the `devtask` CLI.
//!
//! `devtask` replaces per-machine task-runner scripts that shell out to the
//! App Engine SDK: `serve` starts `dev_appserver.py` after clearing out any
//! previous instance, `deploy` runs `appcfg.py`.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod ports;
pub mod task;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Run the CLI with the provided arguments and return the exit status.
///
/// Help, version and usage errors are printed by clap and reported through
/// the returned status.
///
/// # Errors
///
/// Returns an error string when configuration, task resolution or launching
/// fails.
pub fn run<I, T>(args: I) -> Result<u8, String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return Ok(u8::try_from(err.exit_code()).unwrap_or(2));
        }
    };
    init_tracing(cli.global.verbose);
    commands::dispatch(&cli)
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence over
/// `verbose`; a second call is a no-op.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
