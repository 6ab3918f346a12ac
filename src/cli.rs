//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigOverrides;
use crate::task::RunMode;

/// Top-level CLI parser for `devtask`.
#[derive(Debug, Parser)]
#[command(
    name = "devtask",
    version,
    about = "Serve and deploy an App Engine project through the local SDK tools"
)]
pub struct Cli {
    /// Settings shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Options that override configuration values.
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Config file to load instead of ./devtask.yaml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Directory containing dev_appserver.py and appcfg.py.
    #[arg(long, global = true, value_name = "DIR")]
    pub sdk: Option<PathBuf>,
    /// Port for the development server.
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,
    /// Address the development server binds to.
    #[arg(long, global = true, value_name = "ADDR")]
    pub host: Option<String>,
    /// Application source directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,
    /// Start the development server in the background.
    #[arg(long, global = true, conflicts_with = "foreground")]
    pub detach: bool,
    /// Keep the development server in the foreground.
    #[arg(long, global = true)]
    pub foreground: bool,
    /// File receiving a background server's output.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    /// Log what devtask is doing.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Configuration overrides expressed by these flags.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        let serve_mode = if self.detach {
            Some(RunMode::Detached)
        } else if self.foreground {
            Some(RunMode::Blocking)
        } else {
            None
        };
        ConfigOverrides {
            sdk_path: self.sdk.clone(),
            port: self.port,
            host: self.host.clone(),
            source_dir: self.source_dir.clone(),
            serve_mode,
            log_file: self.log_file.clone(),
        }
    }
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a task: serve, deploy, or develop (alias of serve).
    Run {
        /// Task name, matched exactly.
        task: String,
        /// Print what would run without starting anything.
        #[arg(long)]
        dry_run: bool,
    },
    /// List tasks and the commands they run.
    List,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use crate::task::RunMode;
    use clap::Parser;

    #[test]
    fn parses_run_subcommand() {
        let cli = Cli::parse_from(["devtask", "run", "serve"]);
        assert!(matches!(cli.command, Command::Run { ref task, dry_run: false } if task == "serve"));
    }

    #[test]
    fn parses_list_subcommand() {
        let cli = Cli::parse_from(["devtask", "list"]);
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn global_flags_become_overrides() {
        let cli = Cli::parse_from([
            "devtask", "run", "serve", "--detach", "--port", "8080", "--host", "0.0.0.0",
        ]);
        let overrides = cli.global.overrides();
        assert_eq!(overrides.serve_mode, Some(RunMode::Detached));
        assert_eq!(overrides.port, Some(8080));
        assert_eq!(overrides.host.as_deref(), Some("0.0.0.0"));
        assert!(overrides.sdk_path.is_none());
    }

    #[test]
    fn detach_and_foreground_conflict() {
        assert!(Cli::try_parse_from(["devtask", "run", "serve", "--detach", "--foreground"]).is_err());
    }

    #[test]
    fn port_zero_is_rejected() {
        assert!(Cli::try_parse_from(["devtask", "list", "--port", "0"]).is_err());
    }

    #[test]
    fn run_requires_a_task() {
        assert!(Cli::try_parse_from(["devtask", "run"]).is_err());
    }
}
