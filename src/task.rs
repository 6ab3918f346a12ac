//! Task definitions and the name-to-task table built from configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::OrchestratorConfig;
use crate::error::OrchestratorError;

/// Script that runs the local development server.
pub const DEV_SERVER_SCRIPT: &str = "dev_appserver.py";

/// Script that uploads the application.
pub const DEPLOY_SCRIPT: &str = "appcfg.py";

/// Whether the caller waits for the main command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Wait for the child and propagate its exit code.
    #[default]
    #[serde(alias = "foreground")]
    Blocking,
    /// Start the child and return immediately.
    #[serde(alias = "background")]
    Detached,
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blocking" | "foreground" => Ok(Self::Blocking),
            "detached" | "background" => Ok(Self::Detached),
            other => Err(format!("'{other}' is not one of blocking, detached")),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocking => f.pad("blocking"),
            Self::Detached => f.pad("detached"),
        }
    }
}

/// Best-effort cleanup executed right before the main command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precede {
    /// Signal every process whose command line contains `pattern`.
    TerminateMatching {
        /// Substring matched against full command lines.
        pattern: String,
    },
    /// Run a command through the system shell.
    Shell {
        /// Command string passed to the shell.
        command: String,
    },
}

impl fmt::Display for Precede {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TerminateMatching { pattern } => write!(f, "terminate processes matching '{pattern}'"),
            Self::Shell { command } => write!(f, "sh: {command}"),
        }
    }
}

/// An executable invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLine {
    /// Program to execute.
    pub program: PathBuf,
    /// Arguments passed after the program.
    pub args: Vec<String>,
    /// Output destination for a detached child.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl CommandLine {
    /// Creates a command line without a log file.
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { program: program.into(), args: args.into_iter().map(Into::into).collect(), log_file: None }
    }

    /// True when there is no program to run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.program.as_os_str().is_empty()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// A named, runnable task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    name: String,
    command: CommandLine,
    run_mode: RunMode,
    precede: Option<Precede>,
}

impl TaskDefinition {
    /// Creates a definition.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::EmptyCommand`] if `command` has no program.
    pub fn new(
        name: impl Into<String>,
        command: CommandLine,
        run_mode: RunMode,
        precede: Option<Precede>,
    ) -> Result<Self, OrchestratorError> {
        let name = name.into();
        if command.is_empty() {
            return Err(OrchestratorError::EmptyCommand(name));
        }
        Ok(Self { name, command, run_mode, precede })
    }

    /// Task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Main command.
    #[must_use]
    pub fn command(&self) -> &CommandLine {
        &self.command
    }

    /// Run mode of the main command.
    #[must_use]
    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    /// Cleanup step, if any.
    #[must_use]
    pub fn precede(&self) -> Option<&Precede> {
        self.precede.as_ref()
    }
}

/// Immutable set of task definitions plus aliases, keyed by exact name.
#[derive(Debug, Clone, Default)]
pub struct TaskSet {
    tasks: BTreeMap<String, TaskDefinition>,
    aliases: BTreeMap<String, String>,
}

impl TaskSet {
    /// Builds a set from definitions.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::DuplicateTask`] if two definitions share a name.
    pub fn new(definitions: impl IntoIterator<Item = TaskDefinition>) -> Result<Self, OrchestratorError> {
        let mut tasks = BTreeMap::new();
        for def in definitions {
            let name = def.name.clone();
            if tasks.insert(name.clone(), def).is_some() {
                return Err(OrchestratorError::DuplicateTask(name));
            }
        }
        Ok(Self { tasks, aliases: BTreeMap::new() })
    }

    /// Adds `alias` as another name for the existing task `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if `alias` is already taken or `target` is unknown.
    pub fn with_alias(mut self, alias: &str, target: &str) -> Result<Self, OrchestratorError> {
        if self.tasks.contains_key(alias) || self.aliases.contains_key(alias) {
            return Err(OrchestratorError::DuplicateTask(alias.to_string()));
        }
        if !self.tasks.contains_key(target) {
            return Err(self.unknown(target));
        }
        self.aliases.insert(alias.to_string(), target.to_string());
        Ok(self)
    }

    /// The `serve` and `deploy` tasks for one configuration, with `develop`
    /// as an alias of `serve`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the built-in table is inconsistent.
    pub fn from_config(config: &OrchestratorConfig) -> Result<Self, OrchestratorError> {
        let serve = TaskDefinition::new(
            "serve",
            serve_command(config),
            config.serve_mode,
            Some(serve_precede(config)),
        )?;
        let deploy = TaskDefinition::new("deploy", deploy_command(config), RunMode::Blocking, None)?;
        Self::new([serve, deploy])?.with_alias("develop", "serve")
    }

    /// Looks a task up by exact, case-sensitive name or alias.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::UnknownTask`] when nothing matches.
    pub fn resolve(&self, name: &str) -> Result<&TaskDefinition, OrchestratorError> {
        let key = self.aliases.get(name).map_or(name, String::as_str);
        self.tasks.get(key).ok_or_else(|| self.unknown(name))
    }

    /// Every task name followed by every alias, sorted within each group.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.tasks.keys().chain(self.aliases.keys()).cloned().collect()
    }

    /// Task definitions in name order.
    pub fn tasks(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.tasks.values()
    }

    /// Alias pairs `(alias, target)` in alias order.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, t)| (a.as_str(), t.as_str()))
    }

    fn unknown(&self, name: &str) -> OrchestratorError {
        OrchestratorError::UnknownTask { name: name.to_string(), available: self.names() }
    }
}

fn serve_command(config: &OrchestratorConfig) -> CommandLine {
    let mut args = vec![format!("--port={}", config.port)];
    if let Some(host) = &config.host {
        args.push(format!("--host={host}"));
    }
    args.push(path_arg(&config.source_dir));
    let mut command = CommandLine::new(config.sdk_path.join(DEV_SERVER_SCRIPT), args);
    command.log_file.clone_from(&config.log_file);
    command
}

fn serve_precede(config: &OrchestratorConfig) -> Precede {
    match &config.kill_command {
        Some(command) => Precede::Shell { command: command.clone() },
        None => Precede::TerminateMatching { pattern: config.conflict_pattern.clone() },
    }
}

fn deploy_command(config: &OrchestratorConfig) -> CommandLine {
    CommandLine::new(
        config.sdk_path.join(DEPLOY_SCRIPT),
        ["--oauth2".to_string(), "update".to_string(), path_arg(&config.source_dir)],
    )
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
