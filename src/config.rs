//! Layered configuration for the SDK location and dev-server settings.
//!
//! Values are resolved in order, each layer overriding the previous one:
//! built-in defaults, the YAML file, `DEVTASK_*` environment variables and
//! finally command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::task::RunMode;

/// Config file looked up in the working directory when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "devtask.yaml";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "DEVTASK_CONFIG";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file that was asked for explicitly does not exist.
    #[error("config file '{}' does not exist", .0.display())]
    MissingFile(PathBuf),

    /// The config file exists but could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for this schema.
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Underlying YAML failure.
        #[source]
        source: serde_yaml::Error,
    },

    /// A setting holds a value that cannot be used.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Setting or variable name.
        key: String,
        /// What is wrong with it.
        message: String,
    },
}

/// Settings shared by every task definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Directory holding `dev_appserver.py` and `appcfg.py`.
    pub sdk_path: PathBuf,
    /// Port for the development server.
    pub port: u16,
    /// Address the development server binds to, when not the SDK default.
    pub host: Option<String>,
    /// Application source directory handed to both tools.
    pub source_dir: PathBuf,
    /// Whether `serve` blocks or detaches.
    pub serve_mode: RunMode,
    /// Command-line fragment identifying a previous development server.
    pub conflict_pattern: String,
    /// Shell command replacing the built-in conflict cleanup.
    pub kill_command: Option<String>,
    /// Where a detached server writes its output.
    pub log_file: Option<PathBuf>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            sdk_path: PathBuf::from("~/src/go_appengine"),
            port: 9996,
            host: None,
            source_dir: PathBuf::from("src"),
            serve_mode: RunMode::Blocking,
            conflict_pattern: "dev_appserver".to_string(),
            kill_command: None,
            log_file: None,
        }
    }
}

/// Values supplied on the command line. `None` leaves the setting alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replacement SDK directory.
    pub sdk_path: Option<PathBuf>,
    /// Replacement port.
    pub port: Option<u16>,
    /// Replacement bind address.
    pub host: Option<String>,
    /// Replacement source directory.
    pub source_dir: Option<PathBuf>,
    /// Replacement run mode for `serve`.
    pub serve_mode: Option<RunMode>,
    /// Replacement log file for detached output.
    pub log_file: Option<PathBuf>,
}

impl OrchestratorConfig {
    /// Builds the effective configuration from every layer.
    ///
    /// `explicit` is the `--config` flag; when absent, `DEVTASK_CONFIG` and
    /// then [`DEFAULT_CONFIG_FILE`] are tried.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be loaded, an environment value is
    /// malformed, or the merged result fails validation.
    pub fn layered(
        explicit: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = Self::load(explicit.or(env_path.as_deref()))?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_overrides(overrides);
        config.expand_home();
        config.validate()?;
        Ok(config)
    }

    /// Loads the YAML file, falling back to defaults when no file was named
    /// and the default file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if a named file is missing or any file is unreadable
    /// or malformed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        let config = Self::parse(&content, &path)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Parses YAML content; `path` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the content does not match the schema.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Applies `DEVTASK_*` variables obtained through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or run-mode variable cannot be parsed.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("DEVTASK_SDK_PATH") {
            self.sdk_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("DEVTASK_PORT") {
            self.port = value.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "DEVTASK_PORT".into(),
                message: format!("'{value}': {e}"),
            })?;
        }
        if let Some(value) = lookup("DEVTASK_HOST") {
            self.host = non_empty(value);
        }
        if let Some(value) = lookup("DEVTASK_SOURCE_DIR") {
            self.source_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("DEVTASK_SERVE_MODE") {
            self.serve_mode = value.parse().map_err(|message| ConfigError::InvalidValue {
                key: "DEVTASK_SERVE_MODE".into(),
                message,
            })?;
        }
        if let Some(value) = lookup("DEVTASK_CONFLICT_PATTERN") {
            self.conflict_pattern = value;
        }
        if let Some(value) = lookup("DEVTASK_KILL_COMMAND") {
            self.kill_command = non_empty(value);
        }
        if let Some(value) = lookup("DEVTASK_LOG_FILE") {
            self.log_file = non_empty(value).map(PathBuf::from);
        }
        Ok(())
    }

    /// Applies command-line values on top of everything else.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(path) = &overrides.sdk_path {
            self.sdk_path.clone_from(path);
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(host) = &overrides.host {
            self.host = Some(host.clone());
        }
        if let Some(dir) = &overrides.source_dir {
            self.source_dir.clone_from(dir);
        }
        if let Some(mode) = overrides.serve_mode {
            self.serve_mode = mode;
        }
        if let Some(path) = &overrides.log_file {
            self.log_file = Some(path.clone());
        }
    }

    /// Expands a leading `~` in every path setting.
    pub fn expand_home(&mut self) {
        self.sdk_path = expand_home(&self.sdk_path);
        self.source_dir = expand_home(&self.source_dir);
        if let Some(path) = &self.log_file {
            self.log_file = Some(expand_home(path));
        }
    }

    /// Checks settings that no layer is allowed to leave invalid.
    ///
    /// # Errors
    ///
    /// Returns an error for port 0, or for an empty conflict pattern when
    /// no `kill_command` replaces the built-in cleanup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "port".into(),
                message: "must be between 1 and 65535".into(),
            });
        }
        if self.kill_command.is_none() && self.conflict_pattern.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "conflict_pattern".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Replaces a leading `~` with the home directory, when one is known.
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
