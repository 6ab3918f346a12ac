//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a path panic if they are
/// called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the launcher port cassette file.
    pub launcher: Option<PathBuf>,
    /// Path to the process table port cassette file.
    pub processes: Option<PathBuf>,
    /// Path to the shell port cassette file.
    pub shell: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the launcher port.
    pub launcher: Option<CassetteReplayer>,
    /// Replayer for the process table port.
    pub processes: Option<CassetteReplayer>,
    /// Replayer for the shell port.
    pub shell: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Reads per-port cassettes from a recording directory, using every
    /// `<port>.cassette.yaml` file that exists.
    #[must_use]
    pub fn from_dir(dir: &Path) -> Self {
        let existing = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            path.exists().then_some(path)
        };
        Self {
            launcher: existing("launcher"),
            processes: existing("processes"),
            shell: existing("shell"),
        }
    }

    /// Read and parse a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read_cassette(path: &Path) -> Result<Cassette, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
    }

    /// Load a single cassette file and create a replayer for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_replayer(path: &Path) -> Result<CassetteReplayer, String> {
        Self::read_cassette(path).map(|cassette| CassetteReplayer::new(&cassette))
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            launcher: self.launcher.as_deref().map(Self::load_replayer).transpose()?,
            processes: self.processes.as_deref().map(Self::load_replayer).transpose()?,
            shell: self.shell.as_deref().map(Self::load_replayer).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use serde_json::json;

    #[test]
    fn from_dir_picks_up_existing_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder =
            CassetteRecorder::new(dir.path().join("launcher.cassette.yaml"), "t", "test");
        recorder.record("launcher", "run_blocking", json!({}), json!({"ok": 0}));
        recorder.finish().unwrap();

        let config = CassetteConfig::from_dir(dir.path());
        assert!(config.launcher.is_some());
        assert!(config.processes.is_none());
        assert!(config.shell.is_none());
    }

    #[test]
    fn load_per_port_cassettes() {
        let dir = tempfile::tempdir().unwrap();

        let launcher_path = dir.path().join("launcher.cassette.yaml");
        let mut recorder = CassetteRecorder::new(&launcher_path, "t-launcher", "test");
        recorder.record("launcher", "spawn_detached", json!({}), json!({"ok": 99}));
        recorder.finish().unwrap();

        let shell_path = dir.path().join("shell.cassette.yaml");
        let mut recorder = CassetteRecorder::new(&shell_path, "t-shell", "test");
        recorder.record(
            "shell",
            "run",
            json!({"command": "true"}),
            json!({"ok": {"exit_code": 0, "stdout": "", "stderr": ""}}),
        );
        recorder.finish().unwrap();

        let config = CassetteConfig {
            launcher: Some(launcher_path),
            shell: Some(shell_path),
            ..CassetteConfig::default()
        };
        let mut replayers = config.load_all().unwrap();

        let launcher = replayers.launcher.as_mut().unwrap();
        assert_eq!(launcher.next_interaction("launcher", "spawn_detached").output, json!({"ok": 99}));
        let shell = replayers.shell.as_mut().unwrap();
        assert_eq!(shell.next_interaction("shell", "run").seq, 0);
        assert!(replayers.processes.is_none());
    }

    #[test]
    fn unreadable_cassette_is_reported() {
        let config = CassetteConfig {
            launcher: Some(PathBuf::from("/nonexistent/launcher.cassette.yaml")),
            ..CassetteConfig::default()
        };
        let err = config.load_all().err().unwrap();
        assert!(err.contains("Failed to read cassette file"));
    }

    #[test]
    fn malformed_cassette_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.cassette.yaml");
        std::fs::write(&path, "interactions: 12").unwrap();
        let err = CassetteConfig::load_replayer(&path).err().unwrap();
        assert!(err.contains("Failed to parse cassette file"));
    }
}
