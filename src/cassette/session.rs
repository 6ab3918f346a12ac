//! Recording session managing per-port cassette recorders.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// Names the tool version in every cassette.
pub const RECORDED_BY: &str = concat!("devtask ", env!("CARGO_PKG_VERSION"));

/// Manages one `CassetteRecorder` per port for a recording session.
///
/// Each port writes `<port>.cassette.yaml` inside the session directory.
pub struct RecordingSession {
    /// Recorder for launcher interactions.
    pub launcher: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for process table interactions.
    pub processes: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for shell interactions.
    pub shell: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a session writing into `output_dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn at(output_dir: impl Into<PathBuf>) -> Result<Self, String> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir).map_err(|e| {
            format!("Failed to create cassette directory {}: {e}", output_dir.display())
        })?;

        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let make_recorder = |port: &str| -> Arc<Mutex<CassetteRecorder>> {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            let name = format!("{timestamp}-{port}");
            Arc::new(Mutex::new(CassetteRecorder::new(path, name, RECORDED_BY)))
        };

        Ok(Self {
            launcher: make_recorder("launcher"),
            processes: make_recorder("processes"),
            shell: make_recorder("shell"),
            output_dir,
        })
    }

    /// Finish all recorders and write cassette files to disk.
    ///
    /// Ports that saw no interactions are skipped. Every adapter holding a
    /// recorder must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorder is still shared or a file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            if recorder.is_empty() {
                return Ok(());
            }
            tracing::debug!(port, interactions = recorder.len(), "writing cassette");
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.launcher, "launcher")?;
        finish_one(self.processes, "processes")?;
        finish_one(self.shell, "shell")?;

        Ok(self.output_dir)
    }
}
