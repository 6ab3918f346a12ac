//! Recording adapter for the `ProcessLauncher` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::PortError;
use crate::ports::ProcessLauncher;
use crate::task::CommandLine;

/// Records launches while delegating to an inner launcher.
pub struct RecordingProcessLauncher {
    inner: Box<dyn ProcessLauncher>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingProcessLauncher {
    /// Creates a new recording launcher wrapping the given implementation.
    pub fn new(inner: Box<dyn ProcessLauncher>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ProcessLauncher for RecordingProcessLauncher {
    fn run_blocking(&self, command: &CommandLine) -> Result<i32, PortError> {
        let result = self.inner.run_blocking(command);
        record_result(&self.recorder, "launcher", "run_blocking", command, &result);
        result
    }

    fn spawn_detached(&self, command: &CommandLine) -> Result<u32, PortError> {
        let result = self.inner.spawn_detached(command);
        record_result(&self.recorder, "launcher", "spawn_detached", command, &result);
        result
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::adapters::live::launcher::LiveProcessLauncher;
    use crate::cassette::format::Cassette;

    #[test]
    fn records_exit_codes_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        let cassette_path = dir.path().join("launcher.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test", "abc")));

        {
            let launcher =
                RecordingProcessLauncher::new(Box::new(LiveProcessLauncher), Arc::clone(&recorder));
            assert_eq!(launcher.run_blocking(&CommandLine::new("sh", ["-c", "exit 4"])).unwrap(), 4);
            assert!(launcher.run_blocking(&CommandLine::new("/nonexistent/tool", ["x"])).is_err());
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let content = std::fs::read_to_string(&cassette_path).unwrap();
        let cassette: Cassette = serde_yaml::from_str(&content).unwrap();
        assert_eq!(cassette.interactions.len(), 2);
        assert_eq!(cassette.interactions[0].method, "run_blocking");
        assert_eq!(cassette.interactions[0].input["program"], "sh");
        assert_eq!(cassette.interactions[0].output["ok"], 4);
        assert!(cassette.interactions[1].output.get("err").is_some());
    }
}
