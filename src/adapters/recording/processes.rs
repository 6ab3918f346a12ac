//! Recording adapter for the `ProcessTable` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::PortError;
use crate::ports::ProcessTable;

/// Records process-table calls while delegating to an inner implementation.
pub struct RecordingProcessTable {
    inner: Box<dyn ProcessTable>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingProcessTable {
    /// Creates a new recording process table wrapping the given implementation.
    pub fn new(inner: Box<dyn ProcessTable>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct PatternInput<'a> {
    pattern: &'a str,
}

impl ProcessTable for RecordingProcessTable {
    fn terminate_matching(&self, pattern: &str) -> Result<usize, PortError> {
        let result = self.inner.terminate_matching(pattern);
        record_result(&self.recorder, "processes", "terminate_matching", &PatternInput { pattern }, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::processes::LiveProcessTable;

    #[test]
    fn records_terminate_interaction() {
        let dir = tempfile::tempdir().unwrap();
        let cassette_path = dir.path().join("processes.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test", "abc")));

        {
            let table =
                RecordingProcessTable::new(Box::new(LiveProcessTable), Arc::clone(&recorder));
            assert_eq!(table.terminate_matching("devtask-absent-7c2e").unwrap(), 0);
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let content = std::fs::read_to_string(&cassette_path).unwrap();
        assert!(content.contains("terminate_matching"));
        assert!(content.contains("devtask-absent-7c2e"));
    }
}
