//! Replaying adapter for the `ProcessTable` port.

use std::sync::Mutex;

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::ProcessTable;

/// Replays recorded termination counts from a cassette.
pub struct ReplayingProcessTable {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingProcessTable {
    /// Creates a new replaying process table from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ProcessTable for ReplayingProcessTable {
    fn terminate_matching(&self, _pattern: &str) -> Result<usize, PortError> {
        replay_result(&self.replayer, "processes", "terminate_matching")
    }
}
