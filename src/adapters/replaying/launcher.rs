//! Replaying adapter for the `ProcessLauncher` port.

use std::sync::Mutex;

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::ProcessLauncher;
use crate::task::CommandLine;

/// Replays recorded exit codes and pids from a cassette.
pub struct ReplayingProcessLauncher {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingProcessLauncher {
    /// Creates a new replaying launcher from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ProcessLauncher for ReplayingProcessLauncher {
    fn run_blocking(&self, _command: &CommandLine) -> Result<i32, PortError> {
        replay_result(&self.replayer, "launcher", "run_blocking")
    }

    fn spawn_detached(&self, _command: &CommandLine) -> Result<u32, PortError> {
        replay_result(&self.replayer, "launcher", "spawn_detached")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::test_support::{interaction, make_replayer};
    use serde_json::json;

    #[test]
    fn replays_blocking_and_detached_calls_independently() {
        let replayer = make_replayer(vec![
            interaction(0, "launcher", "spawn_detached", json!({}), json!({"ok": 4242})),
            interaction(1, "launcher", "run_blocking", json!({}), json!({"ok": 7})),
        ]);
        let launcher = ReplayingProcessLauncher::new(replayer);
        let line = CommandLine::new("appcfg.py", ["update"]);

        assert_eq!(launcher.run_blocking(&line).unwrap(), 7);
        assert_eq!(launcher.spawn_detached(&line).unwrap(), 4242);
    }

    #[test]
    fn replays_spawn_failure() {
        let replayer = make_replayer(vec![interaction(
            0,
            "launcher",
            "run_blocking",
            json!({}),
            json!({"err": "No such file or directory (os error 2)"}),
        )]);
        let launcher = ReplayingProcessLauncher::new(replayer);
        let err = launcher.run_blocking(&CommandLine::new("missing", ["x"])).unwrap_err();
        assert!(err.to_string().contains("os error 2"));
    }
}
