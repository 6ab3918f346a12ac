//! Replaying adapters that replay recorded interactions.

pub mod launcher;
pub mod processes;
pub mod shell;

pub use launcher::ReplayingProcessLauncher;
pub use processes::ReplayingProcessTable;
pub use shell::ReplayingShellExecutor;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;

/// Serve the next recorded `Result` for `port`/`method`.
///
/// Mirror of `recording::record_result`: `{"err": msg}` becomes an error
/// carrying `msg`, `{"ok": v}` (or a bare value) is deserialized into `T`.
pub(crate) fn replay_result<T>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<T, PortError>
where
    T: DeserializeOwned,
{
    let output = {
        let mut replayer = replayer.lock().map_err(|_| "replayer lock poisoned")?;
        replayer.next_interaction(port, method).output
    };
    if let Some(err) = output.get("err") {
        return Err(err.as_str().unwrap_or("unknown error").to_string().into());
    }
    let value = output.get("ok").cloned().unwrap_or(output);
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;

    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::replayer::CassetteReplayer;

    pub fn make_replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            recorded_by: "test".into(),
            interactions,
        };
        CassetteReplayer::new(&cassette)
    }

    pub fn interaction(
        seq: u64,
        port: &str,
        method: &str,
        input: serde_json::Value,
        output: serde_json::Value,
    ) -> Interaction {
        Interaction { seq, port: port.into(), method: method.into(), input, output }
    }
}
