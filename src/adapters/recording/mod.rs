//! Recording adapters that capture interactions to cassettes.

pub mod launcher;
pub mod processes;
pub mod shell;

pub use launcher::RecordingProcessLauncher;
pub use processes::RecordingProcessTable;
pub use shell::RecordingShellExecutor;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

/// Record a `Result<T, E>` interaction using the ok/err JSON convention.
///
/// Mirror of `replaying::replay_result`.
///
/// Convention:
/// - `Ok(v)` is serialized as `{"ok": v}`
/// - `Err(e)` is serialized as `{"err": e.to_string()}`
///
/// A value that fails to serialize is recorded as `null` rather than
/// interrupting the command being recorded.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).unwrap_or_default();

    let output_json = match result {
        Ok(v) => serde_json::json!({ "ok": serde_json::to_value(v).unwrap_or_default() }),
        Err(e) => serde_json::json!({ "err": e.to_string() }),
    };

    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input_json, output_json),
        Err(_) => tracing::warn!(port, method, "recorder lock poisoned, interaction dropped"),
    }
}
