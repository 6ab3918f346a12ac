//! Live process table backed by `sysinfo`.

use std::ffi::OsString;

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, Signal, System, UpdateKind};
use tracing::{debug, warn};

use crate::error::PortError;
use crate::ports::processes::ProcessTable;

/// Live process table that enumerates and signals real processes.
///
/// Matching follows `pkill -f`: the pattern is looked up as a plain,
/// case-sensitive substring of the whole command line. Thread entries are
/// skipped, so a process counts once and the caller's own threads are
/// never signalled.
pub struct LiveProcessTable;

impl ProcessTable for LiveProcessTable {
    fn terminate_matching(&self, pattern: &str) -> Result<usize, PortError> {
        let own_pid = sysinfo::get_current_pid()?;
        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::new().with_cmd(UpdateKind::Always),
        );

        let mut signalled = 0;
        for (pid, process) in system.processes() {
            // On Linux each thread is listed with its tid as pid; signalling
            // one terminates its whole thread group.
            if process.thread_kind().is_some() {
                continue;
            }
            if *pid == own_pid || !command_matches(process.cmd(), pattern) {
                continue;
            }
            // Windows has no SIGTERM; fall back to the platform's hard kill.
            let sent = process.kill_with(Signal::Term).unwrap_or_else(|| process.kill());
            if sent {
                debug!(pid = pid.as_u32(), pattern, "signalled matching process");
                signalled += 1;
            } else {
                warn!(pid = pid.as_u32(), pattern, "could not signal matching process");
            }
        }
        Ok(signalled)
    }
}

fn command_matches(args: &[OsString], pattern: &str) -> bool {
    if pattern.is_empty() || args.is_empty() {
        return false;
    }
    let joined = args.iter().map(|a| a.to_string_lossy()).collect::<Vec<_>>().join(" ");
    joined.contains(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<OsString> {
        parts.iter().map(OsString::from).collect()
    }

    #[test]
    fn matches_anywhere_in_command_line() {
        let cmd = args(&["python2", "/home/me/src/go_appengine/dev_appserver.py", "--port=9996"]);
        assert!(command_matches(&cmd, "dev_appserver"));
        assert!(command_matches(&cmd, "python2 /home"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let cmd = args(&["dev_appserver.py"]);
        assert!(!command_matches(&cmd, "DEV_APPSERVER"));
    }

    #[test]
    fn empty_inputs_never_match() {
        assert!(!command_matches(&[], "dev_appserver"));
        assert!(!command_matches(&args(&["anything"]), ""));
    }

    #[test]
    fn no_match_signals_nothing() {
        let count = LiveProcessTable
            .terminate_matching("devtask-no-such-process-3f9c1e7a")
            .unwrap();
        assert_eq!(count, 0);
    }

    #[cfg(unix)]
    #[test]
    fn terminates_matching_process() {
        use std::process::Command;

        // The marker is the sleep's own argument so no orphan is left behind.
        let marker = "37.0193";
        let mut child = Command::new("sleep").arg(marker).spawn().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(100));

        let count = LiveProcessTable.terminate_matching(&format!("sleep {marker}")).unwrap();
        let status = child.wait().unwrap();

        assert_eq!(count, 1);
        assert!(!status.success());
    }

    #[test]
    fn never_signals_own_process_or_threads() {
        use std::sync::mpsc;

        let (release, parked) = mpsc::channel::<()>();
        let worker = std::thread::spawn(move || {
            let _ = parked.recv();
        });

        let own_command = std::env::args().collect::<Vec<_>>().join(" ");
        let count = LiveProcessTable.terminate_matching(&own_command).unwrap();

        release.send(()).unwrap();
        worker.join().unwrap();
        assert_eq!(count, 0);
    }
}
