//! Live process launcher using `std::process::Command`.

use std::fs::{self, OpenOptions};
use std::process::{Command, ExitStatus, Stdio};

#[cfg(unix)]
use std::os::unix::process::CommandExt;
#[cfg(windows)]
use std::os::windows::process::CommandExt;

use tracing::debug;

use crate::error::PortError;
use crate::ports::launcher::ProcessLauncher;
use crate::task::CommandLine;

#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x0000_0008;
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// Live launcher that spawns real child processes.
pub struct LiveProcessLauncher;

impl LiveProcessLauncher {
    fn command(line: &CommandLine) -> Command {
        let mut cmd = Command::new(&line.program);
        cmd.args(&line.args);
        cmd
    }

    fn redirect_output(cmd: &mut Command, line: &CommandLine) -> Result<(), PortError> {
        let Some(path) = &line.log_file else {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        cmd.stdout(Stdio::from(file.try_clone()?)).stderr(Stdio::from(file));
        Ok(())
    }
}

impl ProcessLauncher for LiveProcessLauncher {
    fn run_blocking(&self, line: &CommandLine) -> Result<i32, PortError> {
        let status = Self::command(line)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        debug!(program = %line.program.display(), %status, "child exited");
        Ok(exit_code(status))
    }

    fn spawn_detached(&self, line: &CommandLine) -> Result<u32, PortError> {
        let mut cmd = Self::command(line);
        cmd.stdin(Stdio::null());
        Self::redirect_output(&mut cmd, line)?;

        // A separate process group keeps terminal signals aimed at us away
        // from the child.
        #[cfg(unix)]
        cmd.process_group(0);
        #[cfg(windows)]
        cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);

        // Dropping the handle neither waits for nor kills the child.
        let child = cmd.spawn()?;
        Ok(child.id())
    }
}

/// Maps an exit status to the code a shell would report.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn sh(script: &str) -> CommandLine {
        CommandLine::new("sh", ["-c", script])
    }

    #[test]
    fn blocking_returns_real_exit_code() {
        let code = LiveProcessLauncher.run_blocking(&sh("exit 3")).unwrap();
        assert_eq!(code, 3);
    }

    #[test]
    fn blocking_waits_for_termination() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("done");
        let script = format!("sleep 0.2; touch '{}'", marker.display());

        let code = LiveProcessLauncher.run_blocking(&sh(&script)).unwrap();
        assert_eq!(code, 0);
        assert!(marker.exists(), "child must have finished before run_blocking returned");
    }

    #[test]
    fn signal_death_maps_to_shell_convention() {
        let code = LiveProcessLauncher.run_blocking(&sh("kill -TERM $$")).unwrap();
        assert_eq!(code, 128 + 15);
    }

    #[test]
    fn missing_program_is_an_error() {
        let line = CommandLine::new("/nonexistent/sdk/appcfg.py", ["update"]);
        assert!(LiveProcessLauncher.run_blocking(&line).is_err());
        assert!(LiveProcessLauncher.spawn_detached(&line).is_err());
    }

    #[test]
    fn detached_returns_before_child_exits() {
        let started = Instant::now();
        let pid = LiveProcessLauncher.spawn_detached(&sh("sleep 2")).unwrap();

        assert!(pid > 0);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn detached_output_goes_to_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("logs").join("server.log");
        let mut line = sh("echo detached-hello");
        line.log_file = Some(log.clone());

        LiveProcessLauncher.spawn_detached(&line).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut content = String::new();
        while Instant::now() < deadline {
            content = fs::read_to_string(&log).unwrap_or_default();
            if content.contains("detached-hello") {
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        assert!(content.contains("detached-hello"));
    }
}
