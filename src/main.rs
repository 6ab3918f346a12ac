//! Binary entrypoint for the `devtask` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    // A blocking child shares our process group and gets Ctrl-C itself.
    // Staying alive lets us report the exit code it chooses.
    if let Err(err) = ctrlc::set_handler(|| tracing::debug!("interrupt received, waiting for child")) {
        eprintln!("devtask: could not install interrupt handler: {err}");
    }

    // Recording is handled in commands::dispatch via DEVTASK_RECORD=<dir>.
    match devtask::run(std::env::args_os()) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("devtask: {err}");
            ExitCode::FAILURE
        }
    }
}
