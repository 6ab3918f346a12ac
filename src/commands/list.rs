//! `devtask list` command.

use std::fmt::Write as _;

use crate::task::TaskSet;

/// Render every task, its cleanup step and its command line, then aliases.
#[must_use]
pub fn render(tasks: &TaskSet) -> String {
    let width = tasks.names().iter().map(String::len).max().unwrap_or(0);
    let mut out = String::new();

    for def in tasks.tasks() {
        let _ = writeln!(out, "{:width$}  {:8}  {}", def.name(), def.run_mode(), def.command());
        if let Some(step) = def.precede() {
            let _ = writeln!(out, "{:width$}  before: {step}", "");
        }
    }
    for (alias, target) in tasks.aliases() {
        let _ = writeln!(out, "{alias:width$}  alias of {target}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::config::OrchestratorConfig;
    use crate::task::TaskSet;
    use std::path::PathBuf;

    #[test]
    fn lists_tasks_then_aliases() {
        let config =
            OrchestratorConfig { sdk_path: PathBuf::from("/opt/sdk"), ..OrchestratorConfig::default() };
        let text = render(&TaskSet::from_config(&config).unwrap());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "deploy   blocking  /opt/sdk/appcfg.py --oauth2 update src");
        assert_eq!(lines[1], "serve    blocking  /opt/sdk/dev_appserver.py --port=9996 src");
        assert_eq!(lines[2], "         before: terminate processes matching 'dev_appserver'");
        assert_eq!(lines[3], "develop  alias of serve");
    }
}
