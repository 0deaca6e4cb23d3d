//! Wires `ailloy-wizard`'s `DiscoverRunner` seam to a real shell, through
//! the same `ProcessRunner` boundary `ailloy-reference`'s `ProcessGitRunner`
//! and `ailloy-foundry`'s `GhSearchRunner` use — `anneal`'s interactive
//! mode is the only caller that needs a live discover command to actually
//! run.

use std::time::Duration;

use ailloy_runner::{CommandSpec, NativeRunner, ProcessRunner};
use ailloy_wizard::DiscoverRunner;

const DISCOVER_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ShellDiscoverRunner {
    runner: NativeRunner,
}

impl ShellDiscoverRunner {
    pub fn new() -> Self {
        Self { runner: NativeRunner::default() }
    }
}

impl DiscoverRunner for ShellDiscoverRunner {
    fn run(&self, expanded_command: &str) -> Result<Vec<u8>, String> {
        let cmd = CommandSpec::new("sh").args(vec!["-c", expanded_command]);
        let output = self.runner.run(&cmd, DISCOVER_TIMEOUT).map_err(|e| e.to_string())?;
        if !output.success() {
            return Err(output.stderr_string());
        }
        Ok(output.stdout)
    }
}
