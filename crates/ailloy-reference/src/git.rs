use std::time::Duration;

use ailloy_runner::{CommandSpec, ProcessRunner};

use crate::error::ReferenceError;

/// Git operations needed by the reference resolver, abstracted away from
/// `ailloy-runner`'s raw process interface so resolution logic stays a pure
/// function of its inputs.
pub trait GitRunner {
    fn list_tags(&self, host: &str, owner: &str, repo: &str) -> Result<Vec<String>, ReferenceError>;
    fn resolve_ref_to_sha(&self, host: &str, owner: &str, repo: &str, refname: &str) -> Result<String, ReferenceError>;
    fn default_branch_head(&self, host: &str, owner: &str, repo: &str) -> Result<String, ReferenceError>;
    fn sha_exists(&self, host: &str, owner: &str, repo: &str, sha: &str) -> Result<bool, ReferenceError>;
}

const GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// A `GitRunner` that shells out to the real `git` binary via a
/// `ProcessRunner`, keeping process invocation behind a runner boundary
/// rather than calling `std::process::Command` directly.
pub struct ProcessGitRunner<R: ProcessRunner> {
    runner: R,
}

impl<R: ProcessRunner> ProcessGitRunner<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    fn remote_url(host: &str, owner: &str, repo: &str) -> String {
        format!("https://{host}/{owner}/{repo}.git")
    }

    fn run(&self, args: Vec<&str>) -> Result<String, ReferenceError> {
        let command_name = format!("git {}", args.join(" "));
        let cmd = CommandSpec::new("git").args(args);
        let output = self.runner.run(&cmd, GIT_TIMEOUT)?;
        if !output.success() {
            return Err(ReferenceError::Git {
                command: command_name,
                cause: output.stderr_string(),
            });
        }
        Ok(output.stdout_string())
    }
}

impl<R: ProcessRunner> GitRunner for ProcessGitRunner<R> {
    fn list_tags(&self, host: &str, owner: &str, repo: &str) -> Result<Vec<String>, ReferenceError> {
        let url = Self::remote_url(host, owner, repo);
        let stdout = self.run(vec!["ls-remote", "--tags", "--refs", &url])?;
        Ok(stdout
            .lines()
            .filter_map(|line| line.rsplit('/').next())
            .map(str::to_string)
            .collect())
    }

    fn resolve_ref_to_sha(&self, host: &str, owner: &str, repo: &str, refname: &str) -> Result<String, ReferenceError> {
        let url = Self::remote_url(host, owner, repo);
        let stdout = self.run(vec!["ls-remote", &url, refname])?;
        stdout
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().next())
            .map(str::to_string)
            .ok_or_else(|| ReferenceError::NotFound {
                reference: format!("{host}/{owner}/{repo}@{refname}"),
            })
    }

    fn default_branch_head(&self, host: &str, owner: &str, repo: &str) -> Result<String, ReferenceError> {
        let url = Self::remote_url(host, owner, repo);
        let stdout = self.run(vec!["ls-remote", "--symref", &url, "HEAD"])?;
        stdout
            .lines()
            .find(|line| !line.starts_with("ref:"))
            .and_then(|line| line.split_whitespace().next())
            .map(str::to_string)
            .ok_or_else(|| ReferenceError::NotFound {
                reference: format!("{host}/{owner}/{repo}@HEAD"),
            })
    }

    fn sha_exists(&self, host: &str, owner: &str, repo: &str, sha: &str) -> Result<bool, ReferenceError> {
        let url = Self::remote_url(host, owner, repo);
        match self.run(vec!["ls-remote", &url, sha]) {
            Ok(stdout) => Ok(!stdout.trim().is_empty()),
            Err(_) => Ok(false),
        }
    }
}
