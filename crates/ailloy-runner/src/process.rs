use std::time::Duration;

use crate::command_spec::CommandSpec;
use crate::error::RunnerError;

/// Output from a process execution.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Abstract process execution. The git-backed reference resolver and the
/// `gh`-backed foundry search both depend only on this trait, never on
/// `std::process::Command` directly, keeping the OS-process boundary named
/// in the scope notes an actual seam rather than an incidental detail.
///
/// A synchronous interface: implementations may use an async runtime
/// internally to enforce the timeout, but must not expose async in the
/// public API.
pub trait ProcessRunner {
    fn run(&self, cmd: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, RunnerError>;
}

/// A `ProcessRunner` backed by `std::process::Command`, with no shell
/// interpretation and a best-effort timeout via a watchdog thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeRunner;

impl ProcessRunner for NativeRunner {
    fn run(&self, cmd: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, RunnerError> {
        use std::sync::mpsc;
        use std::thread;

        let mut command = cmd.to_command();
        let program = cmd.program.to_string_lossy().into_owned();

        let (tx, rx) = mpsc::channel();
        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RunnerError::NotFound { program: program.clone() }
            } else {
                RunnerError::LaunchFailed {
                    program: program.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        thread::spawn(move || {
            let output = child.wait_with_output();
            let _ = tx.send(output);
        });

        match rx.recv_timeout(timeout) {
            Ok(Ok(output)) => Ok(ProcessOutput {
                stdout: output.stdout,
                stderr: output.stderr,
                exit_code: output.status.code(),
            }),
            Ok(Err(e)) => Err(RunnerError::LaunchFailed {
                program,
                reason: e.to_string(),
            }),
            Err(_) => Err(RunnerError::Timeout {
                program,
                timeout_seconds: timeout.as_secs(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedRunner {
        output: ProcessOutput,
    }

    impl ProcessRunner for ScriptedRunner {
        fn run(&self, _cmd: &CommandSpec, _timeout: Duration) -> Result<ProcessOutput, RunnerError> {
            Ok(self.output.clone())
        }
    }

    #[test]
    fn scripted_runner_returns_canned_output() {
        let runner = ScriptedRunner {
            output: ProcessOutput {
                stdout: b"v1.0.0\nv1.1.0\n".to_vec(),
                stderr: Vec::new(),
                exit_code: Some(0),
            },
        };
        let cmd = CommandSpec::new("git").arg("tag");
        let result = runner.run(&cmd, Duration::from_secs(5)).unwrap();
        assert!(result.success());
        assert_eq!(result.stdout_string(), "v1.0.0\nv1.1.0\n");
    }
}
