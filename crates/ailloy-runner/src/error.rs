use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("failed to launch `{program}`: {reason}")]
    LaunchFailed { program: String, reason: String },

    #[error("`{program}` exited with status {code:?}: {stderr}")]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("`{program}` timed out after {timeout_seconds} seconds")]
    Timeout { program: String, timeout_seconds: u64 },

    #[error("`{program}` is not installed or not on PATH")]
    NotFound { program: String },
}
