use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("invalid reference `{reference}`: {message}")]
    Parse { reference: String, message: String },

    #[error("reference `{reference}`: {message}")]
    Resolve { reference: String, message: String },

    #[error("reference `{reference}` not found")]
    NotFound { reference: String },

    #[error("network error during {operation}: {cause}")]
    Network { operation: String, cause: String },

    #[error("git command `{command}` failed: {cause}")]
    Git { command: String, cause: String },
}

impl From<ailloy_runner::RunnerError> for ReferenceError {
    fn from(err: ailloy_runner::RunnerError) -> Self {
        ReferenceError::Git {
            command: "git".to_string(),
            cause: err.to_string(),
        }
    }
}
