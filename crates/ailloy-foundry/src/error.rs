use thiserror::Error;

#[derive(Error, Debug)]
pub enum FoundryError {
    #[error("failed to parse foundry index `{source}`: {message}")]
    Parse { source: String, message: String },

    #[error("foundry index `{source}` has unrecognized apiVersion `{found}`, expected `{expected}`")]
    UnrecognizedApiVersion { source: String, found: String, expected: String },

    #[error("foundry index `{source}` has unrecognized kind `{found}`, expected `{expected}`")]
    UnrecognizedKind { source: String, found: String, expected: String },

    #[error("http GET {url} failed: {message}")]
    Http { url: String, message: String },

    #[error(transparent)]
    Runner(#[from] ailloy_runner::RunnerError),

    #[error("io error at `{path}`: {source}")]
    Io {
        path: camino::Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
