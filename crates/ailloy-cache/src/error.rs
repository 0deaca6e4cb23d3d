use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache path {path}: {cause}")]
    Io { path: Utf8PathBuf, cause: std::io::Error },

    #[error("fetch lock for {path} is held by another process")]
    Locked { path: Utf8PathBuf },

    #[error(transparent)]
    Reference(#[from] ailloy_reference::ReferenceError),

    #[error(transparent)]
    Runner(#[from] ailloy_runner::RunnerError),
}

#[derive(Error, Debug)]
pub enum LockfileError {
    #[error("failed to parse lockfile {path}: {message}")]
    Parse { path: Utf8PathBuf, message: String },

    #[error("failed to write lockfile {path}: {cause}")]
    Write { path: Utf8PathBuf, cause: std::io::Error },

    #[error("lockfile entry `{name}` is incomplete: missing {field}")]
    Incomplete { name: String, field: String },
}
