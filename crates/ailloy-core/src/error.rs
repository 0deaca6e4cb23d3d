use camino::Utf8PathBuf;
use thiserror::Error;

/// Composes every leaf crate's error type into the taxonomy named in spec
/// §7, so the binary never loses a cause chain converting between them.
#[derive(Error, Debug)]
pub enum AilloyError {
    #[error(transparent)]
    Manifest(#[from] ailloy_manifest::ManifestError),

    #[error(transparent)]
    Flux(#[from] ailloy_flux::FluxError),

    #[error(transparent)]
    Template(#[from] ailloy_template::TemplateError),

    #[error(transparent)]
    Reference(#[from] ailloy_reference::ReferenceError),

    #[error(transparent)]
    Cache(#[from] ailloy_cache::CacheError),

    #[error(transparent)]
    Lockfile(#[from] ailloy_cache::LockfileError),

    #[error(transparent)]
    Foundry(#[from] ailloy_foundry::FoundryError),

    #[error(transparent)]
    Wizard(#[from] ailloy_wizard::WizardError),

    #[error(transparent)]
    Runner(#[from] ailloy_runner::RunnerError),

    #[error("ingot `{name}` not found; searched {searched_paths:?}")]
    IngotNotFound { name: String, searched_paths: Vec<Utf8PathBuf> },

    #[error("output conflict: `{dest}` is produced by both `{first}` and `{second}`")]
    OutputConflict { dest: String, first: String, second: String },

    #[error("bundle failed validation:\n{0}")]
    ValidationFailed(String),

    #[error("io error at `{path}`: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AilloyError {
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        AilloyError::Io { path: path.into(), source }
    }
}

/// Exit code mapping: 0 success, 1 user error, 2 internal error, via a
/// single function from error kind to process exit status.
pub fn error_to_exit_code(err: &AilloyError) -> i32 {
    match err {
        AilloyError::Manifest(_)
        | AilloyError::Flux(_)
        | AilloyError::Template(_)
        | AilloyError::Reference(_)
        | AilloyError::Foundry(_)
        | AilloyError::Wizard(_)
        | AilloyError::IngotNotFound { .. }
        | AilloyError::OutputConflict { .. }
        | AilloyError::ValidationFailed(_) => 1,
        AilloyError::Cache(_) | AilloyError::Lockfile(_) | AilloyError::Runner(_) | AilloyError::Io { .. } => 2,
    }
}
