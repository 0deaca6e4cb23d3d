use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to parse {file}: {message}")]
    ParseError { file: Utf8PathBuf, message: String },

    #[error("invalid manifest {file}: field `{field}`: {message}")]
    InvalidManifest {
        file: Utf8PathBuf,
        field: String,
        message: String,
    },

    #[error("{file}: {source}")]
    Io {
        file: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    pub fn invalid(file: impl Into<Utf8PathBuf>, field: impl Into<String>, message: impl Into<String>) -> Self {
        ManifestError::InvalidManifest {
            file: file.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}
