use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FluxError {
    #[error("failed to parse {file}: {message}")]
    ParseError { file: Utf8PathBuf, message: String },

    #[error("invalid inline override `{raw}`, expected `dotted.path=value`")]
    InvalidOverride { raw: String },
}

impl FluxError {
    pub fn parse(file: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        FluxError::ParseError {
            file: file.into(),
            message: message.into(),
        }
    }
}
