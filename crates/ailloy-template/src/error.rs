use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("{file}:{offset}: {message}")]
    Syntax { file: String, offset: usize, message: String },

    #[error("{file}:{offset}: {message}: {cause}")]
    Callable {
        file: String,
        offset: usize,
        message: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TemplateError {
    pub fn syntax(file: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        TemplateError::Syntax {
            file: file.into(),
            offset,
            message: message.into(),
        }
    }
}
