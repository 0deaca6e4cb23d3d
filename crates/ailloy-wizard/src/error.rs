use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("wizard cancelled")]
    Aborted,

    #[error("discover command for `{field}` failed: {message}")]
    Discovery { field: String, message: String },

    #[error(transparent)]
    Template(#[from] ailloy_template::TemplateError),
}
