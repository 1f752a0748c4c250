use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ValueError {
    #[error("JSON parse failed: {message}")]
    JsonParse { message: String },

    #[error("no value form for JSON {found}")]
    UnsupportedJson { found: String },
}
