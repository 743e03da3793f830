use thiserror::Error;

// Fatal data-contract violations
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Article not found in article table: {0}")]
    MissingArticle(String),
    #[error("Unknown answer type: {0}")]
    UnknownAnswerType(String),
    #[error("Invalid answer: {0}")]
    InvalidAnswer(String),
    #[error("Validation error: {0}")]
    Validation(String),
}
