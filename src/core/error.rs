use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParlanceError {
    #[error("Invalid regex entity pattern: {0}")]
    InvalidRegexEntity(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, ParlanceError>;
