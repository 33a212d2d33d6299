use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown condition: {0}")]
    UnknownCondition(String),
    #[error("unknown group status: {0}")]
    UnknownGroupStatus(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
