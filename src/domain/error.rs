use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{entity} #{position} not found")]
    NotFound {
        entity: &'static str,
        position: usize,
    },
    #[error("{0}")]
    Validation(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, position: usize) -> Self {
        Self::NotFound { entity, position }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
