use std::error::Error as StdError;

use thiserror::Error;

use crate::{
    application::context::MissingProviderError, config::LoadError, domain::error::DomainError,
    infra::error::InfraError, presentation::views::TemplateRenderError,
};

/// An error flattened into its chain of messages, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { source, messages }
    }

    pub fn summary(&self) -> String {
        self.messages.join(": ")
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Context(#[from] MissingProviderError),
    #[error(transparent)]
    Render(#[from] TemplateRenderError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Whether an interactive session can report the error and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::Domain(_) | AppError::Validation(_))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        AppError::Infra(InfraError::from(error))
    }
}

impl From<LoadError> for AppError {
    fn from(error: LoadError) -> Self {
        AppError::Infra(InfraError::configuration(error.to_string()))
    }
}
