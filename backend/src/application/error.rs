//! Lifecycle and storage errors

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::quote::QuoteError;

/// Field-level validation messages keyed by wire (camelCase) field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Storage failures surfaced by a repository
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by the application lifecycle manager
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Application not found: {0}")]
    NotFound(Uuid),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        ApplicationError::Internal(err.to_string())
    }
}

impl From<QuoteError> for ApplicationError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::AmountOutOfBounds { .. } => {
                let mut fields = FieldErrors::new();
                fields.add("amount", err.to_string());
                ApplicationError::Validation(fields)
            }
            QuoteError::DurationOutOfBounds { .. } => {
                let mut fields = FieldErrors::new();
                fields.add("duration", err.to_string());
                ApplicationError::Validation(fields)
            }
            QuoteError::InvalidInput(_) | QuoteError::Overflow => {
                ApplicationError::Internal(err.to_string())
            }
        }
    }
}
