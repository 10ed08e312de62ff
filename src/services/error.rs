use std::collections::HashMap;

use crate::auth::password::HashError;
use crate::auth::JwtError;
use crate::database::manager::DatabaseError;

/// Business-rule and collaborator failures raised by the services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {message}")]
    ValidationFailed {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Hashing(#[from] HashError),

    #[error(transparent)]
    Token(#[from] JwtError),
}

impl ServiceError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ServiceError::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ServiceError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }

    /// Validation failure for a single field
    pub fn invalid_field(field: &str, problem: &str) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), problem.to_string());
        ServiceError::ValidationFailed {
            message: "Invalid request".to_string(),
            field_errors,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
