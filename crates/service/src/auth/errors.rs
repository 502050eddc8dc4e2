use thiserror::Error;

use crate::validation::FieldErrors;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("Invalid email or password. Please try again.")]
    InvalidCredentials,
    #[error("This account has been deactivated.")]
    Inactive,
    #[error("Authentication credentials were not provided.")]
    MissingToken,
    #[error("Token is invalid or expired.")]
    InvalidToken,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::InvalidCredentials => 1004,
            AuthError::Inactive => 1005,
            AuthError::MissingToken => 1006,
            AuthError::InvalidToken => 1007,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }
}
