//! Typed errors and GraphQL error mapping.

use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Two-tier error model: `NotFound` on a referenced entity is absorbed by the
/// mutation handlers into an `ok: false` payload; everything else surfaces as
/// a GraphQL error with a `code` extension.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidId(_) => "invalid_id",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation_error",
            AppError::Db(_) => "database_error",
        }
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(AppError::InvalidId("x".into()).code(), "invalid_id");
        assert_eq!(AppError::NotFound("x".into()).code(), "not_found");
        assert_eq!(AppError::Validation("x".into()).code(), "validation_error");
        assert_eq!(AppError::Db(sqlx::Error::RowNotFound).code(), "database_error");
    }
}
