//! # DomainError
//!
//! Centralized error handling for the Top 5 Lister ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Resource not found (e.g., Top5List, CommunityList, User)
    #[error("{0} not found with id {1}")]
    NotFound(&'static str, String),

    /// Validation failure (e.g., missing registration field, bad rating value)
    #[error("validation error: {0}")]
    Validation(String),

    /// Security/Auth failure (e.g., wrong password, missing session token)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource already exists (e.g., duplicate username or email)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (e.g., DB down)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// A specialized Result type for Top 5 Lister logic.
pub type Result<T> = std::result::Result<T, DomainError>;
