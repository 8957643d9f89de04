// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization failure taxonomy.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type alias for auth core operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Every way a credential can fail on its way to a handler.
///
/// Each variant maps to a fixed status code and a fixed, safe message.
/// Library error strings never end up in a variant; they are logged where
/// the failure is first observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is not a well-formed signed token.
    #[error("malformed token")]
    Malformed,

    /// The token signature does not match the configured key.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The token declares a signing algorithm other than the configured one.
    #[error("unsupported token algorithm")]
    Unsupported,

    /// The token is authentic but its expiry has passed.
    #[error("token expired")]
    Expired,

    /// The token subject differs from the expected identity.
    #[error("token subject mismatch")]
    SubjectMismatch,

    /// No credential was presented where one is required.
    #[error("authentication required")]
    Unauthenticated,

    /// The credential is valid but the caller lacks the required role.
    #[error("insufficient role")]
    Forbidden,

    /// The credential was explicitly invalidated before its expiry.
    #[error("token revoked")]
    Revoked,

    /// The identity resolver rejected the presented login credentials.
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl AuthError {
    /// Returns the HTTP status code for this failure.
    ///
    /// Only [`AuthError::Forbidden`] maps to 403; everything else is a 401.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Returns the error code for categorization.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Malformed
            | AuthError::InvalidSignature
            | AuthError::Unsupported
            | AuthError::SubjectMismatch => "INVALID_TOKEN",
            AuthError::Expired => "TOKEN_EXPIRED",
            AuthError::Unauthenticated => "UNAUTHORIZED",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::Revoked => "TOKEN_REVOKED",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
        }
    }

    /// Returns the message shown to clients.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::Malformed
            | AuthError::InvalidSignature
            | AuthError::Unsupported
            | AuthError::SubjectMismatch => "Invalid token",
            AuthError::Expired => "Token has expired",
            AuthError::Unauthenticated => "Authentication required",
            AuthError::Forbidden => "Access denied",
            AuthError::Revoked => "Token has been revoked",
            AuthError::InvalidCredentials => "Invalid username or password",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                AuthError::Unsupported
            }
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Malformed,
        }
    }
}
