// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Signed token encoding and verification.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, AuthResult, Claims};
use crate::error::{ApiError, ApiResult};

/// The only algorithm tokens are signed and verified with.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS512;

/// Recommended minimum secret length for HS512 (one SHA-512 block).
const RECOMMENDED_SECRET_LEN: usize = 64;

// =============================================================================
// JwtConfig
// =============================================================================

/// JWT configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Shared secret for signing tokens.
    #[serde(skip_serializing)]
    pub secret: String,
}

impl JwtConfig {
    /// Creates a new configuration with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        if self.secret.is_empty() {
            return Err(ApiError::internal("JWT secret is not configured"));
        }
        if self.secret.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                length = self.secret.len(),
                recommended = RECOMMENDED_SECRET_LEN,
                "JWT secret is shorter than recommended for HS512"
            );
        }
        Ok(())
    }
}

// =============================================================================
// ClaimsCodec
// =============================================================================

/// Signs claims into compact tokens and verifies tokens back into claims.
///
/// Verification establishes authenticity only. Expiry is deliberately left to
/// [`TokenValidator`](super::TokenValidator).
#[derive(Clone)]
pub struct ClaimsCodec {
    header: Arc<Header>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl ClaimsCodec {
    /// Creates a new codec with the given configuration.
    pub fn new(config: &JwtConfig) -> ApiResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            header: Arc::new(Header::new(SIGNING_ALGORITHM)),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Signs the claims into a compact token.
    pub fn sign(&self, claims: &Claims) -> ApiResult<String> {
        encode(&self.header, claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("Failed to sign token: {}", e)))
    }

    /// Verifies the signature and decodes the claims.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                AuthError::from(e)
            })
    }
}

impl std::fmt::Debug for ClaimsCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimsCodec")
            .field("algorithm", &self.header.alg)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
