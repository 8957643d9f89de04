// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Seed data shared by the integration suites.

use reviewverso_api::{ApiConfig, JwtConfig, Principal, UserRecord};

/// Signing secret used by every fixture configuration.
pub const TEST_SECRET: &str =
    "integration-test-secret-long-enough-for-hs512-signing-0123456789abcdef";

/// Default API prefix.
pub const PREFIX: &str = "/api/v1";

/// Regular user.
pub const ALICE: &str = "alice";
/// Alice's password.
pub const ALICE_PASSWORD: &str = "wonderland";
/// Alice's email.
pub const ALICE_EMAIL: &str = "alice@example.com";
/// Alice's numeric id.
pub const ALICE_ID: i64 = 42;

/// Administrator.
pub const ROOT: &str = "root";
/// Root's password.
pub const ROOT_PASSWORD: &str = "toor";

/// Account without roles.
pub const GUEST: &str = "guest";
/// Guest's password.
pub const GUEST_PASSWORD: &str = "guest-pass";

// =============================================================================
// Users
// =============================================================================

/// Seed accounts.
pub struct UserFixtures;

impl UserFixtures {
    /// Alice, with role `USER`.
    pub fn alice() -> UserRecord {
        UserRecord::new(ALICE, ALICE_PASSWORD)
            .with_id(ALICE_ID)
            .with_email(ALICE_EMAIL)
            .with_role("USER")
    }

    /// Root, with role `ADMIN`.
    pub fn root() -> UserRecord {
        UserRecord::new(ROOT, ROOT_PASSWORD)
            .with_id(1)
            .with_role("ADMIN")
    }

    /// Guest, with no roles.
    pub fn guest() -> UserRecord {
        UserRecord::new(GUEST, GUEST_PASSWORD).with_id(7)
    }

    /// All seed accounts.
    pub fn all() -> Vec<UserRecord> {
        vec![Self::alice(), Self::root(), Self::guest()]
    }
}

// =============================================================================
// Principals
// =============================================================================

/// Principals for direct issuer tests.
pub struct PrincipalFixtures;

impl PrincipalFixtures {
    /// Alice as an already-resolved principal.
    pub fn alice() -> Principal {
        Principal::new(ALICE)
            .with_id(ALICE_ID)
            .with_email(ALICE_EMAIL)
            .with_role("USER")
    }

    /// A principal with no roles and no optional fields.
    pub fn bare(username: &str) -> Principal {
        Principal::new(username)
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration fixtures.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// Default configuration with the test secret.
    pub fn api() -> ApiConfig {
        ApiConfig::default().with_jwt(JwtConfig::new(TEST_SECRET))
    }

    /// Configuration with a custom API prefix.
    pub fn api_with_prefix(prefix: &str) -> ApiConfig {
        Self::api().with_base_path(prefix)
    }
}
