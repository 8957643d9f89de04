// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Response assertions with failure messages that include the body.

use axum::http::StatusCode;

use super::harness::TestResponse;

/// Assertion extensions for [`TestResponse`].
pub trait ResponseAssertions {
    /// Assert the status code.
    fn assert_status(&self, expected: StatusCode) -> &Self;

    /// Assert `200 OK`.
    fn assert_ok(&self) -> &Self;

    /// Assert an error response with the given status and `error.code`.
    fn assert_error(&self, status: StatusCode, code: &str) -> &Self;

    /// Assert a successful logout body.
    fn assert_logged_out(&self) -> &Self;
}

impl ResponseAssertions for TestResponse {
    fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {} with body {}",
            expected, self.status, self.body
        );
        self
    }

    fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    fn assert_error(&self, status: StatusCode, code: &str) -> &Self {
        self.assert_status(status);
        assert_eq!(
            self.error_code(),
            Some(code),
            "Expected error code {}, body was {}",
            code,
            self.body
        );
        assert!(
            self.body["error"]["message"].is_string(),
            "Error body has no message: {}",
            self.body
        );
        self
    }

    fn assert_logged_out(&self) -> &Self {
        self.assert_ok();
        assert_eq!(self.body["success"], true, "body was {}", self.body);
        assert_eq!(self.body["message"], "Logged out successfully");
        self
    }
}
