// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Revoked-token store.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Concurrent set of explicitly invalidated tokens, each remembered until
/// its own natural expiry.
///
/// Every public operation first drops entries whose expiry has passed, so
/// the store never grows beyond the set of still-live revoked tokens.
#[derive(Debug, Default)]
pub struct RevocationStore {
    entries: DashMap<String, DateTime<Utc>>,
}

impl RevocationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `token` revoked until `expires_at`.
    ///
    /// Revoking the same token again replaces its recorded expiry.
    pub fn invalidate(&self, token: &str, expires_at: DateTime<Utc>) {
        self.invalidate_at(token, expires_at, Utc::now());
    }

    /// Like [`invalidate`](Self::invalidate) as of `now`.
    pub fn invalidate_at(&self, token: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>) {
        self.entries.insert(token.to_string(), expires_at);
        self.sweep_at(now);
    }

    /// Returns `true` if `token` is currently revoked.
    pub fn is_revoked(&self, token: &str) -> bool {
        self.is_revoked_at(token, Utc::now())
    }

    /// Like [`is_revoked`](Self::is_revoked) as of `now`.
    pub fn is_revoked_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.sweep_at(now);
        self.entries
            .get(token)
            .is_some_and(|expires_at| *expires_at > now)
    }

    /// Returns the number of live entries.
    pub fn size(&self) -> usize {
        self.size_at(Utc::now())
    }

    /// Like [`size`](Self::size) as of `now`.
    pub fn size_at(&self, now: DateTime<Utc>) -> usize {
        self.sweep_at(now);
        self.entries.len()
    }

    /// Drops every entry whose expiry is at or before now.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    /// Drops every entry whose expiry is at or before `now`.
    ///
    /// Returns how many entries were removed.
    pub fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| *expires_at > now);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!(removed, "Swept expired revocations");
        }
        removed
    }
}

// =============================================================================
// Tests
// =============================================================================
