// ABOUTME: Key/value persistence abstraction with TTL support
// ABOUTME: Defines the TokenStore trait and the well-known store keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable key/value persistence for the gateway's three records: the CSRF
//! nonce, the token blob, and the cached last-sync timestamp.
//!
//! The store is injected into every component that needs persistence so that
//! tests can seed and inspect state directly.

/// In-memory store implementation
pub mod memory;

use crate::errors::AppResult;
use std::time::Duration;

pub use memory::MemoryStore;

/// Well-known store keys
pub mod keys {
    use std::time::Duration;

    /// CSRF nonce issued at login, consumed at callback
    pub const OAUTH_STATE: &str = "oauth_state";
    /// Serialized [`crate::oauth::TokenRecord`]
    pub const TOKENS: &str = "fitbit_tokens";
    /// Cached account-level last-sync timestamp, display only
    pub const LAST_SYNC: &str = "fitbit_last_sync";

    /// Lifetime of the CSRF nonce
    pub const STATE_TTL: Duration = Duration::from_secs(600);
}

/// Key/value store with optional per-entry TTL
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    /// Retrieve a value; expired entries read as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store a value without expiry, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    async fn put(&self, key: &str, value: &str) -> AppResult<()>;

    /// Store a value that expires after `ttl`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    async fn put_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Remove an entry; removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend delete fails.
    async fn delete(&self, key: &str) -> AppResult<()>;
}
