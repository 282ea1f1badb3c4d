// ABOUTME: In-memory key/value store with per-entry TTL expiration
// ABOUTME: Expired entries are dropped lazily on read
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`TokenStore`] backend.
//!
//! The gateway persists exactly three keys, so a `HashMap` behind a
//! `tokio::sync::RwLock` is sufficient; there is no eviction pressure and no
//! background cleanup task.

use super::TokenStore;
use crate::errors::AppResult;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// In-memory store with TTL support
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        // Fast path: read lock, return live entries.
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
                None => return Ok(None),
                Some(_) => {}
            }
        }

        // Entry exists but expired: drop it under the write lock.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(Entry::is_expired) {
            entries.remove(key);
        }
        drop(entries);
        Ok(None)
    }

    async fn put(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.write().await.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn put_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.entries.write().await.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
