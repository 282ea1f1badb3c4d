// ABOUTME: Connection status reporting without surfacing upstream errors
// ABOUTME: Derives last-sync time from the provider's device list
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status reporter.
//!
//! This endpoint must never fail for the caller: a dead refresh token or an
//! unreachable upstream is reported inside the payload, not as an HTTP
//! error. The last-sync timestamp is cached for quick display but the cache
//! is never authoritative.

use crate::models::SyncStatus;
use crate::oauth::TokenLifecycleManager;
use crate::providers::UpstreamClient;
use crate::store::{keys, TokenStore};
use std::sync::Arc;
use tracing::warn;

/// Reports whether a usable token exists and when the account last synced
pub struct StatusReporter {
    store: Arc<dyn TokenStore>,
    lifecycle: Arc<TokenLifecycleManager>,
    upstream: UpstreamClient,
}

impl StatusReporter {
    /// Create a reporter over the shared components
    #[must_use]
    pub fn new(
        store: Arc<dyn TokenStore>,
        lifecycle: Arc<TokenLifecycleManager>,
        upstream: UpstreamClient,
    ) -> Self {
        Self {
            store,
            lifecycle,
            upstream,
        }
    }

    /// Derive the current connection status. Infallible by contract.
    pub async fn status(&self, now_ms: i64) -> SyncStatus {
        match self.lifecycle.load().await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return SyncStatus {
                    connected: false,
                    last_sync_time: None,
                    error: None,
                }
            }
            Err(err) => {
                return SyncStatus {
                    connected: false,
                    last_sync_time: None,
                    error: Some(err.to_string()),
                }
            }
        }

        let record = match self.lifecycle.ensure_valid(now_ms).await {
            Ok(record) => record,
            Err(err) => {
                // Tokens are busted; treat as disconnected.
                return SyncStatus {
                    connected: false,
                    last_sync_time: None,
                    error: Some(err.to_string()),
                };
            }
        };

        let Some(access_token) = record.access_token else {
            return SyncStatus {
                connected: false,
                last_sync_time: None,
                error: Some("token record has no access token".into()),
            };
        };

        match self.upstream.last_sync_time(&access_token).await {
            Ok(last_sync_time) => {
                if let Some(ts) = &last_sync_time {
                    // Best effort; the cache is display-only.
                    if let Err(err) = self.store.put(keys::LAST_SYNC, ts).await {
                        warn!(error = %err, "failed to cache last sync time");
                    }
                }
                SyncStatus {
                    connected: true,
                    last_sync_time,
                    error: None,
                }
            }
            Err(err) => SyncStatus {
                connected: true,
                last_sync_time: None,
                error: Some(err.to_string()),
            },
        }
    }
}
