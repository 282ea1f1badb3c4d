// ABOUTME: Token lifecycle management with transparent refresh before expiry
// ABOUTME: Serializes refresh exchanges so a rotated refresh token is never reused
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token lifecycle manager.
//!
//! The manager is the only writer of the stored [`TokenRecord`]. Every
//! inbound request that talks to the provider goes through
//! [`TokenLifecycleManager::ensure_valid`] first.

use super::{OAuthClient, ProviderTokenResponse, TokenRecord};
use crate::errors::{AppError, AppResult};
use crate::store::{keys, TokenStore};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Loads, validates and refreshes the single token record
pub struct TokenLifecycleManager {
    store: Arc<dyn TokenStore>,
    oauth: OAuthClient,
    // Refresh tokens are single-use-replaceable upstream; this lock makes
    // sure two requests that both observe an expiring record perform one
    // refresh between them, not two.
    refresh_lock: Mutex<()>,
}

impl TokenLifecycleManager {
    /// Create a manager over the given store and OAuth client
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>, oauth: OAuthClient) -> Self {
        Self {
            store,
            oauth,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Load the stored record, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails or the blob is corrupt.
    pub async fn load(&self) -> AppResult<Option<TokenRecord>> {
        match self.store.get(keys::TOKENS).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn persist(&self, record: &TokenRecord) -> AppResult<()> {
        let raw = serde_json::to_string(record)?;
        self.store.put(keys::TOKENS, &raw).await
    }

    /// Store the first token blob produced by the authorization flow.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the record fails.
    pub async fn store_initial(
        &self,
        response: ProviderTokenResponse,
        now_ms: i64,
    ) -> AppResult<TokenRecord> {
        let record = TokenRecord::from_response(response, now_ms);
        self.persist(&record).await?;
        info!("stored initial token record");
        Ok(record)
    }

    /// Return a usable token record, refreshing it first when it is within
    /// the expiry buffer.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthorized`] when no record exists
    /// - [`AppError::RefreshFailed`] when the refresh exchange is rejected,
    ///   carrying the upstream body verbatim; the status reporter absorbs it
    ///   into the payload, metric routes surface it as a server error
    pub async fn ensure_valid(&self, now_ms: i64) -> AppResult<TokenRecord> {
        let record = self
            .load()
            .await?
            .ok_or_else(|| AppError::unauthorized("no stored token; visit /login"))?;

        if !record.is_expiring(now_ms) {
            return Ok(record);
        }

        let _guard = self.refresh_lock.lock().await;

        // Re-read under the lock: a concurrent request may have completed
        // the refresh while we waited, and its rotated refresh token must
        // not be spent twice.
        let record = self
            .load()
            .await?
            .ok_or_else(|| AppError::unauthorized("no stored token; visit /login"))?;
        if !record.is_expiring(now_ms) {
            debug!("token already refreshed by a concurrent request");
            return Ok(record);
        }

        let refresh_token = record
            .refresh_token
            .clone()
            .ok_or_else(|| AppError::RefreshFailed("missing refresh_token".into()))?;

        let response = self.oauth.refresh(&refresh_token).await?;
        let merged = record.merged_with(response, now_ms);
        self.persist(&merged).await?;
        info!("access token refreshed");
        Ok(merged)
    }
}
