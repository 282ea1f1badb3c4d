// ABOUTME: Two-step OAuth2 authorization-code flow with CSRF state nonce
// ABOUTME: Issues the login redirect and validates the provider callback
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization flow: login redirect and callback handling.

use super::{OAuthClient, TokenLifecycleManager, TokenRecord};
use crate::errors::{AppError, AppResult};
use crate::store::{keys, TokenStore};
use rand::RngCore;
use std::sync::Arc;
use tracing::info;

/// Issues authorization redirects and completes the code exchange
pub struct AuthorizationFlow {
    store: Arc<dyn TokenStore>,
    oauth: OAuthClient,
}

/// Generate a cryptographically random CSRF nonce (32 bytes, hex encoded)
#[must_use]
pub fn generate_state_nonce() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

impl AuthorizationFlow {
    /// Create a flow over the given store and OAuth client
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>, oauth: OAuthClient) -> Self {
        Self { store, oauth }
    }

    /// Begin the flow: persist a fresh nonce and return the provider's
    /// authorization URL to redirect the user to.
    ///
    /// # Errors
    ///
    /// Returns an error if the nonce cannot be persisted or the authorize
    /// URL cannot be built.
    pub async fn begin_login(&self) -> AppResult<String> {
        let state = generate_state_nonce();
        self.store
            .put_with_ttl(keys::OAUTH_STATE, &state, keys::STATE_TTL)
            .await?;
        self.oauth.authorize_url(&state)
    }

    /// Complete the flow: validate the CSRF state and exchange the code for
    /// the first token record.
    ///
    /// An absent nonce and a mismatched nonce collapse to the same
    /// [`AppError::BadRequest`]; the caller learns only that CSRF protection
    /// failed, not why.
    ///
    /// # Errors
    ///
    /// - [`AppError::BadRequest`] on missing parameters or state mismatch
    /// - [`AppError::ExchangeFailed`] when the provider rejects the code
    pub async fn complete_callback(
        &self,
        lifecycle: &TokenLifecycleManager,
        code: Option<&str>,
        state: Option<&str>,
        now_ms: i64,
    ) -> AppResult<TokenRecord> {
        let code = code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::bad_request("missing code; start at /login"))?;
        let state = state
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::bad_request("missing state; start at /login"))?;

        let expected = self.store.get(keys::OAUTH_STATE).await?;
        if expected.as_deref() != Some(state) {
            return Err(AppError::bad_request("bad state"));
        }
        self.store.delete(keys::OAUTH_STATE).await?;

        let response = self.oauth.exchange_code(code).await?;
        let record = lifecycle.store_initial(response, now_ms).await?;
        info!("authorization flow completed");
        Ok(record)
    }
}
