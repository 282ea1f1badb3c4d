// ABOUTME: OAuth2 client for the provider's token endpoint and token record model
// ABOUTME: Covers authorization-code and refresh-token grants with Basic auth
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OAuth2 integration with the fitness provider.
//!
//! [`TokenRecord`] is the single mutable secret of the whole system: created
//! by the authorization flow, replaced on refresh by the lifecycle manager,
//! never deleted explicitly.

/// Two-step authorization-code flow (login redirect + callback exchange)
pub mod flow;
/// Token validity checking and transparent refresh
pub mod lifecycle;

use crate::config::OAuthProviderConfig;
use crate::errors::{AppError, AppResult};
use base64::engine::general_purpose;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

pub use flow::AuthorizationFlow;
pub use lifecycle::TokenLifecycleManager;

/// Scopes requested at authorization time
pub const OAUTH_SCOPES: &str = "activity heartrate profile sleep";

/// Safety buffer subtracted from the token validity window, in milliseconds.
/// Absorbs clock skew and request latency so a token is never presented
/// upstream in the final seconds of its validity.
pub const EXPIRY_BUFFER_MS: i64 = 60_000;

/// The stored token blob: the provider's token response plus our bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TokenRecord {
    /// Bearer token for API calls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Single-use-replaceable refresh credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Validity window in seconds, counted from `obtained_at`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// Epoch milliseconds at which this record was obtained or refreshed
    #[serde(default)]
    pub obtained_at: i64,
    /// Granted scopes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Token type, normally `Bearer`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Token endpoint response body for both grant types
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderTokenResponse {
    /// New bearer token
    pub access_token: Option<String>,
    /// Rotated refresh token
    pub refresh_token: Option<String>,
    /// Validity window in seconds
    pub expires_in: Option<u64>,
    /// Granted scopes
    pub scope: Option<String>,
    /// Token type
    pub token_type: Option<String>,
}

impl TokenRecord {
    /// Build the initial record from a code-exchange response
    #[must_use]
    pub fn from_response(response: ProviderTokenResponse, now_ms: i64) -> Self {
        Self::default().merged_with(response, now_ms)
    }

    /// Merge a token response over this record: fields present in the
    /// response win, fields the response omits persist from the old record.
    /// `obtained_at` is always reset to `now_ms`.
    #[must_use]
    pub fn merged_with(&self, response: ProviderTokenResponse, now_ms: i64) -> Self {
        Self {
            access_token: response.access_token.or_else(|| self.access_token.clone()),
            refresh_token: response
                .refresh_token
                .or_else(|| self.refresh_token.clone()),
            expires_in: response.expires_in.or(self.expires_in),
            obtained_at: now_ms,
            scope: response.scope.or_else(|| self.scope.clone()),
            token_type: response.token_type.or_else(|| self.token_type.clone()),
        }
    }

    /// Whether the record needs a refresh before use.
    ///
    /// True when no access token is present, or when the known validity
    /// window (minus the safety buffer) has elapsed. A record without a known
    /// `expires_in` is trusted as long as it has an access token.
    #[must_use]
    pub fn is_expiring(&self, now_ms: i64) -> bool {
        if self.access_token.is_none() {
            return true;
        }
        match self.expires_in {
            Some(secs) if secs > 0 => {
                let age_ms = now_ms - self.obtained_at;
                age_ms > (secs as i64) * 1000 - EXPIRY_BUFFER_MS
            }
            _ => false,
        }
    }
}

/// Client for the provider's OAuth2 token endpoint
#[derive(Clone)]
pub struct OAuthClient {
    client: reqwest::Client,
    config: OAuthProviderConfig,
}

impl OAuthClient {
    /// Create a client from provider configuration
    #[must_use]
    pub fn new(client: reqwest::Client, config: OAuthProviderConfig) -> Self {
        Self { client, config }
    }

    /// Redirect URI registered with the provider
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.config.redirect_uri
    }

    /// Build the provider's authorization URL for the given CSRF state.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured authorize URL cannot be parsed.
    pub fn authorize_url(&self, state: &str) -> AppResult<String> {
        let mut url = url::Url::parse(&self.config.authorize_url)
            .map_err(|e| AppError::config(format!("invalid authorize URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", OAUTH_SCOPES)
            .append_pair("state", state);
        Ok(url.to_string())
    }

    /// HTTP Basic authorization header value from client credentials
    fn basic_auth(&self) -> String {
        let credentials = format!("{}:{}", self.config.client_id, self.config.client_secret);
        format!("Basic {}", general_purpose::STANDARD.encode(credentials))
    }

    async fn token_grant<E>(
        &self,
        params: &[(&str, &str)],
        on_reject: E,
    ) -> AppResult<ProviderTokenResponse>
    where
        E: Fn(String) -> AppError,
    {
        let response = self
            .client
            .post(&self.config.token_url)
            .header("Authorization", self.basic_auth())
            .form(params)
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(on_reject(body));
        }

        serde_json::from_str(&body)
            .map_err(|e| on_reject(format!("unparseable token response: {e}")))
    }

    /// Exchange an authorization code for the first token blob.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ExchangeFailed`] with the upstream body when the
    /// provider rejects the code, [`AppError::UpstreamUnavailable`] on
    /// transport failure.
    pub async fn exchange_code(&self, code: &str) -> AppResult<ProviderTokenResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        self.token_grant(&params, AppError::ExchangeFailed).await
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RefreshFailed`] with the upstream body when the
    /// provider rejects the refresh token, [`AppError::UpstreamUnavailable`]
    /// on transport failure.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<ProviderTokenResponse> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        self.token_grant(&params, AppError::RefreshFailed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(access: Option<&str>, expires_in: Option<u64>, obtained_at: i64) -> TokenRecord {
        TokenRecord {
            access_token: access.map(str::to_owned),
            refresh_token: Some("r1".into()),
            expires_in,
            obtained_at,
            scope: Some("activity".into()),
            token_type: Some("Bearer".into()),
        }
    }

    #[test]
    fn test_fresh_token_is_not_expiring() {
        let rec = record(Some("a"), Some(3600), 0);
        assert!(!rec.is_expiring(10_000));
    }

    #[test]
    fn test_expiry_boundary_honors_buffer() {
        let rec = record(Some("a"), Some(3600), 0);
        // Threshold is expires_in*1000 - 60_000 = 3_540_000 ms.
        assert!(!rec.is_expiring(3_540_000));
        assert!(rec.is_expiring(3_540_001));
    }

    #[test]
    fn test_missing_access_token_forces_refresh() {
        let rec = record(None, Some(3600), 0);
        assert!(rec.is_expiring(1));
    }

    #[test]
    fn test_unknown_expiry_is_trusted() {
        let rec = record(Some("a"), None, 0);
        assert!(!rec.is_expiring(i64::MAX));
    }

    #[test]
    fn test_merge_new_fields_win_old_fields_persist() {
        let old = record(Some("old-access"), Some(3600), 5);
        let next = ProviderTokenResponse {
            access_token: Some("new-access".into()),
            refresh_token: None,
            expires_in: Some(7200),
            scope: None,
            token_type: None,
        };
        let merged = old.merged_with(next, 42);
        assert_eq!(merged.access_token.as_deref(), Some("new-access"));
        assert_eq!(merged.refresh_token.as_deref(), Some("r1"));
        assert_eq!(merged.expires_in, Some(7200));
        assert_eq!(merged.scope.as_deref(), Some("activity"));
        assert_eq!(merged.obtained_at, 42);
    }
}
