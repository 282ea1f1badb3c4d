// ABOUTME: Environment variable configuration with fail-fast validation
// ABOUTME: Loads OAuth client credentials and server settings at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server configuration loaded from environment variables.
//!
//! All OAuth credentials are required; startup fails naming the missing
//! variable rather than deferring the error to the first request.

use crate::errors::{AppError, AppResult};
use std::env;

/// Default HTTP port when `HTTP_PORT` is unset
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Provider authorize endpoint (production default)
pub const FITBIT_AUTHORIZE_URL: &str = "https://www.fitbit.com/oauth2/authorize";

/// Provider token endpoint (production default)
pub const FITBIT_TOKEN_URL: &str = "https://api.fitbit.com/oauth2/token";

/// Provider REST API base (production default)
pub const FITBIT_API_BASE: &str = "https://api.fitbit.com";

/// OAuth client credentials and provider endpoints
#[derive(Debug, Clone)]
pub struct OAuthProviderConfig {
    /// OAuth2 client id
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// Redirect URI registered with the provider
    pub redirect_uri: String,
    /// Authorization endpoint
    pub authorize_url: String,
    /// Token endpoint
    pub token_url: String,
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP bind port
    pub http_port: u16,
    /// Application base URL, the post-callback redirect target
    pub app_base_url: String,
    /// Provider REST API base URL
    pub upstream_base: String,
    /// OAuth client configuration
    pub oauth: OAuthProviderConfig,
}

fn require_env(name: &str) -> AppResult<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::config(format!("{name} not set")))
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first missing required
    /// variable (`FITBIT_CLIENT_ID`, `FITBIT_CLIENT_SECRET`,
    /// `FITBIT_REDIRECT_URI`, `APP_BASE_URL`).
    pub fn from_env() -> AppResult<Self> {
        let http_port = env::var("HTTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_HTTP_PORT);

        Ok(Self {
            http_port,
            app_base_url: require_env("APP_BASE_URL")?,
            upstream_base: FITBIT_API_BASE.to_owned(),
            oauth: OAuthProviderConfig {
                client_id: require_env("FITBIT_CLIENT_ID")?,
                client_secret: require_env("FITBIT_CLIENT_SECRET")?,
                redirect_uri: require_env("FITBIT_REDIRECT_URI")?,
                authorize_url: FITBIT_AUTHORIZE_URL.to_owned(),
                token_url: FITBIT_TOKEN_URL.to_owned(),
            },
        })
    }

    /// Configuration summary for startup logging, without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "fitgate configuration:\n\
             - HTTP Port: {}\n\
             - App Base URL: {}\n\
             - Redirect URI: {}\n\
             - Upstream: {}",
            self.http_port, self.app_base_url, self.oauth.redirect_uri, self.upstream_base
        )
    }
}
