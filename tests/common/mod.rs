// ABOUTME: Shared fixtures for the integration test suite
// ABOUTME: Wires ServerResources against a wiremock upstream with a memory store
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code)]

use fitgate::config::{OAuthProviderConfig, ServerConfig};
use fitgate::oauth::TokenRecord;
use fitgate::resources::ServerResources;
use fitgate::store::{keys, MemoryStore, TokenStore};
use std::sync::Arc;

pub const TEST_CLIENT_ID: &str = "test-client-id";
pub const TEST_CLIENT_SECRET: &str = "test-client-secret";
pub const TEST_APP_BASE_URL: &str = "https://app.example.com/";

/// Configuration pointing both the token endpoint and the REST API at the
/// given mock server base URL.
pub fn test_config(upstream: &str) -> ServerConfig {
    ServerConfig {
        http_port: 0,
        app_base_url: TEST_APP_BASE_URL.to_owned(),
        upstream_base: upstream.to_owned(),
        oauth: OAuthProviderConfig {
            client_id: TEST_CLIENT_ID.to_owned(),
            client_secret: TEST_CLIENT_SECRET.to_owned(),
            redirect_uri: "https://gateway.example.com/callback".to_owned(),
            authorize_url: "https://provider.example.com/oauth2/authorize".to_owned(),
            token_url: format!("{upstream}/oauth2/token"),
        },
    }
}

/// Full resource wiring over a fresh in-memory store
pub fn test_resources(upstream: &str) -> Arc<ServerResources> {
    let store = Arc::new(MemoryStore::new());
    Arc::new(ServerResources::new(&test_config(upstream), store))
}

/// A complete token record obtained at `obtained_at` with an 8 h window
pub fn token_record(obtained_at: i64) -> TokenRecord {
    TokenRecord {
        access_token: Some("atk-1".to_owned()),
        refresh_token: Some("rtk-1".to_owned()),
        expires_in: Some(28_800),
        obtained_at,
        scope: Some("activity heartrate profile sleep".to_owned()),
        token_type: Some("Bearer".to_owned()),
    }
}

/// Seed the stored token blob directly
pub async fn seed_tokens(store: &dyn TokenStore, record: &TokenRecord) -> anyhow::Result<()> {
    store
        .put(keys::TOKENS, &serde_json::to_string(record)?)
        .await?;
    Ok(())
}
