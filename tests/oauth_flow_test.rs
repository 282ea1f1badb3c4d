// ABOUTME: Integration tests for the authorization-code flow and its routes
// ABOUTME: Covers nonce issuance, CSRF validation and the callback exchange
//
// SPDX-License-Identifier: MIT OR Apache-2.0

mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use fitgate::oauth::flow::generate_state_nonce;
use fitgate::routes;
use fitgate::store::keys;
use http_body_util::BodyExt;
use serde_json::json;
use std::collections::HashMap;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_state_nonce_is_64_hex_chars_and_unique() {
    let a = generate_state_nonce();
    let b = generate_state_nonce();
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_begin_login_builds_authorize_url_with_stored_nonce() -> Result<()> {
    let server = MockServer::start().await;
    let resources = common::test_resources(&server.uri());

    let url = url::Url::parse(&resources.flow.begin_login().await?)?;
    assert_eq!(url.host_str(), Some("provider.example.com"));
    assert_eq!(url.path(), "/oauth2/authorize");

    let params: HashMap<String, String> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(params.get("response_type").map(String::as_str), Some("code"));
    assert_eq!(
        params.get("client_id").map(String::as_str),
        Some(common::TEST_CLIENT_ID)
    );
    assert_eq!(
        params.get("redirect_uri").map(String::as_str),
        Some("https://gateway.example.com/callback")
    );
    assert_eq!(
        params.get("scope").map(String::as_str),
        Some("activity heartrate profile sleep")
    );

    // The state parameter is the nonce that was persisted for the callback.
    let stored = resources.store.get(keys::OAUTH_STATE).await?;
    assert_eq!(params.get("state"), stored.as_ref());
    Ok(())
}

#[tokio::test]
async fn test_login_route_redirects_302_to_provider() -> Result<()> {
    let server = MockServer::start().await;
    let resources = common::test_resources(&server.uri());
    let app = routes::router(resources);

    let response = app
        .oneshot(Request::builder().uri("/login").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(location.starts_with("https://provider.example.com/oauth2/authorize?"));
    Ok(())
}

#[tokio::test]
async fn test_callback_without_code_is_bad_request() -> Result<()> {
    let server = MockServer::start().await;
    let resources = common::test_resources(&server.uri());
    let app = routes::router(resources);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/callback?state=whatever")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value =
        serde_json::from_slice(&response.into_body().collect().await?.to_bytes())?;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn test_callback_with_mismatched_state_is_bad_request() -> Result<()> {
    let server = MockServer::start().await;
    let resources = common::test_resources(&server.uri());

    resources.store.put(keys::OAUTH_STATE, "expected-nonce").await?;

    let app = routes::router(resources);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/callback?code=abc&state=forged-nonce")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_callback_with_expired_nonce_is_bad_request() -> Result<()> {
    let server = MockServer::start().await;
    let resources = common::test_resources(&server.uri());

    // Nonce never stored, as if the 600 s TTL elapsed.
    let app = routes::router(resources);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/callback?code=abc&state=stale-nonce")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_callback_exchanges_code_stores_tokens_and_redirects_home() -> Result<()> {
    let server = MockServer::start().await;
    let resources = common::test_resources(&server.uri());

    resources.store.put(keys::OAUTH_STATE, "good-nonce").await?;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "atk-1",
            "refresh_token": "rtk-1",
            "expires_in": 28_800,
            "scope": "activity heartrate profile sleep",
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = routes::router(resources.clone());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/callback?code=auth-code-1&state=good-nonce")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some(common::TEST_APP_BASE_URL)
    );

    let stored = resources.lifecycle.load().await?.unwrap();
    assert_eq!(stored.access_token.as_deref(), Some("atk-1"));
    assert_eq!(stored.refresh_token.as_deref(), Some("rtk-1"));

    // Single use: the nonce is consumed by the exchange.
    assert_eq!(resources.store.get(keys::OAUTH_STATE).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_rejected_code_exchange_is_a_server_error() -> Result<()> {
    let server = MockServer::start().await;
    let resources = common::test_resources(&server.uri());

    resources.store.put(keys::OAUTH_STATE, "good-nonce").await?;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid authorization code"))
        .mount(&server)
        .await;

    let app = routes::router(resources);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/callback?code=bad-code&state=good-nonce")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value =
        serde_json::from_slice(&response.into_body().collect().await?.to_bytes())?;
    assert_eq!(body["error"]["code"], "TOKEN_EXCHANGE_FAILED");
    Ok(())
}
