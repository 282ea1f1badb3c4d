// ABOUTME: Integration tests for the connection status reporter
// ABOUTME: Verifies the never-fails contract under every failure mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0

mod common;

use anyhow::Result;
use fitgate::dates;
use fitgate::store::keys;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_empty_store_reports_disconnected_without_error() -> Result<()> {
    let server = MockServer::start().await;
    let resources = common::test_resources(&server.uri());

    let status = resources.reporter.status(dates::now_millis()).await;

    assert!(!status.connected);
    assert_eq!(status.last_sync_time, None);
    assert_eq!(status.error, None);
    Ok(())
}

#[tokio::test]
async fn test_connected_reports_latest_device_sync_and_caches_it() -> Result<()> {
    let server = MockServer::start().await;
    let resources = common::test_resources(&server.uri());

    let now = dates::now_millis();
    common::seed_tokens(resources.store.as_ref(), &common::token_record(now)).await?;

    Mock::given(method("GET"))
        .and(path("/1/user/-/devices.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"deviceVersion": "Charge 5", "lastSyncTime": "2024-03-09T22:10:00.000"},
            {"deviceVersion": "Aria Air", "lastSyncTime": "2024-03-10T07:55:00.000"},
            {"deviceVersion": "MobileTrack"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let status = resources.reporter.status(now).await;

    assert!(status.connected);
    assert_eq!(
        status.last_sync_time.as_deref(),
        Some("2024-03-10T07:55:00.000")
    );
    assert_eq!(status.error, None);

    // The timestamp is cached for quick display.
    assert_eq!(
        resources.store.get(keys::LAST_SYNC).await?.as_deref(),
        Some("2024-03-10T07:55:00.000")
    );
    Ok(())
}

#[tokio::test]
async fn test_dead_refresh_token_reports_disconnected_not_an_error() -> Result<()> {
    let server = MockServer::start().await;
    let resources = common::test_resources(&server.uri());

    common::seed_tokens(resources.store.as_ref(), &common::token_record(0)).await?;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    let status = resources.reporter.status(dates::now_millis()).await;

    assert!(!status.connected);
    assert_eq!(status.last_sync_time, None);
    assert!(status.error.is_some());
    Ok(())
}

#[tokio::test]
async fn test_device_list_failure_still_reports_connected() -> Result<()> {
    let server = MockServer::start().await;
    let resources = common::test_resources(&server.uri());

    let now = dates::now_millis();
    common::seed_tokens(resources.store.as_ref(), &common::token_record(now)).await?;

    Mock::given(method("GET"))
        .and(path("/1/user/-/devices.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("device service down"))
        .mount(&server)
        .await;

    let status = resources.reporter.status(now).await;

    // A usable token exists; only the sync timestamp is unknown.
    assert!(status.connected);
    assert_eq!(status.last_sync_time, None);
    assert!(status.error.is_some());
    Ok(())
}
