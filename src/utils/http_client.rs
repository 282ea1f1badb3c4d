// ABOUTME: Shared HTTP client with connection pooling and timeout configuration
// ABOUTME: One pooled client per process instead of per-request construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared HTTP client utilities.

use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or create the shared HTTP client.
///
/// Uses connection pooling and conservative timeouts; prefer this over
/// creating new clients.
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}
