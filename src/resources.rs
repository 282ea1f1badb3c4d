// ABOUTME: Shared server resources wired once at startup
// ABOUTME: Holds the store, OAuth flow, lifecycle manager and aggregator
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared resources injected into every route handler.

use crate::aggregator::DailyMetricAggregator;
use crate::config::ServerConfig;
use crate::oauth::{AuthorizationFlow, OAuthClient, TokenLifecycleManager};
use crate::providers::UpstreamClient;
use crate::status::StatusReporter;
use crate::store::TokenStore;
use crate::utils::http_client::shared_client;
use std::sync::Arc;

/// Everything a request handler needs, constructed once at startup
pub struct ServerResources {
    /// Post-callback redirect target
    pub app_base_url: String,
    /// Key/value persistence
    pub store: Arc<dyn TokenStore>,
    /// Two-step authorization flow
    pub flow: AuthorizationFlow,
    /// Token validity and refresh
    pub lifecycle: Arc<TokenLifecycleManager>,
    /// Metric fan-out and merge
    pub aggregator: DailyMetricAggregator,
    /// Connection status reporting
    pub reporter: StatusReporter,
}

impl ServerResources {
    /// Wire all components from configuration and a store backend
    #[must_use]
    pub fn new(config: &ServerConfig, store: Arc<dyn TokenStore>) -> Self {
        let http = shared_client().clone();
        let oauth = OAuthClient::new(http.clone(), config.oauth.clone());
        let upstream = UpstreamClient::new(http, config.upstream_base.clone());

        let lifecycle = Arc::new(TokenLifecycleManager::new(store.clone(), oauth.clone()));
        let flow = AuthorizationFlow::new(store.clone(), oauth);
        let aggregator = DailyMetricAggregator::new(upstream.clone());
        let reporter = StatusReporter::new(store.clone(), lifecycle.clone(), upstream);

        Self {
            app_base_url: config.app_base_url.clone(),
            store,
            flow,
            lifecycle,
            aggregator,
            reporter,
        }
    }
}
