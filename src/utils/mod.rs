// ABOUTME: Shared utility modules
// ABOUTME: Currently HTTP client construction only
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared utilities.

/// Shared HTTP client with connection pooling
pub mod http_client;
