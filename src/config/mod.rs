// ABOUTME: Configuration module for environment-driven server settings
// ABOUTME: Re-exports the environment configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration management.
//!
//! The gateway is configured exclusively through environment variables,
//! validated once at startup.

/// Environment-based configuration loading
pub mod environment;

pub use environment::{OAuthProviderConfig, ServerConfig};
