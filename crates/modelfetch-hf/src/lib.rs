#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// Allow private types in public type alias - DefaultHfClient is meant to be used
// through the ListingResolverPort trait, not its internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod parsing;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultHfClient;

// Configuration
pub use config::HfClientConfig;

// Cursor construction, exposed for servers/tests that emulate the listing API
pub use url::encode_cursor;

// Silence unused dev-dependency warnings (used by integration tests)
#[cfg(test)]
use axum as _;
