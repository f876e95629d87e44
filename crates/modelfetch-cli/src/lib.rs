#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use dotenvy as _;
use tracing_subscriber as _;

// Silence unused dev-dependency warnings (used by integration tests)
#[cfg(test)]
use axum as _;
#[cfg(test)]
use serde_json as _;

pub mod error;
pub mod git;
pub mod output;
pub mod parser;
pub mod progress;
pub mod report;
pub mod run;

pub use error::CliError;
pub use parser::Cli;
pub use run::run;
