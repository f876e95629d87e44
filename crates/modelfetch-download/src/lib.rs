#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]
//!
//! # Modules
//!
//! - `engine` - worker pool and result collection
//! - `worker` - fresh / resumed / already-complete decision and streaming
//! - `request` - destination planning and path validation
//! - `progress` - throttling for line-based progress output
//! - `verify` - sha256 checks against listing hashes

mod config;
mod engine;
mod progress;
mod request;
mod task;
mod verify;
mod worker;

pub use config::{DEFAULT_CHUNK_SIZE, DEFAULT_PROGRESS_CAPACITY, EngineConfig};
pub use engine::DownloadEngine;
pub use progress::ProgressThrottle;
pub use request::{DownloadRequest, validate_relative_path};
pub use verify::{VerifyResult, compute_sha256, verify_file, verify_plan};

// Re-export core types for convenience
pub use modelfetch_core::{DownloadOutcome, DownloadResult, ProgressEvent, TaskState};

// Silence unused dev-dependency warnings (used by integration tests)
#[cfg(test)]
use axum as _;
