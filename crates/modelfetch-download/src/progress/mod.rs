//! Progress event helpers for consumers of the engine's progress channel.

mod throttle;

pub use throttle::ProgressThrottle;
