//! Progress throttling.
//!
//! The engine reports every chunk; renderers that print lines use this to
//! keep output readable.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use modelfetch_core::{ProgressEvent, TaskState};

/// Per-file rate limiter for progress events.
///
/// Byte-count updates for a file pass at most once per interval. State
/// changes always pass, so the first event, the start of streaming and the
/// final state are never dropped.
pub struct ProgressThrottle {
    last: HashMap<usize, (Instant, TaskState)>,
    min_interval: Duration,
}

impl ProgressThrottle {
    /// Create a new throttle with the specified minimum interval.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last: HashMap::new(),
            min_interval,
        }
    }

    /// Create a throttle with a default interval of 100ms.
    pub fn default_interval() -> Self {
        Self::new(Duration::from_millis(100))
    }

    /// Check whether `event` should be shown.
    pub fn should_emit(&mut self, event: &ProgressEvent) -> bool {
        let now = Instant::now();
        let passes = self.last.get(&event.index).is_none_or(|&(at, state)| {
            state != event.state || now.duration_since(at) >= self.min_interval
        });
        if passes {
            self.last.insert(event.index, (now, event.state));
        }
        passes
    }

    /// Forget a file, so its next event passes.
    pub fn reset(&mut self, index: usize) {
        self.last.remove(&index);
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::default_interval()
    }
}
