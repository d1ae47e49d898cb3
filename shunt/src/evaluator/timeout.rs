//! Wall-clock budget for a single evaluation
//!
//! The evaluator polls the budget once per token. wasm32 has no `Instant`, so
//! there the budget is never enforced.

use crate::{ResourceLimits, ShuntError};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

pub struct TimeoutTracker {
    #[cfg(not(target_arch = "wasm32"))]
    started: Instant,
}

impl TimeoutTracker {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            started: Instant::now(),
        }
    }

    /// Milliseconds since the tracker was created
    #[cfg(not(target_arch = "wasm32"))]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn elapsed_ms(&self) -> u64 {
        0
    }

    /// Fails once the budget is spent. `step` is the 1-based index of the
    /// token about to be processed and ends up in the suggestion.
    pub fn check(&self, limits: &ResourceLimits, step: usize) -> Result<(), ShuntError> {
        let elapsed = self.elapsed_ms();
        if elapsed <= limits.max_evaluation_time_ms {
            return Ok(());
        }
        Err(ShuntError::ResourceLimitExceeded {
            limit_name: "max_evaluation_time_ms".to_string(),
            limit_value: limits.max_evaluation_time_ms.to_string(),
            actual_value: elapsed.to_string(),
            suggestion: format!(
                "Time ran out at token {} after {}ms. Simplify the expression or raise max_evaluation_time_ms.",
                step, elapsed
            ),
        })
    }
}

impl Default for TimeoutTracker {
    fn default() -> Self {
        Self::new()
    }
}
