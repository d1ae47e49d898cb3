/// Resource limits applied to every evaluation
///
/// Expressions are small in practice; the defaults leave a wide margin while
/// still bounding what a hostile formula can cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Maximum expression length in bytes, checked before scanning
    /// Real usage: ~100 bytes, Limit: 64KB
    pub max_expression_bytes: usize,

    /// Maximum number of brackets, calls and array literals open at once
    /// Real usage: ~3 levels, Limit: 100 (30x+)
    pub max_nesting_depth: usize,

    /// Maximum number of tokens processed by one evaluation
    pub max_evaluation_steps: usize,

    /// Maximum evaluation time in milliseconds
    /// Real usage: well under 1ms, Limit: 1000ms
    pub max_evaluation_time_ms: u64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_expression_bytes: 64 * 1024, // 64 KB
            max_nesting_depth: 100,
            max_evaluation_steps: 100_000,
            max_evaluation_time_ms: 1000, // 1 second
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// No practical limits, for trusted input
    pub fn unlimited() -> Self {
        Self {
            max_expression_bytes: usize::MAX,
            max_nesting_depth: usize::MAX,
            max_evaluation_steps: usize::MAX,
            max_evaluation_time_ms: u64::MAX,
        }
    }
}
