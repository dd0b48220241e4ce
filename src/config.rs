//! Balance parameter and tree configuration
//!
//! α ∈ [0.5, 1) bounds how lopsided a subtree may become:
//! - α-height of a subtree with n nodes: ⌊log_{1/α}(n)⌋ + 1
//! - α-weight: each child holds at most α·n nodes

use crate::ScapegoatError;

/// Default balance parameter
pub const DEFAULT_ALPHA: f64 = 0.6;

/// Absorbs floating-point error when `n` is an exact power of 1/α
const LOG_EPSILON: f64 = 1e-9;

/// Validated balance parameter α
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Alpha(f64);

impl Alpha {
    /// Validate `value` against 0.5 ≤ α < 1
    pub fn new(value: f64) -> Result<Self, ScapegoatError> {
        // NaN fails both comparisons
        if (0.5..1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ScapegoatError::InvalidAlpha(value))
        }
    }

    /// Raw α value
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Deepest node (in edges) allowed in a subtree of `size` nodes:
    /// ⌊log_{1/α}(size)⌋
    pub fn depth_bound(self, size: usize) -> usize {
        if size <= 1 {
            return 0;
        }
        let log = (size as f64).ln() / (1.0 / self.0).ln();
        (log + LOG_EPSILON).floor() as usize
    }

    /// Tallest subtree (in nodes) allowed for `size` nodes:
    /// ⌊log_{1/α}(size)⌋ + 1, and 0 for an empty subtree
    pub fn height_bound(self, size: usize) -> usize {
        if size == 0 {
            0
        } else {
            self.depth_bound(size) + 1
        }
    }

    /// Largest child size an α-weight-balanced subtree of `size` nodes may have
    #[inline]
    pub fn weight_limit(self, size: usize) -> f64 {
        self.0 * size as f64
    }
}

impl TryFrom<f64> for Alpha {
    type Error = ScapegoatError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Configuration for a [`crate::ScapegoatTree`]
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Balance parameter α (checked on construction)
    pub alpha: f64,

    /// Record every rebuild as a [`crate::RebuildEvent`]
    pub profile_rebuilds: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            profile_rebuilds: false,
        }
    }
}

impl TreeConfig {
    /// Configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set α
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Enable the rebuild event log.
    pub fn with_rebuild_profiling(mut self, enabled: bool) -> Self {
        self.profile_rebuilds = enabled;
        self
    }

    /// Check the configuration and return the validated α
    pub fn validate(&self) -> Result<Alpha, ScapegoatError> {
        Alpha::new(self.alpha)
    }
}
