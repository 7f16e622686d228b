//! Engine tuning knobs.

use serde::{Deserialize, Serialize};

/// Tolerance used for every float comparison the engine makes.
pub const DEFAULT_SNAP_EPSILON: f64 = 1e-5;

/// Upper bound on condense iterations; each pass removes at least one
/// row or column, so this only guards against a corrupted grid.
pub const DEFAULT_MAX_CONDENSE_PASSES: usize = 4096;

/// Configuration for a layout session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Distance under which a slice position reuses an existing edge
    pub snap_epsilon: f64,
    /// Maximum number of bands collapsed after one structural change
    pub max_condense_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            snap_epsilon: DEFAULT_SNAP_EPSILON,
            max_condense_passes: DEFAULT_MAX_CONDENSE_PASSES,
        }
    }
}

impl LayoutConfig {
    /// Parse a JSON config; missing fields fall back to defaults.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_snap_epsilon(mut self, snap_epsilon: f64) -> Self {
        self.snap_epsilon = snap_epsilon;
        self
    }
}
