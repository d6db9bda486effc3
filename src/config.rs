//! Player configuration
//!
//! Read from an optional JSON file; every field has a default so partial
//! files are fine. Command line flags are applied on top in `main`.

use crate::error::PlayerResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub window_size: (f32, f32),
    /// Start the next race automatically once the current one finishes.
    pub autoplay: bool,
    /// Hard-resync the commentary when it drifts further than this from the
    /// video. Off when unset.
    pub drift_tolerance_secs: Option<f64>,
    pub drift_check_interval_ms: u64,
    pub playback_rates: Vec<f64>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            window_size: (1024.0, 720.0),
            autoplay: false,
            drift_tolerance_secs: None,
            drift_check_interval_ms: 1000,
            playback_rates: vec![0.5, 1.0, 1.5, 2.0],
        }
    }
}

impl PlayerConfig {
    pub fn load(path: &Path) -> PlayerResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: PlayerConfig = serde_json::from_str(&json)?;
        Ok(config.sanitized())
    }

    /// Drops unusable values instead of failing on them.
    pub fn sanitized(mut self) -> Self {
        self.playback_rates
            .retain(|rate| rate.is_finite() && *rate > 0.0);
        if self.playback_rates.is_empty() {
            self.playback_rates = vec![1.0];
        }
        self.drift_tolerance_secs = self
            .drift_tolerance_secs
            .filter(|tolerance| tolerance.is_finite() && *tolerance > 0.0);
        self.drift_check_interval_ms = self.drift_check_interval_ms.max(50);
        self
    }
}
