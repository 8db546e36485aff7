//! Pipeline tuning values.
//!
//! Defaults match the values the host bridge shipped with. The process-wide
//! context reads overrides from the environment once; tests build a
//! [`PipelineConfig`] directly.

/// Lower hysteresis threshold of the edge operator.
pub const DEFAULT_CANNY_LOW: f32 = 100.0;
/// Upper hysteresis threshold of the edge operator.
pub const DEFAULT_CANNY_HIGH: f32 = 200.0;
/// Diagnostics are sampled on every Nth processed frame.
pub const DEFAULT_STATS_INTERVAL: u32 = 10;
/// Below this share of non-zero pixels the raw luma plane is passed through.
pub const DEFAULT_FALLBACK_THRESHOLD_PERCENT: f32 = 2.0;

fn parse_env_f32(name: &str, default: f32) -> f32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn parse_env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

/// Tunable constants of the frame pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Weak-edge threshold on the L1 gradient magnitude
    pub canny_low: f32,
    /// Strong-edge threshold on the L1 gradient magnitude
    pub canny_high: f32,
    /// Sampling cadence for diagnostics; 0 disables sampling
    pub stats_interval: u32,
    /// Minimum non-zero percentage for the transform output to be used
    pub fallback_threshold_percent: f32,
    /// Convert rows on the rayon pool. The call itself stays synchronous.
    pub parallel: bool,
}

impl PipelineConfig {
    /// Defaults with overrides from `EDGE_VIEWER_*` environment variables.
    ///
    /// Unset or unparsable variables keep their default.
    pub fn from_env() -> Self {
        Self {
            canny_low: parse_env_f32("EDGE_VIEWER_CANNY_LOW", DEFAULT_CANNY_LOW),
            canny_high: parse_env_f32("EDGE_VIEWER_CANNY_HIGH", DEFAULT_CANNY_HIGH),
            stats_interval: parse_env_u32("EDGE_VIEWER_STATS_INTERVAL", DEFAULT_STATS_INTERVAL),
            fallback_threshold_percent: parse_env_f32(
                "EDGE_VIEWER_FALLBACK_PERCENT",
                DEFAULT_FALLBACK_THRESHOLD_PERCENT,
            ),
            parallel: parse_env_bool_u8("EDGE_VIEWER_PARALLEL", false),
        }
    }

    /// Replace the hysteresis thresholds.
    pub fn with_canny_thresholds(mut self, low: f32, high: f32) -> Self {
        self.canny_low = low;
        self.canny_high = high;
        self
    }

    /// Replace the diagnostics cadence.
    pub fn with_stats_interval(mut self, interval: u32) -> Self {
        self.stats_interval = interval;
        self
    }

    /// Replace the fallback threshold.
    pub fn with_fallback_threshold(mut self, percent: f32) -> Self {
        self.fallback_threshold_percent = percent;
        self
    }

    /// Enable or disable row-parallel conversion.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canny_low: DEFAULT_CANNY_LOW,
            canny_high: DEFAULT_CANNY_HIGH,
            stats_interval: DEFAULT_STATS_INTERVAL,
            fallback_threshold_percent: DEFAULT_FALLBACK_THRESHOLD_PERCENT,
            parallel: false,
        }
    }
}
