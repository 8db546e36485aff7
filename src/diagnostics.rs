//! Periodic frame statistics.
//!
//! Sampling reads the transform output before the fallback decision and only
//! logs; it never touches the bytes handed back to the host.

use crate::LOG_TARGET;
use tracing::info;

/// Summary of one single-channel frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Smallest byte value (255 for an empty frame)
    pub min: u8,
    /// Largest byte value (0 for an empty frame)
    pub max: u8,
    /// Count of non-zero bytes
    pub non_zero: usize,
    /// Bytes inspected
    pub total: usize,
}

impl FrameStats {
    /// Scan `bytes` once for min, max and non-zero count.
    pub fn compute(bytes: &[u8]) -> Self {
        let mut min = u8::MAX;
        let mut max = u8::MIN;
        let mut non_zero = 0usize;
        for &v in bytes {
            min = min.min(v);
            max = max.max(v);
            if v != 0 {
                non_zero += 1;
            }
        }
        Self {
            min,
            max,
            non_zero,
            total: bytes.len(),
        }
    }

    /// `100 * non_zero / total`, or 0 for an empty frame.
    pub fn non_zero_percent(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.non_zero as f32 / self.total as f32
        }
    }
}

/// True on every `interval`-th frame. An interval of 0 never samples.
pub fn should_sample(frame_index: u32, interval: u32) -> bool {
    interval != 0 && frame_index % interval == 0
}

/// Compute and log statistics when `frame_index` falls on the cadence.
pub fn sample(frame_index: u32, interval: u32, bytes: &[u8]) -> Option<FrameStats> {
    if !should_sample(frame_index, interval) {
        return None;
    }
    let stats = FrameStats::compute(bytes);
    info!(
        target: LOG_TARGET,
        frame = frame_index,
        min = stats.min,
        max = stats.max,
        non_zero_percent = stats.non_zero_percent(),
        "processFrame stats: min={} max={} nonZero={:.1}%",
        stats.min,
        stats.max,
        stats.non_zero_percent()
    );
    Some(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats() {
        let stats = FrameStats::compute(&[0, 5, 255, 0]);
        assert_eq!(stats.min, 0);
        assert_eq!(stats.max, 255);
        assert_eq!(stats.non_zero, 2);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.non_zero_percent(), 50.0);
    }

    #[test]
    fn test_empty_frame_does_not_divide_by_zero() {
        let stats = FrameStats::compute(&[]);
        assert_eq!(stats.non_zero_percent(), 0.0);
        assert_eq!((stats.min, stats.max), (255, 0));
    }

    #[test]
    fn test_cadence() {
        assert!(!should_sample(1, 10));
        assert!(!should_sample(9, 10));
        assert!(should_sample(10, 10));
        assert!(should_sample(20, 10));
        assert!(should_sample(3, 1));
        assert!(!should_sample(10, 0));
    }

    #[test]
    fn test_sample_only_on_cadence() {
        let bytes = [0u8, 1, 2, 3];
        assert_eq!(sample(3, 10, &bytes), None);
        let stats = sample(10, 10, &bytes).unwrap();
        assert_eq!((stats.min, stats.max, stats.non_zero), (0, 3, 3));
    }
}
