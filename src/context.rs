//! Host-owned processing state.
//!
//! The Viewer Mode and the frame counter are plain atomics so the per-frame
//! path takes no lock. Calls are still expected to be serialized by the
//! host; concurrent callers only race on which mode a frame observes and on
//! the sampling cadence.

use crate::LOG_TARGET;
use crate::config::PipelineConfig;
use crate::diagnostics::{self, FrameStats};
use crate::error::FrameError;
use crate::models::{Nv21Frame, ViewerMode};
use crate::pipeline::{self, OutputSource};
use std::sync::atomic::{AtomicU8, AtomicU32, Ordering};
use tracing::{debug, warn};

/// What happened to one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Mode the frame was processed in
    pub mode: ViewerMode,
    /// Where the output bytes came from
    pub source: OutputSource,
    /// Non-zero share of the transform result, before any fallback
    pub non_zero_percent: f32,
    /// Counter value after this frame (1 for the first frame)
    pub frame_index: u32,
    /// Present on sampled frames
    pub stats: Option<FrameStats>,
}

/// Mode, frame counter, and tuning for one stream of frames.
#[derive(Debug)]
pub struct ViewerContext {
    mode: AtomicU8,
    frame_counter: AtomicU32,
    config: PipelineConfig,
}

impl ViewerContext {
    /// Context with default tuning, in edge mode.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Context with explicit tuning, in edge mode.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            mode: AtomicU8::new(ViewerMode::EdgeDetect.as_raw() as u8),
            frame_counter: AtomicU32::new(0),
            config,
        }
    }

    /// Tuning in effect
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Host selector: `1` switches to grayscale, anything else to edges.
    pub fn set_viewer_mode(&self, mode: i32) {
        self.set_mode(ViewerMode::from_raw(mode));
    }

    /// Switch the mode for subsequent frames.
    pub fn set_mode(&self, mode: ViewerMode) {
        self.mode.store(mode.as_raw() as u8, Ordering::Relaxed);
    }

    /// Mode the next frame will use.
    pub fn mode(&self) -> ViewerMode {
        ViewerMode::from_raw(self.mode.load(Ordering::Relaxed) as i32)
    }

    /// Frames processed so far (wrapping).
    pub fn frame_count(&self) -> u32 {
        self.frame_counter.load(Ordering::Relaxed)
    }

    /// Restart the sampling cadence.
    pub fn reset_frame_counter(&self) {
        self.frame_counter.store(0, Ordering::Relaxed);
    }

    /// Process one NV21 frame into `output`.
    ///
    /// On success exactly `width*height` bytes of `output` are written,
    /// either with the transform result or, when that result is nearly
    /// empty, with the input's luma plane. On error nothing is written and
    /// the frame counter does not move.
    pub fn process_frame(
        &self,
        input: &[u8],
        width: usize,
        height: usize,
        output: &mut [u8],
    ) -> Result<FrameReport, FrameError> {
        let mode = self.mode();
        debug!(
            target: LOG_TARGET,
            width,
            height,
            mode = mode.as_raw(),
            "processFrame called w={} h={} mode={}",
            width,
            height,
            mode.as_raw()
        );

        let frame = Nv21Frame::new(input, width, height)?;
        let total = frame.pixel_count();
        if output.len() < total {
            return Err(FrameError::OutputTooSmall {
                len: output.len(),
                expected: total,
            });
        }
        let (w, h) = (
            u32::try_from(width).map_err(|_| FrameError::InvalidDimensions { width, height })?,
            u32::try_from(height).map_err(|_| FrameError::InvalidDimensions { width, height })?,
        );

        let rgb = pipeline::convert_frame(&frame, self.config.parallel);
        let raster = pipeline::apply_transform(&rgb, mode, w, h, &self.config);
        let normalized = pipeline::normalize_output(&raster, w, h);

        let decision =
            pipeline::fallback_decision(&normalized, total, self.config.fallback_threshold_percent);
        match decision.source {
            OutputSource::LumaPassthrough => {
                warn!(
                    target: LOG_TARGET,
                    non_zero_percent = decision.non_zero_percent,
                    "processed image almost empty ({:.2}%); falling back to copying Y plane",
                    decision.non_zero_percent
                );
                output[..total].copy_from_slice(frame.y_plane());
            }
            OutputSource::Transform => {
                output[..total].copy_from_slice(&normalized[..total]);
            }
        }

        let frame_index = self
            .frame_counter
            .fetch_add(1, Ordering::Relaxed)
            .wrapping_add(1);
        let stats = diagnostics::sample(frame_index, self.config.stats_interval, &normalized);

        Ok(FrameReport {
            mode,
            source: decision.source,
            non_zero_percent: decision.non_zero_percent,
            frame_index,
            stats,
        })
    }
}

impl Default for ViewerContext {
    fn default() -> Self {
        Self::new()
    }
}
