//! EdgeViewer - per-frame NV21 processing bridge
//!
//! Takes one NV21 camera frame at a time, decodes it to colour, applies the
//! selected visualization (Canny edges or grayscale), and writes a
//! single-channel `width × height` result back for display. When the
//! transform output is almost empty the raw luma plane is passed through
//! instead, which makes upstream packing bugs visible on screen.
//!
//! State lives in a [`ViewerContext`] owned by the host. For hosts that
//! expect process-wide entry points, [`set_viewer_mode`] and
//! [`process_frame`] operate on a lazily created [`global`] context.
//!
//! # Example
//! ```
//! use edge_viewer::{ViewerContext, ViewerMode};
//!
//! let ctx = ViewerContext::new();
//! ctx.set_mode(ViewerMode::Grayscale);
//!
//! // 4x4 mid-gray frame: 16 luma bytes followed by 8 chroma bytes
//! let input = [128u8; 24];
//! let mut output = [0u8; 16];
//! let report = ctx.process_frame(&input, 4, 4, &mut output).unwrap();
//! assert_eq!(report.mode, ViewerMode::Grayscale);
//! assert!(output.iter().all(|&v| v == 130));
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Pipeline tuning and environment overrides
pub mod config;
/// Host-owned mode and frame counter state
pub mod context;
/// Periodic frame statistics
pub mod diagnostics;
/// Error type returned by the pipeline
pub mod error;
/// Core data structures (frames, rasters, modes)
pub mod models;
/// Pipeline stages (convert, transform, normalize, fallback)
pub mod pipeline;
/// Helpers for the CLI and tests (image files in and out)
pub mod tools;
/// Image processing kernels (YUV, grayscale, edges, resize, packing)
pub mod utils;

pub use config::PipelineConfig;
pub use context::{FrameReport, ViewerContext};
pub use diagnostics::FrameStats;
pub use error::FrameError;
pub use models::{Nv21Frame, Raster, ViewerMode};
pub use pipeline::OutputSource;

use std::sync::OnceLock;

/// Tracing target for every event this crate emits.
pub const LOG_TARGET: &str = "EdgeViewer";

/// Readiness string returned by [`native_hello`].
pub const READY_MESSAGE: &str = "EdgeViewer JNI ready";

static GLOBAL: OnceLock<ViewerContext> = OnceLock::new();

/// Process-wide context, configured from the environment on first use.
pub fn global() -> &'static ViewerContext {
    GLOBAL.get_or_init(|| ViewerContext::with_config(PipelineConfig::from_env()))
}

/// Set the process-wide mode: `1` is grayscale, anything else edges.
pub fn set_viewer_mode(mode: i32) {
    global().set_viewer_mode(mode);
}

/// Process one frame with the process-wide context.
///
/// See [`ViewerContext::process_frame`].
pub fn process_frame(
    input: &[u8],
    width: usize,
    height: usize,
    output: &mut [u8],
) -> Result<FrameReport, FrameError> {
    global().process_frame(input, width, height, output)
}

/// Bridge health check.
pub fn native_hello() -> &'static str {
    READY_MESSAGE
}

/// Row count of a 3×3 identity matrix; a smoke test for the image stack.
pub fn identity_rows() -> usize {
    let eye = image::GrayImage::from_fn(3, 3, |x, y| image::Luma([u8::from(x == y)]));
    eye.height() as usize
}
