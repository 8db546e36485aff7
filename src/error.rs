//! Error type for frame processing.
//!
//! Non-fatal conditions (near-empty transform output, sampled statistics) are
//! reported through `tracing` and never surface here. Everything in this enum
//! stops the call before any byte of the output buffer is written.

/// Errors returned by the frame pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Width or height is zero, odd, or overflows the buffer arithmetic.
    #[error("invalid frame dimensions {width}x{height} (must be non-zero and even)")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },

    /// Input is shorter than `width*height + width*height/2`.
    #[error("input length {len} < expected NV21 size {expected}")]
    InputTooSmall {
        /// Bytes supplied
        len: usize,
        /// Bytes an NV21 frame of this size needs
        expected: usize,
    },

    /// Output cannot hold `width*height` bytes.
    #[error("output length {len} < required luma size {expected}")]
    OutputTooSmall {
        /// Bytes available
        len: usize,
        /// `width*height`
        expected: usize,
    },

    /// A YUV_420_888 plane is too short for its declared strides.
    #[error("{plane} plane index {index} out of bounds (len {len})")]
    PlaneOutOfBounds {
        /// `"Y"`, `"U"` or `"V"`
        plane: &'static str,
        /// Offending byte index
        index: usize,
        /// Plane length
        len: usize,
    },
}
