//! Image processing building blocks
//!
//! This module provides the per-stage kernels of the frame pipeline:
//! - NV21 decoding and encoding (BT.601 fixed point)
//! - Grayscale conversion (RGB to luminance)
//! - Canny edge detection with hysteresis
//! - Nearest-neighbour resizing
//! - Packing camera planes into NV21

pub mod edges;
pub mod grayscale;
pub mod packing;
pub mod resize;
pub mod yuv;
