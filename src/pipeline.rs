//! Stages of the per-frame pipeline.
//!
//! Each stage is a free function so it can be exercised on its own;
//! [`crate::ViewerContext::process_frame`] chains them:
//! convert -> transform -> normalize -> fallback decision -> copy.

use crate::config::PipelineConfig;
use crate::models::{Nv21Frame, Raster, ViewerMode};
use crate::utils::edges::canny_rgb;
use crate::utils::grayscale::rgb_image_to_luma;
use crate::utils::resize::resize_nearest;
use crate::utils::yuv::{nv21_to_rgb, nv21_to_rgb_parallel};
use image::{GrayImage, RgbImage};
use std::borrow::Cow;

/// Which bytes ended up in the host's output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSource {
    /// The transform result
    Transform,
    /// The first `width*height` input bytes (the NV21 luma plane)
    LumaPassthrough,
}

/// Outcome of the integrity check on a normalized transform result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackDecision {
    /// Bytes to hand back to the host
    pub source: OutputSource,
    /// Non-zero share of the transform result
    pub non_zero_percent: f32,
}

/// Decode the NV21 frame into interleaved RGB.
pub fn convert_frame(frame: &Nv21Frame<'_>, parallel: bool) -> RgbImage {
    if parallel {
        nv21_to_rgb_parallel(frame)
    } else {
        nv21_to_rgb(frame)
    }
}

/// Run the transform selected by `mode` and size the result to
/// `width × height`.
pub fn apply_transform(
    rgb: &RgbImage,
    mode: ViewerMode,
    width: u32,
    height: u32,
    config: &PipelineConfig,
) -> Raster {
    let result = match mode {
        ViewerMode::EdgeDetect => canny_rgb(rgb, config.canny_low, config.canny_high),
        ViewerMode::Grayscale => rgb_image_to_luma(rgb, config.parallel),
    };
    Raster::Luma8(resize_nearest(result, width, height))
}

fn fit(gray: GrayImage, width: u32, height: u32) -> Cow<'static, [u8]> {
    Cow::Owned(resize_nearest(gray, width, height).into_raw())
}

fn compact_rows(data: &[u8], width: u32, height: u32, row_stride: usize) -> GrayImage {
    let w = width as usize;
    let mut out = GrayImage::new(width, height);
    for (y, dst) in out.chunks_exact_mut(w.max(1)).enumerate() {
        let range = y
            .checked_mul(row_stride)
            .and_then(|start| Some(start..start.checked_add(w)?));
        // Rows the buffer cannot cover stay zero.
        if let Some(src) = range.and_then(|r| data.get(r)) {
            dst.copy_from_slice(src);
        }
    }
    out
}

/// View the transform result as exactly `width*height` packed 8-bit bytes.
///
/// A conforming [`Raster::Luma8`] (or packed strided buffer) is borrowed
/// without copying. Other layouts are converted to 8-bit single channel
/// (16-bit saturates, RGB becomes luma), compacted, and resized if their
/// dimensions differ.
pub fn normalize_output(raster: &Raster, width: u32, height: u32) -> Cow<'_, [u8]> {
    let len = width as usize * height as usize;
    match raster {
        Raster::Luma8(img) if img.dimensions() == (width, height) => {
            Cow::Borrowed(img.as_raw().as_slice())
        }
        Raster::Luma8(img) => fit(img.clone(), width, height),
        Raster::Luma16(img) => {
            let (w, h) = img.dimensions();
            let raw = img.as_raw().iter().map(|&v| v.min(255) as u8).collect();
            let gray = GrayImage::from_raw(w, h, raw).unwrap_or_else(|| GrayImage::new(w, h));
            fit(gray, width, height)
        }
        Raster::Rgb8(img) => fit(rgb_image_to_luma(img, false), width, height),
        Raster::Strided {
            data,
            width: w,
            height: h,
            row_stride,
        } => {
            if (*w, *h) == (width, height) && *row_stride == *w as usize && data.len() >= len {
                Cow::Borrowed(&data[..len])
            } else {
                fit(compact_rows(data, *w, *h, *row_stride), width, height)
            }
        }
    }
}

/// `100 * nonZero / total` over the first `total` bytes; 0 when `total == 0`.
pub fn non_zero_percent(bytes: &[u8], total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    let non_zero = bytes.iter().take(total).filter(|&&v| v != 0).count();
    100.0 * non_zero as f32 / total as f32
}

/// Use the transform output unless less than `threshold_percent` of it is
/// non-zero, in which case the raw luma plane is passed through.
pub fn fallback_decision(bytes: &[u8], total: usize, threshold_percent: f32) -> FallbackDecision {
    let percent = non_zero_percent(bytes, total);
    let source = if percent < threshold_percent {
        OutputSource::LumaPassthrough
    } else {
        OutputSource::Transform
    };
    FallbackDecision {
        source,
        non_zero_percent: percent,
    }
}
