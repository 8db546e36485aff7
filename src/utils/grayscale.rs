//! Convert RGB image to grayscale
//! Y = 0.299*R + 0.587*G + 0.114*B
//! Uses 14-bit fixed point: Y = (4899*R + 9617*G + 1868*B + 8192) >> 14
//!
//! The coefficients sum to 1 << 14, so uniform gray maps to itself and the
//! result never exceeds 255.

use crate::error::FrameError;
use image::{GrayImage, RgbImage};
use rayon::prelude::*;

const SHIFT: u32 = 14;
const ROUND: u32 = 1 << (SHIFT - 1);
const COEF_R: u32 = 4899;
const COEF_G: u32 = 9617;
const COEF_B: u32 = 1868;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32 + ROUND) >> SHIFT) as u8
}

fn convert_into(rgb: &[u8], gray: &mut [u8]) {
    let mut src = rgb.chunks_exact(24);
    let mut dst = gray.chunks_exact_mut(8);

    // Process 8 pixels at a time
    for (block, out) in (&mut src).zip(&mut dst) {
        for j in 0..8 {
            let idx = j * 3;
            out[j] = luma(block[idx], block[idx + 1], block[idx + 2]);
        }
    }

    // Process remaining pixels
    for (px, out) in src
        .remainder()
        .chunks_exact(3)
        .zip(dst.into_remainder().iter_mut())
    {
        *out = luma(px[0], px[1], px[2]);
    }
}

/// Convert RGB image to grayscale
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut gray = vec![0u8; pixel_count];
    convert_into(&rgb[..pixel_count * 3], &mut gray);
    gray
}

/// Convert RGB to grayscale using parallel processing
/// Processes rows in parallel for multi-core speedup
pub fn rgb_to_grayscale_parallel(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut gray = vec![0u8; pixel_count];
    if width == 0 {
        return gray;
    }

    // Process rows in parallel
    gray.par_chunks_mut(width)
        .zip(rgb[..pixel_count * 3].par_chunks(width * 3))
        .for_each(|(row, src)| convert_into(src, row));

    gray
}

/// Convert RGB to grayscale using a pre-allocated buffer (no allocation)
///
/// # Arguments
/// * `rgb` - Input RGB image data (at least `width * height * 3` bytes)
/// * `width` - Image width
/// * `height` - Image height
/// * `output` - Pre-allocated output buffer (at least `width * height` bytes)
///
/// # Returns
/// Number of pixels written (width * height)
pub fn rgb_to_grayscale_with_buffer(
    rgb: &[u8],
    width: usize,
    height: usize,
    output: &mut [u8],
) -> Result<usize, FrameError> {
    let pixel_count = width
        .checked_mul(height)
        .ok_or(FrameError::InvalidDimensions { width, height })?;
    let rgb_len = pixel_count
        .checked_mul(3)
        .ok_or(FrameError::InvalidDimensions { width, height })?;
    if output.len() < pixel_count {
        return Err(FrameError::OutputTooSmall {
            len: output.len(),
            expected: pixel_count,
        });
    }
    let src = rgb.get(..rgb_len).ok_or(FrameError::InputTooSmall {
        len: rgb.len(),
        expected: rgb_len,
    })?;
    convert_into(src, &mut output[..pixel_count]);
    Ok(pixel_count)
}

/// Luma of an [`RgbImage`], keeping its dimensions.
pub fn rgb_image_to_luma(rgb: &RgbImage, parallel: bool) -> GrayImage {
    let (w, h) = rgb.dimensions();
    let raw = if parallel {
        rgb_to_grayscale_parallel(rgb.as_raw(), w as usize, h as usize)
    } else {
        rgb_to_grayscale(rgb.as_raw(), w as usize, h as usize)
    };
    GrayImage::from_raw(w, h, raw).unwrap_or_else(|| GrayImage::new(w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_grayscale() {
        // Pure white
        let white = vec![255, 255, 255];
        let gray = rgb_to_grayscale(&white, 1, 1);
        assert_eq!(gray[0], 255);

        // Pure black
        let black = vec![0, 0, 0];
        let gray = rgb_to_grayscale(&black, 1, 1);
        assert_eq!(gray[0], 0);

        // Pure red: (4899*255 + 8192) >> 14 = 76
        let red = vec![255, 0, 0];
        assert_eq!(rgb_to_grayscale(&red, 1, 1)[0], 76);

        // Pure green: (9617*255 + 8192) >> 14 = 150
        let green = vec![0, 255, 0];
        assert_eq!(rgb_to_grayscale(&green, 1, 1)[0], 150);

        // Pure blue: (1868*255 + 8192) >> 14 = 29
        let blue = vec![0, 0, 255];
        assert_eq!(rgb_to_grayscale(&blue, 1, 1)[0], 29);

        // 2x2 image
        let img = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let gray = rgb_to_grayscale(&img, 2, 2);
        assert_eq!(gray, vec![76, 150, 29, 255]);
    }

    #[test]
    fn test_uniform_gray_is_preserved() {
        for v in [0u8, 1, 127, 128, 130, 254, 255] {
            assert_eq!(rgb_to_grayscale(&[v, v, v], 1, 1)[0], v);
        }
    }

    #[test]
    fn test_parallel_and_buffer_variants_agree() {
        let (w, h) = (13, 7);
        let rgb: Vec<u8> = (0..w * h * 3).map(|i| (i * 91 % 256) as u8).collect();
        let serial = rgb_to_grayscale(&rgb, w, h);
        assert_eq!(rgb_to_grayscale_parallel(&rgb, w, h), serial);

        let mut buffer = vec![0u8; w * h + 5];
        assert_eq!(rgb_to_grayscale_with_buffer(&rgb, w, h, &mut buffer), Ok(w * h));
        assert_eq!(&buffer[..w * h], serial.as_slice());
    }

    #[test]
    fn test_buffer_variant_reports_short_buffers() {
        let rgb = vec![128u8; 4 * 3];
        let mut small = vec![0u8; 3];
        assert_eq!(
            rgb_to_grayscale_with_buffer(&rgb, 2, 2, &mut small),
            Err(FrameError::OutputTooSmall {
                len: 3,
                expected: 4
            })
        );

        let mut buffer = vec![0u8; 4];
        assert_eq!(
            rgb_to_grayscale_with_buffer(&rgb[..11], 2, 2, &mut buffer),
            Err(FrameError::InputTooSmall {
                len: 11,
                expected: 12
            })
        );
        assert!(buffer.iter().all(|&v| v == 0));
    }
}
