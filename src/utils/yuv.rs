//! NV21 <-> RGB conversion
//!
//! Decoding uses the ITU-R BT.601 fixed-point path (20-bit shift) so the
//! output matches OpenCV's `COLOR_YUV2BGR_NV21` byte for byte:
//!
//! ```text
//! y' = max(0, Y - 16) * CY
//! R  = (y' + CVR*(V-128)            + 2^19) >> 20
//! G  = (y' + CVG*(V-128) + CUG*(U-128) + 2^19) >> 20
//! B  = (y' + CUB*(U-128)            + 2^19) >> 20
//! ```
//!
//! Each result saturates to `0..=255`.

use crate::models::Nv21Frame;
use image::RgbImage;
use rayon::prelude::*;

const SHIFT: i32 = 20;
const HALF: i32 = 1 << (SHIFT - 1);
const CY: i32 = 1_220_542;
const CUB: i32 = 2_116_026;
const CUG: i32 = -409_993;
const CVG: i32 = -852_492;
const CVR: i32 = 1_673_527;

#[inline]
fn saturate(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Chroma contribution shared by the 2x2 luma block of one V/U pair.
#[inline]
fn chroma_terms(v: u8, u: u8) -> (i32, i32, i32) {
    let vv = v as i32 - 128;
    let uu = u as i32 - 128;
    let ruv = HALF + CVR * vv;
    let guv = HALF + CVG * vv + CUG * uu;
    let buv = HALF + CUB * uu;
    (ruv, guv, buv)
}

#[inline]
fn decode_pixel(y: u8, ruv: i32, guv: i32, buv: i32) -> [u8; 3] {
    let yy = (y as i32 - 16).max(0) * CY;
    [
        saturate((yy + ruv) >> SHIFT),
        saturate((yy + guv) >> SHIFT),
        saturate((yy + buv) >> SHIFT),
    ]
}

fn decode_row(frame: &Nv21Frame<'_>, y: usize, out: &mut [u8]) {
    let luma = frame.y_row(y);
    let vu = frame.vu_row(y);
    for (x, px) in out.chunks_exact_mut(3).enumerate() {
        let c = (x / 2) * 2;
        let (ruv, guv, buv) = chroma_terms(vu[c], vu[c + 1]);
        px.copy_from_slice(&decode_pixel(luma[x], ruv, guv, buv));
    }
}

fn into_image(frame: &Nv21Frame<'_>, raw: Vec<u8>) -> RgbImage {
    let (w, h) = (frame.width() as u32, frame.height() as u32);
    // The buffer is sized from the frame, so the container always fits.
    RgbImage::from_raw(w, h, raw).unwrap_or_else(|| RgbImage::new(w, h))
}

/// Decode an NV21 frame into interleaved RGB.
pub fn nv21_to_rgb(frame: &Nv21Frame<'_>) -> RgbImage {
    let row_bytes = frame.width() * 3;
    let mut raw = vec![0u8; row_bytes * frame.height()];
    for (y, row) in raw.chunks_exact_mut(row_bytes).enumerate() {
        decode_row(frame, y, row);
    }
    into_image(frame, raw)
}

/// Decode an NV21 frame into RGB, one rayon task per row.
///
/// Produces the same bytes as [`nv21_to_rgb`].
pub fn nv21_to_rgb_parallel(frame: &Nv21Frame<'_>) -> RgbImage {
    let row_bytes = frame.width() * 3;
    let mut raw = vec![0u8; row_bytes * frame.height()];
    raw.par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| decode_row(frame, y, row));
    into_image(frame, raw)
}

/// Encode interleaved RGB as NV21 using integer BT.601 (studio swing).
///
/// Chroma is the rounded average of each 2x2 block. `width` and `height`
/// must be even; `rgb` must hold `width*height*3` bytes.
pub fn rgb_to_nv21(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let luma_len = width * height;
    let mut out = vec![0u8; luma_len + luma_len / 2];
    let (y_plane, vu_plane) = out.split_at_mut(luma_len);

    for (dst, px) in y_plane.iter_mut().zip(rgb.chunks_exact(3)) {
        let (r, g, b) = (px[0] as i32, px[1] as i32, px[2] as i32);
        *dst = saturate(((66 * r + 129 * g + 25 * b + 128) >> 8) + 16);
    }

    for cy in 0..height / 2 {
        for cx in 0..width / 2 {
            let mut sum = [0i32; 3];
            for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                let idx = ((cy * 2 + dy) * width + cx * 2 + dx) * 3;
                for c in 0..3 {
                    sum[c] += rgb[idx + c] as i32;
                }
            }
            let (r, g, b) = ((sum[0] + 2) / 4, (sum[1] + 2) / 4, (sum[2] + 2) / 4);
            let u = saturate(((-38 * r - 74 * g + 112 * b + 128) >> 8) + 128);
            let v = saturate(((112 * r - 94 * g - 18 * b + 128) >> 8) + 128);
            let idx = cy * width + cx * 2;
            vu_plane[idx] = v;
            vu_plane[idx + 1] = u;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_nv21(width: usize, height: usize, y: u8, v: u8, u: u8) -> Vec<u8> {
        let mut data = vec![y; width * height];
        for _ in 0..width * height / 4 {
            data.push(v);
            data.push(u);
        }
        data
    }

    #[test]
    fn test_mid_gray_decodes_to_130() {
        let data = uniform_nv21(4, 4, 128, 128, 128);
        let frame = Nv21Frame::new(&data, 4, 4).unwrap();
        let rgb = nv21_to_rgb(&frame);
        assert_eq!(rgb.dimensions(), (4, 4));
        assert!(rgb.as_raw().iter().all(|&v| v == 130));
    }

    #[test]
    fn test_black_and_white_saturate() {
        let black = uniform_nv21(2, 2, 0, 128, 128);
        let frame = Nv21Frame::new(&black, 2, 2).unwrap();
        assert!(nv21_to_rgb(&frame).as_raw().iter().all(|&v| v == 0));

        let white = uniform_nv21(2, 2, 255, 128, 128);
        let frame = Nv21Frame::new(&white, 2, 2).unwrap();
        assert!(nv21_to_rgb(&frame).as_raw().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_v_precedes_u() {
        // Strong V (red difference) with neutral U must push red, not blue.
        let data = uniform_nv21(2, 2, 128, 240, 128);
        let frame = Nv21Frame::new(&data, 2, 2).unwrap();
        let rgb = nv21_to_rgb(&frame);
        let px = rgb.get_pixel(0, 0);
        assert!(px[0] > 200, "red channel {}", px[0]);
        assert_eq!(px[2], 130);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let (w, h) = (16, 10);
        let data: Vec<u8> = (0..w * h * 3 / 2).map(|i| (i * 37 % 251) as u8).collect();
        let frame = Nv21Frame::new(&data, w, h).unwrap();
        assert_eq!(nv21_to_rgb(&frame), nv21_to_rgb_parallel(&frame));
    }

    #[test]
    fn test_encode_then_decode_stays_close() {
        let (w, h) = (4, 2);
        let rgb: Vec<u8> = [[200u8, 40, 40]; 8].concat();
        let nv21 = rgb_to_nv21(&rgb, w, h);
        assert_eq!(nv21.len(), 12);
        let frame = Nv21Frame::new(&nv21, w, h).unwrap();
        let decoded = nv21_to_rgb(&frame);
        for (a, b) in decoded.as_raw().iter().zip(&rgb) {
            assert!((*a as i32 - *b as i32).abs() <= 4, "{a} vs {b}");
        }
    }
}
