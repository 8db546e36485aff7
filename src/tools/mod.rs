use crate::diagnostics::FrameStats;
use crate::utils::yuv::rgb_to_nv21;
use image::GrayImage;
use image::imageops;
use std::env;
use std::path::Path;

fn repeat_from_env() -> Option<usize> {
    match env::var("EDGE_VIEWER_REPEAT") {
        Ok(value) => match value.trim().parse::<usize>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

/// Frame repetitions for the CLI: the flag wins, then `EDGE_VIEWER_REPEAT`,
/// then 1.
pub fn repeat_count(flag: Option<usize>) -> usize {
    flag.or_else(repeat_from_env).unwrap_or(1).max(1)
}

/// Load an image file as an NV21 frame.
///
/// Odd trailing rows or columns are cropped so the result has even
/// dimensions. Returns the frame bytes with its width and height.
pub fn load_nv21<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, usize, usize), image::ImageError> {
    let mut rgb = image::open(path)?.to_rgb8();
    let (w, h) = rgb.dimensions();
    let (even_w, even_h) = (w & !1, h & !1);
    if (even_w, even_h) != (w, h) {
        rgb = imageops::crop_imm(&rgb, 0, 0, even_w, even_h).to_image();
    }
    let nv21 = rgb_to_nv21(rgb.as_raw(), even_w as usize, even_h as usize);
    Ok((nv21, even_w as usize, even_h as usize))
}

/// Save `width*height` luma bytes as an image; the format follows the
/// path's extension.
pub fn save_luma<P: AsRef<Path>>(
    path: P,
    bytes: &[u8],
    width: usize,
    height: usize,
) -> Result<(), image::ImageError> {
    let len = width * height;
    let gray = u32::try_from(width)
        .ok()
        .zip(u32::try_from(height).ok())
        .and_then(|(w, h)| GrayImage::from_raw(w, h, bytes.get(..len)?.to_vec()))
        .ok_or_else(|| {
            image::ImageError::Parameter(image::error::ParameterError::from_kind(
                image::error::ParameterErrorKind::DimensionMismatch,
            ))
        })?;
    gray.save(path)
}

/// Summary statistics for a luma buffer.
pub fn luma_stats(bytes: &[u8]) -> FrameStats {
    FrameStats::compute(bytes)
}
