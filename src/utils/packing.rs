//! Packing camera planes into NV21.
//!
//! Cameras usually deliver YUV_420_888: three planes with their own row and
//! pixel strides, where rows may carry padding. The pipeline wants tightly
//! packed NV21, so these helpers do the repacking and the debug pattern used
//! to check a display path without a camera.

use crate::LOG_TARGET;
use crate::error::FrameError;
use tracing::debug;

/// One plane of a YUV_420_888 image.
#[derive(Debug, Clone, Copy)]
pub struct PlaneRef<'a> {
    /// Plane bytes
    pub data: &'a [u8],
    /// Bytes between the starts of consecutive rows
    pub row_stride: usize,
    /// Bytes between consecutive samples in a row
    pub pixel_stride: usize,
}

impl<'a> PlaneRef<'a> {
    /// Plane with explicit strides.
    pub fn new(data: &'a [u8], row_stride: usize, pixel_stride: usize) -> Self {
        Self {
            data,
            row_stride,
            pixel_stride,
        }
    }

    /// Byte offset of sample `(x, y)`, or `None` when the strides overflow.
    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        y.checked_mul(self.row_stride)?
            .checked_add(x.checked_mul(self.pixel_stride)?)
    }

    fn out_of_bounds(&self, name: &'static str, index: usize) -> FrameError {
        FrameError::PlaneOutOfBounds {
            plane: name,
            index,
            len: self.data.len(),
        }
    }

    fn sample(&self, name: &'static str, x: usize, y: usize) -> Result<u8, FrameError> {
        let index = self
            .offset(x, y)
            .ok_or_else(|| self.out_of_bounds(name, usize::MAX))?;
        self.data
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_bounds(name, index))
    }
}

/// Repack a YUV_420_888 frame into `out` as NV21.
///
/// Row padding is dropped and chroma is interleaved V first. `out` must hold
/// `width*height + width*height/2` bytes. Nothing is guaranteed about `out`
/// when an error is returned.
pub fn pack_yuv420_to_nv21(
    y: PlaneRef<'_>,
    u: PlaneRef<'_>,
    v: PlaneRef<'_>,
    width: usize,
    height: usize,
    out: &mut [u8],
) -> Result<(), FrameError> {
    let expected = crate::models::Nv21Frame::required_len(width, height)?;
    if out.len() < expected {
        return Err(FrameError::OutputTooSmall {
            len: out.len(),
            expected,
        });
    }

    debug!(
        target: LOG_TARGET,
        width,
        height,
        y_row_stride = y.row_stride,
        y_pixel_stride = y.pixel_stride,
        u_row_stride = u.row_stride,
        u_pixel_stride = u.pixel_stride,
        v_row_stride = v.row_stride,
        v_pixel_stride = v.pixel_stride,
        "packing YUV_420_888 frame into NV21"
    );

    let (luma, chroma) = out[..expected].split_at_mut(width * height);

    for (row, dst) in luma.chunks_exact_mut(width).enumerate() {
        let start = y
            .offset(0, row)
            .ok_or_else(|| y.out_of_bounds("Y", usize::MAX))?;
        let end = start
            .checked_add(width)
            .ok_or_else(|| y.out_of_bounds("Y", usize::MAX))?;
        let src = y
            .data
            .get(start..end)
            .ok_or_else(|| y.out_of_bounds("Y", end - 1))?;
        dst.copy_from_slice(src);
    }

    for (row, dst) in chroma.chunks_exact_mut(width).enumerate() {
        for col in 0..width / 2 {
            dst[col * 2] = v.sample("V", col, row)?;
            dst[col * 2 + 1] = u.sample("U", col, row)?;
        }
    }

    Ok(())
}

/// Copy a single-plane frame, zero-filling whatever `src` cannot cover.
///
/// Returns the number of bytes copied from `src`.
pub fn copy_single_plane(src: &[u8], out: &mut [u8]) -> usize {
    let n = src.len().min(out.len());
    debug!(
        target: LOG_TARGET,
        src_len = src.len(),
        out_len = out.len(),
        "copying single-plane frame ({} of {} bytes)",
        n,
        out.len()
    );
    out[..n].copy_from_slice(&src[..n]);
    out[n..].fill(0);
    n
}

/// Checkerboard debug pattern.
///
/// Blocks are `max(8, min(width, height) / 16)` pixels; the block containing
/// the origin is white (255).
pub fn checkerboard(width: usize, height: usize) -> Vec<u8> {
    let block = (width.min(height) / 16).max(8);
    let mut out = vec![0u8; width * height];
    for (y, row) in out.chunks_exact_mut(width.max(1)).enumerate() {
        for (x, px) in row.iter_mut().enumerate() {
            if ((y / block) + (x / block)) % 2 == 0 {
                *px = 255;
            }
        }
    }
    out
}
