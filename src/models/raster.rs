//! Input layouts accepted by [`crate::pipeline::normalize_output`].
//!
//! The built-in transforms always produce `Luma8` at the frame size; the
//! other variants are layouts a transform may hand over for normalizing.

use image::{GrayImage, ImageBuffer, Luma, RgbImage};

/// 16-bit single-channel image.
pub type Gray16Image = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Intermediate image produced by a transform.
///
/// Only [`Raster::Luma8`] can be copied to the host as-is; every other
/// variant goes through the output normalizer first.
#[derive(Debug, Clone)]
pub enum Raster {
    /// Contiguous 8-bit luma
    Luma8(GrayImage),
    /// Contiguous 16-bit luma
    Luma16(Gray16Image),
    /// Interleaved 8-bit RGB
    Rgb8(RgbImage),
    /// 8-bit luma with `row_stride >= width` bytes per row
    Strided {
        /// Row-major bytes, `row_stride` per row
        data: Vec<u8>,
        /// Visible width
        width: u32,
        /// Row count
        height: u32,
        /// Bytes from one row start to the next
        row_stride: usize,
    },
}

impl Raster {
    /// Raster width in pixels
    pub fn width(&self) -> u32 {
        match self {
            Raster::Luma8(img) => img.width(),
            Raster::Luma16(img) => img.width(),
            Raster::Rgb8(img) => img.width(),
            Raster::Strided { width, .. } => *width,
        }
    }

    /// Raster height in pixels
    pub fn height(&self) -> u32 {
        match self {
            Raster::Luma8(img) => img.height(),
            Raster::Luma16(img) => img.height(),
            Raster::Rgb8(img) => img.height(),
            Raster::Strided { height, .. } => *height,
        }
    }

    /// Samples per pixel
    pub fn channels(&self) -> usize {
        match self {
            Raster::Rgb8(_) => 3,
            _ => 1,
        }
    }

    /// True when the bytes are already a packed 8-bit single-channel plane.
    pub fn is_contiguous_luma8(&self) -> bool {
        match self {
            Raster::Luma8(_) => true,
            Raster::Strided {
                width, row_stride, ..
            } => *row_stride == *width as usize,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_queries() {
        let luma = Raster::Luma8(GrayImage::new(4, 2));
        assert_eq!((luma.width(), luma.height(), luma.channels()), (4, 2, 1));
        assert!(luma.is_contiguous_luma8());

        let rgb = Raster::Rgb8(RgbImage::new(3, 5));
        assert_eq!((rgb.width(), rgb.height(), rgb.channels()), (3, 5, 3));
        assert!(!rgb.is_contiguous_luma8());

        let padded = Raster::Strided {
            data: vec![0; 16],
            width: 3,
            height: 2,
            row_stride: 8,
        };
        assert!(!padded.is_contiguous_luma8());

        let packed = Raster::Strided {
            data: vec![0; 6],
            width: 3,
            height: 2,
            row_stride: 3,
        };
        assert!(packed.is_contiguous_luma8());
    }
}
