use crate::LOG_TARGET;
use crate::error::FrameError;
use tracing::warn;

/// Borrowed view over an NV21 frame.
///
/// The Y plane (`width*height` bytes) is followed by one interleaved V/U row
/// per two luma rows. Construction checks the slice length, so every
/// accessor stays inside the caller's buffer.
#[derive(Debug, Clone, Copy)]
pub struct Nv21Frame<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> Nv21Frame<'a> {
    /// Wrap `data` as a `width × height` NV21 frame.
    ///
    /// Width and height must be non-zero and even. A short buffer is logged
    /// and then rejected.
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Result<Self, FrameError> {
        let expected = Self::required_len(width, height)?;
        if data.len() < expected {
            warn!(
                target: LOG_TARGET,
                len = data.len(),
                expected,
                "inputArray length {} < expected NV21 size {}",
                data.len(),
                expected
            );
            return Err(FrameError::InputTooSmall {
                len: data.len(),
                expected,
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// NV21 byte count for `width × height`: `w*h + w*h/2`.
    pub fn required_len(width: usize, height: usize) -> Result<usize, FrameError> {
        let invalid = FrameError::InvalidDimensions { width, height };
        if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
            return Err(invalid);
        }
        let luma = width.checked_mul(height).ok_or(invalid.clone())?;
        luma.checked_add(luma / 2).ok_or(invalid)
    }

    /// Frame width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// `width * height`
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Bytes the frame actually spans inside the caller's slice.
    pub fn expected_len(&self) -> usize {
        self.pixel_count() + self.pixel_count() / 2
    }

    /// Full-resolution luma plane.
    pub fn y_plane(&self) -> &'a [u8] {
        &self.data[..self.pixel_count()]
    }

    /// Half-resolution interleaved V/U plane.
    pub fn vu_plane(&self) -> &'a [u8] {
        &self.data[self.pixel_count()..self.expected_len()]
    }

    /// Luma row `y`.
    pub fn y_row(&self, y: usize) -> &'a [u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// Chroma row shared by luma rows `2k` and `2k + 1`.
    pub fn vu_row(&self, y: usize) -> &'a [u8] {
        let start = self.pixel_count() + (y / 2) * self.width;
        &self.data[start..start + self.width]
    }

    /// `(v, u)` sample covering luma pixel `(x, y)`.
    pub fn vu_at(&self, x: usize, y: usize) -> (u8, u8) {
        let row = self.vu_row(y);
        let idx = (x / 2) * 2;
        (row[idx], row[idx + 1])
    }
}
