use std::fmt;

/// Visualization applied to each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewerMode {
    /// Canny edge map
    #[default]
    EdgeDetect,
    /// Luma of the decoded colour frame
    Grayscale,
}

impl ViewerMode {
    /// Map the host's integer selector: `1` is grayscale, anything else edges.
    pub fn from_raw(mode: i32) -> Self {
        if mode == 1 {
            ViewerMode::Grayscale
        } else {
            ViewerMode::EdgeDetect
        }
    }

    /// Integer selector understood by [`ViewerMode::from_raw`].
    pub fn as_raw(self) -> i32 {
        match self {
            ViewerMode::EdgeDetect => 0,
            ViewerMode::Grayscale => 1,
        }
    }
}

impl fmt::Display for ViewerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerMode::EdgeDetect => f.write_str("Edges"),
            ViewerMode::Grayscale => f.write_str("Gray"),
        }
    }
}
