//! Frame, raster, and mode types shared by the pipeline stages.

/// Borrowed NV21 frame view
pub mod frame;
/// Viewer mode selector
pub mod mode;
/// Transform results in their native layout
pub mod raster;

pub use frame::Nv21Frame;
pub use mode::ViewerMode;
pub use raster::{Gray16Image, Raster};
