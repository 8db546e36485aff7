//! Nearest-neighbour resampling for single-channel rasters
//!
//! Destination pixel `(x, y)` takes source pixel
//! `(floor(x * src_w / dst_w), floor(y * src_h / dst_h))`, the same mapping
//! as OpenCV's `INTER_NEAREST`. No interpolation, so binary edge maps stay
//! binary.

use image::GrayImage;

/// Resize `src` to `width × height`.
///
/// Returns `src` untouched when the size already matches. An empty source
/// yields an all-zero image of the requested size.
pub fn resize_nearest(src: GrayImage, width: u32, height: u32) -> GrayImage {
    let (sw, sh) = src.dimensions();
    if (sw, sh) == (width, height) {
        return src;
    }
    if sw == 0 || sh == 0 {
        return GrayImage::new(width, height);
    }

    let x_map: Vec<u32> = (0..width)
        .map(|x| ((x as u64 * sw as u64) / width as u64).min(sw as u64 - 1) as u32)
        .collect();

    let mut dst = GrayImage::new(width, height);
    for y in 0..height {
        let sy = ((y as u64 * sh as u64) / height as u64).min(sh as u64 - 1) as u32;
        for (x, &sx) in x_map.iter().enumerate() {
            dst.put_pixel(x as u32, y, *src.get_pixel(sx, sy));
        }
    }
    dst
}
