//! Canny edge detection with two-threshold hysteresis.
//!
//! Mirrors OpenCV's `Canny` with a 3×3 aperture and L1 gradient so edge maps
//! line up with what the host app showed:
//!
//! 1. Sobel `dx`/`dy` per channel with replicated borders (`imageproc`).
//!    For colour input each pixel keeps the channel with the largest
//!    `|dx| + |dy|`; ties keep the first channel in B, G, R order.
//! 2. Non-maximum suppression along the gradient direction, quantized to
//!    four sectors with a fixed-point `tan 22.5°` test. Neighbours outside
//!    the image count as zero.
//! 3. Survivors above `low` are weak, above `high` strong. Weak pixels
//!    8-connected to a strong pixel are promoted.
//!
//! Output pixels are 255 on edges and 0 elsewhere.

use image::{GrayImage, Luma, RgbImage};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

const CANNY_SHIFT: u32 = 15;
/// `tan(22.5°)` in Q15, rounded.
const TG22: i32 = 13573;

const NOT_EDGE: u8 = 0;
const WEAK: u8 = 1;
const STRONG: u8 = 2;

/// Per-pixel gradient of the strongest channel.
struct Gradients {
    width: usize,
    height: usize,
    dx: Vec<i32>,
    dy: Vec<i32>,
    /// L1 magnitude with a one-pixel zero border, row stride `width + 2`
    mag: Vec<i32>,
}

impl Gradients {
    fn from_channels(channels: &[GrayImage]) -> Self {
        let (w, h) = channels[0].dimensions();
        let (width, height) = (w as usize, h as usize);
        let stride = width + 2;
        let mut dx = vec![0i32; width * height];
        let mut dy = vec![0i32; width * height];
        let mut mag = vec![0i32; stride * (height + 2)];

        for (c, channel) in channels.iter().enumerate() {
            let gx = horizontal_sobel(channel);
            let gy = vertical_sobel(channel);
            for (i, (px, py)) in gx.as_raw().iter().zip(gy.as_raw()).enumerate() {
                let (sx, sy) = (*px as i32, *py as i32);
                let m = sx.abs() + sy.abs();
                let padded = (i / width + 1) * stride + i % width + 1;
                if c == 0 || m > mag[padded] {
                    mag[padded] = m;
                    dx[i] = sx;
                    dy[i] = sy;
                }
            }
        }

        Self {
            width,
            height,
            dx,
            dy,
            mag,
        }
    }

    /// Non-maximum suppression plus threshold classification.
    fn classify(&self, low: i32, high: i32) -> Vec<u8> {
        let stride = (self.width + 2) as isize;
        let mag = &self.mag;
        let mut map = vec![NOT_EDGE; self.width * self.height];

        for y in 0..self.height {
            for x in 0..self.width {
                let i = y * self.width + x;
                let c = (y as isize + 1) * stride + x as isize + 1;
                let m = mag[c as usize];
                if m <= low {
                    continue;
                }

                let xs = self.dx[i];
                let ys = self.dy[i];
                let ax = xs.abs();
                let ay = ys.abs() << CANNY_SHIFT;
                let tg22x = ax * TG22;

                let at = |offset: isize| mag[(c + offset) as usize];
                let is_max = if ay < tg22x {
                    m > at(-1) && m >= at(1)
                } else {
                    let tg67x = tg22x + (ax << (CANNY_SHIFT + 1));
                    if ay > tg67x {
                        m > at(-stride) && m >= at(stride)
                    } else {
                        let s: isize = if (xs ^ ys) < 0 { -1 } else { 1 };
                        m > at(-stride - s) && m > at(stride + s)
                    }
                };

                if is_max {
                    map[i] = if m > high { STRONG } else { WEAK };
                }
            }
        }

        map
    }
}

/// Promote weak pixels reachable from strong ones through 8-neighbours.
fn hysteresis(map: &mut [u8], width: usize, height: usize) {
    let mut stack: Vec<usize> = map
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == STRONG)
        .map(|(i, _)| i)
        .collect();

    while let Some(i) = stack.pop() {
        let (x, y) = (i % width, i / width);
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                let n = ny * width + nx;
                if map[n] == WEAK {
                    map[n] = STRONG;
                    stack.push(n);
                }
            }
        }
    }
}

fn ordered_thresholds(low: f32, high: f32) -> (i32, i32) {
    let (lo, hi) = if low > high { (high, low) } else { (low, high) };
    (lo.floor() as i32, hi.floor() as i32)
}

fn canny_channels(channels: &[GrayImage], low: f32, high: f32) -> GrayImage {
    let (w, h) = channels[0].dimensions();
    if w == 0 || h == 0 {
        return GrayImage::new(w, h);
    }

    let grad = Gradients::from_channels(channels);
    let (low, high) = ordered_thresholds(low, high);
    let mut map = grad.classify(low, high);
    hysteresis(&mut map, grad.width, grad.height);

    let edges = map
        .into_iter()
        .map(|v| if v == STRONG { 255 } else { 0 })
        .collect();
    GrayImage::from_raw(w, h, edges).unwrap_or_else(|| GrayImage::new(w, h))
}

/// Edge map of a colour image.
pub fn canny_rgb(rgb: &RgbImage, low: f32, high: f32) -> GrayImage {
    let (w, h) = rgb.dimensions();
    let channels: Vec<GrayImage> = [2usize, 1, 0]
        .iter()
        .map(|&c| GrayImage::from_fn(w, h, |x, y| Luma([rgb.get_pixel(x, y)[c]])))
        .collect();
    canny_channels(&channels, low, high)
}

/// Edge map of a single-channel image.
pub fn canny_luma(gray: &GrayImage, low: f32, high: f32) -> GrayImage {
    canny_channels(std::slice::from_ref(gray), low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// 0 for x < 8, otherwise `top` above row 8 and `bottom` from row 8 down.
    fn step_image(top: u8, bottom: u8) -> GrayImage {
        GrayImage::from_fn(16, 16, |x, y| {
            if x < 8 {
                Luma([0])
            } else if y < 8 {
                Luma([top])
            } else {
                Luma([bottom])
            }
        })
    }

    fn edge_count(img: &GrayImage) -> usize {
        img.as_raw().iter().filter(|&&v| v != 0).count()
    }

    #[test]
    fn test_flat_image_has_no_edges() {
        let flat = GrayImage::from_pixel(12, 8, Luma([128]));
        assert_eq!(edge_count(&canny_luma(&flat, 100.0, 200.0)), 0);
    }

    #[test]
    fn test_vertical_step_is_one_pixel_wide() {
        let edges = canny_luma(&step_image(255, 255), 100.0, 200.0);
        for y in 0..16 {
            for x in 0..16 {
                let expected = if x == 7 { 255 } else { 0 };
                assert_eq!(edges.get_pixel(x, y)[0], expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_weak_only_edges_are_dropped() {
        // |dx| = 4 * 40 = 160 sits between the thresholds
        let edges = canny_luma(&step_image(40, 40), 100.0, 200.0);
        assert_eq!(edge_count(&edges), 0);
    }

    #[test]
    fn test_hysteresis_promotes_connected_weak_edges() {
        let edges = canny_luma(&step_image(255, 40), 100.0, 200.0);
        for y in 9..16 {
            assert_eq!(edges.get_pixel(7, y)[0], 255, "row {y}");
        }
    }

    #[test]
    fn test_swapped_thresholds_are_reordered() {
        let a = canny_luma(&step_image(255, 40), 200.0, 100.0);
        let b = canny_luma(&step_image(255, 40), 100.0, 200.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_colour_uses_strongest_channel() {
        // Only the blue channel steps; gray conversion would dampen it to 29.
        let rgb = RgbImage::from_fn(16, 16, |x, _| {
            if x < 8 { Rgb([0, 0, 0]) } else { Rgb([0, 0, 255]) }
        });
        let edges = canny_rgb(&rgb, 100.0, 200.0);
        assert_eq!(edge_count(&edges), 16);
        assert!((0..16).all(|y| edges.get_pixel(7, y)[0] == 255));
    }

    #[test]
    fn test_empty_image() {
        let edges = canny_rgb(&RgbImage::new(0, 0), 100.0, 200.0);
        assert_eq!(edges.dimensions(), (0, 0));
    }
}
