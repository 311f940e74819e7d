//! Canny edge detection.
//!
//! 1. Grayscale conversion.
//! 2. Gaussian blur with an explicit kernel side and sigma.
//! 3. 3x3 Sobel gradients (reflect-101 borders) and their magnitude,
//!    `|gx| + |gy|` by default or `hypot(gx, gy)` with `l2_gradient`.
//! 4. Non-maximum suppression along four quantised gradient directions.
//! 5. Hysteresis: pixels above the high threshold seed edges, which grow
//!    through 8-connected pixels above the low threshold.
//!
//! Thresholds compare against the raw magnitude of the 3x3 Sobel response
//! of the 8-bit blurred image.

use image::Luma;
use imageproc::definitions::{HasBlack, HasWhite};

use crate::blur::gaussian_blur;
use crate::convolve::{FloatImage, separable_filter};
use crate::grayscale::to_grayscale;
use crate::kernel::SeparableKernel;
use crate::types::{CannyParams, EdgeError, GrayImage, RgbImage};

/// Aperture of the gradient operator inside Canny.
const GRADIENT_APERTURE: u32 = 3;

/// Binary Canny edge map of an RGB image: 255 for edges, 0 elsewhere.
///
/// `low_threshold > high_threshold` is permitted; the low threshold is then
/// lowered to the high one, so only strong edges survive.
///
/// # Errors
///
/// Returns [`EdgeError::InvalidParameter`] if a threshold exceeds 500, the
/// blur kernel is not 3, 5 or 7, or sigma is outside `0.1..=5.0`.
pub fn canny(image: &RgbImage, params: &CannyParams) -> Result<GrayImage, EdgeError> {
    params.validate()?;

    let high = params.high_threshold;
    let low = params.low_threshold.min(high);
    log::debug!(
        "canny {}x{} low={low} high={high} (requested low={}) blur={} sigma={} l2={}",
        image.width(),
        image.height(),
        params.low_threshold,
        params.blur_kernel_size,
        params.sigma,
        params.l2_gradient,
    );

    let gray = to_grayscale(image);
    let blurred = gaussian_blur(&gray, params.blur_kernel_size, params.sigma);
    #[allow(clippy::cast_precision_loss)]
    let edges = detect_edges(&blurred, low as f32, high as f32, params.l2_gradient);
    Ok(edges)
}

/// Gradient, non-maximum suppression and hysteresis on an already
/// blurred grayscale image.
///
/// `low_threshold` should not exceed `high_threshold`; a larger value only
/// makes weak edges harder to keep.
#[must_use = "returns the binary edge map"]
pub fn detect_edges(
    blurred: &GrayImage,
    low_threshold: f32,
    high_threshold: f32,
    l2_gradient: bool,
) -> GrayImage {
    let gx = separable_filter(blurred, &SeparableKernel::sobel(1, 0, GRADIENT_APERTURE));
    let gy = separable_filter(blurred, &SeparableKernel::sobel(0, 1, GRADIENT_APERTURE));
    let magnitude: FloatImage = imageproc::map::map_pixels2(&gx, &gy, |h, v| {
        if l2_gradient {
            Luma([h[0].hypot(v[0])])
        } else {
            Luma([h[0].abs() + v[0].abs()])
        }
    });

    let thinned = non_maximum_suppression(&magnitude, &gx, &gy);
    hysteresis(&thinned, low_threshold, high_threshold)
}

/// Finds local maxima along the gradient direction to make edges thinner.
///
/// For horizontal and vertical gradients a pixel survives when it is
/// strictly greater than the neighbour behind it and not smaller than the
/// neighbour ahead of it, so a two-pixel plateau yields a single edge
/// pixel. Diagonal gradients need a strict maximum on both sides.
/// Neighbours outside the image count as zero.
fn non_maximum_suppression(g: &FloatImage, gx: &FloatImage, gy: &FloatImage) -> FloatImage {
    const RADIANS_TO_DEGREES: f32 = 180f32 / std::f32::consts::PI;
    let (w, h) = g.dimensions();
    let at = |x: i64, y: i64| match (u32::try_from(x), u32::try_from(y)) {
        (Ok(x), Ok(y)) if x < w && y < h => g.get_pixel(x, y)[0],
        _ => 0.0,
    };

    let mut out = FloatImage::new(w, h);
    for (x, y, pixel) in g.enumerate_pixels() {
        let magnitude = pixel[0];
        if magnitude <= 0.0 {
            continue;
        }

        let mut angle = gy.get_pixel(x, y)[0].atan2(gx.get_pixel(x, y)[0]) * RADIANS_TO_DEGREES;
        if angle < 0.0 {
            angle += 180.0;
        }
        // Unit step along the gradient, y pointing down.
        let (step_x, step_y): (i64, i64) = if !(22.5..157.5).contains(&angle) {
            (1, 0)
        } else if angle < 67.5 {
            (1, 1)
        } else if angle < 112.5 {
            (0, 1)
        } else {
            (-1, 1)
        };
        let diagonal = step_x != 0 && step_y != 0;

        let (cx, cy) = (i64::from(x), i64::from(y));
        let behind = at(cx - step_x, cy - step_y);
        let ahead = at(cx + step_x, cy + step_y);
        let beats_ahead = if diagonal {
            magnitude > ahead
        } else {
            magnitude >= ahead
        };
        if magnitude > behind && beats_ahead {
            out.put_pixel(x, y, Luma([magnitude]));
        }
    }
    out
}

/// Filter out edges with the thresholds.
/// Non-recursive depth-first traversal over all 8 neighbours, with
/// bounds checks at the image border.
fn hysteresis(input: &FloatImage, low_thresh: f32, high_thresh: f32) -> GrayImage {
    let max_brightness = Luma::white();
    let min_brightness = Luma::black();
    let (w, h) = input.dimensions();
    let mut out = GrayImage::from_pixel(w, h, min_brightness);
    let mut edges = Vec::new();
    for y in 0..h {
        for x in 0..w {
            if input.get_pixel(x, y)[0] <= high_thresh || out.get_pixel(x, y)[0] != 0 {
                continue;
            }
            out.put_pixel(x, y, max_brightness);
            edges.push((x, y));
            // Track neighbors until no neighbor is above low_thresh.
            while let Some((nx, ny)) = edges.pop() {
                let neighbors = [
                    (nx + 1, ny),
                    (nx + 1, ny + 1),
                    (nx, ny + 1),
                    (nx.wrapping_sub(1), ny.wrapping_sub(1)),
                    (nx.wrapping_sub(1), ny),
                    (nx.wrapping_sub(1), ny + 1),
                    (nx, ny.wrapping_sub(1)),
                    (nx + 1, ny.wrapping_sub(1)),
                ];
                for (ax, ay) in neighbors {
                    // wrapping_sub turns -1 into u32::MAX, caught here too.
                    if ax >= w || ay >= h {
                        continue;
                    }
                    if input.get_pixel(ax, ay)[0] > low_thresh && out.get_pixel(ax, ay)[0] == 0 {
                        out.put_pixel(ax, ay, max_brightness);
                        edges.push((ax, ay));
                    }
                }
            }
        }
    }
    out
}
