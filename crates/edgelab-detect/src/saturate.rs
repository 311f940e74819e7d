//! Saturated conversion of filter responses back to 8-bit pixels.

use image::Luma;

use crate::convolve::FloatImage;
use crate::types::GrayImage;

/// Round half to even and clamp into `0..=255`. NaN maps to 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn saturate_u8(value: f32) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Absolute value of each response, saturated to 8 bits.
#[must_use = "returns the saturated magnitude image"]
pub fn convert_scale_abs(response: &FloatImage) -> GrayImage {
    imageproc::map::map_pixels(response, |p| Luma([saturate_u8(p[0].abs())]))
}

/// `clip(0.5 * a + 0.5 * b)` per pixel.
#[must_use = "returns the blended image"]
pub fn blend_equal(a: &GrayImage, b: &GrayImage) -> GrayImage {
    imageproc::map::map_pixels2(a, b, |p, q| {
        Luma([saturate_u8(0.5f32.mul_add(f32::from(p[0]), 0.5 * f32::from(q[0])))])
    })
}
