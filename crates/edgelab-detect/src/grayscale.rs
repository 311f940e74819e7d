//! RGB to grayscale conversion.
//!
//! Every detector reduces its input to a single luminance channel before
//! filtering. The weights are the BT.601 luma coefficients
//! `0.299*R + 0.587*G + 0.114*B` in 14-bit fixed point, rounded to
//! nearest, so the conversion is exact integer arithmetic and identical
//! on every platform.

use image::Luma;

use crate::types::{GrayImage, RgbImage};

const SHIFT: u32 = 14;
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const _: () = assert!(R_WEIGHT + G_WEIGHT + B_WEIGHT == 1 << SHIFT);

/// Luminance of a single RGB triple.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = r as u32 * R_WEIGHT + g as u32 * G_WEIGHT + b as u32 * B_WEIGHT;
    // Weights sum to 1 << SHIFT, so the result never exceeds 255.
    ((weighted + (1 << (SHIFT - 1))) >> SHIFT) as u8
}

/// Convert an RGB image to a single-channel luminance image.
#[must_use = "returns the grayscale image"]
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    imageproc::map::map_pixels(image, |p| Luma([luma(p[0], p[1], p[2])]))
}
