//! Gaussian blur for noise reduction before Canny edge detection.
//!
//! Unlike `imageproc::filter::gaussian_blur_f32`, which derives its kernel
//! width from sigma, the Canny controls fix the kernel side and sigma
//! independently, so the taps are built explicitly and applied through
//! the crate's reflect-101 [`separable_filter`].

use crate::convolve::separable_filter;
use crate::kernel::SeparableKernel;
use crate::saturate::saturate_u8;
use crate::types::GrayImage;

/// Apply a square Gaussian blur of side `kernel_size` to a grayscale image.
///
/// The result is rounded back to 8 bits. Callers validate `kernel_size`
/// and `sigma`; a non-positive or non-finite sigma returns the image
/// unchanged.
#[must_use = "returns the blurred image"]
pub fn gaussian_blur(image: &GrayImage, kernel_size: u32, sigma: f32) -> GrayImage {
    if !(sigma.is_finite() && sigma > 0.0) {
        return image.clone();
    }

    let blurred = separable_filter(image, &SeparableKernel::gaussian(kernel_size, sigma));
    imageproc::map::map_pixels(&blurred, |p| image::Luma([saturate_u8(p[0])]))
}
