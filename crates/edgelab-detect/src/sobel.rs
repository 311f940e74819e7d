//! Sobel gradient magnitude.

use crate::convolve::separable_filter;
use crate::grayscale::to_grayscale;
use crate::kernel::SeparableKernel;
use crate::saturate::{blend_equal, convert_scale_abs};
use crate::types::{EdgeError, GrayImage, RgbImage, SobelDirection, SobelParams};

/// Absolute first-derivative response of an RGB image.
///
/// The image is reduced to grayscale, then differentiated horizontally
/// and/or vertically with a Sobel kernel of `params.kernel_size`. Each
/// signed response is converted to `|v|` saturated to 8 bits. With
/// [`SobelDirection::Both`] the two maps are averaged.
///
/// # Errors
///
/// Returns [`EdgeError::InvalidParameter`] if the kernel size is not one
/// of 1, 3, 5 or 7.
pub fn sobel(image: &RgbImage, params: &SobelParams) -> Result<GrayImage, EdgeError> {
    params.validate()?;
    log::debug!(
        "sobel {}x{} kernel_size={} direction={:?}",
        image.width(),
        image.height(),
        params.kernel_size,
        params.direction,
    );

    let gray = to_grayscale(image);
    let derivative = |dx, dy| {
        let kernel = SeparableKernel::sobel(dx, dy, params.kernel_size);
        convert_scale_abs(&separable_filter(&gray, &kernel))
    };

    Ok(match params.direction {
        SobelDirection::X => derivative(1, 0),
        SobelDirection::Y => derivative(0, 1),
        SobelDirection::Both => blend_equal(&derivative(1, 0), &derivative(0, 1)),
    })
}
