//! Laplacian (second derivative) response.

use crate::convolve::{add, separable_filter};
use crate::grayscale::to_grayscale;
use crate::kernel::SeparableKernel;
use crate::saturate::convert_scale_abs;
use crate::types::{EdgeError, GrayImage, LaplacianParams, RgbImage};

/// Absolute Laplacian response of an RGB image.
///
/// Size 1 applies the 4-neighbour kernel `[0 1 0; 1 -4 1; 0 1 0]`. Larger
/// sizes sum the second-order Sobel derivatives in x and y, e.g. size 3
/// is `[2 0 2; 0 -8 0; 2 0 2]`.
///
/// # Errors
///
/// Returns [`EdgeError::InvalidParameter`] if the kernel size is not one
/// of 1, 3, 5 or 7.
pub fn laplacian(image: &RgbImage, params: &LaplacianParams) -> Result<GrayImage, EdgeError> {
    params.validate()?;
    log::debug!(
        "laplacian {}x{} kernel_size={}",
        image.width(),
        image.height(),
        params.kernel_size,
    );

    let gray = to_grayscale(image);
    let d2x = separable_filter(&gray, &SeparableKernel::sobel(2, 0, params.kernel_size));
    let d2y = separable_filter(&gray, &SeparableKernel::sobel(0, 2, params.kernel_size));
    Ok(convert_scale_abs(&add(&d2x, &d2y)))
}
