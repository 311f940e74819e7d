//! Image intake: decode encoded bytes or wrap raw pixel buffers.
//!
//! Every detector takes an [`RgbImage`]. This module is the in-memory half
//! of the image source: it strips alpha from decoded files and checks the
//! shape of raw interleaved buffers handed over by a caller.

use crate::types::{EdgeError, RgbImage};

/// Decode raw image bytes into an RGB image, discarding any alpha channel.
///
/// Supports PNG, JPEG, BMP, and WebP (whatever the `image` crate was built
/// with). Grayscale sources are expanded to three equal channels.
///
/// # Errors
///
/// Returns [`EdgeError::EmptyInput`] if `bytes` is empty.
/// Returns [`EdgeError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
#[must_use = "returns the decoded RGB image"]
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, EdgeError> {
    if bytes.is_empty() {
        return Err(EdgeError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    log::debug!(
        "decoded {}x{} image ({:?}) from {} bytes",
        img.width(),
        img.height(),
        img.color(),
        bytes.len()
    );
    Ok(img.to_rgb8())
}

/// Wrap a raw interleaved `height × width × channels` buffer as an RGB image.
///
/// # Errors
///
/// Returns [`EdgeError::DimensionMismatch`] if `channels` is not 3 or if
/// `data` does not hold exactly `width * height * 3` bytes.
#[must_use = "returns the wrapped RGB image"]
pub fn rgb_from_raw(
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
) -> Result<RgbImage, EdgeError> {
    if channels != 3 {
        return Err(EdgeError::DimensionMismatch(format!(
            "expected 3 channels, got {channels}"
        )));
    }

    let expected = u64::from(width) * u64::from(height) * 3;
    let actual = data.len() as u64;
    if actual != expected {
        return Err(EdgeError::DimensionMismatch(format!(
            "{width}x{height}x3 buffer needs {expected} bytes, got {actual}"
        )));
    }

    RgbImage::from_raw(width, height, data).ok_or_else(|| {
        EdgeError::DimensionMismatch(format!("{width}x{height} buffer could not be wrapped"))
    })
}
