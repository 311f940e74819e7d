//! Side-by-side comparison image: original on the left, result on the right.

use image::{GrayImage, Rgb, RgbImage};

/// Width of the neutral strip separating the two halves.
pub const GUTTER: u32 = 8;

const GUTTER_COLOR: Rgb<u8> = Rgb([128, 128, 128]);

/// Place `original` and the single-channel `result` next to each other.
///
/// Both images are expected to share dimensions; the canvas height is
/// the taller of the two.
#[must_use]
pub fn side_by_side(original: &RgbImage, result: &GrayImage) -> RgbImage {
    let (ow, oh) = original.dimensions();
    let (rw, rh) = result.dimensions();
    let width = ow.saturating_add(GUTTER).saturating_add(rw);
    let mut canvas = RgbImage::from_pixel(width, oh.max(rh), GUTTER_COLOR);

    let result_rgb = RgbImage::from_fn(rw, rh, |x, y| {
        let v = result.get_pixel(x, y)[0];
        Rgb([v, v, v])
    });
    image::imageops::replace(&mut canvas, original, 0, 0);
    image::imageops::replace(&mut canvas, &result_rgb, i64::from(ow) + i64::from(GUTTER), 0);
    canvas
}
