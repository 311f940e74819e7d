//! Separable correlation with reflect-101 borders.
//!
//! All filtering in this crate goes through [`separable_filter`]. Pixels
//! outside the image are mirrored about the edge pixel without repeating
//! it (`gfedcb|abcdefgh|gfedcba`), the same policy the classic
//! computer-vision libraries use by default. With this policy a
//! derivative taken perpendicular to a border is zero on that border.

use image::{ImageBuffer, Luma};

use crate::kernel::SeparableKernel;
use crate::types::GrayImage;

/// Single-channel image of signed filter responses.
pub type FloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Map a possibly out-of-range coordinate into `0..len` by reflect-101.
///
/// `len` must be non-zero. A one-pixel axis maps every coordinate to 0.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
pub const fn reflect_101(pos: i64, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let len = len as i64;
    let period = 2 * (len - 1);
    let folded = pos.rem_euclid(period);
    if folded >= len {
        (period - folded) as usize
    } else {
        folded as usize
    }
}

/// Precomputed source index for every (output position, tap) pair.
#[allow(clippy::cast_possible_wrap)]
fn index_table(len: usize, taps: usize) -> Vec<usize> {
    let radius = (taps / 2) as i64;
    let mut table = Vec::with_capacity(len * taps);
    for pos in 0..len as i64 {
        for t in 0..taps as i64 {
            table.push(reflect_101(pos + t - radius, len));
        }
    }
    table
}

/// Correlate `image` with a separable kernel, keeping full `f32` precision.
///
/// The horizontal taps run along each row first, then the vertical taps
/// along each column. Output dimensions always equal input dimensions.
#[must_use = "returns the filtered image"]
pub fn separable_filter(image: &GrayImage, kernel: &SeparableKernel) -> FloatImage {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return FloatImage::new(w, h);
    }
    let (width, height) = (w as usize, h as usize);
    let source: Vec<f32> = image.as_raw().iter().map(|&v| f32::from(v)).collect();

    let row_taps = &kernel.horizontal;
    let cols = index_table(width, row_taps.len());
    let mut rows_pass = vec![0.0_f32; width * height];
    for (src_row, dst_row) in source
        .chunks_exact(width)
        .zip(rows_pass.chunks_exact_mut(width))
    {
        for (x, dst) in dst_row.iter_mut().enumerate() {
            let idx = &cols[x * row_taps.len()..(x + 1) * row_taps.len()];
            *dst = idx
                .iter()
                .zip(row_taps)
                .map(|(&i, &k)| src_row[i] * k)
                .sum();
        }
    }

    let col_taps = &kernel.vertical;
    let rows = index_table(height, col_taps.len());
    let mut out = vec![0.0_f32; width * height];
    for (y, dst_row) in out.chunks_exact_mut(width).enumerate() {
        let idx = &rows[y * col_taps.len()..(y + 1) * col_taps.len()];
        for (&i, &k) in idx.iter().zip(col_taps) {
            let src_row = &rows_pass[i * width..(i + 1) * width];
            for (dst, &v) in dst_row.iter_mut().zip(src_row) {
                *dst += v * k;
            }
        }
    }

    // The buffer length is exactly width * height by construction.
    FloatImage::from_raw(w, h, out).unwrap_or_else(|| FloatImage::new(w, h))
}

/// Element-wise sum of two equally sized response images.
#[must_use = "returns the summed image"]
pub fn add(a: &FloatImage, b: &FloatImage) -> FloatImage {
    imageproc::map::map_pixels2(a, b, |p, q| Luma([p[0] + q[0]]))
}
