//! edgelab-detect: Sobel, Laplacian and Canny edge detection (sans-IO).
//!
//! Each detector is a pure function from an RGB image and a parameter set
//! to a single-channel 8-bit image of the same width and height:
//!
//! - [`sobel`]: grayscale -> Sobel derivative(s) -> `|v|` saturated.
//! - [`laplacian`]: grayscale -> Laplacian -> `|v|` saturated.
//! - [`canny`]: grayscale -> Gaussian blur -> gradient -> non-maximum
//!   suppression -> hysteresis, producing a 0/255 edge map.
//!
//! Parameters are validated before any pixel is touched; an invalid set
//! fails with [`EdgeError::InvalidParameter`] and produces no output.
//! Every convolution treats the image border by reflect-101 mirroring.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! buffers. Reading files, rendering and parameter entry live in the
//! `edgelab` binary.

pub mod blur;
pub mod canny;
pub mod convolve;
pub mod detector;
pub mod diagnostics;
pub mod grayscale;
pub mod input;
pub mod kernel;
pub mod laplacian;
pub mod saturate;
pub mod sobel;
pub mod types;

pub use canny::canny;
pub use detector::{EdgeDetector, detect};
pub use diagnostics::{Clock, DetectionDiagnostics, EdgeStats, detect_with_diagnostics};
pub use input::{decode_rgb, rgb_from_raw};
pub use laplacian::laplacian;
pub use sobel::sobel;
pub use types::{
    Algorithm, AlgorithmParams, CannyParams, Dimensions, EdgeError, GrayImage, LaplacianParams,
    RgbImage, SobelDirection, SobelParams,
};
