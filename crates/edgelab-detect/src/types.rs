//! Shared types for the edgelab edge detectors.

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can consume edge maps
/// without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbImage` so downstream crates can build inputs without
/// depending on `image` directly.
pub use image::RgbImage;

/// Kernel sizes accepted by the Sobel and Laplacian operators.
pub const DERIVATIVE_KERNEL_SIZES: [u32; 4] = [1, 3, 5, 7];

/// Kernel sizes accepted by the Gaussian pre-blur of the Canny detector.
pub const BLUR_KERNEL_SIZES: [u32; 3] = [3, 5, 7];

/// Largest accepted Canny threshold (inclusive).
pub const MAX_THRESHOLD: u32 = 500;

/// Smallest accepted Gaussian sigma (inclusive).
pub const MIN_SIGMA: f32 = 0.1;

/// Largest accepted Gaussian sigma (inclusive).
pub const MAX_SIGMA: f32 = 5.0;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of any `image` buffer.
    #[must_use]
    pub fn of<P, C>(image: &image::ImageBuffer<P, C>) -> Self
    where
        P: image::Pixel,
        C: std::ops::Deref<Target = [P::Subpixel]>,
    {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    /// Total pixel count (`width * height`).
    #[must_use]
    pub const fn pixel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// The three supported edge detection algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// First-derivative gradient (Sobel).
    Sobel,
    /// Second-derivative response (Laplacian).
    Laplacian,
    /// Blur, gradient, non-maximum suppression and hysteresis (Canny).
    Canny,
}

impl Algorithm {
    /// Default parameter set for this algorithm.
    #[must_use]
    pub fn default_params(self) -> AlgorithmParams {
        match self {
            Self::Sobel => AlgorithmParams::Sobel(SobelParams::default()),
            Self::Laplacian => AlgorithmParams::Laplacian(LaplacianParams::default()),
            Self::Canny => AlgorithmParams::Canny(CannyParams::default()),
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sobel => "Sobel",
            Self::Laplacian => "Laplacian",
            Self::Canny => "Canny",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which derivative(s) the Sobel operator computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SobelDirection {
    /// Horizontal derivative only (responds to vertical edges).
    X,
    /// Vertical derivative only (responds to horizontal edges).
    Y,
    /// Equal-weighted blend of the absolute X and Y responses.
    #[default]
    Both,
}

impl SobelDirection {
    /// Whether the horizontal derivative is part of the output.
    #[must_use]
    pub const fn uses_x(self) -> bool {
        matches!(self, Self::X | Self::Both)
    }

    /// Whether the vertical derivative is part of the output.
    #[must_use]
    pub const fn uses_y(self) -> bool {
        matches!(self, Self::Y | Self::Both)
    }
}

/// Parameters for [`crate::sobel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SobelParams {
    /// Aperture size, one of [`DERIVATIVE_KERNEL_SIZES`].
    pub kernel_size: u32,
    /// Which derivative(s) to compute.
    pub direction: SobelDirection,
}

impl SobelParams {
    /// Default aperture size.
    pub const DEFAULT_KERNEL_SIZE: u32 = 3;

    /// Check the parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::InvalidParameter`] if `kernel_size` is not one
    /// of [`DERIVATIVE_KERNEL_SIZES`].
    pub fn validate(&self) -> Result<(), EdgeError> {
        check_kernel_size("kernel_size", self.kernel_size, &DERIVATIVE_KERNEL_SIZES)
    }
}

impl Default for SobelParams {
    fn default() -> Self {
        Self {
            kernel_size: Self::DEFAULT_KERNEL_SIZE,
            direction: SobelDirection::default(),
        }
    }
}

/// Parameters for [`crate::laplacian`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaplacianParams {
    /// Aperture size, one of [`DERIVATIVE_KERNEL_SIZES`].
    pub kernel_size: u32,
}

impl LaplacianParams {
    /// Default aperture size.
    pub const DEFAULT_KERNEL_SIZE: u32 = 3;

    /// Check the parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::InvalidParameter`] if `kernel_size` is not one
    /// of [`DERIVATIVE_KERNEL_SIZES`].
    pub fn validate(&self) -> Result<(), EdgeError> {
        check_kernel_size("kernel_size", self.kernel_size, &DERIVATIVE_KERNEL_SIZES)
    }
}

impl Default for LaplacianParams {
    fn default() -> Self {
        Self {
            kernel_size: Self::DEFAULT_KERNEL_SIZE,
        }
    }
}

/// Parameters for [`crate::canny`].
///
/// `low_threshold > high_threshold` is accepted. The detector then keeps
/// only pixels above `high_threshold`, i.e. no weak edges survive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyParams {
    /// Gradient magnitude a connected weak edge must exceed.
    pub low_threshold: u32,
    /// Gradient magnitude a strong edge must exceed.
    pub high_threshold: u32,
    /// Side of the square Gaussian pre-blur kernel, one of
    /// [`BLUR_KERNEL_SIZES`].
    pub blur_kernel_size: u32,
    /// Standard deviation of the Gaussian pre-blur.
    pub sigma: f32,
    /// Use the Euclidean gradient magnitude instead of `|gx| + |gy|`.
    pub l2_gradient: bool,
}

impl CannyParams {
    /// Default low threshold.
    pub const DEFAULT_LOW_THRESHOLD: u32 = 50;
    /// Default high threshold.
    pub const DEFAULT_HIGH_THRESHOLD: u32 = 150;
    /// Default Gaussian kernel side.
    pub const DEFAULT_BLUR_KERNEL_SIZE: u32 = 5;
    /// Default Gaussian sigma.
    pub const DEFAULT_SIGMA: f32 = 1.4;

    /// Check the parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::InvalidParameter`] if either threshold exceeds
    /// [`MAX_THRESHOLD`], `blur_kernel_size` is not one of
    /// [`BLUR_KERNEL_SIZES`], or `sigma` is not a finite value within
    /// [`MIN_SIGMA`]`..=`[`MAX_SIGMA`].
    pub fn validate(&self) -> Result<(), EdgeError> {
        check_threshold("low_threshold", self.low_threshold)?;
        check_threshold("high_threshold", self.high_threshold)?;
        check_kernel_size("blur_kernel_size", self.blur_kernel_size, &BLUR_KERNEL_SIZES)?;
        if !(MIN_SIGMA..=MAX_SIGMA).contains(&self.sigma) {
            return Err(EdgeError::InvalidParameter {
                name: "sigma",
                reason: format!(
                    "{} is outside the supported range {MIN_SIGMA}..={MAX_SIGMA}",
                    self.sigma
                ),
            });
        }
        Ok(())
    }
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            low_threshold: Self::DEFAULT_LOW_THRESHOLD,
            high_threshold: Self::DEFAULT_HIGH_THRESHOLD,
            blur_kernel_size: Self::DEFAULT_BLUR_KERNEL_SIZE,
            sigma: Self::DEFAULT_SIGMA,
            l2_gradient: false,
        }
    }
}

/// Algorithm selection together with its parameters.
///
/// Serialized as an internally tagged object, e.g.
/// `{"algorithm": "sobel", "kernel_size": 5, "direction": "x"}`.
/// Omitted fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum AlgorithmParams {
    /// Sobel gradient.
    Sobel(SobelParams),
    /// Laplacian response.
    Laplacian(LaplacianParams),
    /// Canny edge map.
    Canny(CannyParams),
}

impl AlgorithmParams {
    /// The algorithm these parameters select.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        match self {
            Self::Sobel(_) => Algorithm::Sobel,
            Self::Laplacian(_) => Algorithm::Laplacian,
            Self::Canny(_) => Algorithm::Canny,
        }
    }

    /// Check the wrapped parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::InvalidParameter`] when the wrapped parameters
    /// are out of range.
    pub fn validate(&self) -> Result<(), EdgeError> {
        match self {
            Self::Sobel(p) => p.validate(),
            Self::Laplacian(p) => p.validate(),
            Self::Canny(p) => p.validate(),
        }
    }
}

impl Default for AlgorithmParams {
    fn default() -> Self {
        Self::Canny(CannyParams::default())
    }
}

impl From<SobelParams> for AlgorithmParams {
    fn from(params: SobelParams) -> Self {
        Self::Sobel(params)
    }
}

impl From<LaplacianParams> for AlgorithmParams {
    fn from(params: LaplacianParams) -> Self {
        Self::Laplacian(params)
    }
}

impl From<CannyParams> for AlgorithmParams {
    fn from(params: CannyParams) -> Self {
        Self::Canny(params)
    }
}

fn check_kernel_size(name: &'static str, size: u32, supported: &[u32]) -> Result<(), EdgeError> {
    if size % 2 == 0 {
        return Err(EdgeError::InvalidParameter {
            name,
            reason: format!("{size} is not odd"),
        });
    }
    if !supported.contains(&size) {
        return Err(EdgeError::InvalidParameter {
            name,
            reason: format!("{size} is not one of {supported:?}"),
        });
    }
    Ok(())
}

fn check_threshold(name: &'static str, value: u32) -> Result<(), EdgeError> {
    if value > MAX_THRESHOLD {
        return Err(EdgeError::InvalidParameter {
            name,
            reason: format!("{value} exceeds the maximum of {MAX_THRESHOLD}"),
        });
    }
    Ok(())
}

/// Errors returned by the edge detectors and input helpers.
///
/// Every error aborts the call before any output is produced.
#[derive(Debug, thiserror::Error)]
pub enum EdgeError {
    /// A parameter is outside its supported set or range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Field name of the offending parameter.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The input buffer does not have the expected shape.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_controls() {
        assert_eq!(
            SobelParams::default(),
            SobelParams {
                kernel_size: 3,
                direction: SobelDirection::Both,
            }
        );
        assert_eq!(LaplacianParams::default().kernel_size, 3);
        let canny = CannyParams::default();
        assert_eq!(canny.low_threshold, 50);
        assert_eq!(canny.high_threshold, 150);
        assert_eq!(canny.blur_kernel_size, 5);
        assert!((canny.sigma - 1.4).abs() < f32::EPSILON);
        assert!(!canny.l2_gradient);
    }

    #[test]
    fn every_default_is_valid() {
        for algorithm in [Algorithm::Sobel, Algorithm::Laplacian, Algorithm::Canny] {
            let params = algorithm.default_params();
            assert_eq!(params.algorithm(), algorithm);
            params.validate().unwrap();
        }
    }

    #[test]
    fn even_kernel_size_rejected() {
        let err = SobelParams {
            kernel_size: 4,
            ..SobelParams::default()
        }
        .validate()
        .unwrap_err();
        assert!(
            matches!(err, EdgeError::InvalidParameter { name: "kernel_size", .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn odd_but_unsupported_kernel_size_rejected() {
        let result = LaplacianParams { kernel_size: 9 }.validate();
        assert!(matches!(result, Err(EdgeError::InvalidParameter { .. })));
    }

    #[test]
    fn blur_kernel_of_one_rejected() {
        let result = CannyParams {
            blur_kernel_size: 1,
            ..CannyParams::default()
        }
        .validate();
        assert!(matches!(
            result,
            Err(EdgeError::InvalidParameter {
                name: "blur_kernel_size",
                ..
            })
        ));
    }

    #[test]
    fn threshold_above_max_rejected() {
        let result = CannyParams {
            high_threshold: 501,
            ..CannyParams::default()
        }
        .validate();
        assert!(matches!(
            result,
            Err(EdgeError::InvalidParameter {
                name: "high_threshold",
                ..
            })
        ));
    }

    #[test]
    fn sigma_range_enforced() {
        for sigma in [0.0, 0.09, 5.01, f32::NAN, f32::INFINITY] {
            let result = CannyParams {
                sigma,
                ..CannyParams::default()
            }
            .validate();
            assert!(
                matches!(result, Err(EdgeError::InvalidParameter { name: "sigma", .. })),
                "sigma {sigma} should be rejected"
            );
        }
        for sigma in [MIN_SIGMA, 1.0, MAX_SIGMA] {
            CannyParams {
                sigma,
                ..CannyParams::default()
            }
            .validate()
            .unwrap();
        }
    }

    #[test]
    fn low_above_high_is_valid() {
        CannyParams {
            low_threshold: 400,
            high_threshold: 100,
            ..CannyParams::default()
        }
        .validate()
        .unwrap();
    }

    #[test]
    fn params_json_is_internally_tagged() {
        let params = AlgorithmParams::Sobel(SobelParams {
            kernel_size: 5,
            direction: SobelDirection::X,
        });
        let json = serde_json::to_value(params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"algorithm": "sobel", "kernel_size": 5, "direction": "x"})
        );
    }

    #[test]
    fn params_json_missing_fields_use_defaults() {
        let params: AlgorithmParams =
            serde_json::from_str(r#"{"algorithm": "canny", "high_threshold": 200}"#).unwrap();
        assert_eq!(
            params,
            AlgorithmParams::Canny(CannyParams {
                high_threshold: 200,
                ..CannyParams::default()
            })
        );
    }

    #[test]
    fn dimensions_pixel_count() {
        let d = Dimensions::of(&GrayImage::new(17, 31));
        assert_eq!(d, Dimensions { width: 17, height: 31 });
        assert_eq!(d.pixel_count(), 527);
    }
}
