//! The [`EdgeDetector`] facade and algorithm dispatch.

use crate::types::{
    AlgorithmParams, CannyParams, EdgeError, GrayImage, LaplacianParams, RgbImage, SobelParams,
};

/// Stateless entry point for the three edge detectors.
///
/// Holds no data; every call is an independent pure transform and may run
/// concurrently with any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeDetector;

#[allow(clippy::unused_self)]
impl EdgeDetector {
    /// See [`crate::sobel`].
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::InvalidParameter`] for an unsupported kernel size.
    pub fn sobel(self, image: &RgbImage, params: &SobelParams) -> Result<GrayImage, EdgeError> {
        crate::sobel::sobel(image, params)
    }

    /// See [`crate::laplacian`].
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::InvalidParameter`] for an unsupported kernel size.
    pub fn laplacian(
        self,
        image: &RgbImage,
        params: &LaplacianParams,
    ) -> Result<GrayImage, EdgeError> {
        crate::laplacian::laplacian(image, params)
    }

    /// See [`crate::canny`].
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::InvalidParameter`] for out-of-range parameters.
    pub fn canny(self, image: &RgbImage, params: &CannyParams) -> Result<GrayImage, EdgeError> {
        crate::canny::canny(image, params)
    }

    /// Run whichever algorithm `params` selects.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::InvalidParameter`] for out-of-range parameters.
    pub fn detect(self, image: &RgbImage, params: &AlgorithmParams) -> Result<GrayImage, EdgeError> {
        match params {
            AlgorithmParams::Sobel(p) => self.sobel(image, p),
            AlgorithmParams::Laplacian(p) => self.laplacian(image, p),
            AlgorithmParams::Canny(p) => self.canny(image, p),
        }
    }
}

/// Run whichever algorithm `params` selects.
///
/// # Errors
///
/// Returns [`EdgeError::InvalidParameter`] for out-of-range parameters.
pub fn detect(image: &RgbImage, params: &AlgorithmParams) -> Result<GrayImage, EdgeError> {
    EdgeDetector.detect(image, params)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Algorithm, SobelDirection};

    fn checker() -> RgbImage {
        RgbImage::from_fn(24, 16, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                image::Rgb([250, 10, 10])
            } else {
                image::Rgb([10, 10, 250])
            }
        })
    }

    #[test]
    fn dispatch_matches_direct_calls() {
        let img = checker();
        let sobel = SobelParams {
            kernel_size: 5,
            direction: SobelDirection::Y,
        };
        assert_eq!(
            detect(&img, &sobel.into()).unwrap(),
            crate::sobel(&img, &sobel).unwrap()
        );
        let laplacian = LaplacianParams { kernel_size: 7 };
        assert_eq!(
            detect(&img, &laplacian.into()).unwrap(),
            crate::laplacian(&img, &laplacian).unwrap()
        );
        let canny = CannyParams::default();
        assert_eq!(
            detect(&img, &canny.into()).unwrap(),
            crate::canny(&img, &canny).unwrap()
        );
    }

    #[test]
    fn every_algorithm_preserves_shape_and_is_deterministic() {
        let img = checker();
        for algorithm in [Algorithm::Sobel, Algorithm::Laplacian, Algorithm::Canny] {
            let params = algorithm.default_params();
            let first = EdgeDetector.detect(&img, &params).unwrap();
            let second = EdgeDetector.detect(&img, &params).unwrap();
            assert_eq!(first.dimensions(), img.dimensions(), "{algorithm}");
            assert_eq!(first, second, "{algorithm}");
        }
    }

    #[test]
    fn even_kernel_rejected_by_every_algorithm() {
        let img = checker();
        let cases: [AlgorithmParams; 3] = [
            SobelParams {
                kernel_size: 4,
                ..SobelParams::default()
            }
            .into(),
            LaplacianParams { kernel_size: 4 }.into(),
            CannyParams {
                blur_kernel_size: 4,
                ..CannyParams::default()
            }
            .into(),
        ];
        for params in cases {
            let result = detect(&img, &params);
            assert!(
                matches!(result, Err(EdgeError::InvalidParameter { .. })),
                "{params:?} should fail"
            );
        }
    }
}
