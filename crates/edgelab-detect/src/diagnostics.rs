//! Detection diagnostics: timing and output statistics for a single call.
//!
//! Time is read through the caller-supplied [`Clock`], so this crate stays
//! free of platform time APIs. Durations are serialized as fractional
//! seconds (`f64`) since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{Algorithm, AlgorithmParams, Dimensions, EdgeError, GrayImage, RgbImage};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// A monotonic time source.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Current timestamp.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Statistics of an output edge/intensity map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeStats {
    /// Output dimensions.
    pub dimensions: Dimensions,
    /// Number of pixels with a non-zero value.
    pub edge_pixel_count: u64,
    /// Mean pixel value.
    pub mean_intensity: f64,
    /// Largest pixel value.
    pub max_intensity: u8,
}

impl EdgeStats {
    /// Compute statistics for an output map.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn of(image: &GrayImage) -> Self {
        let dimensions = Dimensions::of(image);
        let mut edge_pixel_count = 0u64;
        let mut sum = 0u64;
        let mut max_intensity = 0u8;
        for &v in image.as_raw() {
            edge_pixel_count += u64::from(v > 0);
            sum += u64::from(v);
            max_intensity = max_intensity.max(v);
        }
        let pixel_count = dimensions.pixel_count();
        let mean_intensity = if pixel_count > 0 {
            sum as f64 / pixel_count as f64
        } else {
            0.0
        };
        Self {
            dimensions,
            edge_pixel_count,
            mean_intensity,
            max_intensity,
        }
    }

    /// Fraction of non-zero pixels, in `0.0..=1.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn density(&self) -> f64 {
        let total = self.dimensions.pixel_count();
        if total == 0 {
            0.0
        } else {
            self.edge_pixel_count as f64 / total as f64
        }
    }
}

/// Diagnostics collected from one detection call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionDiagnostics {
    /// Which algorithm ran.
    pub algorithm: Algorithm,
    /// The exact parameters used.
    pub params: AlgorithmParams,
    /// Wall-clock duration of the call (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Output statistics.
    pub stats: EdgeStats,
}

impl DetectionDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("{} Diagnostics Report\n{}", self.algorithm, "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{} ({} pixels)",
            self.stats.dimensions.width,
            self.stats.dimensions.height,
            self.stats.dimensions.pixel_count(),
        ));
        lines.push(format!("Parameters: {}", format_params(&self.params)));
        lines.push(format!("Duration: {:.3}ms", duration_ms(self.duration)));
        lines.push(format!(
            "Non-zero pixels: {} ({:.1}%)  |  mean={:.2}  max={}",
            self.stats.edge_pixel_count,
            self.stats.density() * 100.0,
            self.stats.mean_intensity,
            self.stats.max_intensity,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
#[must_use]
pub fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format parameters into a compact detail string.
fn format_params(params: &AlgorithmParams) -> String {
    match params {
        AlgorithmParams::Sobel(p) => {
            format!("kernel_size={} direction={:?}", p.kernel_size, p.direction)
        }
        AlgorithmParams::Laplacian(p) => format!("kernel_size={}", p.kernel_size),
        AlgorithmParams::Canny(p) => format!(
            "low={} high={} blur_kernel_size={} sigma={:.2}{}",
            p.low_threshold,
            p.high_threshold,
            p.blur_kernel_size,
            p.sigma,
            if p.l2_gradient { " l2" } else { "" },
        ),
    }
}

/// Run a detection and collect timing and output statistics.
///
/// # Errors
///
/// Propagates the detector's [`EdgeError`].
pub fn detect_with_diagnostics<C: Clock>(
    image: &RgbImage,
    params: &AlgorithmParams,
    clock: &C,
) -> Result<(GrayImage, DetectionDiagnostics), EdgeError> {
    let start = clock.now();
    let output = crate::detect(image, params)?;
    let duration = clock.elapsed(&start);

    let diagnostics = DetectionDiagnostics {
        algorithm: params.algorithm(),
        params: *params,
        duration,
        stats: EdgeStats::of(&output),
    };
    log::debug!(
        "{} finished in {:.3}ms, {} non-zero pixels",
        diagnostics.algorithm,
        duration_ms(duration),
        diagnostics.stats.edge_pixel_count,
    );
    Ok((output, diagnostics))
}
