//! One-dimensional kernel taps for the separable filters.
//!
//! Every 2-D kernel in this crate is the outer product of a horizontal and
//! a vertical 1-D kernel. Derivative kernels follow the classic Sobel
//! construction: a binomial smoothing row convolved with a finite
//! difference of the requested order.

/// A separable 2-D kernel.
///
/// Applied as a correlation anchored at the centre tap of each 1-D kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct SeparableKernel {
    /// Taps applied along each row.
    pub horizontal: Vec<f32>,
    /// Taps applied along each column.
    pub vertical: Vec<f32>,
}

impl SeparableKernel {
    /// Sobel kernel for the derivative of order `dx` in x and `dy` in y.
    ///
    /// `size` is the aperture (1, 3, 5 or 7). Size 1 uses a 3-tap
    /// derivative with no smoothing across the derivative direction.
    #[must_use]
    pub fn sobel(dx: u32, dy: u32, size: u32) -> Self {
        Self {
            horizontal: derivative(dx, size),
            vertical: derivative(dy, size),
        }
    }

    /// Square Gaussian kernel of side `size` and standard deviation `sigma`.
    #[must_use]
    pub fn gaussian(size: u32, sigma: f32) -> Self {
        let taps = gaussian(size, sigma);
        Self {
            horizontal: taps.clone(),
            vertical: taps,
        }
    }
}

/// Row `n - 1` of Pascal's triangle, i.e. `n` binomial taps.
#[must_use]
pub fn binomial(n: usize) -> Vec<f32> {
    let mut row = vec![1.0_f32];
    for _ in 1..n {
        let mut next = vec![0.0; row.len() + 1];
        for (i, &v) in row.iter().enumerate() {
            next[i] += v;
            next[i + 1] += v;
        }
        row = next;
    }
    row
}

/// Derivative taps of the given `order` for an aperture of `size`.
///
/// Order 0 is pure smoothing (a single unit tap for size 1). Orders 1 and
/// 2 use at least three taps regardless of `size`.
#[must_use]
pub fn derivative(order: u32, size: u32) -> Vec<f32> {
    let size = size as usize;
    match order {
        0 if size <= 1 => vec![1.0],
        0 => binomial(size),
        _ => {
            let order = order as usize;
            let taps = size.max(3);
            let difference = finite_difference(order);
            convolve_full(&binomial(taps + 1 - difference.len()), &difference)
        }
    }
}

/// Normalised Gaussian taps of length `size`.
///
/// Computed in `f64` and rounded once to `f32`; the taps sum to 1.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn gaussian(size: u32, sigma: f32) -> Vec<f32> {
    let sigma = f64::from(sigma);
    let centre = f64::from(size.saturating_sub(1)) / 2.0;
    let scale = -0.5 / (sigma * sigma);
    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let d = f64::from(i) - centre;
            (d * d * scale).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|v| (v / sum) as f32).collect()
}

/// `[-1, 1]` differenced `order` times.
fn finite_difference(order: usize) -> Vec<f32> {
    let mut taps = vec![1.0_f32];
    for _ in 0..order {
        taps = convolve_full(&taps, &[-1.0, 1.0]);
    }
    taps
}

/// Full discrete convolution of two tap sequences.
fn convolve_full(a: &[f32], b: &[f32]) -> Vec<f32> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binomial_rows() {
        assert_eq!(binomial(1), vec![1.0]);
        assert_eq!(binomial(3), vec![1.0, 2.0, 1.0]);
        assert_eq!(binomial(7), vec![1.0, 6.0, 15.0, 20.0, 15.0, 6.0, 1.0]);
    }

    #[test]
    fn first_derivative_taps() {
        assert_eq!(derivative(1, 1), vec![-1.0, 0.0, 1.0]);
        assert_eq!(derivative(1, 3), vec![-1.0, 0.0, 1.0]);
        assert_eq!(derivative(1, 5), vec![-1.0, -2.0, 0.0, 2.0, 1.0]);
        assert_eq!(
            derivative(1, 7),
            vec![-1.0, -4.0, -5.0, 0.0, 5.0, 4.0, 1.0]
        );
    }

    #[test]
    fn second_derivative_taps() {
        assert_eq!(derivative(2, 1), vec![1.0, -2.0, 1.0]);
        assert_eq!(derivative(2, 3), vec![1.0, -2.0, 1.0]);
        assert_eq!(derivative(2, 5), vec![1.0, 0.0, -2.0, 0.0, 1.0]);
    }

    #[test]
    fn smoothing_taps() {
        assert_eq!(derivative(0, 1), vec![1.0]);
        assert_eq!(derivative(0, 5), vec![1.0, 4.0, 6.0, 4.0, 1.0]);
    }

    #[test]
    fn derivative_taps_sum_to_zero() {
        for size in [1, 3, 5, 7] {
            for order in [1, 2] {
                let sum: f32 = derivative(order, size).iter().sum();
                assert!(sum.abs() < 1e-6, "order {order} size {size} sums to {sum}");
            }
        }
    }

    /// Outer product of the taps, rows indexed by the vertical taps.
    fn to_dense(kernel: &SeparableKernel) -> Vec<Vec<f32>> {
        kernel
            .vertical
            .iter()
            .map(|v| kernel.horizontal.iter().map(|h| v * h).collect())
            .collect()
    }

    #[test]
    fn sobel_3x3_matches_classic_kernel() {
        let dense = to_dense(&SeparableKernel::sobel(1, 0, 3));
        assert_eq!(
            dense,
            vec![
                vec![-1.0, 0.0, 1.0],
                vec![-2.0, 0.0, 2.0],
                vec![-1.0, 0.0, 1.0],
            ]
        );
    }

    #[test]
    fn sobel_size_one_has_no_cross_smoothing() {
        let k = SeparableKernel::sobel(0, 1, 1);
        assert_eq!(k.horizontal, vec![1.0]);
        assert_eq!(k.vertical, vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn gaussian_is_normalised_and_symmetric() {
        for size in [3, 5, 7] {
            let taps = gaussian(size, 1.4);
            assert_eq!(taps.len(), size as usize);
            let sum: f32 = taps.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
            for i in 0..taps.len() / 2 {
                assert!((taps[i] - taps[taps.len() - 1 - i]).abs() < 1e-7);
            }
            let mid = taps.len() / 2;
            assert!(taps.iter().all(|&t| t <= taps[mid]));
        }
    }

    #[test]
    fn gaussian_5_tap_weights() {
        let taps = gaussian(5, 1.4);
        assert!((taps[2] - 0.3058).abs() < 1e-3, "centre {}", taps[2]);
        assert!((taps[1] - 0.2369).abs() < 1e-3, "inner {}", taps[1]);
        assert!((taps[0] - 0.1102).abs() < 1e-3, "outer {}", taps[0]);
    }
}
