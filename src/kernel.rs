//! Pass directions and fixed-capacity 1D convolution kernels.
//!
//! A blur pass walks a row or column of texels around the output texel and
//! sums them with precomputed Gaussian weights. Kernels use a fixed-capacity
//! buffer so descriptors stay cheap to copy and compare; only the first
//! `2 * radius + 1` entries are meaningful and the tail is kept zeroed.

/// Largest supported kernel radius.
///
/// Derived from the minimum guaranteed texture-sample budget per fragment
/// stage on older GPU hardware: a sigma of 4.0 gives a 25-wide kernel, while
/// 5.0 would already exceed a 32-sample budget.
pub const MAX_KERNEL_RADIUS: usize = 12;

/// Width of the largest supported kernel, `2 * MAX_KERNEL_RADIUS + 1`.
pub const MAX_KERNEL_WIDTH: usize = 2 * MAX_KERNEL_RADIUS + 1;

/// The axis a 1D convolution pass runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    /// Unit texel step along this axis, scaled into UV space by the caller.
    pub fn increment(self) -> [f32; 2] {
        match self {
            Direction::Horizontal => [1.0, 0.0],
            Direction::Vertical => [0.0, 1.0],
        }
    }
}

/// A 1D convolution kernel: a fixed weight buffer plus the radius that says
/// how much of it is meaningful.
///
/// Equality and iteration always go through [`Kernel1d::weights`], which is
/// the `2 * radius + 1` prefix. The buffer capacity never drives either.
///
/// # Examples
///
/// ```
/// use smudge::Kernel1d;
///
/// let kernel = Kernel1d::gaussian(2, 1.0);
/// assert_eq!(kernel.width(), 5);
///
/// let sum: f32 = kernel.weights().iter().sum();
/// assert!((sum - 1.0).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Kernel1d {
    weights: [f32; MAX_KERNEL_WIDTH],
    radius: usize,
}

impl Kernel1d {
    /// Builds a normalized Gaussian kernel of `2 * radius + 1` taps.
    ///
    /// Weights are sampled as `exp(-(i - radius)^2 / (2 * sigma^2))` and then
    /// normalized in a single pass over the meaningful prefix so they sum
    /// to 1.0.
    ///
    /// # Panics
    ///
    /// Panics if `radius` exceeds [`MAX_KERNEL_RADIUS`] or `sigma` is not a
    /// finite positive number. Both are caller contract violations; the pass
    /// planner clamps radius and sigma before building kernels.
    pub fn gaussian(radius: usize, sigma: f32) -> Self {
        assert!(
            radius <= MAX_KERNEL_RADIUS,
            "kernel radius {radius} exceeds the supported maximum of {MAX_KERNEL_RADIUS}"
        );
        assert!(
            sigma.is_finite() && sigma > 0.0,
            "sigma must be > 0 and finite"
        );

        let width = 2 * radius + 1;
        let denom = 1.0 / (2.0 * sigma * sigma);

        let mut weights = [0.0f32; MAX_KERNEL_WIDTH];
        let mut sum = 0.0f32;
        for (i, weight) in weights[..width].iter_mut().enumerate() {
            let x = i as f32 - radius as f32;
            *weight = (-x * x * denom).exp();
            sum += *weight;
        }
        for weight in &mut weights[..width] {
            *weight /= sum;
        }

        Self { weights, radius }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Number of meaningful taps, `2 * radius + 1`.
    pub fn width(&self) -> usize {
        2 * self.radius + 1
    }

    /// The meaningful weights. The zeroed tail of the buffer is never exposed.
    pub fn weights(&self) -> &[f32] {
        &self.weights[..self.width()]
    }
}

impl PartialEq for Kernel1d {
    fn eq(&self, other: &Self) -> bool {
        self.radius == other.radius && self.weights() == other.weights()
    }
}

#[cfg(test)]
mod tests {
    use super::{Kernel1d, MAX_KERNEL_RADIUS, MAX_KERNEL_WIDTH};

    fn assert_approximately_equal(left: f32, right: f32, tolerance: f32) {
        assert!(
            (left - right).abs() <= tolerance,
            "expected {left} to be within {tolerance} of {right}"
        );
    }

    #[test]
    fn gaussian_weights_sum_to_one_for_all_valid_radii() {
        for radius in 0..=MAX_KERNEL_RADIUS {
            for sigma in [0.3, 1.0, 2.5, 4.0] {
                let kernel = Kernel1d::gaussian(radius, sigma);
                let sum: f32 = kernel.weights().iter().sum();
                assert_approximately_equal(sum, 1.0, 1e-5);
            }
        }
    }

    #[test]
    fn gaussian_weights_are_symmetric() {
        let kernel = Kernel1d::gaussian(5, 1.7);
        let weights = kernel.weights();
        for i in 0..kernel.width() {
            assert_approximately_equal(weights[i], weights[2 * kernel.radius() - i], 1e-6);
        }
    }

    #[test]
    fn larger_sigma_flattens_the_distribution() {
        let radius = 2;
        let mut previous_center = f32::INFINITY;
        for sigma in [0.5, 1.0, 1.5, 2.0, 3.0] {
            let kernel = Kernel1d::gaussian(radius, sigma);
            let center = kernel.weights()[radius];
            assert!(
                center < previous_center,
                "center weight {center} did not decrease for sigma {sigma}"
            );
            previous_center = center;
        }
    }

    #[test]
    fn radius_two_sigma_one_matches_the_discrete_gaussian() {
        let kernel = Kernel1d::gaussian(2, 1.0);
        let expected = [0.0545, 0.2442, 0.4026, 0.2442, 0.0545];
        for (weight, expected) in kernel.weights().iter().zip(expected) {
            assert_approximately_equal(*weight, expected, 1e-4);
        }
    }

    #[test]
    fn radius_zero_is_a_single_unit_tap_for_any_sigma() {
        for sigma in [0.1, 1.0, 100.0] {
            let kernel = Kernel1d::gaussian(0, sigma);
            assert_eq!(kernel.weights(), &[1.0]);
        }
    }

    #[test]
    fn maximum_radius_fills_the_whole_buffer() {
        let kernel = Kernel1d::gaussian(MAX_KERNEL_RADIUS, 4.0);
        assert_eq!(kernel.width(), MAX_KERNEL_WIDTH);
        assert_eq!(kernel.weights().len(), MAX_KERNEL_WIDTH);
    }

    #[test]
    fn unused_buffer_tail_stays_zeroed() {
        let kernel = Kernel1d::gaussian(2, 1.0);
        assert!(kernel.weights[kernel.width()..].iter().all(|w| *w == 0.0));
    }

    #[test]
    #[should_panic(expected = "kernel radius")]
    fn radius_beyond_the_maximum_is_rejected() {
        let _ = Kernel1d::gaussian(MAX_KERNEL_RADIUS + 1, 4.0);
    }

    #[test]
    #[should_panic(expected = "sigma")]
    fn non_positive_sigma_is_rejected() {
        let _ = Kernel1d::gaussian(2, 0.0);
    }

    #[test]
    fn kernels_with_equal_shape_compare_equal() {
        assert_eq!(Kernel1d::gaussian(3, 1.5), Kernel1d::gaussian(3, 1.5));
        assert_ne!(Kernel1d::gaussian(3, 1.5), Kernel1d::gaussian(3, 1.6));
        assert_ne!(Kernel1d::gaussian(3, 1.5), Kernel1d::gaussian(4, 1.5));
    }
}
