//! Separable blur pass planning.
//!
//! A 2D Gaussian blur separates into a horizontal and a vertical 1D
//! convolution. The planner turns a caller-facing request (sigma per axis,
//! optional sampling bounds) into the ordered descriptor passes the pipeline
//! executes, clamping radius and sigma into the supported kernel width.

use smallvec::SmallVec;
use tracing::debug;

use crate::convolution::ConvolutionEffect;
use crate::kernel::{Direction, MAX_KERNEL_RADIUS};
use crate::texture::TextureId;

/// Kernel radius covering three standard deviations of a Gaussian,
/// capped at [`MAX_KERNEL_RADIUS`]. Non-positive sigmas need no taps.
pub fn radius_for_sigma(sigma: f32) -> usize {
    if sigma <= 0.0 {
        return 0;
    }
    ((3.0 * sigma).ceil() as usize).min(MAX_KERNEL_RADIUS)
}

/// Radius and effective sigma for one axis. When the three-sigma radius
/// overflows the supported kernel width, sigma is pulled back so the kernel
/// still covers three standard deviations.
fn clamp_axis(sigma: f32) -> (usize, f32) {
    let radius = radius_for_sigma(sigma);
    if radius == MAX_KERNEL_RADIUS && 3.0 * sigma > MAX_KERNEL_RADIUS as f32 {
        let clamped = MAX_KERNEL_RADIUS as f32 / 3.0;
        debug!(sigma, clamped, "sigma exceeds the supported kernel radius");
        (radius, clamped)
    } else {
        (radius, sigma)
    }
}

/// Texture-space sampling limits for a blur, one interval per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleBounds {
    pub x: [f32; 2],
    pub y: [f32; 2],
}

/// An ordered set of convolution passes realizing a 2D Gaussian blur.
///
/// The horizontal pass runs first so the vertical pass reads
/// already-smoothed rows from the intermediate target. An axis whose sigma
/// is non-positive contributes no pass; a plan can therefore hold zero, one
/// or two passes.
///
/// # Examples
///
/// ```
/// use smudge::{BlurPlan, Direction, TextureId};
///
/// let plan = BlurPlan::new(TextureId(3), 2.0, 2.0, None);
/// assert_eq!(plan.passes().len(), 2);
/// assert_eq!(plan.passes()[0].direction(), Direction::Horizontal);
/// assert_eq!(plan.passes()[1].direction(), Direction::Vertical);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BlurPlan {
    passes: SmallVec<[ConvolutionEffect; 2]>,
}

impl BlurPlan {
    /// Plans a blur of `texture` with the given per-axis sigmas. `bounds`,
    /// when present, restricts sampling on each axis and is carried into
    /// the corresponding pass.
    pub fn new(
        texture: TextureId,
        sigma_x: f32,
        sigma_y: f32,
        bounds: Option<SampleBounds>,
    ) -> Self {
        let mut passes = SmallVec::new();

        let (radius_x, sigma_x) = clamp_axis(sigma_x);
        if radius_x > 0 {
            passes.push(ConvolutionEffect::gaussian(
                texture,
                Direction::Horizontal,
                radius_x,
                sigma_x,
                bounds.map(|b| b.x),
            ));
        }

        let (radius_y, sigma_y) = clamp_axis(sigma_y);
        if radius_y > 0 {
            passes.push(ConvolutionEffect::gaussian(
                texture,
                Direction::Vertical,
                radius_y,
                sigma_y,
                bounds.map(|b| b.y),
            ));
        }

        Self { passes }
    }

    pub fn passes(&self) -> &[ConvolutionEffect] {
        &self.passes
    }

    /// True when both sigmas were negligible and nothing needs to run.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}
