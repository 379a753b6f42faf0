//! The 1D Gaussian convolution descriptor.

use std::any::Any;

use crate::invariant::InvariantOutput;
use crate::kernel::{Direction, Kernel1d};
use crate::key::KeyBuilder;
use crate::processor::{FragmentProcessor, ProgramSource};
use crate::texture::TextureId;
use crate::wgsl;

/// Describes one direction of a separable Gaussian blur over a source
/// texture: each tap is multiplied by its precomputed weight and summed to
/// produce the filtered color.
///
/// The descriptor is a value object. The kernel is computed once at
/// construction and every query afterwards is a side-effect-free read, so
/// instances can be shared across threads without locking. It references its
/// source texture by id only; the owning pipeline keeps that texture alive
/// for the lifetime of the draw or compile request, and a descriptor must
/// not be retained past that request.
///
/// Equality deliberately ignores the texture: the same convolution shape
/// over two different textures is still the same compiled program, and
/// texture binding is selected separately at draw time.
///
/// # Examples
///
/// ```
/// use smudge::{ConvolutionEffect, Direction, TextureId};
///
/// let blur = ConvolutionEffect::gaussian(TextureId(7), Direction::Horizontal, 2, 1.0, None);
/// assert_eq!(blur.width(), 5);
///
/// // Same shape over another texture: still the same program.
/// let other = ConvolutionEffect::gaussian(TextureId(8), Direction::Horizontal, 2, 1.0, None);
/// assert_eq!(blur, other);
/// ```
#[derive(Debug, Clone)]
pub struct ConvolutionEffect {
    texture: TextureId,
    direction: Direction,
    kernel: Kernel1d,
    use_bounds: bool,
    bounds: [f32; 2],
}

impl ConvolutionEffect {
    /// Creates a Gaussian convolution pass over `texture`.
    ///
    /// `bounds`, when present, restricts sampling to `[lo, hi]` in the
    /// convolution direction's texture-coordinate space: the generated
    /// shader clamps every tap coordinate into that interval. The pair is
    /// stored verbatim.
    ///
    /// # Panics
    ///
    /// Panics when `radius` exceeds [`crate::MAX_KERNEL_RADIUS`] or `sigma`
    /// is not a finite positive number; see [`Kernel1d::gaussian`]. Callers
    /// are expected to go through the pass planner, which clamps both.
    pub fn gaussian(
        texture: TextureId,
        direction: Direction,
        radius: usize,
        sigma: f32,
        bounds: Option<[f32; 2]>,
    ) -> Self {
        Self {
            texture,
            direction,
            kernel: Kernel1d::gaussian(radius, sigma),
            use_bounds: bounds.is_some(),
            bounds: bounds.unwrap_or([0.0, 0.0]),
        }
    }

    /// The source texture this pass reads. Not part of equality.
    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn kernel(&self) -> &Kernel1d {
        &self.kernel
    }

    pub fn radius(&self) -> usize {
        self.kernel.radius()
    }

    /// Number of taps, `2 * radius + 1`.
    pub fn width(&self) -> usize {
        self.kernel.width()
    }

    pub fn use_bounds(&self) -> bool {
        self.use_bounds
    }

    /// Sampling bounds along the convolution axis. Only meaningful when
    /// [`ConvolutionEffect::use_bounds`] is true.
    pub fn bounds(&self) -> [f32; 2] {
        self.bounds
    }
}

impl PartialEq for ConvolutionEffect {
    fn eq(&self, other: &Self) -> bool {
        self.direction == other.direction
            && self.kernel == other.kernel
            && self.use_bounds == other.use_bounds
            && (!self.use_bounds || self.bounds == other.bounds)
    }
}

impl FragmentProcessor for ConvolutionEffect {
    fn name(&self) -> &'static str {
        "GaussianConvolution"
    }

    fn write_processor_key(&self, builder: &mut KeyBuilder) {
        builder.push(self.kernel.width() as u32);
        builder.push(self.direction as u32);
        builder.push_bool(self.use_bounds);
    }

    fn program_source(&self) -> ProgramSource {
        ProgramSource {
            fragment_wgsl: wgsl::convolution_fragment(
                self.kernel.width(),
                self.direction,
                self.use_bounds,
            ),
            entry_point: wgsl::CONVOLUTION_ENTRY,
            uses_params: true,
        }
    }

    fn track_invariant_output(&self, inout: &mut InvariantOutput) {
        // The kernel mixes neighboring texels whose combined coverage is not
        // statically known. Knowing the kernel sum and source opacity would
        // allow a tighter claim; the conservative one is reported.
        inout.mul_by_unknown_four_components();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn processor_eq(&self, other: &dyn FragmentProcessor) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self == other)
    }
}
