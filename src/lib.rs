//! GPU separable Gaussian blur passes for wgpu pipelines.
//!
//! The crate describes blur work as immutable fragment-processor values:
//! a [`ConvolutionEffect`] captures one direction of a separable Gaussian
//! convolution, a [`BlurPlan`] sequences the passes for a 2D blur, and the
//! [`VariantCache`] compiles each distinct processor key into a wgpu render
//! pipeline exactly once.

pub use wgpu;

mod blur;
mod convolution;
mod invariant;
mod kernel;
mod key;
mod pipeline;
mod processor;
mod texture;
mod uniforms;
mod wgsl;

pub use blur::{radius_for_sigma, BlurPlan, SampleBounds};
pub use convolution::ConvolutionEffect;
pub use invariant::{ChannelMask, InvariantOutput};
pub use kernel::{Direction, Kernel1d, MAX_KERNEL_RADIUS, MAX_KERNEL_WIDTH};
pub use key::{KeyBuilder, ProcessorKey};
pub use pipeline::{
    create_params_bind_group_layout, create_source_bind_group_layout, create_source_sampler,
    create_uniform_buffer, CompiledVariant, PipelineError, VariantCache,
};
pub use processor::{FragmentProcessor, PassthroughEffect, ProgramSource};
pub use texture::{TextureId, TextureRegistry};
pub use uniforms::{ConvolutionUniforms, WEIGHT_VEC4_SLOTS};
