//! GPU-side parameter blocks for blur programs.

use crate::convolution::ConvolutionEffect;
use crate::kernel::MAX_KERNEL_WIDTH;

/// Number of vec4 slots the weight array occupies in the uniform block.
pub const WEIGHT_VEC4_SLOTS: usize = (MAX_KERNEL_WIDTH + 3) / 4;

/// Uniform block consumed by the generated convolution fragment stage.
///
/// Uniform-address-space arrays have a 16-byte element stride, so the
/// weights are packed four to a vec4 slot. The layout must stay in sync
/// with the `ConvolutionParams` declaration emitted by the WGSL builder.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ConvolutionUniforms {
    pub weights: [[f32; 4]; WEIGHT_VEC4_SLOTS],
    pub texel_increment: [f32; 2],
    pub bounds: [f32; 2],
}

impl ConvolutionUniforms {
    /// Packs a descriptor's parameters for upload. `texel_size` is the size
    /// of one source texel in UV space, `(1/width, 1/height)`.
    ///
    /// Without bounds the shader has no clamp and the stored pair is never
    /// read; the full `[0, 1]` interval keeps the block deterministic.
    pub fn new(effect: &ConvolutionEffect, texel_size: [f32; 2]) -> Self {
        let mut weights = [[0.0f32; 4]; WEIGHT_VEC4_SLOTS];
        for (i, weight) in effect.kernel().weights().iter().enumerate() {
            weights[i / 4][i % 4] = *weight;
        }

        let increment = effect.direction().increment();
        let bounds = if effect.use_bounds() {
            effect.bounds()
        } else {
            [0.0, 1.0]
        };

        Self {
            weights,
            texel_increment: [
                increment[0] * texel_size[0],
                increment[1] * texel_size[1],
            ],
            bounds,
        }
    }
}
