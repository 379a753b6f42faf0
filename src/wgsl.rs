//! WGSL assembly for blur programs.
//!
//! Every program shares a fullscreen-triangle vertex stage and the source
//! texture bindings; the fragment stage comes from the processor. Generated
//! source depends only on what the processor key captures (tap count,
//! direction, bounds usage); weights and texel geometry arrive through
//! uniforms, so key-equal processors share one compiled pipeline.

use crate::kernel::Direction;

pub(crate) const CONVOLUTION_ENTRY: &str = "fs_convolve";
pub(crate) const PASSTHROUGH_ENTRY: &str = "fs_passthrough";

/// Vertex stage drawing a fullscreen triangle (3 vertices, no vertex buffer).
pub(crate) const FULLSCREEN_VS: &str = r#"
struct FullscreenOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_fullscreen(@builtin(vertex_index) vertex_index: u32) -> FullscreenOutput {
    // Three vertices whose UVs overshoot to (2, 2) cover the whole screen
    let uv = vec2<f32>(f32((vertex_index << 1u) & 2u), f32(vertex_index & 2u));
    var out: FullscreenOutput;
    out.position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
    return out;
}
"#;

/// Source texture bindings shared by every fragment stage (group 0).
pub(crate) const SOURCE_BINDINGS: &str = r#"
@group(0) @binding(0) var t_source: texture_2d<f32>;
@group(0) @binding(1) var s_source: sampler;
"#;

/// Uniform block declaration matching [`crate::ConvolutionUniforms`].
///
/// Uniform-address-space arrays have a 16-byte element stride, which is why
/// the weights are packed four to a vec4 slot.
const CONVOLUTION_PARAMS: &str = r#"
struct ConvolutionParams {
    weights: array<vec4<f32>, 7>,
    texel_increment: vec2<f32>,
    bounds: vec2<f32>,
};

@group(1) @binding(0) var<uniform> params: ConvolutionParams;
"#;

/// Passthrough fragment stage: samples the input unchanged.
const PASSTHROUGH_FS: &str = r#"
@fragment
fn fs_passthrough(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return textureSample(t_source, s_source, uv);
}
"#;

pub(crate) fn passthrough_fragment() -> String {
    PASSTHROUGH_FS.to_owned()
}

/// Generates the fragment stage for a 1D convolution of `width` taps.
///
/// The tap count is baked into the source so the loop unrolls at shader
/// compile time; with bounds enabled, every tap coordinate is clamped into
/// `[bounds.x, bounds.y]` along the convolution axis.
pub(crate) fn convolution_fragment(width: usize, direction: Direction, use_bounds: bool) -> String {
    let radius = width / 2;
    let clamp_line = if use_bounds {
        match direction {
            Direction::Horizontal => {
                "        coord.x = clamp(coord.x, params.bounds.x, params.bounds.y);\n"
            }
            Direction::Vertical => {
                "        coord.y = clamp(coord.y, params.bounds.x, params.bounds.y);\n"
            }
        }
    } else {
        ""
    };

    format!(
        r#"{CONVOLUTION_PARAMS}
@fragment
fn {CONVOLUTION_ENTRY}(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {{
    var sum = vec4<f32>(0.0);
    for (var i = 0u; i < {width}u; i = i + 1u) {{
        let offset = (f32(i) - {radius}.0) * params.texel_increment;
        var coord = uv + offset;
{clamp_line}        let weight = params.weights[i / 4u][i % 4u];
        sum = sum + textureSampleLevel(t_source, s_source, coord, 0.0) * weight;
    }}
    return sum;
}}
"#
    )
}

/// Concatenates the shared stages and a fragment stage into one WGSL module.
pub(crate) fn assemble(fragment: &str) -> String {
    format!("{FULLSCREEN_VS}\n{SOURCE_BINDINGS}\n{fragment}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convolution_source_bakes_in_the_tap_count() {
        let source = convolution_fragment(5, Direction::Horizontal, false);
        assert!(source.contains("i < 5u"));
        assert!(source.contains("f32(i) - 2.0"));
        assert!(!source.contains("clamp("));
    }

    #[test]
    fn bounds_clamp_follows_the_convolution_axis() {
        let horizontal = convolution_fragment(5, Direction::Horizontal, true);
        assert!(horizontal.contains("coord.x = clamp(coord.x"));
        assert!(!horizontal.contains("coord.y = clamp"));

        let vertical = convolution_fragment(5, Direction::Vertical, true);
        assert!(vertical.contains("coord.y = clamp(coord.y"));
        assert!(!vertical.contains("coord.x = clamp"));
    }

    #[test]
    fn assembled_module_contains_all_stages() {
        let module = assemble(&passthrough_fragment());
        assert!(module.contains("vs_fullscreen"));
        assert!(module.contains("t_source"));
        assert!(module.contains(PASSTHROUGH_ENTRY));
    }

    #[test]
    fn passthrough_does_not_reference_params() {
        assert!(!passthrough_fragment().contains("params"));
    }
}
