//! Public-API tests for descriptor identity, variant keys and pass planning.

use smudge::{
    radius_for_sigma, BlurPlan, ConvolutionEffect, ConvolutionUniforms, Direction,
    FragmentProcessor, PassthroughEffect, ProcessorKey, SampleBounds, TextureId,
    MAX_KERNEL_RADIUS,
};

#[test]
fn equal_parameters_produce_equal_descriptors() {
    let make = |texture: u64| {
        ConvolutionEffect::gaussian(
            TextureId(texture),
            Direction::Horizontal,
            4,
            1.8,
            Some([0.0, 0.5]),
        )
    };

    // Equal shape over different textures is the same program.
    assert_eq!(make(1), make(2));
    assert!(make(1).processor_eq(&make(2)));
}

#[test]
fn variant_keys_deduplicate_shader_shapes() {
    // Two blurs with different sigmas but equal widths share a key: the
    // pipeline compiles one shader and feeds the weights through uniforms.
    let soft = ConvolutionEffect::gaussian(TextureId(1), Direction::Vertical, 3, 0.8, None);
    let softer = ConvolutionEffect::gaussian(TextureId(2), Direction::Vertical, 3, 1.0, None);
    assert_eq!(
        ProcessorKey::for_processor(&soft),
        ProcessorKey::for_processor(&softer)
    );

    // Different processor types never collide.
    assert_ne!(
        ProcessorKey::for_processor(&soft),
        ProcessorKey::for_processor(&PassthroughEffect)
    );
}

#[test]
fn plans_cover_the_requested_blur() {
    let bounds = SampleBounds {
        x: [0.25, 0.75],
        y: [0.0, 1.0],
    };
    let plan = BlurPlan::new(TextureId(9), 2.0, 3.5, Some(bounds));

    assert_eq!(plan.passes().len(), 2);
    let horizontal = &plan.passes()[0];
    let vertical = &plan.passes()[1];

    assert_eq!(horizontal.direction(), Direction::Horizontal);
    assert_eq!(horizontal.radius(), radius_for_sigma(2.0));
    assert_eq!(horizontal.bounds(), [0.25, 0.75]);

    assert_eq!(vertical.direction(), Direction::Vertical);
    assert_eq!(vertical.radius(), radius_for_sigma(3.5));
    assert_eq!(vertical.texture(), TextureId(9));
}

#[test]
fn extreme_sigmas_never_exceed_the_kernel_budget() {
    for sigma in [5.0, 20.0, 300.0] {
        let plan = BlurPlan::new(TextureId(1), sigma, sigma, None);
        for pass in plan.passes() {
            assert!(pass.radius() <= MAX_KERNEL_RADIUS);
            let sum: f32 = pass.kernel().weights().iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
        }
    }
}

#[test]
fn uniform_blocks_are_byte_stable_for_equal_descriptors() {
    let texel_size = [1.0 / 800.0, 1.0 / 600.0];
    let left = ConvolutionEffect::gaussian(TextureId(1), Direction::Horizontal, 2, 1.0, None);
    let right = ConvolutionEffect::gaussian(TextureId(2), Direction::Horizontal, 2, 1.0, None);

    let left_block = ConvolutionUniforms::new(&left, texel_size);
    let right_block = ConvolutionUniforms::new(&right, texel_size);
    assert_eq!(
        bytemuck::bytes_of(&left_block),
        bytemuck::bytes_of(&right_block)
    );
}
