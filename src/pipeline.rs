//! Shader-variant compilation and caching.
//!
//! Each distinct processor key corresponds to one compiled GPU pipeline.
//! The cache front-loads the key comparison so that requesting a variant for
//! an already-seen shape never touches the shader compiler again; kernel
//! weights and bounds travel through uniforms and never force a recompile.

use std::num::NonZeroUsize;

use lru::LruCache;
use thiserror::Error;
use tracing::{debug, trace};
use wgpu::util::DeviceExt;

use crate::key::ProcessorKey;
use crate::processor::FragmentProcessor;
use crate::texture::{TextureId, TextureRegistry};
use crate::uniforms::ConvolutionUniforms;
use crate::wgsl;

/// Errors from the blur pipeline backend.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The referenced texture id has no entry in the registry.
    #[error("texture {0} is not registered")]
    TextureNotRegistered(TextureId),
}

/// One compiled shader variant.
pub struct CompiledVariant {
    /// Render pipeline drawing a fullscreen triangle with this variant's
    /// fragment stage.
    pub pipeline: wgpu::RenderPipeline,
    /// Whether the variant binds the parameter uniform at group 1.
    pub uses_params: bool,
}

/// LRU cache of compiled shader variants, keyed by [`ProcessorKey`].
pub struct VariantCache {
    cache: LruCache<ProcessorKey, CompiledVariant>,
    source_layout: wgpu::BindGroupLayout,
    params_layout: wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
}

impl VariantCache {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        capacity: NonZeroUsize,
    ) -> Self {
        Self {
            cache: LruCache::new(capacity),
            source_layout: create_source_bind_group_layout(device),
            params_layout: create_params_bind_group_layout(device),
            format,
        }
    }

    /// Returns the compiled variant for `processor`, compiling it on first
    /// sight of its key.
    pub fn get_or_compile(
        &mut self,
        device: &wgpu::Device,
        processor: &dyn FragmentProcessor,
    ) -> &CompiledVariant {
        let key = ProcessorKey::for_processor(processor);
        if self.cache.contains(&key) {
            trace!(processor = processor.name(), "blur variant cache hit");
        } else {
            debug!(
                processor = processor.name(),
                key = ?key.words(),
                "compiling blur shader variant"
            );
        }

        let format = self.format;
        let source_layout = &self.source_layout;
        let params_layout = &self.params_layout;
        self.cache.get_or_insert(key, || {
            compile_variant(device, format, source_layout, params_layout, processor)
        })
    }

    /// Number of variants currently resident.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Creates the bind group sampling `texture` (group 0).
    pub fn source_bind_group(
        &self,
        device: &wgpu::Device,
        registry: &TextureRegistry,
        texture: TextureId,
        sampler: &wgpu::Sampler,
    ) -> Result<wgpu::BindGroup, PipelineError> {
        let view = registry
            .view(texture)
            .ok_or(PipelineError::TextureNotRegistered(texture))?;

        Ok(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blur_source_bg"),
            layout: &self.source_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }))
    }

    /// Creates the bind group for a pass's parameter uniform (group 1).
    pub fn params_bind_group(
        &self,
        device: &wgpu::Device,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blur_params_bg"),
            layout: &self.params_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }
}

/// Bind group layout for the source texture: texture_2d + sampler at group 0.
pub fn create_source_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("blur_source_bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Bind group layout for pass parameters: uniform buffer at group 1 binding 0.
pub fn create_params_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("blur_params_bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Clamp-to-edge linear sampler for reading blur sources.
pub fn create_source_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

/// Uploads one pass's parameter block.
pub fn create_uniform_buffer(
    device: &wgpu::Device,
    uniforms: &ConvolutionUniforms,
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("convolution_params"),
        contents: bytemuck::bytes_of(uniforms),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn compile_variant(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    source_layout: &wgpu::BindGroupLayout,
    params_layout: &wgpu::BindGroupLayout,
    processor: &dyn FragmentProcessor,
) -> CompiledVariant {
    let source = processor.program_source();
    let module_wgsl = wgsl::assemble(&source.fragment_wgsl);

    let shader_label = format!("{}_shader", source.entry_point);
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&shader_label),
        source: wgpu::ShaderSource::Wgsl(module_wgsl.into()),
    });

    // Only include group 1 when this variant actually references it.
    let bind_group_layouts: Vec<&wgpu::BindGroupLayout> = if source.uses_params {
        vec![source_layout, params_layout]
    } else {
        vec![source_layout]
    };

    let layout_label = format!("{}_layout", source.entry_point);
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&layout_label),
        bind_group_layouts: &bind_group_layouts,
        push_constant_ranges: &[],
    });

    let pipeline_label = format!("{}_pipeline", source.entry_point);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&pipeline_label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_fullscreen"),
            compilation_options: Default::default(),
            buffers: &[], // Fullscreen triangle, no vertex buffers
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some(source.entry_point),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                // Sources are premultiplied; intermediate targets are cleared
                // to transparent black, so this also behaves as a plain write.
                blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    CompiledVariant {
        pipeline,
        uses_params: source.uses_params,
    }
}
