//! Static background star layers.
//!
//! Two layers of white points scattered through a cube around the origin,
//! drawn at a constant pixel size with no attenuation. Purely cosmetic; the
//! simulation never reads them.

use rand::Rng;
use wgpu::util::DeviceExt;

use crate::shaders::{self, StarUniforms};

/// Stars per layer.
const STAR_COUNT: usize = 1000;
/// Half-extent of the cube stars are scattered in.
const STAR_SPREAD: f32 = 7.5;
/// Pixel sizes of the two layers.
const LAYER_SIZES: [f32; 2] = [1.0, 1.5];

struct StarLayer {
    instance_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    point_size: f32,
    count: u32,
}

pub struct StarField {
    pipeline: wgpu::RenderPipeline,
    layers: Vec<StarLayer>,
}

impl StarField {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Star Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::STARS_SHADER.into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Star Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Star Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Star Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    }],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let mut rng = rand::thread_rng();
        let layers = LAYER_SIZES
            .iter()
            .map(|&point_size| {
                let positions = scatter_positions(&mut rng, STAR_COUNT, STAR_SPREAD);
                let instance_buffer =
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Star Instance Buffer"),
                        contents: bytemuck::cast_slice(&positions),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Star Uniform Buffer"),
                    size: std::mem::size_of::<StarUniforms>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Star Bind Group"),
                    layout: &bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                });
                StarLayer {
                    instance_buffer,
                    uniform_buffer,
                    bind_group,
                    point_size,
                    count: positions.len() as u32,
                }
            })
            .collect();

        Self { pipeline, layers }
    }

    /// Uploads the per-frame uniforms for every layer.
    pub fn prepare(&self, queue: &wgpu::Queue, view_proj: glam::Mat4, resolution: [f32; 2]) {
        for layer in &self.layers {
            let uniforms = StarUniforms {
                view_proj: view_proj.to_cols_array_2d(),
                color: [1.0, 1.0, 1.0],
                point_size: layer.point_size,
                resolution,
                _pad: [0.0; 2],
            };
            queue.write_buffer(&layer.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        }
    }

    /// Draws all layers into the given render pass.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        for layer in &self.layers {
            render_pass.set_bind_group(0, &layer.bind_group, &[]);
            render_pass.set_vertex_buffer(0, layer.instance_buffer.slice(..));
            render_pass.draw(0..6, 0..layer.count);
        }
    }
}

/// Scatters `count` points uniformly through a cube of half-extent `spread`.
fn scatter_positions(rng: &mut impl Rng, count: usize, spread: f32) -> Vec<[f32; 3]> {
    (0..count)
        .map(|_| {
            [
                rng.gen_range(-spread..spread),
                rng.gen_range(-spread..spread),
                rng.gen_range(-spread..spread),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_fills_the_cube() {
        let mut rng = rand::thread_rng();
        let positions = scatter_positions(&mut rng, 500, 7.5);
        assert_eq!(positions.len(), 500);
        for p in &positions {
            for component in p {
                assert!(component.abs() <= 7.5);
            }
        }
    }
}
