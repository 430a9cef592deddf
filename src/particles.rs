//! Core particle simulation.
//!
//! Particle state lives in two double-buffered RGBA float textures, one pair
//! for velocity and one for position. Each frame a velocity pass and then a
//! position pass run as fullscreen fragment passes, reading the active slot
//! of each pair and writing the inactive slot, after which the active index
//! flips. The point renderer samples whichever position slot was written
//! most recently, so the on-screen swarm always trails the simulation by
//! zero frames.
//!
//! Per-lane state is addressed with `textureLoad` at integer texel
//! coordinates; the textures are never sampled through a filter.

use std::sync::mpsc;

use glam::{Mat4, Vec3};
use rand::Rng;

use crate::color::Color;
use crate::config::{BlendMode, ParticleSettings};
use crate::error::{ConfigError, GpuError};
use crate::shaders::{self, RenderUniforms, SimUniforms};

/// Format of every state texture slot.
const STATE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;
/// Bytes per state texel.
const STATE_TEXEL_BYTES: u32 = 16;

/// A double-buffered state quantity.
///
/// Slot 0 is seeded at construction; thereafter the two slots alternate
/// between "read this frame" and "written this frame".
struct StatePair {
    textures: [wgpu::Texture; 2],
    views: [wgpu::TextureView; 2],
}

impl StatePair {
    fn new(device: &wgpu::Device, size: u32, label: &str) -> Self {
        let descriptor = wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: STATE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        };
        let textures = [
            device.create_texture(&descriptor),
            device.create_texture(&descriptor),
        ];
        let views = [
            textures[0].create_view(&wgpu::TextureViewDescriptor::default()),
            textures[1].create_view(&wgpu::TextureViewDescriptor::default()),
        ];
        Self { textures, views }
    }
}

/// A swarm of `texture_size²` particles attracted toward a shared target.
///
/// Drive it with [`update`](Particles::update) once per frame, then
/// [`prepare`](Particles::prepare) and [`draw`](Particles::draw) inside the
/// frame's render pass. Live tuning goes through
/// [`settings_mut`](Particles::settings_mut) and the `change_*` methods.
pub struct Particles {
    settings: ParticleSettings,
    // Fixed at construction; the copy in settings is just a record.
    texture_size: u32,
    target_position: Vec3,
    min_color: Color,
    max_color: Color,
    seed: f32,
    seed2: f32,
    active: usize,
    velocity: StatePair,
    position: StatePair,
    sim_uniform_buffer: wgpu::Buffer,
    render_uniform_buffer: wgpu::Buffer,
    velocity_pipeline: wgpu::RenderPipeline,
    position_pipeline: wgpu::RenderPipeline,
    points_pipeline: wgpu::RenderPipeline,
    // Indexed by the active slot at encode time.
    velocity_bind_groups: [wgpu::BindGroup; 2],
    position_bind_groups: [wgpu::BindGroup; 2],
    points_bind_groups: [wgpu::BindGroup; 2],
}

impl Particles {
    /// Builds the state textures, pipelines, and seed state for a new swarm.
    ///
    /// `surface_format` is the format of the render target the points will
    /// be drawn into. The state textures are seeded with deterministic
    /// per-lane hash values before this returns.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        settings: ParticleSettings,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let limit = device.limits().max_texture_dimension_2d;
        if settings.texture_size > limit {
            return Err(ConfigError::TextureSizeTooLarge {
                size: settings.texture_size,
                limit,
            });
        }
        let min_color = Color::parse(&settings.min_color)?;
        let max_color = Color::parse(&settings.max_color)?;

        let texture_size = settings.texture_size;
        log::info!(
            "creating particle simulation: texture_size={}, particles={}",
            texture_size,
            texture_size * texture_size
        );

        let velocity = StatePair::new(device, texture_size, "Velocity State Texture");
        let position = StatePair::new(device, texture_size, "Position State Texture");

        let sim_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Simulation Uniform Buffer"),
            size: std::mem::size_of::<SimUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let render_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Render Uniform Buffer"),
            size: std::mem::size_of::<RenderUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // The seed pass reads texture_size from the simulation uniforms, so
        // they must be valid before the first submit.
        let initial_uniforms = SimUniforms {
            target_position: settings.target_position.to_array(),
            gravity_factor: settings.gravity_factor,
            max_velocity: settings.max_velocity,
            seed: 0.0,
            seed2: 0.5,
            randomness: settings.randomness as u32,
            texture_size: texture_size as f32,
            _padding: [0.0; 3],
        };
        queue.write_buffer(
            &sim_uniform_buffer,
            0,
            bytemuck::bytes_of(&initial_uniforms),
        );

        let uniform_layout_entry = |binding, visibility| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        // Rgba32Float is not filterable without an extra device feature, and
        // the passes only ever use textureLoad.
        let texture_layout_entry = |binding, visibility| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: false },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let seed_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Seed Bind Group Layout"),
            entries: &[uniform_layout_entry(0, wgpu::ShaderStages::FRAGMENT)],
        });
        let velocity_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Velocity Bind Group Layout"),
            entries: &[
                uniform_layout_entry(0, wgpu::ShaderStages::FRAGMENT),
                texture_layout_entry(1, wgpu::ShaderStages::FRAGMENT),
                texture_layout_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let position_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Position Bind Group Layout"),
            entries: &[
                texture_layout_entry(0, wgpu::ShaderStages::FRAGMENT),
                texture_layout_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let points_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Points Bind Group Layout"),
            entries: &[
                uniform_layout_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                texture_layout_entry(1, wgpu::ShaderStages::VERTEX),
            ],
        });

        let seed_pipeline = state_pass_pipeline(
            device,
            &seed_layout,
            shaders::SEED_SHADER,
            "Seed",
        );
        let velocity_pipeline = state_pass_pipeline(
            device,
            &velocity_layout,
            shaders::VELOCITY_SHADER,
            "Velocity",
        );
        let position_pipeline = state_pass_pipeline(
            device,
            &position_layout,
            shaders::POSITION_SHADER,
            "Position",
        );

        let points_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Points Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::POINTS_SHADER.into()),
        });
        let points_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Points Pipeline Layout"),
                bind_group_layouts: &[&points_layout],
                push_constant_ranges: &[],
            });
        let blend = match settings.blend_mode {
            BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
            BlendMode::Additive => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            },
        };
        // No depth state: particles never write depth, and draw order is
        // irrelevant under both blend modes.
        let points_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Points Pipeline"),
            layout: Some(&points_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &points_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &points_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let velocity_bind_groups = std::array::from_fn(|slot| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Velocity Bind Group"),
                layout: &velocity_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: sim_uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&velocity.views[slot]),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&position.views[slot]),
                    },
                ],
            })
        });
        // The position pass for active slot `a` reads the velocity just
        // written into slot 1 - a alongside the still-active position.
        let position_bind_groups = std::array::from_fn(|slot| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Position Bind Group"),
                layout: &position_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&velocity.views[1 - slot]),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&position.views[slot]),
                    },
                ],
            })
        });
        let points_bind_groups = std::array::from_fn(|slot| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Points Bind Group"),
                layout: &points_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: render_uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&position.views[slot]),
                    },
                ],
            })
        });

        // Seed slot 0 of both pairs with the deterministic hash field. Slot 1
        // is first written by the initial update.
        let seed_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Seed Bind Group"),
            layout: &seed_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: sim_uniform_buffer.as_entire_binding(),
            }],
        });
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Seed Encoder"),
        });
        for view in [&velocity.views[0], &position.views[0]] {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Seed Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&seed_pipeline);
            pass.set_bind_group(0, &seed_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
        queue.submit(std::iter::once(encoder.finish()));

        let target_position = settings.target_position;
        Ok(Self {
            settings,
            texture_size,
            target_position,
            min_color,
            max_color,
            seed: 0.0,
            seed2: 0.5,
            active: 0,
            velocity,
            position,
            sim_uniform_buffer,
            render_uniform_buffer,
            velocity_pipeline,
            position_pipeline,
            points_pipeline,
            velocity_bind_groups,
            position_bind_groups,
            points_bind_groups,
        })
    }

    /// Advances the simulation by one frame.
    ///
    /// Uploads the current tunables (and fresh jitter seeds when randomness
    /// is on), runs the velocity pass into the inactive velocity slot, the
    /// position pass into the inactive position slot, then flips the active
    /// index so [`draw`](Particles::draw) samples the new state.
    pub fn update(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if self.settings.randomness {
            let mut rng = rand::thread_rng();
            self.seed = rng.gen_range(-0.1..0.1);
            self.seed2 = rng.gen_range(-0.1..0.1);
        }
        let uniforms = SimUniforms {
            target_position: self.target_position.to_array(),
            gravity_factor: self.settings.gravity_factor,
            max_velocity: self.settings.max_velocity,
            seed: self.seed,
            seed2: self.seed2,
            randomness: self.settings.randomness as u32,
            texture_size: self.texture_size as f32,
            _padding: [0.0; 3],
        };
        queue.write_buffer(&self.sim_uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let inactive = 1 - self.active;
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Particle Update Encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Velocity Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.velocity.views[inactive],
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.velocity_pipeline);
            pass.set_bind_group(0, &self.velocity_bind_groups[self.active], &[]);
            pass.draw(0..3, 0..1);
        }
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Position Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.position.views[inactive],
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.position_pipeline);
            pass.set_bind_group(0, &self.position_bind_groups[self.active], &[]);
            pass.draw(0..3, 0..1);
        }
        queue.submit(std::iter::once(encoder.finish()));
        self.active = inactive;
    }

    /// Uploads the per-frame render uniforms.
    ///
    /// Call between [`update`](Particles::update) and the render pass that
    /// calls [`draw`](Particles::draw). `resolution` is the framebuffer size
    /// in pixels, used to give points a fixed on-screen size.
    pub fn prepare(&self, queue: &wgpu::Queue, view_proj: Mat4, resolution: [f32; 2]) {
        let uniforms = RenderUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            target_position: self.target_position.to_array(),
            point_size: self.settings.point_size,
            min_color: self.min_color.to_array(),
            texture_size: self.texture_size,
            max_color: self.max_color.to_array(),
            _pad0: 0.0,
            resolution,
            _pad1: [0.0; 2],
        };
        queue.write_buffer(
            &self.render_uniform_buffer,
            0,
            bytemuck::bytes_of(&uniforms),
        );
    }

    /// Draws one point per lane into the given render pass.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.points_pipeline);
        render_pass.set_bind_group(0, &self.points_bind_groups[self.active], &[]);
        render_pass.draw(0..6, 0..self.particle_count());
    }

    /// Moves the shared attraction target.
    ///
    /// The z component is forced to 0 so the target stays on the simulation
    /// plane. NaN components are rejected here rather than letting them
    /// poison every lane in the next velocity pass.
    pub fn change_target_position(&mut self, position: Vec3) {
        if position.x.is_nan() || position.y.is_nan() {
            log::warn!("ignoring NaN target position");
            return;
        }
        self.target_position = Vec3::new(position.x, position.y, 0.0);
    }

    /// Replaces the near-target gradient endpoint.
    pub fn change_min_color(&mut self, color: &str) -> Result<(), ConfigError> {
        self.min_color = Color::parse(color)?;
        self.settings.min_color = color.to_string();
        Ok(())
    }

    /// Replaces the far-from-target gradient endpoint.
    pub fn change_max_color(&mut self, color: &str) -> Result<(), ConfigError> {
        self.max_color = Color::parse(color)?;
        self.settings.max_color = color.to_string();
        Ok(())
    }

    /// Current settings.
    pub fn settings(&self) -> &ParticleSettings {
        &self.settings
    }

    /// Mutable settings for live tuning.
    ///
    /// `gravity_factor`, `max_velocity`, `point_size`, and `randomness` take
    /// effect on the next frame. `texture_size` and `blend_mode` are fixed
    /// at construction; editing them here changes nothing.
    pub fn settings_mut(&mut self) -> &mut ParticleSettings {
        &mut self.settings
    }

    /// Side length of the state textures.
    pub fn texture_size(&self) -> u32 {
        self.texture_size
    }

    /// Number of simulated particles.
    pub fn particle_count(&self) -> u32 {
        self.texture_size * self.texture_size
    }

    /// Current attraction target.
    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    /// Parsed near-target gradient endpoint.
    pub fn min_color(&self) -> Color {
        self.min_color
    }

    /// Parsed far-from-target gradient endpoint.
    pub fn max_color(&self) -> Color {
        self.max_color
    }

    /// Overwrites every lane's position in the slot the next update reads.
    ///
    /// # Panics
    /// Panics if `positions.len()` differs from the particle count.
    pub fn write_positions(&self, queue: &wgpu::Queue, positions: &[Vec3]) {
        self.write_state(queue, &self.position.textures[self.active], positions);
    }

    /// Overwrites every lane's velocity in the slot the next update reads.
    ///
    /// # Panics
    /// Panics if `velocities.len()` differs from the particle count.
    pub fn write_velocities(&self, queue: &wgpu::Queue, velocities: &[Vec3]) {
        self.write_state(queue, &self.velocity.textures[self.active], velocities);
    }

    /// Reads back the most recently written position of every lane.
    ///
    /// Blocks until the GPU finishes. Lanes are returned row by row, the
    /// same order instances are drawn in.
    pub fn read_positions(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<Vec<Vec3>, GpuError> {
        self.read_state(device, queue, &self.position.textures[self.active])
    }

    /// Reads back the most recently written velocity of every lane.
    pub fn read_velocities(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<Vec<Vec3>, GpuError> {
        self.read_state(device, queue, &self.velocity.textures[self.active])
    }

    fn write_state(&self, queue: &wgpu::Queue, texture: &wgpu::Texture, values: &[Vec3]) {
        let count = self.particle_count() as usize;
        assert_eq!(
            values.len(),
            count,
            "state write needs one value per lane ({} lanes, got {})",
            count,
            values.len()
        );
        let mut data = Vec::with_capacity(count * 4);
        for value in values {
            data.extend_from_slice(&[value.x, value.y, value.z, 1.0]);
        }
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&data),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.texture_size * STATE_TEXEL_BYTES),
                rows_per_image: Some(self.texture_size),
            },
            wgpu::Extent3d {
                width: self.texture_size,
                height: self.texture_size,
                depth_or_array_layers: 1,
            },
        );
    }

    fn read_state(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &wgpu::Texture,
    ) -> Result<Vec<Vec3>, GpuError> {
        let size = self.texture_size;
        let unpadded_bytes_per_row = size * STATE_TEXEL_BYTES;
        let padded_bytes_per_row =
            unpadded_bytes_per_row.next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("State Readback Buffer"),
            size: (padded_bytes_per_row * size) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("State Readback Encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(size),
                },
            },
            wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .map_err(|e| GpuError::BufferMapping(e.to_string()))?;
        receiver
            .recv()
            .map_err(|_| GpuError::BufferMapping("map callback never ran".to_string()))?
            .map_err(|e| GpuError::BufferMapping(e.to_string()))?;

        let data = slice.get_mapped_range();
        let mut out = Vec::with_capacity((size * size) as usize);
        for row in 0..size {
            let start = (row * padded_bytes_per_row) as usize;
            let row_bytes = &data[start..start + unpadded_bytes_per_row as usize];
            for texel in bytemuck::cast_slice::<u8, [f32; 4]>(row_bytes) {
                out.push(Vec3::new(texel[0], texel[1], texel[2]));
            }
        }
        drop(data);
        staging.unmap();
        Ok(out)
    }
}

/// Builds a fullscreen-triangle pipeline targeting a state texture.
fn state_pass_pipeline(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    source: &str,
    name: &str,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{} Shader", name)),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} Pipeline Layout", name)),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", name)),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: STATE_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
