//! GPU state for the interactive viewer.
//!
//! [`GpuState`] owns the surface, device, and everything drawn each frame:
//! the particle simulation, the background star layers, and (behind the
//! `egui` feature) the settings panel.

mod camera;
#[cfg(feature = "egui")]
mod egui_integration;
mod starfield;

use std::sync::Arc;

use winit::window::Window;

pub use camera::Camera;
#[cfg(feature = "egui")]
pub use egui_integration::{EguiFrameOutput, EguiIntegration};
pub use starfield::StarField;

use crate::config::ParticleSettings;
use crate::error::{GpuError, SimulationError};
use crate::particles::Particles;

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: Camera,
    pub particles: Particles,
    starfield: StarField,
    #[cfg(feature = "egui")]
    pub egui: EguiIntegration,
    /// Whether the settings panel is drawn. Toggled with Space.
    #[cfg(feature = "egui")]
    pub show_panel: bool,
}

impl GpuState {
    pub async fn new(
        window: Arc<Window>,
        settings: ParticleSettings,
    ) -> Result<Self, SimulationError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(GpuError::from)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;
        log::info!("using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(GpuError::from)?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let camera = Camera::new(config.width as f32 / config.height.max(1) as f32);
        let particles = Particles::new(&device, &queue, config.format, settings)?;
        let starfield = StarField::new(&device, config.format);

        #[cfg(feature = "egui")]
        let egui = EguiIntegration::new(&device, config.format, &window);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            camera,
            particles,
            starfield,
            #[cfg(feature = "egui")]
            egui,
            #[cfg(feature = "egui")]
            show_panel: true,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.camera.set_aspect(new_size.width, new_size.height);
            log::debug!("resized surface to {}x{}", new_size.width, new_size.height);
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Advances the simulation one frame and draws it.
    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        #[cfg(not(feature = "egui"))]
        let _ = window;

        self.particles.update(&self.device, &self.queue);

        let resolution = [self.config.width as f32, self.config.height as f32];
        let view_proj = self.camera.view_proj();
        self.particles.prepare(&self.queue, view_proj, resolution);
        self.starfield.prepare(&self.queue, view_proj, resolution);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        #[cfg(feature = "egui")]
        let (egui_output, screen_descriptor) = {
            let egui = &mut self.egui;
            let particles = &mut self.particles;
            let show_panel = self.show_panel;
            let egui_output = egui.run(window, |ctx| {
                if show_panel {
                    settings_panel(ctx, particles);
                }
            });
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.config.width, self.config.height],
                pixels_per_point: egui_output.pixels_per_point,
            };
            egui.prepare(
                &self.device,
                &self.queue,
                &mut encoder,
                &egui_output,
                &screen_descriptor,
            );
            (egui_output, screen_descriptor)
        };

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.starfield.draw(&mut render_pass);
            self.particles.draw(&mut render_pass);

            #[cfg(feature = "egui")]
            {
                let mut render_pass = render_pass.forget_lifetime();
                self.egui.renderer().render(
                    &mut render_pass,
                    &egui_output.paint_jobs,
                    &screen_descriptor,
                );
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        #[cfg(feature = "egui")]
        self.egui.cleanup(&egui_output);

        Ok(())
    }
}

/// The live-tuning panel: sliders for the per-frame parameters, a jitter
/// toggle, and pickers that feed the gradient endpoints back through the
/// color-string interface.
#[cfg(feature = "egui")]
fn settings_panel(ctx: &egui::Context, particles: &mut Particles) {
    use crate::color::Color;

    egui::Window::new("Settings")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!("{} particles", particles.particle_count()));
            ui.separator();

            let settings = particles.settings_mut();
            ui.add(
                egui::Slider::new(&mut settings.gravity_factor, 0.0..=3.0).text("gravity factor"),
            );
            ui.add(egui::Slider::new(&mut settings.max_velocity, 0.0..=1.0).text("max velocity"));
            ui.checkbox(&mut settings.randomness, "randomness");
            ui.separator();

            ui.horizontal(|ui| {
                let mut rgb = particles.min_color().to_array();
                if ui.color_edit_button_rgb(&mut rgb).changed() {
                    let hex = Color::new(rgb[0], rgb[1], rgb[2]).to_hex();
                    if let Err(e) = particles.change_min_color(&hex) {
                        log::warn!("min color rejected: {}", e);
                    }
                }
                ui.label("min color");
            });
            ui.horizontal(|ui| {
                let mut rgb = particles.max_color().to_array();
                if ui.color_edit_button_rgb(&mut rgb).changed() {
                    let hex = Color::new(rgb[0], rgb[1], rgb[2]).to_hex();
                    if let Err(e) = particles.change_max_color(&hex) {
                        log::warn!("max color rejected: {}", e);
                    }
                }
                ui.label("max color");
            });
        });
}
