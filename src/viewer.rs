//! Interactive window runner.
//!
//! [`Viewer`] opens a window, builds the GPU state, and drives the frame
//! loop. Holding the primary mouse button drags the attraction target
//! across the simulation plane; with the `egui` feature enabled, Space
//! toggles the settings panel.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::ParticleSettings;
use crate::error::SimulationError;
use crate::gpu::GpuState;

/// Builder for the interactive viewer. This blocks until the window is
/// closed.
pub struct Viewer {
    settings: ParticleSettings,
    title: String,
}

impl Viewer {
    pub fn new(settings: ParticleSettings) -> Self {
        Self {
            settings,
            title: String::from("gravwell"),
        }
    }

    /// Sets the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Opens the window and runs until it is closed.
    ///
    /// Settings are validated before any window appears, so a bad
    /// configuration fails here rather than after GPU setup.
    pub fn run(self) -> Result<(), SimulationError> {
        self.settings.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.settings, self.title);
        event_loop.run_app(&mut app)?;

        match app.init_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    settings: Option<ParticleSettings>,
    title: String,
    pointer_held: bool,
    cursor_position: Option<(f64, f64)>,
    init_error: Option<SimulationError>,
}

impl App {
    fn new(settings: ParticleSettings, title: String) -> Self {
        Self {
            window: None,
            gpu_state: None,
            settings: Some(settings),
            title,
            pointer_held: false,
            cursor_position: None,
            init_error: None,
        }
    }

    /// Maps the stored cursor position onto the simulation plane and moves
    /// the target there.
    fn drag_target(&mut self) {
        let (Some(gpu_state), Some((x, y))) = (&mut self.gpu_state, self.cursor_position) else {
            return;
        };
        if let Some(target) = gpu_state.camera.screen_to_world(
            x as f32,
            y as f32,
            gpu_state.config.width,
            gpu_state.config.height,
        ) {
            gpu_state.particles.change_target_position(target);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window_attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.init_error = Some(SimulationError::Window(e));
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let Some(settings) = self.settings.take() else {
            return;
        };
        match pollster::block_on(GpuState::new(window, settings)) {
            Ok(gpu_state) => {
                log::info!("viewer window created");
                self.gpu_state = Some(gpu_state);
            }
            Err(e) => {
                log::error!("GPU initialization failed: {}", e);
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        let egui_consumed = match (&self.window, &mut self.gpu_state) {
            (Some(window), Some(gpu_state)) => gpu_state.egui.on_window_event(window, &event),
            _ => false,
        };
        #[cfg(not(feature = "egui"))]
        let egui_consumed = false;

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && event.physical_key == PhysicalKey::Code(KeyCode::Space)
                    && !egui_consumed
                {
                    #[cfg(feature = "egui")]
                    if let Some(gpu_state) = &mut self.gpu_state {
                        gpu_state.show_panel = !gpu_state.show_panel;
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    if state == ElementState::Pressed && !egui_consumed {
                        self.pointer_held = true;
                        // The press itself retargets, matching a click
                        // without any drag.
                        self.drag_target();
                    } else if state == ElementState::Released {
                        self.pointer_held = false;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = Some((position.x, position.y));
                if self.pointer_held && !egui_consumed {
                    self.drag_target();
                }
            }
            WindowEvent::RedrawRequested => {
                if let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) {
                    match gpu_state.render(window) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            let size = winit::dpi::PhysicalSize {
                                width: gpu_state.config.width,
                                height: gpu_state.config.height,
                            };
                            gpu_state.resize(size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("surface out of memory, exiting");
                            event_loop.exit();
                        }
                        Err(e) => log::error!("render error: {:?}", e),
                    }
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
