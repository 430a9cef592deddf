//! # Gravwell
//!
//! GPU particle swarm attracted to a movable gravity target.
//!
//! Gravwell keeps every particle's state in float textures and advances it
//! entirely on the GPU with fragment passes, so particle counts in the
//! hundreds of thousands stay cheap. The host only moves the attraction
//! target and tweaks settings.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gravwell::{ParticleSettings, Viewer};
//!
//! fn main() {
//!     let settings = ParticleSettings::default()
//!         .with_texture_size(512)
//!         .with_gravity_factor(1.0)
//!         .with_min_color("#ffae23")
//!         .with_max_color("#bf0f23");
//!
//!     if let Err(e) = Viewer::new(settings).run() {
//!         eprintln!("{e}");
//!     }
//! }
//! ```
//!
//! ## How It Works
//!
//! Particle state lives in two double-buffered `Rgba32Float` textures, one
//! for velocity and one for position. Each texel is one particle. Every
//! frame runs two fullscreen fragment passes:
//!
//! 1. **Velocity pass** - pulls each particle toward the target, applies
//!    optional jitter, and clamps to the speed limit.
//! 2. **Position pass** - adds the fresh velocity to the previous position.
//!
//! Each pass reads the previous frame's textures and writes the other half
//! of the double buffer, then the buffers swap. Rendering draws one small
//! camera-facing quad per texel and colors it by distance from the target
//! using a two-stop gradient.
//!
//! ## Interaction
//!
//! In the [`Viewer`], holding the left mouse button drags the target across
//! the z = 0 plane under the cursor. With the `egui` feature enabled, a
//! settings panel exposes gravity, speed limit, randomness, and the
//! gradient colors at runtime; Space toggles it.
//!
//! ## Embedding
//!
//! [`Particles`] can also be driven from an existing wgpu setup: call
//! [`Particles::update`] once per frame, [`Particles::prepare`] with your
//! camera, and [`Particles::draw`] inside your render pass.
//! [`Particles::read_positions`] and [`Particles::write_positions`] move
//! state between CPU and GPU for tests and tooling.

mod color;
mod config;
mod error;
mod gpu;
mod particles;
mod shaders;
mod viewer;

pub use color::{gradient, Color};
pub use config::{BlendMode, ParticleSettings};
pub use error::{ConfigError, GpuError, SimulationError};
pub use glam::{Vec2, Vec3, Vec4};
pub use gpu::{Camera, GpuState, StarField};
pub use particles::Particles;
pub use viewer::Viewer;

#[cfg(feature = "egui")]
pub use gpu::{EguiFrameOutput, EguiIntegration};

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use gravwell::prelude::*;
/// ```
///
/// This imports:
/// - [`Viewer`] - the windowed runner
/// - [`ParticleSettings`] - simulation configuration
/// - [`Particles`] - the GPU simulation, for embedding
/// - [`Color`] - gradient stop colors
/// - [`Vec2`], [`Vec3`], [`Vec4`] - glam vector types
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::config::{BlendMode, ParticleSettings};
    pub use crate::error::SimulationError;
    pub use crate::particles::Particles;
    pub use crate::viewer::Viewer;
    pub use crate::{Vec2, Vec3, Vec4};
    #[cfg(feature = "egui")]
    pub use egui;
}
