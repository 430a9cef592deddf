//! # Gravity Well Attractor
//!
//! A quarter-million particles swarming around a gravity target you drag
//! with the mouse.
//!
//! ## What This Demonstrates
//!
//! - `ParticleSettings` builder - texture size, gravity, gradient colors
//! - Pointer-driven target movement on the simulation plane
//! - The egui settings panel (Space toggles it)
//!
//! ## Try This
//!
//! - Crank `gravity_factor` up in the panel and watch the swarm tighten
//! - Drop `max_velocity` near zero to freeze the swarm mid-flight
//! - Turn randomness off for perfectly smooth orbits
//!
//! Run with: `cargo run --example attractor --features egui`

use gravwell::{ParticleSettings, Viewer};

fn main() {
    env_logger::init();

    let mut settings = ParticleSettings::default()
        .with_texture_size(512)
        .with_gravity_factor(1.0)
        .with_point_size(1.2)
        .with_min_color("#ffae23")
        .with_max_color("#bf0f23");
    settings.explode_rate = 0.001;

    if let Err(e) = Viewer::new(settings).with_title("gravwell - attractor").run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
