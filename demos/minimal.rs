//! # Minimal Viewer
//!
//! Default settings, no feature flags. Drag with the left mouse button to
//! move the gravity target.
//!
//! Run with: `cargo run --example minimal`

use gravwell::{ParticleSettings, Viewer};

fn main() {
    env_logger::init();

    if let Err(e) = Viewer::new(ParticleSettings::default()).run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
