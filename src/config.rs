//! Simulation settings.
//!
//! [`ParticleSettings`] collects everything tunable about a swarm: the state
//! grid size, attraction strength, velocity cap, point styling, and gradient
//! endpoints. Fields are public so a host can mutate the live values between
//! frames; anything that feeds texture allocation or pipeline construction is
//! validated and fixed when the simulation is built.

use glam::Vec3;

use crate::error::ConfigError;

/// How particle fragments are combined with the frame underneath them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard source-over alpha blending.
    #[default]
    Alpha,
    /// Additive blending; overlapping particles brighten toward white.
    Additive,
}

/// Tunable parameters for a particle simulation.
#[derive(Debug, Clone)]
pub struct ParticleSettings {
    /// Side length of the square state textures. The particle count is the
    /// square of this value.
    pub texture_size: u32,
    /// Strength of the pull toward the target position.
    pub gravity_factor: f32,
    /// Reserved; currently has no effect on the simulation.
    pub explode_rate: f32,
    /// Rendered point size in pixels.
    pub point_size: f32,
    /// Initial attraction point.
    pub target_position: Vec3,
    /// Per-axis cap on the x/y velocity components.
    pub max_velocity: f32,
    /// Gradient endpoint for particles near the target, as a color string.
    pub min_color: String,
    /// Gradient endpoint for particles far from the target, as a color string.
    pub max_color: String,
    /// Whether per-frame jitter is applied to velocities.
    pub randomness: bool,
    /// Reserved; currently has no effect on the simulation.
    pub resistance: f32,
    /// Blend mode for the rendered points.
    pub blend_mode: BlendMode,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            texture_size: 256,
            gravity_factor: 10.0,
            explode_rate: 0.0,
            point_size: 1.0,
            target_position: Vec3::ZERO,
            max_velocity: 0.15,
            min_color: String::from("#ffae23"),
            max_color: String::from("#bf0f23"),
            randomness: true,
            resistance: 0.0,
            blend_mode: BlendMode::Alpha,
        }
    }
}

impl ParticleSettings {
    /// Creates settings with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the state texture side length.
    pub fn with_texture_size(mut self, size: u32) -> Self {
        self.texture_size = size;
        self
    }

    /// Sets the attraction strength.
    pub fn with_gravity_factor(mut self, gravity: f32) -> Self {
        self.gravity_factor = gravity;
        self
    }

    /// Sets the rendered point size in pixels.
    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    /// Sets the initial attraction point.
    pub fn with_target_position(mut self, target: Vec3) -> Self {
        self.target_position = target;
        self
    }

    /// Sets the per-axis velocity cap.
    pub fn with_max_velocity(mut self, max: f32) -> Self {
        self.max_velocity = max;
        self
    }

    /// Sets the near-target gradient endpoint.
    pub fn with_min_color(mut self, color: impl Into<String>) -> Self {
        self.min_color = color.into();
        self
    }

    /// Sets the far-from-target gradient endpoint.
    pub fn with_max_color(mut self, color: impl Into<String>) -> Self {
        self.max_color = color.into();
        self
    }

    /// Enables or disables per-frame velocity jitter.
    pub fn with_randomness(mut self, enabled: bool) -> Self {
        self.randomness = enabled;
        self
    }

    /// Sets the point blend mode.
    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }

    /// Number of simulated particles, one per state texel.
    pub fn particle_count(&self) -> u32 {
        self.texture_size * self.texture_size
    }

    /// Checks every field that would otherwise fail deep inside GPU setup
    /// or, worse, silently corrupt the state textures.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.texture_size == 0 {
            return Err(ConfigError::InvalidTextureSize(self.texture_size));
        }
        for (name, value) in [
            ("gravity_factor", self.gravity_factor),
            ("explode_rate", self.explode_rate),
            ("point_size", self.point_size),
            ("max_velocity", self.max_velocity),
            ("resistance", self.resistance),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }
        if !self.target_position.is_finite() {
            return Err(ConfigError::NonFinite("target_position"));
        }
        if self.gravity_factor < 0.0 {
            return Err(ConfigError::NegativeParameter("gravity_factor"));
        }
        if self.max_velocity < 0.0 {
            return Err(ConfigError::NegativeParameter("max_velocity"));
        }
        if self.point_size <= 0.0 {
            return Err(ConfigError::NonPositiveParameter("point_size"));
        }
        crate::color::Color::parse(&self.min_color)?;
        crate::color::Color::parse(&self.max_color)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ParticleSettings::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_texture_size() {
        let settings = ParticleSettings::default().with_texture_size(0);
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidTextureSize(0))
        ));
    }

    #[test]
    fn rejects_non_finite_numbers() {
        let settings = ParticleSettings::default().with_gravity_factor(f32::NAN);
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NonFinite("gravity_factor"))
        ));

        let settings = ParticleSettings::default().with_max_velocity(f32::INFINITY);
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NonFinite("max_velocity"))
        ));
    }

    #[test]
    fn rejects_negative_velocity_cap() {
        let settings = ParticleSettings::default().with_max_velocity(-0.1);
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NegativeParameter("max_velocity"))
        ));
    }

    #[test]
    fn rejects_negative_gravity() {
        let settings = ParticleSettings::default().with_gravity_factor(-1.0);
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NegativeParameter("gravity_factor"))
        ));
    }

    #[test]
    fn rejects_non_positive_point_size() {
        let settings = ParticleSettings::default().with_point_size(0.0);
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NonPositiveParameter("point_size"))
        ));
    }

    #[test]
    fn rejects_bad_color_strings() {
        let settings = ParticleSettings::default().with_min_color("#zzz");
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidColor(_))
        ));
    }

    #[test]
    fn builder_chains() {
        let settings = ParticleSettings::new()
            .with_texture_size(512)
            .with_gravity_factor(1.0)
            .with_point_size(1.2)
            .with_max_velocity(0.15)
            .with_min_color("#ffae23")
            .with_max_color("#bf0f23")
            .with_randomness(true)
            .with_blend_mode(BlendMode::Additive);
        assert_eq!(settings.texture_size, 512);
        assert_eq!(settings.particle_count(), 512 * 512);
        assert_eq!(settings.blend_mode, BlendMode::Additive);
        assert!(settings.validate().is_ok());
    }
}
