//! WGSL sources and the uniform block layouts they expect.
//!
//! The Rust structs here mirror the WGSL uniform structs field for field,
//! padding included; the layout tests below pin the byte sizes so a drifting
//! field ordering fails loudly instead of scrambling the simulation.

use bytemuck::{Pod, Zeroable};

pub const SEED_SHADER: &str = include_str!("shaders/seed.wgsl");
pub const VELOCITY_SHADER: &str = include_str!("shaders/velocity.wgsl");
pub const POSITION_SHADER: &str = include_str!("shaders/position.wgsl");
pub const POINTS_SHADER: &str = include_str!("shaders/points.wgsl");
pub const STARS_SHADER: &str = include_str!("shaders/stars.wgsl");

/// Uniform block shared by the seed and velocity passes.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct SimUniforms {
    pub target_position: [f32; 3],
    pub gravity_factor: f32,
    pub max_velocity: f32,
    pub seed: f32,
    pub seed2: f32,
    pub randomness: u32,
    pub texture_size: f32,
    pub _padding: [f32; 3],
}

/// Uniform block for the particle point renderer.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct RenderUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub target_position: [f32; 3],
    pub point_size: f32,
    pub min_color: [f32; 3],
    pub texture_size: u32,
    pub max_color: [f32; 3],
    pub _pad0: f32,
    pub resolution: [f32; 2],
    pub _pad1: [f32; 2],
}

/// Uniform block for a background star layer.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct StarUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub point_size: f32,
    pub resolution: [f32; 2],
    pub _pad: [f32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    /// CPU mirror of the per-texel hash in `seed.wgsl` and `velocity.wgsl`.
    ///
    /// Uses GLSL `fract` semantics (`x - floor(x)`, always in `[0, 1)`)
    /// rather than `f32::fract`, which is negative for negative inputs.
    fn texel_hash(co: [f32; 2]) -> f32 {
        let dot = co[0] * 12.9898 + co[1] * 78.233;
        let value = dot.sin() * 43758.5453;
        value - value.floor()
    }

    /// Normalized coordinate of a lane, matching the fragment positions the
    /// state passes see (pixel centers at half-texel offsets).
    fn lane_uv(x: u32, y: u32, texture_size: u32) -> [f32; 2] {
        [
            (x as f32 + 0.5) / texture_size as f32,
            (y as f32 + 0.5) / texture_size as f32,
        ]
    }

    #[test]
    fn uniform_blocks_match_wgsl_sizes() {
        assert_eq!(std::mem::size_of::<SimUniforms>(), 48);
        assert_eq!(std::mem::size_of::<RenderUniforms>(), 128);
        assert_eq!(std::mem::size_of::<StarUniforms>(), 96);
    }

    #[test]
    fn hash_is_deterministic() {
        for y in 0..8 {
            for x in 0..8 {
                let uv = lane_uv(x, y, 8);
                assert_eq!(texel_hash(uv), texel_hash(uv));
            }
        }
    }

    #[test]
    fn hash_stays_in_unit_range() {
        for y in 0..32 {
            for x in 0..32 {
                let uv = lane_uv(x, y, 32);
                let h = texel_hash(uv);
                assert!((0.0..1.0).contains(&h), "hash({:?}) = {}", uv, h);
                // GLSL fract semantics: non-negative even when the sine
                // product is negative (f32::fract would not be).
                let h = texel_hash([-uv[0], -uv[1]]);
                assert!((0.0..1.0).contains(&h));
            }
        }
    }

    #[test]
    fn channel_offsets_decorrelate() {
        // The three seed channels hash the same lane with different
        // coordinate offsets; they should not collapse to one value.
        let uv = lane_uv(3, 5, 16);
        let x = texel_hash(uv);
        let y = texel_hash([uv[0] + 1.0, uv[1]]);
        let z = texel_hash([uv[0], uv[1] + 2.0]);
        assert_ne!(x, y);
        assert_ne!(y, z);
        assert_ne!(x, z);
    }
}
