//! Color parsing and gradient helpers.
//!
//! Gradient endpoints are accepted as CSS-like strings (`#rgb`, `#rrggbb`,
//! `rgb(r, g, b)`, or a handful of names) and stored as linear RGB floats
//! ready for upload into the render uniforms.

use crate::error::ConfigError;

/// An RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
}

impl Color {
    /// White (`#ffffff`).
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    /// Black (`#000000`).
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    /// Creates a color from components in `[0, 1]`.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from 8-bit components.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parses a color string.
    ///
    /// Accepted forms:
    /// - `#rgb` (shorthand hex, each nibble doubled)
    /// - `#rrggbb`
    /// - `rgb(r, g, b)` with components in 0..=255
    /// - the names `white`, `black`, `red`, `green`, `blue`
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let s = value.trim();
        let invalid = || ConfigError::InvalidColor(value.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            return match hex.len() {
                3 => {
                    let mut channels = [0u8; 3];
                    for (slot, c) in channels.iter_mut().zip(hex.chars()) {
                        let nibble = c.to_digit(16).ok_or_else(invalid)? as u8;
                        *slot = nibble << 4 | nibble;
                    }
                    Ok(Self::from_rgb8(channels[0], channels[1], channels[2]))
                }
                6 => {
                    let mut channels = [0u8; 3];
                    for (slot, pair) in channels.iter_mut().zip(hex.as_bytes().chunks(2)) {
                        let pair = std::str::from_utf8(pair).map_err(|_| invalid())?;
                        *slot = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
                    }
                    Ok(Self::from_rgb8(channels[0], channels[1], channels[2]))
                }
                _ => Err(invalid()),
            };
        }

        if let Some(body) = s
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let mut channels = [0u8; 3];
            let mut parts = body.split(',');
            for slot in channels.iter_mut() {
                let part = parts.next().ok_or_else(invalid)?;
                *slot = part.trim().parse::<u8>().map_err(|_| invalid())?;
            }
            if parts.next().is_some() {
                return Err(invalid());
            }
            return Ok(Self::from_rgb8(channels[0], channels[1], channels[2]));
        }

        match s.to_ascii_lowercase().as_str() {
            "white" => Ok(Self::WHITE),
            "black" => Ok(Self::BLACK),
            "red" => Ok(Self::new(1.0, 0.0, 0.0)),
            "green" => Ok(Self::new(0.0, 1.0, 0.0)),
            "blue" => Ok(Self::new(0.0, 0.0, 1.0)),
            _ => Err(invalid()),
        }
    }

    /// Formats the color as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            quantize(self.r),
            quantize(self.g),
            quantize(self.b)
        )
    }

    /// Returns the components as an array for uniform upload.
    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Evaluates the particle gradient at distance factor `t`.
///
/// Matches the shading in the point shader: each channel blends from the
/// smaller of the two endpoint values toward the larger one, so the result
/// stays channel-wise between the endpoints for `t` in `[0, 1]` regardless
/// of which endpoint is brighter.
pub fn gradient(min_color: Color, max_color: Color, t: f32) -> Color {
    let blend = |a: f32, b: f32| {
        let lo = a.min(b);
        let hi = a.max(b);
        lo + (hi - lo) * t
    };
    Color::new(
        blend(min_color.r, max_color.r),
        blend(min_color.g, max_color.g),
        blend(min_color.b, max_color.b),
    )
}
