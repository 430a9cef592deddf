//! Error types for gravwell.
//!
//! This module provides error types for settings validation, GPU
//! initialization, and state readback.

use std::fmt;

/// Errors produced by settings validation at construction time.
///
/// Misconfiguration fails fast with one of these instead of silently
/// substituting a default; a garbled frame is much harder to diagnose
/// than a rejected constructor.
#[derive(Debug)]
pub enum ConfigError {
    /// Texture size must be a positive integer.
    InvalidTextureSize(u32),
    /// Texture size exceeds what the GPU device supports.
    TextureSizeTooLarge {
        /// Requested grid side length.
        size: u32,
        /// Device limit for 2D texture dimensions.
        limit: u32,
    },
    /// A color string could not be parsed.
    InvalidColor(String),
    /// A numeric setting is NaN or infinite.
    NonFinite(&'static str),
    /// A setting that must be >= 0 is negative.
    NegativeParameter(&'static str),
    /// A setting that must be > 0 is zero or negative.
    NonPositiveParameter(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTextureSize(size) => write!(
                f,
                "Texture size must be a positive integer (got {}). The particle count is the square of the texture size.",
                size
            ),
            ConfigError::TextureSizeTooLarge { size, limit } => write!(
                f,
                "Texture size {} exceeds the device's 2D texture limit of {}.",
                size, limit
            ),
            ConfigError::InvalidColor(value) => write!(
                f,
                "Unrecognized color string '{}'. Expected #rgb, #rrggbb, rgb(r, g, b), or a known color name.",
                value
            ),
            ConfigError::NonFinite(field) => {
                write!(f, "Setting '{}' must be a finite number.", field)
            }
            ConfigError::NegativeParameter(field) => {
                write!(f, "Setting '{}' must not be negative.", field)
            }
            ConfigError::NonPositiveParameter(field) => {
                write!(f, "Setting '{}' must be greater than zero.", field)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur during GPU initialization and readback.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// Failed to map buffer for reading.
    BufferMapping(String),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::BufferMapping(msg) => write!(f, "Failed to map GPU buffer: {}", msg),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when constructing or running a simulation.
#[derive(Debug)]
pub enum SimulationError {
    /// Settings validation failed.
    Config(ConfigError),
    /// GPU initialization or readback failed.
    Gpu(GpuError),
    /// Event loop creation or execution failed.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "Invalid settings: {}", e),
            SimulationError::Gpu(e) => write!(f, "GPU error: {}", e),
            SimulationError::EventLoop(e) => write!(f, "Event loop error: {}", e),
            SimulationError::Window(e) => write!(f, "Failed to create window: {}", e),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::Gpu(e) => Some(e),
            SimulationError::EventLoop(e) => Some(e),
            SimulationError::Window(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::Config(e)
    }
}

impl From<GpuError> for SimulationError {
    fn from(e: GpuError) -> Self {
        SimulationError::Gpu(e)
    }
}

impl From<winit::error::EventLoopError> for SimulationError {
    fn from(e: winit::error::EventLoopError) -> Self {
        SimulationError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for SimulationError {
    fn from(e: winit::error::OsError) -> Self {
        SimulationError::Window(e)
    }
}
