//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading an external model file.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to load OBJ file '{path}': {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("OBJ file '{path}' contains no geometry")]
    Empty { path: PathBuf },
}

/// Failure while creating or driving the render surface.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create render surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable graphics adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Top-level application failure.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
