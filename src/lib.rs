//! hoverscene
//!
//! A small 3D scene viewer built on wgpu and winit: an orbit camera with
//! damping, shadowed lighting, and pointer-ray hover highlighting of a
//! designated object.

pub mod app;
pub mod assets;
pub mod config;
pub mod error;
pub mod frame;
pub mod gfx;
pub mod interaction;
pub mod setup;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::HoverApp;
pub use config::{SceneConfig, SceneVariant};
pub use error::{AppError, ModelLoadError, RenderError};
