//! Core rendering functionality
//!
//! Handles render pipelines, shaders and frame rendering.

pub mod pipeline_manager;
pub mod render_engine;

pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
