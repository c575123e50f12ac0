//! WGPU utility functions and helpers
//!
//! Thin wrappers for uniform buffers and bind group layout entries.

pub mod binding_types;
pub mod uniform_buffer;

pub use binding_types::*;
pub use uniform_buffer::UniformBuffer;
