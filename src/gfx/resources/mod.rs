//! GPU resource management
//!
//! Materials, shared bind groups and render textures.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUniform};
pub use material::{Color, Material};
pub use texture_resource::TextureResource;
