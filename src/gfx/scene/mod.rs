//! # Scene Management Module
//!
//! The scene graph host: background color, lights, and a flat list of named
//! objects. The application only appends objects; traversal for drawing and
//! picking is a linear scan over [`Scene::objects`].
//!
//! ## Key Components
//!
//! - [`Scene`] - Container for lights and objects
//! - [`Object`] - Named node with meshes, transform, material and shadow flags
//! - [`Vertex3D`] - Vertex layout shared with the shaders

pub mod light;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use light::{AmbientLight, DirectionalLight};
pub use object::{DrawObject, Mesh, Object, Transform};
pub use scene::Scene;
pub use vertex::Vertex3D;
