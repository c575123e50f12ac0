//! # Graphics Module
//!
//! Camera, picking, geometry, scene graph, GPU resources and the renderer.
//!
//! - **Camera System** ([`camera`]) - Orbit camera with damped controls
//! - **Picking** ([`picking`]) - Pointer rays and ray/object intersection
//! - **Rendering Pipeline** ([`rendering`]) - Lit pass with shadow mapping
//! - **Scene Management** ([`scene`]) - Lights and named objects
//! - **Resource Management** ([`resources`]) - Materials, textures and bind groups

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
