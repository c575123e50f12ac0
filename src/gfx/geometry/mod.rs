//! # Procedural Geometry Generation
//!
//! Generates the primitive shapes the demo scenes are built from, so the
//! cube variant needs no external model files.
//!
//! ## Supported Primitives
//!
//! - **Box**: axis-aligned box centered at the origin
//! - **Plane**: flat plane in the XY plane facing +Z, with subdivisions
//!
//! ## Usage
//!
//! ```rust
//! use hoverscene::gfx::geometry::{generate_box, generate_plane};
//!
//! let cube = generate_box(2.0, 2.0, 2.0);
//! let floor = generate_plane(15.0, 15.0, 1, 1);
//! assert_eq!(cube.triangle_count(), 12);
//! assert_eq!(floor.triangle_count(), 2);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions and normals into the renderer's vertex format.
    pub fn to_scene_format(&self) -> (Vec<Vertex3D>, Vec<u32>) {
        let vertices = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }
}
