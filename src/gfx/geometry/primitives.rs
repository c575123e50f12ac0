//! # Primitive Shape Generation
//!
//! All shapes are generated with outward normals and counter-clockwise
//! winding when viewed from the outside.

use super::GeometryData;

/// Generate a box centered at the origin with the given extents.
///
/// Each face has its own four vertices so normals stay flat.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);

    #[rustfmt::skip]
    let positions = [
        // Front face
        [-x, -y,  z], [ x, -y,  z], [ x,  y,  z], [-x,  y,  z],
        // Back face
        [-x, -y, -z], [-x,  y, -z], [ x,  y, -z], [ x, -y, -z],
        // Left face
        [-x, -y, -z], [-x, -y,  z], [-x,  y,  z], [-x,  y, -z],
        // Right face
        [ x, -y,  z], [ x, -y, -z], [ x,  y, -z], [ x,  y,  z],
        // Top face
        [-x,  y,  z], [ x,  y,  z], [ x,  y, -z], [-x,  y, -z],
        // Bottom face
        [-x, -y, -z], [ x, -y, -z], [ x, -y,  z], [-x, -y,  z],
    ];

    let face_normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    let mut data = GeometryData::new();
    data.vertices = positions.to_vec();
    data.normals = face_normals
        .iter()
        .flat_map(|normal| std::iter::repeat(*normal).take(4))
        .collect();
    data.indices = (0..6u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect();

    data
}

/// Generate a plane in the XY plane facing +Z
///
/// # Arguments
/// * `width` - Width of the plane (X direction)
/// * `height` - Height of the plane (Y direction)
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
///
/// Rotate by -90° about X to lay it flat as a floor.
pub fn generate_plane(
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let pos_y = (y as f32 / h_segs as f32 - 0.5) * height;

        for x in 0..=w_segs {
            let pos_x = (x as f32 / w_segs as f32 - 0.5) * width;

            data.vertices.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
        }
    }

    // Counter-clockwise when viewed from +Z
    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, i + 1, next_row]);
            data.indices.extend_from_slice(&[i + 1, next_row + 1, next_row]);
        }
    }

    data
}
