//! # Object Picking System
//!
//! Ray casting from the camera through a pointer position into the scene.
//!
//! ## How it works
//!
//! 1. **Pointer to Ray**: Unproject the pointer's normalized device coordinates
//!    through the inverse view-projection into a world-space ray starting at
//!    the camera eye
//! 2. **Broad phase**: Test the ray against each object's bounding box
//! 3. **Narrow phase**: Test the ray against every triangle of the object
//! 4. **Ordering**: Return all hits sorted nearest first
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::{Vector3, Zero};
//! use hoverscene::gfx::{camera::OrbitCamera, picking::Raycaster, scene::Scene};
//!
//! let camera = OrbitCamera::looking_at(Vector3::new(10.0, 10.0, 10.0), Vector3::zero(), 1.5);
//! let scene = Scene::default();
//! let raycaster = Raycaster::from_camera((0.0, 0.0), &camera);
//! assert!(raycaster.intersect_objects(&scene).is_empty());
//! ```

use cgmath::{ElementWise, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero};

use crate::gfx::{
    camera::orbit_camera::OrbitCamera,
    scene::{object::Object, Scene},
};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point
    pub origin: Vector3<f32>,
    /// Ray direction (normalized for world-space rays)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray with a normalized direction
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Maps the ray into the space described by `matrix`.
    ///
    /// The direction is not renormalized, so a parameter `t` names the same
    /// point in both spaces.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        let origin = matrix * self.origin.extend(1.0);
        let direction = matrix * self.direction.extend(0.0);
        Self {
            origin: origin.truncate() / origin.w,
            direction: direction.truncate(),
        }
    }

    /// Möller–Trumbore ray/triangle test against the front face only.
    ///
    /// Front faces wind counter-clockwise, as in the lit pipeline, which
    /// culls back faces. Returns the ray parameter of the hit.
    pub fn intersect_triangle(&self, triangle: &[Vector3<f32>; 3]) -> Option<f32> {
        const EPSILON: f32 = 1e-7;
        // Shared edges must not fall between two triangles
        const EDGE_TOLERANCE: f32 = 1e-5;
        let [v0, v1, v2] = *triangle;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        // Parallel to the plane, or seen from behind
        if det < EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - v0;
        let u = s.dot(p) * inv_det;
        if !(-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < -EDGE_TOLERANCE || u + v > 1.0 + EDGE_TOLERANCE {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        (t >= 0.0).then_some(t)
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl AABB {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let Some(first) = vertices.first() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        let start = Vector3::from(*first);
        let (min, max) = vertices.iter().skip(1).fold((start, start), |(min, max), v| {
            (
                Vector3::new(min.x.min(v[0]), min.y.min(v[1]), min.z.min(v[2])),
                Vector3::new(max.x.max(v[0]), max.y.max(v[1]), max.z.max(v[2])),
            )
        });

        Self::new(min, max)
    }

    /// Bounds of all meshes of an object, in object space.
    pub fn from_object(object: &Object) -> Option<Self> {
        let positions: Vec<[f32; 3]> = object
            .meshes
            .iter()
            .flat_map(|mesh| mesh.vertices().iter().map(|v| v.position))
            .collect();

        (!positions.is_empty()).then(|| Self::from_vertices(&positions))
    }

    /// Test ray-AABB intersection (slab method)
    /// Returns the ray parameter of the entry point, or None if no intersection
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Apply a transformation matrix to the AABB
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners: Vec<[f32; 3]> = (0..8)
            .map(|i| {
                let corner = Vector4::new(
                    if i & 1 == 0 { self.min.x } else { self.max.x },
                    if i & 2 == 0 { self.min.y } else { self.max.y },
                    if i & 4 == 0 { self.min.z } else { self.max.z },
                    1.0,
                );
                let transformed = matrix * corner;
                (transformed.truncate() / transformed.w).into()
            })
            .collect();

        Self::from_vertices(&corners)
    }
}

/// One object hit by a ray
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    /// Index of the object in the scene
    pub object_index: usize,
    /// Name of the object at the time of the test
    pub object_name: String,
    /// Distance from the ray origin to the nearest hit on this object
    pub distance: f32,
    /// World space intersection point
    pub point: Vector3<f32>,
}

/// Casts a ray from the camera and collects the objects it passes through
#[derive(Debug, Clone, Copy)]
pub struct Raycaster {
    pub ray: Ray,
}

impl Raycaster {
    pub fn new(ray: Ray) -> Self {
        Self { ray }
    }

    /// Ray from the camera eye through the pointer at `ndc` (each axis in [-1, 1]).
    pub fn from_camera(ndc: (f32, f32), camera: &OrbitCamera) -> Self {
        let inv_view_proj = camera
            .gl_view_projection_matrix()
            .invert()
            .unwrap_or_else(Matrix4::identity);

        let unproject = |z: f32| {
            let world = inv_view_proj * Vector4::new(ndc.0, ndc.1, z, 1.0);
            world.truncate() / world.w
        };
        let near = unproject(-1.0);
        let far = unproject(1.0);

        Self::new(Ray::new(camera.eye, far - near))
    }

    /// Nearest hit of the ray on `object`, if any.
    pub fn intersect_object(&self, object_index: usize, object: &Object) -> Option<Intersection> {
        if !object.visible {
            return None;
        }

        let model = object.model_matrix();
        let inverse = model.invert()?;
        let local_ray = self.ray.transformed(&inverse);

        // Broad phase
        AABB::from_object(object)?.intersect_ray(&local_ray)?;

        // Narrow phase: nearest triangle. World and local rays share the parameter t.
        let t = object
            .meshes
            .iter()
            .flat_map(|mesh| mesh.triangles())
            .filter_map(|triangle| local_ray.intersect_triangle(&triangle))
            .min_by(|a, b| a.total_cmp(b))?;

        let point = (model * local_ray.point_at(t).extend(1.0)).truncate();
        Some(Intersection {
            object_index,
            object_name: object.name.clone(),
            distance: (point - self.ray.origin).magnitude(),
            point,
        })
    }

    /// Tests the ray against every object in the scene; nearest first.
    pub fn intersect_objects(&self, scene: &Scene) -> Vec<Intersection> {
        let mut hits: Vec<Intersection> = scene
            .objects
            .iter()
            .enumerate()
            .filter_map(|(index, object)| self.intersect_object(index, object))
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::{generate_box, generate_plane},
        scene::object::Mesh,
    };

    fn demo_scene() -> Scene {
        let mut scene = Scene::default();
        scene.add_object(
            Object::new(vec![Mesh::from_geometry(&generate_plane(15.0, 15.0, 1, 1))])
                .with_name("floor")
                .with_rotation(-std::f32::consts::FRAC_PI_2, 0.0, 0.0),
        );
        scene.add_object(
            Object::new(vec![Mesh::from_geometry(&generate_box(2.0, 2.0, 2.0))])
                .with_name("box")
                .with_position(0.0, 1.0, 0.0),
        );
        scene
    }

    fn demo_camera() -> OrbitCamera {
        OrbitCamera::looking_at(Vector3::new(10.0, 10.0, 10.0), Vector3::zero(), 1.5)
            .with_perspective(cgmath::Deg(75.0), 0.1, 1000.0)
    }

    #[test]
    fn test_aabb_creation() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let aabb = AABB::from_vertices(&vertices);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = AABB::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(aabb.intersect_ray(&ray), Some(4.0));

        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());
    }

    #[test]
    fn test_aabb_transform_translates_bounds() {
        let aabb = AABB::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        let moved = aabb.transform(&Matrix4::from_translation(Vector3::new(0.0, 1.0, 0.0)));
        assert_eq!(moved.min, Vector3::new(-1.0, 0.0, -1.0));
        assert_eq!(moved.max, Vector3::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn test_ray_triangle_hit_and_miss() {
        let triangle = [
            Vector3::new(-1.0, -1.0, 0.0),
            Vector3::new(1.0, -1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        let front = Ray::new(Vector3::new(0.0, 0.0, 3.0), Vector3::new(0.0, 0.0, -1.0));
        assert!((front.intersect_triangle(&triangle).unwrap() - 3.0).abs() < 1e-6);

        // Back faces are culled when drawn, so they are not hit either
        let back = Ray::new(Vector3::new(0.0, 0.0, -3.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(back.intersect_triangle(&triangle).is_none());

        let away = Ray::new(Vector3::new(0.0, 0.0, 3.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(away.intersect_triangle(&triangle).is_none());

        let beside = Ray::new(Vector3::new(5.0, 0.0, 3.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(beside.intersect_triangle(&triangle).is_none());
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let raycaster = Raycaster::from_camera((0.0, 0.0), &demo_camera());
        let expected = Vector3::new(-1.0, -1.0, -1.0).normalize();
        assert!((raycaster.ray.direction - expected).magnitude() < 1e-4);
        assert_eq!(raycaster.ray.origin, demo_camera().eye);
    }

    #[test]
    fn test_center_ray_hits_box_then_floor() {
        let hits = Raycaster::from_camera((0.0, 0.0), &demo_camera()).intersect_objects(&demo_scene());

        let names: Vec<&str> = hits.iter().map(|hit| hit.object_name.as_str()).collect();
        assert_eq!(names, vec!["box", "floor"]);

        // The diagonal ray enters the box on its vertical edge at (1, 1, 1)
        let box_hit = &hits[0];
        assert!((box_hit.point - Vector3::new(1.0, 1.0, 1.0)).magnitude() < 1e-3);
        assert!((box_hit.distance - 9.0 * 3f32.sqrt()).abs() < 1e-3);
        assert!((hits[1].distance - 300f32.sqrt()).abs() < 1e-3);
        assert!(hits[0].distance < hits[1].distance);
    }

    #[test]
    fn test_corner_ray_misses_box() {
        let scene = demo_scene();
        for corner in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
            let hits = Raycaster::from_camera(corner, &demo_camera()).intersect_objects(&scene);
            assert!(hits.iter().all(|hit| hit.object_name != "box"));
        }
    }

    #[test]
    fn test_eye_inside_box_sees_only_floor() {
        let camera = OrbitCamera::looking_at(Vector3::new(0.3, 1.3, 0.3), Vector3::new(0.0, 1.0, 0.0), 1.5)
            .with_perspective(cgmath::Deg(75.0), 0.1, 1000.0);
        let hits = Raycaster::from_camera((0.0, 0.0), &camera).intersect_objects(&demo_scene());

        let names: Vec<&str> = hits.iter().map(|hit| hit.object_name.as_str()).collect();
        assert_eq!(names, vec!["floor"]);
    }

    #[test]
    fn test_invisible_objects_are_skipped() {
        let mut scene = demo_scene();
        scene.objects[1].visible = false;
        let hits = Raycaster::from_camera((0.0, 0.0), &demo_camera()).intersect_objects(&scene);
        assert!(hits.iter().all(|hit| hit.object_name != "box"));
    }
}
