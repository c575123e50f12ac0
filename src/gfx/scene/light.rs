use cgmath::{InnerSpace, Matrix4, Point3, Vector3};

use crate::gfx::resources::material::Color;

/// Uniform light applied to every surface regardless of orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 0.5,
        }
    }
}

/// Parallel light shining from `position` towards `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub cast_shadow: bool,
    /// Half extent of the orthographic shadow frustum.
    pub shadow_extent: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            position: Vector3::new(5.0, 10.0, 5.0),
            target: Vector3::new(0.0, 0.0, 0.0),
            cast_shadow: true,
            shadow_extent: 12.0,
        }
    }
}

impl DirectionalLight {
    /// Unit vector pointing from the surface towards the light.
    pub fn direction_to_light(&self) -> Vector3<f32> {
        (self.position - self.target).normalize()
    }

    /// View-projection used for the shadow depth pass (OpenGL clip space).
    pub fn view_projection(&self) -> Matrix4<f32> {
        let up = if self.direction_to_light().y.abs() > 0.99 {
            Vector3::unit_z()
        } else {
            Vector3::unit_y()
        };
        let view = Matrix4::look_at_rh(
            Point3::new(self.position.x, self.position.y, self.position.z),
            Point3::new(self.target.x, self.target.y, self.target.z),
            up,
        );
        let depth = (self.position - self.target).magnitude();
        let e = self.shadow_extent;
        let proj = cgmath::ortho(-e, e, -e, e, 0.1, depth + e * 2.0);
        proj * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn test_direction_points_at_light() {
        let light = DirectionalLight::default();
        let dir = light.direction_to_light();
        assert!((dir.magnitude() - 1.0).abs() < 1e-5);
        assert!(dir.y > 0.0);
    }

    #[test]
    fn test_target_projects_inside_shadow_frustum() {
        let light = DirectionalLight::default();
        let clip = light.view_projection() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }
}
