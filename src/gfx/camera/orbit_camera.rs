use super::camera_utils::Camera;
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Spherical pose the camera returns to on reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitPose {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub target: Vector3<f32>,
}

/// Perspective camera orbiting a target point, Y up.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    initial: OrbitPose,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.gl_view_projection_matrix()
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Will be auto-calculated in `update()` nevertheless.
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            initial: OrbitPose {
                distance,
                pitch,
                yaw,
                target,
            },
        };
        camera.update();
        camera
    }

    /// Places the camera at `eye` looking at `target`.
    pub fn looking_at(eye: Vector3<f32>, target: Vector3<f32>, aspect: f32) -> Self {
        let offset = eye - target;
        let distance = offset.magnitude().max(f32::EPSILON);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);
        Self::new(distance, pitch, yaw, target, aspect)
    }

    pub fn with_perspective(mut self, fovy: impl Into<Rad<f32>>, znear: f32, zfar: f32) -> Self {
        self.fovy = fovy.into();
        self.znear = znear;
        self.zfar = zfar;
        self
    }

    pub fn initial_pose(&self) -> OrbitPose {
        self.initial
    }

    /// Restores the pose the camera was created with.
    pub fn reset_to_default(&mut self) {
        self.distance = self.initial.distance;
        self.pitch = self.initial.pitch;
        self.yaw = self.initial.yaw;
        self.target = self.initial.target;

        self.update(); // Recalculate eye position
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    /// Zooms proportionally to the current distance.
    pub fn add_distance(&mut self, delta: f32) {
        self.set_distance(self.distance + self.distance * delta);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.min(max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the camera relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale pan movement by distance for consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;

        let movement = (right * delta.0 + up * delta.1) * pan_scale;

        self.target += movement;
        self.update();
    }

    /// Updates the camera after changing `distance`, `pitch`, `yaw` or `target`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from_vec(self.eye),
            Point3::from_vec(self.target),
            self.up,
        )
    }

    /// View-projection in OpenGL clip space (z in [-1, 1]); used for unprojection.
    pub fn gl_view_projection_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar) * self.view_matrix()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: Some(0.5),
            max_distance: Some(500.0),
            min_pitch: -std::f32::consts::FRAC_PI_2 + 0.001,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.001,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}
