use cgmath::Matrix4;
use winit::event::{DeviceEvent, WindowEvent};

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};

/// Camera plus the controller that drives it
pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn process_window_event(&mut self, event: &WindowEvent) {
        self.controller
            .process_window_event(event, &mut self.camera);
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        self.controller.process_device_event(event);
    }

    /// Advances damped motion; returns whether the camera moved.
    pub fn update(&mut self) -> bool {
        self.controller.update(&mut self.camera)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize_projection(width, height);
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3, Zero};

    #[test]
    fn test_update_moves_camera_only_with_pending_input() {
        let camera = OrbitCamera::looking_at(Vector3::new(10.0, 10.0, 10.0), Vector3::zero(), 1.0);
        let mut manager = CameraManager::new(camera, CameraController::new(0.005, 0.1));
        let eye = manager.camera.eye;
        assert!(!manager.update());
        assert_eq!(manager.camera.eye, eye);

        manager.controller.rotate(100.0, 0.0);
        assert!(manager.update());
        assert!((manager.camera.eye - eye).magnitude() > 1e-4);
    }

    #[test]
    fn test_resize_forwards_to_camera() {
        let camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        let mut manager = CameraManager::new(camera, CameraController::new(0.005, 0.1));
        manager.resize(800, 400);
        assert_eq!(manager.camera.aspect, 2.0);
    }
}
