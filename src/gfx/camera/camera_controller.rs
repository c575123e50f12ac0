use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;

/// Camera motion requested by input but not yet applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitDelta {
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
    pub pan: (f32, f32),
}

impl OrbitDelta {
    fn scaled(&self, factor: f32) -> Self {
        Self {
            yaw: self.yaw * factor,
            pitch: self.pitch * factor,
            zoom: self.zoom * factor,
            pan: (self.pan.0 * factor, self.pan.1 * factor),
        }
    }

    fn is_negligible(&self) -> bool {
        const EPS: f32 = 1e-6;
        self.yaw.abs() < EPS
            && self.pitch.abs() < EPS
            && self.zoom.abs() < EPS
            && self.pan.0.abs() < EPS
            && self.pan.1.abs() < EPS
    }
}

/// Maps mouse drag, wheel and shift-drag onto damped orbit, zoom and pan.
///
/// Input only accumulates into a pending [`OrbitDelta`]; the camera moves in
/// [`CameraController::update`], which the frame driver calls once per frame.
/// With damping enabled each update applies `damping_factor` of the pending
/// motion and keeps the rest, so motion eases out over several frames.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_zoom: bool,
    pending: OrbitDelta,
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            enable_damping: false,
            damping_factor: 0.05,
            enable_zoom: true,
            pending: OrbitDelta::default(),
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    pub fn with_damping(mut self, damping_factor: f32) -> Self {
        self.enable_damping = true;
        self.damping_factor = damping_factor.clamp(f32::EPSILON, 1.0);
        self
    }

    pub fn with_zoom(mut self, enable_zoom: bool) -> Self {
        self.enable_zoom = enable_zoom;
        self
    }

    /// Handles window-level input: buttons, wheel, modifiers and keys.
    pub fn process_window_event(&mut self, event: &WindowEvent, camera: &mut OrbitCamera) {
        match event {
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32 / 50.0
                    }
                };
                self.zoom(scroll_amount);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.is_shift_held = modifiers.state().shift_key();
            }
            WindowEvent::KeyboardInput { event, .. } => self.process_keyed_events(event, camera),
            WindowEvent::Focused(false) => {
                self.is_mouse_pressed = false;
            }
            _ => (),
        }
    }

    /// Handles raw mouse motion, which keeps working when the cursor leaves the window.
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.drag(delta.0 as f32, delta.1 as f32);
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut OrbitCamera) {
        if let KeyEvent {
            physical_key: PhysicalKey::Code(KeyCode::KeyC),
            state: ElementState::Pressed,
            ..
        } = event
        {
            // Shift+C resets the camera
            if self.is_shift_held {
                log::info!("resetting camera to its initial pose");
                self.pending = OrbitDelta::default();
                camera.reset_to_default();
            }
        }
    }

    pub fn set_mouse_pressed(&mut self, pressed: bool) {
        self.is_mouse_pressed = pressed;
    }

    pub fn set_shift_held(&mut self, held: bool) {
        self.is_shift_held = held;
    }

    /// Pointer movement in pixels while the left button may be held.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        if !self.is_mouse_pressed {
            return;
        }
        if self.is_shift_held {
            self.pan(dx, dy);
        } else {
            self.rotate(dx, dy);
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.pending.yaw -= dx * self.rotate_speed;
        self.pending.pitch += dy * self.rotate_speed;
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pending.pan.0 -= dx * self.pan_speed;
        self.pending.pan.1 += dy * self.pan_speed;
    }

    /// Positive amounts move the camera away from the target.
    pub fn zoom(&mut self, amount: f32) {
        if self.enable_zoom {
            self.pending.zoom += amount * self.zoom_speed;
        }
    }

    pub fn pending(&self) -> OrbitDelta {
        self.pending
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        self.is_mouse_pressed && self.is_shift_held
    }

    /// Advances the camera by this frame's share of the pending motion.
    ///
    /// Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut OrbitCamera) -> bool {
        if self.pending.is_negligible() {
            self.pending = OrbitDelta::default();
            return false;
        }

        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        let step = self.pending.scaled(factor);

        camera.add_yaw(step.yaw);
        camera.add_pitch(step.pitch);
        if step.zoom != 0.0 {
            camera.add_distance(step.zoom);
        }
        if step.pan != (0.0, 0.0) {
            camera.pan(step.pan);
        }

        self.pending = self.pending.scaled(1.0 - factor);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3, Zero};

    fn camera() -> OrbitCamera {
        OrbitCamera::new(10.0, 0.3, 0.2, Vector3::zero(), 1.0)
    }

    #[test]
    fn test_drag_without_button_is_ignored() {
        let mut controller = CameraController::new(0.005, 0.1);
        controller.drag(100.0, 50.0);
        assert_eq!(controller.pending(), OrbitDelta::default());
    }

    #[test]
    fn test_undamped_update_applies_everything_at_once() {
        let mut controller = CameraController::new(0.01, 0.1);
        let mut cam = camera();
        controller.set_mouse_pressed(true);
        controller.drag(10.0, 0.0);

        assert!(controller.update(&mut cam));
        assert!((cam.yaw - (0.2 - 0.1)).abs() < 1e-6);
        assert!(!controller.update(&mut cam));
    }

    #[test]
    fn test_damped_motion_decays_and_converges() {
        let mut controller = CameraController::new(0.01, 0.1).with_damping(0.05);
        let mut cam = camera();
        controller.set_mouse_pressed(true);
        controller.drag(10.0, 0.0);

        controller.update(&mut cam);
        let first_step = 0.2 - cam.yaw;
        assert!((first_step - 0.1 * 0.05).abs() < 1e-6);

        let yaw_after_first = cam.yaw;
        controller.update(&mut cam);
        let second_step = yaw_after_first - cam.yaw;
        assert!(second_step < first_step);

        for _ in 0..1000 {
            controller.update(&mut cam);
        }
        assert!((cam.yaw - 0.1).abs() < 1e-4);
        assert!(!controller.update(&mut cam));
    }

    #[test]
    fn test_shift_drag_pans() {
        let mut controller = CameraController::new(0.01, 0.1);
        let mut cam = camera();
        controller.set_mouse_pressed(true);
        controller.set_shift_held(true);
        assert!(controller.is_panning());
        controller.drag(10.0, 10.0);
        controller.update(&mut cam);
        assert!(cam.target.magnitude() > 0.0);
        assert!((cam.yaw - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_can_be_disabled() {
        let mut controller = CameraController::new(0.01, 0.1).with_zoom(false);
        controller.zoom(3.0);
        assert_eq!(controller.pending().zoom, 0.0);

        let mut controller = CameraController::new(0.01, 0.1);
        let mut cam = camera();
        controller.zoom(1.0);
        controller.update(&mut cam);
        assert!((cam.distance - 11.0).abs() < 1e-4);
    }
}
