//! Hover highlighting of a single named object.
//!
//! Every frame the detector restores the target's default color, casts a
//! ray through the pointer and recolors the target if the ray hits it.
//! The outcome tells the caller which cursor to show.

use winit::window::CursorIcon;

use crate::gfx::{
    camera::OrbitCamera,
    picking::{Intersection, Raycaster},
    resources::material::Color,
    scene::Scene,
};

use super::pointer::PointerState;

/// Cursor shown over the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    /// Hand cursor while the target is hovered
    Pointer,
}

impl CursorStyle {
    pub fn icon(self) -> CursorIcon {
        match self {
            CursorStyle::Default => CursorIcon::Default,
            CursorStyle::Pointer => CursorIcon::Pointer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverOutcome {
    pub hovering: bool,
    pub cursor: CursorStyle,
}

impl HoverOutcome {
    fn from_hovering(hovering: bool) -> Self {
        Self {
            hovering,
            cursor: if hovering {
                CursorStyle::Pointer
            } else {
                CursorStyle::Default
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoverDetector {
    pub target_name: String,
    pub default_color: Color,
    pub highlight_color: Color,
}

impl HoverDetector {
    pub fn new(target_name: impl Into<String>, default_color: Color, highlight_color: Color) -> Self {
        Self {
            target_name: target_name.into(),
            default_color,
            highlight_color,
        }
    }

    /// Runs one hover pass for the current pointer and camera.
    pub fn detect(
        &self,
        pointer: &PointerState,
        camera: &OrbitCamera,
        scene: &mut Scene,
    ) -> HoverOutcome {
        let intersections = Raycaster::from_camera(pointer.ndc(), camera).intersect_objects(scene);
        self.apply(&intersections, scene)
    }

    /// Applies already computed intersections to the scene.
    ///
    /// Only the color of the target changes. A missing target leaves the
    /// scene untouched and reports no hover.
    pub fn apply(&self, intersections: &[Intersection], scene: &mut Scene) -> HoverOutcome {
        if let Some(target) = scene.find_object_mut(&self.target_name) {
            if target.material.color.hex() != self.default_color.hex() {
                target.material.color = self.default_color;
            }
        }

        // Every hit is visited; a later match re-applies the same color.
        let mut hovering = false;
        for hit in intersections {
            if hit.object_name != self.target_name {
                continue;
            }
            if let Some(object) = scene.get_object_mut(hit.object_index) {
                object.material.color = self.highlight_color;
                hovering = true;
            }
        }

        HoverOutcome::from_hovering(hovering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SceneConfig,
        setup::{build_camera, build_hover_detector, build_scene, FLOOR_NAME},
    };
    use rand::Rng;

    const TARGET: &str = "myInteractiveBox";

    fn fixture() -> (Scene, OrbitCamera, HoverDetector) {
        let config = SceneConfig::default();
        let scene = build_scene(&config);
        let camera = build_camera(&config, config.initial_aspect()).camera;
        let detector = build_hover_detector(&config).unwrap();
        (scene, camera, detector)
    }

    fn target_hex(scene: &Scene) -> u32 {
        scene.find_object(TARGET).unwrap().material.color.hex()
    }

    #[test]
    fn test_center_pointer_highlights_target() {
        let (mut scene, camera, detector) = fixture();
        let outcome = detector.detect(&PointerState::new(0.0, 0.0), &camera, &mut scene);

        assert!(outcome.hovering);
        assert_eq!(outcome.cursor, CursorStyle::Pointer);
        assert_eq!(target_hex(&scene), 0xff0000);
        assert_eq!(scene.find_object(FLOOR_NAME).unwrap().material.color.hex(), 0x333333);
    }

    #[test]
    fn test_leaving_target_restores_default_color() {
        let (mut scene, camera, detector) = fixture();
        detector.detect(&PointerState::new(0.0, 0.0), &camera, &mut scene);

        let outcome = detector.detect(&PointerState::new(0.95, 0.95), &camera, &mut scene);
        assert!(!outcome.hovering);
        assert_eq!(outcome.cursor, CursorStyle::Default);
        assert_eq!(target_hex(&scene), 0x00ff00);
    }

    #[test]
    fn test_repeated_frames_are_stable() {
        let (mut scene, camera, detector) = fixture();
        let pointer = PointerState::new(0.0, 0.0);
        let first = detector.detect(&pointer, &camera, &mut scene);
        let second = detector.detect(&pointer, &camera, &mut scene);
        assert_eq!(first, second);
        assert_eq!(target_hex(&scene), 0xff0000);
    }

    #[test]
    fn test_eye_inside_target_does_not_hover() {
        let (mut scene, camera, detector) = fixture();
        detector.detect(&PointerState::new(0.0, 0.0), &camera, &mut scene);
        assert_eq!(target_hex(&scene), 0xff0000);

        // Only back faces of the cube face the eye, and those are never drawn
        let inside = OrbitCamera::looking_at(
            cgmath::Vector3::new(0.3, 1.3, 0.3),
            cgmath::Vector3::new(0.0, 1.0, 0.0),
            1.5,
        )
        .with_perspective(cgmath::Deg(75.0), 0.1, 1000.0);
        let outcome = detector.detect(&PointerState::new(0.0, 0.0), &inside, &mut scene);

        assert!(!outcome.hovering);
        assert_eq!(outcome.cursor, CursorStyle::Default);
        assert_eq!(target_hex(&scene), 0x00ff00);
    }

    #[test]
    fn test_missing_target_is_a_no_op() {
        let (mut scene, camera, _) = fixture();
        let detector = HoverDetector::new("missing", Color::BLACK, Color::WHITE);
        let outcome = detector.detect(&PointerState::new(0.0, 0.0), &camera, &mut scene);

        assert!(!outcome.hovering);
        assert_eq!(target_hex(&scene), 0x00ff00);
    }

    #[test]
    fn test_hits_on_other_objects_do_not_hover() {
        let (mut scene, _, detector) = fixture();
        let floor_index = scene.find_index(FLOOR_NAME).unwrap();
        let hits = [Intersection {
            object_index: floor_index,
            object_name: FLOOR_NAME.to_string(),
            distance: 5.0,
            point: cgmath::Vector3::new(0.0, 0.0, 0.0),
        }];

        let outcome = detector.apply(&hits, &mut scene);
        assert!(!outcome.hovering);
        assert_eq!(scene.objects[floor_index].material.color.hex(), 0x333333);
    }

    #[test]
    fn test_color_tracks_hit_for_random_pointers() {
        let (mut scene, camera, detector) = fixture();
        let mut rng = rand::rng();

        for _ in 0..200 {
            let pointer = PointerState::new(rng.random_range(-1.0..=1.0), rng.random_range(-1.0..=1.0));
            let hit = Raycaster::from_camera(pointer.ndc(), &camera)
                .intersect_objects(&scene)
                .iter()
                .any(|hit| hit.object_name == TARGET);

            let outcome = detector.detect(&pointer, &camera, &mut scene);
            assert_eq!(outcome.hovering, hit);
            let expected = if hit { 0xff0000 } else { 0x00ff00 };
            assert_eq!(target_hex(&scene), expected);
        }
    }
}
