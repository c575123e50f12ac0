//! Builds the demo scenes and camera from a [`SceneConfig`].

use cgmath::{Deg, Vector3};

use crate::{
    config::{SceneConfig, SceneVariant},
    gfx::{
        camera::{CameraController, CameraManager, OrbitCamera},
        geometry::{generate_box, generate_plane},
        resources::material::{Color, Material},
        scene::{AmbientLight, DirectionalLight, Mesh, Object, Scene},
    },
    interaction::hover::HoverDetector,
};

pub const FLOOR_NAME: &str = "floor";

/// Scene with background and lights, plus the procedural objects of the
/// cube variant. The model variant starts without objects.
pub fn build_scene(config: &SceneConfig) -> Scene {
    let mut scene = Scene::new(Color::from_hex(config.background));
    let lighting = &config.lighting;

    scene.ambient_light = AmbientLight {
        color: Color::from_hex(lighting.ambient_color),
        intensity: lighting.ambient_intensity,
    };
    scene.directional_light = DirectionalLight {
        color: Color::from_hex(lighting.directional_color),
        intensity: lighting.directional_intensity,
        position: Vector3::from(lighting.directional_position),
        cast_shadow: lighting.cast_shadow,
        ..Default::default()
    };

    if config.variant == SceneVariant::InteractiveCube {
        scene.add_object(build_floor(config));
        scene.add_object(build_cube(config));
    }

    scene
}

fn build_floor(config: &SceneConfig) -> Object {
    let floor = &config.floor;
    Object::new(vec![Mesh::from_geometry(&generate_plane(
        floor.width,
        floor.depth,
        1,
        1,
    ))])
    .with_name(FLOOR_NAME)
    .with_material(Material::new("floor", Color::from_hex(floor.color)))
    .with_rotation(-std::f32::consts::FRAC_PI_2, 0.0, 0.0)
    .with_shadows(false, true)
}

fn build_cube(config: &SceneConfig) -> Object {
    let cube = &config.cube;
    let [x, y, z] = cube.position;
    Object::new(vec![Mesh::from_geometry(&generate_box(
        cube.size, cube.size, cube.size,
    ))])
    .with_name(cube.name.as_str())
    .with_material(Material::new("cube", Color::from_hex(cube.color)))
    .with_position(x, y, z)
    .with_shadows(true, false)
}

/// Camera at its configured pose with an orbit controller attached.
pub fn build_camera(config: &SceneConfig, aspect: f32) -> CameraManager {
    let settings = &config.camera;
    let camera = OrbitCamera::looking_at(
        Vector3::from(settings.position),
        Vector3::from(settings.target),
        aspect,
    )
    .with_perspective(Deg(settings.fov_degrees), settings.near, settings.far);

    let mut controller = CameraController::new(settings.rotate_speed, settings.zoom_speed)
        .with_zoom(settings.enable_zoom);
    controller.pan_speed = settings.pan_speed;
    if settings.enable_damping {
        controller = controller.with_damping(settings.damping_factor);
    }

    let mut manager = CameraManager::new(camera, controller);
    manager.update();
    manager
}

/// Hover detector for the cube variant; the model variant has none.
pub fn build_hover_detector(config: &SceneConfig) -> Option<HoverDetector> {
    (config.variant == SceneVariant::InteractiveCube).then(|| {
        HoverDetector::new(
            config.cube.name.as_str(),
            Color::from_hex(config.cube.color),
            Color::from_hex(config.cube.highlight_color),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_variant_contents() {
        let config = SceneConfig::default();
        let scene = build_scene(&config);

        assert_eq!(scene.get_object_names(), vec![FLOOR_NAME, "myInteractiveBox"]);
        let cube = scene.find_object("myInteractiveBox").unwrap();
        assert_eq!(cube.material.color.hex(), 0x00ff00);
        assert_eq!(cube.transform.position, Vector3::new(0.0, 1.0, 0.0));
        assert!(cube.cast_shadow);
        assert!(scene.find_object(FLOOR_NAME).unwrap().receive_shadow);
        assert_eq!(scene.background.hex(), 0x202025);
        assert_eq!(scene.ambient_light.intensity, 0.5);
    }

    #[test]
    fn test_model_variant_starts_empty() {
        let config = SceneConfig::model_viewer();
        assert_eq!(build_scene(&config).object_count(), 0);
        assert!(build_hover_detector(&config).is_none());
    }

    #[test]
    fn test_camera_starts_at_configured_position() {
        let manager = build_camera(&SceneConfig::default(), 1.5);
        let eye = manager.camera.eye;
        for (actual, expected) in [eye.x, eye.y, eye.z].into_iter().zip([10.0, 10.0, 10.0]) {
            assert!((actual - expected).abs() < 1e-4);
        }
        assert!(manager.controller.enable_damping);
        let fovy = cgmath::Rad::from(Deg(75.0f32));
        assert!((manager.camera.fovy.0 - fovy.0).abs() < 1e-6);
    }
}
