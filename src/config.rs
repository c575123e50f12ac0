//! Scene and application configuration
//!
//! All parameters are plain constants gathered in [`SceneConfig`]; its
//! `Default` describes the interactive cube demo. Colors are `0xRRGGBB`.

use std::path::PathBuf;

/// Which demo scene to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneVariant {
    /// Procedural floor and a hoverable cube
    InteractiveCube,
    /// Lights only; an external model is appended once it has loaded
    LoadedModel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_zoom: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [10.0, 10.0, 10.0],
            target: [0.0, 0.0, 0.0],
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.01,
            enable_damping: true,
            damping_factor: 0.05,
            enable_zoom: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightingConfig {
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    pub directional_color: u32,
    pub directional_intensity: f32,
    pub directional_position: [f32; 3],
    pub cast_shadow: bool,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: 0xffffff,
            ambient_intensity: 0.5,
            directional_color: 0xffffff,
            directional_intensity: 1.0,
            directional_position: [5.0, 10.0, 5.0],
            cast_shadow: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloorConfig {
    pub width: f32,
    pub depth: f32,
    pub color: u32,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            width: 15.0,
            depth: 15.0,
            color: 0x333333,
        }
    }
}

/// The hoverable cube
#[derive(Debug, Clone, PartialEq)]
pub struct CubeConfig {
    pub name: String,
    pub size: f32,
    pub position: [f32; 3],
    pub color: u32,
    pub highlight_color: u32,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            name: "myInteractiveBox".to_string(),
            size: 2.0,
            position: [0.0, 1.0, 0.0],
            color: 0x00ff00,
            highlight_color: 0xff0000,
        }
    }
}

/// External model and the fixed placement applied once it has loaded
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub path: PathBuf,
    pub scale: f32,
    pub position: [f32; 3],
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/model.obj"),
            scale: 1.0,
            position: [0.0, 0.0, 0.0],
        }
    }
}

/// Render surface options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// MSAA sample count (1 disables anti-aliasing)
    pub sample_count: u32,
    pub shadows_enabled: bool,
    pub shadow_map_size: u32,
    pub vsync: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            sample_count: 4,
            shadows_enabled: true,
            shadow_map_size: 2048,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub title: String,
    /// Initial logical window size
    pub window_size: (u32, u32),
    pub background: u32,
    pub variant: SceneVariant,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub floor: FloorConfig,
    pub cube: CubeConfig,
    pub model: ModelConfig,
    pub render: RenderSettings,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            title: "hoverscene".to_string(),
            window_size: (1200, 800),
            background: 0x202025,
            variant: SceneVariant::InteractiveCube,
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            floor: FloorConfig::default(),
            cube: CubeConfig::default(),
            model: ModelConfig::default(),
            render: RenderSettings::default(),
        }
    }
}

impl SceneConfig {
    /// Configuration of the model viewer variant.
    pub fn model_viewer() -> Self {
        Self {
            title: "hoverscene model viewer".to_string(),
            variant: SceneVariant::LoadedModel,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn with_variant(mut self, variant: SceneVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model.path = path.into();
        self
    }

    pub fn with_render_settings(mut self, render: RenderSettings) -> Self {
        self.render = render;
        self
    }

    /// Width over height of the initial window.
    pub fn initial_aspect(&self) -> f32 {
        let (width, height) = self.window_size;
        width as f32 / height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_describe_cube_demo() {
        let config = SceneConfig::default();
        assert_eq!(config.variant, SceneVariant::InteractiveCube);
        assert_eq!(config.cube.name, "myInteractiveBox");
        assert_eq!(config.cube.color, 0x00ff00);
        assert_eq!(config.cube.highlight_color, 0xff0000);
        assert_eq!(config.background, 0x202025);
        assert_eq!(config.camera.damping_factor, 0.05);
        assert!(config.render.shadows_enabled);
    }

    #[test]
    fn test_model_viewer_builder() {
        let config = SceneConfig::model_viewer().with_model_path("other.obj");
        assert_eq!(config.variant, SceneVariant::LoadedModel);
        assert_eq!(config.model.path, PathBuf::from("other.obj"));
        assert!((config.initial_aspect() - 1.5).abs() < 1e-6);
    }
}
