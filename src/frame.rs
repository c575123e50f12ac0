//! Per-frame driver
//!
//! [`run_frame`] advances the camera, runs hover detection and renders, in
//! that order. The renderer and the window cursor sit behind small traits so
//! the loop can be driven without a GPU.

use winit::window::Window;

use crate::{
    error::RenderError,
    gfx::{camera::CameraManager, camera::OrbitCamera, scene::Scene},
    interaction::{CursorStyle, HoverDetector, HoverOutcome, PointerState},
};

/// Something that can draw the scene and follow the window size
pub trait RenderTarget {
    fn render(&mut self, scene: &mut Scene, camera: &OrbitCamera) -> Result<(), RenderError>;
    fn resize(&mut self, width: u32, height: u32);
}

/// Receives the cursor chosen by hover detection
pub trait CursorSink {
    fn set_cursor_style(&self, style: CursorStyle);
}

impl CursorSink for Window {
    fn set_cursor_style(&self, style: CursorStyle) {
        self.set_cursor(style.icon());
    }
}

/// Drawable area in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Everything a frame reads or writes, owned by the application handler
pub struct FrameContext {
    pub scene: Scene,
    pub camera_manager: CameraManager,
    pub pointer: PointerState,
    pub hover: Option<HoverDetector>,
    pub viewport: Viewport,
    cursor: CursorStyle,
}

impl FrameContext {
    pub fn new(
        scene: Scene,
        camera_manager: CameraManager,
        hover: Option<HoverDetector>,
        viewport: Viewport,
    ) -> Self {
        Self {
            scene,
            camera_manager,
            pointer: PointerState::default(),
            hover,
            viewport,
            cursor: CursorStyle::Default,
        }
    }

    /// Cursor applied by the most recent frame
    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }
}

/// Runs one frame: camera update, hover detection, render.
///
/// The cursor is only pushed to `cursor_sink` when it changes. Render
/// errors are returned after the hover state has been applied.
pub fn run_frame<R, C>(
    context: &mut FrameContext,
    renderer: &mut R,
    cursor_sink: &C,
) -> Result<Option<HoverOutcome>, RenderError>
where
    R: RenderTarget + ?Sized,
    C: CursorSink + ?Sized,
{
    context.camera_manager.update();

    let outcome = context.hover.as_ref().map(|detector| {
        detector.detect(
            &context.pointer,
            &context.camera_manager.camera,
            &mut context.scene,
        )
    });

    if let Some(outcome) = outcome {
        if outcome.cursor != context.cursor {
            log::trace!("cursor -> {:?}", outcome.cursor);
            cursor_sink.set_cursor_style(outcome.cursor);
            context.cursor = outcome.cursor;
        }
    }

    renderer.render(&mut context.scene, &context.camera_manager.camera)?;
    Ok(outcome)
}

/// Applies a window resize to the viewport, camera and render target.
///
/// Returns `false` and changes nothing for a zero-sized window.
pub fn handle_resize<R>(context: &mut FrameContext, renderer: &mut R, width: u32, height: u32) -> bool
where
    R: RenderTarget + ?Sized,
{
    let viewport = Viewport::new(width, height);
    if viewport.is_empty() {
        return false;
    }

    context.viewport = viewport;
    context.camera_manager.resize(width, height);
    renderer.resize(width, height);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SceneConfig,
        setup::{build_camera, build_hover_detector, build_scene},
    };
    use std::cell::RefCell;

    const TARGET: &str = "myInteractiveBox";

    /// Records what it was asked to draw
    #[derive(Default)]
    struct MockRenderer {
        frames: Vec<u32>,
        sizes: Vec<(u32, u32)>,
        fail_with: Option<wgpu::SurfaceError>,
    }

    impl RenderTarget for MockRenderer {
        fn render(&mut self, scene: &mut Scene, _camera: &OrbitCamera) -> Result<(), RenderError> {
            if let Some(error) = self.fail_with.clone() {
                return Err(error.into());
            }
            let color = scene.find_object(TARGET).map_or(0, |o| o.material.color.hex());
            self.frames.push(color);
            Ok(())
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.sizes.push((width, height));
        }
    }

    #[derive(Default)]
    struct MockCursor {
        styles: RefCell<Vec<CursorStyle>>,
    }

    impl CursorSink for MockCursor {
        fn set_cursor_style(&self, style: CursorStyle) {
            self.styles.borrow_mut().push(style);
        }
    }

    fn context(config: &SceneConfig) -> FrameContext {
        let viewport = Viewport::new(1200, 800);
        FrameContext::new(
            build_scene(config),
            build_camera(config, viewport.aspect()),
            build_hover_detector(config),
            viewport,
        )
    }

    #[test]
    fn test_hover_result_is_visible_to_renderer() {
        let mut context = context(&SceneConfig::default());
        let mut renderer = MockRenderer::default();
        let cursor = MockCursor::default();

        let outcome = run_frame(&mut context, &mut renderer, &cursor).unwrap();
        assert!(outcome.unwrap().hovering);
        // The frame drawn already carries the highlight
        assert_eq!(renderer.frames, vec![0xff0000]);
        assert_eq!(*cursor.styles.borrow(), vec![CursorStyle::Pointer]);
    }

    #[test]
    fn test_cursor_only_set_on_change() {
        let mut context = context(&SceneConfig::default());
        let mut renderer = MockRenderer::default();
        let cursor = MockCursor::default();

        run_frame(&mut context, &mut renderer, &cursor).unwrap();
        run_frame(&mut context, &mut renderer, &cursor).unwrap();
        context.pointer = PointerState::new(0.95, 0.95);
        run_frame(&mut context, &mut renderer, &cursor).unwrap();

        assert_eq!(renderer.frames, vec![0xff0000, 0xff0000, 0x00ff00]);
        assert_eq!(
            *cursor.styles.borrow(),
            vec![CursorStyle::Pointer, CursorStyle::Default]
        );
        assert_eq!(context.cursor(), CursorStyle::Default);
    }

    #[test]
    fn test_model_variant_skips_hover() {
        let mut context = context(&SceneConfig::model_viewer());
        let mut renderer = MockRenderer::default();
        let cursor = MockCursor::default();

        let outcome = run_frame(&mut context, &mut renderer, &cursor).unwrap();
        assert!(outcome.is_none());
        assert_eq!(renderer.frames.len(), 1);
        assert!(cursor.styles.borrow().is_empty());
    }

    #[test]
    fn test_render_error_is_returned() {
        let mut context = context(&SceneConfig::default());
        let mut renderer = MockRenderer {
            fail_with: Some(wgpu::SurfaceError::OutOfMemory),
            ..Default::default()
        };
        let cursor = MockCursor::default();

        let result = run_frame(&mut context, &mut renderer, &cursor);
        assert!(matches!(
            result,
            Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory))
        ));
        // Hover detection still ran before the failed render
        assert_eq!(
            context.scene.find_object(TARGET).unwrap().material.color.hex(),
            0xff0000
        );
    }

    #[test]
    fn test_resize_updates_camera_and_target() {
        let mut context = context(&SceneConfig::default());
        let mut renderer = MockRenderer::default();

        assert!(handle_resize(&mut context, &mut renderer, 1920, 1080));
        assert_eq!(context.viewport, Viewport::new(1920, 1080));
        assert!((context.camera_manager.camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        assert_eq!(renderer.sizes, vec![(1920, 1080)]);
    }

    #[test]
    fn test_zero_size_resize_is_ignored() {
        let mut context = context(&SceneConfig::default());
        let mut renderer = MockRenderer::default();

        assert!(!handle_resize(&mut context, &mut renderer, 0, 600));
        assert_eq!(context.viewport, Viewport::new(1200, 800));
        assert!((context.camera_manager.camera.aspect - 1.5).abs() < 1e-6);
        assert!(renderer.sizes.is_empty());
    }
}
