use std::{sync::Arc, thread::JoinHandle};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    assets::model_loader::{handle_model_loaded, ModelLoader, ModelPlacement},
    config::{SceneConfig, SceneVariant},
    error::{AppError, ModelLoadError, RenderError},
    frame::{handle_resize, run_frame, FrameContext, Viewport},
    gfx::{rendering::RenderEngine, scene::Object},
    setup::{build_camera, build_hover_detector, build_scene},
};

/// Events posted to the loop from outside the windowing system
pub enum AppEvent {
    ModelLoaded(Result<Object, ModelLoadError>),
}

pub struct HoverApp {
    event_loop: EventLoop<AppEvent>,
    app_state: AppState,
}

struct AppState {
    config: SceneConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    context: FrameContext,
    proxy: EventLoopProxy<AppEvent>,
    loader: Option<JoinHandle<()>>,
    fatal: Option<RenderError>,
}

impl HoverApp {
    /// Builds the scene for `config`; the window opens once `run` starts.
    pub fn new(config: SceneConfig) -> Result<Self, AppError> {
        let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
        let proxy = event_loop.create_proxy();

        let (width, height) = config.window_size;
        let context = FrameContext::new(
            build_scene(&config),
            build_camera(&config, config.initial_aspect()),
            build_hover_detector(&config),
            Viewport::new(width, height),
        );

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                context,
                proxy,
                loader: None,
                fatal: None,
            },
        })
    }

    /// Runs the event loop until the window closes.
    pub fn run(mut self) -> Result<(), AppError> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop.run_app(&mut self.app_state)?;

        match self.app_state.fatal.take() {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: RenderError) {
        log::error!("{}", error);
        self.fatal = Some(error);
        event_loop.exit();
    }

    fn start_model_load(&mut self) {
        if self.config.variant != SceneVariant::LoadedModel || self.loader.is_some() {
            return;
        }

        let model = &self.config.model;
        let placement = ModelPlacement {
            scale: model.scale,
            position: model.position.into(),
        };
        self.loader = Some(ModelLoader::spawn(
            model.path.clone(),
            placement,
            self.proxy.clone(),
        ));
    }
}

impl ApplicationHandler<AppEvent> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.config.window_size;
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        // Physical pixels, so the pixel ratio is already applied
        let PhysicalSize { width, height } = window.inner_size();
        let renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.config.render,
        ));

        match renderer {
            Ok(mut renderer) => {
                handle_resize(&mut self.context, &mut renderer, width, height);
                self.render_engine = Some(renderer);
                self.window = Some(window);
                self.start_model_load();
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let (Some(render_engine), Some(window)) = (self.render_engine.as_mut(), self.window.as_ref())
        else {
            return;
        };

        self.context.camera_manager.process_window_event(&event);

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::CursorMoved { position, .. } => {
                let Viewport { width, height } = self.context.viewport;
                self.context
                    .pointer
                    .update(position, PhysicalSize::new(width, height));
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                handle_resize(&mut self.context, render_engine, width, height);
            }
            WindowEvent::RedrawRequested => {
                match run_frame(&mut self.context, render_engine, window.as_ref()) {
                    Ok(_) => {}
                    Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                        self.fail(
                            event_loop,
                            RenderError::Surface(wgpu::SurfaceError::OutOfMemory),
                        );
                    }
                    Err(e) => log::warn!("frame skipped: {}", e),
                }
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        self.context.camera_manager.process_device_event(&event);
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::ModelLoaded(result) => {
                if let Some(handle) = self.loader.take() {
                    if handle.join().is_err() {
                        log::warn!("model loader thread panicked");
                    }
                }
                handle_model_loaded(&mut self.context.scene, result);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
