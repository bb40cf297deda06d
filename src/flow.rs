//! Application event loop.
//!
//! The host side of the demo: winit drives the lifecycle and this module maps
//! it onto the renderer.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window, the GPU context and the [`Renderer`]
//! 2. keyboard events become [`crate::input::InputEvent`]s
//! 3. `RedrawRequested` draws a frame and requests the next one
//! 4. closing the window or double tapping Escape leaves the loop, dropping
//!    the renderer before the context it was built from

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    context::Context,
    input::{KeyboardPad, Signal},
    render::{FrameStatus, Renderer},
    settings::Settings,
    storage::AssetDir,
};

struct AppState {
    keyboard: KeyboardPad,
    // Declared before the context so it is dropped before the device it was built on.
    renderer: Renderer,
    ctx: Context,
}

impl AppState {
    async fn new(window: Arc<Window>, settings: &Settings) -> anyhow::Result<Self> {
        let ctx = Context::new(window, settings).await?;
        let mut archive = AssetDir::open(&settings.asset_dir)?;
        let renderer = Renderer::new(&ctx, settings, &mut archive)?;
        Ok(Self {
            keyboard: KeyboardPad::new(),
            renderer,
            ctx,
        })
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    settings: Settings,
    state: Option<AppState>,
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        Ok(Self {
            async_runtime: tokio::runtime::Runtime::new()?,
            settings,
            state: None,
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes().with_title("popcorn");
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        match self.async_runtime.block_on(AppState::new(window, &self.settings)) {
            Ok(state) => {
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.ctx.resize(size.width, size.height),
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(input) = state.keyboard.key_event(&event) {
                    if state.renderer.event(&input) == Signal::Exit {
                        event_loop.exit();
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if state.renderer.draw(&mut state.ctx) == FrameStatus::Skipped {
                    log::trace!("frame skipped");
                }
                state.ctx.window.request_redraw();
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.state = None;
    }
}

/// Install the logger, read [`Settings::from_env`] and run the demo.
pub fn run() -> anyhow::Result<()> {
    init_logger();
    run_with(Settings::from_env())
}

pub fn init_logger() {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };
}

/// Run the demo with `settings`. Logging is left to the caller.
pub fn run_with(settings: Settings) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(settings)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
