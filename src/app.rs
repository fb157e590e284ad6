//! Window and event handling (winit 0.29)

use crate::capture::Screenshot;
use crate::config::ViewerConfig;
use crate::input::{ButtonMask, ScreenSize};
use crate::renderer::Renderer;
use crate::tick::{PendingInput, Ticker};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowBuilder},
};

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    ticker: Option<Ticker>,
    input: PendingInput,
    config: ViewerConfig,
    screenshot: Screenshot,
    /// Checked only between ticks
    should_close: bool,
    fatal: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: ViewerConfig, screenshot: Screenshot) -> Self {
        Self {
            window: None,
            renderer: None,
            ticker: None,
            input: PendingInput::default(),
            config,
            screenshot,
            should_close: false,
            fatal: None,
        }
    }

    /// Error that stopped the event loop, if any
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.fatal.take()
    }

    /// Init window and renderer
    fn init(&mut self, target: &EventLoopWindowTarget<()>) -> Result<()> {
        if self.window.is_some() {
            return Ok(());
        }

        // Same monitor the screenshot was taken from
        let monitor = target.primary_monitor();
        let window = Arc::new(
            WindowBuilder::new()
                .with_title("jotner")
                .with_decorations(false)
                .with_fullscreen(Some(Fullscreen::Borderless(monitor)))
                .build(target)
                .context("Failed to create window")?,
        );

        let renderer = pollster::block_on(Renderer::new(window.clone(), &self.screenshot))?;

        let size = window.inner_size();
        tracing::info!("Window: {}x{}", size.width, size.height);
        self.ticker = Some(Ticker::new(
            &self.config,
            ScreenSize::new(size.width.max(1), size.height.max(1)),
        ));
        self.renderer = Some(renderer);
        self.window = Some(window);
        self.input.mark_dirty();

        Ok(())
    }

    fn handle_window_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.should_close = true,
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                tracing::debug!("Escape pressed");
                self.should_close = true;
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size);
                }
                if let Some(ticker) = &mut self.ticker {
                    ticker.set_screen(ScreenSize::new(size.width, size.height));
                }
                self.input.mark_dirty();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pointer = self.input.pointer_mut();
                pointer.x = position.x as i32;
                pointer.y = position.y as i32;
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let mask = match button {
                    MouseButton::Left => ButtonMask::BUTTON1,
                    MouseButton::Middle => ButtonMask::BUTTON2,
                    MouseButton::Right => ButtonMask::BUTTON3,
                    _ => return,
                };
                self.input
                    .pointer_mut()
                    .buttons
                    .set(mask, state == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => self.input.push_scroll_lines(y),
                MouseScrollDelta::PixelDelta(pos) => self.input.push_scroll_pixels(pos.y as f32),
            },
            WindowEvent::Focused(false) => {
                tracing::debug!("Focus lost, releasing buttons");
                self.input.release_buttons();
            }
            WindowEvent::RedrawRequested => self.input.mark_dirty(),
            _ => {}
        }
    }

    /// Tick boundary: honour the close flag, then tick if due
    fn about_to_wait(&mut self, target: &EventLoopWindowTarget<()>) {
        if self.should_close {
            tracing::info!("Closing viewer");
            target.exit();
            return;
        }

        let (Some(ticker), Some(renderer)) = (self.ticker.as_mut(), self.renderer.as_mut()) else {
            return;
        };

        if let Err(e) = ticker.poll(&mut self.input, renderer, Instant::now()) {
            tracing::error!("Render error: {}", e);
        }

        let control_flow = match ticker.pacer().next_deadline() {
            Some(deadline) if self.input.is_dirty() => ControlFlow::WaitUntil(deadline),
            _ => ControlFlow::Wait,
        };
        target.set_control_flow(control_flow);
    }

    /// Main event handling logic (winit 0.29 style)
    pub fn handle_event(&mut self, event: Event<()>, target: &EventLoopWindowTarget<()>) {
        match event {
            Event::Resumed => {
                if let Err(e) = self.init(target) {
                    tracing::error!("Failed to start viewer: {:#}", e);
                    self.fatal = Some(e);
                    target.exit();
                }
            }
            Event::WindowEvent { event, .. } => self.handle_window_event(event),
            Event::AboutToWait => self.about_to_wait(target),
            _ => {}
        }
    }
}
