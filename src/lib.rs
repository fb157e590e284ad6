//! jotner: pan and zoom around a screenshot of your desktop
//!
//! The screen is captured once at startup and shown in a borderless
//! fullscreen window. Dragging with the left button pans; each scroll notch
//! zooms around the point under the cursor.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use jotner::{launch_viewer, CaptureSource, ViewerConfig};
//!
//! launch_viewer(ViewerConfig::default(), &CaptureSource::Screen).unwrap();
//! ```

pub mod app;
pub mod capture;
pub mod config;
pub mod input;
pub mod renderer;
pub mod tick;
pub mod viewport;

use anyhow::Result;
use winit::event_loop::{ControlFlow, EventLoop};

// Re-export key types
pub use app::App;
pub use capture::{CaptureError, CaptureSource, Screenshot};
pub use config::{Cli, ConfigError, ViewerConfig};
pub use input::{ButtonMask, PointerSample, PointerSampler, RawPointer, ScreenSize, ScrollAccumulator};
pub use tick::{FramePacer, PendingInput, RenderSink, Ticker};
pub use viewport::{Transform, ViewportState, ZoomDirection, MIN_ZOOM};

/// Capture the screen (or load the image) and run the viewer
///
/// This function blocks until the window is closed.
pub fn launch_viewer(config: ViewerConfig, source: &CaptureSource) -> Result<()> {
    // Capture before any window of ours is on screen
    let screenshot = source.capture()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, screenshot);

    // Run event loop (winit 0.29 style)
    event_loop.run(|event, target| {
        app.handle_event(event, target);
    })?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
