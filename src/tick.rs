//! Per-tick driver
//!
//! One tick samples the pointer, feeds the pan, applies each pending scroll
//! notch in arrival order and hands the resulting transform to the render
//! sink. The pacer spaces ticks by the configured refresh interval.

use crate::config::ViewerConfig;
use crate::input::{ButtonMask, PointerSampler, RawPointer, ScreenSize, ScrollAccumulator};
use crate::viewport::{Transform, ViewportState, ZoomDirection};
use anyhow::Result;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Consumer of the per-tick transform
pub trait RenderSink {
    fn present(&mut self, transform: &Transform) -> Result<()>;
}

/// Input gathered since the previous tick
#[derive(Debug, Default)]
pub struct PendingInput {
    pointer: RawPointer,
    notches: VecDeque<ZoomDirection>,
    scroll: ScrollAccumulator,
    dirty: bool,
}

impl PendingInput {
    pub fn pointer(&self) -> RawPointer {
        self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut RawPointer {
        self.dirty = true;
        &mut self.pointer
    }

    pub fn push_notch(&mut self, direction: ZoomDirection) {
        self.notches.push_back(direction);
        self.dirty = true;
    }

    /// Wheel motion in lines; only completed lines become notches
    pub fn push_scroll_lines(&mut self, lines: f32) {
        let notches = self.scroll.push_lines(lines);
        self.queue_notches(notches);
    }

    /// Wheel motion in pixels (touchpads, smooth scrolling)
    pub fn push_scroll_pixels(&mut self, pixels: f32) {
        let notches = self.scroll.push_pixels(pixels);
        self.queue_notches(notches);
    }

    fn queue_notches(&mut self, notches: Option<(ZoomDirection, u32)>) {
        if let Some((direction, count)) = notches {
            tracing::debug!("Scroll: {} x {:?}", count, direction);
            for _ in 0..count {
                self.push_notch(direction);
            }
        }
    }

    /// Drop all held buttons; releases delivered to another client are
    /// never seen here
    pub fn release_buttons(&mut self) {
        self.pointer_mut().buttons = ButtonMask::NONE;
    }

    /// Force a tick even without new input (expose, resize)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Fixed-interval tick spacing
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    last_tick: Option<Instant>,
}

impl FramePacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: None,
        }
    }

    /// Earliest instant the next tick may run
    pub fn next_deadline(&self) -> Option<Instant> {
        self.last_tick.map(|t| t + self.interval)
    }

    pub fn is_ready(&self, now: Instant) -> bool {
        self.next_deadline().map_or(true, |deadline| now >= deadline)
    }

    pub fn mark(&mut self, now: Instant) {
        self.last_tick = Some(now);
    }
}

/// Owns the view model for the lifetime of the event loop
#[derive(Debug)]
pub struct Ticker {
    viewport: ViewportState,
    sampler: PointerSampler,
    pacer: FramePacer,
    ticks: u64,
}

impl Ticker {
    pub fn new(config: &ViewerConfig, screen: ScreenSize) -> Self {
        Self {
            viewport: ViewportState::new(config.pan_sensitivity, config.zoom_sensitivity),
            sampler: PointerSampler::new(screen),
            pacer: FramePacer::new(config.refresh_interval()),
            ticks: 0,
        }
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn pacer(&self) -> &FramePacer {
        &self.pacer
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn set_screen(&mut self, screen: ScreenSize) {
        if screen.is_valid() {
            self.sampler = PointerSampler::new(screen);
        }
    }

    /// Run a tick if there is input and the interval has elapsed.
    ///
    /// Returns whether a tick ran.
    pub fn poll<S: RenderSink>(
        &mut self,
        input: &mut PendingInput,
        sink: &mut S,
        now: Instant,
    ) -> Result<bool> {
        if !input.is_dirty() || !self.pacer.is_ready(now) {
            return Ok(false);
        }
        self.pacer.mark(now);
        self.tick(input, sink)?;
        Ok(true)
    }

    /// Unpaced tick; drains `input`.
    pub fn tick<S: RenderSink>(&mut self, input: &mut PendingInput, sink: &mut S) -> Result<()> {
        let sample = self.sampler.sample(input.pointer);
        self.viewport.apply_pan(sample.position, sample.pan_active);

        while let Some(direction) = input.notches.pop_front() {
            self.viewport.apply_zoom_at_cursor(sample.position, direction);
        }
        input.dirty = false;
        self.ticks += 1;

        sink.present(&self.viewport.transform())
    }
}
