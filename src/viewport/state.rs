//! Viewport state: owns the transform and the pan drag anchor

use super::transform::{Transform, ZoomDirection, MIN_ZOOM};
use glam::Vec2;

/// Interactive view state driven once per tick by pointer samples and
/// scroll notches.
#[derive(Debug, Clone)]
pub struct ViewportState {
    transform: Transform,
    /// Last pointer position used as the baseline for the next pan delta
    drag_anchor: Vec2,
    pan_sensitivity: f32,
    zoom_sensitivity: f32,
}

impl ViewportState {
    /// Both sensitivities must be strictly positive.
    pub fn new(pan_sensitivity: f32, zoom_sensitivity: f32) -> Self {
        debug_assert!(pan_sensitivity > 0.0, "pan sensitivity must be positive");
        debug_assert!(zoom_sensitivity > 0.0, "zoom sensitivity must be positive");

        Self {
            transform: Transform::IDENTITY,
            drag_anchor: Vec2::ZERO,
            pan_sensitivity,
            zoom_sensitivity,
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn drag_anchor(&self) -> Vec2 {
        self.drag_anchor
    }

    /// Feed one pointer sample.
    ///
    /// While the pan button is up the anchor follows the pointer, so the
    /// first sample after a press yields a zero delta. While held, the pan
    /// moves by the pointer delta in screen space, independent of zoom.
    pub fn apply_pan(&mut self, current: Vec2, pan_active: bool) {
        if !pan_active {
            self.drag_anchor = current;
            return;
        }

        if current == self.drag_anchor {
            return;
        }

        let delta = (current - self.drag_anchor) * self.pan_sensitivity;
        self.transform.pan += delta;
        self.drag_anchor = current;
    }

    /// Zoom one notch while keeping the content point under `cursor` fixed.
    pub fn apply_zoom_at_cursor(&mut self, cursor: Vec2, direction: ZoomDirection) {
        let world = self.transform.screen_to_world(cursor);

        let zoom = self.transform.zoom;
        let new_zoom =
            (zoom - self.zoom_sensitivity * zoom * direction.step_sign()).max(MIN_ZOOM);

        self.transform.pan = cursor - world * new_zoom;
        self.transform.zoom = new_zoom;

        tracing::debug!(
            "Zoom {:?} at ({:.3}, {:.3}): {:.4} -> {:.4}",
            direction,
            cursor.x,
            cursor.y,
            zoom,
            new_zoom
        );
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(1.0, 0.2)
    }
}
