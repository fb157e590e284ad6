//! Pointer sampling and scroll classification
//!
//! Converts window-relative pixel coordinates into normalized device
//! coordinates with a bottom-left origin, and carries the button state in
//! an X11-style modifier mask.

use crate::viewport::ZoomDirection;
use glam::Vec2;

/// Button/modifier bitmask, laid out like the X11 pointer state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonMask(pub u32);

impl ButtonMask {
    pub const NONE: Self = Self(0);
    pub const BUTTON1: Self = Self(1 << 8);
    pub const BUTTON2: Self = Self(1 << 9);
    pub const BUTTON3: Self = Self(1 << 10);

    /// Button that drags the view
    pub const PAN: Self = Self::BUTTON1;

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn set(&mut self, other: Self, pressed: bool) {
        if pressed {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }
}

/// Fixed pixel dimensions of the viewer window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Pointer query result: pixel position relative to the window origin
/// (top-left) plus the current button mask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawPointer {
    pub x: i32,
    pub y: i32,
    pub buttons: ButtonMask,
}

/// Pointer position in NDC and whether the pan button is held
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub position: Vec2,
    pub pan_active: bool,
}

/// Stateless pixel -> NDC converter for a window of known size
#[derive(Debug, Clone, Copy)]
pub struct PointerSampler {
    screen: ScreenSize,
}

impl PointerSampler {
    pub fn new(screen: ScreenSize) -> Self {
        debug_assert!(screen.is_valid(), "window size must be non-zero");
        Self { screen }
    }

    /// Map a raw pointer query to NDC.
    ///
    /// Positions past the window edge are not clamped.
    pub fn sample(&self, raw: RawPointer) -> PointerSample {
        let x = raw.x as f32 * 2.0 / self.screen.width as f32 - 1.0;
        let y = 1.0 - raw.y as f32 * 2.0 / self.screen.height as f32;

        PointerSample {
            position: Vec2::new(x, y),
            pan_active: raw.buttons.contains(ButtonMask::PAN),
        }
    }
}

/// Pixel scroll distance treated as one wheel line
pub const PIXELS_PER_LINE: f32 = 40.0;

/// Turns wheel motion into discrete zoom notches.
///
/// Classic wheels report whole lines and map one-to-one. Smooth sources
/// (touchpads, high-resolution wheels) report fractions, which add up until
/// a whole line has been scrolled. Reversing direction drops the remainder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollAccumulator {
    pending: f32,
}

impl ScrollAccumulator {
    // Absorbs f32 drift when fractions sum to a whole line
    const SLACK: f32 = 1e-4;

    /// Feed a vertical delta in lines (positive = away from the user).
    /// Returns the notch direction and how many notches completed.
    pub fn push_lines(&mut self, lines: f32) -> Option<(ZoomDirection, u32)> {
        if !lines.is_finite() || lines == 0.0 {
            return None;
        }
        if self.pending != 0.0 && self.pending.signum() != lines.signum() {
            self.pending = 0.0;
        }
        self.pending += lines;

        let whole = (self.pending + Self::SLACK * self.pending.signum()).trunc();
        if whole == 0.0 {
            return None;
        }
        self.pending -= whole;
        if self.pending.abs() < Self::SLACK {
            self.pending = 0.0;
        }

        let direction = if whole > 0.0 {
            ZoomDirection::In
        } else {
            ZoomDirection::Out
        };
        Some((direction, whole.abs() as u32))
    }

    pub fn push_pixels(&mut self, pixels: f32) -> Option<(ZoomDirection, u32)> {
        self.push_lines(pixels / PIXELS_PER_LINE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler() -> PointerSampler {
        PointerSampler::new(ScreenSize::new(1920, 1080))
    }

    fn at(x: i32, y: i32) -> RawPointer {
        RawPointer {
            x,
            y,
            buttons: ButtonMask::NONE,
        }
    }

    #[test]
    fn test_corners_and_center() {
        let s = sampler();
        assert_eq!(s.sample(at(0, 0)).position, Vec2::new(-1.0, 1.0));
        assert_eq!(s.sample(at(1920, 1080)).position, Vec2::new(1.0, -1.0));
        assert_eq!(s.sample(at(960, 540)).position, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_y_axis_is_flipped() {
        let s = sampler();
        let top = s.sample(at(960, 100)).position.y;
        let bottom = s.sample(at(960, 900)).position.y;
        assert!(top > 0.0);
        assert!(bottom < 0.0);
    }

    #[test]
    fn test_outside_window_is_not_clamped() {
        let s = sampler();
        let p = s.sample(at(-960, 2160)).position;
        assert_eq!(p, Vec2::new(-2.0, -3.0));
    }

    #[test]
    fn test_pan_button_detection() {
        let s = sampler();
        let mut buttons = ButtonMask::NONE;
        assert!(!s.sample(RawPointer { x: 1, y: 1, buttons }).pan_active);

        buttons.set(ButtonMask::BUTTON3, true);
        assert!(!s.sample(RawPointer { x: 1, y: 1, buttons }).pan_active);

        buttons.set(ButtonMask::BUTTON1, true);
        assert!(s.sample(RawPointer { x: 1, y: 1, buttons }).pan_active);

        buttons.set(ButtonMask::BUTTON1, false);
        assert!(!s.sample(RawPointer { x: 1, y: 1, buttons }).pan_active);
        assert!(buttons.contains(ButtonMask::BUTTON3));
    }

    #[test]
    fn test_wheel_lines_map_to_notches() {
        let mut scroll = ScrollAccumulator::default();
        assert_eq!(scroll.push_lines(1.0), Some((ZoomDirection::In, 1)));
        assert_eq!(scroll.push_lines(-1.0), Some((ZoomDirection::Out, 1)));
        assert_eq!(scroll.push_lines(-3.0), Some((ZoomDirection::Out, 3)));
        assert_eq!(scroll.push_lines(0.0), None);
        assert_eq!(scroll.push_lines(f32::NAN), None);
    }

    #[test]
    fn test_smooth_scroll_adds_up_to_one_notch() {
        let mut scroll = ScrollAccumulator::default();
        let mut notches = 0;
        for _ in 0..20 {
            if let Some((direction, count)) = scroll.push_lines(0.05) {
                assert_eq!(direction, ZoomDirection::In);
                notches += count;
            }
        }
        assert_eq!(notches, 1);
        assert_eq!(scroll.push_lines(0.01), None);
    }

    #[test]
    fn test_reversal_drops_remainder() {
        let mut scroll = ScrollAccumulator::default();
        assert_eq!(scroll.push_lines(0.9), None);
        assert_eq!(scroll.push_lines(-0.5), None);
        assert_eq!(scroll.push_lines(-0.5), Some((ZoomDirection::Out, 1)));
    }

    #[test]
    fn test_pixel_scroll_uses_line_height() {
        let mut scroll = ScrollAccumulator::default();
        assert_eq!(scroll.push_pixels(PIXELS_PER_LINE / 2.0), None);
        assert_eq!(scroll.push_pixels(PIXELS_PER_LINE / 2.0), Some((ZoomDirection::In, 1)));
        assert_eq!(scroll.push_pixels(-2.5 * PIXELS_PER_LINE), Some((ZoomDirection::Out, 2)));
    }
}
