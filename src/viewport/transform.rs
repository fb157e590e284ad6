//! View transform value type

use glam::Vec2;

/// Lower bound for [`Transform::zoom`]
pub const MIN_ZOOM: f32 = 0.001;

/// Pan offset and zoom scale applied to the screenshot quad.
///
/// A content point `w` lands on screen at `w * zoom + pan` (NDC).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation in NDC units
    pub pan: Vec2,
    /// Uniform scale around the NDC origin, never below [`MIN_ZOOM`]
    pub zoom: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        pan: Vec2::ZERO,
        zoom: 1.0,
    };

    /// Content point currently shown at `screen`
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.pan) / self.zoom
    }

    /// Screen position of the content point `world`
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world * self.zoom + self.pan
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Direction of one scroll notch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Sign applied to the proportional zoom step (`In` grows, `Out` shrinks)
    pub fn step_sign(self) -> f32 {
        match self {
            ZoomDirection::In => -1.0,
            ZoomDirection::Out => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_maps_points_to_themselves() {
        let tf = Transform::default();
        let p = Vec2::new(0.25, -0.75);
        assert_eq!(tf.screen_to_world(p), p);
        assert_eq!(tf.world_to_screen(p), p);
    }

    #[test]
    fn test_screen_world_inverse() {
        let tf = Transform {
            pan: Vec2::new(0.5, -0.25),
            zoom: 4.0,
        };
        let screen = Vec2::new(-0.3, 0.9);
        let back = tf.world_to_screen(tf.screen_to_world(screen));
        assert!((back - screen).length() < 1e-6);
    }

    #[test]
    fn test_step_sign() {
        assert_eq!(ZoomDirection::In.step_sign(), -1.0);
        assert_eq!(ZoomDirection::Out.step_sign(), 1.0);
    }
}
