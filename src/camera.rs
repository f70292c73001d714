use glam::Vec2;

/// Lagging follow camera. `offset` is the world position of the viewport's
/// top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub offset: Vec2,
    /// Fraction of the remaining distance covered per tick, in (0, 1].
    pub smoothing: f32,
}

impl Camera {
    pub fn new(smoothing: f32) -> Camera {
        Camera {
            offset: Vec2::ZERO,
            smoothing: smoothing.clamp(f32::EPSILON, 1.0),
        }
    }

    /// Offset that centers `focus` in the viewport, clamped so the viewport
    /// stays inside the world. A world smaller than the viewport pins to 0.
    pub fn desired_offset(focus: Vec2, viewport: Vec2, world: Vec2) -> Vec2 {
        let max = (world - viewport).max(Vec2::ZERO);
        (focus - viewport * 0.5).clamp(Vec2::ZERO, max)
    }

    /// Ease toward the desired offset for `focus`. Settles geometrically and
    /// never overshoots while `smoothing` stays within (0, 1].
    pub fn retarget(&mut self, focus: Vec2, viewport: Vec2, world: Vec2) {
        let desired = Camera::desired_offset(focus, viewport, world);
        self.offset += (desired - self.offset) * self.smoothing;
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.offset
    }
}
