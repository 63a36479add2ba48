use glam::Vec2;
use serde::Serialize;

/// Sprite-side state of an object. The simulation writes it; a renderer reads it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appearance {
    /// Scale captured at init; facing flips only change the sign of `x`.
    pub baseline_scale: Vec2,
    pub scale: Vec2,
    /// Degrees.
    pub rotation: f32,
    pub flip_y: bool,
    pub alpha: f32,
    pub render_order: i32,
    /// Order restored after being carried.
    pub resting_render_order: i32,
    /// Drawn outside the lava mask once the object touches lava.
    pub visible_outside_mask: bool,
    /// Thrown-object spin is active.
    pub spinning: bool,
    /// `None` when the object has no sprite; fading is then skipped.
    pub sprite_center_offset: Option<Vec2>,
    /// Seconds of fade-out remaining to distribute, if fading.
    pub fade_time: Option<f32>,
}

impl Appearance {
    pub fn new(scale: Vec2, render_order: i32) -> Self {
        Self {
            baseline_scale: scale,
            scale,
            rotation: 0.0,
            flip_y: false,
            alpha: 1.0,
            render_order,
            resting_render_order: render_order,
            visible_outside_mask: false,
            spinning: false,
            sprite_center_offset: Some(Vec2::ZERO),
            fade_time: None,
        }
    }

    pub fn has_sprite(&self) -> bool {
        self.sprite_center_offset.is_some()
    }

    /// Face the sprite along the travel direction.
    /// Sprites are authored facing left, so moving right mirrors them.
    pub fn face(&mut self, moving_left: bool) {
        let x = self.baseline_scale.x;
        self.scale.x = if moving_left { x } else { -x };
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Self::new(Vec2::ONE, 0)
    }
}
