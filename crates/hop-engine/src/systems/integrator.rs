//! Position integration: horizontal travel with slope projection, vertical
//! travel with gravity or lava sinking.

use glam::Vec2;

/// Unit travel direction on a surface tilted by `floor_angle` degrees.
pub fn slope_direction(moving_left: bool, floor_angle: f32) -> Vec2 {
    let base = if moving_left { Vec2::NEG_X } else { Vec2::X };
    if floor_angle == 0.0 {
        return base;
    }
    Vec2::from_angle(floor_angle.to_radians()).rotate(base)
}

/// Horizontal step. Slope projection only applies while grounded.
pub fn step_horizontal(pos: Vec2, speed: f32, moving_left: bool, grounded: bool, floor_angle: f32, dt: f32) -> Vec2 {
    let angle = if grounded { floor_angle } else { 0.0 };
    pos + slope_direction(moving_left, angle) * speed * dt
}

/// Result of one vertical step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalStep {
    pub pos: Vec2,
    pub velocity_y: f32,
    pub peak_height: f32,
}

/// Vertical step for airborne, knocked-away and on-lava objects.
///
/// Moves by the current velocity, then updates it: `sink` overwrites it with
/// `-sink * dt`; otherwise gravity accumulates.
pub fn step_vertical(pos: Vec2, velocity_y: f32, peak_height: f32, gravity: f32, sink: Option<f32>, dt: f32) -> VerticalStep {
    let pos = Vec2::new(pos.x, pos.y + velocity_y * dt);
    let peak_height = peak_height.max(pos.y);
    let velocity_y = match sink {
        Some(sink_speed) => -sink_speed * dt,
        None => velocity_y - gravity * dt,
    };
    VerticalStep { pos, velocity_y, peak_height }
}
