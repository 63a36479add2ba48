//! Carrying, dropping and throwing, plus thrown-object impacts.

use glam::Vec2;

use crate::api::collaborators::Collaborators;
use crate::components::body::KinematicBody;
use crate::components::config::PROBE_SKIN;
use crate::components::state::{ObjectState, ThrowVisual};
use crate::core::bounds::Bounds;

/// Below this speed on both axes a thrown object hits nothing.
pub const MIN_IMPACT_SPEED: f32 = 1.0;
/// Horizontal speed from which the throw direction decides the knock direction.
pub const HORIZONTAL_IMPACT_SPEED: f32 = 0.25;

/// Picked up: the integrator stops and the collider goes away.
pub fn get_carried(body: &mut KinematicBody) {
    body.carried = true;
    body.collider_enabled = false;
    body.appearance.spinning = false;
    body.appearance.render_order = body.config.carried_render_order;
    log::debug!("{:?} picked up", body.id);
}

fn release(body: &mut KinematicBody) {
    body.carried = false;
    body.link.carrier = None;
    body.collider_enabled = body.config.has_collider;
    body.appearance.render_order = body.appearance.resting_render_order;
    body.state = ObjectState::Falling;
    body.floor_angle = 0.0;
    body.peak_height = body.pos.y;
}

/// Set down facing `moving_left`, at rest.
pub fn get_dropped(body: &mut KinematicBody, moving_left: bool) {
    release(body);
    body.velocity = Vec2::ZERO;
    body.moving_left = moving_left;
    log::debug!("{:?} dropped", body.id);
}

/// Launch along the throw vector and start a shell chain.
pub fn get_thrown(body: &mut KinematicBody, collab: &Collaborators, facing_right: bool) {
    release(body);
    let throw = body.config.throw_velocity;
    body.velocity = Vec2::new(throw.x.abs(), throw.y);
    body.moving_left = !facing_right;
    body.has_been_thrown = true;
    if body.config.throw_visual == ThrowVisual::RotateSprite {
        body.appearance.spinning = true;
    }
    collab.combo.start_shell_chain();
    log::debug!("{:?} thrown, facing right: {}", body.id, facing_right);
}

/// Box a thrown object sweeps this step, grown by its travel plus probe skin.
pub fn contact_bounds(body: &KinematicBody, dt: f32) -> Bounds {
    let b = body.bounds();
    Bounds::from_center(
        b.center,
        b.half_width + body.velocity.x * dt + PROBE_SKIN,
        b.half_height + body.velocity.y.abs() * dt + PROBE_SKIN,
    )
}

/// Direction (`moving_left`) `target` should be knocked in when `thrower` hits it,
/// or `None` if the hit doesn't count.
pub fn thrown_impact(thrower: &KinematicBody, target: &KinematicBody) -> Option<bool> {
    if !thrower.has_been_thrown || thrower.carried || thrower.is_knocked_away() {
        return None;
    }
    if !target.config.combat_capable || target.is_knocked_away() || target.carried {
        return None;
    }
    let speed_x = thrower.velocity.x.abs();
    let speed_y = thrower.velocity.y.abs();
    if speed_x < MIN_IMPACT_SPEED && speed_y < MIN_IMPACT_SPEED {
        return None;
    }
    if speed_x >= HORIZONTAL_IMPACT_SPEED {
        Some(thrower.moving_left)
    } else {
        Some(thrower.pos.x > target.pos.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::collaborators::CollaboratorEvent;
    use crate::api::types::EntityId;
    use crate::components::config::PhysicsConfig;

    fn body(id: u32, x: f32) -> KinematicBody {
        KinematicBody::new(EntityId(id), Vec2::new(x, 1.0), PhysicsConfig::default().carryable())
    }

    #[test]
    fn carrying_raises_render_order_and_drops_restore_it() {
        let mut b = body(1, 0.0);
        get_carried(&mut b);
        assert!(b.is_carried());
        assert!(!b.collider_enabled);
        assert_eq!(b.appearance().render_order, 100);

        get_dropped(&mut b, false);
        assert!(!b.is_carried());
        assert!(b.collider_enabled);
        assert_eq!(b.appearance().render_order, 0);
        assert_eq!(b.velocity(), Vec2::ZERO);
        assert!(!b.moving_left());
        assert_eq!(b.state(), ObjectState::Falling);
    }

    #[test]
    fn throwing_starts_a_shell_chain() {
        let (collab, log) = Collaborators::recording();
        let mut b = body(1, 0.0);
        b.config.throw_visual = ThrowVisual::RotateSprite;
        get_carried(&mut b);
        get_thrown(&mut b, &collab, true);
        assert_eq!(b.velocity(), Vec2::new(12.0, 10.0));
        assert!(!b.moving_left());
        assert!(b.has_been_thrown());
        assert!(b.appearance().spinning);
        assert_eq!(log.events(), vec![CollaboratorEvent::ShellChainStarted]);
    }

    #[test]
    fn fast_horizontal_throw_knocks_along_travel() {
        let mut shell = body(1, 5.0);
        shell.has_been_thrown = true;
        shell.velocity = Vec2::new(12.0, 0.0);
        shell.moving_left = true;
        let enemy = body(2, 0.0);
        assert_eq!(thrown_impact(&shell, &enemy), Some(true));
    }

    #[test]
    fn vertical_drop_knocks_away_from_thrower() {
        let mut shell = body(1, 0.0);
        shell.has_been_thrown = true;
        shell.velocity = Vec2::new(0.1, -6.0);
        let left_enemy = body(2, -0.3);
        let right_enemy = body(3, 0.3);
        assert_eq!(thrown_impact(&shell, &left_enemy), Some(true));
        assert_eq!(thrown_impact(&shell, &right_enemy), Some(false));
    }

    #[test]
    fn slow_or_unthrown_objects_do_not_hit() {
        let mut shell = body(1, 0.0);
        let enemy = body(2, 1.0);
        shell.velocity = Vec2::new(12.0, 0.0);
        assert_eq!(thrown_impact(&shell, &enemy), None);

        shell.has_been_thrown = true;
        shell.velocity = Vec2::new(0.5, 0.5);
        assert_eq!(thrown_impact(&shell, &enemy), None);
    }

    #[test]
    fn non_combat_targets_are_skipped() {
        let mut shell = body(1, 0.0);
        shell.has_been_thrown = true;
        shell.velocity = Vec2::new(12.0, 0.0);
        let mut coin = body(2, 1.0);
        coin.config.combat_capable = false;
        assert_eq!(thrown_impact(&shell, &coin), None);
    }
}
