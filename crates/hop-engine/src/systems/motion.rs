//! The per-step state machine: walls, integration, probes, commit.

use glam::Vec2;

use crate::api::collaborators::Collaborators;
use crate::api::hooks::MotionHooks;
use crate::api::types::KNOCK_AWAY_TRIGGER;
use crate::components::body::KinematicBody;
use crate::components::object::PhysicsObject;
use crate::components::state::{DespawnReason, KnockAwayType, MovementMode, ObjectState, StepOutcome};
use crate::core::query::SpatialQuery;
use crate::systems::debug::RayLog;
use crate::systems::integrator::{step_horizontal, step_vertical};
use crate::systems::probe::{Probe, ProbeFilter, ProbeHit};

fn filter_for(body: &KinematicBody) -> ProbeFilter {
    ProbeFilter {
        owner: body.id,
        object_collision: body.config.check_object_collision,
    }
}

fn probe_at<'a>(query: &'a dyn SpatialQuery, body: &KinematicBody, pos: Vec2, rays: &'a mut RayLog) -> Probe<'a> {
    Probe::new(query, filter_for(body), body.bounds_at(pos), rays)
}

/// Advance one object by `dt`.
///
/// Order: wall check, vertical then horizontal integration, floor/ceiling/
/// lava/ledge probes, facing, commit, water and lava-submersion checks,
/// throw spin.
pub fn update_position(obj: &mut PhysicsObject, query: &dyn SpatialQuery, dt: f32) -> StepOutcome {
    let PhysicsObject { body, hooks, collab, rays, .. } = obj;
    let hooks: &mut dyn MotionHooks = &mut **hooks;
    rays.clear();

    if body.carried || (body.movement == MovementMode::Still && body.state != ObjectState::KnockedAway) {
        return StepOutcome::Continue;
    }
    if body.state == ObjectState::KnockedAway && body.knock_away_type == KnockAwayType::Animation {
        return StepOutcome::Continue;
    }
    debug_assert!(body.velocity.x >= 0.0, "horizontal velocity is a speed");
    body.moved_externally = false;
    let mut pos = body.pos;

    if body.state != ObjectState::KnockedAway && body.velocity.x != 0.0 {
        let direction = body.direction();
        check_walls(body, hooks, rays, query, pos, direction, dt);
    }

    if matches!(body.state, ObjectState::Falling | ObjectState::KnockedAway | ObjectState::OnLava) {
        let sink = (body.state == ObjectState::OnLava && body.config.force_sink_in_lava)
            .then_some(body.config.sink_speed);
        let step = step_vertical(pos, body.velocity.y, body.peak_height, body.gravity, sink, dt);
        pos = step.pos;
        body.velocity.y = step.velocity_y;
        body.peak_height = step.peak_height;
    }

    let grounded = body.state == ObjectState::Grounded;
    pos = step_horizontal(pos, body.velocity.x, body.moving_left, grounded, body.floor_angle, dt);
    if grounded {
        body.velocity.y = 0.0;
    }

    let passes = if body.config.repeat_probe_pass { 2 } else { 1 };
    for _ in 0..passes {
        if matches!(body.state, ObjectState::KnockedAway | ObjectState::OnLava) {
            break;
        }
        probe_surroundings(body, hooks, collab, rays, query, &mut pos, dt);
    }

    if body.config.flip_object {
        body.appearance.face(body.moving_left);
    }

    if body.moved_externally {
        log::trace!("{:?} moved during its step; keeping the external position", body.id);
    } else {
        body.pos = pos;
    }

    update_water(body, query);

    if body.state == ObjectState::OnLava && submerged(body, query) {
        log::debug!("{:?} sank below the lava surface", body.id);
        return StepOutcome::Despawn(DespawnReason::Submerged);
    }

    update_throw_spin(body, dt);
    StepOutcome::Continue
}

fn probe_surroundings(
    body: &mut KinematicBody,
    hooks: &mut dyn MotionHooks,
    collab: &Collaborators,
    rays: &mut RayLog,
    query: &dyn SpatialQuery,
    pos: &mut Vec2,
    dt: f32,
) {
    let spacing = body.config.floor_ray_spacing;
    if body.velocity.y <= 0.0 {
        let hit = probe_at(query, body, *pos, rays).floor(body.floor_mask, spacing, body.velocity.y, dt);
        match hit {
            Some(hit) => settle_on_floor(body, hooks, collab, pos, &hit),
            None if body.state != ObjectState::Falling => body.fall(),
            None => {}
        }
    }
    if body.velocity.y > 0.0 && body.config.ceiling_detection {
        let mask = body.floor_mask | body.wall_mask;
        let hit = probe_at(query, body, *pos, rays).ceiling(mask, spacing, body.velocity.y, dt);
        if let Some(hit) = hit {
            let half_height = body.bounds_at(*pos).half_height;
            pos.y = hit.point().y - half_height - body.config.bounds_offset.y;
            hooks.on_hit_ceiling(body);
        }
    }

    if body.config.lava_kill {
        let hit = probe_at(query, body, *pos, rays).lava(body.config.lava_mask, body.velocity.y, dt);
        if let Some(hit) = hit {
            log::debug!("{:?}: {:?} -> OnLava", body.id, body.state);
            body.state = ObjectState::OnLava;
            body.touched_lava = Some(hit.record.id);
            body.appearance.visible_outside_mask = true;
            body.link.restore();
        }
    }

    if body.config.dont_fall_off_ledges
        && body.state == ObjectState::Grounded
        && body.movement != MovementMode::Still
    {
        let direction = body.direction();
        let floor_ahead = probe_at(query, body, *pos, rays).ledge(body.floor_mask, direction);
        if floor_ahead.is_none() && !body.config.ignore_raycast_flip {
            body.flip();
        }
    }
}

/// Snap onto the struck floor, then bounce or land.
fn settle_on_floor(
    body: &mut KinematicBody,
    hooks: &mut dyn MotionHooks,
    collab: &Collaborators,
    pos: &mut Vec2,
    hit: &ProbeHit,
) {
    let half_height = body.bounds_at(*pos).half_height;
    pos.y = hit.point().y + half_height - body.config.bounds_offset.y;
    body.velocity.y = 0.0;

    let drop = body.peak_height - pos.y;
    if body.movement == MovementMode::Bouncing && drop >= body.config.min_height_to_bounce {
        body.floor_angle = 0.0;
        body.velocity.y = body.config.bounce_height;
        hooks.on_bounce(body);
    } else {
        body.floor_angle = hit.record.slope_angle().unwrap_or(0.0);
        hooks.on_land(body, collab, Some(hit.record.id));
    }
    body.peak_height = pos.y;
    body.link.settle_on(&hit.record);
}

/// Probe for a wall ahead of `pos` and run the wall hook on a hit.
///
/// Returns `false` on a miss or when the nearest thing ahead is a
/// knocked-away object.
pub fn check_walls(
    body: &mut KinematicBody,
    hooks: &mut dyn MotionHooks,
    rays: &mut RayLog,
    query: &dyn SpatialQuery,
    pos: Vec2,
    direction: f32,
    dt: f32,
) -> bool {
    let distance = body.velocity.x * dt;
    let spacing = body.config.wall_ray_spacing;
    let hit = probe_at(query, body, pos, rays).wall(body.wall_mask, spacing, direction.signum(), distance);
    let Some(hit) = hit else {
        return false;
    };
    if hit.record.peer.is_some_and(|peer| peer.knocked_away) {
        return false;
    }
    hooks.on_touch_wall(body, &hit.record);
    true
}

/// Fully inside water: float. Leaving water zeroes vertical speed once.
fn update_water(body: &mut KinematicBody, query: &dyn SpatialQuery) {
    if body.config.water_mask.is_empty() {
        return;
    }
    let bounds = body.bounds();
    let inside = query
        .overlapping(&bounds, body.config.water_mask)
        .iter()
        .any(|water| water.bounds.contains(&bounds));
    if inside {
        if !body.in_water {
            log::debug!("{:?} entered water", body.id);
        }
        body.in_water = true;
        body.velocity.y = 0.0;
    } else if body.in_water {
        log::debug!("{:?} left water", body.id);
        body.in_water = false;
        body.velocity.y = 0.0;
    }
}

/// The lava surface has risen past the object's top edge.
fn submerged(body: &KinematicBody, query: &dyn SpatialQuery) -> bool {
    let Some(lava) = body.touched_lava.and_then(|id| query.collider(id)) else {
        log::debug!("{:?}: touched lava is gone", body.id);
        return false;
    };
    lava.bounds.top() > body.pos.y + body.config.height.max(0.0) * 0.5
}

/// Thrown-object spin runs only while falling.
fn update_throw_spin(body: &mut KinematicBody, dt: f32) {
    if !body.appearance.spinning {
        return;
    }
    if body.state == ObjectState::Falling {
        body.appearance.rotation -= body.config.throw_rotate_speed * dt * body.direction();
    } else {
        body.appearance.spinning = false;
        body.appearance.rotation = 0.0;
    }
}

/// Launch the object out of play: velocity, gravity, sound, visual policy.
///
/// A no-op returning `false` when already knocked away.
pub fn knock_away(
    body: &mut KinematicBody,
    collab: &Collaborators,
    moving_left: bool,
    play_sound: bool,
    override_type: Option<KnockAwayType>,
    override_velocity: Option<Vec2>,
) -> bool {
    if body.state == ObjectState::KnockedAway {
        return false;
    }
    let velocity = override_velocity.unwrap_or(body.config.knock_away_velocity);
    body.velocity = Vec2::new(velocity.x.abs(), velocity.y);
    if let Some(gravity) = body.config.knock_away_gravity {
        body.gravity = gravity;
    }
    if play_sound {
        if let Some(sound) = body.config.knock_away_sound {
            collab.presentation.play_sound(body.id, sound);
        }
    }
    body.moving_left = moving_left;
    if let Some(kind) = override_type {
        body.knock_away_type = kind;
    }

    log::debug!("{:?}: {:?} -> KnockedAway ({:?})", body.id, body.state, body.knock_away_type);
    body.state = ObjectState::KnockedAway;
    body.floor_angle = 0.0;
    body.carried = false;
    body.link.carrier = None;
    body.link.restore();
    body.collider_enabled = false;
    body.appearance.rotation = 0.0;
    body.appearance.spinning = false;

    match body.knock_away_type {
        KnockAwayType::Flip => body.appearance.flip_y = true,
        KnockAwayType::Rotate => {}
        KnockAwayType::Animation => {
            collab.presentation.trigger_animation(body.id, KNOCK_AWAY_TRIGGER);
            body.movement = MovementMode::Still;
        }
    }

    let fade = body.config.knock_away_disappear_time;
    if fade > 0.0 {
        if body.appearance.has_sprite() {
            body.appearance.fade_time = Some(fade);
        } else {
            log::debug!("{:?}: no sprite to fade, waiting to leave the view", body.id);
        }
    }
    true
}
