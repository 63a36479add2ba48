//! Per-entity customization points of the motion step.
//!
//! Specialized entities implement [`MotionHooks`] and override only what they
//! need; the free functions here are the stock behaviour and can be called
//! from an override to extend rather than replace it.

use crate::api::collaborators::Collaborators;
use crate::api::types::ColliderId;
use crate::components::body::KinematicBody;
use crate::core::query::ColliderRecord;

pub trait MotionHooks {
    /// The object bounced off the floor. `velocity.y` already holds the bounce speed.
    fn on_bounce(&mut self, body: &mut KinematicBody) {
        on_bounce(body);
    }

    /// A wall probe struck `wall`.
    fn on_touch_wall(&mut self, body: &mut KinematicBody, wall: &ColliderRecord) {
        on_touch_wall(body, wall);
    }

    /// A ceiling probe struck something while rising.
    fn on_hit_ceiling(&mut self, body: &mut KinematicBody) {
        on_hit_ceiling(body);
    }

    /// The floor probe settled the object on `surface`.
    fn on_land(&mut self, body: &mut KinematicBody, collab: &Collaborators, surface: Option<ColliderId>) {
        on_land(body, collab, surface);
    }
}

/// Hooks with every default left in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHooks;

impl MotionHooks for DefaultHooks {}

pub fn on_bounce(body: &mut KinematicBody) {
    log::trace!("{:?} bounced at vy {}", body.id(), body.velocity().y);
}

/// Turn around, or stop dead when wall bouncing is off.
pub fn on_touch_wall(body: &mut KinematicBody, wall: &ColliderRecord) {
    log::trace!("{:?} touched wall {:?}", body.id(), wall.id);
    if body.config().bounce_off_walls {
        if !body.config().ignore_raycast_flip {
            body.flip();
        }
    } else {
        body.set_x_velocity(0.0);
    }
}

/// Soft bounce: reverse and halve vertical speed.
pub fn on_hit_ceiling(body: &mut KinematicBody) {
    let vy = body.velocity().y;
    body.set_y_velocity(-vy * 0.5);
}

pub fn on_land(body: &mut KinematicBody, collab: &Collaborators, surface: Option<ColliderId>) {
    body.land(collab, surface);
}
