use glam::Vec2;

use crate::api::collaborators::Collaborators;
use crate::api::types::{ColliderId, EntityId};
use crate::components::appearance::Appearance;
use crate::components::config::PhysicsConfig;
use crate::components::state::{KnockAwayType, MovementMode, ObjectState, UpdateMode};
use crate::core::bounds::Bounds;
use crate::core::layers::LayerMask;
use crate::core::query::PeerFlags;
use crate::systems::platform::PlatformLink;

/// Mutable simulation state of one physics object.
///
/// Velocity `x` is always a non-negative speed; the travel direction lives in
/// `moving_left`. Use [`KinematicBody::real_velocity`] for the signed vector.
#[derive(Debug, Clone)]
pub struct KinematicBody {
    pub(crate) id: EntityId,
    pub(crate) config: PhysicsConfig,
    pub(crate) pos: Vec2,
    /// Position before the last fixed step, for interpolated rendering.
    pub(crate) prev_pos: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) moving_left: bool,
    pub(crate) gravity: f32,
    pub(crate) state: ObjectState,
    pub(crate) movement: MovementMode,
    pub(crate) paused_movement: Option<MovementMode>,
    pub(crate) knock_away_type: KnockAwayType,
    /// Degrees, non-zero only while grounded on a slope.
    pub(crate) floor_angle: f32,
    pub(crate) peak_height: f32,
    pub(crate) carried: bool,
    pub(crate) has_been_thrown: bool,
    pub(crate) update_mode: UpdateMode,
    pub(crate) floor_mask: LayerMask,
    pub(crate) wall_mask: LayerMask,
    pub(crate) collider: Option<ColliderId>,
    pub(crate) collider_enabled: bool,
    /// Surface the object last landed on.
    pub(crate) ground: Option<ColliderId>,
    pub(crate) touched_lava: Option<ColliderId>,
    pub(crate) in_water: bool,
    pub(crate) link: PlatformLink,
    pub(crate) appearance: Appearance,
    /// Set by `set_position`; the integrator result is dropped for the step.
    pub(crate) moved_externally: bool,
    /// Per-frame objects skip their first frame.
    pub(crate) first_frame: bool,
    pub(crate) interpolation_available: bool,
}

impl KinematicBody {
    pub fn new(id: EntityId, pos: Vec2, config: PhysicsConfig) -> Self {
        Self {
            id,
            pos,
            prev_pos: pos,
            velocity: config.velocity,
            moving_left: config.moving_left,
            gravity: config.gravity,
            state: config.initial_state,
            movement: config.movement,
            paused_movement: None,
            knock_away_type: config.knock_away_type,
            floor_angle: 0.0,
            peak_height: pos.y,
            carried: false,
            has_been_thrown: false,
            update_mode: config.update_mode,
            floor_mask: config.floor_mask,
            wall_mask: config.wall_mask,
            collider: None,
            collider_enabled: config.has_collider,
            ground: None,
            touched_lava: None,
            in_water: false,
            link: PlatformLink::default(),
            appearance: Appearance::default(),
            moved_externally: false,
            first_frame: true,
            interpolation_available: true,
            config,
        }
    }

    // -- Accessors --

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    /// Stored velocity: `x` is a speed, see [`Self::moving_left`].
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Signed velocity in world space.
    pub fn real_velocity(&self) -> Vec2 {
        let x = if self.moving_left { -self.velocity.x } else { self.velocity.x };
        Vec2::new(x, self.velocity.y)
    }

    pub fn moving_left(&self) -> bool {
        self.moving_left
    }

    pub fn direction(&self) -> f32 {
        if self.moving_left { -1.0 } else { 1.0 }
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn state(&self) -> ObjectState {
        self.state
    }

    pub fn movement(&self) -> MovementMode {
        self.movement
    }

    pub fn knock_away_type(&self) -> KnockAwayType {
        self.knock_away_type
    }

    pub fn floor_angle(&self) -> f32 {
        self.floor_angle
    }

    pub fn peak_height(&self) -> f32 {
        self.peak_height
    }

    pub fn is_carried(&self) -> bool {
        self.carried
    }

    pub fn has_been_thrown(&self) -> bool {
        self.has_been_thrown
    }

    pub fn update_mode(&self) -> UpdateMode {
        self.update_mode
    }

    pub fn collider(&self) -> Option<ColliderId> {
        self.collider
    }

    pub fn collider_enabled(&self) -> bool {
        self.collider.is_some() && self.collider_enabled
    }

    pub fn ground(&self) -> Option<ColliderId> {
        self.ground
    }

    pub fn touched_lava(&self) -> Option<ColliderId> {
        self.touched_lava
    }

    pub fn in_water(&self) -> bool {
        self.in_water
    }

    pub fn link(&self) -> &PlatformLink {
        &self.link
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    pub fn is_knocked_away(&self) -> bool {
        self.state == ObjectState::KnockedAway
    }

    /// Probing rectangle at the current position.
    pub fn bounds(&self) -> Bounds {
        self.bounds_at(self.pos)
    }

    /// Probing rectangle the object would have at `pos`.
    pub fn bounds_at(&self, pos: Vec2) -> Bounds {
        Bounds::compute(pos, self.config.size(), self.config.bounds_offset, self.config.size_padding)
    }

    /// Flags other objects' probes consult before counting a hit on this one.
    pub fn peer_flags(&self) -> PeerFlags {
        PeerFlags {
            object_collision: self.config.check_object_collision,
            knocked_away: self.is_knocked_away(),
        }
    }

    // -- Public contract --

    /// Move the object. Takes precedence over the integrator for the current step.
    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
        self.moved_externally = true;
    }

    /// Set the horizontal speed. A negative value reverses the direction.
    pub fn set_x_velocity(&mut self, vx: f32) {
        if vx < 0.0 {
            self.velocity.x = -vx;
            self.moving_left = !self.moving_left;
        } else {
            self.velocity.x = vx;
        }
    }

    pub fn set_y_velocity(&mut self, vy: f32) {
        self.velocity.y = vy;
    }

    /// Set velocity from a signed world-space vector.
    pub fn set_real_velocity(&mut self, velocity: Vec2) {
        if velocity.x != 0.0 {
            self.moving_left = velocity.x < 0.0;
        }
        self.velocity = Vec2::new(velocity.x.abs(), velocity.y);
    }

    pub fn flip(&mut self) {
        self.moving_left = !self.moving_left;
    }

    pub fn set_direction(&mut self, moving_left: bool) {
        self.moving_left = moving_left;
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }

    pub fn set_knock_away_type(&mut self, kind: KnockAwayType) {
        self.knock_away_type = kind;
    }

    pub fn set_movement(&mut self, movement: MovementMode) {
        self.movement = movement;
    }

    /// Leave the ground: stop vertical motion and drop any platform attachment.
    pub fn fall(&mut self) {
        if self.state != ObjectState::Falling {
            log::debug!("{:?}: {:?} -> Falling", self.id, self.state);
        }
        self.velocity.y = 0.0;
        self.state = ObjectState::Falling;
        self.floor_angle = 0.0;
        self.ground = None;
        self.link.restore();
    }

    /// Come to rest on `surface`. Ends a throw and its shell chain.
    pub fn land(&mut self, collab: &Collaborators, surface: Option<ColliderId>) {
        if self.has_been_thrown {
            collab.combo.end_shell_chain();
            self.has_been_thrown = false;
        }
        if self.appearance.spinning {
            self.appearance.spinning = false;
            self.appearance.rotation = 0.0;
        }
        if self.state != ObjectState::Grounded {
            log::debug!("{:?}: {:?} -> Grounded", self.id, self.state);
        }
        self.state = ObjectState::Grounded;
        self.ground = surface;
        if self.config.stop_after_land {
            self.velocity.x = 0.0;
        }
    }

    /// Freeze in place, remembering the current movement mode.
    pub fn pause(&mut self) {
        if self.paused_movement.is_none() {
            self.paused_movement = Some(self.movement);
            self.movement = MovementMode::Still;
        }
    }

    pub fn resume(&mut self) {
        if let Some(movement) = self.paused_movement.take() {
            self.movement = movement;
        }
    }

    /// Drop straight through everything: no velocity, no floor or walls.
    pub fn fall_straight_down(&mut self) {
        self.velocity = Vec2::ZERO;
        self.floor_mask = LayerMask::NONE;
        self.wall_mask = LayerMask::NONE;
        self.movement = MovementMode::Sliding;
        self.fall();
    }
}
