use glam::Vec2;
use serde::Serialize;

use crate::api::collaborators::Collaborators;
use crate::api::hooks::{DefaultHooks, MotionHooks};
use crate::api::types::{ColliderId, EntityId};
use crate::components::body::KinematicBody;
use crate::components::config::PhysicsConfig;
use crate::components::state::{KnockAwayType, MovementMode, ObjectState, StepOutcome, UpdateMode};
use crate::core::query::SpatialQuery;
use crate::core::time::clamp_frame_dt;
use crate::systems::debug::RayLog;
use crate::systems::platform::PlatformLink;
use crate::systems::{carry, motion, visuals};

/// A dynamic level object driven by the kinematic step: enemy, item, shell.
///
/// Owns its [`KinematicBody`], the hooks specializing it and the collaborator
/// handles it reports to.
pub struct PhysicsObject {
    pub body: KinematicBody,
    pub(crate) hooks: Box<dyn MotionHooks>,
    pub(crate) collab: Collaborators,
    pub(crate) rays: RayLog,
    pub(crate) tag: String,
    pub(crate) initialized: bool,
}

impl PhysicsObject {
    pub fn new(id: EntityId, pos: Vec2, config: PhysicsConfig) -> Self {
        Self {
            body: KinematicBody::new(id, pos, config),
            hooks: Box::new(DefaultHooks),
            collab: Collaborators::default(),
            rays: RayLog::new(),
            tag: String::new(),
            initialized: false,
        }
    }

    // -- Builder pattern --

    pub fn with_hooks(mut self, hooks: impl MotionHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub fn with_collaborators(mut self, collab: Collaborators) -> Self {
        self.collab = collab;
        self
    }

    /// Parent the object starts under; restored whenever it leaves a platform.
    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.body.link = PlatformLink::new(Some(parent));
        self
    }

    /// Whether an interpolation backend exists for `UpdateMode::Interpolated`.
    pub fn with_interpolation(mut self, available: bool) -> Self {
        self.body.interpolation_available = available;
        self
    }

    pub fn without_sprite(mut self) -> Self {
        self.body.appearance.sprite_center_offset = None;
        self
    }

    /// Sprite centre relative to the object position, the pivot for centred rotation.
    pub fn with_sprite_center(mut self, offset: Vec2) -> Self {
        self.body.appearance.sprite_center_offset = Some(offset);
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.body.appearance.scale = scale;
        self
    }

    pub fn with_render_order(mut self, order: i32) -> Self {
        self.body.appearance.render_order = order;
        self.body.appearance.resting_render_order = order;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    // -- Setup --

    /// One-time setup: capture baseline scale, peak height and original parent,
    /// and downgrade update modes the environment can't support.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        let body = &mut self.body;
        body.appearance.baseline_scale = body.appearance.scale;
        body.peak_height = body.pos.y;
        body.prev_pos = body.pos;
        body.link = PlatformLink::new(body.link.original_parent);

        if body.update_mode == UpdateMode::Interpolated {
            if !body.interpolation_available {
                log::warn!("{:?}: interpolated updates need a smoothing backend; using fixed steps", body.id);
                body.update_mode = UpdateMode::FixedStep;
            } else if body.config.rotate_around_center {
                log::warn!("{:?}: centred rotation can't be interpolated; using fixed steps", body.id);
                body.update_mode = UpdateMode::FixedStep;
            }
        }
        if body.collider.is_none() {
            log::debug!("{:?}: no collider, collider toggling disabled", body.id);
        }
        if !body.appearance.has_sprite() {
            log::debug!("{:?}: no sprite, fade-out disabled", body.id);
        }
        if body.config.flip_object {
            body.appearance.face(body.moving_left);
        }
        self.initialized = true;
    }

    pub(crate) fn attach_collider(&mut self, collider: ColliderId) {
        self.body.collider = Some(collider);
    }

    // -- Accessors --

    pub fn id(&self) -> EntityId {
        self.body.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn position(&self) -> Vec2 {
        self.body.pos
    }

    pub fn state(&self) -> ObjectState {
        self.body.state
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collab
    }

    /// Rays cast during the last step.
    pub fn debug_rays(&self) -> &RayLog {
        &self.rays
    }

    /// Where to draw the object, `alpha` of the way from the previous fixed step.
    pub fn render_position(&self, alpha: f32) -> Vec2 {
        match self.body.update_mode {
            UpdateMode::Interpolated => self.body.prev_pos.lerp(self.body.pos, alpha.clamp(0.0, 1.0)),
            _ => self.body.pos,
        }
    }

    // -- Public contract --

    pub fn fall(&mut self) {
        self.body.fall();
    }

    pub fn land(&mut self, surface: Option<ColliderId>) {
        self.hooks.on_land(&mut self.body, &self.collab, surface);
    }

    /// Launch the object out of play. Returns `false` if it already was knocked away.
    pub fn knock_away(
        &mut self,
        moving_left: bool,
        play_sound: bool,
        override_type: Option<KnockAwayType>,
        override_velocity: Option<Vec2>,
    ) -> bool {
        motion::knock_away(&mut self.body, &self.collab, moving_left, play_sound, override_type, override_velocity)
    }

    pub fn get_carried(&mut self) {
        carry::get_carried(&mut self.body);
    }

    pub fn get_dropped(&mut self, moving_left: bool) {
        carry::get_dropped(&mut self.body, moving_left);
    }

    pub fn get_thrown(&mut self, facing_right: bool) {
        carry::get_thrown(&mut self.body, &self.collab, facing_right);
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.body.set_position(pos);
    }

    pub fn set_x_velocity(&mut self, vx: f32) {
        self.body.set_x_velocity(vx);
    }

    pub fn set_y_velocity(&mut self, vy: f32) {
        self.body.set_y_velocity(vy);
    }

    pub fn flip(&mut self) {
        self.body.flip();
    }

    pub fn set_direction(&mut self, moving_left: bool) {
        self.body.set_direction(moving_left);
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        self.body.set_gravity(gravity);
    }

    pub fn set_knock_away_type(&mut self, kind: KnockAwayType) {
        self.body.set_knock_away_type(kind);
    }

    pub fn pause(&mut self) {
        self.body.pause();
    }

    pub fn resume(&mut self) {
        self.body.resume();
    }

    pub fn fall_straight_down(&mut self) {
        self.body.fall_straight_down();
    }

    /// Probe for a wall ahead of `pos` in `direction` (-1 or 1), running the
    /// wall hook on a hit. Knocked-away objects don't count as walls.
    pub fn check_walls(&mut self, query: &dyn SpatialQuery, pos: Vec2, direction: f32, dt: f32) -> bool {
        motion::check_walls(&mut self.body, self.hooks.as_mut(), &mut self.rays, query, pos, direction, dt)
    }

    // -- Stepping --

    /// One fixed simulation step. Per-frame objects ignore it.
    pub fn fixed_update(&mut self, dt: f32, query: &dyn SpatialQuery) -> StepOutcome {
        if self.body.update_mode == UpdateMode::PerFrame {
            return StepOutcome::Continue;
        }
        self.body.prev_pos = self.body.pos;
        motion::update_position(self, query, dt)
    }

    /// One rendered frame. Only per-frame objects integrate here; lag spikes
    /// above `lag_limit` count as no time and the first frame is skipped.
    pub fn frame_update(&mut self, frame_dt: f32, lag_limit: f32, query: &dyn SpatialQuery) -> StepOutcome {
        if self.body.update_mode != UpdateMode::PerFrame {
            return StepOutcome::Continue;
        }
        if self.body.first_frame {
            self.body.first_frame = false;
            return StepOutcome::Continue;
        }
        let dt = clamp_frame_dt(frame_dt, lag_limit);
        self.body.prev_pos = self.body.pos;
        motion::update_position(self, query, dt)
    }

    /// Advance knock-away rotation and fade-out.
    pub fn tick_visuals(&mut self, dt: f32) -> StepOutcome {
        visuals::tick(&mut self.body, dt)
    }

    pub fn snapshot(&self) -> ObjectSnapshot {
        let body = &self.body;
        ObjectSnapshot {
            id: body.id.0,
            tag: self.tag.clone(),
            position: body.pos.to_array(),
            velocity: body.real_velocity().to_array(),
            state: body.state,
            movement: body.movement,
            floor_angle: body.floor_angle,
            carried: body.carried,
            in_water: body.in_water,
            parent: body.link.parent().map(|p| p.0),
            rotation: body.appearance.rotation,
            alpha: body.appearance.alpha,
        }
    }
}

impl std::fmt::Debug for PhysicsObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsObject")
            .field("tag", &self.tag)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// Serializable view of an object for traces and tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSnapshot {
    pub id: u32,
    pub tag: String,
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub state: ObjectState,
    pub movement: MovementMode,
    pub floor_angle: f32,
    pub carried: bool,
    pub in_water: bool,
    pub parent: Option<u32>,
    pub rotation: f32,
    pub alpha: f32,
}
