use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::SoundEvent;
use crate::components::state::{KnockAwayType, MovementMode, ObjectState, ThrowVisual, UpdateMode};
use crate::core::layers::{Layer, LayerMask};
use crate::error::{HopError, Result};

/// Extra probe length past the distance covered this step.
pub const PROBE_SKIN: f32 = 0.04;
/// How far inside the box edge floor and ceiling rays start.
pub const PROBE_INSET: f32 = 0.02;
/// Length of the ledge ray below the leading corner.
pub const LEDGE_PROBE_DISTANCE: f32 = 0.5;

pub const DEFAULT_FLOOR_MASK: LayerMask =
    LayerMask::from_layers(&[Layer::GROUND, Layer::PLATFORM, Layer::OBJECTS]);
pub const DEFAULT_WALL_MASK: LayerMask =
    LayerMask::from_layers(&[Layer::GROUND, Layer::WALL, Layer::OBJECTS]);

/// Immutable per-object tuning, fixed at construction.
///
/// Every field has a default so level files only list what they change.
/// Run [`PhysicsConfig::validate`] on anything loaded from outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    // -- Bounds --
    pub width: f32,
    pub height: f32,
    pub bounds_offset: Vec2,
    pub size_padding: Vec2,

    // -- Motion --
    /// Initial velocity; `x` is a speed, direction comes from `moving_left`.
    pub velocity: Vec2,
    pub moving_left: bool,
    pub gravity: f32,
    pub initial_state: ObjectState,
    pub movement: MovementMode,
    pub update_mode: UpdateMode,
    pub stop_after_land: bool,
    pub bounce_height: f32,
    pub min_height_to_bounce: f32,

    // -- Probing --
    pub floor_ray_spacing: f32,
    pub wall_ray_spacing: f32,
    pub floor_mask: LayerMask,
    pub wall_mask: LayerMask,
    pub lava_mask: LayerMask,
    pub water_mask: LayerMask,
    pub ceiling_detection: bool,
    pub dont_fall_off_ledges: bool,
    pub bounce_off_walls: bool,
    /// Ledge and wall probes never flip the object.
    pub ignore_raycast_flip: bool,
    /// Run the floor/ceiling/lava/ledge block a second time each step.
    pub repeat_probe_pass: bool,

    // -- Collider --
    pub has_collider: bool,
    pub layer: Layer,
    pub check_object_collision: bool,

    // -- Appearance --
    pub flip_object: bool,
    pub rotate_around_center: bool,

    // -- Lava --
    pub lava_kill: bool,
    pub force_sink_in_lava: bool,
    pub sink_speed: f32,

    // -- Carry / throw --
    pub carryable: bool,
    /// Local offset from the carrier while held.
    pub carry_offset: Vec2,
    pub carried_render_order: i32,
    pub throw_velocity: Vec2,
    pub throw_visual: ThrowVisual,
    /// Degrees per second while a thrown object spins.
    pub throw_rotate_speed: f32,
    /// Can be knocked away by thrown objects.
    pub combat_capable: bool,

    // -- Knock-away --
    pub knock_away_velocity: Vec2,
    pub knock_away_gravity: Option<f32>,
    pub knock_away_type: KnockAwayType,
    /// Degrees per second for `KnockAwayType::Rotate`.
    pub knock_away_rotation_speed: f32,
    /// Seconds to fade out after a knock-away. Non-positive disables the fade.
    pub knock_away_disappear_time: f32,
    pub knock_away_sound: Option<SoundEvent>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            bounds_offset: Vec2::ZERO,
            size_padding: Vec2::ZERO,

            velocity: Vec2::new(2.0, 0.0),
            moving_left: true,
            gravity: 60.0,
            initial_state: ObjectState::Falling,
            movement: MovementMode::Sliding,
            update_mode: UpdateMode::FixedStep,
            stop_after_land: false,
            bounce_height: 10.0,
            min_height_to_bounce: 1.0,

            floor_ray_spacing: 0.2,
            wall_ray_spacing: 0.2,
            floor_mask: DEFAULT_FLOOR_MASK,
            wall_mask: DEFAULT_WALL_MASK,
            lava_mask: Layer::LAVA.mask(),
            water_mask: Layer::WATER.mask(),
            ceiling_detection: true,
            dont_fall_off_ledges: false,
            bounce_off_walls: true,
            ignore_raycast_flip: false,
            repeat_probe_pass: false,

            has_collider: true,
            layer: Layer::OBJECTS,
            check_object_collision: true,

            flip_object: true,
            rotate_around_center: false,

            lava_kill: true,
            force_sink_in_lava: true,
            sink_speed: 20.0,

            carryable: false,
            carry_offset: Vec2::ZERO,
            carried_render_order: 100,
            throw_velocity: Vec2::new(12.0, 10.0),
            throw_visual: ThrowVisual::Normal,
            throw_rotate_speed: 720.0,
            combat_capable: true,

            knock_away_velocity: Vec2::new(5.0, 5.0),
            knock_away_gravity: None,
            knock_away_type: KnockAwayType::Flip,
            knock_away_rotation_speed: 10.0,
            knock_away_disappear_time: -1.0,
            knock_away_sound: None,
        }
    }
}

impl PhysicsConfig {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PhysicsConfig = serde_json::from_str(json)?;
        config.validate()
    }

    /// Reject non-finite numbers and clamp negative spacings to zero.
    ///
    /// Width and height stay as given: padding may bring a negative base size
    /// back up, and [`Bounds::compute`](crate::core::bounds::Bounds::compute)
    /// clamps the padded result.
    pub fn validate(mut self) -> Result<Self> {
        let scalars = [
            ("width", self.width),
            ("height", self.height),
            ("gravity", self.gravity),
            ("bounce_height", self.bounce_height),
            ("min_height_to_bounce", self.min_height_to_bounce),
            ("floor_ray_spacing", self.floor_ray_spacing),
            ("wall_ray_spacing", self.wall_ray_spacing),
            ("sink_speed", self.sink_speed),
            ("throw_rotate_speed", self.throw_rotate_speed),
            ("knock_away_rotation_speed", self.knock_away_rotation_speed),
            ("knock_away_disappear_time", self.knock_away_disappear_time),
            ("knock_away_gravity", self.knock_away_gravity.unwrap_or(0.0)),
        ];
        for (field, value) in scalars {
            ensure_finite(field, value)?;
        }
        let vectors = [
            ("bounds_offset", self.bounds_offset),
            ("size_padding", self.size_padding),
            ("velocity", self.velocity),
            ("carry_offset", self.carry_offset),
            ("throw_velocity", self.throw_velocity),
            ("knock_away_velocity", self.knock_away_velocity),
        ];
        for (field, value) in vectors {
            ensure_finite(field, value.x)?;
            ensure_finite(field, value.y)?;
        }

        clamp_non_negative("floor_ray_spacing", &mut self.floor_ray_spacing);
        clamp_non_negative("wall_ray_spacing", &mut self.wall_ray_spacing);
        clamp_non_negative("sink_speed", &mut self.sink_speed);
        if self.velocity.x < 0.0 {
            log::warn!("velocity.x {} is a speed; using its magnitude and flipping direction", self.velocity.x);
            self.velocity.x = -self.velocity.x;
            self.moving_left = !self.moving_left;
        }
        Ok(self)
    }

    /// Full probing box size, before padding.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    // -- Builder pattern --

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_moving_left(mut self, moving_left: bool) -> Self {
        self.moving_left = moving_left;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_state(mut self, state: ObjectState) -> Self {
        self.initial_state = state;
        self
    }

    pub fn with_movement(mut self, movement: MovementMode) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_update_mode(mut self, mode: UpdateMode) -> Self {
        self.update_mode = mode;
        self
    }

    pub fn with_bounce(mut self, bounce_height: f32, min_height_to_bounce: f32) -> Self {
        self.bounce_height = bounce_height;
        self.min_height_to_bounce = min_height_to_bounce;
        self
    }

    pub fn with_bounce_off_walls(mut self, bounce: bool) -> Self {
        self.bounce_off_walls = bounce;
        self
    }

    pub fn with_ledge_guard(mut self, dont_fall_off_ledges: bool) -> Self {
        self.dont_fall_off_ledges = dont_fall_off_ledges;
        self
    }

    pub fn with_knock_away(mut self, kind: KnockAwayType, velocity: Vec2) -> Self {
        self.knock_away_type = kind;
        self.knock_away_velocity = velocity;
        self
    }

    pub fn with_disappear_time(mut self, seconds: f32) -> Self {
        self.knock_away_disappear_time = seconds;
        self
    }

    pub fn carryable(mut self) -> Self {
        self.carryable = true;
        self
    }
}

fn ensure_finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(HopError::InvalidConfig {
            field,
            reason: format!("{value} is not a finite number"),
        })
    }
}

fn clamp_non_negative(field: &'static str, value: &mut f32) {
    if *value < 0.0 {
        log::warn!("{field} was {value}, clamping to 0");
        *value = 0.0;
    }
}
