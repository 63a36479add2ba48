use serde::{Deserialize, Serialize};

/// Unique identifier for a simulated object or a scene anchor (platform, carrier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Handle to a collider registered with a spatial query backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

/// A one-shot sound request.
/// The numeric value maps to a game-defined clip on the audio side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

/// Animation trigger fired when an object is knocked away with `KnockAwayType::Animation`.
pub const KNOCK_AWAY_TRIGGER: &str = "KnockAwayTrigger";
