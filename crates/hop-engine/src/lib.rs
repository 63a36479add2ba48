pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod assets;
pub mod extensions;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::collaborators::{Collaborators, ComboTracker, Presentation, Silent, CollaboratorEvent, EventLog};
pub use api::hooks::{DefaultHooks, MotionHooks};
pub use api::simulation::{Simulation, SimConfig, Viewport};
pub use api::types::{EntityId, ColliderId, SoundEvent, KNOCK_AWAY_TRIGGER};
pub use components::config::PhysicsConfig;
pub use components::object::{PhysicsObject, ObjectSnapshot};
pub use components::state::{
    ObjectState, MovementMode, KnockAwayType, UpdateMode, ThrowVisual, StepOutcome, DespawnReason,
};
pub use core::bounds::Bounds;
pub use core::layers::{Layer, LayerMask};
pub use core::query::{ColliderDesc, ColliderRecord, SpatialQuery, SurfaceTag, RayHit};
pub use core::world::CollisionWorld;
pub use core::time::FixedTimestep;
pub use assets::level::{LevelDesc, LoadedLevel};
pub use systems::debug::{DebugRay, RayKind, RayLog};
pub use error::{HopError, Result};

#[cfg(feature = "physics")]
pub use core::rapier_query::RapierQuery;

// Extensions: decoupled optional systems
pub use extensions::ParentGraph;
