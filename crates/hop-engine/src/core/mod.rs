pub mod bounds;
pub mod layers;
pub mod query;
#[cfg(feature = "physics")]
pub mod rapier_query;
pub mod scene;
pub mod time;
pub mod world;
