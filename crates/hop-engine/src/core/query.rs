//! The collider query seam the probes talk to.
//!
//! Backends store colliders as [`ColliderRecord`]s and answer ray and overlap
//! queries against them. [`crate::core::world::CollisionWorld`] is the
//! built-in implementation; `RapierQuery` (feature `physics`) answers the same
//! queries from a rapier collider set.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{ColliderId, EntityId};
use crate::core::bounds::Bounds;
use crate::core::layers::{Layer, LayerMask};

/// Annotation on a struck surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SurfaceTag {
    /// Incline in signed degrees. Positive rises to the right.
    Slope { angle: f32 },
    /// Objects grounded on this surface ride along with it.
    MovingPlatform,
}

impl SurfaceTag {
    pub fn slope_angle(&self) -> Option<f32> {
        match self {
            SurfaceTag::Slope { angle } => Some(*angle),
            SurfaceTag::MovingPlatform => None,
        }
    }
}

/// Collision flags of a collider owned by a physics object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeerFlags {
    /// Whether the owner collides with other physics objects at all.
    pub object_collision: bool,
    /// Whether the owner is currently knocked away.
    pub knocked_away: bool,
}

/// Everything a backend knows about one collider.
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderRecord {
    pub id: ColliderId,
    pub layer: Layer,
    pub bounds: Bounds,
    pub tag: Option<SurfaceTag>,
    /// Owning physics object, `None` for level geometry.
    pub entity: Option<EntityId>,
    pub peer: Option<PeerFlags>,
    pub enabled: bool,
}

impl ColliderRecord {
    pub fn slope_angle(&self) -> Option<f32> {
        self.tag.as_ref().and_then(SurfaceTag::slope_angle)
    }

    pub fn is_moving_platform(&self) -> bool {
        matches!(self.tag, Some(SurfaceTag::MovingPlatform))
    }

    /// Counter-clockwise outline of the collider.
    ///
    /// Slopes are wedges filling their bounds: the high side sits on the
    /// right for positive angles and on the left for negative ones.
    pub fn outline(&self) -> Vec<Vec2> {
        let (min, max) = (self.bounds.min(), self.bounds.max());
        let bl = min;
        let br = Vec2::new(max.x, min.y);
        let tr = max;
        let tl = Vec2::new(min.x, max.y);
        match self.slope_angle() {
            Some(angle) if angle > 0.0 => vec![bl, br, tr],
            Some(angle) if angle < 0.0 => vec![bl, br, tl],
            _ => vec![bl, br, tr, tl],
        }
    }
}

/// Builder for colliders inserted into a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderDesc {
    pub layer: Layer,
    pub bounds: Bounds,
    pub tag: Option<SurfaceTag>,
    pub entity: Option<EntityId>,
    pub peer: Option<PeerFlags>,
    pub enabled: bool,
}

impl ColliderDesc {
    pub fn new(layer: Layer, bounds: Bounds) -> Self {
        Self {
            layer,
            bounds,
            tag: None,
            entity: None,
            peer: None,
            enabled: true,
        }
    }

    /// Static box spanning `min..max`.
    pub fn block(layer: Layer, min: Vec2, max: Vec2) -> Self {
        Self::new(layer, Bounds::from_min_max(min, max))
    }

    pub fn with_tag(mut self, tag: SurfaceTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_owner(mut self, entity: EntityId, peer: PeerFlags) -> Self {
        self.entity = Some(entity);
        self.peer = Some(peer);
        self
    }

    /// Level geometry that moves with an anchor (a moving platform).
    pub fn with_anchor(mut self, anchor: EntityId) -> Self {
        self.entity = Some(anchor);
        self.peer = None;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub(crate) fn into_record(self, id: ColliderId) -> ColliderRecord {
        ColliderRecord {
            id,
            layer: self.layer,
            bounds: self.bounds,
            tag: self.tag,
            entity: self.entity,
            peer: self.peer,
            enabled: self.enabled,
        }
    }
}

/// One collider struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub collider: ColliderId,
    pub point: Vec2,
    /// Distance from the ray origin along the normalized direction.
    pub distance: f32,
}

/// Collider storage plus the queries the probes need.
///
/// Disabled colliders are kept but never returned by queries.
pub trait SpatialQuery {
    /// Every enabled collider on `mask` the ray touches within `max_distance`.
    /// A ray starting inside a collider hits it at distance 0.
    fn raycast_all(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<RayHit>;

    fn collider(&self, id: ColliderId) -> Option<ColliderRecord>;

    fn insert(&mut self, desc: ColliderDesc) -> ColliderId;

    fn remove(&mut self, id: ColliderId) -> Option<ColliderRecord>;

    fn set_enabled(&mut self, id: ColliderId, enabled: bool);

    fn set_bounds(&mut self, id: ColliderId, bounds: Bounds);

    fn set_peer(&mut self, id: ColliderId, peer: PeerFlags);

    /// Enabled colliders on `mask` whose bounds intersect `bounds`.
    fn overlapping(&self, bounds: &Bounds, mask: LayerMask) -> Vec<ColliderRecord>;
}
