use std::collections::BTreeMap;

use glam::Vec2;

use crate::api::types::ColliderId;
use crate::core::bounds::Bounds;
use crate::core::layers::LayerMask;
use crate::core::query::{ColliderDesc, ColliderRecord, PeerFlags, RayHit, SpatialQuery};

/// Built-in collider set: boxes and slope wedges, queried by brute force.
///
/// Colliders are kept ordered by id so query results are reproducible.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    colliders: BTreeMap<ColliderId, ColliderRecord>,
    next_id: u32,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColliderRecord> {
        self.colliders.values()
    }
}

/// Entry distance of a ray into a convex counter-clockwise polygon.
///
/// Clips the segment `origin + direction * t`, `t` in `0..=max_distance`,
/// against every edge half-plane. `direction` must be normalized.
fn ray_polygon(origin: Vec2, direction: Vec2, max_distance: f32, outline: &[Vec2]) -> Option<f32> {
    let mut t_enter = 0.0f32;
    let mut t_exit = max_distance;
    for (i, &a) in outline.iter().enumerate() {
        let b = outline[(i + 1) % outline.len()];
        let edge = b - a;
        let normal = Vec2::new(edge.y, -edge.x);
        let num = normal.dot(a - origin);
        let den = normal.dot(direction);
        if den.abs() <= f32::EPSILON {
            // Parallel: entirely outside this edge or never crossing it.
            if num < 0.0 {
                return None;
            }
            continue;
        }
        let t = num / den;
        if den > 0.0 {
            t_exit = t_exit.min(t);
        } else {
            t_enter = t_enter.max(t);
        }
        if t_enter > t_exit {
            return None;
        }
    }
    Some(t_enter)
}

impl SpatialQuery for CollisionWorld {
    fn raycast_all(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO || max_distance < 0.0 {
            return Vec::new();
        }
        let mut hits: Vec<RayHit> = self
            .colliders
            .values()
            .filter(|c| c.enabled && mask.contains(c.layer))
            .filter_map(|c| {
                ray_polygon(origin, direction, max_distance, &c.outline()).map(|distance| RayHit {
                    collider: c.id,
                    point: origin + direction * distance,
                    distance,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn collider(&self, id: ColliderId) -> Option<ColliderRecord> {
        self.colliders.get(&id).cloned()
    }

    fn insert(&mut self, desc: ColliderDesc) -> ColliderId {
        self.next_id += 1;
        let id = ColliderId(self.next_id);
        self.colliders.insert(id, desc.into_record(id));
        id
    }

    fn remove(&mut self, id: ColliderId) -> Option<ColliderRecord> {
        self.colliders.remove(&id)
    }

    fn set_enabled(&mut self, id: ColliderId, enabled: bool) {
        if let Some(c) = self.colliders.get_mut(&id) {
            c.enabled = enabled;
        }
    }

    fn set_bounds(&mut self, id: ColliderId, bounds: Bounds) {
        if let Some(c) = self.colliders.get_mut(&id) {
            c.bounds = bounds;
        }
    }

    fn set_peer(&mut self, id: ColliderId, peer: PeerFlags) {
        if let Some(c) = self.colliders.get_mut(&id) {
            c.peer = Some(peer);
        }
    }

    fn overlapping(&self, bounds: &Bounds, mask: LayerMask) -> Vec<ColliderRecord> {
        self.colliders
            .values()
            .filter(|c| c.enabled && mask.contains(c.layer) && c.bounds.intersects(bounds))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layers::Layer;
    use crate::core::query::SurfaceTag;

    fn ground(world: &mut CollisionWorld) -> ColliderId {
        world.insert(ColliderDesc::block(
            Layer::GROUND,
            Vec2::new(-10.0, -1.0),
            Vec2::new(10.0, 0.0),
        ))
    }

    #[test]
    fn downward_ray_hits_top_face() {
        let mut world = CollisionWorld::new();
        let id = ground(&mut world);
        let hits = world.raycast_all(Vec2::new(0.0, 0.5), Vec2::NEG_Y, 1.0, Layer::GROUND.mask());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].collider, id);
        assert!((hits[0].distance - 0.5).abs() < 1e-5);
        assert!(hits[0].point.y.abs() < 1e-5);
    }

    #[test]
    fn short_ray_misses() {
        let mut world = CollisionWorld::new();
        ground(&mut world);
        let hits = world.raycast_all(Vec2::new(0.0, 0.5), Vec2::NEG_Y, 0.4, Layer::GROUND.mask());
        assert!(hits.is_empty());
    }

    #[test]
    fn origin_inside_hits_at_zero() {
        let mut world = CollisionWorld::new();
        ground(&mut world);
        let hits = world.raycast_all(Vec2::new(0.0, -0.5), Vec2::NEG_Y, 1.0, Layer::GROUND.mask());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].distance, 0.0);
    }

    #[test]
    fn mask_and_enabled_filter_hits() {
        let mut world = CollisionWorld::new();
        let id = ground(&mut world);
        let origin = Vec2::new(0.0, 0.5);
        assert!(world.raycast_all(origin, Vec2::NEG_Y, 1.0, Layer::WALL.mask()).is_empty());
        world.set_enabled(id, false);
        assert!(world.raycast_all(origin, Vec2::NEG_Y, 1.0, Layer::GROUND.mask()).is_empty());
    }

    #[test]
    fn hits_are_sorted_nearest_first() {
        let mut world = CollisionWorld::new();
        let far = world.insert(ColliderDesc::block(Layer::WALL, Vec2::new(5.0, 0.0), Vec2::new(6.0, 2.0)));
        let near = world.insert(ColliderDesc::block(Layer::WALL, Vec2::new(2.0, 0.0), Vec2::new(3.0, 2.0)));
        let hits = world.raycast_all(Vec2::new(0.0, 1.0), Vec2::X, 10.0, Layer::WALL.mask());
        assert_eq!(hits.iter().map(|h| h.collider).collect::<Vec<_>>(), vec![near, far]);
    }

    #[test]
    fn ray_lands_on_slope_surface() {
        let mut world = CollisionWorld::new();
        world.insert(
            ColliderDesc::block(Layer::GROUND, Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0))
                .with_tag(SurfaceTag::Slope { angle: 45.0 }),
        );
        let hits = world.raycast_all(Vec2::new(1.0, 3.0), Vec2::NEG_Y, 5.0, Layer::GROUND.mask());
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn overlap_query_respects_bounds() {
        let mut world = CollisionWorld::new();
        ground(&mut world);
        let above = Bounds::from_center(Vec2::new(0.0, 3.0), 0.5, 0.5);
        let touching = Bounds::from_center(Vec2::new(0.0, 0.4), 0.5, 0.5);
        assert!(world.overlapping(&above, LayerMask::ALL).is_empty());
        assert_eq!(world.overlapping(&touching, LayerMask::ALL).len(), 1);
    }
}
