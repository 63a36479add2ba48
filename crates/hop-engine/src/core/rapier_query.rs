//! Collider backend on top of Rapier's collider set.
//!
//! Only the query side of Rapier is used: colliders are parentless, nothing
//! is ever stepped, and rays go straight to each shape's `cast_ray`. The
//! records kept alongside carry what Rapier has no slot for (layer, tag, owner).

use std::collections::BTreeMap;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::api::types::ColliderId;
use crate::core::bounds::Bounds;
use crate::core::layers::LayerMask;
use crate::core::query::{ColliderDesc, ColliderRecord, PeerFlags, RayHit, SpatialQuery};

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

/// Shape for a record, relative to its bounds centre.
fn shape_for(record: &ColliderRecord) -> SharedShape {
    let center = record.bounds.center;
    let outline = record.outline();
    if outline.len() == 3 {
        let p = |v: Vec2| point![v.x - center.x, v.y - center.y];
        SharedShape::triangle(p(outline[0]), p(outline[1]), p(outline[2]))
    } else {
        SharedShape::cuboid(record.bounds.half_width, record.bounds.half_height)
    }
}

/// [`SpatialQuery`] backed by a Rapier [`ColliderSet`].
pub struct RapierQuery {
    colliders: ColliderSet,
    island_manager: IslandManager,
    bodies: RigidBodySet,
    records: BTreeMap<ColliderId, (ColliderHandle, ColliderRecord)>,
    next_id: u32,
}

impl RapierQuery {
    pub fn new() -> Self {
        Self {
            colliders: ColliderSet::new(),
            island_manager: IslandManager::new(),
            bodies: RigidBodySet::new(),
            records: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn sync_shape(&mut self, id: ColliderId) {
        let Some((handle, record)) = self.records.get(&id) else { return };
        if let Some(collider) = self.colliders.get_mut(*handle) {
            collider.set_shape(shape_for(record));
            collider.set_translation(vec2_to_na(record.bounds.center));
            collider.set_enabled(record.enabled);
        }
    }
}

impl Default for RapierQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RapierQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RapierQuery").field("colliders", &self.records.len()).finish()
    }
}

impl SpatialQuery for RapierQuery {
    fn raycast_all(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask) -> Vec<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO || max_distance < 0.0 {
            return Vec::new();
        }
        let ray = Ray::new(point![origin.x, origin.y], vec2_to_na(direction));
        let mut hits: Vec<RayHit> = self
            .records
            .values()
            .filter(|(_, record)| record.enabled && mask.contains(record.layer))
            .filter_map(|(handle, record)| {
                let collider = self.colliders.get(*handle)?;
                let toi = collider.shape().cast_ray(collider.position(), &ray, max_distance, true)?;
                Some(RayHit {
                    collider: record.id,
                    point: origin + direction * toi,
                    distance: toi,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn collider(&self, id: ColliderId) -> Option<ColliderRecord> {
        self.records.get(&id).map(|(_, record)| record.clone())
    }

    fn insert(&mut self, desc: ColliderDesc) -> ColliderId {
        self.next_id += 1;
        let id = ColliderId(self.next_id);
        let record = desc.into_record(id);
        let collider = ColliderBuilder::new(shape_for(&record))
            .translation(vec2_to_na(record.bounds.center))
            .enabled(record.enabled)
            .user_data(id.0 as u128)
            .build();
        let handle = self.colliders.insert(collider);
        self.records.insert(id, (handle, record));
        id
    }

    fn remove(&mut self, id: ColliderId) -> Option<ColliderRecord> {
        let (handle, record) = self.records.remove(&id)?;
        self.colliders.remove(handle, &mut self.island_manager, &mut self.bodies, false);
        Some(record)
    }

    fn set_enabled(&mut self, id: ColliderId, enabled: bool) {
        if let Some((handle, record)) = self.records.get_mut(&id) {
            if record.enabled != enabled {
                record.enabled = enabled;
                if let Some(collider) = self.colliders.get_mut(*handle) {
                    collider.set_enabled(enabled);
                }
            }
        }
    }

    fn set_bounds(&mut self, id: ColliderId, bounds: Bounds) {
        let changed = match self.records.get_mut(&id) {
            Some((_, record)) if record.bounds != bounds => {
                record.bounds = bounds;
                true
            }
            _ => false,
        };
        if changed {
            self.sync_shape(id);
        }
    }

    fn set_peer(&mut self, id: ColliderId, peer: PeerFlags) {
        if let Some((_, record)) = self.records.get_mut(&id) {
            record.peer = Some(peer);
        }
    }

    fn overlapping(&self, bounds: &Bounds, mask: LayerMask) -> Vec<ColliderRecord> {
        self.records
            .values()
            .filter(|(_, c)| c.enabled && mask.contains(c.layer) && c.bounds.intersects(bounds))
            .map(|(_, c)| c.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::simulation::Simulation;
    use crate::components::config::PhysicsConfig;
    use crate::components::object::PhysicsObject;
    use crate::components::state::ObjectState;
    use crate::core::layers::Layer;
    use crate::core::query::SurfaceTag;

    fn ground(query: &mut RapierQuery) -> ColliderId {
        query.insert(ColliderDesc::block(Layer::GROUND, Vec2::new(-10.0, -1.0), Vec2::new(10.0, 0.0)))
    }

    #[test]
    fn downward_ray_hits_top_face() {
        let mut query = RapierQuery::new();
        let id = ground(&mut query);
        let hits = query.raycast_all(Vec2::new(0.0, 0.5), Vec2::NEG_Y, 1.0, Layer::GROUND.mask());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].collider, id);
        assert!((hits[0].distance - 0.5).abs() < 1e-4);
    }

    #[test]
    fn solid_shapes_hit_from_inside() {
        let mut query = RapierQuery::new();
        ground(&mut query);
        let hits = query.raycast_all(Vec2::new(0.0, -0.5), Vec2::NEG_Y, 1.0, Layer::GROUND.mask());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].distance, 0.0);
    }

    #[test]
    fn slope_wedge_rises_to_the_right() {
        let mut query = RapierQuery::new();
        query.insert(
            ColliderDesc::block(Layer::GROUND, Vec2::ZERO, Vec2::new(2.0, 2.0))
                .with_tag(SurfaceTag::Slope { angle: 45.0 }),
        );
        let hits = query.raycast_all(Vec2::new(0.5, 3.0), Vec2::NEG_Y, 5.0, Layer::GROUND.mask());
        assert!((hits[0].point.y - 0.5).abs() < 1e-4, "hit {:?}", hits[0].point);
    }

    #[test]
    fn moved_and_disabled_colliders_follow_the_record() {
        let mut query = RapierQuery::new();
        let id = ground(&mut query);
        query.set_bounds(id, Bounds::from_min_max(Vec2::new(-10.0, -3.0), Vec2::new(10.0, -2.0)));
        let hits = query.raycast_all(Vec2::new(0.0, 0.5), Vec2::NEG_Y, 5.0, Layer::GROUND.mask());
        assert!((hits[0].distance - 2.5).abs() < 1e-4);

        query.set_enabled(id, false);
        assert!(query.raycast_all(Vec2::new(0.0, 0.5), Vec2::NEG_Y, 5.0, Layer::GROUND.mask()).is_empty());
        assert!(query.remove(id).is_some());
        assert!(query.is_empty());
    }

    #[test]
    fn simulation_runs_on_rapier() {
        let mut sim: Simulation<RapierQuery> = Simulation::default();
        sim.add_static(ColliderDesc::block(Layer::GROUND, Vec2::new(-10.0, -1.0), Vec2::new(10.0, 0.0)));
        let id = sim.next_id();
        sim.spawn(PhysicsObject::new(id, Vec2::new(0.0, 3.0), PhysicsConfig::default().with_velocity(Vec2::ZERO)));
        for _ in 0..100 {
            sim.tick(1.0 / 50.0);
        }
        let obj = sim.objects.get(id).unwrap();
        assert_eq!(obj.state(), ObjectState::Grounded);
        assert!((obj.position().y - 0.5).abs() < 1e-3);
    }
}
