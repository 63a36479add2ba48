//! Raycast probes around an object's box.
//!
//! Floor, ceiling and wall probes cast three parallel rays (near each edge and
//! through the middle) so a corner can't slip past a single ray. Lava uses the
//! middle ray only; the ledge probe is one ray below the leading corner.

use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::config::{LEDGE_PROBE_DISTANCE, PROBE_INSET, PROBE_SKIN};
use crate::core::bounds::Bounds;
use crate::core::layers::LayerMask;
use crate::core::query::{ColliderRecord, RayHit, SpatialQuery};
use crate::systems::debug::{RayKind, RayLog};

/// Who is probing, for self- and peer-filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeFilter {
    pub owner: EntityId,
    /// The prober collides with other physics objects.
    pub object_collision: bool,
}

impl ProbeFilter {
    /// Whether a struck collider counts.
    ///
    /// Own colliders never count. Another physics object counts only if both
    /// sides have object collision enabled.
    pub fn accepts(&self, record: &ColliderRecord) -> bool {
        if record.entity == Some(self.owner) {
            return false;
        }
        match record.peer {
            Some(peer) => self.object_collision && peer.object_collision,
            None => true,
        }
    }
}

/// Nearest accepted hit of a probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeHit {
    pub hit: RayHit,
    pub record: ColliderRecord,
}

impl ProbeHit {
    pub fn point(&self) -> Vec2 {
        self.hit.point
    }
}

/// Probes for one object box against one backend.
pub struct Probe<'a> {
    query: &'a dyn SpatialQuery,
    filter: ProbeFilter,
    bounds: Bounds,
    rays: &'a mut RayLog,
}

impl<'a> Probe<'a> {
    pub fn new(query: &'a dyn SpatialQuery, filter: ProbeFilter, bounds: Bounds, rays: &'a mut RayLog) -> Self {
        Self { query, filter, bounds, rays }
    }

    /// Three x positions: `spacing` in from each side, and the centre.
    fn spread_x(&self, spacing: f32) -> [f32; 3] {
        let b = &self.bounds;
        [b.left() + spacing, b.center.x, b.right() - spacing]
    }

    /// Cast every origin and keep the nearest accepted hit.
    fn cast(
        &mut self,
        kind: RayKind,
        origins: &[Vec2],
        direction: Vec2,
        length: f32,
        mask: LayerMask,
        skip: impl Fn(&ColliderRecord) -> bool,
    ) -> Option<ProbeHit> {
        if length <= 0.0 || mask.is_empty() {
            return None;
        }
        let mut best: Option<ProbeHit> = None;
        for &origin in origins {
            let mut nearest: Option<ProbeHit> = None;
            for hit in self.query.raycast_all(origin, direction, length, mask) {
                if nearest.as_ref().is_some_and(|n| n.hit.distance <= hit.distance) {
                    continue;
                }
                // The collider may have been removed since the cast.
                let Some(record) = self.query.collider(hit.collider) else {
                    continue;
                };
                if !self.filter.accepts(&record) || skip(&record) {
                    continue;
                }
                nearest = Some(ProbeHit { hit, record });
            }
            self.rays.record(kind, origin, direction, length, nearest.as_ref().map(|n| n.hit.distance));
            if let Some(n) = nearest {
                if best.as_ref().map_or(true, |b| n.hit.distance < b.hit.distance) {
                    best = Some(n);
                }
            }
        }
        if let Some(b) = &best {
            log::trace!("{:?} probe of {:?} hit {:?} at {}", kind, self.filter.owner, b.record.id, b.hit.distance);
        }
        best
    }

    /// Downward rays from just inside the bottom edge, reaching one step of fall plus skin.
    pub fn floor(&mut self, mask: LayerMask, spacing: f32, velocity_y: f32, dt: f32) -> Option<ProbeHit> {
        let y = self.bounds.bottom() + PROBE_INSET;
        let origins = self.spread_x(spacing).map(|x| Vec2::new(x, y));
        let length = -velocity_y * dt + PROBE_SKIN;
        self.cast(RayKind::Floor, &origins, Vec2::NEG_Y, length, mask, |_| false)
    }

    /// Upward rays from just inside the top edge.
    pub fn ceiling(&mut self, mask: LayerMask, spacing: f32, velocity_y: f32, dt: f32) -> Option<ProbeHit> {
        let y = self.bounds.top() - PROBE_INSET;
        let origins = self.spread_x(spacing).map(|x| Vec2::new(x, y));
        let length = velocity_y * dt + PROBE_SKIN;
        self.cast(RayKind::Ceiling, &origins, Vec2::Y, length, mask, |_| false)
    }

    /// Horizontal rays from the leading edge. Slopes are never walls.
    pub fn wall(&mut self, mask: LayerMask, spacing: f32, direction: f32, distance: f32) -> Option<ProbeHit> {
        let b = &self.bounds;
        let x = b.center.x + direction * b.half_width;
        let origins = [
            Vec2::new(x, b.top() - spacing),
            Vec2::new(x, b.center.y),
            Vec2::new(x, b.bottom() + spacing),
        ];
        self.cast(
            RayKind::Wall,
            &origins,
            Vec2::new(direction, 0.0),
            distance,
            mask,
            |record| record.slope_angle().is_some(),
        )
    }

    /// Single downward ray through the middle.
    pub fn lava(&mut self, mask: LayerMask, velocity_y: f32, dt: f32) -> Option<ProbeHit> {
        let origin = Vec2::new(self.bounds.center.x, self.bounds.bottom() + PROBE_INSET);
        let length = -velocity_y * dt + PROBE_SKIN;
        self.cast(RayKind::Lava, &[origin], Vec2::NEG_Y, length, mask, |_| false)
    }

    /// Single ray down from the leading bottom corner.
    pub fn ledge(&mut self, mask: LayerMask, direction: f32) -> Option<ProbeHit> {
        let b = &self.bounds;
        let origin = Vec2::new(b.center.x + direction * b.half_width, b.bottom() + PROBE_INSET);
        self.cast(RayKind::Ledge, &[origin], Vec2::NEG_Y, LEDGE_PROBE_DISTANCE, mask, |_| false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layers::Layer;
    use crate::core::query::{ColliderDesc, PeerFlags, SurfaceTag};
    use crate::core::world::CollisionWorld;

    const OWNER: EntityId = EntityId(1);

    fn filter() -> ProbeFilter {
        ProbeFilter { owner: OWNER, object_collision: true }
    }

    fn unit_box(center: Vec2) -> Bounds {
        Bounds::from_center(center, 0.5, 0.5)
    }

    fn world_with_ground() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.insert(ColliderDesc::block(Layer::GROUND, Vec2::new(-10.0, -1.0), Vec2::new(10.0, 0.0)));
        world
    }

    #[test]
    fn floor_probe_finds_ground_under_the_box() {
        let world = world_with_ground();
        let mut rays = RayLog::new();
        let mut probe = Probe::new(&world, filter(), unit_box(Vec2::new(0.0, 0.5)), &mut rays);
        let hit = probe.floor(Layer::GROUND.mask(), 0.2, 0.0, 0.02).unwrap();
        assert!(hit.point().y.abs() < 1e-5);
        assert_eq!(rays.count(RayKind::Floor), 3);
    }

    #[test]
    fn floor_probe_reach_scales_with_fall_speed() {
        let world = world_with_ground();
        let mut rays = RayLog::new();
        let bounds = unit_box(Vec2::new(0.0, 0.6));
        let mut probe = Probe::new(&world, filter(), bounds, &mut rays);
        assert!(probe.floor(Layer::GROUND.mask(), 0.2, 0.0, 0.02).is_none());
        assert!(probe.floor(Layer::GROUND.mask(), 0.2, -5.0, 0.02).is_some());
    }

    #[test]
    fn corner_ray_catches_a_narrow_ledge() {
        let mut world = CollisionWorld::new();
        world.insert(ColliderDesc::block(Layer::GROUND, Vec2::new(0.2, -1.0), Vec2::new(0.4, 0.0)));
        let mut rays = RayLog::new();
        let mut probe = Probe::new(&world, filter(), unit_box(Vec2::new(0.0, 0.5)), &mut rays);
        assert!(probe.floor(Layer::GROUND.mask(), 0.2, 0.0, 0.02).is_some());
    }

    #[test]
    fn own_collider_is_ignored() {
        let mut world = CollisionWorld::new();
        world.insert(
            ColliderDesc::new(Layer::OBJECTS, unit_box(Vec2::new(0.0, 0.5)))
                .with_owner(OWNER, PeerFlags { object_collision: true, knocked_away: false }),
        );
        let mut rays = RayLog::new();
        let mut probe = Probe::new(&world, filter(), unit_box(Vec2::new(0.0, 0.5)), &mut rays);
        assert!(probe.floor(LayerMask::ALL, 0.2, 0.0, 0.02).is_none());
    }

    #[test]
    fn peers_opt_out_from_either_side() {
        let mut world = CollisionWorld::new();
        let peer = |object_collision| PeerFlags { object_collision, knocked_away: false };
        let other = world.insert(
            ColliderDesc::block(Layer::OBJECTS, Vec2::new(-1.0, -1.0), Vec2::new(1.0, 0.0))
                .with_owner(EntityId(2), peer(true)),
        );
        let bounds = unit_box(Vec2::new(0.0, 0.5));
        let mut rays = RayLog::new();

        assert!(Probe::new(&world, filter(), bounds, &mut rays).floor(LayerMask::ALL, 0.2, 0.0, 0.02).is_some());

        let loner = ProbeFilter { owner: OWNER, object_collision: false };
        assert!(Probe::new(&world, loner, bounds, &mut rays).floor(LayerMask::ALL, 0.2, 0.0, 0.02).is_none());

        world.set_peer(other, peer(false));
        assert!(Probe::new(&world, filter(), bounds, &mut rays).floor(LayerMask::ALL, 0.2, 0.0, 0.02).is_none());
    }

    #[test]
    fn wall_probe_skips_slopes() {
        let mut world = CollisionWorld::new();
        world.insert(
            ColliderDesc::block(Layer::GROUND, Vec2::new(0.5, 0.0), Vec2::new(2.5, 2.0))
                .with_tag(SurfaceTag::Slope { angle: -45.0 }),
        );
        let wall = world.insert(ColliderDesc::block(Layer::WALL, Vec2::new(0.52, 0.0), Vec2::new(1.0, 3.0)));
        let mut rays = RayLog::new();
        let mut probe = Probe::new(&world, filter(), unit_box(Vec2::new(0.0, 0.5)), &mut rays);
        let hit = probe.wall(LayerMask::ALL, 0.2, 1.0, 0.04).unwrap();
        assert_eq!(hit.record.id, wall);
        assert_eq!(rays.count(RayKind::Wall), 3);
    }

    #[test]
    fn ledge_probe_misses_past_the_edge() {
        let mut world = CollisionWorld::new();
        world.insert(ColliderDesc::block(Layer::GROUND, Vec2::new(-10.0, -1.0), Vec2::new(0.2, 0.0)));
        let mut rays = RayLog::new();
        let mut probe = Probe::new(&world, filter(), unit_box(Vec2::new(0.0, 0.5)), &mut rays);
        assert!(probe.ledge(Layer::GROUND.mask(), -1.0).is_some());
        assert!(probe.ledge(Layer::GROUND.mask(), 1.0).is_none());
    }

    #[test]
    fn lava_probe_uses_one_ray() {
        let mut world = CollisionWorld::new();
        world.insert(ColliderDesc::block(Layer::LAVA, Vec2::new(-10.0, -3.0), Vec2::new(10.0, 0.0)));
        let mut rays = RayLog::new();
        let mut probe = Probe::new(&world, filter(), unit_box(Vec2::new(0.0, 0.5)), &mut rays);
        assert!(probe.lava(Layer::LAVA.mask(), -1.0, 0.02).is_some());
        assert_eq!(rays.count(RayKind::Lava), 1);
    }
}
