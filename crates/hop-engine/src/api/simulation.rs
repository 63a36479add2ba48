use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{ColliderId, EntityId};
use crate::components::object::{ObjectSnapshot, PhysicsObject};
use crate::components::state::{DespawnReason, ObjectState, StepOutcome};
use crate::core::bounds::Bounds;
use crate::core::layers::LayerMask;
use crate::core::query::{ColliderDesc, SpatialQuery};
use crate::core::scene::ObjectSet;
use crate::core::time::FixedTimestep;
use crate::core::world::CollisionWorld;
use crate::error::{HopError, Result};
use crate::extensions::hierarchy::ParentGraph;
use crate::systems::carry;

/// Visible area; knocked-away objects outside it are removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub min: Vec2,
    pub max: Vec2,
}

impl Viewport {
    pub fn bounds(&self) -> Bounds {
        Bounds::from_min_max(self.min, self.max)
    }
}

/// Configuration for the simulation loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep in seconds (default: 1/50).
    pub fixed_dt: f32,
    /// Most fixed steps one frame may run (default: 10).
    pub max_steps_per_frame: u32,
    /// Per-frame objects treat longer frames as zero time (default: 0.1 s).
    pub lag_spike_limit: f32,
    pub viewport: Option<Viewport>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 50.0,
            max_steps_per_frame: 10,
            lag_spike_limit: 0.1,
            viewport: None,
        }
    }
}

impl SimConfig {
    pub fn validate(self) -> Result<Self> {
        if !(self.fixed_dt.is_finite() && self.fixed_dt > 0.0) {
            return Err(HopError::InvalidConfig {
                field: "fixed_dt",
                reason: format!("{} is not a positive duration", self.fixed_dt),
            });
        }
        if !self.lag_spike_limit.is_finite() {
            return Err(HopError::InvalidConfig {
                field: "lag_spike_limit",
                reason: format!("{} is not a finite number", self.lag_spike_limit),
            });
        }
        Ok(self)
    }
}

/// Owns every physics object, the collider backend and the parent graph,
/// and drives them from frame deltas.
///
/// Objects keep their own desired collider and parent state; the simulation
/// mirrors it into the backend and the graph after every update so probes of
/// later objects see it.
pub struct Simulation<Q: SpatialQuery = CollisionWorld> {
    pub config: SimConfig,
    pub objects: ObjectSet,
    pub query: Q,
    pub graph: ParentGraph,
    timestep: FixedTimestep,
    /// Colliders that move with each anchor.
    anchors: BTreeMap<EntityId, Vec<ColliderId>>,
    pending: Vec<(EntityId, DespawnReason)>,
    despawned: Vec<(EntityId, DespawnReason)>,
    next_id: u32,
}

impl<Q: SpatialQuery + Default> Simulation<Q> {
    pub fn new(config: SimConfig) -> Self {
        Self::with_query(config, Q::default())
    }
}

impl<Q: SpatialQuery> Simulation<Q> {
    pub fn with_query(config: SimConfig, query: Q) -> Self {
        let timestep = FixedTimestep::with_max_steps(config.fixed_dt, config.max_steps_per_frame);
        Self {
            config,
            objects: ObjectSet::new(),
            query,
            graph: ParentGraph::new(),
            timestep,
            anchors: BTreeMap::new(),
            pending: Vec::new(),
            despawned: Vec::new(),
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn fixed_dt(&self) -> f32 {
        self.timestep.dt()
    }

    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.config.viewport = viewport;
    }

    // -- Level content --

    /// Register a scene anchor (moving platform, carrier) at `pos`.
    pub fn add_anchor(&mut self, pos: Vec2) -> EntityId {
        let id = self.next_id();
        self.graph.register(id, pos);
        self.anchors.entry(id).or_default();
        id
    }

    /// Insert level geometry. Colliders tagged with an anchor move with it.
    pub fn add_static(&mut self, desc: ColliderDesc) -> ColliderId {
        let anchor = desc.entity;
        let id = self.query.insert(desc);
        if let Some(anchor) = anchor {
            if self.anchors.contains_key(&anchor) {
                self.anchors.entry(anchor).or_default().push(id);
            } else {
                log::warn!("collider {:?} names unknown anchor {:?}", id, anchor);
            }
        }
        id
    }

    /// Add an object: register its collider, run its one-time init and link it
    /// into the parent graph. It updates after every object already present.
    pub fn spawn(&mut self, mut object: PhysicsObject) -> EntityId {
        let id = object.id();
        self.next_id = self.next_id.max(id.0 + 1);
        if object.body.config().has_collider {
            let body = &object.body;
            let desc = ColliderDesc::new(body.config().layer, body.bounds())
                .with_owner(id, body.peer_flags())
                .with_enabled(body.collider_enabled);
            let collider = self.query.insert(desc);
            object.attach_collider(collider);
        }
        object.init();
        self.graph.register(id, object.position());
        self.graph.set_parent(id, object.body.link().parent());
        log::info!("spawned {:?} '{}' at {:?}", id, object.tag(), object.position());
        self.objects.spawn(object);
        id
    }

    /// Remove an object with its collider and every link pointing at it.
    pub fn despawn(&mut self, id: EntityId) -> Option<PhysicsObject> {
        let object = self.objects.despawn(id)?;
        if let Some(collider) = object.body.collider() {
            self.query.remove(collider);
        }
        self.unlink(id);
        Some(object)
    }

    /// Remove an anchor and its colliders. Objects riding or held by it are released.
    pub fn remove_anchor(&mut self, id: EntityId) -> Result<()> {
        let colliders = self.anchors.remove(&id).ok_or(HopError::UnknownEntity(id))?;
        for collider in colliders {
            self.query.remove(collider);
        }
        self.unlink(id);
        Ok(())
    }

    fn unlink(&mut self, id: EntityId) {
        self.graph.remove(id);
        for idx in 0..self.objects.len() {
            let Some(object) = self.objects.get_index_mut(idx) else { continue };
            let link = *object.body.link();
            if link.carrier == Some(id) {
                let moving_left = object.body.moving_left();
                object.get_dropped(moving_left);
            }
            if link.platform == Some(id) {
                object.body.link.restore();
            }
            if link.original_parent == Some(id) {
                object.body.link.original_parent = None;
            }
            self.sync_object(idx);
        }
    }

    // -- Carry / throw --

    /// Hand `object` to `carrier`; it snaps to the carrier plus its carry offset.
    pub fn pick_up(&mut self, object: EntityId, carrier: EntityId) -> Result<()> {
        let carrier_pos = self.graph.world(carrier).ok_or(HopError::UnknownEntity(carrier))?;
        let idx = self.objects.index_of(object).ok_or(HopError::UnknownEntity(object))?;
        if let Some(obj) = self.objects.get_index_mut(idx) {
            if !obj.body.config().carryable {
                return Err(HopError::NotCarryable(object));
            }
            obj.get_carried();
            obj.body.link.carrier = Some(carrier);
            obj.body.pos = carrier_pos + obj.body.config().carry_offset;
            obj.body.prev_pos = obj.body.pos;
        }
        self.sync_object(idx);
        Ok(())
    }

    pub fn drop_carried(&mut self, object: EntityId, moving_left: bool) -> Result<()> {
        let idx = self.objects.index_of(object).ok_or(HopError::UnknownEntity(object))?;
        if let Some(obj) = self.objects.get_index_mut(idx) {
            obj.get_dropped(moving_left);
        }
        self.sync_object(idx);
        Ok(())
    }

    pub fn throw(&mut self, object: EntityId, facing_right: bool) -> Result<()> {
        let idx = self.objects.index_of(object).ok_or(HopError::UnknownEntity(object))?;
        if let Some(obj) = self.objects.get_index_mut(idx) {
            obj.get_thrown(facing_right);
        }
        self.sync_object(idx);
        Ok(())
    }

    /// Move an anchor, dragging its colliders and everything attached to it.
    pub fn move_anchor(&mut self, id: EntityId, pos: Vec2) -> Result<()> {
        if !self.graph.contains(id) || self.objects.contains(id) {
            return Err(HopError::UnknownEntity(id));
        }
        let delta = self.graph.set_world(id, pos);
        if let Some(colliders) = self.anchors.get(&id) {
            for &collider in colliders {
                if let Some(record) = self.query.collider(collider) {
                    self.query.set_bounds(collider, record.bounds.translated(delta));
                }
            }
        }
        self.drag_children(id, pos, delta);
        Ok(())
    }

    fn drag_children(&mut self, parent: EntityId, parent_pos: Vec2, delta: Vec2) {
        for child in self.graph.children(parent).to_vec() {
            if let Some(idx) = self.objects.index_of(child) {
                let Some(obj) = self.objects.get_index_mut(idx) else { continue };
                let before = obj.body.pos;
                obj.body.pos = if obj.body.link.carrier == Some(parent) {
                    parent_pos + obj.body.config().carry_offset
                } else {
                    before + delta
                };
                let moved = obj.body.pos - before;
                obj.body.prev_pos += moved;
                let now = obj.body.pos;
                self.sync_object(idx);
                self.drag_children(child, now, moved);
            } else if let Some(world) = self.graph.world(child) {
                let _ = self.move_anchor(child, world + delta);
            }
        }
    }

    // -- Stepping --

    /// Advance by one rendered frame: fixed steps, then per-frame updates,
    /// visual timers, visibility checks and despawns. Returns the fixed step count.
    pub fn tick(&mut self, frame_dt: f32) -> u32 {
        self.sync_all();
        let steps = self.timestep.accumulate(frame_dt);
        for _ in 0..steps {
            self.step_fixed(self.timestep.dt());
        }
        self.step_frame(frame_dt);
        self.flush_despawns();
        steps
    }

    /// One fixed step for every object, in insertion order.
    pub fn step_fixed(&mut self, dt: f32) {
        for idx in 0..self.objects.len() {
            self.resolve_impacts(idx, dt);
            let Some(obj) = self.objects.get_index_mut(idx) else { continue };
            let id = obj.id();
            if self.pending.iter().any(|(p, _)| *p == id) {
                continue;
            }
            let outcome = obj.fixed_update(dt, &self.query);
            self.sync_object(idx);
            if let StepOutcome::Despawn(reason) = outcome {
                self.pending.push((id, reason));
            }
        }
        self.flush_despawns();
    }

    fn step_frame(&mut self, frame_dt: f32) {
        let lag_limit = self.config.lag_spike_limit;
        let view = self.config.viewport.map(|v| v.bounds());
        for idx in 0..self.objects.len() {
            let Some(obj) = self.objects.get_index_mut(idx) else { continue };
            let id = obj.id();
            if self.pending.iter().any(|(p, _)| *p == id) {
                continue;
            }
            let mut outcome = obj.frame_update(frame_dt, lag_limit, &self.query);
            if outcome == StepOutcome::Continue {
                outcome = obj.tick_visuals(frame_dt);
            }
            if outcome == StepOutcome::Continue && obj.state() == ObjectState::KnockedAway {
                if let Some(view) = &view {
                    if !view.intersects(&obj.body.bounds()) {
                        outcome = StepOutcome::Despawn(DespawnReason::LeftView);
                    }
                }
            }
            self.sync_object(idx);
            if let StepOutcome::Despawn(reason) = outcome {
                self.pending.push((id, reason));
            }
        }
    }

    /// A thrown object touching combat-capable objects knocks them away and
    /// credits the kill to their combo tracker.
    fn resolve_impacts(&mut self, idx: usize, dt: f32) {
        let Some(thrower) = self.objects.get_index(idx) else { return };
        if !thrower.body.has_been_thrown() {
            return;
        }
        let thrower_id = thrower.id();
        let contact = carry::contact_bounds(&thrower.body, dt);
        let mut hits: Vec<(EntityId, bool)> = Vec::new();
        for record in self.query.overlapping(&contact, LayerMask::ALL) {
            let Some(target_id) = record.entity.filter(|&e| e != thrower_id) else { continue };
            if hits.iter().any(|(h, _)| *h == target_id) {
                continue;
            }
            // Anchors own colliders too; only objects can be knocked away.
            let Some(target) = self.objects.get(target_id) else { continue };
            if let Some(moving_left) = carry::thrown_impact(&thrower.body, &target.body) {
                hits.push((target_id, moving_left));
            }
        }
        for (target_id, moving_left) in hits {
            let Some(target_idx) = self.objects.index_of(target_id) else { continue };
            let Some(target) = self.objects.get_index_mut(target_idx) else { continue };
            if target.knock_away(moving_left, true, None, None) {
                log::debug!("{:?} knocked away {:?}", thrower_id, target_id);
                target.collaborators().combo.register_shell_kill(target_id);
            }
            self.sync_object(target_idx);
        }
    }

    fn flush_despawns(&mut self) {
        for (id, reason) in std::mem::take(&mut self.pending) {
            if self.despawn(id).is_some() {
                log::info!("despawned {:?}: {:?}", id, reason);
                self.despawned.push((id, reason));
            }
        }
    }

    fn sync_all(&mut self) {
        for idx in 0..self.objects.len() {
            self.sync_object(idx);
        }
    }

    /// Mirror an object's collider and parent state into the backend and graph.
    fn sync_object(&mut self, idx: usize) {
        let Some(obj) = self.objects.get_index(idx) else { return };
        let body = &obj.body;
        if let Some(collider) = body.collider() {
            self.query.set_bounds(collider, body.bounds());
            self.query.set_enabled(collider, body.collider_enabled);
            self.query.set_peer(collider, body.peer_flags());
        }
        self.graph.set_parent(body.id(), body.link().parent());
        self.graph.set_world(body.id(), body.position());
    }

    // -- Queries --

    /// Where to draw `id` this frame.
    pub fn render_position(&self, id: EntityId) -> Option<Vec2> {
        let alpha = self.timestep.alpha();
        self.objects.get(id).map(|o| o.render_position(alpha))
    }

    pub fn despawned(&self) -> &[(EntityId, DespawnReason)] {
        &self.despawned
    }

    pub fn take_despawned(&mut self) -> Vec<(EntityId, DespawnReason)> {
        std::mem::take(&mut self.despawned)
    }

    pub fn snapshot(&self) -> Vec<ObjectSnapshot> {
        self.objects.iter().map(PhysicsObject::snapshot).collect()
    }
}

impl<Q: SpatialQuery + Default> Default for Simulation<Q> {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::collaborators::{CollaboratorEvent, Collaborators};
    use crate::components::config::PhysicsConfig;
    use crate::components::state::{MovementMode, UpdateMode};
    use crate::core::layers::Layer;
    use crate::core::query::SurfaceTag;

    const DT: f32 = 1.0 / 50.0;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    fn sim_with_ground() -> Simulation {
        let mut sim: Simulation = Simulation::default();
        sim.add_static(ColliderDesc::block(Layer::GROUND, Vec2::new(-50.0, -1.0), Vec2::new(50.0, 0.0)));
        sim
    }

    fn resting(config: PhysicsConfig) -> PhysicsConfig {
        config.with_velocity(Vec2::ZERO)
    }

    #[test]
    fn spawn_registers_collider_and_despawn_removes_it() {
        let mut sim = sim_with_ground();
        let id = sim.next_id();
        sim.spawn(PhysicsObject::new(id, Vec2::new(0.0, 3.0), PhysicsConfig::default()));
        assert_eq!(sim.query.len(), 2);
        let collider = sim.objects.get(id).and_then(|o| o.body.collider()).unwrap();
        assert_eq!(sim.query.collider(collider).and_then(|c| c.entity), Some(id));

        sim.despawn(id);
        assert_eq!(sim.query.len(), 1);
        assert!(sim.objects.is_empty());
    }

    #[test]
    fn fixed_steps_follow_frame_time() {
        let mut sim = sim_with_ground();
        let id = sim.next_id();
        sim.spawn(PhysicsObject::new(id, Vec2::new(0.0, 10.0), resting(PhysicsConfig::default())));
        assert_eq!(sim.tick(0.05), 2);
        assert_eq!(sim.tick(1.0), 10);
    }

    #[test]
    fn objects_rest_on_each_other() {
        let mut sim = sim_with_ground();
        let bottom = sim.next_id();
        sim.spawn(PhysicsObject::new(bottom, Vec2::new(0.0, 0.5), resting(PhysicsConfig::default())));
        let top = sim.next_id();
        sim.spawn(PhysicsObject::new(top, Vec2::new(0.0, 3.0), resting(PhysicsConfig::default())));
        for _ in 0..100 {
            sim.tick(DT);
        }
        let top = sim.objects.get(top).unwrap();
        assert_eq!(top.state(), ObjectState::Grounded);
        assert!((top.position().y - 1.5).abs() < 1e-3, "y was {}", top.position().y);
    }

    #[test]
    fn moving_platform_carries_riders() {
        let mut sim: Simulation = Simulation::default();
        let platform = sim.add_anchor(Vec2::ZERO);
        sim.add_static(
            ColliderDesc::block(Layer::PLATFORM, Vec2::new(-2.0, -0.25), Vec2::new(2.0, 0.25))
                .with_tag(SurfaceTag::MovingPlatform)
                .with_anchor(platform),
        );
        let rider = sim.next_id();
        sim.spawn(PhysicsObject::new(rider, Vec2::new(0.0, 0.75), resting(PhysicsConfig::default())));

        sim.tick(DT);
        assert_eq!(sim.graph.parent(rider), Some(platform));

        sim.move_anchor(platform, Vec2::new(1.0, 0.5)).unwrap();
        let pos = sim.objects.get(rider).unwrap().position();
        assert!(approx(pos, Vec2::new(1.0, 1.25)), "rider at {:?}", pos);

        sim.tick(DT);
        let rider = sim.objects.get(rider).unwrap();
        assert_eq!(rider.state(), ObjectState::Grounded);
        assert!(approx(rider.position(), Vec2::new(1.0, 1.25)));
    }

    #[test]
    fn carried_objects_follow_the_carrier_only() {
        let mut sim = sim_with_ground();
        let player = sim.add_anchor(Vec2::new(0.0, 2.0));
        let crate_id = sim.next_id();
        let mut config = PhysicsConfig::default().carryable().with_velocity(Vec2::new(4.0, 0.0));
        config.carry_offset = Vec2::new(0.0, 1.0);
        sim.spawn(PhysicsObject::new(crate_id, Vec2::new(5.0, 0.5), config));

        sim.pick_up(crate_id, player).unwrap();
        for i in 1..=100 {
            sim.move_anchor(player, Vec2::new(i as f32 * 0.1, 2.0)).unwrap();
            sim.tick(DT);
        }
        let held = sim.objects.get(crate_id).unwrap();
        assert!(approx(held.position(), Vec2::new(10.0, 3.0)), "held at {:?}", held.position());
        assert!(!held.body.collider_enabled());

        sim.drop_carried(crate_id, false).unwrap();
        for _ in 0..100 {
            sim.tick(DT);
        }
        let dropped = sim.objects.get(crate_id).unwrap();
        assert_eq!(dropped.state(), ObjectState::Grounded);
        assert_eq!(sim.graph.parent(crate_id), None);
    }

    #[test]
    fn picking_up_requires_carryable() {
        let mut sim = sim_with_ground();
        let player = sim.add_anchor(Vec2::ZERO);
        let id = sim.next_id();
        sim.spawn(PhysicsObject::new(id, Vec2::new(0.0, 0.5), PhysicsConfig::default()));
        assert!(matches!(sim.pick_up(id, player), Err(HopError::NotCarryable(_))));
        assert!(matches!(sim.pick_up(EntityId(99), player), Err(HopError::UnknownEntity(_))));
    }

    #[test]
    fn thrown_shell_knocks_away_enemy() {
        let (collab, log) = Collaborators::recording();
        let mut sim = sim_with_ground();

        let shell = sim.next_id();
        let shell_config = resting(PhysicsConfig::default().carryable()).with_state(ObjectState::Grounded);
        sim.spawn(PhysicsObject::new(shell, Vec2::new(0.0, 0.5), shell_config).with_collaborators(collab.clone()));
        let enemy = sim.next_id();
        let enemy_config = resting(PhysicsConfig::default()).with_state(ObjectState::Grounded);
        sim.spawn(PhysicsObject::new(enemy, Vec2::new(1.0, 0.5), enemy_config).with_collaborators(collab));

        sim.throw(shell, true).unwrap();
        sim.tick(DT);

        let enemy_obj = sim.objects.get(enemy).unwrap();
        assert_eq!(enemy_obj.state(), ObjectState::KnockedAway);
        assert!(!enemy_obj.body.moving_left());
        assert_eq!(
            log.events(),
            vec![CollaboratorEvent::ShellChainStarted, CollaboratorEvent::ShellKill(enemy)]
        );
    }

    #[test]
    fn knocked_away_objects_despawn_off_screen() {
        let mut sim: Simulation = Simulation::default();
        sim.set_viewport(Some(Viewport { min: Vec2::splat(-10.0), max: Vec2::splat(10.0) }));
        let id = sim.next_id();
        sim.spawn(PhysicsObject::new(id, Vec2::new(0.0, 5.0), PhysicsConfig::default()));
        assert!(sim.objects.get_mut(id).unwrap().knock_away(false, false, None, None));

        for _ in 0..100 {
            sim.tick(DT);
        }
        assert!(sim.objects.get(id).is_none());
        assert_eq!(sim.despawned(), [(id, DespawnReason::LeftView)].as_slice());
    }

    #[test]
    fn knocked_away_still_objects_leave_the_view() {
        let mut sim: Simulation = Simulation::default();
        sim.set_viewport(Some(Viewport { min: Vec2::splat(-10.0), max: Vec2::splat(10.0) }));
        let id = sim.next_id();
        let config = PhysicsConfig::default().with_movement(MovementMode::Still);
        sim.spawn(PhysicsObject::new(id, Vec2::new(0.0, 5.0), config));
        assert!(sim.objects.get_mut(id).unwrap().knock_away(false, false, None, None));

        for _ in 0..300 {
            sim.tick(DT);
        }
        assert_eq!(sim.despawned(), [(id, DespawnReason::LeftView)].as_slice());
    }

    #[test]
    fn fade_out_despawns_early() {
        let mut sim: Simulation = Simulation::default();
        let id = sim.next_id();
        let config = PhysicsConfig::default().with_disappear_time(0.1);
        sim.spawn(PhysicsObject::new(id, Vec2::new(0.0, 5.0), config));
        sim.objects.get_mut(id).unwrap().knock_away(true, false, None, None);
        for _ in 0..10 {
            sim.tick(DT);
        }
        assert_eq!(sim.take_despawned(), vec![(id, DespawnReason::FadedOut)]);
    }

    #[test]
    fn objects_sink_in_lava_and_despawn() {
        let mut sim: Simulation = Simulation::default();
        sim.add_static(ColliderDesc::block(Layer::LAVA, Vec2::new(-5.0, -10.0), Vec2::new(5.0, 0.0)));
        let id = sim.next_id();
        sim.spawn(PhysicsObject::new(id, Vec2::new(0.0, 0.5), resting(PhysicsConfig::default())));
        for _ in 0..300 {
            sim.tick(DT);
        }
        assert_eq!(sim.despawned(), [(id, DespawnReason::Submerged)].as_slice());
    }

    #[test]
    fn per_frame_objects_skip_first_frame_and_lag_spikes() {
        let mut sim: Simulation = Simulation::default();
        let id = sim.next_id();
        let config = resting(PhysicsConfig::default()).with_update_mode(UpdateMode::PerFrame);
        sim.spawn(PhysicsObject::new(id, Vec2::new(0.0, 50.0), config));

        sim.tick(DT);
        assert_eq!(sim.objects.get(id).unwrap().body.velocity().y, 0.0);
        sim.tick(DT);
        let vy = sim.objects.get(id).unwrap().body.velocity().y;
        assert!((vy + 1.2).abs() < 1e-4);
        sim.tick(0.5);
        assert_eq!(sim.objects.get(id).unwrap().body.velocity().y, vy);
    }

    #[test]
    fn still_objects_ignore_ticks() {
        let mut sim: Simulation = Simulation::default();
        let id = sim.next_id();
        let config = PhysicsConfig::default().with_movement(MovementMode::Still);
        sim.spawn(PhysicsObject::new(id, Vec2::new(3.0, 3.0), config));
        for _ in 0..20 {
            sim.tick(DT);
        }
        assert_eq!(sim.render_position(id), Some(Vec2::new(3.0, 3.0)));
    }

    #[test]
    fn removing_a_carrier_drops_its_load() {
        let mut sim = sim_with_ground();
        let player = sim.add_anchor(Vec2::new(0.0, 2.0));
        let id = sim.next_id();
        sim.spawn(PhysicsObject::new(id, Vec2::new(0.0, 0.5), PhysicsConfig::default().carryable()));
        sim.pick_up(id, player).unwrap();
        sim.remove_anchor(player).unwrap();
        let obj = sim.objects.get(id).unwrap();
        assert!(!obj.body.is_carried());
        assert_eq!(obj.state(), ObjectState::Falling);
    }

    #[test]
    fn sim_config_rejects_zero_step() {
        let config = SimConfig { fixed_dt: 0.0, ..Default::default() };
        assert!(config.validate().is_err());
        assert!(SimConfig::default().validate().is_ok());
    }
}
