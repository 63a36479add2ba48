use std::rc::Rc;

use serde::Serialize;

use hop_engine::{
    CollaboratorEvent, Collaborators, CollisionWorld, DespawnReason, EntityId, EventLog, LevelDesc,
    LoadedLevel, ObjectSnapshot, Simulation, SpatialQuery,
};

/// One line of the JSON trace.
#[derive(Debug, Serialize)]
pub struct FrameTrace {
    pub frame: u64,
    pub time: f32,
    pub steps: u32,
    pub objects: Vec<ObjectSnapshot>,
    pub despawned: Vec<(EntityId, DespawnReason)>,
    pub events: Vec<CollaboratorEvent>,
}

/// Drives a level through its simulation frame by frame.
///
/// Anchors with motion are moved to their scripted position before each
/// frame; collaborator calls are collected and reported per frame.
pub struct ScenarioRunner<Q: SpatialQuery = CollisionWorld> {
    level: LevelDesc,
    loaded: LoadedLevel,
    sim: Simulation<Q>,
    events: Rc<EventLog>,
    frame: u64,
    elapsed: f32,
}

impl<Q: SpatialQuery + Default> ScenarioRunner<Q> {
    pub fn new(level: LevelDesc) -> hop_engine::Result<Self> {
        let mut sim = Simulation::new(level.sim_config()?);
        let (collab, events) = Collaborators::recording();
        let loaded = level.build(&mut sim, &collab)?;
        Ok(Self {
            level,
            loaded,
            sim,
            events,
            frame: 0,
            elapsed: 0.0,
        })
    }
}

impl<Q: SpatialQuery> ScenarioRunner<Q> {
    /// Run one frame and return what happened in it.
    pub fn tick(&mut self, dt: f32) -> hop_engine::Result<FrameTrace> {
        self.elapsed += dt;
        self.frame += 1;

        for anchor in self.level.anchors.iter().filter(|a| a.motion.is_some()) {
            if let Some(&id) = self.loaded.anchors.get(&anchor.name) {
                self.sim.move_anchor(id, anchor.position_at(self.elapsed))?;
            }
        }

        let steps = self.sim.tick(dt);
        let events = self.events.drain();
        for event in &events {
            log::debug!("frame {}: {:?}", self.frame, event);
        }
        Ok(FrameTrace {
            frame: self.frame,
            time: self.elapsed,
            steps,
            objects: self.sim.snapshot(),
            despawned: self.sim.take_despawned(),
            events,
        })
    }

    pub fn simulation(&self) -> &Simulation<Q> {
        &self.sim
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"{
        "anchors": [
            { "name": "lift", "position": [0.0, 0.0], "motion": { "amplitude": [2.0, 0.0], "period": 2.0 } }
        ],
        "colliders": [
            { "layer": 4, "min": [-1.5, -0.25], "max": [1.5, 0.25], "tag": { "kind": "moving_platform" }, "anchor": "lift" },
            { "layer": 5, "min": [-30.0, -20.0], "max": [30.0, -10.0] }
        ],
        "objects": [
            { "tag": "rider", "position": [0.0, 0.75], "config": { "velocity": [0.0, 0.0] } },
            { "tag": "faller", "position": [10.0, -9.0], "config": { "velocity": [0.0, 0.0] } }
        ]
    }"#;

    #[test]
    fn rider_follows_the_lift() {
        let level = LevelDesc::from_json(LEVEL).unwrap();
        let mut runner: ScenarioRunner = ScenarioRunner::new(level).unwrap();
        let mut last = None;
        for _ in 0..25 {
            last = Some(runner.tick(0.02).unwrap());
        }
        let trace = last.unwrap();
        assert_eq!(trace.frame, 25);
        let rider = trace.objects.iter().find(|o| o.tag == "rider").unwrap();
        // The rider boards during frame 1 and then tracks the lift, which peaks at t = 0.5.
        let expected = 2.0 - 2.0 * (std::f32::consts::PI * 0.02).sin();
        assert!((rider.position[0] - expected).abs() < 0.01, "rider at {:?}", rider.position);
    }

    #[test]
    fn lava_despawns_show_up_in_the_trace() {
        let level = LevelDesc::from_json(LEVEL).unwrap();
        let mut runner: ScenarioRunner = ScenarioRunner::new(level).unwrap();
        let mut despawned = Vec::new();
        for _ in 0..400 {
            despawned.extend(runner.tick(0.02).unwrap().despawned);
        }
        assert_eq!(despawned.len(), 1);
        assert_eq!(despawned[0].1, DespawnReason::Submerged);
        assert_eq!(runner.simulation().objects.len(), 1);
    }
}
