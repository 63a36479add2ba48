use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::collaborators::Collaborators;
use crate::api::simulation::{SimConfig, Simulation};
use crate::api::types::EntityId;
use crate::components::config::PhysicsConfig;
use crate::components::object::PhysicsObject;
use crate::core::layers::Layer;
use crate::core::query::{ColliderDesc, SpatialQuery, SurfaceTag};
use crate::error::{HopError, Result};

/// A level: static geometry, anchors that move it, and the objects to spawn.
/// Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelDesc {
    #[serde(default)]
    pub sim: SimConfig,
    /// Named anchors (moving platforms, carriers).
    #[serde(default)]
    pub anchors: Vec<AnchorDesc>,
    #[serde(default)]
    pub colliders: Vec<StaticColliderDesc>,
    #[serde(default)]
    pub objects: Vec<ObjectDesc>,
}

/// Describes a scene anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorDesc {
    pub name: String,
    pub position: Vec2,
    /// Optional back-and-forth motion around `position`.
    #[serde(default)]
    pub motion: Option<AnchorMotion>,
}

/// Sinusoidal oscillation: `position + amplitude * sin(2π t / period)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorMotion {
    pub amplitude: Vec2,
    /// Seconds per full cycle.
    pub period: f32,
}

impl AnchorDesc {
    /// Where the anchor sits `t` seconds into the level.
    pub fn position_at(&self, t: f32) -> Vec2 {
        match self.motion {
            Some(m) if m.period > 0.0 => {
                self.position + m.amplitude * (std::f32::consts::TAU * t / m.period).sin()
            }
            _ => self.position,
        }
    }
}

/// Describes one box or slope of level geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticColliderDesc {
    pub layer: Layer,
    pub min: Vec2,
    pub max: Vec2,
    #[serde(default)]
    pub tag: Option<SurfaceTag>,
    /// Name of the anchor this collider moves with.
    #[serde(default)]
    pub anchor: Option<String>,
}

/// Describes an object to spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDesc {
    #[serde(default)]
    pub tag: String,
    pub position: Vec2,
    #[serde(default)]
    pub config: PhysicsConfig,
    /// Name of the anchor the object starts under.
    #[serde(default)]
    pub parent: Option<String>,
    /// Whether an interpolation backend is available.
    #[serde(default)]
    pub interpolation: bool,
    #[serde(default = "default_sprite")]
    pub sprite: bool,
}

fn default_sprite() -> bool {
    true
}

/// IDs handed out while building a level.
#[derive(Debug, Clone, Default)]
pub struct LoadedLevel {
    pub anchors: BTreeMap<String, EntityId>,
    pub objects: Vec<EntityId>,
}

impl LevelDesc {
    /// Parse a level from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a level file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Validated simulation settings for this level.
    pub fn sim_config(&self) -> Result<SimConfig> {
        self.sim.clone().validate()
    }

    /// Add everything to `sim`. Every object reports to `collab`.
    pub fn build<Q: SpatialQuery>(&self, sim: &mut Simulation<Q>, collab: &Collaborators) -> Result<LoadedLevel> {
        let mut loaded = LoadedLevel::default();
        for anchor in &self.anchors {
            if loaded.anchors.contains_key(&anchor.name) {
                return Err(HopError::InvalidConfig {
                    field: "anchors",
                    reason: format!("duplicate anchor '{}'", anchor.name),
                });
            }
            let id = sim.add_anchor(anchor.position);
            loaded.anchors.insert(anchor.name.clone(), id);
        }

        for collider in &self.colliders {
            let mut desc = ColliderDesc::block(collider.layer, collider.min.min(collider.max), collider.max.max(collider.min));
            if let Some(tag) = collider.tag {
                desc = desc.with_tag(tag);
            }
            if let Some(name) = &collider.anchor {
                desc = desc.with_anchor(lookup(&loaded.anchors, name)?);
            }
            sim.add_static(desc);
        }

        for object in &self.objects {
            let config = object.config.clone().validate()?;
            let id = sim.next_id();
            let mut obj = PhysicsObject::new(id, object.position, config)
                .with_collaborators(collab.clone())
                .with_interpolation(object.interpolation)
                .with_tag(object.tag.clone());
            if let Some(name) = &object.parent {
                obj = obj.with_parent(lookup(&loaded.anchors, name)?);
            }
            if !object.sprite {
                obj = obj.without_sprite();
            }
            loaded.objects.push(sim.spawn(obj));
        }

        log::info!(
            "level built: {} anchors, {} colliders, {} objects",
            loaded.anchors.len(),
            self.colliders.len(),
            loaded.objects.len()
        );
        Ok(loaded)
    }
}

fn lookup(anchors: &BTreeMap<String, EntityId>, name: &str) -> Result<EntityId> {
    anchors.get(name).copied().ok_or_else(|| HopError::InvalidConfig {
        field: "anchor",
        reason: format!("unknown anchor '{}'", name),
    })
}
