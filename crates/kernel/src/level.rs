//! JSON level descriptions.
//!
//! A level lists the actor's start pose and every scene entity. Loading
//! validates colliders and names before anything is spawned.

use fetch_common::{EntityClass, Transform};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::world::{Collider, GroundProbe, NamedPoint, SceneEntity, World};

/// Errors from level parsing and validation.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("entity '{0}' has a collider with non-positive dimensions")]
    InvalidCollider(String),
    #[error("duplicate entity name '{0}'")]
    DuplicateName(String),
    #[error("prop '{0}' has no collider")]
    PropWithoutCollider(String),
}

/// Actor pose at level start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorStart {
    pub position: Vec3,
    #[serde(default)]
    pub yaw_degrees: f32,
}

impl ActorStart {
    pub fn transform(&self) -> Transform {
        Transform::from_position_yaw(self.position, self.yaw_degrees)
    }
}

fn default_collidable() -> bool {
    true
}

/// One scene entity as written in a level file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescription {
    pub name: String,
    pub class: EntityClass,
    pub position: Vec3,
    #[serde(default)]
    pub yaw_degrees: f32,
    #[serde(default)]
    pub collider: Option<Collider>,
    #[serde(default = "default_collidable")]
    pub collidable: bool,
    #[serde(default)]
    pub attachment_points: Vec<NamedPoint>,
}

impl EntityDescription {
    fn to_entity(&self) -> SceneEntity {
        SceneEntity {
            name: self.name.clone(),
            class: self.class,
            transform: Transform::from_position_yaw(self.position, self.yaw_degrees),
            collider: self.collider,
            collidable: self.collidable,
            attachment_points: self.attachment_points.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescription {
    pub name: String,
    #[serde(default)]
    pub actor: ActorStart,
    #[serde(default)]
    pub ground_probe: GroundProbe,
    pub entities: Vec<EntityDescription>,
}

/// A validated level: the populated world plus the actor start pose.
#[derive(Debug, Clone)]
pub struct LoadedLevel {
    pub name: String,
    pub world: World,
    pub actor_start: Transform,
}

impl LevelDescription {
    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        let mut names = BTreeSet::new();
        for e in &self.entities {
            if !names.insert(e.name.as_str()) {
                return Err(LevelError::DuplicateName(e.name.clone()));
            }
            match e.collider {
                Some(c) if !c.is_valid() => {
                    return Err(LevelError::InvalidCollider(e.name.clone()));
                }
                None if e.class == EntityClass::Prop => {
                    return Err(LevelError::PropWithoutCollider(e.name.clone()));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Validate and spawn every entity into a fresh world.
    pub fn load(&self) -> Result<LoadedLevel, LevelError> {
        self.validate()?;
        let mut world = World::with_ground_probe(self.ground_probe);
        for e in &self.entities {
            world.spawn(e.to_entity());
        }
        tracing::info!(
            level = %self.name,
            entities = world.entity_count(),
            "level loaded"
        );
        Ok(LoadedLevel {
            name: self.name.clone(),
            world,
            actor_start: self.actor.transform(),
        })
    }
}
