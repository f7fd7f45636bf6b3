use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Local-space forward axis shared by the actor and every prop.
pub const FORWARD: Vec3 = Vec3::NEG_Z;

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Transform at `position` turned `yaw_degrees` counter-clockwise about +Y.
    pub fn from_position_yaw(position: Vec3, yaw_degrees: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(yaw_degrees.to_radians()),
            ..Self::default()
        }
    }

    /// World-space forward direction.
    pub fn forward(&self) -> Vec3 {
        self.rotation * FORWARD
    }

    /// Map a point from local space into world space (scale ignored).
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }
}

/// Explicit scene classification. Replaces tag and layer lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityClass {
    /// Walkable surface; the only class `is_grounded` accepts.
    Ground,
    /// Blocks movement rays and carried props.
    Obstacle,
    /// Can be picked up.
    Prop,
    /// Trigger volume that completes the level when entered while carrying.
    Goal,
    /// Decoration; ignored by every query the core issues.
    Scenery,
}

impl EntityClass {
    /// Classes whose volumes act as enter/exit triggers for the actor.
    pub fn is_trigger(self) -> bool {
        matches!(self, Self::Goal)
    }
}

/// Result of a directional ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: EntityId,
    pub point: Vec3,
    pub distance: f32,
}

/// Named grab location on a prop, in world space at query time.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentPoint {
    pub name: String,
    pub position: Vec3,
}
