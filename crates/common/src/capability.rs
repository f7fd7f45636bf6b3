//! Capabilities the controller consumes from the surrounding scene.
//!
//! The core never owns geometry, animation, or audio. It is handed trait
//! objects for these each frame and only issues the calls below.

use glam::Vec3;

use crate::geometry::Aabb;
use crate::types::{AttachmentPoint, EntityClass, EntityId, RayHit, Transform};

/// Errors raised when the scene lacks wiring an action depends on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("entity {0:?} not found")]
    EntityNotFound(EntityId),
    #[error("entity {0:?} has no collider")]
    NoCollider(EntityId),
}

/// Read-only spatial queries. Only collidable entities are ever reported.
pub trait CollisionQuery {
    /// Whether a downward probe from slightly above `point` finds ground
    /// within the scene's probe range.
    fn is_grounded(&self, point: Vec3) -> bool;

    /// Nearest entity of `class` hit by a ray, within `max_distance`.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        class: EntityClass,
    ) -> Option<RayHit>;

    /// Entities of `class` whose collider shapes touch the sphere.
    fn overlap_sphere(&self, center: Vec3, radius: f32, class: EntityClass) -> Vec<EntityId>;

    /// Entities of `class` whose collider shapes overlap the box.
    fn overlap_box(&self, center: Vec3, half_extents: Vec3, class: EntityClass) -> Vec<EntityId>;
}

/// Mutable access to props, used during pickup, carry, and drop.
pub trait PropAccess {
    fn transform(&self, id: EntityId) -> Result<Transform, SceneError>;

    fn set_transform(&mut self, id: EntityId, transform: Transform) -> Result<(), SceneError>;

    /// Named attachment points of a prop, in world space.
    fn attachment_points(&self, id: EntityId) -> Result<Vec<AttachmentPoint>, SceneError>;

    /// Current world bounds of the prop's collider.
    fn bounds(&self, id: EntityId) -> Result<Aabb, SceneError>;

    fn set_collidable(&mut self, id: EntityId, collidable: bool) -> Result<(), SceneError>;

    fn is_collidable(&self, id: EntityId) -> Result<bool, SceneError>;
}

/// Everything an action needs from the world.
pub trait Scene: CollisionQuery + PropAccess {}

impl<T: CollisionQuery + PropAccess> Scene for T {}

/// Animation playback on the actor's rig.
pub trait Animator {
    fn play(&mut self, clip: &str);

    /// Whether `clip` is the state currently running.
    fn is_playing(&self, clip: &str) -> bool;

    /// Length in seconds of the currently running clip, if any.
    fn current_clip_duration(&self) -> Option<f32>;
}

/// Fire-and-forget sound cues.
pub trait AudioCue {
    fn play_one_shot(&mut self, cue: &str);
}
