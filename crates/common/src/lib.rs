//! Shared types for the fetch controller: identifiers, transforms, scene
//! classification, geometry, and the capability traits the core consumes.
//!
//! # Invariants
//! - The core never reaches into a global scene; it only talks to the traits
//!   in [`capability`].
//! - Classification is explicit ([`EntityClass`]), never string tags.

pub mod action;
pub mod capability;
pub mod geometry;
pub mod types;

pub use action::PendingAction;
pub use capability::{Animator, AudioCue, CollisionQuery, PropAccess, Scene, SceneError};
pub use geometry::{Aabb, Sphere, Volume};
pub use types::{AttachmentPoint, EntityClass, EntityId, FORWARD, RayHit, Transform};

/// Crate name and version, for diagnostics.
pub fn crate_info() -> &'static str {
    concat!("fetch-common v", env!("CARGO_PKG_VERSION"))
}
