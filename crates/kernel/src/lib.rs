//! Scene kernel: authoritative scene state and the spatial queries the
//! controller consumes.
//!
//! # Invariants
//! - All state mutations flow through explicit operations and are logged.
//! - Queries never report entities whose collidability is disabled.
//! - Iteration order is deterministic (BTreeMap).

pub mod level;
pub mod triggers;
pub mod world;

pub use level::{ActorStart, EntityDescription, LevelDescription, LevelError, LoadedLevel};
pub use triggers::{TriggerEvent, TriggerTracker};
pub use world::{Collider, GroundProbe, NamedPoint, SceneEntity, SceneEvent, World};

/// Crate name and version, for diagnostics.
pub fn crate_info() -> &'static str {
    concat!("fetch-kernel v", env!("CARGO_PKG_VERSION"))
}
