//! Carried-object model: ownership of a prop while the actor holds it.

use fetch_common::{EntityClass, EntityId, Scene, SceneError, Transform};
use glam::{Quat, Vec3};

use crate::actor::Actor;

/// A prop held in the actor's mouth.
///
/// The prop itself stays in the scene; this records how it hangs off the
/// mouth anchor. `attachment_offset` is frozen at pickup and survives every
/// rollback until the prop is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct CarriedObject {
    prop: EntityId,
    attachment_point: String,
    /// Prop origin minus the chosen attachment point, in world space at pickup.
    attachment_offset: Vec3,
    /// Actor rotation when the offset was frozen.
    pickup_rotation: Quat,
    /// Prop transform relative to the mouth anchor.
    local: Transform,
}

impl CarriedObject {
    /// Capture `prop_transform` relative to the actor's current mouth anchor.
    pub(crate) fn attach(
        actor: &Actor,
        prop: EntityId,
        prop_transform: Transform,
        attachment_point: String,
        attachment_offset: Vec3,
    ) -> Self {
        let anchor = actor.anchor_transform();
        let inverse = anchor.rotation.inverse();
        Self {
            prop,
            attachment_point,
            attachment_offset,
            pickup_rotation: actor.rotation(),
            local: Transform {
                position: inverse * (prop_transform.position - anchor.position),
                rotation: inverse * prop_transform.rotation,
                scale: prop_transform.scale,
            },
        }
    }

    pub fn prop(&self) -> EntityId {
        self.prop
    }

    pub fn attachment_point(&self) -> &str {
        &self.attachment_point
    }

    pub fn attachment_offset(&self) -> Vec3 {
        self.attachment_offset
    }

    /// Prop world transform for the given anchor (anchor ∘ local).
    pub fn world_transform(&self, anchor: &Transform) -> Transform {
        Transform {
            position: anchor.position + anchor.rotation * self.local.position,
            rotation: anchor.rotation * self.local.rotation,
            scale: self.local.scale,
        }
    }

    /// Where the prop lands when dropped: the actor-local drop offset plus
    /// the frozen attachment offset, both turned with the actor since pickup.
    pub fn drop_position(&self, actor: &Actor, drop_offset: Vec3) -> Vec3 {
        let offset_in_actor = self.pickup_rotation.inverse() * self.attachment_offset;
        actor.transform().transform_point(drop_offset + offset_in_actor)
    }
}

/// Write the carried prop's derived transform into the scene.
pub(crate) fn sync_carried(actor: &Actor, scene: &mut dyn Scene) -> Result<(), SceneError> {
    let Some(carried) = actor.carried() else {
        return Ok(());
    };
    scene.set_transform(carried.prop, carried.world_transform(&actor.anchor_transform()))
}

/// Sync the carried prop and report whether it now overlaps an obstacle.
/// Always false when nothing is carried.
pub(crate) fn carried_hits_obstacle(actor: &Actor, scene: &mut dyn Scene) -> bool {
    let Some(carried) = actor.carried() else {
        return false;
    };
    let bounds = sync_carried(actor, scene).and_then(|()| scene.bounds(carried.prop));
    match bounds {
        Ok(b) => !scene
            .overlap_box(b.center(), b.half_extents(), EntityClass::Obstacle)
            .is_empty(),
        Err(err) => {
            tracing::warn!(%err, "cannot check carried prop against obstacles");
            false
        }
    }
}
