use fetch_common::{EntityClass, EntityId};
use glam::Vec3;
use std::collections::BTreeSet;

use crate::world::World;

/// Enter/exit transition of a tracked point against a trigger volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    Entered { id: EntityId, class: EntityClass },
    Exited { id: EntityId, class: EntityClass },
}

/// Tracks which trigger volumes contain the actor and reports transitions.
///
/// Only classes for which [`EntityClass::is_trigger`] holds are tracked.
/// A trigger that is despawned while occupied produces no exit event.
#[derive(Debug, Clone, Default)]
pub struct TriggerTracker {
    inside: BTreeSet<EntityId>,
}

impl TriggerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_inside(&self, id: EntityId) -> bool {
        self.inside.contains(&id)
    }

    /// Compare `point` against every trigger volume and return the
    /// transitions since the previous update, in id order.
    pub fn update(&mut self, world: &World, point: Vec3) -> Vec<TriggerEvent> {
        let mut events = Vec::new();
        let mut now_inside = BTreeSet::new();

        for (id, entity) in world.entities() {
            if !entity.class.is_trigger() || !entity.collidable {
                continue;
            }
            let Some(volume) = entity.volume() else {
                continue;
            };
            if volume.contains(point) {
                now_inside.insert(*id);
                if !self.inside.contains(id) {
                    events.push(TriggerEvent::Entered {
                        id: *id,
                        class: entity.class,
                    });
                }
            } else if self.inside.contains(id) {
                events.push(TriggerEvent::Exited {
                    id: *id,
                    class: entity.class,
                });
            }
        }

        self.inside = now_inside;

        for event in &events {
            tracing::debug!(?event, "trigger transition");
        }
        events
    }
}
