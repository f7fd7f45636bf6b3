use fetch_common::Transform;
use glam::{Quat, Vec3};

use crate::carry::CarriedObject;

/// Pickup/drop state of the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarryState {
    #[default]
    Empty,
    PickingUp,
    Carrying,
    Dropping,
}

/// The player-controlled entity.
///
/// Mutated only by the sequencer and the action it is currently running.
/// External collaborators get read access.
#[derive(Debug, Clone)]
pub struct Actor {
    transform: Transform,
    /// Mouth anchor in actor-local space.
    mouth_anchor: Vec3,
    carried: Option<CarriedObject>,
    carry_state: CarryState,
    busy: bool,
}

impl Actor {
    pub fn new(transform: Transform, mouth_anchor: Vec3) -> Self {
        Self {
            transform,
            mouth_anchor,
            carried: None,
            carry_state: CarryState::Empty,
            busy: false,
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    /// World transform of the mouth anchor. Shares the actor's rotation.
    pub fn anchor_transform(&self) -> Transform {
        Transform {
            position: self.transform.transform_point(self.mouth_anchor),
            rotation: self.transform.rotation,
            scale: Vec3::ONE,
        }
    }

    pub fn mouth_anchor_position(&self) -> Vec3 {
        self.anchor_transform().position
    }

    pub fn carried(&self) -> Option<&CarriedObject> {
        self.carried.as_ref()
    }

    pub fn is_carrying(&self) -> bool {
        self.carried.is_some()
    }

    pub fn carry_state(&self) -> CarryState {
        self.carry_state
    }

    /// True while the sequencer is draining its queue.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub(crate) fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    pub(crate) fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub(crate) fn set_carry_state(&mut self, state: CarryState) {
        self.carry_state = state;
    }

    pub(crate) fn begin_carry(&mut self, carried: CarriedObject) {
        self.carried = Some(carried);
        self.carry_state = CarryState::Carrying;
    }

    pub(crate) fn take_carried(&mut self) -> Option<CarriedObject> {
        self.carried.take()
    }
}
