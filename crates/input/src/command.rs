use fetch_common::PendingAction;
use glam::Vec3;

/// A high-level command produced by a key press.
///
/// The controller never sees raw keys; commands are resolved against the
/// camera into `PendingAction`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Command {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    /// Counter-clockwise seen from above.
    TurnLeft,
    TurnRight,
    /// Pick up or drop.
    Interact,
}

/// Camera orientation used to make movement camera-relative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self::from_forward(Vec3::NEG_Z)
    }
}

impl CameraBasis {
    pub fn from_forward(forward: Vec3) -> Self {
        let forward = forward.normalize_or_zero();
        Self {
            forward,
            right: forward.cross(Vec3::Y).normalize_or_zero(),
        }
    }

    /// Forward and right projected onto the ground plane and normalized.
    /// `None` when the camera looks straight up or down.
    pub fn flattened(&self) -> Option<(Vec3, Vec3)> {
        let flat = |v: Vec3| Vec3::new(v.x, 0.0, v.z).try_normalize();
        Some((flat(self.forward)?, flat(self.right)?))
    }
}

impl Command {
    /// Resolve against the camera. Movement commands yield `None` when the
    /// camera gives no usable horizontal direction.
    pub fn resolve(self, camera: &CameraBasis, rotation_step_degrees: f32) -> Option<PendingAction> {
        let action = match self {
            Self::TurnLeft => PendingAction::RotateByAngle(rotation_step_degrees),
            Self::TurnRight => PendingAction::RotateByAngle(-rotation_step_degrees),
            Self::Interact => PendingAction::ToggleCarry,
            movement => {
                let Some((forward, right)) = camera.flattened() else {
                    tracing::debug!(?camera, "camera has no horizontal basis, dropping move");
                    return None;
                };
                let direction = match movement {
                    Self::MoveForward => forward,
                    Self::MoveBack => -forward,
                    Self::MoveLeft => -right,
                    _ => right,
                };
                PendingAction::MoveInDirection(direction)
            }
        };
        Some(action)
    }
}
