use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One queued request for the actor.
///
/// Produced by input handling, consumed exactly once by the sequencer.
/// Immutable once enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PendingAction {
    /// Step along a horizontal, camera-relative direction.
    MoveInDirection(Vec3),
    /// Turn about +Y by signed degrees (positive is counter-clockwise seen
    /// from above).
    RotateByAngle(f32),
    /// Pick up the nearest prop, or drop the carried one.
    ToggleCarry,
}

impl PendingAction {
    /// Short label used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MoveInDirection(_) => "move",
            Self::RotateByAngle(_) => "rotate",
            Self::ToggleCarry => "toggle_carry",
        }
    }
}
