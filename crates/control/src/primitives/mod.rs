//! Action primitives: resumable, frame-stepped computations over the actor.
//!
//! Each primitive is an explicit state object. The sequencer calls `step`
//! once per frame until it returns [`Step::Finished`].

mod interact;
mod movement;
mod rotate;

pub use interact::InteractAction;
pub use movement::MoveAction;
pub use rotate::RotateAction;

use fetch_common::{Animator, AudioCue, PendingAction, Scene};

use crate::actor::Actor;
use crate::carry;
use crate::config::ActorConfig;

/// Collaborators and elapsed time for one frame.
pub struct Frame<'a> {
    /// Seconds since the previous frame.
    pub dt: f32,
    pub scene: &'a mut dyn Scene,
    pub animator: &'a mut dyn Animator,
    pub audio: &'a mut dyn AudioCue,
}

/// How a finished action ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// The action reached its target pose or carry state.
    Completed,
    /// A constraint broke mid-transition; the pre-action pose was restored.
    RolledBack,
    /// A precondition failed; nothing changed.
    Aborted(AbortReason),
}

/// Why an action ended without effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AbortReason {
    #[error("destination is not grounded")]
    NotGrounded,
    #[error("path is blocked by an obstacle")]
    Blocked,
    #[error("direction or angle is degenerate")]
    DegenerateInput,
    #[error("no prop within reach")]
    NoCandidate,
    #[error("prop orientation rejected")]
    OrientationRejected,
    #[error("prop has no attachment point")]
    NoAttachmentPoint,
    #[error("required scene wiring is missing")]
    MissingWiring,
}

/// Result of stepping an action for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Call `step` again next frame.
    Running,
    /// Done; the action must not be stepped again.
    Finished(Outcome),
}

/// The action currently in flight. One variant per primitive kind.
#[derive(Debug, Clone)]
pub enum RunningAction {
    Move(MoveAction),
    Rotate(RotateAction),
    Interact(InteractAction),
}

impl RunningAction {
    pub fn from_pending(action: PendingAction) -> Self {
        match action {
            PendingAction::MoveInDirection(direction) => Self::Move(MoveAction::new(direction)),
            PendingAction::RotateByAngle(degrees) => Self::Rotate(RotateAction::new(degrees)),
            PendingAction::ToggleCarry => Self::Interact(InteractAction::new()),
        }
    }

    pub fn step(&mut self, actor: &mut Actor, config: &ActorConfig, frame: &mut Frame<'_>) -> Step {
        match self {
            Self::Move(a) => a.step(actor, config, frame),
            Self::Rotate(a) => a.step(actor, config, frame),
            Self::Interact(a) => a.step(actor, config, frame),
        }
    }
}

/// Shared rollback tail for move and rotate: cue the impact and re-derive
/// the carried prop from the restored pose.
fn finish_rollback(actor: &Actor, config: &ActorConfig, frame: &mut Frame<'_>) -> Step {
    frame.audio.play_one_shot(&config.cues.impact);
    if let Err(err) = carry::sync_carried(actor, frame.scene) {
        tracing::warn!(%err, "could not restore carried prop after rollback");
    }
    Step::Finished(Outcome::RolledBack)
}
