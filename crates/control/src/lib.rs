//! Actor control: turns queued action requests into frame-stepped,
//! collision-validated transformations of a single actor.
//!
//! # Invariants
//! - Actions run strictly in enqueue order, one at a time.
//! - A rolled-back action restores the exact pre-action pose.
//! - While carried, a prop's world transform is derived from the actor's
//!   mouth anchor and a frozen offset, never stored independently.
//! - Failures are outcomes, not errors; the queue always advances.

pub mod actor;
pub mod carry;
pub mod config;
pub mod controller;
pub mod goal;
pub mod headless;
pub mod primitives;
pub mod sequencer;

pub use actor::{Actor, CarryState};
pub use carry::CarriedObject;
pub use config::{ActorConfig, ClipNames, ConfigError, CueNames};
pub use controller::Controller;
pub use goal::{ActorSignal, GoalWatcher};
pub use headless::{HeadlessAnimator, RecordingAudio};
pub use primitives::{AbortReason, Frame, Outcome, Step};
pub use sequencer::{ActionReport, Sequencer};

/// Crate name and version, for diagnostics.
pub fn crate_info() -> &'static str {
    concat!("fetch-control v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("control"));
    }
}
