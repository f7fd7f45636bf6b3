//! Input: discrete key presses mapped to camera-relative actor actions.
//!
//! # Invariants
//! - One key press yields at most one `PendingAction`.
//! - Movement directions are horizontal and normalized before enqueueing.

pub mod bindings;
pub mod command;

pub use bindings::{BindingError, KeyBindings};
pub use command::{CameraBasis, Command};

/// Crate name and version, for diagnostics.
pub fn crate_info() -> &'static str {
    concat!("fetch-input v", env!("CARGO_PKG_VERSION"))
}
