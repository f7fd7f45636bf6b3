//! Headless stand-ins for the animation and audio back ends.
//!
//! Used by the CLI and by tests. Both record what they were asked to do so a
//! run can be inspected afterwards.

use std::cell::Cell;
use std::collections::BTreeMap;

use fetch_common::{Animator, AudioCue};

use crate::config::ClipNames;

/// Animator that switches clips instantly and reports fixed durations.
#[derive(Debug, Default)]
pub struct HeadlessAnimator {
    durations: BTreeMap<String, f32>,
    played: Vec<String>,
    /// Queries answered "not yet playing" after each `play`.
    confirm_delay: u32,
    unconfirmed: Cell<u32>,
}

impl HeadlessAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Animator knowing the default lengths of every clip in `clips`.
    pub fn for_clips(clips: &ClipNames) -> Self {
        Self::new()
            .with_clip(&clips.intro, 1.0)
            .with_clip(&clips.idle, 2.0)
            .with_clip(&clips.walk, 0.833)
            .with_clip(&clips.interact, 2.0)
    }

    pub fn with_clip(mut self, clip: &str, seconds: f32) -> Self {
        self.durations.insert(clip.to_owned(), seconds);
        self
    }

    /// Delay confirmation of each newly played clip by `queries` calls to
    /// [`Animator::is_playing`], like a state machine that switches a frame
    /// or more late.
    pub fn set_confirm_delay(&mut self, queries: u32) {
        self.confirm_delay = queries;
    }

    /// Drop every known duration.
    pub fn forget_durations(&mut self) {
        self.durations.clear();
    }

    /// Every clip played so far, oldest first.
    pub fn played(&self) -> &[String] {
        &self.played
    }

    pub fn current_clip(&self) -> Option<&str> {
        self.played.last().map(String::as_str)
    }
}

impl Animator for HeadlessAnimator {
    fn play(&mut self, clip: &str) {
        tracing::debug!(clip, "play clip");
        self.played.push(clip.to_owned());
        self.unconfirmed.set(self.confirm_delay);
    }

    fn is_playing(&self, clip: &str) -> bool {
        if self.current_clip() != Some(clip) {
            return false;
        }
        let pending = self.unconfirmed.get();
        if pending > 0 {
            self.unconfirmed.set(pending - 1);
            return false;
        }
        true
    }

    fn current_clip_duration(&self) -> Option<f32> {
        self.current_clip()
            .and_then(|clip| self.durations.get(clip).copied())
    }
}

/// Audio sink that logs and records every cue.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    cues: Vec<String>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> &[String] {
        &self.cues
    }
}

impl AudioCue for RecordingAudio {
    fn play_one_shot(&mut self, cue: &str) {
        tracing::info!(cue, "audio cue");
        self.cues.push(cue.to_owned());
    }
}
