use std::sync::mpsc::Sender;

use fetch_common::{AudioCue, EntityClass};

use crate::actor::Actor;
use crate::config::ActorConfig;

/// Notifications sent from the actor to the surrounding level controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorSignal {
    LevelCompleted,
}

/// Watches goal triggers and raises [`ActorSignal::LevelCompleted`] once,
/// a fixed delay after the actor reaches the goal while carrying a prop.
#[derive(Debug)]
pub struct GoalWatcher {
    signals: Sender<ActorSignal>,
    /// Seconds left before the signal is sent.
    countdown: Option<f32>,
    fired: bool,
}

impl GoalWatcher {
    pub fn new(signals: Sender<ActorSignal>) -> Self {
        Self {
            signals,
            countdown: None,
            fired: false,
        }
    }

    /// React to the actor entering a trigger volume of `class`.
    pub fn trigger_entered(
        &mut self,
        class: EntityClass,
        actor: &Actor,
        config: &ActorConfig,
        audio: &mut dyn AudioCue,
    ) {
        if class != EntityClass::Goal || self.fired || self.countdown.is_some() {
            return;
        }
        if !actor.is_carrying() {
            tracing::debug!("goal reached empty-handed");
            return;
        }
        audio.play_one_shot(&config.cues.win);
        self.countdown = Some(config.goal_delay);
        tracing::info!(delay = config.goal_delay, "goal reached");
    }

    pub fn tick(&mut self, dt: f32) {
        let Some(remaining) = self.countdown.as_mut() else {
            return;
        };
        *remaining -= dt;
        if *remaining > 0.0 {
            return;
        }
        self.countdown = None;
        self.fired = true;
        tracing::info!("level completed");
        if let Err(err) = self.signals.send(ActorSignal::LevelCompleted) {
            tracing::warn!(%err, "no level controller listening");
        }
    }

    /// True once the completion signal has been sent.
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn is_counting_down(&self) -> bool {
        self.countdown.is_some()
    }
}
