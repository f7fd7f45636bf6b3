use std::sync::mpsc::Sender;

use fetch_common::{Animator, AudioCue, EntityClass, PendingAction, Transform};

use crate::actor::{Actor, CarryState};
use crate::carry;
use crate::config::{ActorConfig, ConfigError};
use crate::goal::{ActorSignal, GoalWatcher};
use crate::primitives::Frame;
use crate::sequencer::{ActionReport, Sequencer};

/// Top-level actor controller: owns the actor, its action queue and the goal
/// watcher, and advances them once per frame.
#[derive(Debug)]
pub struct Controller {
    actor: Actor,
    config: ActorConfig,
    sequencer: Sequencer,
    goal: GoalWatcher,
    /// Seconds left of the intro clip.
    intro: Option<f32>,
}

impl Controller {
    /// Validates `config`. Completion signals go to `signals`.
    pub fn new(
        start: Transform,
        config: ActorConfig,
        signals: Sender<ActorSignal>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            actor: Actor::new(start, config.mouth_anchor),
            config,
            sequencer: Sequencer::new(),
            goal: GoalWatcher::new(signals),
            intro: None,
        })
    }

    /// Play the intro clip; idle follows once it has run its course.
    pub fn start(&mut self, animator: &mut dyn Animator) {
        animator.play(&self.config.clips.intro);
        self.intro = Some(self.config.intro_duration);
    }

    /// Queue an action behind any already pending. Marks the actor busy.
    pub fn enqueue(&mut self, action: PendingAction) {
        self.sequencer.enqueue(&mut self.actor, action);
    }

    /// Report that the actor entered a trigger volume.
    pub fn trigger_entered(&mut self, class: EntityClass, audio: &mut dyn AudioCue) {
        self.goal
            .trigger_entered(class, &self.actor, &self.config, audio);
    }

    /// Advance everything by one frame.
    pub fn update(&mut self, frame: &mut Frame<'_>) {
        if let Some(remaining) = self.intro.as_mut() {
            *remaining -= frame.dt;
            if *remaining <= 0.0 {
                self.intro = None;
                if !self.actor.is_busy() {
                    frame.animator.play(&self.config.clips.idle);
                }
            }
        }

        self.sequencer.tick(&mut self.actor, &self.config, frame);
        if let Err(err) = carry::sync_carried(&self.actor, frame.scene) {
            tracing::debug!(%err, "carried prop out of sync");
        }
        self.goal.tick(frame.dt);
    }

    /// True while actions are queued or running. Gate global hotkeys on this.
    pub fn is_busy(&self) -> bool {
        self.actor.is_busy()
    }

    /// Read-only view of the actor's pose and carry.
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn carry_state(&self) -> CarryState {
        self.actor.carry_state()
    }

    /// The validated tuning this controller runs with.
    pub fn config(&self) -> &ActorConfig {
        &self.config
    }

    /// The action queue, for inspecting what is queued or in flight.
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Goal state: whether completion is counting down or has fired.
    pub fn goal(&self) -> &GoalWatcher {
        &self.goal
    }

    /// Take the reports of actions finished since the last drain.
    pub fn drain_reports(&mut self) -> Vec<ActionReport> {
        self.sequencer.drain_reports()
    }
}
