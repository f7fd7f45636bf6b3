//! FIFO action queue driving one primitive at a time.
//!
//! # Invariants
//! - Actions start in enqueue order; none is skipped.
//! - At most one action is in flight. The next one starts on the tick after
//!   its predecessor finished, rollback included.
//! - The actor's busy flag is set from the first enqueue until the queue
//!   drains, at which point the idle clip plays.

use std::collections::VecDeque;

use fetch_common::PendingAction;

use crate::actor::Actor;
use crate::config::ActorConfig;
use crate::primitives::{Frame, Outcome, RunningAction, Step};

/// Record of one finished action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    /// Position in enqueue order, starting at zero.
    pub seq: u64,
    pub action: PendingAction,
    pub outcome: Outcome,
    /// Ticks spent in flight.
    pub frames: u32,
}

#[derive(Debug)]
struct InFlight {
    seq: u64,
    action: PendingAction,
    running: RunningAction,
    frames: u32,
}

#[derive(Debug, Default)]
pub struct Sequencer {
    queue: VecDeque<PendingAction>,
    current: Option<InFlight>,
    reports: Vec<ActionReport>,
    next_seq: u64,
}

impl Sequencer {
    /// An empty queue with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `action`. Accepted at any time, including mid-action.
    pub fn enqueue(&mut self, actor: &mut Actor, action: PendingAction) {
        tracing::debug!(kind = action.kind(), queued = self.queue.len(), "enqueue action");
        self.queue.push_back(action);
        if !actor.is_busy() {
            actor.set_busy(true);
        }
    }

    /// Advance the queue by one frame.
    pub fn tick(&mut self, actor: &mut Actor, config: &ActorConfig, frame: &mut Frame<'_>) {
        if !actor.is_busy() {
            return;
        }
        if self.current.is_none() {
            let Some(action) = self.queue.pop_front() else {
                drained(actor, config, frame);
                return;
            };
            let seq = self.next_seq;
            self.next_seq += 1;
            tracing::debug!(seq, kind = action.kind(), "start action");
            self.current = Some(InFlight {
                seq,
                action,
                running: RunningAction::from_pending(action),
                frames: 0,
            });
        }
        let Some(in_flight) = self.current.as_mut() else {
            return;
        };

        in_flight.frames += 1;
        let span = tracing::debug_span!("action", seq = in_flight.seq, kind = in_flight.action.kind());
        let step = span.in_scope(|| in_flight.running.step(actor, config, frame));
        let Step::Finished(outcome) = step else {
            return;
        };

        let report = ActionReport {
            seq: in_flight.seq,
            action: in_flight.action,
            outcome,
            frames: in_flight.frames,
        };
        tracing::debug!(seq = report.seq, ?outcome, frames = report.frames, "action finished");
        self.reports.push(report);
        self.current = None;
        if self.queue.is_empty() {
            drained(actor, config, frame);
        }
    }

    /// The action currently running, if any.
    pub fn in_flight(&self) -> Option<PendingAction> {
        self.current.as_ref().map(|c| c.action)
    }

    /// Actions waiting behind the one in flight. Excludes the in-flight
    /// action; see [`Sequencer::is_empty`] for whether any work remains.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is queued and nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty() && self.current.is_none()
    }

    /// Reports of finished actions not yet drained, oldest first.
    pub fn reports(&self) -> &[ActionReport] {
        &self.reports
    }

    /// Take all reports recorded since the last drain.
    pub fn drain_reports(&mut self) -> Vec<ActionReport> {
        std::mem::take(&mut self.reports)
    }
}

fn drained(actor: &mut Actor, config: &ActorConfig, frame: &mut Frame<'_>) {
    actor.set_busy(false);
    frame.animator.play(&config.clips.idle);
    tracing::debug!("queue drained");
}
