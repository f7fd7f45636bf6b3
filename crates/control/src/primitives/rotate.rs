use glam::Quat;

use super::{AbortReason, Frame, Outcome, Step, finish_rollback};
use crate::actor::Actor;
use crate::carry;
use crate::config::ActorConfig;

#[derive(Debug, Clone, Copy)]
struct Turn {
    start: Quat,
    target: Quat,
    elapsed: f32,
}

/// Turn in place about +Y. No precondition gate; only the carried prop can
/// stop it.
#[derive(Debug, Clone)]
pub struct RotateAction {
    degrees: f32,
    turn: Option<Turn>,
}

impl RotateAction {
    pub fn new(degrees: f32) -> Self {
        Self {
            degrees,
            turn: None,
        }
    }

    pub fn step(&mut self, actor: &mut Actor, config: &ActorConfig, frame: &mut Frame<'_>) -> Step {
        let degrees = self.degrees;
        if !degrees.is_finite() {
            return Step::Finished(Outcome::Aborted(AbortReason::DegenerateInput));
        }
        let turn = self.turn.get_or_insert_with(|| {
            let start = actor.rotation();
            Turn {
                start,
                target: start * Quat::from_rotation_y(degrees.to_radians()),
                elapsed: 0.0,
            }
        });

        turn.elapsed += frame.dt;
        let done = turn.elapsed >= config.rotate_duration;
        // glam's slerp takes the shortest arc.
        let rotation = if done {
            turn.target
        } else {
            turn.start
                .slerp(turn.target, turn.elapsed / config.rotate_duration)
        };
        actor.set_rotation(rotation);

        if carry::carried_hits_obstacle(actor, frame.scene) {
            tracing::debug!(degrees, "carried prop hit obstacle, rolling back turn");
            actor.set_rotation(turn.start);
            return finish_rollback(actor, config, frame);
        }
        if done {
            Step::Finished(Outcome::Completed)
        } else {
            Step::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Rig, stick_level};
    use glam::Vec3;

    fn run(rig: &mut Rig, action: &mut RotateAction) -> (Outcome, u32) {
        let mut frames = 0;
        loop {
            frames += 1;
            if let Step::Finished(outcome) = rig.with_frame(|a, c, f| action.step(a, c, f)) {
                return (outcome, frames);
            }
            assert!(frames < 1000, "rotate never finished");
        }
    }

    #[test]
    fn rotation_starts_on_first_frame_and_snaps_to_target() {
        let mut rig = Rig::new(stick_level());
        let mut action = RotateAction::new(90.0);

        assert_eq!(rig.with_frame(|a, c, f| action.step(a, c, f)), Step::Running);
        assert_ne!(rig.actor.rotation(), Quat::IDENTITY);

        let (outcome, frames) = run(&mut rig, &mut action);
        assert_eq!(outcome, Outcome::Completed);
        // 0.5 s at 0.125 s per frame, one frame already taken.
        assert_eq!(frames, 3);
        assert_eq!(
            rig.actor.rotation(),
            Quat::from_rotation_y(90.0_f32.to_radians())
        );
        assert!(rig.actor.forward().abs_diff_eq(Vec3::NEG_X, 1e-6));
    }

    #[test]
    fn negative_angle_turns_right() {
        let mut rig = Rig::new(stick_level());
        let mut action = RotateAction::new(-90.0);
        run(&mut rig, &mut action);
        assert!(rig.actor.forward().abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn non_finite_angle_is_degenerate() {
        let mut rig = Rig::new(stick_level());
        let mut action = RotateAction::new(f32::NAN);
        let (outcome, frames) = run(&mut rig, &mut action);
        assert_eq!(outcome, Outcome::Aborted(AbortReason::DegenerateInput));
        assert_eq!(frames, 1);
        assert_eq!(rig.actor.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn sweep_into_rock_reverts_to_start_not_midpoint() {
        let mut rig = Rig::new(stick_level());
        rig.carry_stick();
        let offset = rig.actor.carried().unwrap().attachment_offset();
        // Stick runs along x in [-0.5, 0.7] at z = -0.6. A left turn swings
        // its right end forward into the rock.
        rig.spawn_rock(Vec3::new(0.55, 0.5, -0.95), Vec3::new(0.15, 0.5, 0.15));
        let start = rig.actor.rotation();
        let mut action = RotateAction::new(90.0);

        let (outcome, frames) = run(&mut rig, &mut action);
        assert_eq!(outcome, Outcome::RolledBack);
        assert!(frames < 4, "rolled back mid-turn");
        assert_eq!(rig.actor.rotation(), start);
        assert_eq!(rig.actor.carried().unwrap().attachment_offset(), offset);
        assert_eq!(rig.audio.cues(), ["stick_hit_rock"]);
        assert!(rig
            .stick_transform()
            .position
            .abs_diff_eq(rig.actor.mouth_anchor_position() + offset, 1e-5));
    }

    #[test]
    fn overlap_only_at_target_orientation_still_rolls_back() {
        let mut rig = Rig::new(stick_level());
        rig.carry_stick();
        // Facing -X the stick spans z in [-0.7, 0.5] at x = -0.6. At three
        // quarters of the turn its far end only reaches z = 0.25.
        rig.spawn_rock(Vec3::new(-0.6, 0.5, 0.5), Vec3::new(0.08, 0.5, 0.08));
        let mut action = RotateAction::new(90.0);

        let (outcome, frames) = run(&mut rig, &mut action);
        assert_eq!(outcome, Outcome::RolledBack);
        assert_eq!(frames, 4);
        assert_eq!(rig.actor.rotation(), Quat::IDENTITY);
        assert_eq!(rig.audio.cues(), ["stick_hit_rock"]);
    }

    #[test]
    fn turn_without_carry_ignores_rocks() {
        let mut rig = Rig::new(stick_level());
        rig.spawn_rock(Vec3::new(0.55, 0.5, -0.95), Vec3::new(0.15, 0.5, 0.15));
        let mut action = RotateAction::new(90.0);
        let (outcome, _) = run(&mut rig, &mut action);
        assert_eq!(outcome, Outcome::Completed);
    }
}
