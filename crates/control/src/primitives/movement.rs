use fetch_common::EntityClass;
use glam::Vec3;

use super::{AbortReason, Frame, Outcome, Step, finish_rollback};
use crate::actor::Actor;
use crate::carry;
use crate::config::ActorConfig;

#[derive(Debug, Clone, Copy)]
enum Phase {
    Pending,
    Walking { start: Vec3, end: Vec3, elapsed: f32 },
}

/// One grid step along a horizontal direction.
///
/// The first frame gates on ground and obstacle rays; later frames
/// interpolate and roll back if the carried prop strikes an obstacle.
#[derive(Debug, Clone)]
pub struct MoveAction {
    direction: Vec3,
    phase: Phase,
}

impl MoveAction {
    pub fn new(direction: Vec3) -> Self {
        Self {
            direction,
            phase: Phase::Pending,
        }
    }

    pub fn step(&mut self, actor: &mut Actor, config: &ActorConfig, frame: &mut Frame<'_>) -> Step {
        match &mut self.phase {
            Phase::Pending => {
                let Some(direction) = self.direction.try_normalize() else {
                    return Step::Finished(Outcome::Aborted(AbortReason::DegenerateInput));
                };
                let start = actor.position();
                let end = start + direction * config.move_distance;

                if !frame.scene.is_grounded(end) {
                    tracing::debug!(?end, "move target not grounded");
                    return Step::Finished(Outcome::Aborted(AbortReason::NotGrounded));
                }
                let reach = config.move_distance + config.obstacle_ray_margin;
                for height in config.obstacle_ray_heights {
                    let origin = start + Vec3::Y * height;
                    if let Some(hit) =
                        frame
                            .scene
                            .raycast(origin, direction, reach, EntityClass::Obstacle)
                    {
                        tracing::debug!(height, entity = ?hit.entity, "move blocked");
                        return Step::Finished(Outcome::Aborted(AbortReason::Blocked));
                    }
                }

                frame.animator.play(&config.clips.walk);
                self.phase = Phase::Walking {
                    start,
                    end,
                    elapsed: 0.0,
                };
                Step::Running
            }
            Phase::Walking {
                start,
                end,
                elapsed,
            } => {
                *elapsed += frame.dt;
                let done = *elapsed >= config.move_duration;
                let position = if done {
                    *end
                } else {
                    start.lerp(*end, *elapsed / config.move_duration)
                };
                actor.set_position(position);
                tracing::trace!(?position, "walking");

                if carry::carried_hits_obstacle(actor, frame.scene) {
                    tracing::debug!(?position, "carried prop hit obstacle, rolling back move");
                    actor.set_position(*start);
                    return finish_rollback(actor, config, frame);
                }
                if done {
                    Step::Finished(Outcome::Completed)
                } else {
                    Step::Running
                }
            }
        }
    }
}
