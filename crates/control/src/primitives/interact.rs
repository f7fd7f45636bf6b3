//! Pickup and drop, toggled by a single interact action.
//!
//! ```text
//! Start -> AwaitClip -+-> Grace -> Lift -> (Carrying)
//!                     +-> Settle -> (Empty)          [when carrying]
//! ```

use fetch_common::{EntityClass, EntityId, Transform};
use glam::{Quat, Vec3};

use super::{AbortReason, Frame, Outcome, Step};
use crate::actor::{Actor, CarryState};
use crate::carry::CarriedObject;
use crate::config::ActorConfig;

/// Prop interpolation from the ground to the mouth.
#[derive(Debug, Clone)]
struct Lift {
    prop: EntityId,
    attachment_point: String,
    attachment_offset: Vec3,
    from: Vec3,
    to: Vec3,
    /// Held fixed for the whole lift.
    rotation: Quat,
    scale: Vec3,
    duration: f32,
    elapsed: f32,
}

impl Lift {
    fn transform_at(&self, position: Vec3) -> Transform {
        Transform {
            position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }
}

#[derive(Debug, Clone)]
enum Phase {
    Start,
    AwaitClip,
    Grace { clip_duration: f32, elapsed: f32 },
    Lift(Lift),
    Settle { remaining: f32 },
}

/// The interact action: picks up the nearest suitable prop, or drops the
/// carried one. Which branch runs is decided once the interact clip is
/// confirmed playing.
#[derive(Debug, Clone)]
pub struct InteractAction {
    phase: Phase,
}

impl Default for InteractAction {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractAction {
    pub fn new() -> Self {
        Self {
            phase: Phase::Start,
        }
    }

    pub fn step(&mut self, actor: &mut Actor, config: &ActorConfig, frame: &mut Frame<'_>) -> Step {
        loop {
            match &mut self.phase {
                Phase::Start => {
                    frame.animator.play(&config.clips.interact);
                    self.phase = Phase::AwaitClip;
                }
                Phase::AwaitClip => {
                    if !frame.animator.is_playing(&config.clips.interact) {
                        return Step::Running;
                    }
                    let clip_duration = frame.animator.current_clip_duration();
                    if clip_duration.is_none() {
                        tracing::warn!(clip = %config.clips.interact, "interact clip has no duration");
                    }
                    if actor.is_carrying() {
                        // A drop never strands the prop in the mouth.
                        drop_carried(actor, config, frame);
                        self.phase = Phase::Settle {
                            remaining: clip_duration.unwrap_or(0.0),
                        };
                    } else {
                        let Some(clip_duration) = clip_duration else {
                            return Step::Finished(Outcome::Aborted(AbortReason::MissingWiring));
                        };
                        actor.set_carry_state(CarryState::PickingUp);
                        self.phase = Phase::Grace {
                            clip_duration,
                            elapsed: 0.0,
                        };
                    }
                    return Step::Running;
                }
                Phase::Grace {
                    clip_duration,
                    elapsed,
                } => {
                    *elapsed += frame.dt;
                    if *elapsed < config.pickup_grace {
                        return Step::Running;
                    }
                    let lift_duration = *clip_duration - config.pickup_grace;
                    match begin_lift(actor, config, frame, lift_duration) {
                        Ok(lift) => {
                            let instant = lift.duration <= 0.0;
                            self.phase = Phase::Lift(lift);
                            if !instant {
                                return Step::Running;
                            }
                        }
                        Err(reason) => {
                            tracing::debug!(%reason, "pickup aborted");
                            actor.set_carry_state(CarryState::Empty);
                            return Step::Finished(Outcome::Aborted(reason));
                        }
                    }
                }
                Phase::Lift(lift) => {
                    lift.elapsed += frame.dt;
                    if lift.elapsed < lift.duration {
                        let position = lift.from.lerp(lift.to, lift.elapsed / lift.duration);
                        if let Err(err) = frame.scene.set_transform(lift.prop, lift.transform_at(position)) {
                            tracing::warn!(%err, "prop vanished during lift");
                            actor.set_carry_state(CarryState::Empty);
                            return Step::Finished(Outcome::Aborted(AbortReason::MissingWiring));
                        }
                        return Step::Running;
                    }
                    return finish_lift(actor, lift, frame);
                }
                Phase::Settle { remaining } => {
                    *remaining -= frame.dt;
                    if *remaining > 0.0 {
                        return Step::Running;
                    }
                    actor.set_carry_state(CarryState::Empty);
                    return Step::Finished(Outcome::Completed);
                }
            }
        }
    }
}

/// Find the prop, gate it, choose the attachment point, and freeze the offset.
fn begin_lift(
    actor: &Actor,
    config: &ActorConfig,
    frame: &mut Frame<'_>,
    duration: f32,
) -> Result<Lift, AbortReason> {
    let origin = actor.position();
    let (prop, prop_transform) = frame
        .scene
        .overlap_sphere(origin, config.pickup_radius, EntityClass::Prop)
        .into_iter()
        .filter_map(|id| match frame.scene.transform(id) {
            Ok(t) => Some((id, t)),
            Err(err) => {
                tracing::warn!(%err, "skipping pickup candidate");
                None
            }
        })
        .min_by(|(_, a), (_, b)| {
            a.position
                .distance_squared(origin)
                .total_cmp(&b.position.distance_squared(origin))
        })
        .ok_or(AbortReason::NoCandidate)?;

    if !orientation_allows_pickup(actor.forward(), prop_transform.forward(), config) {
        return Err(AbortReason::OrientationRejected);
    }

    let mouth = actor.mouth_anchor_position();
    let point = frame
        .scene
        .attachment_points(prop)
        .map_err(|err| {
            tracing::warn!(%err, "cannot read attachment points");
            AbortReason::MissingWiring
        })?
        .into_iter()
        .min_by(|a, b| {
            a.position
                .distance_squared(mouth)
                .total_cmp(&b.position.distance_squared(mouth))
        })
        .ok_or(AbortReason::NoAttachmentPoint)?;

    let attachment_offset = prop_transform.position - point.position;
    frame.scene.set_collidable(prop, false).map_err(|err| {
        tracing::warn!(%err, "cannot disable prop collision");
        AbortReason::MissingWiring
    })?;

    tracing::debug!(?prop, point = %point.name, ?attachment_offset, "lifting prop");
    Ok(Lift {
        prop,
        attachment_point: point.name,
        attachment_offset,
        from: prop_transform.position,
        to: mouth + attachment_offset,
        rotation: prop_transform.rotation,
        scale: prop_transform.scale,
        duration,
        elapsed: 0.0,
    })
}

/// Reject only when the actor faces along the prop's length, towards
/// either end.
fn orientation_allows_pickup(actor_forward: Vec3, prop_forward: Vec3, config: &ActorConfig) -> bool {
    let angle = actor_forward.angle_between(prop_forward).to_degrees();
    let gate = config.orientation_gate_degrees;
    (gate..=180.0 - gate).contains(&angle)
}

fn finish_lift(actor: &mut Actor, lift: &Lift, frame: &mut Frame<'_>) -> Step {
    let held = lift.transform_at(lift.to);
    if let Err(err) = frame.scene.set_transform(lift.prop, held) {
        tracing::warn!(%err, "prop vanished before attaching");
        actor.set_carry_state(CarryState::Empty);
        return Step::Finished(Outcome::Aborted(AbortReason::MissingWiring));
    }
    let carried = CarriedObject::attach(
        actor,
        lift.prop,
        held,
        lift.attachment_point.clone(),
        lift.attachment_offset,
    );
    actor.begin_carry(carried);
    tracing::info!(prop = ?lift.prop, point = %lift.attachment_point, "picked up prop");
    Step::Finished(Outcome::Completed)
}

/// Release the carried prop in front of the actor. Always clears the carry
/// and restores collision, whatever the scene reports.
fn drop_carried(actor: &mut Actor, config: &ActorConfig, frame: &mut Frame<'_>) {
    let Some(carried) = actor.take_carried() else {
        return;
    };
    actor.set_carry_state(CarryState::Dropping);

    let held = carried.world_transform(&actor.anchor_transform());
    let dropped = Transform {
        position: carried.drop_position(actor, config.drop_offset),
        ..held
    };
    if let Err(err) = frame.scene.set_transform(carried.prop(), dropped) {
        tracing::warn!(%err, "could not place dropped prop");
    }
    if let Err(err) = frame.scene.set_collidable(carried.prop(), true) {
        tracing::warn!(%err, "could not restore prop collision");
    }
    tracing::info!(prop = ?carried.prop(), position = ?dropped.position, "dropped prop");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Rig, stick_level};
    use fetch_common::PropAccess;
    use fetch_kernel::{Collider, SceneEntity};

    fn run(rig: &mut Rig, action: &mut InteractAction) -> (Outcome, u32) {
        let mut frames = 0;
        loop {
            frames += 1;
            if let Step::Finished(outcome) = rig.with_frame(|a, c, f| action.step(a, c, f)) {
                return (outcome, frames);
            }
            assert!(frames < 1000, "interact never finished");
        }
    }

    fn pick_up(rig: &mut Rig) -> Outcome {
        run(rig, &mut InteractAction::new()).0
    }

    #[test]
    fn pickup_chooses_nearest_attachment_point_and_lands_on_mouth() {
        let mut rig = Rig::new(stick_level());
        let start_rotation = rig.stick_transform().rotation;

        let (outcome, frames) = run(&mut rig, &mut InteractAction::new());
        assert_eq!(outcome, Outcome::Completed);
        // Clip confirm frame, 1.0 s grace, then 1.0 s lift at 0.125 s per frame.
        assert_eq!(frames, 17);

        let carried = rig.actor.carried().unwrap();
        assert_eq!(carried.prop(), rig.stick);
        assert_eq!(carried.attachment_point(), "PickPointB");
        assert!(carried
            .attachment_offset()
            .abs_diff_eq(Vec3::new(0.1, 0.0, 0.0), 1e-5));

        let stick = rig.stick_transform();
        assert_eq!(
            stick.position,
            rig.actor.mouth_anchor_position() + carried.attachment_offset()
        );
        assert_eq!(stick.rotation, start_rotation);
        assert!(!rig.world.is_collidable(rig.stick).unwrap());
        assert_eq!(rig.actor.carry_state(), CarryState::Carrying);
        assert_eq!(rig.animator.played(), ["EatingCycle"]);
    }

    #[test]
    fn lift_moves_prop_gradually() {
        let mut rig = Rig::new(stick_level());
        let from = rig.stick_transform().position;
        let mut action = InteractAction::new();
        // Confirm frame plus eight grace frames.
        for _ in 0..9 {
            assert_eq!(rig.with_frame(|a, c, f| action.step(a, c, f)), Step::Running);
        }
        assert_eq!(rig.actor.carry_state(), CarryState::PickingUp);
        assert!(!rig.world.is_collidable(rig.stick).unwrap());
        assert_eq!(rig.stick_transform().position, from);

        rig.with_frame(|a, c, f| action.step(a, c, f));
        let partway = rig.stick_transform().position;
        assert_ne!(partway, from);
        assert!(!rig.actor.is_carrying());
    }

    #[test]
    fn waits_for_clip_confirmation() {
        let mut rig = Rig::new(stick_level());
        rig.animator.set_confirm_delay(3);
        let (outcome, frames) = run(&mut rig, &mut InteractAction::new());
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(frames, 20);
    }

    #[test]
    fn no_prop_in_reach_aborts() {
        let mut rig = Rig::new(stick_level());
        rig.actor.set_position(Vec3::new(0.0, 0.0, 1.5));
        assert_eq!(pick_up(&mut rig), Outcome::Aborted(AbortReason::NoCandidate));
        assert!(!rig.actor.is_carrying());
        assert_eq!(rig.actor.carry_state(), CarryState::Empty);
        assert!(rig.world.is_collidable(rig.stick).unwrap());
    }

    #[test]
    fn facing_along_the_prop_is_rejected() {
        let mut rig = Rig::new(stick_level());
        let mut t = rig.stick_transform();
        t.rotation = Quat::IDENTITY;
        rig.world.set_transform(rig.stick, t).unwrap();
        assert_eq!(
            pick_up(&mut rig),
            Outcome::Aborted(AbortReason::OrientationRejected)
        );
        assert!(!rig.actor.is_carrying());

        t.rotation = Quat::from_rotation_y(180.0_f32.to_radians());
        rig.world.set_transform(rig.stick, t).unwrap();
        assert_eq!(
            pick_up(&mut rig),
            Outcome::Aborted(AbortReason::OrientationRejected)
        );
    }

    #[test]
    fn oblique_prop_passes_gate() {
        let config = ActorConfig::default();
        let actor_fwd = Vec3::NEG_Z;
        let at = |deg: f32| Quat::from_rotation_y(deg.to_radians()) * Vec3::NEG_Z;
        assert!(orientation_allows_pickup(actor_fwd, at(60.0), &config));
        assert!(orientation_allows_pickup(actor_fwd, at(-120.0), &config));
        assert!(!orientation_allows_pickup(actor_fwd, at(30.0), &config));
        assert!(!orientation_allows_pickup(actor_fwd, at(160.0), &config));
    }

    #[test]
    fn prop_without_attachment_points_aborts() {
        let mut rig = Rig::new(stick_level());
        let bare = rig.world.spawn(
            SceneEntity::new(
                "twig",
                EntityClass::Prop,
                Transform::from_position_yaw(Vec3::new(0.0, 0.05, -0.5), 90.0),
            )
            .with_collider(Collider::Box {
                half_extents: Vec3::new(0.05, 0.05, 0.3),
            }),
        );
        assert_eq!(
            pick_up(&mut rig),
            Outcome::Aborted(AbortReason::NoAttachmentPoint)
        );
        assert!(!rig.actor.is_carrying());
        assert!(rig.world.is_collidable(bare).unwrap());
    }

    #[test]
    fn drop_places_prop_in_front_and_restores_collision() {
        let mut rig = Rig::new(stick_level());
        assert_eq!(pick_up(&mut rig), Outcome::Completed);
        let offset = rig.actor.carried().unwrap().attachment_offset();
        let rotation = rig.stick_transform().rotation;

        let mut action = InteractAction::new();
        assert_eq!(rig.with_frame(|a, c, f| action.step(a, c, f)), Step::Running);
        // Carry is released on the first frame; the action then waits out the clip.
        assert!(!rig.actor.is_carrying());
        assert_eq!(rig.actor.carry_state(), CarryState::Dropping);
        assert!(rig.world.is_collidable(rig.stick).unwrap());
        let expected = rig.actor.position() + rig.config.drop_offset + offset;
        assert!(rig.stick_transform().position.abs_diff_eq(expected, 1e-5));
        assert!(rig.stick_transform().rotation.abs_diff_eq(rotation, 1e-6));
        // Rests on the ground slab instead of sinking halfway into it.
        let floor = rig.world.bounds(rig.stick).unwrap().min.y;
        assert!(floor.abs() < 1e-5, "stick bottom at {floor}");

        let (outcome, frames) = run(&mut rig, &mut action);
        assert_eq!(outcome, Outcome::Completed);
        // 2.0 s clip at 0.125 s per frame.
        assert_eq!(frames, 16);
        assert_eq!(rig.actor.carry_state(), CarryState::Empty);
    }

    #[test]
    fn drop_succeeds_even_if_prop_was_removed() {
        let mut rig = Rig::new(stick_level());
        assert_eq!(pick_up(&mut rig), Outcome::Completed);
        rig.world.despawn(rig.stick);
        assert_eq!(pick_up(&mut rig), Outcome::Completed);
        assert!(!rig.actor.is_carrying());
    }

    #[test]
    fn drop_without_clip_duration_still_releases_prop() {
        let mut rig = Rig::new(stick_level());
        assert_eq!(pick_up(&mut rig), Outcome::Completed);
        rig.animator.forget_durations();

        let (outcome, frames) = run(&mut rig, &mut InteractAction::new());
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(frames, 2);
        assert!(!rig.actor.is_carrying());
        assert_eq!(rig.actor.carry_state(), CarryState::Empty);
        assert!(rig.world.is_collidable(rig.stick).unwrap());
    }

    #[test]
    fn missing_clip_duration_aborts_without_state_change() {
        let mut rig = Rig::new(stick_level());
        rig.animator.forget_durations();
        assert_eq!(pick_up(&mut rig), Outcome::Aborted(AbortReason::MissingWiring));
        assert_eq!(rig.actor.carry_state(), CarryState::Empty);
        assert!(rig.world.is_collidable(rig.stick).unwrap());
    }
}
