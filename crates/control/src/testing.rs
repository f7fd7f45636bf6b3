//! Shared fixtures for the action and controller tests.

use fetch_common::{EntityClass, EntityId, PropAccess, Transform};
use fetch_kernel::{Collider, SceneEntity, World};
use glam::Vec3;

use crate::actor::Actor;
use crate::carry::CarriedObject;
use crate::config::ActorConfig;
use crate::headless::{HeadlessAnimator, RecordingAudio};
use crate::primitives::Frame;

/// Fixed frame step: 8 frames per second keeps durations exact in binary.
pub const DT: f32 = 0.125;

/// A ground slab covering x in [-1.5, 1.5] and z in [-3.5, 1.5], with a
/// stick lying across the actor's path just ahead of the origin.
///
/// The stick is turned 90 degrees so its length runs along world X, with
/// attachment points at x = 0.6, 0.1 and -0.4.
pub fn stick_level() -> (World, EntityId) {
    let mut world = World::new();
    world.spawn(
        SceneEntity::new(
            "ground",
            EntityClass::Ground,
            Transform {
                position: Vec3::new(0.0, -0.5, -1.0),
                ..Transform::default()
            },
        )
        .with_collider(Collider::Box {
            half_extents: Vec3::new(1.5, 0.5, 2.5),
        }),
    );
    let stick = world.spawn(
        SceneEntity::new(
            "stick",
            EntityClass::Prop,
            Transform::from_position_yaw(Vec3::new(0.2, 0.05, -0.9), 90.0),
        )
        .with_collider(Collider::Box {
            half_extents: Vec3::new(0.05, 0.05, 0.6),
        })
        .with_attachment_point("PickPointA", Vec3::new(0.0, 0.0, 0.4))
        .with_attachment_point("PickPointB", Vec3::new(0.0, 0.0, -0.1))
        .with_attachment_point("PickPointC", Vec3::new(0.0, 0.0, -0.6)),
    );
    (world, stick)
}

/// Actor at the origin facing -Z, plus headless collaborators.
pub struct Rig {
    pub world: World,
    pub actor: Actor,
    pub config: ActorConfig,
    pub animator: HeadlessAnimator,
    pub audio: RecordingAudio,
    pub stick: EntityId,
}

impl Rig {
    pub fn new((world, stick): (World, EntityId)) -> Self {
        let config = ActorConfig::default();
        Self {
            world,
            actor: Actor::new(Transform::default(), config.mouth_anchor),
            animator: HeadlessAnimator::for_clips(&config.clips),
            audio: RecordingAudio::new(),
            config,
            stick,
        }
    }

    /// Run `f` with a one-frame view of the rig.
    pub fn with_frame<R>(
        &mut self,
        f: impl FnOnce(&mut Actor, &ActorConfig, &mut Frame<'_>) -> R,
    ) -> R {
        let mut frame = Frame {
            dt: DT,
            scene: &mut self.world,
            animator: &mut self.animator,
            audio: &mut self.audio,
        };
        f(&mut self.actor, &self.config, &mut frame)
    }

    pub fn spawn_rock(&mut self, center: Vec3, half_extents: Vec3) -> EntityId {
        self.world.spawn(
            SceneEntity::new(
                "rock",
                EntityClass::Obstacle,
                Transform {
                    position: center,
                    ..Transform::default()
                },
            )
            .with_collider(Collider::Box { half_extents }),
        )
    }

    /// Put the stick in the actor's mouth as a completed pickup from
    /// `PickPointB` would.
    pub fn carry_stick(&mut self) {
        let offset = Vec3::new(0.1, 0.0, 0.0);
        let held = Transform {
            position: self.actor.mouth_anchor_position() + offset,
            ..self.stick_transform()
        };
        self.world.set_transform(self.stick, held).unwrap();
        self.world.set_collidable(self.stick, false).unwrap();
        let carried =
            CarriedObject::attach(&self.actor, self.stick, held, "PickPointB".into(), offset);
        self.actor.begin_carry(carried);
    }

    pub fn stick_transform(&self) -> Transform {
        self.world.transform(self.stick).unwrap()
    }
}
