use fetch_common::{
    Aabb, AttachmentPoint, CollisionQuery, EntityClass, EntityId, PropAccess, RayHit, SceneError,
    Sphere, Transform, Volume,
};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Collision shape in entity-local space. Scaled by the entity transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Collider {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
}

impl Collider {
    /// Shape queries test against. Boxes are widened to their world AABB;
    /// spheres stay exact.
    pub fn volume(&self, transform: &Transform) -> Volume {
        match *self {
            Self::Box { half_extents } => Volume::Box(Aabb::from_oriented_box(
                transform.position,
                transform.rotation,
                half_extents * transform.scale,
            )),
            Self::Sphere { radius } => Volume::Sphere(Sphere::new(
                transform.position,
                radius * transform.scale.abs().max_element(),
            )),
        }
    }

    /// World bounds of this shape under `transform`.
    pub fn bounds(&self, transform: &Transform) -> Aabb {
        self.volume(transform).bounds()
    }

    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Box { half_extents } => half_extents.cmpgt(Vec3::ZERO).all(),
            Self::Sphere { radius } => radius > 0.0,
        }
    }
}

/// Attachment point in entity-local space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPoint {
    pub name: String,
    pub local: Vec3,
}

/// Per-entity data stored in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEntity {
    pub name: String,
    pub class: EntityClass,
    pub transform: Transform,
    pub collider: Option<Collider>,
    pub collidable: bool,
    pub attachment_points: Vec<NamedPoint>,
}

impl SceneEntity {
    pub fn new(name: impl Into<String>, class: EntityClass, transform: Transform) -> Self {
        Self {
            name: name.into(),
            class,
            transform,
            collider: None,
            collidable: true,
            attachment_points: Vec::new(),
        }
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn with_attachment_point(mut self, name: impl Into<String>, local: Vec3) -> Self {
        self.attachment_points.push(NamedPoint {
            name: name.into(),
            local,
        });
        self
    }

    /// World bounds, if the entity has a collider.
    pub fn bounds(&self) -> Option<Aabb> {
        self.collider.map(|c| c.bounds(&self.transform))
    }

    /// Exact collision shape, if the entity has a collider.
    pub fn volume(&self) -> Option<Volume> {
        self.collider.map(|c| c.volume(&self.transform))
    }
}

/// An event record produced by every mutation to the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    Spawned {
        id: EntityId,
        class: EntityClass,
        transform: Transform,
    },
    Despawned {
        id: EntityId,
    },
    TransformUpdated {
        id: EntityId,
        old: Transform,
        new: Transform,
    },
    CollidableChanged {
        id: EntityId,
        collidable: bool,
    },
}

/// Downward probe used by `is_grounded`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundProbe {
    /// How far above the tested point the probe starts.
    pub height: f32,
    /// Maximum probe length.
    pub range: f32,
}

impl Default for GroundProbe {
    fn default() -> Self {
        Self {
            height: 1.0,
            range: 3.0,
        }
    }
}

/// The authoritative scene state.
///
/// Owns every entity the actor can stand on, bump into, or carry. The actor
/// itself lives outside the world; it only reaches the scene through the
/// capability traits.
#[derive(Debug, Clone, Default)]
pub struct World {
    entities: BTreeMap<EntityId, SceneEntity>,
    ground_probe: GroundProbe,
    /// Append-only event log of all mutations.
    event_log: Vec<SceneEvent>,
}

impl World {
    /// An empty world with default grounding settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty world whose grounding checks use `ground_probe`.
    pub fn with_ground_probe(ground_probe: GroundProbe) -> Self {
        Self {
            ground_probe,
            ..Default::default()
        }
    }

    /// Settings used by grounding checks.
    pub fn ground_probe(&self) -> GroundProbe {
        self.ground_probe
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Events recorded since the last drain, oldest first.
    pub fn events(&self) -> &[SceneEvent] {
        &self.event_log
    }

    /// All live entities in id order.
    pub fn entities(&self) -> &BTreeMap<EntityId, SceneEntity> {
        &self.entities
    }

    /// Insert `entity` under a fresh id and log the spawn.
    pub fn spawn(&mut self, entity: SceneEntity) -> EntityId {
        let id = EntityId::new();
        self.spawn_with_id(id, entity);
        id
    }

    /// Insert `entity` under `id`, replacing any entity already there.
    pub fn spawn_with_id(&mut self, id: EntityId, entity: SceneEntity) {
        self.event_log.push(SceneEvent::Spawned {
            id,
            class: entity.class,
            transform: entity.transform,
        });
        self.entities.insert(id, entity);
    }

    /// Remove and return the entity. Only an actual removal is logged.
    pub fn despawn(&mut self, id: EntityId) -> Option<SceneEntity> {
        let entity = self.entities.remove(&id);
        if entity.is_some() {
            self.event_log.push(SceneEvent::Despawned { id });
        }
        entity
    }

    /// Look up an entity by id.
    pub fn get(&self, id: EntityId) -> Option<&SceneEntity> {
        self.entities.get(&id)
    }

    /// First entity with the given name, in id order.
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|(_, e)| e.name == name)
            .map(|(id, _)| *id)
    }

    fn entity(&self, id: EntityId) -> Result<&SceneEntity, SceneError> {
        self.entities.get(&id).ok_or(SceneError::EntityNotFound(id))
    }

    /// Collidable entities of `class` together with their collision shapes.
    fn solid(&self, class: EntityClass) -> impl Iterator<Item = (EntityId, Volume)> + '_ {
        self.entities.iter().filter_map(move |(id, e)| {
            if e.class != class || !e.collidable {
                return None;
            }
            e.volume().map(|v| (*id, v))
        })
    }
}

impl CollisionQuery for World {
    fn is_grounded(&self, point: Vec3) -> bool {
        let origin = point + Vec3::Y * self.ground_probe.height;
        self.raycast(origin, Vec3::NEG_Y, self.ground_probe.range, EntityClass::Ground)
            .is_some()
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        class: EntityClass,
    ) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        self.solid(class)
            .filter_map(|(id, volume)| {
                let t = volume.ray_entry(origin, dir)?;
                (t <= max_distance).then_some(RayHit {
                    entity: id,
                    point: origin + dir * t,
                    distance: t,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, class: EntityClass) -> Vec<EntityId> {
        self.solid(class)
            .filter(|(_, v)| v.intersects_sphere(center, radius))
            .map(|(id, _)| id)
            .collect()
    }

    fn overlap_box(&self, center: Vec3, half_extents: Vec3, class: EntityClass) -> Vec<EntityId> {
        let query = Aabb::from_center_half_extents(center, half_extents);
        self.solid(class)
            .filter(|(_, v)| v.intersects_box(&query))
            .map(|(id, _)| id)
            .collect()
    }
}

impl PropAccess for World {
    fn transform(&self, id: EntityId) -> Result<Transform, SceneError> {
        Ok(self.entity(id)?.transform)
    }

    fn set_transform(&mut self, id: EntityId, transform: Transform) -> Result<(), SceneError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(SceneError::EntityNotFound(id))?;
        let old = entity.transform;
        entity.transform = transform;
        if old != transform {
            self.event_log.push(SceneEvent::TransformUpdated {
                id,
                old,
                new: transform,
            });
        }
        Ok(())
    }

    fn attachment_points(&self, id: EntityId) -> Result<Vec<AttachmentPoint>, SceneError> {
        let entity = self.entity(id)?;
        Ok(entity
            .attachment_points
            .iter()
            .map(|p| AttachmentPoint {
                name: p.name.clone(),
                position: entity.transform.transform_point(p.local * entity.transform.scale),
            })
            .collect())
    }

    fn bounds(&self, id: EntityId) -> Result<Aabb, SceneError> {
        self.entity(id)?.bounds().ok_or(SceneError::NoCollider(id))
    }

    fn set_collidable(&mut self, id: EntityId, collidable: bool) -> Result<(), SceneError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(SceneError::EntityNotFound(id))?;
        if entity.collidable != collidable {
            entity.collidable = collidable;
            self.event_log
                .push(SceneEvent::CollidableChanged { id, collidable });
            tracing::trace!(?id, collidable, "collidability changed");
        }
        Ok(())
    }

    fn is_collidable(&self, id: EntityId) -> Result<bool, SceneError> {
        Ok(self.entity(id)?.collidable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(x: f32, z: f32) -> SceneEntity {
        SceneEntity::new(
            "tile",
            EntityClass::Ground,
            Transform {
                position: Vec3::new(x, -0.5, z),
                ..Transform::default()
            },
        )
        .with_collider(Collider::Box {
            half_extents: Vec3::splat(0.5),
        })
    }

    fn rock(position: Vec3) -> SceneEntity {
        SceneEntity::new(
            "rock",
            EntityClass::Obstacle,
            Transform {
                position,
                ..Transform::default()
            },
        )
        .with_collider(Collider::Box {
            half_extents: Vec3::splat(0.4),
        })
    }

    #[test]
    fn world_starts_empty() {
        let w = World::new();
        assert_eq!(w.entity_count(), 0);
        assert!(w.events().is_empty());
    }

    #[test]
    fn spawn_and_despawn() {
        let mut w = World::new();
        let id = w.spawn(tile(0.0, 0.0));
        assert_eq!(w.entity_count(), 1);
        assert!(w.get(id).is_some());

        assert!(w.despawn(id).is_some());
        assert_eq!(w.entity_count(), 0);
        assert_eq!(w.events().len(), 2);
    }

    #[test]
    fn grounded_only_above_ground_tiles() {
        let mut w = World::new();
        w.spawn(tile(0.0, 0.0));
        assert!(w.is_grounded(Vec3::ZERO));
        assert!(!w.is_grounded(Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn ground_probe_range_is_bounded() {
        let mut w = World::with_ground_probe(GroundProbe {
            height: 1.0,
            range: 0.5,
        });
        w.spawn(tile(0.0, 0.0));
        // Tile top is 1.0 below the probe origin, beyond the 0.5 range.
        assert!(!w.is_grounded(Vec3::ZERO));
    }

    #[test]
    fn raycast_filters_by_class_and_distance() {
        let mut w = World::new();
        w.spawn(tile(0.0, -1.0));
        let rock_id = w.spawn(rock(Vec3::new(0.0, 0.4, -1.0)));

        let origin = Vec3::new(0.0, 0.2, 0.0);
        let hit = w
            .raycast(origin, Vec3::NEG_Z, 1.1, EntityClass::Obstacle)
            .unwrap();
        assert_eq!(hit.entity, rock_id);
        assert!((hit.distance - 0.6).abs() < 1e-5);

        assert!(w.raycast(origin, Vec3::NEG_Z, 0.5, EntityClass::Obstacle).is_none());
        assert!(w.raycast(origin, Vec3::NEG_Z, 1.1, EntityClass::Prop).is_none());
    }

    #[test]
    fn raycast_returns_nearest_hit() {
        let mut w = World::new();
        let near = w.spawn(rock(Vec3::new(0.0, 0.4, -1.0)));
        w.spawn(rock(Vec3::new(0.0, 0.4, -2.0)));
        let hit = w
            .raycast(Vec3::new(0.0, 0.2, 0.0), Vec3::NEG_Z, 5.0, EntityClass::Obstacle)
            .unwrap();
        assert_eq!(hit.entity, near);
    }

    #[test]
    fn disabled_collidability_hides_entity_from_queries() {
        let mut w = World::new();
        let id = w.spawn(rock(Vec3::ZERO));
        assert_eq!(w.overlap_sphere(Vec3::ZERO, 0.1, EntityClass::Obstacle), vec![id]);

        w.set_collidable(id, false).unwrap();
        assert!(w.overlap_sphere(Vec3::ZERO, 0.1, EntityClass::Obstacle).is_empty());
        assert!(w
            .overlap_box(Vec3::ZERO, Vec3::splat(0.1), EntityClass::Obstacle)
            .is_empty());
        assert!(!w.is_collidable(id).unwrap());
    }

    #[test]
    fn set_collidable_logs_only_changes() {
        let mut w = World::new();
        let id = w.spawn(rock(Vec3::ZERO));
        w.drain_events();
        w.set_collidable(id, true).unwrap();
        assert!(w.events().is_empty());
        w.set_collidable(id, false).unwrap();
        assert_eq!(
            w.events(),
            &[SceneEvent::CollidableChanged {
                id,
                collidable: false
            }]
        );
    }

    #[test]
    fn attachment_points_follow_entity_transform() {
        let mut w = World::new();
        let id = w.spawn(
            SceneEntity::new(
                "stick",
                EntityClass::Prop,
                Transform::from_position_yaw(Vec3::new(1.0, 0.0, 0.0), 90.0),
            )
            .with_attachment_point("PickPointA", Vec3::new(0.5, 0.0, 0.0)),
        );
        let points = w.attachment_points(id).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].name, "PickPointA");
        assert!(points[0]
            .position
            .abs_diff_eq(Vec3::new(1.0, 0.0, -0.5), 1e-6));
    }

    #[test]
    fn bounds_require_collider() {
        let mut w = World::new();
        let id = w.spawn(SceneEntity::new(
            "marker",
            EntityClass::Scenery,
            Transform::default(),
        ));
        assert_eq!(w.bounds(id), Err(SceneError::NoCollider(id)));
        let missing = EntityId::new();
        assert_eq!(w.transform(missing), Err(SceneError::EntityNotFound(missing)));
    }

    #[test]
    fn set_transform_logs_event() {
        let mut w = World::new();
        let id = w.spawn(tile(0.0, 0.0));
        let moved = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..Transform::default()
        };
        w.set_transform(id, moved).unwrap();
        assert_eq!(w.get(id).unwrap().transform.position, moved.position);
        assert_eq!(w.events().len(), 2);
    }

    #[test]
    fn find_by_name() {
        let mut w = World::new();
        let id = w.spawn(rock(Vec3::ZERO));
        assert_eq!(w.find_by_name("rock"), Some(id));
        assert_eq!(w.find_by_name("tree"), None);
    }

    fn ball(position: Vec3, radius: f32) -> SceneEntity {
        SceneEntity::new(
            "boulder",
            EntityClass::Obstacle,
            Transform {
                position,
                ..Transform::default()
            },
        )
        .with_collider(Collider::Sphere { radius })
    }

    #[test]
    fn sphere_collider_ray_misses_past_the_curve() {
        let mut w = World::new();
        let id = w.spawn(ball(Vec3::ZERO, 0.5));
        assert!(w
            .raycast(Vec3::new(0.45, 0.45, 2.0), Vec3::NEG_Z, 5.0, EntityClass::Obstacle)
            .is_none());

        let hit = w
            .raycast(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z, 5.0, EntityClass::Obstacle)
            .unwrap();
        assert_eq!(hit.entity, id);
        assert!((hit.distance - 1.5).abs() < 1e-6);
    }

    #[test]
    fn sphere_collider_box_overlap_is_exact() {
        let mut w = World::new();
        let id = w.spawn(ball(Vec3::ZERO, 0.5));
        assert!(w
            .overlap_box(Vec3::splat(0.42), Vec3::splat(0.02), EntityClass::Obstacle)
            .is_empty());
        assert_eq!(
            w.overlap_box(Vec3::new(0.3, 0.0, 0.0), Vec3::splat(0.02), EntityClass::Obstacle),
            vec![id]
        );
        assert!(w
            .overlap_sphere(Vec3::new(0.8, 0.8, 0.0), 0.5, EntityClass::Obstacle)
            .is_empty());
        // Bounds stay the enclosing cube.
        assert_eq!(
            w.bounds(id).unwrap(),
            Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5))
        );
    }
}
