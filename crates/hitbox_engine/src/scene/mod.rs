//! In-memory reference world
//!
//! [`Scene`] implements both engine collaborators ([`SpatialQuery`] and
//! [`SceneModel`]) with brute-force tests over every body. It is meant for
//! tools, prototypes and tests; a shipping game plugs its physics engine in
//! through the same traits instead.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::ecs::{AttributeValue, BodyId, EntityId};
use crate::error::QueryError;
use crate::foundation::math::{Transform, Vec3};
use crate::physics::{BoundingSphere, OrientedBox, QueryFilter, RayHit};
use crate::spatial::{SceneModel, SpatialQuery};

#[derive(Debug)]
struct EntityRecord {
    name: String,
    container: Option<String>,
    life_bearing: bool,
    attributes: HashMap<String, AttributeValue>,
    bodies: Vec<BodyId>,
    root: Option<BodyId>,
}

#[derive(Debug)]
struct BodyRecord {
    entity: EntityId,
    name: String,
    transform: Transform,
    size: Vec3,
}

/// Entities, their box bodies and attributes
#[derive(Debug, Default)]
pub struct Scene {
    entities: SlotMap<EntityId, EntityRecord>,
    bodies: SlotMap<BodyId, BodyRecord>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity with no bodies, outside any container
    pub fn spawn_entity(&mut self, name: impl Into<String>) -> EntityId {
        self.entities.insert(EntityRecord {
            name: name.into(),
            container: None,
            life_bearing: false,
            attributes: HashMap::new(),
            bodies: Vec::new(),
            root: None,
        })
    }

    /// Remove an entity and all of its bodies
    pub fn despawn_entity(&mut self, entity: EntityId) -> bool {
        let Some(record) = self.entities.remove(entity) else {
            return false;
        };
        for body in record.bodies {
            self.bodies.remove(body);
        }
        log::trace!("Despawned entity '{}'", record.name);
        true
    }

    /// Move an entity into a container, or out of every container
    pub fn set_container(&mut self, entity: EntityId, container: Option<&str>) -> bool {
        self.entities.get_mut(entity).map_or(false, |record| {
            record.container = container.map(str::to_string);
            true
        })
    }

    /// Give or take away the entity's life-bearing component
    pub fn set_life_bearing(&mut self, entity: EntityId, life_bearing: bool) -> bool {
        self.entities.get_mut(entity).map_or(false, |record| {
            record.life_bearing = life_bearing;
            true
        })
    }

    /// Set an attribute value
    pub fn set_attribute(
        &mut self,
        entity: EntityId,
        name: &str,
        value: impl Into<AttributeValue>,
    ) -> bool {
        self.entities.get_mut(entity).map_or(false, |record| {
            record.attributes.insert(name.to_string(), value.into());
            true
        })
    }

    /// Remove an attribute
    pub fn remove_attribute(&mut self, entity: EntityId, name: &str) -> Option<AttributeValue> {
        self.entities.get_mut(entity)?.attributes.remove(name)
    }

    /// Attach a box body of full `size` to an entity
    pub fn add_body(
        &mut self,
        entity: EntityId,
        name: impl Into<String>,
        transform: Transform,
        size: Vec3,
    ) -> Option<BodyId> {
        if !self.entities.contains_key(entity) {
            return None;
        }

        let body = self.bodies.insert(BodyRecord {
            entity,
            name: name.into(),
            transform,
            size,
        });
        self.entities[entity].bodies.push(body);
        Some(body)
    }

    /// Mark one of the entity's bodies as its root
    pub fn set_root_body(&mut self, entity: EntityId, body: BodyId) -> bool {
        let owned = self.bodies.get(body).is_some_and(|record| record.entity == entity);
        match self.entities.get_mut(entity) {
            Some(record) if owned => {
                record.root = Some(body);
                true
            }
            _ => false,
        }
    }

    /// Move or rotate a body
    pub fn set_body_transform(&mut self, body: BodyId, transform: Transform) -> bool {
        self.bodies.get_mut(body).map_or(false, |record| {
            record.transform = transform;
            true
        })
    }

    /// Entity name, as given at spawn
    pub fn entity_name(&self, entity: EntityId) -> Option<&str> {
        self.entities.get(entity).map(|record| record.name.as_str())
    }

    /// Body name, as given when attached
    pub fn body_name(&self, body: BodyId) -> Option<&str> {
        self.bodies.get(body).map(|record| record.name.as_str())
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of live bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Bodies that pass the filter, in insertion order
    fn candidates<'a>(
        &'a self,
        filter: &'a QueryFilter,
    ) -> impl Iterator<Item = (BodyId, &'a BodyRecord)> + 'a {
        self.bodies.iter().filter(move |(body, record)| {
            let container = self
                .entities
                .get(record.entity)
                .and_then(|entity| entity.container.as_deref());
            !filter.excludes(*body, Some(record.entity), container)
        })
    }
}

impl SpatialQuery for Scene {
    fn overlap_box(
        &self,
        pose: &Transform,
        size: Vec3,
        filter: &QueryFilter,
    ) -> Result<Vec<BodyId>, QueryError> {
        let volume = OrientedBox::new(*pose, size);
        Ok(self
            .candidates(filter)
            .filter(|(_, record)| {
                volume.intersects_box(&OrientedBox::new(record.transform, record.size))
            })
            .map(|(body, _)| body)
            .collect())
    }

    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        filter: &QueryFilter,
    ) -> Result<Vec<BodyId>, QueryError> {
        let sphere = BoundingSphere::new(center, radius);
        Ok(self
            .candidates(filter)
            .filter(|(_, record)| {
                OrientedBox::new(record.transform, record.size).intersects_sphere(&sphere)
            })
            .map(|(body, _)| body)
            .collect())
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        filter: &QueryFilter,
    ) -> Result<Option<RayHit>, QueryError> {
        let nearest = self
            .candidates(filter)
            .filter_map(|(body, record)| {
                OrientedBox::new(record.transform, record.size)
                    .intersect_ray(origin, direction)
                    .map(|(distance, point, normal)| RayHit {
                        body,
                        distance,
                        point,
                        normal,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance));
        Ok(nearest)
    }
}

impl SceneModel for Scene {
    fn body_entity(&self, body: BodyId) -> Option<EntityId> {
        self.bodies.get(body).map(|record| record.entity)
    }

    fn body_transform(&self, body: BodyId) -> Option<Transform> {
        self.bodies.get(body).map(|record| record.transform)
    }

    fn body_size(&self, body: BodyId) -> Option<Vec3> {
        self.bodies.get(body).map(|record| record.size)
    }

    fn entity_bodies(&self, entity: EntityId) -> Vec<BodyId> {
        self.entities
            .get(entity)
            .map(|record| record.bodies.clone())
            .unwrap_or_default()
    }

    fn root_body(&self, entity: EntityId) -> Option<BodyId> {
        self.entities.get(entity)?.root
    }

    fn entity_exists(&self, entity: EntityId) -> bool {
        self.entities.contains_key(entity)
    }

    fn container(&self, entity: EntityId) -> Option<&str> {
        self.entities.get(entity)?.container.as_deref()
    }

    fn is_life_bearing(&self, entity: EntityId) -> bool {
        self.entities
            .get(entity)
            .is_some_and(|record| record.life_bearing)
    }

    fn attribute(&self, entity: EntityId, name: &str) -> Option<AttributeValue> {
        self.entities.get(entity)?.attributes.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crate_scene() -> (Scene, EntityId, BodyId) {
        let mut scene = Scene::new();
        let crate_entity = scene.spawn_entity("Crate");
        let body = scene
            .add_body(
                crate_entity,
                "Lid",
                Transform::from_position(Vec3::new(0.0, 0.0, -4.0)),
                Vec3::new(2.0, 2.0, 2.0),
            )
            .unwrap();
        (scene, crate_entity, body)
    }

    #[test]
    fn test_box_and_sphere_overlap() {
        let (scene, _, body) = crate_scene();
        let filter = QueryFilter::new();

        let hits = scene
            .overlap_box(&Transform::from_position(Vec3::new(0.0, 0.0, -2.0)), Vec3::new(2.0, 2.0, 2.0), &filter)
            .unwrap();
        assert_eq!(hits, vec![body]);

        let misses = scene.overlap_sphere(Vec3::new(0.0, 0.0, 2.0), 1.0, &filter).unwrap();
        assert!(misses.is_empty());
    }

    #[test]
    fn test_filter_applies_to_queries() {
        let (mut scene, crate_entity, _) = crate_scene();
        scene.set_container(crate_entity, Some("UnobstructiveAssets"));
        let filter = QueryFilter::new().exclude_container("UnobstructiveAssets");

        let hits = scene.overlap_sphere(Vec3::new(0.0, 0.0, -4.0), 1.0, &filter).unwrap();
        assert!(hits.is_empty());

        let ray = scene.raycast(Vec3::zeros(), Vec3::new(0.0, 0.0, -10.0), &filter).unwrap();
        assert!(ray.is_none());
    }

    #[test]
    fn test_raycast_returns_nearest() {
        let (mut scene, _, near) = crate_scene();
        let wall = scene.spawn_entity("Wall");
        scene.add_body(
            wall,
            "Brick",
            Transform::from_position(Vec3::new(0.0, 0.0, -8.0)),
            Vec3::new(4.0, 4.0, 1.0),
        );

        let hit = scene
            .raycast(Vec3::zeros(), Vec3::new(0.0, 0.0, -10.0), &QueryFilter::new())
            .unwrap()
            .unwrap();
        assert_eq!(hit.body, near);
        assert!((hit.distance - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_despawn_removes_bodies() {
        let (mut scene, crate_entity, body) = crate_scene();
        assert_eq!(scene.body_count(), 1);

        assert!(scene.despawn_entity(crate_entity));
        assert_eq!(scene.body_count(), 0);
        assert!(scene.body_entity(body).is_none());
        assert!(!scene.entity_exists(crate_entity));
        assert!(!scene.despawn_entity(crate_entity));
    }

    #[test]
    fn test_root_body_must_belong_to_entity() {
        let (mut scene, crate_entity, body) = crate_scene();
        let other = scene.spawn_entity("Other");

        assert!(!scene.set_root_body(other, body));
        assert!(scene.set_root_body(crate_entity, body));
        assert_eq!(scene.root_body(crate_entity), Some(body));
    }
}
