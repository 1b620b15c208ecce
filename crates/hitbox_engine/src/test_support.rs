//! Scene builders shared by the unit tests

use crate::ecs::{AttributeValue, BodyId, EntityId};
use crate::error::QueryError;
use crate::foundation::logging;
use crate::foundation::math::{Transform, Vec3};
use crate::physics::{QueryFilter, RayHit};
use crate::scene::Scene;
use crate::spatial::{SceneModel, SpatialQuery};

/// Comboable character in the characters container, one 2x2x1 root body
pub fn spawn_character(scene: &mut Scene, name: &str, position: Vec3) -> EntityId {
    logging::init_for_tests();

    let entity = scene.spawn_entity(name);
    scene.set_container(entity, Some("Characters"));
    scene.set_life_bearing(entity, true);
    scene.set_attribute(entity, "Combo", true);

    let root = scene
        .add_body(entity, "Root", Transform::from_position(position), Vec3::new(2.0, 2.0, 1.0))
        .expect("entity was just spawned");
    scene.set_root_body(entity, root);
    entity
}

/// Lifeless unit cube outside any container
pub fn spawn_prop(scene: &mut Scene, name: &str, position: Vec3) -> EntityId {
    let entity = scene.spawn_entity(name);
    scene
        .add_body(entity, "Body", Transform::from_position(position), Vec3::new(1.0, 1.0, 1.0))
        .expect("entity was just spawned");
    entity
}

/// Root body of an entity spawned by the helpers above
pub fn root_of(scene: &Scene, entity: EntityId) -> BodyId {
    scene.root_body(entity).expect("entity has a root body")
}

/// World whose physics engine rejects every query
pub struct FailingWorld(pub Scene);

impl SpatialQuery for FailingWorld {
    fn overlap_box(&self, _: &Transform, _: Vec3, _: &QueryFilter) -> Result<Vec<BodyId>, QueryError> {
        Err(QueryError::Engine("box query offline".to_string()))
    }

    fn overlap_sphere(&self, _: Vec3, _: f32, _: &QueryFilter) -> Result<Vec<BodyId>, QueryError> {
        Err(QueryError::Engine("sphere query offline".to_string()))
    }

    fn raycast(&self, _: Vec3, _: Vec3, _: &QueryFilter) -> Result<Option<RayHit>, QueryError> {
        Err(QueryError::Engine("raycast offline".to_string()))
    }
}

impl SceneModel for FailingWorld {
    fn body_entity(&self, body: BodyId) -> Option<EntityId> {
        self.0.body_entity(body)
    }

    fn body_transform(&self, body: BodyId) -> Option<Transform> {
        self.0.body_transform(body)
    }

    fn body_size(&self, body: BodyId) -> Option<Vec3> {
        self.0.body_size(body)
    }

    fn entity_bodies(&self, entity: EntityId) -> Vec<BodyId> {
        self.0.entity_bodies(entity)
    }

    fn root_body(&self, entity: EntityId) -> Option<BodyId> {
        self.0.root_body(entity)
    }

    fn entity_exists(&self, entity: EntityId) -> bool {
        self.0.entity_exists(entity)
    }

    fn container(&self, entity: EntityId) -> Option<&str> {
        self.0.container(entity)
    }

    fn is_life_bearing(&self, entity: EntityId) -> bool {
        self.0.is_life_bearing(entity)
    }

    fn attribute(&self, entity: EntityId, name: &str) -> Option<AttributeValue> {
        self.0.attribute(entity, name)
    }
}
