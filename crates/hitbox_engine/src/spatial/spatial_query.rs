//! Abstract interfaces to the physics engine and the scene graph
//!
//! The hit detection core never owns geometry. It asks a [`SpatialQuery`]
//! implementation for bodies overlapping a volume or crossed by a ray, and a
//! [`SceneModel`] implementation for who owns those bodies and which flags
//! they carry. [`World`] bundles both for the tick loop.

use crate::ecs::{AttributeValue, BodyId, EntityId};
use crate::error::QueryError;
use crate::foundation::math::{Transform, Vec3};
use crate::physics::{QueryFilter, RayHit};

/// Broad-phase queries provided by the physics engine
pub trait SpatialQuery {
    /// Bodies overlapping an oriented box of full `size` centered on `pose`
    ///
    /// # Errors
    /// Returns a [`QueryError`] when the engine cannot run the query.
    fn overlap_box(
        &self,
        pose: &Transform,
        size: Vec3,
        filter: &QueryFilter,
    ) -> Result<Vec<BodyId>, QueryError>;

    /// Bodies overlapping a sphere
    ///
    /// # Errors
    /// Returns a [`QueryError`] when the engine cannot run the query.
    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        filter: &QueryFilter,
    ) -> Result<Vec<BodyId>, QueryError>;

    /// Nearest body crossed by the segment `origin .. origin + direction`
    ///
    /// The length of `direction` is the ray length.
    ///
    /// # Errors
    /// Returns a [`QueryError`] when the engine cannot run the query.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        filter: &QueryFilter,
    ) -> Result<Option<RayHit>, QueryError>;
}

/// Entity model provided by the scene graph
pub trait SceneModel {
    /// Entity owning a body
    fn body_entity(&self, body: BodyId) -> Option<EntityId>;

    /// Current world transform of a body
    fn body_transform(&self, body: BodyId) -> Option<Transform>;

    /// Full size of a body's box
    fn body_size(&self, body: BodyId) -> Option<Vec3>;

    /// Every body belonging to an entity
    fn entity_bodies(&self, entity: EntityId) -> Vec<BodyId>;

    /// The body an entity is anchored to, if it has one
    fn root_body(&self, entity: EntityId) -> Option<BodyId>;

    /// Whether the entity still exists
    fn entity_exists(&self, entity: EntityId) -> bool;

    /// Name of the container the entity currently lives in
    fn container(&self, entity: EntityId) -> Option<&str>;

    /// Whether the entity has health or other combat state
    fn is_life_bearing(&self, entity: EntityId) -> bool;

    /// Attribute lookup by name
    fn attribute(&self, entity: EntityId, name: &str) -> Option<AttributeValue>;

    /// Whether an attribute is present and truthy
    fn flag(&self, entity: EntityId, name: &str) -> bool {
        self.attribute(entity, name)
            .is_some_and(|value| value.is_truthy())
    }
}

/// Everything a tick task needs from the engine
pub trait World: SpatialQuery + SceneModel {}

impl<T: SpatialQuery + SceneModel + ?Sized> World for T {}

/// Box overlap that degrades engine failures to an empty result
pub fn query_box<W: SpatialQuery + ?Sized>(
    world: &W,
    pose: &Transform,
    size: Vec3,
    filter: &QueryFilter,
) -> Vec<BodyId> {
    world.overlap_box(pose, size, filter).unwrap_or_else(|err| {
        log::warn!("Box query failed, treating as empty: {}", err);
        Vec::new()
    })
}

/// Sphere overlap that degrades engine failures to an empty result
pub fn query_sphere<W: SpatialQuery + ?Sized>(
    world: &W,
    center: Vec3,
    radius: f32,
    filter: &QueryFilter,
) -> Vec<BodyId> {
    world.overlap_sphere(center, radius, filter).unwrap_or_else(|err| {
        log::warn!("Sphere query failed, treating as empty: {}", err);
        Vec::new()
    })
}

/// Raycast that degrades engine failures to a miss
pub fn query_ray<W: SpatialQuery + ?Sized>(
    world: &W,
    origin: Vec3,
    direction: Vec3,
    filter: &QueryFilter,
) -> Option<RayHit> {
    world.raycast(origin, direction, filter).unwrap_or_else(|err| {
        log::warn!("Raycast failed, treating as miss: {}", err);
        None
    })
}
