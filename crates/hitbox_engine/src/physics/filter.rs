//! Exclusion filters for spatial queries
//!
//! A [`QueryFilter`] tells the engine which bodies a query must ignore: the
//! hitbox owner, targets that were already hit, and whole containers such as
//! purely cosmetic assets.

use std::collections::HashSet;

use crate::config::HitboxRules;
use crate::ecs::{BodyId, EntityId};

/// Set of entities, bodies and containers a query ignores
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    entities: HashSet<EntityId>,
    bodies: HashSet<BodyId>,
    containers: Vec<String>,
}

impl QueryFilter {
    /// Filter that excludes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter for a hitbox owned by `owner`
    ///
    /// Excludes the owner itself and the cosmetic assets container named by
    /// `rules`.
    pub fn from_owner(owner: EntityId, rules: &HitboxRules) -> Self {
        Self::new()
            .exclude_entity(owner)
            .exclude_container(&rules.cosmetic_container)
    }

    /// Builder pattern: ignore every body of `entity`
    pub fn exclude_entity(mut self, entity: EntityId) -> Self {
        self.entities.insert(entity);
        self
    }

    /// Builder pattern: ignore a single body
    pub fn exclude_body(mut self, body: BodyId) -> Self {
        self.bodies.insert(body);
        self
    }

    /// Builder pattern: ignore every entity inside a container
    pub fn exclude_container(mut self, container: &str) -> Self {
        if !self.containers.iter().any(|name| name == container) {
            self.containers.push(container.to_string());
        }
        self
    }

    /// Ignore `entity` from now on (e.g. a target that was already hit)
    pub fn add_entity(&mut self, entity: EntityId) {
        self.entities.insert(entity);
    }

    /// Whether a body must be skipped by the query
    ///
    /// `entity` and `container` describe the body's owner as resolved by the
    /// engine.
    pub fn excludes(&self, body: BodyId, entity: Option<EntityId>, container: Option<&str>) -> bool {
        if self.bodies.contains(&body) {
            return true;
        }
        if entity.is_some_and(|entity| self.entities.contains(&entity)) {
            return true;
        }
        container.is_some_and(|container| self.containers.iter().any(|name| name == container))
    }

    /// Whether the filter excludes nothing
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.bodies.is_empty() && self.containers.is_empty()
    }
}
