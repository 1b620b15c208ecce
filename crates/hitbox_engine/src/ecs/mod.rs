//! Entity and body handles shared with the engine collaborators

pub mod entity;

pub use entity::{AttributeValue, BodyId, EntityId};
