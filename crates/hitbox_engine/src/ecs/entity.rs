//! Entity and body identifiers

use serde::{Deserialize, Serialize};

slotmap::new_key_type! {
    /// Gameplay actor or object; the unit of hit targeting
    pub struct EntityId;

    /// Single collidable primitive belonging to an entity
    pub struct BodyId;
}

/// Value stored in an entity attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Boolean flag
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

impl AttributeValue {
    /// Whether the attribute counts as set
    ///
    /// Only an explicit `false` is falsy; numbers and text are truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Bool(false))
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
