//! Spatial query interfaces
//!
//! Abstracts the engine's broad-phase queries and scene graph so the hit
//! detection core can run against any world implementation.

pub mod spatial_query;

pub use spatial_query::{query_box, query_ray, query_sphere, SceneModel, SpatialQuery, World};
