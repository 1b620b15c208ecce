//! Physics module: query primitives and exclusion filters
//!
//! Provides the geometric primitives behind the reference scene's overlap
//! queries and raycasts, and the filter type every query carries.

pub mod filter;
pub mod primitives;

pub use filter::QueryFilter;
pub use primitives::{BoundingSphere, OrientedBox, RayHit};
