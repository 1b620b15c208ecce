//! # Hitbox Engine
//!
//! Tick-driven hit detection for real-time games.
//!
//! ## Features
//!
//! - **One-shot queries**: box or sphere volumes resolved to hit entities
//! - **Hitbox sessions**: restartable per-tick hitboxes with push callbacks,
//!   single-hit mode and blocking waits
//! - **Limb collision**: directional contact detection for an entity's limbs
//! - **Engine agnostic**: the physics engine and scene graph plug in through
//!   the [`SpatialQuery`](spatial::SpatialQuery) and
//!   [`SceneModel`](spatial::SceneModel) traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hitbox_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = Scene::new();
//!     let attacker = scene.spawn_entity("Attacker");
//!     let mut context = HitboxContext::new(HitboxRules::default());
//!
//!     let session = HitboxSession::with_settings(HitboxSettings {
//!         size: Vec3::new(4.0, 4.0, 3.0),
//!         transform: Some(Transform::from_position(Vec3::new(0.0, 0.0, -3.0))),
//!         filter: QueryFilter::from_owner(attacker, context.rules()),
//!         ..HitboxSettings::default()
//!     });
//!     session.on_hit(|hits| log::info!("hit {:?}", hits));
//!     session.start(context.scheduler_mut())?;
//!
//!     for _ in 0..60 {
//!         context.step(&scene, 1.0 / 60.0);
//!     }
//!     session.stop();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod debug;
pub mod ecs;
pub mod error;
pub mod foundation;
pub mod hitbox;
pub mod physics;
pub mod scene;
pub mod schedule;
pub mod spatial;

mod context;

#[cfg(test)]
mod test_support;

pub use context::HitboxContext;
pub use error::{ConfigurationError, QueryError};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, HitboxRules},
        debug::{DebugDraw, DebugFlag},
        ecs::{AttributeValue, BodyId, EntityId},
        error::{ConfigurationError, QueryError},
        foundation::{
            math::{Transform, Vec3},
            time::{FixedTicks, PacedTicks, TickClock, TickSource},
        },
        hitbox::{
            Axis, Detection, DetectionMode, Direction, DirectionFilter, Directions, HitboxQuery,
            HitboxSession, HitboxSettings, LimbCollisionDetector, LimbContact, LimbOutcome, Offset,
            Pose, Shape, Volume,
        },
        physics::QueryFilter,
        scene::Scene,
        schedule::{TaskId, TickScheduler},
        spatial::{SceneModel, SpatialQuery, World},
        HitboxContext,
    };
}
