//! Hitbox poses: fixed transforms or offsets from a moving core body

use serde::{Deserialize, Serialize};

use crate::ecs::BodyId;
use crate::foundation::math::{Transform, Vec3};
use crate::spatial::SceneModel;

/// Local axis of a reference body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Local -Z
    Forward,
    /// Local +Y
    Up,
    /// Local +X
    Right,
}

impl Axis {
    /// This axis of `transform`, in world space
    pub fn of(self, transform: &Transform) -> Vec3 {
        match self {
            Self::Forward => transform.forward(),
            Self::Up => transform.up(),
            Self::Right => transform.right(),
        }
    }
}

/// Offset from the core body
#[derive(Debug, Clone, PartialEq)]
pub enum Offset {
    /// Raw world-space vector
    Vector(Vec3),
    /// Distances along the core's own axes, applied in order
    Along(Vec<(Axis, f32)>),
}

impl Default for Offset {
    fn default() -> Self {
        Self::Vector(Vec3::zeros())
    }
}

impl Offset {
    /// World-space displacement for a core currently at `core`
    pub fn resolve(&self, core: &Transform) -> Vec3 {
        match self {
            Self::Vector(vector) => *vector,
            Self::Along(parts) => parts
                .iter()
                .fold(Vec3::zeros(), |sum, (axis, distance)| sum + axis.of(core) * *distance),
        }
    }
}

/// Where a hitbox sits in the world
#[derive(Debug, Clone, PartialEq)]
pub enum Pose {
    /// Static world transform
    Fixed(Transform),
    /// Follows a reference body, recomputed on every query
    CoreRelative {
        /// Reference body
        core: BodyId,
        /// Displacement from the reference body
        offset: Offset,
    },
}

impl Pose {
    /// Absolute pose for the current tick
    ///
    /// Returns `None` when the core body no longer exists.
    pub fn resolve<M: SceneModel + ?Sized>(&self, model: &M) -> Option<Transform> {
        match self {
            Self::Fixed(transform) => Some(*transform),
            Self::CoreRelative { core, offset } => {
                let core = model.body_transform(*core)?;
                Some(core.translated(offset.resolve(&core)))
            }
        }
    }
}
