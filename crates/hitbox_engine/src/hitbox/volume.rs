//! Hitbox volumes: a size plus a box or sphere shape

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::debug::{hitbox_color, DebugDraw};
use crate::ecs::BodyId;
use crate::error::ConfigurationError;
use crate::foundation::math::{Transform, Vec3};
use crate::physics::QueryFilter;
use crate::spatial::{query_box, query_sphere, SpatialQuery};

/// Shape of a hitbox volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shape {
    /// Oriented box, uses the full pose
    #[default]
    Box,
    /// Sphere, uses the pose position only
    Sphere,
}

/// Parses `box`/`block` and `sphere`/`ball`, ignoring case
impl FromStr for Shape {
    type Err = ConfigurationError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.to_ascii_lowercase().as_str() {
            "box" | "block" => Ok(Self::Box),
            "sphere" | "ball" => Ok(Self::Sphere),
            _ => Err(ConfigurationError::UnsupportedShape(tag.to_string())),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Box => write!(f, "Box"),
            Self::Sphere => write!(f, "Sphere"),
        }
    }
}

/// Size and shape of the region a hitbox tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    /// Full size along each local axis
    pub size: Vec3,
    /// Box or sphere
    pub shape: Shape,
}

impl Volume {
    /// Box of full `size`
    pub fn cuboid(size: Vec3) -> Self {
        Self {
            size,
            shape: Shape::Box,
        }
    }

    /// Sphere sized by `size` (see [`Volume::sphere_radius`])
    pub fn sphere(size: Vec3) -> Self {
        Self {
            size,
            shape: Shape::Sphere,
        }
    }

    /// Radius used when the shape is a sphere
    ///
    /// An uneven size collapses to its largest component.
    pub fn sphere_radius(&self) -> f32 {
        self.size.x.max(self.size.y).max(self.size.z)
    }

    /// Bodies overlapping this volume at `pose`
    ///
    /// Engine failures come back as an empty list.
    pub fn query<W: SpatialQuery + ?Sized>(
        &self,
        world: &W,
        pose: &Transform,
        filter: &QueryFilter,
    ) -> Vec<BodyId> {
        match self.shape {
            Shape::Box => query_box(world, pose, self.size, filter),
            Shape::Sphere => query_sphere(world, pose.position, self.sphere_radius(), filter),
        }
    }

    /// Push a translucent proxy of this volume at `pose`
    pub fn draw(&self, debug: &mut DebugDraw, pose: &Transform, lifetime: f32) {
        match self.shape {
            Shape::Box => debug.draw_box(pose, self.size, hitbox_color(), lifetime),
            Shape::Sphere => {
                debug.draw_sphere(pose.position, self.sphere_radius(), hitbox_color(), lifetime);
            }
        }
    }
}
