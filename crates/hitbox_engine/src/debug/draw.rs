//! Debug drawing primitives and queue
//!
//! Hitbox queries push a translucent proxy of the volume they tested while
//! debug mode is on. The host renders [`DebugDraw::shapes`] each frame; shapes
//! expire on their own after their duration.

use crate::foundation::math::{Quat, Transform, Vec3, Vec4};

/// Debug shape primitives that can be rendered for visualization
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Sphere at center with radius
    Sphere {
        /// Sphere center
        center: Vec3,
        /// Sphere radius
        radius: f32,
        /// RGBA color
        color: Vec4,
        /// Remaining lifetime in seconds
        duration: f32,
    },

    /// Oriented box at center with half-extents
    Box {
        /// Box center
        center: Vec3,
        /// Half of the box size
        extents: Vec3,
        /// Box orientation
        rotation: Quat,
        /// RGBA color
        color: Vec4,
        /// Remaining lifetime in seconds
        duration: f32,
    },
}

impl DebugShape {
    /// Get remaining duration
    pub fn duration(&self) -> f32 {
        match self {
            Self::Sphere { duration, .. } | Self::Box { duration, .. } => *duration,
        }
    }

    /// Decrease duration by delta_time, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        match self {
            Self::Sphere { duration, .. } | Self::Box { duration, .. } => {
                *duration -= delta_time;
                *duration <= 0.0
            }
        }
    }
}

/// Translucent red, the default hitbox proxy color
pub fn hitbox_color() -> Vec4 {
    Vec4::new(1.0, 0.0, 0.0, 0.5)
}

/// Queue of transient debug shapes
#[derive(Debug, Default)]
pub struct DebugDraw {
    shapes: Vec<DebugShape>,
}

impl DebugDraw {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw an oriented box of full `size`
    pub fn draw_box(&mut self, transform: &Transform, size: Vec3, color: Vec4, duration: f32) {
        self.shapes.push(DebugShape::Box {
            center: transform.position,
            extents: size * 0.5,
            rotation: transform.rotation,
            color,
            duration,
        });
    }

    /// Draw a sphere
    pub fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Vec4, duration: f32) {
        self.shapes.push(DebugShape::Sphere {
            center,
            radius,
            color,
            duration,
        });
    }

    /// Age every shape and drop the expired ones
    pub fn update(&mut self, delta_time: f32) {
        self.shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// Shapes to render this frame
    pub fn shapes(&self) -> &[DebugShape] {
        &self.shapes
    }

    /// Number of live shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Drop every shape
    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_shape_expiration() {
        let mut draw = DebugDraw::new();

        // Add a shape with 1 second duration
        draw.draw_sphere(Vec3::zeros(), 1.0, hitbox_color(), 1.0);
        assert_eq!(draw.shape_count(), 1);

        // Update for 0.5 seconds
        draw.update(0.5);
        assert_eq!(draw.shape_count(), 1);

        // Update for another 0.6 seconds (total 1.1 seconds)
        draw.update(0.6);
        assert_eq!(draw.shape_count(), 0);
    }

    #[test]
    fn test_box_stores_half_extents() {
        let mut draw = DebugDraw::new();
        draw.draw_box(&Transform::identity(), Vec3::new(2.0, 4.0, 6.0), hitbox_color(), 0.1);

        match &draw.shapes()[0] {
            DebugShape::Box { extents, .. } => assert_eq!(*extents, Vec3::new(1.0, 2.0, 3.0)),
            other => panic!("expected a box, got {other:?}"),
        }
    }
}
