//! Primitive collision shapes and intersection algorithms
//!
//! Provides the oriented box and sphere tests used by the reference scene to
//! answer overlap queries and raycasts.

use crate::ecs::BodyId;
use crate::foundation::math::{Transform, Vec3};

const EPSILON: f32 = 1e-6;

/// Result of a raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The body that was hit
    pub body: BodyId,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec3,
    /// The surface normal at the intersection point
    pub normal: Vec3,
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Box with arbitrary orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    /// Center and orientation
    pub transform: Transform,
    /// Half of the box size along each local axis
    pub half_extents: Vec3,
}

impl OrientedBox {
    /// Box of full `size` centered on `transform`
    pub fn new(transform: Transform, size: Vec3) -> Self {
        Self {
            transform,
            half_extents: size.abs() * 0.5,
        }
    }

    /// Local X, Y and Z axes in world space
    pub fn axes(&self) -> [Vec3; 3] {
        [
            self.transform.rotation * Vec3::x(),
            self.transform.rotation * Vec3::y(),
            self.transform.rotation * Vec3::z(),
        ]
    }

    /// Half the box's extent when projected onto `axis`
    fn projected_radius(&self, axis: &Vec3) -> f32 {
        self.axes()
            .iter()
            .zip(self.half_extents.iter())
            .map(|(local, extent)| local.dot(axis).abs() * extent)
            .sum()
    }

    /// Separating axis test against another oriented box
    ///
    /// Tests the 15 candidate axes: 3 face normals per box plus the 9 edge
    /// cross products. Touching boxes count as overlapping.
    pub fn intersects_box(&self, other: &OrientedBox) -> bool {
        let offset = other.transform.position - self.transform.position;
        let axes_a = self.axes();
        let axes_b = other.axes();

        let mut candidates = Vec::with_capacity(15);
        candidates.extend_from_slice(&axes_a);
        candidates.extend_from_slice(&axes_b);
        for a in &axes_a {
            for b in &axes_b {
                let cross = a.cross(b);
                // Parallel edges are already covered by the face axes
                if cross.magnitude_squared() > EPSILON {
                    candidates.push(cross.normalize());
                }
            }
        }

        candidates.iter().all(|axis| {
            let distance = offset.dot(axis).abs();
            distance <= self.projected_radius(axis) + other.projected_radius(axis)
        })
    }

    /// Closest point on or inside the box to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let local = self.transform.inverse_transform_point(point);
        let clamped = Vec3::new(
            local.x.clamp(-self.half_extents.x, self.half_extents.x),
            local.y.clamp(-self.half_extents.y, self.half_extents.y),
            local.z.clamp(-self.half_extents.z, self.half_extents.z),
        );
        self.transform.transform_point(clamped)
    }

    /// Whether a sphere touches or overlaps the box
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        let closest = self.closest_point(sphere.center);
        (closest - sphere.center).magnitude_squared() <= sphere.radius * sphere.radius
    }

    /// Whether a world-space point lies inside the box
    pub fn contains_point(&self, point: Vec3) -> bool {
        let local = self.transform.inverse_transform_point(point);
        local.x.abs() <= self.half_extents.x
            && local.y.abs() <= self.half_extents.y
            && local.z.abs() <= self.half_extents.z
    }

    /// Slab test for a ray segment from `origin` along `direction`
    ///
    /// `direction` carries the segment length. Returns `(distance, point,
    /// normal)` for the entry point. A segment starting inside the box does
    /// not hit it.
    pub fn intersect_ray(&self, origin: Vec3, direction: Vec3) -> Option<(f32, Vec3, Vec3)> {
        let local_origin = self.transform.inverse_transform_point(origin);
        let local_direction = self.transform.rotation.inverse() * direction;

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut enter_normal = Vec3::zeros();

        for axis in 0..3 {
            let extent = self.half_extents[axis];
            let o = local_origin[axis];
            let d = local_direction[axis];

            if d.abs() < EPSILON {
                // Parallel to this slab: must already be between its planes
                if o.abs() > extent {
                    return None;
                }
                continue;
            }

            let mut t_near = (-extent - o) / d;
            let mut t_far = (extent - o) / d;
            let mut sign = -1.0;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
                sign = 1.0;
            }

            if t_near > t_enter {
                t_enter = t_near;
                enter_normal = Vec3::zeros();
                enter_normal[axis] = sign;
            }
            t_exit = t_exit.min(t_far);

            if t_enter > t_exit {
                return None;
            }
        }

        if t_enter < 0.0 || t_enter > 1.0 {
            return None;
        }

        let length = direction.magnitude();
        let point = origin + direction * t_enter;
        let normal = self.transform.rotation * enter_normal;
        Some((t_enter * length, point, normal))
    }
}
