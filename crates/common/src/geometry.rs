use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Bounds of a box with local `half_extents` rotated by `rotation` and
    /// centred on `center`.
    pub fn from_oriented_box(center: Vec3, rotation: Quat, half_extents: Vec3) -> Self {
        let m = Mat3::from_quat(rotation);
        let abs = Mat3::from_cols(m.x_axis.abs(), m.y_axis.abs(), m.z_axis.abs());
        Self::from_center_half_extents(center, abs * half_extents.abs())
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Overlap with positive volume. Boxes that only touch do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmplt(other.max).all() && other.min.cmplt(self.max).all()
    }

    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.closest_point(center).distance_squared(center) <= radius * radius
    }

    /// Distance along a normalized `direction` at which a ray from `origin`
    /// enters the box. Rays starting inside the box report no hit.
    pub fn ray_entry(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        if self.contains(origin) {
            return None;
        }
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

/// Sphere in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Vec3) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, Vec3::splat(self.radius))
    }

    /// Distance along a normalized `direction` at which a ray from `origin`
    /// enters the sphere. Rays starting inside report no hit, as for
    /// [`Aabb::ray_entry`].
    pub fn ray_entry(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        if self.contains(origin) {
            return None;
        }
        let to_center = self.center - origin;
        let along = to_center.dot(direction);
        if along < 0.0 {
            return None;
        }
        let miss_sq = to_center.length_squared() - along * along;
        let r_sq = self.radius * self.radius;
        if miss_sq > r_sq {
            return None;
        }
        Some(along - (r_sq - miss_sq).sqrt())
    }
}

/// Exact world-space shape of a collider, used by spatial queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Volume {
    Box(Aabb),
    Sphere(Sphere),
}

impl Volume {
    pub fn bounds(&self) -> Aabb {
        match self {
            Self::Box(b) => *b,
            Self::Sphere(s) => s.bounds(),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        match self {
            Self::Box(b) => b.contains(point),
            Self::Sphere(s) => s.contains(point),
        }
    }

    pub fn ray_entry(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        match self {
            Self::Box(b) => b.ray_entry(origin, direction),
            Self::Sphere(s) => s.ray_entry(origin, direction),
        }
    }

    /// Overlap with a box. Box against box is strict, as in
    /// [`Aabb::intersects`]; a sphere touching the box counts.
    pub fn intersects_box(&self, other: &Aabb) -> bool {
        match self {
            Self::Box(b) => b.intersects(other),
            Self::Sphere(s) => other.intersects_sphere(s.center, s.radius),
        }
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        match self {
            Self::Box(b) => b.intersects_sphere(center, radius),
            Self::Sphere(s) => {
                let reach = s.radius + radius;
                s.center.distance_squared(center) <= reach * reach
            }
        }
    }
}
