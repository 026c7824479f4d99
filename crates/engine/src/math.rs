use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Axis-aligned box. Bounds are inclusive, so boxes that only touch overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box resting on `base_y` with the given lateral/longitudinal half extents.
    pub fn from_footprint(
        center_x: f32,
        base_y: f32,
        center_z: f32,
        half_width: f32,
        height: f32,
        half_depth: f32,
    ) -> Self {
        Self {
            min: Vec3::new(center_x - half_width, base_y, center_z - half_depth),
            max: Vec3::new(center_x + half_width, base_y + height, center_z + half_depth),
        }
    }

    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        intervals_overlap(self.min.x, self.max.x, other.min.x, other.max.x)
    }

    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        intervals_overlap(self.min.y, self.max.y, other.min.y, other.max.y)
    }

    pub fn overlaps_z(&self, other: &Aabb) -> bool {
        intervals_overlap(self.min.z, self.max.z, other.min.z, other.max.z)
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other) && self.overlaps_z(other)
    }
}

fn intervals_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_min <= b_max && b_min <= a_max
}

/// Fraction of the remaining distance covered in `dt` by exponential smoothing at `rate`.
pub fn smoothing_alpha(rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    1.0 - (-rate * dt).exp()
}

pub fn smooth_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * smoothing_alpha(rate, dt)
}
