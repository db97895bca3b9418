//! Minimal geometry types for block shapes (block-space vectors and boxes).
#![forbid(unsafe_code)]

use core::ops::{Add, Div, Mul, Sub};

mod facing;

pub use facing::{Axis, Direction, ParseOrientationError};

/// Lattice units per block edge. Pixel coordinates run 0..16 across a block.
pub const PIXELS_PER_BLOCK: f64 = 16.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Vec3 = Vec3 {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn from_array([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Componentwise minimum.
    #[inline]
    pub fn min(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    /// Componentwise maximum.
    #[inline]
    pub fn max(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }

    #[inline]
    pub fn axis(self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    #[inline]
    pub fn with_axis(self, axis: Axis, value: f64) -> Vec3 {
        let mut out = self;
        match axis {
            Axis::X => out.x = value,
            Axis::Y => out.y = value,
            Axis::Z => out.z = value,
        }
        out
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// Axis-aligned box in block units. Callers keep `min <= max` per axis;
/// `from_corners` is the constructor to use when that is not known.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// The whole block.
    pub const UNIT: Aabb = Aabb {
        min: Vec3::ZERO,
        max: Vec3::ONE,
    };

    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box spanned by two arbitrary opposite corners.
    #[inline]
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self::new(a.min(b), a.max(b))
    }

    /// Box from 0..16 pixel coordinates.
    pub fn from_pixels(x0: f64, y0: f64, z0: f64, x1: f64, y1: f64, z1: f64) -> Self {
        Self::new(
            Vec3::new(x0, y0, z0) / PIXELS_PER_BLOCK,
            Vec3::new(x1, y1, z1) / PIXELS_PER_BLOCK,
        )
    }

    /// `[x0, y0, z0, x1, y1, z1]` in pixel units.
    pub fn to_pixels(&self) -> [f64; 6] {
        let a = self.min * PIXELS_PER_BLOCK;
        let b = self.max * PIXELS_PER_BLOCK;
        [a.x, a.y, a.z, b.x, b.y, b.z]
    }

    #[inline]
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn volume(&self) -> f64 {
        let e = self.extents();
        e.x.max(0.0) * e.y.max(0.0) * e.z.max(0.0)
    }

    /// True when the box encloses no volume.
    pub fn is_empty(&self) -> bool {
        let e = self.extents();
        !(e.x > 0.0 && e.y > 0.0 && e.z > 0.0)
    }

    /// Inclusive point test.
    pub fn contains(&self, p: Vec3) -> bool {
        self.min.x <= p.x
            && p.x <= self.max.x
            && self.min.y <= p.y
            && p.y <= self.max.y
            && self.min.z <= p.z
            && p.z <= self.max.z
    }

    /// True when the two boxes share a region of positive volume.
    /// Touching faces do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
            && self.min.z < other.max.z
            && other.min.z < self.max.z
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    #[inline]
    pub fn offset(&self, by: Vec3) -> Aabb {
        Aabb::new(self.min + by, self.max + by)
    }

    /// Mirror through the block's center plane on `axis`.
    pub fn mirrored(&self, axis: Axis) -> Aabb {
        let lo = 1.0 - self.max.axis(axis);
        let hi = 1.0 - self.min.axis(axis);
        Aabb::new(self.min.with_axis(axis, lo), self.max.with_axis(axis, hi))
    }
}
