//! Voxel shapes: unions of axis-aligned boxes inside a block, plus the
//! transforms used to orient, mirror and combine them.
#![forbid(unsafe_code)]

pub mod cache;
pub mod config;
pub mod ops;
pub mod shape;

pub use cache::{RotationCache, RotationCacheStats};
pub use config::ShapeLibrary;
pub use ops::{
    flip_shape, flip_shape_y, intersect_shapes, merge_shapes, rotate_shape, rotated,
    translate_shape, unrotated,
};
pub use shape::{BooleanOp, LATTICE, Shape};
