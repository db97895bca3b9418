//! Shape transforms. Shapes are authored facing `Direction::Down`; every
//! rotation here is a 90 degree step about the block's X or Y axis through
//! the block center.

use std::sync::Arc;

use blockforge_geom::{Aabb, Axis, Direction, Vec3};

use crate::cache::RotationCache;
use crate::shape::{BooleanOp, LATTICE, Shape};

#[inline]
fn rotate_x90(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, 1.0 - v.y)
}

#[inline]
fn rotate_x180(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 1.0 - v.y, 1.0 - v.z)
}

#[inline]
fn rotate_x270(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 1.0 - v.z, v.y)
}

#[inline]
fn rotate_y90(v: Vec3) -> Vec3 {
    Vec3::new(v.z, v.y, 1.0 - v.x)
}

#[inline]
fn rotate_y180(v: Vec3) -> Vec3 {
    Vec3::new(1.0 - v.x, v.y, 1.0 - v.z)
}

#[inline]
fn rotate_y270(v: Vec3) -> Vec3 {
    Vec3::new(1.0 - v.z, v.y, v.x)
}

/// Same recipe block models use for facing variants.
fn orient_point(v: Vec3, facing: Direction) -> Vec3 {
    match facing {
        Direction::Down => v,
        Direction::Up => rotate_x180(v),
        Direction::North => rotate_x270(v),
        Direction::South => rotate_y180(rotate_x270(v)),
        Direction::East => rotate_y270(rotate_x270(v)),
        Direction::West => rotate_y90(rotate_x270(v)),
    }
}

fn restore_point(v: Vec3, facing: Direction) -> Vec3 {
    match facing {
        Direction::Down => v,
        Direction::Up => rotate_x180(v),
        Direction::North => rotate_x90(v),
        Direction::South => rotate_x90(rotate_y180(v)),
        Direction::East => rotate_x90(rotate_y90(v)),
        Direction::West => rotate_x90(rotate_y270(v)),
    }
}

fn map_boxes(shape: &Shape, f: impl Fn(Vec3) -> Vec3) -> Shape {
    // Corners are re-sorted per axis: a rotation can swap which one is min.
    Shape::from_boxes(
        shape
            .to_boxes()
            .into_iter()
            .map(|b| Aabb::from_corners(f(b.min), f(b.max))),
    )
}

/// Uncached rotation of a down-authored shape to `facing`.
pub fn rotated(shape: &Shape, facing: Direction) -> Shape {
    if facing == Direction::Down {
        return shape.clone();
    }
    map_boxes(shape, |v| orient_point(v, facing))
}

/// Inverse of [`rotated`]: maps a shape oriented to `facing` back to its
/// down-authored form.
pub fn unrotated(shape: &Shape, facing: Direction) -> Shape {
    if facing == Direction::Down {
        return shape.clone();
    }
    map_boxes(shape, |v| restore_point(v, facing))
}

/// Orient `shape` to `facing` through the process-wide rotation cache.
/// `Down` hands back the same instance.
pub fn rotate_shape(shape: &Arc<Shape>, facing: Direction) -> Arc<Shape> {
    RotationCache::global().rotate(shape, facing)
}

/// Mirror across the center plane of `axis`, rasterized on the
/// `LATTICE`³ grid. The result is a union of lattice cells even when the
/// input is not lattice aligned.
pub fn flip_shape(shape: &Shape, axis: Axis) -> Shape {
    let mut cells = Vec::new();
    for x in 0..LATTICE {
        for y in 0..LATTICE {
            for z in 0..LATTICE {
                let (x, y, z) = (x as f64, y as f64, z as f64);
                let cell = Aabb::from_pixels(x, y, z, x + 1.0, y + 1.0, z + 1.0);
                if shape.intersects_box(&cell.mirrored(axis)) {
                    cells.push(cell);
                }
            }
        }
    }
    let flipped = Shape::from_boxes(cells);
    log::trace!(target: "shapes", "flipped shape on {axis}: {} box(es)", flipped.to_boxes().len());
    flipped
}

/// [`flip_shape`] on the vertical axis.
pub fn flip_shape_y(shape: &Shape) -> Shape {
    flip_shape(shape, Axis::Y)
}

pub fn merge_shapes(a: &Shape, b: &Shape) -> Shape {
    a.join(b, BooleanOp::Or)
}

pub fn intersect_shapes(a: &Shape, b: &Shape) -> Shape {
    a.join(b, BooleanOp::And)
}

/// Move the shape's bounding box `pixels` lattice units (1/16 block) toward
/// `direction`.
///
/// Only the overall bounds move: the result is always a single box, so a
/// multi-box shape collapses to its bounding box. Shapes are in block units
/// while `pixels` is in lattice units; the offset is applied in pixel space.
/// An empty shape has no bounds and stays empty.
pub fn translate_shape(shape: &Shape, direction: Direction, pixels: i32) -> Shape {
    let Some(bounds) = shape.bounds() else {
        return Shape::empty();
    };
    let d = direction.normal() * f64::from(pixels);
    let [x0, y0, z0, x1, y1, z1] = bounds.to_pixels();
    Shape::from_pixels(x0 + d.x, y0 + d.y, z0 + d.z, x1 + d.x, y1 + d.y, z1 + d.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_inverts_orient_on_corners() {
        let probes = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.25, 0.5, 0.75),
            Vec3::new(1.0, 0.125, 0.5),
        ];
        for facing in Direction::ALL {
            for p in probes {
                assert_eq!(restore_point(orient_point(p, facing), facing), p, "{facing}");
            }
        }
    }

    #[test]
    fn quarter_turns_compose() {
        let p = Vec3::new(0.25, 0.5, 0.75);
        assert_eq!(rotate_x90(rotate_x90(p)), rotate_x180(p));
        assert_eq!(rotate_x90(rotate_x180(p)), rotate_x270(p));
        assert_eq!(rotate_y90(rotate_y90(p)), rotate_y180(p));
        assert_eq!(rotate_y90(rotate_y180(p)), rotate_y270(p));
    }
}
