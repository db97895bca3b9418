//! Canonical voxel shape storage.
//!
//! A shape keeps, per axis, the sorted list of planes where occupancy can
//! change, and one occupancy flag per cell between those planes. Shapes are
//! always stored compacted: outer empty slabs are trimmed and a plane is only
//! kept when the slabs on either side differ. Two shapes covering the same
//! volume therefore have identical storage, so `PartialEq` is volume equality.

use blockforge_geom::{Aabb, Vec3};

/// Cells per block edge for rasterizing operations such as flips.
pub const LATTICE: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BooleanOp {
    /// Union.
    Or,
    /// Intersection.
    And,
}

impl BooleanOp {
    #[inline]
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            BooleanOp::Or => a || b,
            BooleanOp::And => a && b,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    planes: [Vec<f64>; 3],
    cells: Vec<bool>,
}

#[inline]
fn cell_index(dims: [usize; 3], c: [usize; 3]) -> usize {
    (c[0] * dims[1] + c[1]) * dims[2] + c[2]
}

#[inline]
fn other_axes(axis: usize) -> (usize, usize) {
    match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

fn sorted_planes(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.into_iter().collect();
    out.sort_by(f64::total_cmp);
    out.dedup();
    out
}

/// Cell index range `[lo, hi)` covered by `min..max` on a plane list that
/// contains both values.
#[inline]
fn span(planes: &[f64], min: f64, max: f64) -> (usize, usize) {
    (
        planes.partition_point(|&p| p < min),
        planes.partition_point(|&p| p < max),
    )
}

/// For each cell of `merged` (a superset of `src`), the `src` cell holding
/// it, or `None` outside `src`. Cells are matched by their lower plane so
/// planes an ulp apart still land in the right cell.
fn source_cells(src: &[f64], merged: &[f64]) -> Vec<Option<usize>> {
    merged
        .windows(2)
        .map(|w| {
            let lo = w[0];
            match (src.first(), src.last()) {
                (Some(&first), Some(&last)) if first <= lo && lo < last => {
                    Some(src.partition_point(|&q| q <= lo) - 1)
                }
                _ => None,
            }
        })
        .collect()
}

impl Shape {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The whole block.
    pub fn full() -> Self {
        Self::from_box(Aabb::UNIT)
    }

    pub fn from_box(b: Aabb) -> Self {
        Self::from_boxes([b])
    }

    /// Single box from 0..16 pixel coordinates.
    pub fn from_pixels(x0: f64, y0: f64, z0: f64, x1: f64, y1: f64, z1: f64) -> Self {
        Self::from_box(Aabb::from_pixels(x0, y0, z0, x1, y1, z1))
    }

    /// Union of `boxes`. Boxes without volume are ignored.
    pub fn from_boxes(boxes: impl IntoIterator<Item = Aabb>) -> Self {
        let boxes: Vec<Aabb> = boxes.into_iter().filter(|b| !b.is_empty()).collect();
        if boxes.is_empty() {
            return Self::empty();
        }
        let planes: [Vec<f64>; 3] = std::array::from_fn(|axis| {
            sorted_planes(
                boxes
                    .iter()
                    .flat_map(|b| [b.min.to_array()[axis], b.max.to_array()[axis]]),
            )
        });
        let dims = planes.each_ref().map(|p| p.len() - 1);
        let mut cells = vec![false; dims.iter().product()];
        for b in &boxes {
            let (lo, hi) = (b.min.to_array(), b.max.to_array());
            let (x0, x1) = span(&planes[0], lo[0], hi[0]);
            let (y0, y1) = span(&planes[1], lo[1], hi[1]);
            let (z0, z1) = span(&planes[2], lo[2], hi[2]);
            for x in x0..x1 {
                for y in y0..y1 {
                    for z in z0..z1 {
                        cells[cell_index(dims, [x, y, z])] = true;
                    }
                }
            }
        }
        Shape { planes, cells }.compacted()
    }

    #[inline]
    fn dims(&self) -> [usize; 3] {
        self.planes.each_ref().map(|p| p.len().saturating_sub(1))
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    /// Bounding box of the occupied volume, `None` for an empty shape.
    pub fn bounds(&self) -> Option<Aabb> {
        let [xs, ys, zs] = &self.planes;
        let min = Vec3::new(*xs.first()?, *ys.first()?, *zs.first()?);
        let max = Vec3::new(*xs.last()?, *ys.last()?, *zs.last()?);
        Some(Aabb::new(min, max))
    }

    pub fn volume(&self) -> f64 {
        self.filled_cells().map(|c| c.volume()).sum()
    }

    fn cell_box(&self, c: [usize; 3]) -> Aabb {
        let [xs, ys, zs] = &self.planes;
        Aabb::new(
            Vec3::new(xs[c[0]], ys[c[1]], zs[c[2]]),
            Vec3::new(xs[c[0] + 1], ys[c[1] + 1], zs[c[2] + 1]),
        )
    }

    fn filled_cells(&self) -> impl Iterator<Item = Aabb> + '_ {
        let [nx, ny, nz] = self.dims();
        (0..nx)
            .flat_map(move |x| (0..ny).flat_map(move |y| (0..nz).map(move |z| [x, y, z])))
            .filter(move |&c| self.cells[cell_index([nx, ny, nz], c)])
            .map(move |c| self.cell_box(c))
    }

    /// Point occupancy over half-open cells: a point on a plane resolves to
    /// the cell on its positive side, so the maximum outer faces are outside.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.occupied_at(p.to_array())
    }

    fn occupied_at(&self, p: [f64; 3]) -> bool {
        if self.cells.is_empty() {
            return false;
        }
        let mut c = [0usize; 3];
        for axis in 0..3 {
            let planes = &self.planes[axis];
            let v = p[axis];
            if !(planes[0] <= v && v < planes[planes.len() - 1]) {
                return false;
            }
            c[axis] = planes.partition_point(|&q| q <= v) - 1;
        }
        self.cells[cell_index(self.dims(), c)]
    }

    fn cell_at(&self, c: [Option<usize>; 3]) -> bool {
        match c {
            [Some(x), Some(y), Some(z)] => self.cells[cell_index(self.dims(), [x, y, z])],
            _ => false,
        }
    }

    /// True when the shape and `b` share positive volume.
    pub fn intersects_box(&self, b: &Aabb) -> bool {
        self.filled_cells().any(|c| c.overlaps(b))
    }

    /// Boolean combination of two shapes.
    pub fn join(&self, other: &Shape, op: BooleanOp) -> Shape {
        match (op, self.is_empty(), other.is_empty()) {
            (BooleanOp::And, true, _) | (BooleanOp::And, _, true) => return Shape::empty(),
            (BooleanOp::Or, true, _) => return other.clone(),
            (BooleanOp::Or, _, true) => return self.clone(),
            _ => {}
        }
        let planes: [Vec<f64>; 3] = std::array::from_fn(|axis| {
            sorted_planes(
                self.planes[axis]
                    .iter()
                    .chain(other.planes[axis].iter())
                    .copied(),
            )
        });
        let dims = planes.each_ref().map(|p| p.len() - 1);
        let ours: [Vec<Option<usize>>; 3] =
            std::array::from_fn(|axis| source_cells(&self.planes[axis], &planes[axis]));
        let theirs: [Vec<Option<usize>>; 3] =
            std::array::from_fn(|axis| source_cells(&other.planes[axis], &planes[axis]));
        let mut cells = Vec::with_capacity(dims.iter().product());
        for x in 0..dims[0] {
            for y in 0..dims[1] {
                for z in 0..dims[2] {
                    let a = self.cell_at([ours[0][x], ours[1][y], ours[2][z]]);
                    let b = other.cell_at([theirs[0][x], theirs[1][y], theirs[2][z]]);
                    cells.push(op.apply(a, b));
                }
            }
        }
        Shape { planes, cells }.compacted()
    }

    /// Greedy decomposition into disjoint boxes: runs along Z, widened over Y,
    /// then stacked along X.
    pub fn to_boxes(&self) -> Vec<Aabb> {
        let d = self.dims();
        let mut used = vec![false; self.cells.len()];
        let free = |used: &[bool], c: [usize; 3]| {
            let i = cell_index(d, c);
            self.cells[i] && !used[i]
        };
        let mut out = Vec::new();
        for x in 0..d[0] {
            for y in 0..d[1] {
                for z in 0..d[2] {
                    if !free(&used, [x, y, z]) {
                        continue;
                    }
                    let mut z1 = z + 1;
                    while z1 < d[2] && free(&used, [x, y, z1]) {
                        z1 += 1;
                    }
                    let mut y1 = y + 1;
                    while y1 < d[1] && (z..z1).all(|zz| free(&used, [x, y1, zz])) {
                        y1 += 1;
                    }
                    let mut x1 = x + 1;
                    while x1 < d[0]
                        && (y..y1).all(|yy| (z..z1).all(|zz| free(&used, [x1, yy, zz])))
                    {
                        x1 += 1;
                    }
                    for xx in x..x1 {
                        for yy in y..y1 {
                            for zz in z..z1 {
                                used[cell_index(d, [xx, yy, zz])] = true;
                            }
                        }
                    }
                    let [xs, ys, zs] = &self.planes;
                    out.push(Aabb::new(
                        Vec3::new(xs[x], ys[y], zs[z]),
                        Vec3::new(xs[x1], ys[y1], zs[z1]),
                    ));
                }
            }
        }
        out
    }

    fn slab(&self, axis: usize, i: usize) -> impl Iterator<Item = bool> + '_ {
        let d = self.dims();
        let (u, v) = other_axes(axis);
        (0..d[u]).flat_map(move |a| {
            (0..d[v]).map(move |b| {
                let mut c = [0usize; 3];
                c[axis] = i;
                c[u] = a;
                c[v] = b;
                self.cells[cell_index(d, c)]
            })
        })
    }

    fn compacted(self) -> Shape {
        let mut shape = self;
        for axis in 0..3 {
            shape = shape.compact_axis(axis);
        }
        shape
    }

    fn compact_axis(&self, axis: usize) -> Shape {
        let n = self.dims()[axis];
        let occupied: Vec<usize> = (0..n).filter(|&i| self.slab(axis, i).any(|c| c)).collect();
        let (Some(&first), Some(&last)) = (occupied.first(), occupied.last()) else {
            return Shape::empty();
        };
        let src = &self.planes[axis];
        let mut keep = vec![first];
        let mut planes = vec![src[first]];
        let mut prev = first;
        for i in first + 1..=last {
            if !self.slab(axis, i).eq(self.slab(axis, prev)) {
                keep.push(i);
                planes.push(src[i]);
                prev = i;
            }
        }
        planes.push(src[last + 1]);
        self.resample(axis, &keep, planes)
    }

    /// Rebuild with only the slabs `keep` on `axis`, bounded by `planes`.
    fn resample(&self, axis: usize, keep: &[usize], planes: Vec<f64>) -> Shape {
        let old = self.dims();
        let mut dims = old;
        dims[axis] = keep.len();
        let mut cells = Vec::with_capacity(dims.iter().product());
        for x in 0..dims[0] {
            for y in 0..dims[1] {
                for z in 0..dims[2] {
                    let mut c = [x, y, z];
                    c[axis] = keep[c[axis]];
                    cells.push(self.cells[cell_index(old, c)]);
                }
            }
        }
        let mut all = self.planes.clone();
        all[axis] = planes;
        Shape { planes: all, cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_compact_to_one_cell() {
        let shape = Shape::from_boxes([
            Aabb::from_pixels(0.0, 0.0, 0.0, 16.0, 8.0, 16.0),
            Aabb::from_pixels(0.0, 8.0, 0.0, 16.0, 16.0, 16.0),
        ]);
        assert_eq!(shape, Shape::full());
        assert_eq!(shape.cells, vec![true]);
        assert_eq!(shape.planes, [vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn empty_boxes_are_dropped() {
        let flat = Aabb::from_pixels(0.0, 4.0, 0.0, 16.0, 4.0, 16.0);
        assert_eq!(Shape::from_box(flat), Shape::empty());
        assert!(Shape::empty().bounds().is_none());
    }

    #[test]
    fn outer_empty_slabs_are_trimmed() {
        let a = Shape::from_pixels(4.0, 4.0, 4.0, 8.0, 8.0, 8.0);
        let grown = a.join(&Shape::full(), BooleanOp::And);
        assert_eq!(grown, a);
        assert_eq!(grown.dims(), [1, 1, 1]);
    }

    #[test]
    fn l_shape_keeps_needed_planes() {
        let l = Shape::from_boxes([
            Aabb::from_pixels(0.0, 0.0, 0.0, 16.0, 8.0, 16.0),
            Aabb::from_pixels(0.0, 8.0, 0.0, 8.0, 16.0, 16.0),
        ]);
        assert_eq!(l.dims(), [2, 2, 1]);
        assert_eq!(l.cells, vec![true, true, true, false]);
        assert!((l.volume() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn point_lookup_uses_half_open_cells() {
        let slab = Shape::from_pixels(0.0, 0.0, 0.0, 16.0, 8.0, 16.0);
        assert!(slab.contains_point(Vec3::new(0.5, 0.25, 0.5)));
        assert!(slab.contains_point(Vec3::new(0.0, 0.0, 0.0)));
        assert!(!slab.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!slab.contains_point(Vec3::new(0.5, -0.1, 0.5)));
    }
}
