//! Offset coordinates, norms, and row-major index helpers.

use smallvec::{smallvec, SmallVec};

/// A signed offset or coordinate vector, one entry per axis.
///
/// `SmallVec<[i32; 4]>` keeps grids up to 4D on the stack.
pub type Coord = SmallVec<[i32; 4]>;

/// Unsigned per-axis extents of a grid, or an in-bounds grid index.
pub type Extents = SmallVec<[usize; 4]>;

/// Chebyshev (L-inf) norm: the largest absolute component.
pub fn chebyshev(c: &[i32]) -> u32 {
    c.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0)
}

/// Manhattan (L1) norm.
pub fn manhattan(c: &[i32]) -> u32 {
    c.iter().map(|v| v.unsigned_abs()).sum()
}

/// Squared Euclidean norm, exact in integers.
pub fn squared_euclidean(c: &[i32]) -> u64 {
    c.iter().map(|&v| (v as i64 * v as i64) as u64).sum()
}

/// Euclidean (L2) norm.
pub fn euclidean(c: &[i32]) -> f64 {
    (squared_euclidean(c) as f64).sqrt()
}

/// Total number of cells in a grid with the given extents.
pub fn cell_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Convert a row-major linear position into a multi-index, writing into `out`.
///
/// `out` must have the same length as `shape`. The last axis varies fastest.
pub fn unravel_into(mut linear: usize, shape: &[usize], out: &mut [usize]) {
    debug_assert_eq!(shape.len(), out.len());
    for axis in (0..shape.len()).rev() {
        let len = shape[axis];
        out[axis] = linear % len;
        linear /= len;
    }
}

/// Convert a row-major linear position into a multi-index.
pub fn unravel(linear: usize, shape: &[usize]) -> Extents {
    let mut out: Extents = smallvec![0; shape.len()];
    unravel_into(linear, shape, &mut out);
    out
}

/// Row-major strides (in elements) for a grid with the given extents.
pub fn row_major_strides(shape: &[usize]) -> SmallVec<[isize; 4]> {
    let mut strides: SmallVec<[isize; 4]> = smallvec![0; shape.len()];
    let mut acc = 1isize;
    for axis in (0..shape.len()).rev() {
        strides[axis] = acc;
        acc *= shape[axis] as isize;
    }
    strides
}

/// Iterator over every coordinate of an inclusive integer box, row-major.
///
/// Yields nothing if any axis has `lo > hi`, and nothing for zero axes.
#[derive(Clone, Debug)]
pub struct BoxIter {
    lo: Coord,
    hi: Coord,
    next: Option<Coord>,
}

impl BoxIter {
    /// Iterate over the box with per-axis inclusive bounds `lo[i]..=hi[i]`.
    pub fn new(lo: &[i32], hi: &[i32]) -> Self {
        debug_assert_eq!(lo.len(), hi.len());
        let empty = lo.is_empty() || lo.iter().zip(hi).any(|(l, h)| l > h);
        Self {
            lo: SmallVec::from_slice(lo),
            hi: SmallVec::from_slice(hi),
            next: (!empty).then(|| SmallVec::from_slice(lo)),
        }
    }

    /// Iterate over the cube `[-radius, radius]^ndims`.
    pub fn cube(radius: u32, ndims: usize) -> Self {
        let r = radius as i32;
        let lo: Coord = smallvec![-r; ndims];
        let hi: Coord = smallvec![r; ndims];
        Self::new(&lo, &hi)
    }
}

impl Iterator for BoxIter {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        let current = self.next.take()?;
        let mut succ = current.clone();
        for axis in (0..succ.len()).rev() {
            if succ[axis] < self.hi[axis] {
                succ[axis] += 1;
                self.next = Some(succ);
                return Some(current);
            }
            succ[axis] = self.lo[axis];
        }
        Some(current)
    }
}
