//! Index arithmetic shared by every stencil array.

use smallvec::SmallVec;
use stencils_core::coord::{self, Coord, Extents};

use crate::boundary::{reflect_axis, wrap_axis, Boundary};

/// How out-of-grid neighbors are answered once the pairing rules have
/// excluded `Use`.
#[derive(Clone, Debug)]
pub(crate) enum Edge<T> {
    Pad(T),
    Wrap,
    Reflect,
}

impl<T: Clone> Edge<T> {
    /// `None` for `Use`, which has no in-grid answer.
    pub(crate) fn of(boundary: &Boundary<T>) -> Option<Self> {
        match boundary {
            Boundary::Remove(pad) => Some(Self::Pad(pad.clone())),
            Boundary::Wrap => Some(Self::Wrap),
            Boundary::Reflect => Some(Self::Reflect),
            Boundary::Use => None,
        }
    }
}

impl<T> Edge<T> {
    /// Resolve a raw logical coordinate.
    ///
    /// Writes the in-grid index into `out` and returns `None`, or returns
    /// the pad value when a `Remove` boundary leaves the coordinate outside.
    /// Every axis of `logical` must be non-empty.
    pub(crate) fn locate<'a>(
        &'a self,
        raw: &[i32],
        logical: &[usize],
        out: &mut [usize],
    ) -> Option<&'a T> {
        for (axis, (&v, &len)) in raw.iter().zip(logical).enumerate() {
            out[axis] = if v >= 0 && (v as usize) < len {
                v as usize
            } else {
                match self {
                    Self::Pad(pad) => return Some(pad),
                    Self::Wrap => wrap_axis(v, len),
                    Self::Reflect => reflect_axis(v, len),
                }
            };
        }
        None
    }
}

/// Read strategy fixed at construction.
#[derive(Clone, Debug)]
pub(crate) enum Mode<T> {
    /// No margin; cells near the edge resolve each neighbor.
    Conditional(Edge<T>),
    /// A margin surrounds the grid. `refill` is set when the array owns the
    /// margin and can recompute it.
    Halo { refill: Option<Edge<T>> },
}

/// Logical and backing geometry of a stencil array's buffer.
#[derive(Clone, Debug)]
pub(crate) struct Layout {
    pub(crate) logical: Extents,
    pub(crate) backing: Extents,
    /// Halo width; 0 without a halo.
    pub(crate) width: usize,
    /// Stencil radius.
    pub(crate) radius: usize,
    /// Row-major strides of the backing buffer.
    pub(crate) strides: SmallVec<[isize; 4]>,
    /// Linear displacement of each offset inside the backing buffer.
    pub(crate) deltas: Vec<isize>,
}

impl Layout {
    pub(crate) fn new(logical: Extents, width: usize, radius: usize, offsets: &[Coord]) -> Self {
        let backing: Extents = logical.iter().map(|&len| len + 2 * width).collect();
        let strides = coord::row_major_strides(&backing);
        let deltas = offsets
            .iter()
            .map(|o| o.iter().zip(&strides).map(|(&d, &s)| d as isize * s).sum())
            .collect();
        Self {
            logical,
            backing,
            width,
            radius,
            strides,
            deltas,
        }
    }

    pub(crate) fn ndim(&self) -> usize {
        self.logical.len()
    }

    /// Backing position of logical index `idx`.
    pub(crate) fn base(&self, idx: &[usize]) -> usize {
        idx.iter()
            .zip(&self.strides)
            .map(|(&i, &s)| (i + self.width) * s as usize)
            .sum()
    }

    /// Whether `idx` lies inside the logical grid.
    pub(crate) fn contains(&self, idx: &[usize]) -> bool {
        idx.len() == self.ndim() && idx.iter().zip(&self.logical).all(|(&i, &len)| i < len)
    }

    /// Whether every neighbor of `idx` lies inside the logical grid.
    pub(crate) fn is_interior(&self, idx: &[usize]) -> bool {
        let r = self.radius;
        idx.iter()
            .zip(&self.logical)
            .all(|(&i, &len)| i >= r && i + r < len)
    }

    /// Backing position of a raw logical coordinate lying in the grid or
    /// its margin.
    pub(crate) fn margin_base(&self, raw: &[i32]) -> Option<usize> {
        let w = self.width as i64;
        let mut linear = 0usize;
        for ((&v, &len), &stride) in raw.iter().zip(&self.logical).zip(&self.strides) {
            let shifted = i64::from(v) + w;
            if shifted < 0 || shifted >= len as i64 + 2 * w {
                return None;
            }
            linear += shifted as usize * stride as usize;
        }
        Some(linear)
    }

    /// Whether backing index `idx` lies in the margin.
    pub(crate) fn in_margin(&self, backing_idx: &[usize]) -> bool {
        let w = self.width;
        backing_idx
            .iter()
            .zip(&self.logical)
            .any(|(&i, &len)| i < w || i >= w + len)
    }
}
