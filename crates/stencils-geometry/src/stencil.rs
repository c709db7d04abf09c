//! The `Stencil` capability trait.

use stencils_core::coord::{self, Coord};

/// Minimal capability set shared by every stencil type.
///
/// Stencil arrays and the mapping engine are written against this trait,
/// so [`Geometry`](crate::Geometry), [`Kernel`](crate::Kernel) and
/// [`Layered`](crate::Layered) are interchangeable wherever a stencil is
/// expected.
///
/// # Thread Safety
///
/// `Send + Sync` is required because one stencil is shared read-only by
/// every worker of a parallel traversal. `Clone` must be cheap: the
/// concrete types keep their offset tables behind an `Arc`.
pub trait Stencil: Clone + Send + Sync {
    /// Number of spatial dimensions of every offset.
    fn ndims(&self) -> usize;

    /// Largest absolute offset component (Chebyshev radius).
    ///
    /// This is the halo width needed to keep every neighbor read in bounds.
    fn radius(&self) -> u32;

    /// Offsets relative to the center, in the stencil's canonical order.
    fn offsets(&self) -> &[Coord];

    /// Euclidean distance of each offset from the center.
    fn distances(&self) -> &[f64];

    /// Integer zone per offset; offsets at equal distance share a zone.
    ///
    /// Zones are numbered by ascending distance starting at 0.
    fn distance_zones(&self) -> &[usize];

    /// Number of offsets.
    fn len(&self) -> usize {
        self.offsets().len()
    }

    /// `true` if the stencil has no offsets.
    fn is_empty(&self) -> bool {
        self.offsets().is_empty()
    }

    /// Width of the bounding cube: `2R + 1`.
    fn diameter(&self) -> u32 {
        2 * self.radius() + 1
    }

    /// Position of a named offset, for stencils that carry names.
    fn position(&self, _name: &str) -> Option<usize> {
        None
    }
}

/// A stencil carrying one weight per offset.
pub trait Weighted: Stencil {
    /// Weight element type.
    type Weight;

    /// Weights in offset order.
    fn weights(&self) -> &[Self::Weight];
}

/// Derived per-offset tables: Euclidean distances and distance zones.
pub(crate) fn derive_tables(offsets: &[Coord]) -> (Vec<f64>, Vec<usize>) {
    let distances = offsets.iter().map(|o| coord::euclidean(o)).collect();

    let squared: Vec<u64> = offsets.iter().map(|o| coord::squared_euclidean(o)).collect();
    let mut distinct = squared.clone();
    distinct.sort_unstable();
    distinct.dedup();
    let zones = squared
        .iter()
        .map(|sq| distinct.partition_point(|d| d < sq))
        .collect();

    (distances, zones)
}

/// Chebyshev radius of an offset table.
pub(crate) fn radius_of(offsets: &[Coord]) -> u32 {
    offsets.iter().map(|o| coord::chebyshev(o)).max().unwrap_or(0)
}
