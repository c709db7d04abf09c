//! A stencil positioned at one center, carrying the gathered values.

use std::fmt;
use std::iter::Sum;
use std::ops::Mul;

use num_traits::Zero;
use smallvec::SmallVec;
use stencils_core::coord::Coord;

use crate::layered::Layered;
use crate::stencil::{Stencil, Weighted};

/// Neighbor counts up to this size are gathered without heap allocation.
pub const INLINE_NEIGHBORS: usize = 32;

/// Storage for gathered neighbor values, in offset order.
pub type NeighborValues<T> = SmallVec<[T; INLINE_NEIGHBORS]>;

/// The values around one center cell, in the stencil's offset order.
///
/// This is what user functions receive during a traversal. Besides the
/// neighbor values it exposes the stencil's offsets and distances, named
/// access for named geometries, kernel weights for [`Weighted`] stencils
/// and per-layer views for [`Layered`] stencils.
///
/// # Examples
///
/// ```
/// use stencils_geometry::{Geometry, Neighborhood};
///
/// let g = Geometry::named([("left", [-1]), ("right", [1])]).unwrap();
/// let hood = Neighborhood::new(&g, 5, [4, 6].into_iter().collect());
/// assert_eq!(hood.by_name("right"), Some(&6));
/// assert_eq!(hood.sum(), 10);
/// ```
pub struct Neighborhood<'s, S, T> {
    stencil: &'s S,
    center: T,
    values: NeighborValues<T>,
}

impl<'s, S: Stencil, T> Neighborhood<'s, S, T> {
    /// Position `stencil` at a center holding `center`, with `values` in
    /// offset order.
    pub fn new(stencil: &'s S, center: T, values: NeighborValues<T>) -> Self {
        debug_assert_eq!(values.len(), stencil.len());
        Self {
            stencil,
            center,
            values,
        }
    }

    /// The stencil this neighborhood was gathered with.
    pub fn stencil(&self) -> &'s S {
        self.stencil
    }

    /// Value at the center cell.
    pub fn center(&self) -> &T {
        &self.center
    }

    /// Neighbor values in offset order.
    pub fn neighbors(&self) -> &[T] {
        &self.values
    }

    /// Neighbor value at offset position `i`.
    pub fn get(&self, i: usize) -> Option<&T> {
        self.values.get(i)
    }

    /// Neighbor value for a named offset.
    pub fn by_name(&self, name: &str) -> Option<&T> {
        self.values.get(self.stencil.position(name)?)
    }

    /// The stencil's offsets.
    pub fn offsets(&self) -> &'s [Coord] {
        self.stencil.offsets()
    }

    /// Euclidean distance of each offset.
    pub fn distances(&self) -> &'s [f64] {
        self.stencil.distances()
    }

    /// Number of neighbor values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` for a stencil without offsets.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(offset, value)` pairs in offset order.
    pub fn iter(&self) -> impl Iterator<Item = (&'s Coord, &T)> + '_ {
        self.stencil.offsets().iter().zip(self.values.iter())
    }

    /// Consume the neighborhood, returning the neighbor values.
    pub fn into_values(self) -> NeighborValues<T> {
        self.values
    }

    /// The same stencil and center around different values.
    ///
    /// Returns `None` unless exactly one value per offset is supplied.
    pub fn rebuild(&self, values: impl IntoIterator<Item = T>) -> Option<Self>
    where
        T: Clone,
    {
        let values: NeighborValues<T> = values.into_iter().collect();
        (values.len() == self.stencil.len()).then(|| Self {
            stencil: self.stencil,
            center: self.center.clone(),
            values,
        })
    }

    /// Apply `f` to the center and every neighbor value.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Neighborhood<'s, S, U> {
        Neighborhood {
            stencil: self.stencil,
            center: f(&self.center),
            values: self.values.iter().map(f).collect(),
        }
    }

    /// Sum of the neighbor values, center excluded.
    pub fn sum(&self) -> T
    where
        T: Clone + Sum<T>,
    {
        self.values.iter().cloned().sum()
    }
}

impl<'s, S: Weighted, T> Neighborhood<'s, S, T> {
    /// The stencil's weights, parallel to [`neighbors`](Self::neighbors).
    pub fn kernel(&self) -> &'s [S::Weight] {
        self.stencil.weights()
    }

    /// `Σ neighbors[i] * weights[i]`, see [`kernel_product`].
    pub fn kernel_product(&self) -> T
    where
        T: Clone + Zero + Mul<S::Weight, Output = T>,
        S::Weight: Clone,
    {
        dot(&self.values, self.stencil.weights())
    }
}

impl<'s, L: Stencil, T: Clone> Neighborhood<'s, Layered<L>, T> {
    /// The values gathered by layer `i`, as that layer's own neighborhood.
    pub fn layer(&self, i: usize) -> Option<Neighborhood<'s, L, T>> {
        let stencil = self.stencil.layer(i)?;
        let span = self.stencil.span(i)?;
        Some(Neighborhood {
            stencil,
            center: self.center.clone(),
            values: self.values[span].iter().cloned().collect(),
        })
    }

    /// The values gathered by a named layer.
    pub fn layer_named(&self, name: &str) -> Option<Neighborhood<'s, L, T>> {
        self.layer(self.stencil.layer_index(name)?)
    }

    /// One neighborhood per layer, in layer order.
    pub fn layers(&self) -> impl Iterator<Item = Neighborhood<'s, L, T>> + '_ {
        (0..self.stencil.layer_count()).filter_map(move |i| self.layer(i))
    }
}

/// Weighted sum of a neighborhood: `Σ neighbors[i] * weights[i]` in offset
/// order.
///
/// The accumulator starts at `T::zero()`. For a constant neighborhood of
/// value `v` the result is `v * Σ weights`.
pub fn kernel_product<S, T>(hood: &Neighborhood<'_, S, T>) -> T
where
    S: Weighted,
    S::Weight: Clone,
    T: Clone + Zero + Mul<S::Weight, Output = T>,
{
    hood.kernel_product()
}

/// `Σ values[i] * weights[i]` over the shorter of the two slices.
pub fn dot<T, W>(values: &[T], weights: &[W]) -> T
where
    T: Clone + Zero + Mul<W, Output = T>,
    W: Clone,
{
    values
        .iter()
        .zip(weights)
        .fold(T::zero(), |acc, (v, w)| acc + v.clone() * w.clone())
}

impl<S, T: fmt::Debug> fmt::Debug for Neighborhood<'_, S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neighborhood")
            .field("center", &self.center)
            .field("values", &self.values.as_slice())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Geometry, Kernel};
    use proptest::prelude::*;

    fn values<T: Clone>(v: &[T]) -> NeighborValues<T> {
        v.iter().cloned().collect()
    }

    // ── Access ──────────────────────────────────────────────────

    #[test]
    fn positional_access() {
        let g = Geometry::von_neumann(1, 2).unwrap();
        let hood = Neighborhood::new(&g, 0, values(&[1, 2, 3, 4]));
        assert_eq!(hood.len(), 4);
        assert_eq!(hood.get(2), Some(&3));
        assert_eq!(hood.get(4), None);
        assert_eq!(hood.by_name("north"), None);
        let (first_offset, first_value) = hood.iter().next().unwrap();
        assert_eq!(first_offset.as_slice(), &[-1, 0]);
        assert_eq!(*first_value, 1);
    }

    #[test]
    fn rebuild_requires_matching_count() {
        let g = Geometry::cardinal(1, 1).unwrap();
        let hood = Neighborhood::new(&g, 7, values(&[1, 2]));
        let rebuilt = hood.rebuild([10, 20]).unwrap();
        assert_eq!(rebuilt.neighbors(), &[10, 20]);
        assert_eq!(*rebuilt.center(), 7);
        assert!(hood.rebuild([1]).is_none());
    }

    #[test]
    fn map_transforms_center_and_values() {
        let g = Geometry::cardinal(1, 1).unwrap();
        let hood = Neighborhood::new(&g, 3, values(&[1, 2]));
        let doubled = hood.map(|v| f64::from(*v) * 2.0);
        assert_eq!(*doubled.center(), 6.0);
        assert_eq!(doubled.neighbors(), &[2.0, 4.0]);
    }

    // ── Kernels ─────────────────────────────────────────────────

    #[test]
    fn kernel_product_weights_in_offset_order() {
        let k = Kernel::new(Geometry::window(1, 1).unwrap(), vec![1.0, -2.0, 3.0]).unwrap();
        let hood = Neighborhood::new(&k, 0.0, values(&[1.0, 10.0, 100.0]));
        assert_eq!(hood.kernel(), &[1.0, -2.0, 3.0]);
        assert_eq!(kernel_product(&hood), 1.0 - 20.0 + 300.0);
    }

    #[test]
    fn dot_of_empty_is_zero() {
        let none: [i32; 0] = [];
        assert_eq!(dot(&none, &none), 0);
    }

    // ── Layers ──────────────────────────────────────────────────

    #[test]
    fn layers_split_values() {
        let l = Layered::named([
            ("h", Geometry::horizontal(1, 2).unwrap()),
            ("c", Geometry::cardinal(1, 2).unwrap()),
        ])
        .unwrap();
        let hood = Neighborhood::new(&l, 0, values(&[1, 2, 3, 4, 5, 6, 7]));
        let h = hood.layer(0).unwrap();
        assert_eq!(h.neighbors(), &[1, 2, 3]);
        let c = hood.layer_named("c").unwrap();
        assert_eq!(c.neighbors(), &[4, 5, 6, 7]);
        assert_eq!(c.offsets().len(), 4);
        assert!(hood.layer(2).is_none());
        assert_eq!(hood.layers().count(), 2);
    }

    proptest! {
        #[test]
        fn constant_kernel_product_is_value_times_weight_sum(
            v in -1000i64..1000,
            weights in prop::collection::vec(-50i64..50, 3..=3),
        ) {
            let k = Kernel::new(Geometry::window(1, 1).unwrap(), weights.clone()).unwrap();
            let hood = Neighborhood::new(&k, v, values(&[v, v, v]));
            prop_assert_eq!(hood.kernel_product(), v * weights.iter().sum::<i64>());
        }
    }
}
