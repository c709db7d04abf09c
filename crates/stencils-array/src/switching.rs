//! Double-buffered stencil arrays for repeated passes.
//!
//! A [`SwitchingStencilArray`] holds two stencil arrays with identical
//! extents, stencil, boundary and padding. One plays the source role (all
//! reads), the other the destination role (the next pass writes into it).
//! [`switch`](SwitchingStencilArray::switch) flips the roles without
//! copying.
//!
//! ```text
//! slots[0]  ←── source (even passes) / dest (odd)
//! slots[1]  ←── dest (even passes) / source (odd)
//! ```

use ndarray::ArrayViewMutD;
use stencils_geometry::{Geometry, Neighborhood, Stencil};

use crate::array::StencilArray;

/// Two stencil arrays alternating between source and destination roles.
///
/// # Examples
///
/// ```
/// use ndarray::{ArrayD, IxDyn};
/// use stencils_array::{Boundary, Padding, StencilArray, SwitchingStencilArray};
/// use stencils_geometry::Geometry;
///
/// let grid = ArrayD::from_elem(IxDyn(&[4, 4]), 1.0f64);
/// let arr = StencilArray::new(grid, Geometry::moore(1, 2).unwrap(), Boundary::Wrap, Padding::Conditional)
///     .unwrap();
/// let mut sw = SwitchingStencilArray::new(arr);
///
/// sw.dest_mut().fill(2.0);
/// assert_eq!(sw.source().view()[IxDyn(&[0, 0])], 1.0);
/// sw.refresh_dest();
/// sw.switch();
/// assert_eq!(sw.source().view()[IxDyn(&[0, 0])], 2.0);
/// ```
#[derive(Clone, Debug)]
pub struct SwitchingStencilArray<T, S = Geometry> {
    slots: [StencilArray<T, S>; 2],
    /// Which slot currently plays the source role.
    source: usize,
}

impl<T: Clone, S: Stencil> SwitchingStencilArray<T, S> {
    /// Use `array` as the first source; the destination starts as a copy.
    pub fn new(array: StencilArray<T, S>) -> Self {
        let dest = array.clone();
        Self {
            slots: [array, dest],
            source: 0,
        }
    }

    /// The array currently read from.
    pub fn source(&self) -> &StencilArray<T, S> {
        &self.slots[self.source]
    }

    /// The array the next pass writes into.
    pub fn dest(&self) -> &StencilArray<T, S> {
        &self.slots[1 - self.source]
    }

    /// Index (0 or 1) of the slot in the source role.
    pub fn source_index(&self) -> usize {
        self.source
    }

    /// Mutable logical view of the destination grid.
    pub fn dest_mut(&mut self) -> ArrayViewMutD<'_, T> {
        self.slots[1 - self.source].view_mut()
    }

    /// Borrow the source for reading and the destination grid for writing
    /// at the same time.
    pub fn split(&mut self) -> (&StencilArray<T, S>, ArrayViewMutD<'_, T>) {
        let [first, second] = &mut self.slots;
        if self.source == 0 {
            (&*first, second.view_mut())
        } else {
            (&*second, first.view_mut())
        }
    }

    /// Recompute the destination's owned halo margin after writing.
    pub fn refresh_dest(&mut self) {
        self.slots[1 - self.source].update_boundary();
    }

    /// Swap the source and destination roles. No data is copied.
    pub fn switch(&mut self) {
        self.source = 1 - self.source;
    }

    /// Neighborhood of a source cell, or `None` outside the grid.
    pub fn stencil(&self, idx: &[usize]) -> Option<Neighborhood<'_, S, T>> {
        self.source().stencil(idx)
    }

    /// Extents of the logical grid.
    pub fn shape(&self) -> &[usize] {
        self.source().shape()
    }

    /// Consume the pair, keeping the source array.
    pub fn into_source(self) -> StencilArray<T, S> {
        let [first, second] = self.slots;
        if self.source == 0 {
            first
        } else {
            second
        }
    }
}
