//! The read interface the mapping engine is written against.

use stencils_geometry::{Neighborhood, Stencil};

use crate::array::StencilArray;
use crate::switching::SwitchingStencilArray;

/// Anything that can hand out the neighborhood of a logical grid cell.
///
/// Implemented by [`StencilArray`] and by [`SwitchingStencilArray`] (which
/// reads its current source buffer).
pub trait StencilSource {
    /// Element type of the grid.
    type Elem: Clone;
    /// Stencil used for gathering.
    type Stencil: Stencil;

    /// The stencil.
    fn descriptor(&self) -> &Self::Stencil;

    /// Extents of the logical grid.
    fn shape(&self) -> &[usize];

    /// Halo margin width of the backing buffer; 0 without a halo.
    fn halo_width(&self) -> u32;

    /// Neighborhood of a cell of the logical grid. `idx` is not checked.
    fn neighborhood(&self, idx: &[usize]) -> Neighborhood<'_, Self::Stencil, Self::Elem>;
}

impl<T: Clone, S: Stencil> StencilSource for StencilArray<T, S> {
    type Elem = T;
    type Stencil = S;

    fn descriptor(&self) -> &S {
        StencilArray::descriptor(self)
    }

    fn shape(&self) -> &[usize] {
        StencilArray::shape(self)
    }

    fn halo_width(&self) -> u32 {
        StencilArray::halo_width(self)
    }

    fn neighborhood(&self, idx: &[usize]) -> Neighborhood<'_, S, T> {
        self.stencil_unchecked(idx)
    }
}

impl<T: Clone, S: Stencil> StencilSource for SwitchingStencilArray<T, S> {
    type Elem = T;
    type Stencil = S;

    fn descriptor(&self) -> &S {
        self.source().descriptor()
    }

    fn shape(&self) -> &[usize] {
        self.source().shape()
    }

    fn halo_width(&self) -> u32 {
        self.source().halo_width()
    }

    fn neighborhood(&self, idx: &[usize]) -> Neighborhood<'_, S, T> {
        self.source().stencil_unchecked(idx)
    }
}
