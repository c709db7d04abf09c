//! Mapping passes over double-buffered arrays.

use stencils_array::SwitchingStencilArray;
use stencils_core::MapError;
use stencils_geometry::{Neighborhood, Stencil};

use crate::auxiliary::AuxArrays;
use crate::map::Mapper;

/// Repeated stencil passes on a [`SwitchingStencilArray`].
///
/// Each pass reads the source buffer, writes the destination buffer,
/// refreshes an owned halo margin and switches roles. The array is taken by
/// value and returned switched.
///
/// # Examples
///
/// ```
/// use ndarray::{ArrayD, IxDyn};
/// use stencils_array::{Boundary, Halo, StencilArray, SwitchingStencilArray};
/// use stencils_engine::MapSwitching;
/// use stencils_geometry::Geometry;
///
/// let grid = ArrayD::from_shape_fn(IxDyn(&[1, 6]), |i| i[1] as f64);
/// let arr = StencilArray::new(grid, Geometry::window(1, 2).unwrap(), Boundary::Reflect, Halo::outer().into())
///     .unwrap();
///
/// let mut sw = SwitchingStencilArray::new(arr);
/// for _ in 0..50 {
///     sw = sw.map_stencil(|hood| hood.sum() / hood.len() as f64);
/// }
/// let spread = sw.source().view().iter().fold(0.0f64, |m, &v| m.max((v - 2.5).abs()));
/// assert!(spread < 0.5);
/// ```
pub trait MapSwitching: Sized {
    /// Element type of the grids.
    type Elem;
    /// Stencil used for gathering.
    type Stencil;

    /// One pass with the default [`Mapper`].
    fn map_stencil<F>(self, f: F) -> Self
    where
        F: Fn(Neighborhood<'_, Self::Stencil, Self::Elem>) -> Self::Elem + Sync + Send;

    /// One pass with auxiliary arrays.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` or `SizeMismatch` if an auxiliary array does not
    /// have the grid's logical shape. The array is dropped in that case.
    fn map_stencil_with<X, F>(self, f: F, aux: X) -> Result<Self, MapError>
    where
        X: AuxArrays,
        F: Fn(Neighborhood<'_, Self::Stencil, Self::Elem>, X::Item) -> Self::Elem + Sync + Send;
}

impl<T, S> MapSwitching for SwitchingStencilArray<T, S>
where
    T: Clone + Send + Sync,
    S: Stencil,
{
    type Elem = T;
    type Stencil = S;

    fn map_stencil<F>(self, f: F) -> Self
    where
        F: Fn(Neighborhood<'_, S, T>) -> T + Sync + Send,
    {
        Mapper::default().step(f, self)
    }

    fn map_stencil_with<X, F>(self, f: F, aux: X) -> Result<Self, MapError>
    where
        X: AuxArrays,
        F: Fn(Neighborhood<'_, S, T>, X::Item) -> T + Sync + Send,
    {
        Mapper::default().step_with(f, self, aux)
    }
}
