//! The traversal: apply a function to the neighborhood of every cell.
//!
//! Every pass visits each center once and writes exactly one output cell.
//! Centers are independent, so the linear index range is split across
//! rayon workers when [`MapConfig::runs_parallel`] allows it; each worker
//! unravels its indices to row-major centers and the results are gathered
//! in index order, so they do not depend on the split.
//!
//! # Destination sizing
//!
//! `map_into` accepts three destination extents, checked in this order:
//!
//! | Destination extents | Centers visited | Written cell |
//! |---------------------|-----------------|--------------|
//! | logical `L` | all | `dest[I]` |
//! | backing `L + 2w` (halo sources) | all | `dest[I + w]`, margin untouched |
//! | shrunk `L - 2R` | those whose stencil fits | `dest[I - R]` |
//!
//! Anything else is rejected before any cell is written.

use ndarray::{ArrayD, ArrayViewMutD, Dimension, IxDyn, Slice};
use rayon::prelude::*;
use stencils_array::{Boundary, Padding, StencilArray, StencilSource, SwitchingStencilArray};
use stencils_core::coord::{self, Extents};
use stencils_core::{MapError, StencilError};
use stencils_geometry::{Neighborhood, Stencil};

use crate::auxiliary::AuxArrays;
use crate::config::MapConfig;

/// How destination indices relate to source centers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DestFit {
    /// Same extents as the logical source grid.
    Logical,
    /// Extents of the halo backing buffer; write inside the margin of
    /// this width.
    Backing(usize),
    /// Logical extents minus `2R`; centers are shifted by `R`.
    Shrunk(usize),
}

fn fit_dest(
    logical: &[usize],
    halo: usize,
    radius: usize,
    dest: &[usize],
) -> Result<DestFit, MapError> {
    if dest.len() != logical.len() {
        return Err(MapError::DimensionMismatch {
            array: "dest".into(),
            expected: logical.len(),
            got: dest.len(),
        });
    }
    if dest == logical {
        return Ok(DestFit::Logical);
    }
    if halo > 0 && dest.iter().zip(logical).all(|(&d, &l)| d == l + 2 * halo) {
        return Ok(DestFit::Backing(halo));
    }
    let shrunk = dest
        .iter()
        .zip(logical)
        .all(|(&d, &l)| l.checked_sub(2 * radius) == Some(d));
    if shrunk {
        return Ok(DestFit::Shrunk(radius));
    }

    let mut accepted = format!("{logical:?} (logical)");
    if halo > 0 {
        let backing: Vec<usize> = logical.iter().map(|&l| l + 2 * halo).collect();
        accepted.push_str(&format!(", {backing:?} (halo backing)"));
    }
    if logical.iter().all(|&l| l >= 2 * radius) {
        let inner: Vec<usize> = logical.iter().map(|&l| l - 2 * radius).collect();
        accepted.push_str(&format!(" or {inner:?} (shrunk by radius {radius})"));
    }
    Err(MapError::SizeMismatch {
        array: "dest".into(),
        expected: accepted,
        got: dest.to_vec(),
    })
}

/// Runs mapping passes under a [`MapConfig`].
///
/// # Examples
///
/// ```
/// use ndarray::{ArrayD, IxDyn};
/// use stencils_array::{Boundary, Padding, StencilArray};
/// use stencils_engine::{MapConfig, Mapper};
/// use stencils_geometry::Geometry;
///
/// let grid = ArrayD::from_elem(IxDyn(&[8, 8]), 1.0f64);
/// let arr = StencilArray::new(grid, Geometry::moore(1, 2).unwrap(), Boundary::Remove(0.0), Padding::Conditional)
///     .unwrap();
///
/// let counts = Mapper::new(MapConfig::sequential()).map(|hood| hood.sum(), &arr);
/// assert_eq!(counts[IxDyn(&[0, 0])], 3.0);
/// assert_eq!(counts[IxDyn(&[4, 4])], 8.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Mapper {
    config: MapConfig,
}

impl Mapper {
    /// A mapper with the given configuration.
    pub fn new(config: MapConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Allocate a grid of the source's logical extents holding `f` of every
    /// neighborhood.
    pub fn map<A, U, F>(&self, f: F, source: &A) -> ArrayD<U>
    where
        A: StencilSource + Sync,
        U: Send,
        F: Fn(Neighborhood<'_, A::Stencil, A::Elem>) -> U + Sync + Send,
    {
        self.collect::<A, (), U, _>(&|hood, ()| f(hood), source, &())
    }

    /// As [`map`](Self::map), also passing the elements of `aux` at each
    /// center.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` or `SizeMismatch` if an auxiliary array does
    /// not have the source's logical shape.
    pub fn map_with<A, X, U, F>(&self, f: F, source: &A, aux: X) -> Result<ArrayD<U>, MapError>
    where
        A: StencilSource + Sync,
        X: AuxArrays,
        U: Send,
        F: Fn(Neighborhood<'_, A::Stencil, A::Elem>, X::Item) -> U + Sync + Send,
    {
        aux.check(source.shape())?;
        Ok(self.collect(&f, source, &aux))
    }

    /// Wrap `grid` in a [`StencilArray`] and map over it in one call.
    ///
    /// `f` receives the neighborhood and the elements of `aux`; pass `()`
    /// for no auxiliary arrays.
    ///
    /// # Errors
    ///
    /// `StencilError::Array` if the array cannot be built,
    /// `StencilError::Map` if an auxiliary array does not fit.
    pub fn map_on<T, S, X, U, F>(
        &self,
        f: F,
        stencil: S,
        grid: ArrayD<T>,
        boundary: Boundary<T>,
        padding: Padding,
        aux: X,
    ) -> Result<ArrayD<U>, StencilError>
    where
        T: Clone + Send + Sync,
        S: Stencil,
        X: AuxArrays,
        U: Send,
        F: Fn(Neighborhood<'_, S, T>, X::Item) -> U + Sync + Send,
    {
        let array = StencilArray::new(grid, stencil, boundary, padding)?;
        Ok(self.map_with(f, &array, aux)?)
    }

    /// Write `f` of every neighborhood into `dest`.
    ///
    /// See the module documentation for the accepted destination extents.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` or `SizeMismatch` for an unusable destination;
    /// nothing is written.
    pub fn map_into<A, U, F>(
        &self,
        f: F,
        dest: ArrayViewMutD<'_, U>,
        source: &A,
    ) -> Result<(), MapError>
    where
        A: StencilSource + Sync,
        U: Send,
        F: Fn(Neighborhood<'_, A::Stencil, A::Elem>) -> U + Sync + Send,
    {
        self.map_into_with::<A, (), U, _>(|hood, ()| f(hood), dest, source, ())
    }

    /// As [`map_into`](Self::map_into), also passing the elements of `aux`
    /// at each center.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` or `SizeMismatch` for an unusable destination or
    /// auxiliary array; nothing is written.
    pub fn map_into_with<A, X, U, F>(
        &self,
        f: F,
        mut dest: ArrayViewMutD<'_, U>,
        source: &A,
        aux: X,
    ) -> Result<(), MapError>
    where
        A: StencilSource + Sync,
        X: AuxArrays,
        U: Send,
        F: Fn(Neighborhood<'_, A::Stencil, A::Elem>, X::Item) -> U + Sync + Send,
    {
        let fit = fit_dest(
            source.shape(),
            source.halo_width() as usize,
            source.descriptor().radius() as usize,
            dest.shape(),
        )?;
        aux.check(source.shape())?;
        match fit {
            DestFit::Logical => self.fill(&f, dest, source, &aux, 0),
            DestFit::Backing(w) => {
                let interior = dest.slice_each_axis_mut(|ax| Slice::from(w..ax.len - w));
                self.fill(&f, interior, source, &aux, 0)
            }
            DestFit::Shrunk(r) => self.fill(&f, dest.view_mut(), source, &aux, r),
        }
        Ok(())
    }

    /// Apply `f` to every source neighborhood, write the results into the
    /// destination buffer, refresh its halo margin and switch roles.
    ///
    /// The array is consumed and returned switched, so no binding can keep
    /// reading the previous source.
    pub fn step<T, S, F>(&self, f: F, array: SwitchingStencilArray<T, S>) -> SwitchingStencilArray<T, S>
    where
        T: Clone + Send + Sync,
        S: Stencil,
        F: Fn(Neighborhood<'_, S, T>) -> T + Sync + Send,
    {
        self.finish_step::<T, S, (), _>(&|hood, ()| f(hood), array, &())
    }

    /// As [`step`](Self::step), also passing the elements of `aux` at each
    /// center.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` or `SizeMismatch` if an auxiliary array does not
    /// have the grid's logical shape. The array is dropped in that case.
    pub fn step_with<T, S, X, F>(
        &self,
        f: F,
        array: SwitchingStencilArray<T, S>,
        aux: X,
    ) -> Result<SwitchingStencilArray<T, S>, MapError>
    where
        T: Clone + Send + Sync,
        S: Stencil,
        X: AuxArrays,
        F: Fn(Neighborhood<'_, S, T>, X::Item) -> T + Sync + Send,
    {
        aux.check(array.shape())?;
        Ok(self.finish_step(&f, array, &aux))
    }

    fn finish_step<T, S, X, F>(
        &self,
        f: &F,
        mut array: SwitchingStencilArray<T, S>,
        aux: &X,
    ) -> SwitchingStencilArray<T, S>
    where
        T: Clone + Send + Sync,
        S: Stencil,
        X: AuxArrays,
        F: Fn(Neighborhood<'_, S, T>, X::Item) -> T + Sync + Send,
    {
        {
            let (source, dest) = array.split();
            self.fill(f, dest, source, aux, 0);
        }
        array.refresh_dest();
        array.switch();
        array
    }

    fn collect<A, X, U, F>(&self, f: &F, source: &A, aux: &X) -> ArrayD<U>
    where
        A: StencilSource + Sync,
        X: AuxArrays,
        U: Send,
        F: Fn(Neighborhood<'_, A::Stencil, A::Elem>, X::Item) -> U + Sync + Send,
    {
        let shape = source.shape();
        let parallel = self.announce(coord::cell_count(shape));
        let values = self.evaluate(f, source, aux, shape, 0, parallel);
        ArrayD::from_shape_vec(IxDyn(shape), values).expect("one value per logical cell")
    }

    /// Write one value per cell of `region`, reading the center at
    /// `region index + shift` on every axis.
    fn fill<A, X, U, F>(&self, f: &F, mut region: ArrayViewMutD<'_, U>, source: &A, aux: &X, shift: usize)
    where
        A: StencilSource + Sync,
        X: AuxArrays,
        U: Send,
        F: Fn(Neighborhood<'_, A::Stencil, A::Elem>, X::Item) -> U + Sync + Send,
    {
        if self.announce(region.len()) {
            let extents: Extents = region.shape().iter().copied().collect();
            let values = self.evaluate(f, source, aux, &extents, shift, true);
            // Both sides run in logical row-major order.
            for (out, value) in region.iter_mut().zip(values) {
                *out = value;
            }
        } else {
            let mut center = Extents::from_elem(0, region.ndim());
            for (idx, out) in region.indexed_iter_mut() {
                for (c, &i) in center.iter_mut().zip(idx.slice()) {
                    *c = i + shift;
                }
                *out = f(source.neighborhood(&center), aux.at(&center));
            }
        }
    }

    /// `f` at every center of a `region`-shaped block offset by `shift`,
    /// in row-major order.
    fn evaluate<A, X, U, F>(
        &self,
        f: &F,
        source: &A,
        aux: &X,
        region: &[usize],
        shift: usize,
        parallel: bool,
    ) -> Vec<U>
    where
        A: StencilSource + Sync,
        X: AuxArrays,
        U: Send,
        F: Fn(Neighborhood<'_, A::Stencil, A::Elem>, X::Item) -> U + Sync + Send,
    {
        let visit = |linear: usize| {
            let mut center = coord::unravel(linear, region);
            for c in center.iter_mut() {
                *c += shift;
            }
            f(source.neighborhood(&center), aux.at(&center))
        };
        let cells = coord::cell_count(region);
        if parallel {
            (0..cells).into_par_iter().map(visit).collect()
        } else {
            (0..cells).map(visit).collect()
        }
    }

    fn announce(&self, cells: usize) -> bool {
        let parallel = self.config.runs_parallel(cells);
        log::debug!(
            "stencil pass over {cells} cells ({})",
            if parallel { "parallel" } else { "sequential" }
        );
        parallel
    }
}

/// [`Mapper::map`] with the default configuration.
pub fn map_stencil<A, U, F>(f: F, source: &A) -> ArrayD<U>
where
    A: StencilSource + Sync,
    U: Send,
    F: Fn(Neighborhood<'_, A::Stencil, A::Elem>) -> U + Sync + Send,
{
    Mapper::default().map(f, source)
}

/// [`Mapper::map_with`] with the default configuration.
pub fn map_stencil_with<A, X, U, F>(f: F, source: &A, aux: X) -> Result<ArrayD<U>, MapError>
where
    A: StencilSource + Sync,
    X: AuxArrays,
    U: Send,
    F: Fn(Neighborhood<'_, A::Stencil, A::Elem>, X::Item) -> U + Sync + Send,
{
    Mapper::default().map_with(f, source, aux)
}

/// [`Mapper::map_on`] with the default configuration.
///
/// # Examples
///
/// ```
/// use ndarray::{ArrayD, IxDyn};
/// use stencils_array::{Boundary, Padding};
/// use stencils_engine::map_stencil_on;
/// use stencils_geometry::Geometry;
///
/// let grid = ArrayD::from_elem(IxDyn(&[4, 4]), 1u32);
/// let live = map_stencil_on(
///     |hood, ()| hood.sum(),
///     Geometry::moore(1, 2).unwrap(),
///     grid,
///     Boundary::Wrap,
///     Padding::Conditional,
///     (),
/// )
/// .unwrap();
/// assert!(live.iter().all(|&n| n == 8));
/// ```
pub fn map_stencil_on<T, S, X, U, F>(
    f: F,
    stencil: S,
    grid: ArrayD<T>,
    boundary: Boundary<T>,
    padding: Padding,
    aux: X,
) -> Result<ArrayD<U>, StencilError>
where
    T: Clone + Send + Sync,
    S: Stencil,
    X: AuxArrays,
    U: Send,
    F: Fn(Neighborhood<'_, S, T>, X::Item) -> U + Sync + Send,
{
    Mapper::default().map_on(f, stencil, grid, boundary, padding, aux)
}

/// [`Mapper::map_into`] with the default configuration.
pub fn map_stencil_into<A, U, F>(f: F, dest: ArrayViewMutD<'_, U>, source: &A) -> Result<(), MapError>
where
    A: StencilSource + Sync,
    U: Send,
    F: Fn(Neighborhood<'_, A::Stencil, A::Elem>) -> U + Sync + Send,
{
    Mapper::default().map_into(f, dest, source)
}

/// [`Mapper::map_into_with`] with the default configuration.
pub fn map_stencil_into_with<A, X, U, F>(
    f: F,
    dest: ArrayViewMutD<'_, U>,
    source: &A,
    aux: X,
) -> Result<(), MapError>
where
    A: StencilSource + Sync,
    X: AuxArrays,
    U: Send,
    F: Fn(Neighborhood<'_, A::Stencil, A::Elem>, X::Item) -> U + Sync + Send,
{
    Mapper::default().map_into_with(f, dest, source, aux)
}
