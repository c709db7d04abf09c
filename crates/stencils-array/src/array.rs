//! [`StencilArray`]: a grid bound to a stencil, a boundary and a padding.

use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, IxDyn, Slice};
use smallvec::smallvec;
use stencils_core::coord::{self, Coord, Extents};
use stencils_core::ArrayError;
use stencils_geometry::{Geometry, NeighborValues, Neighborhood, Stencil};

use crate::boundary::{resolve, Boundary, Resolution};
use crate::layout::{Edge, Layout, Mode};
use crate::padding::{HaloMode, Padding};

/// A grid that hands out the neighborhood of any cell.
///
/// The backing buffer is always a standard-layout [`ArrayD`]. With
/// [`Padding::Conditional`] it is the grid itself; with a halo it is the
/// grid plus a margin of `width` cells on every side, and all neighbor
/// reads are plain offset loads.
///
/// # Examples
///
/// ```
/// use ndarray::{ArrayD, IxDyn};
/// use stencils_array::{Boundary, Padding, StencilArray};
/// use stencils_geometry::Geometry;
///
/// let grid = ArrayD::from_shape_fn(IxDyn(&[3, 3]), |i| (i[0] * 3 + i[1]) as i32);
/// let arr = StencilArray::new(
///     grid,
///     Geometry::von_neumann(1, 2).unwrap(),
///     Boundary::Remove(-1),
///     Padding::Conditional,
/// )
/// .unwrap();
///
/// let hood = arr.stencil(&[0, 0]).unwrap();
/// assert_eq!(hood.neighbors(), &[-1, -1, 1, 3]);
/// assert_eq!(*hood.center(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct StencilArray<T, S = Geometry> {
    data: ArrayD<T>,
    stencil: S,
    boundary: Boundary<T>,
    padding: Padding,
    layout: Layout,
    mode: Mode<T>,
}

impl<T: Clone, S: Stencil> StencilArray<T, S> {
    /// Bind `data` to a stencil, boundary condition and padding.
    ///
    /// With [`HaloMode::Out`] the array allocates a larger buffer, copies
    /// `data` into its interior and fills the margin from the boundary
    /// rule. With [`HaloMode::In`], `data` already includes the margin
    /// and is used as is: its logical grid is `data` minus `width` cells
    /// on every side, and the margin contents are trusted.
    ///
    /// # Errors
    ///
    /// - `IncompatiblePadding` unless `Use` is paired with an inner halo
    ///   and every other boundary with `Conditional` or an outer halo.
    /// - `DimensionMismatch` if `data.ndim()` differs from the stencil's.
    /// - `HaloTooSmall` if an explicit halo width is below the radius.
    /// - `HaloExceedsGrid` if an inner-halo buffer has no interior.
    /// - `EmptyGrid` if the logical grid has no cells.
    pub fn new(
        data: ArrayD<T>,
        stencil: S,
        boundary: Boundary<T>,
        padding: Padding,
    ) -> Result<Self, ArrayError> {
        padding.check_pairing(boundary.kind())?;
        if data.ndim() != stencil.ndims() {
            return Err(ArrayError::DimensionMismatch {
                grid: data.ndim(),
                stencil: stencil.ndims(),
            });
        }
        let radius = stencil.radius();
        let edge = || {
            Edge::of(&boundary).ok_or(ArrayError::IncompatiblePadding {
                boundary: boundary.name(),
                padding: padding.name(),
            })
        };

        let (data, layout, mode) = match padding {
            Padding::Conditional => {
                let logical = logical_extents(&data)?;
                let layout = Layout::new(logical, 0, radius as usize, stencil.offsets());
                (standard(data), layout, Mode::Conditional(edge()?))
            }
            Padding::Halo(halo) => {
                let width = halo.effective_width(radius)?;
                let w = width as usize;
                match halo.mode {
                    HaloMode::In => {
                        let mut logical = Extents::with_capacity(data.ndim());
                        for (axis, &len) in data.shape().iter().enumerate() {
                            if len <= 2 * w {
                                return Err(ArrayError::HaloExceedsGrid { axis, len, width });
                            }
                            logical.push(len - 2 * w);
                        }
                        let layout = Layout::new(logical, w, radius as usize, stencil.offsets());
                        (standard(data), layout, Mode::Halo { refill: None })
                    }
                    HaloMode::Out => {
                        let logical = logical_extents(&data)?;
                        let layout = Layout::new(logical, w, radius as usize, stencil.offsets());
                        let extended = embed(&data, &layout)?;
                        log::debug!(
                            "allocated halo buffer {:?} around grid {:?} (width {w})",
                            layout.backing.as_slice(),
                            layout.logical.as_slice()
                        );
                        (extended, layout, Mode::Halo { refill: Some(edge()?) })
                    }
                }
            }
        };

        let mut array = Self {
            data,
            stencil,
            boundary,
            padding,
            layout,
            mode,
        };
        array.update_boundary();
        Ok(array)
    }

    /// Neighborhood of the cell at `idx`, or `None` if `idx` is not a cell
    /// of the logical grid.
    pub fn stencil(&self, idx: &[usize]) -> Option<Neighborhood<'_, S, T>> {
        self.layout.contains(idx).then(|| self.gather(idx))
    }

    /// Neighborhood of the cell at `idx` without checking the center.
    ///
    /// Neighbor coordinates are still resolved through the boundary.
    /// `idx` must be a cell of the logical grid; other indices read
    /// unrelated cells or panic.
    pub fn stencil_unchecked(&self, idx: &[usize]) -> Neighborhood<'_, S, T> {
        debug_assert!(self.layout.contains(idx));
        self.gather(idx)
    }

    /// Neighbor values of the cell at `idx`, in offset order.
    pub fn neighbors(&self, idx: &[usize]) -> Option<NeighborValues<T>> {
        self.stencil(idx).map(Neighborhood::into_values)
    }

    /// Neighbor values of the cell at `idx` without checking the center.
    ///
    /// Same contract as [`stencil_unchecked`](Self::stencil_unchecked).
    pub fn neighbors_unchecked(&self, idx: &[usize]) -> NeighborValues<T> {
        self.stencil_unchecked(idx).into_values()
    }

    /// Value seen at a raw coordinate, which may lie outside the grid.
    ///
    /// Inside the grid this is the cell itself. Halo arrays answer from
    /// their margin; conditional arrays resolve through the boundary.
    /// `None` if the boundary has no answer for the coordinate.
    pub fn get_neighbor(&self, raw: &[i32]) -> Option<&T> {
        if raw.len() != self.layout.ndim() {
            return None;
        }
        let cells = self.cells();
        let edge = match &self.mode {
            Mode::Halo { refill } => {
                if let Some(linear) = self.layout.margin_base(raw) {
                    return Some(&cells[linear]);
                }
                refill.as_ref()?
            }
            Mode::Conditional(edge) => edge,
        };
        let mut resolved: Extents = smallvec![0; raw.len()];
        match edge.locate(raw, &self.layout.logical, &mut resolved) {
            Some(pad) => Some(pad),
            None => Some(&cells[self.layout.base(&resolved)]),
        }
    }

    /// Resolved grid index of every neighbor of `idx`, in offset order.
    ///
    /// Neighbors answered by a pad value or a caller margin have no grid
    /// index and appear as `None`.
    pub fn indices(&self, idx: &[usize]) -> Option<Vec<Option<Extents>>> {
        if !self.layout.contains(idx) {
            return None;
        }
        let logical = &self.layout.logical;
        let resolved = self
            .stencil
            .offsets()
            .iter()
            .map(|offset| {
                let raw: Coord = idx.iter().zip(offset).map(|(&i, &d)| i as i32 + d).collect();
                match resolve(&self.boundary, logical, &raw) {
                    Resolution::InBounds => Some(raw.iter().map(|&v| v as usize).collect()),
                    Resolution::Adjusted(index) => Some(index),
                    Resolution::Substitute(_) | Resolution::Outside => None,
                }
            })
            .collect();
        Some(resolved)
    }

    /// Recompute an array-owned halo margin from the current interior.
    ///
    /// Call after mutating the grid through [`view_mut`](Self::view_mut).
    /// A no-op for conditional arrays and caller-owned margins.
    pub fn update_boundary(&mut self) {
        let Mode::Halo { refill: Some(edge) } = &self.mode else {
            return;
        };
        let layout = &self.layout;
        let cells = self
            .data
            .as_slice_mut()
            .expect("stencil arrays keep their buffer in standard layout");
        let n = layout.ndim();
        let w = layout.width as i32;
        let mut idx: Extents = smallvec![0; n];
        let mut raw: Coord = smallvec![0; n];
        let mut resolved: Extents = smallvec![0; n];
        let mut filled = 0usize;
        for linear in 0..cells.len() {
            coord::unravel_into(linear, &layout.backing, &mut idx);
            if !layout.in_margin(&idx) {
                continue;
            }
            for (r, &i) in raw.iter_mut().zip(&idx) {
                *r = i as i32 - w;
            }
            let value = match edge.locate(&raw, &layout.logical, &mut resolved) {
                Some(pad) => pad.clone(),
                None => cells[layout.base(&resolved)].clone(),
            };
            cells[linear] = value;
            filled += 1;
        }
        log::trace!("refilled {filled} halo cells");
    }
}

impl<T, S: Stencil> StencilArray<T, S> {
    /// The stencil this array gathers with.
    pub fn descriptor(&self) -> &S {
        &self.stencil
    }

    /// The boundary condition.
    pub fn boundary(&self) -> &Boundary<T> {
        &self.boundary
    }

    /// The padding strategy.
    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Width of the halo margin; 0 for conditional padding.
    pub fn halo_width(&self) -> u32 {
        self.layout.width as u32
    }

    /// Extents of the logical grid.
    pub fn shape(&self) -> &[usize] {
        &self.layout.logical
    }

    /// Whether every neighbor of `idx` lies inside the logical grid.
    pub fn is_interior(&self, idx: &[usize]) -> bool {
        self.layout.is_interior(idx)
    }

    /// The logical grid, without any margin.
    pub fn view(&self) -> ArrayViewD<'_, T> {
        let w = self.layout.width;
        self.data.slice_each_axis(|ax| Slice::from(w..ax.len - w))
    }

    /// Mutable view of the logical grid.
    ///
    /// Writes do not reach an outer halo margin until
    /// [`update_boundary`](Self::update_boundary) runs.
    pub fn view_mut(&mut self) -> ArrayViewMutD<'_, T> {
        let w = self.layout.width;
        self.data.slice_each_axis_mut(|ax| Slice::from(w..ax.len - w))
    }

    /// The whole backing buffer, margin included.
    pub fn as_backing(&self) -> &ArrayD<T> {
        &self.data
    }

    /// Consume the array, returning the backing buffer, margin included.
    pub fn into_inner(self) -> ArrayD<T> {
        self.data
    }

    /// Flat row-major view of the backing buffer.
    fn cells(&self) -> &[T] {
        self.data
            .as_slice()
            .expect("stencil arrays keep their buffer in standard layout")
    }

    fn gather(&self, idx: &[usize]) -> Neighborhood<'_, S, T>
    where
        T: Clone,
    {
        let cells = self.cells();
        let layout = &self.layout;
        let base = layout.base(idx);
        let values: NeighborValues<T> = match &self.mode {
            Mode::Conditional(edge) if !layout.is_interior(idx) => {
                let n = layout.ndim();
                let mut raw: Coord = smallvec![0; n];
                let mut resolved: Extents = smallvec![0; n];
                self.stencil
                    .offsets()
                    .iter()
                    .map(|offset| {
                        for ((r, &i), &d) in raw.iter_mut().zip(idx).zip(offset) {
                            *r = i as i32 + d;
                        }
                        match edge.locate(&raw, &layout.logical, &mut resolved) {
                            Some(pad) => pad.clone(),
                            None => cells[layout.base(&resolved)].clone(),
                        }
                    })
                    .collect()
            }
            _ => layout
                .deltas
                .iter()
                .map(|&d| cells[(base as isize + d) as usize].clone())
                .collect(),
        };
        Neighborhood::new(&self.stencil, cells[base].clone(), values)
    }
}

/// Extents of a grid used without a caller margin.
fn logical_extents<T>(data: &ArrayD<T>) -> Result<Extents, ArrayError> {
    if data.is_empty() {
        return Err(ArrayError::EmptyGrid);
    }
    Ok(Extents::from_slice(data.shape()))
}

fn standard<T: Clone>(data: ArrayD<T>) -> ArrayD<T> {
    if data.is_standard_layout() {
        data
    } else {
        data.as_standard_layout().into_owned()
    }
}

/// Copy `data` into the interior of a freshly allocated backing buffer.
/// The margin holds placeholders until the first refill.
fn embed<T: Clone>(data: &ArrayD<T>, layout: &Layout) -> Result<ArrayD<T>, ArrayError> {
    let seed = data.first().cloned().ok_or(ArrayError::EmptyGrid)?;
    let mut extended = ArrayD::from_elem(IxDyn(&layout.backing), seed);
    let w = layout.width;
    extended
        .slice_each_axis_mut(|ax| Slice::from(w..ax.len - w))
        .assign(data);
    Ok(extended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::padding::Halo;
    use stencils_geometry::Kernel;

    fn grid(rows: usize, cols: usize) -> ArrayD<i32> {
        ArrayD::from_shape_fn(IxDyn(&[rows, cols]), |i| (i[0] * cols + i[1]) as i32)
    }

    fn moore() -> Geometry {
        Geometry::moore(1, 2).unwrap()
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn pairing_errors() {
        let err = StencilArray::new(grid(3, 3), moore(), Boundary::Use, Padding::Conditional)
            .unwrap_err();
        assert!(matches!(err, ArrayError::IncompatiblePadding { .. }));

        let err = StencilArray::new(grid(3, 3), moore(), Boundary::Wrap, Halo::inner().into())
            .unwrap_err();
        assert_eq!(
            err,
            ArrayError::IncompatiblePadding {
                boundary: "Wrap",
                padding: "Halo(In)"
            }
        );

        let err = StencilArray::new(grid(3, 3), moore(), Boundary::Use, Halo::outer().into())
            .unwrap_err();
        assert!(matches!(err, ArrayError::IncompatiblePadding { .. }));
    }

    #[test]
    fn dimension_mismatch() {
        let err = StencilArray::new(
            grid(3, 3),
            Geometry::moore(1, 3).unwrap(),
            Boundary::Wrap,
            Padding::Conditional,
        )
        .unwrap_err();
        assert_eq!(err, ArrayError::DimensionMismatch { grid: 2, stencil: 3 });
    }

    #[test]
    fn halo_width_checks() {
        let wide = Geometry::moore(2, 2).unwrap();
        let err = StencilArray::new(
            grid(6, 6),
            wide.clone(),
            Boundary::Wrap,
            Halo::outer().with_width(1).into(),
        )
        .unwrap_err();
        assert_eq!(err, ArrayError::HaloTooSmall { width: 1, radius: 2 });

        let err = StencilArray::new(grid(4, 6), wide, Boundary::Use, Halo::inner().into())
            .unwrap_err();
        assert_eq!(
            err,
            ArrayError::HaloExceedsGrid {
                axis: 0,
                len: 4,
                width: 2
            }
        );
    }

    #[test]
    fn empty_grid_rejected() {
        let err = StencilArray::new(grid(0, 3), moore(), Boundary::Wrap, Padding::Conditional)
            .unwrap_err();
        assert_eq!(err, ArrayError::EmptyGrid);
    }

    #[test]
    fn non_standard_input_is_normalised() {
        let transposed = grid(3, 4).reversed_axes();
        let expected = transposed.clone();
        let arr = StencilArray::new(transposed, moore(), Boundary::Wrap, Padding::Conditional)
            .unwrap();
        assert!(arr.as_backing().is_standard_layout());
        assert_eq!(arr.view(), expected.view());
    }

    // ── Reads ───────────────────────────────────────────────────

    #[test]
    fn wrap_corner() {
        let arr = StencilArray::new(grid(3, 3), moore(), Boundary::Wrap, Padding::Conditional)
            .unwrap();
        let hood = arr.stencil(&[0, 0]).unwrap();
        assert_eq!(hood.neighbors(), &[8, 6, 7, 2, 1, 5, 3, 4]);
    }

    #[test]
    fn reflect_corner() {
        let arr = StencilArray::new(grid(3, 3), moore(), Boundary::Reflect, Padding::Conditional)
            .unwrap();
        let hood = arr.stencil(&[0, 0]).unwrap();
        assert_eq!(hood.neighbors(), &[0, 0, 1, 0, 1, 3, 3, 4]);
    }

    #[test]
    fn interior_reads_match_across_paddings() {
        let cond = StencilArray::new(grid(4, 5), moore(), Boundary::Wrap, Padding::Conditional)
            .unwrap();
        let halo = StencilArray::new(grid(4, 5), moore(), Boundary::Wrap, Halo::outer().into())
            .unwrap();
        assert_eq!(halo.as_backing().shape(), &[6, 7]);
        assert_eq!(halo.halo_width(), 1);
        for r in 0..4 {
            for c in 0..5 {
                assert_eq!(cond.neighbors(&[r, c]), halo.neighbors(&[r, c]));
            }
        }
    }

    #[test]
    fn unchecked_reads_match_checked_reads() {
        for padding in [Padding::Conditional, Halo::outer().into()] {
            let arr = StencilArray::new(grid(4, 3), moore(), Boundary::Reflect, padding).unwrap();
            for r in 0..4 {
                for c in 0..3 {
                    let checked = arr.neighbors(&[r, c]).unwrap();
                    assert_eq!(arr.neighbors_unchecked(&[r, c]), checked);
                    assert_eq!(arr.stencil_unchecked(&[r, c]).neighbors(), checked.as_slice());
                }
            }
        }
    }

    #[test]
    fn out_of_range_center_is_none() {
        let arr = StencilArray::new(grid(3, 3), moore(), Boundary::Wrap, Padding::Conditional)
            .unwrap();
        assert!(arr.stencil(&[3, 0]).is_none());
        assert!(arr.stencil(&[0]).is_none());
        assert!(arr.indices(&[0, 3]).is_none());
    }

    #[test]
    fn use_reads_caller_margin() {
        // 4x4 buffer, margin 1: logical 2x2 with values 1..=4, margin -1.
        let mut buf = ArrayD::from_elem(IxDyn(&[4, 4]), -1);
        buf[IxDyn(&[1, 1])] = 1;
        buf[IxDyn(&[1, 2])] = 2;
        buf[IxDyn(&[2, 1])] = 3;
        buf[IxDyn(&[2, 2])] = 4;
        let arr = StencilArray::new(buf, moore(), Boundary::Use, Halo::inner().into()).unwrap();
        assert_eq!(arr.shape(), &[2, 2]);
        assert_eq!(arr.neighbors(&[0, 0]).unwrap().as_slice(), &[-1, -1, -1, -1, 2, -1, 3, 4]);
        assert_eq!(arr.get_neighbor(&[-1, 0]), Some(&-1));
        assert_eq!(arr.get_neighbor(&[-2, 0]), None);
        let idx = arr.indices(&[0, 0]).unwrap();
        assert_eq!(idx[0], None);
        assert_eq!(idx[4].as_deref(), Some([0usize, 1].as_slice()));
    }

    #[test]
    fn get_neighbor_resolves() {
        let arr = StencilArray::new(grid(3, 3), moore(), Boundary::Remove(99), Padding::Conditional)
            .unwrap();
        assert_eq!(arr.get_neighbor(&[1, 1]), Some(&4));
        assert_eq!(arr.get_neighbor(&[-1, 1]), Some(&99));

        let arr = StencilArray::new(grid(3, 3), moore(), Boundary::Reflect, Halo::outer().into())
            .unwrap();
        assert_eq!(arr.get_neighbor(&[-1, 1]), Some(&1));
        // Past the margin the boundary rule still answers.
        assert_eq!(arr.get_neighbor(&[-3, 1]), Some(&7));
    }

    #[test]
    fn indices_resolve_wrap() {
        let arr = StencilArray::new(grid(3, 3), moore(), Boundary::Wrap, Padding::Conditional)
            .unwrap();
        let idx = arr.indices(&[0, 0]).unwrap();
        assert_eq!(idx[0].as_deref(), Some([2usize, 2].as_slice()));
        assert_eq!(idx[7].as_deref(), Some([1usize, 1].as_slice()));
    }

    // ── Mutation ────────────────────────────────────────────────

    #[test]
    fn update_boundary_refreshes_margin() {
        let mut arr = StencilArray::new(grid(3, 3), moore(), Boundary::Wrap, Halo::outer().into())
            .unwrap();
        arr.view_mut()[IxDyn(&[2, 2])] = 100;
        // Stale until refreshed.
        assert_eq!(arr.neighbors(&[0, 0]).unwrap()[0], 8);
        arr.update_boundary();
        assert_eq!(arr.neighbors(&[0, 0]).unwrap()[0], 100);
    }

    #[test]
    fn kernel_stencil_array() {
        let k = Kernel::new(Geometry::cross(1, 1).unwrap(), vec![1, 2, 1]).unwrap();
        let data = ArrayD::from_shape_vec(IxDyn(&[4]), vec![1, 2, 3, 4]).unwrap();
        let arr = StencilArray::new(data, k, Boundary::Remove(0), Padding::Conditional).unwrap();
        assert_eq!(arr.stencil(&[0]).unwrap().kernel_product(), 0 + 2 + 2);
        assert_eq!(arr.stencil(&[3]).unwrap().kernel_product(), 3 + 8 + 0);
    }
}
