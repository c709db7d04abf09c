//! Benchmark profiles for the stencils workspace.
//!
//! Provides pre-built stencil arrays so every benchmark measures the same
//! grids:
//!
//! - [`heat_grid`]: 256x256 (~65K cells) with a hot square in the middle
//! - [`reference_profile`]: von Neumann radius 1 over [`heat_grid`]
//! - [`wide_profile`]: circle radius 3, which forces most reads near the
//!   edge to resolve the boundary

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use ndarray::{ArrayD, IxDyn};
use stencils_array::{Boundary, Padding, StencilArray};
use stencils_geometry::Geometry;

/// Side length of the benchmark grids.
pub const SIDE: usize = 256;

/// A `SIDE x SIDE` grid of zeros with a 32x32 block of ones at the center.
pub fn heat_grid() -> ArrayD<f64> {
    let lo = SIDE / 2 - 16;
    let hi = SIDE / 2 + 16;
    ArrayD::from_shape_fn(IxDyn(&[SIDE, SIDE]), |i| {
        if (lo..hi).contains(&i[0]) && (lo..hi).contains(&i[1]) {
            1.0
        } else {
            0.0
        }
    })
}

/// Reflecting von Neumann radius 1 over [`heat_grid`].
pub fn reference_profile(padding: Padding) -> StencilArray<f64> {
    let g = Geometry::von_neumann(1, 2).unwrap();
    StencilArray::new(heat_grid(), g, Boundary::Reflect, padding).unwrap()
}

/// Wrapping circle radius 3 over [`heat_grid`].
pub fn wide_profile(padding: Padding) -> StencilArray<f64> {
    let g = Geometry::circle(3, 2).unwrap();
    StencilArray::new(heat_grid(), g, Boundary::Wrap, padding).unwrap()
}
