//! Test utilities for stencils development.
//!
//! Provides grid fixtures ([`row_times_col`], [`constant_grid`],
//! [`ramp_grid`]) and a brute-force neighbor gatherer in [`reference`]
//! used to cross-check the optimised read paths of stencil arrays.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod reference;

use ndarray::{ArrayD, IxDyn};

pub use reference::{reference_neighbors, RefEdge};

/// 2D grid whose cell `(r, c)` holds `r * c`.
pub fn row_times_col(rows: usize, cols: usize) -> ArrayD<f64> {
    ArrayD::from_shape_fn(IxDyn(&[rows, cols]), |i| (i[0] * i[1]) as f64)
}

/// Grid of the given extents filled with `value`.
pub fn constant_grid(shape: &[usize], value: f64) -> ArrayD<f64> {
    ArrayD::from_elem(IxDyn(shape), value)
}

/// Grid whose cells hold their row-major position: `0, 1, 2, ...`.
pub fn ramp_grid(shape: &[usize]) -> ArrayD<i64> {
    let mut next = 0i64;
    ArrayD::from_shape_simple_fn(IxDyn(shape), || {
        let v = next;
        next += 1;
        v
    })
}
