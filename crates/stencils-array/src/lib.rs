//! Stencil arrays for the stencils workspace.
//!
//! A [`StencilArray`] binds an N-dimensional grid to a stencil, a
//! [`Boundary`] condition and a [`Padding`] strategy, and hands out the
//! [`Neighborhood`](stencils_geometry::Neighborhood) of any cell.
//!
//! # Boundaries and padding
//!
//! | Padding | Valid boundaries | Reads near the edge |
//! |---------|------------------|---------------------|
//! | `Conditional` | Remove, Wrap, Reflect | resolved per neighbor |
//! | `Halo(Out)` | Remove, Wrap, Reflect | plain loads from an owned margin |
//! | `Halo(In)` | Use | plain loads from the caller's margin |
//!
//! Every combination outside this table is rejected at construction.
//!
//! # Double buffering
//!
//! [`SwitchingStencilArray`] keeps a source and a destination array and
//! swaps their roles after each pass. Both array types implement
//! [`StencilSource`], the interface the mapping engine reads through.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod boundary;
mod layout;
pub mod padding;
pub mod source;
pub mod switching;

pub use array::StencilArray;
pub use boundary::{reflect_axis, resolve, resolve_axis, wrap_axis, Boundary, BoundaryKind, Resolution};
pub use padding::{Halo, HaloMode, Padding};
pub use source::StencilSource;
pub use switching::SwitchingStencilArray;
