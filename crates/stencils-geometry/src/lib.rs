//! Stencil geometries for the stencils workspace.
//!
//! A stencil is a fixed, ordered set of integer offsets around a center
//! cell. This crate defines the [`Stencil`] capability trait, which keeps
//! stencil arrays and the mapping engine shape-agnostic, along with the concrete stencil types and the positioned
//! [`Neighborhood`] handed to user functions.
//!
//! # Stencil types
//!
//! - [`Geometry`]: offsets generated from a [`Shape`] (Moore, VonNeumann,
//!   Circle, ...) or supplied explicitly (positional, named, rectangle)
//! - [`Kernel`]: any stencil paired with one weight per offset
//! - [`Layered`]: several independent stencils gathered together
//!
//! # Ordering
//!
//! Offsets of every generated shape are enumerated in row-major order over
//! the cube `[-R, R]^N`, so a `Window` kernel lines up with a row-major
//! flattened weight array. Two geometries built from the same parameters
//! always have identical offset sequences.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod geometry;
pub mod kernel;
pub mod layered;
pub mod neighborhood;
pub mod shape;
pub mod stencil;

pub use geometry::{Geometry, Origin};
pub use kernel::Kernel;
pub use layered::{Layer, Layered};
pub use neighborhood::{dot, kernel_product, NeighborValues, Neighborhood, INLINE_NEIGHBORS};
pub use shape::{Shape, MAX_RADIUS};
pub use stencil::{Stencil, Weighted};
