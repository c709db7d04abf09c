//! Core types for the stencils workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! coordinate type shared by every stencil geometry, the norm and row-major
//! index helpers used by the geometry generators and the mapping engine,
//! and the error enums for each subsystem.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coord;
pub mod error;

pub use coord::{Coord, Extents};
pub use error::{ArrayError, ErrorKind, GeometryError, MapError, StencilError};
