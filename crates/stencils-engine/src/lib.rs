//! The stencil mapping engine.
//!
//! Applies a user function to the [`Neighborhood`](stencils_geometry::Neighborhood)
//! of every cell of a [`StencilSource`](stencils_array::StencilSource) and
//! collects one result per cell:
//!
//! - [`map_stencil`] / [`map_stencil_with`] allocate the output grid.
//! - [`map_stencil_on`] builds the stencil array from a bare grid first.
//! - [`map_stencil_into`] / [`map_stencil_into_with`] write into a
//!   caller-provided grid of logical, halo-backing or shrunk extents.
//! - [`MapSwitching`] runs passes on a
//!   [`SwitchingStencilArray`](stencils_array::SwitchingStencilArray),
//!   switching buffers after each.
//!
//! Auxiliary arrays ([`AuxArrays`]) are read at the same center and passed
//! alongside the neighborhood. [`Mapper`] holds the [`MapConfig`] that
//! decides between parallel (rayon) and sequential traversal.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod auxiliary;
pub mod config;
pub mod map;
pub mod switching;

pub use auxiliary::AuxArrays;
pub use config::MapConfig;
pub use map::{
    map_stencil, map_stencil_into, map_stencil_into_with, map_stencil_on, map_stencil_with, Mapper,
};
pub use switching::MapSwitching;
