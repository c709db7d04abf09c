//! Stencils: neighborhood computations over N-dimensional grids.
//!
//! This is the facade crate that re-exports the public API of the stencils
//! sub-crates. Adding `stencils` as a single dependency is enough for most
//! users; `ndarray` is re-exported so grids can be built without a separate
//! dependency.
//!
//! # Quick start
//!
//! One generation of Conway's Game of Life on a wrapped 5×5 board:
//!
//! ```rust
//! use stencils::prelude::*;
//! use stencils::ndarray::{ArrayD, IxDyn};
//!
//! let mut board = ArrayD::from_elem(IxDyn(&[5, 5]), 0u8);
//! for c in 1..=3 {
//!     board[IxDyn(&[2, c])] = 1;
//! }
//! let arr = StencilArray::new(board, Geometry::moore(1, 2)?, Boundary::Wrap, Padding::Conditional)?;
//!
//! let life = |hood: Neighborhood<'_, Geometry, u8>| {
//!     let alive = hood.neighbors().iter().filter(|&&v| v == 1).count();
//!     match (*hood.center(), alive) {
//!         (1, 2) | (_, 3) => 1,
//!         _ => 0,
//!     }
//! };
//! let sw = SwitchingStencilArray::new(arr).map_stencil(life);
//!
//! // The horizontal blinker turned vertical.
//! let next = sw.source().view();
//! for r in 0..5 {
//!     for c in 0..5 {
//!         let expected = u8::from(c == 2 && (1..=3).contains(&r));
//!         assert_eq!(next[IxDyn(&[r, c])], expected);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for items not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `stencils-core` | Coordinates, index helpers, error enums |
//! | [`geometry`] | `stencils-geometry` | Shapes, kernels, layered stencils, neighborhoods |
//! | [`array`] | `stencils-array` | Boundaries, padding, stencil arrays, double buffering |
//! | [`engine`] | `stencils-engine` | The mapping engine and its configuration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Coordinates, row-major helpers and error types (`stencils-core`).
pub use stencils_core as types;

/// Stencil geometries (`stencils-geometry`).
///
/// [`geometry::Geometry`] builds the named shapes and arbitrary offset
/// lists; [`geometry::Kernel`] attaches weights and [`geometry::Layered`]
/// combines several stencils into one.
pub use stencils_geometry as geometry;

/// Boundary-aware stencil arrays (`stencils-array`).
///
/// [`array::StencilArray`] pairs a grid with a stencil, a
/// [`array::Boundary`] and a [`array::Padding`];
/// [`array::SwitchingStencilArray`] double-buffers it for repeated passes.
pub use stencils_array as array;

/// The mapping engine (`stencils-engine`).
pub use stencils_engine as engine;

/// Re-export of the `ndarray` version the grids are built on.
pub use ndarray;

/// Common imports for typical usage.
///
/// ```rust
/// use stencils::prelude::*;
/// ```
pub mod prelude {
    // Geometry
    pub use stencils_geometry::{
        dot, kernel_product, Geometry, Kernel, Layer, Layered, Neighborhood, Shape, Stencil, Weighted,
    };

    // Arrays
    pub use stencils_array::{Boundary, Halo, Padding, StencilArray, StencilSource, SwitchingStencilArray};

    // Engine
    pub use stencils_engine::{
        map_stencil, map_stencil_into, map_stencil_into_with, map_stencil_on, map_stencil_with, MapConfig,
        MapSwitching, Mapper,
    };

    // Errors
    pub use stencils_core::{ArrayError, GeometryError, MapError, StencilError};
}
