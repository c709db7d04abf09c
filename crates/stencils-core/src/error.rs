//! Error types for the stencils workspace.
//!
//! One enum per subsystem: geometry construction, stencil-array
//! construction, and traversal, plus [`StencilError`] for calls that do
//! both of the last two. Every variant maps onto one of three
//! [`ErrorKind`]s so callers can branch on the category without matching
//! every variant.

use std::error::Error;
use std::fmt;

/// Coarse error category shared by all subsystem errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An object could not be constructed from the supplied parameters.
    Construction,
    /// Grid and stencil (or two grids) disagree on dimensionality.
    DimensionMismatch,
    /// A destination or auxiliary array has incompatible extents.
    Size,
}

/// Errors from building a stencil geometry, kernel, or layered stencil.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeometryError {
    /// Dimensionality must be at least one.
    ZeroDimensions,
    /// The shape is only defined for a minimum number of dimensions.
    UnsupportedDimensions {
        /// Shape name.
        shape: &'static str,
        /// Requested dimensionality.
        ndims: usize,
        /// Minimum supported dimensionality.
        min: usize,
    },
    /// An explicit offset list was empty.
    Empty,
    /// Offsets in an explicit list have different lengths.
    CoordLengthMismatch {
        /// Position of the offending coordinate.
        index: usize,
        /// Length of the first coordinate.
        expected: usize,
        /// Length of the offending coordinate.
        got: usize,
    },
    /// Radius does not fit the signed offset range.
    RadiusTooLarge {
        /// Requested radius.
        radius: u32,
        /// Largest supported radius.
        max: u32,
    },
    /// Annulus inner radius must be strictly less than the outer radius.
    InvalidAnnulus {
        /// Outer radius.
        outer: u32,
        /// Inner radius.
        inner: u32,
    },
    /// A rectangle axis has `lo > hi`.
    InvalidBounds {
        /// Axis index.
        axis: usize,
        /// Lower bound.
        lo: i32,
        /// Upper bound.
        hi: i32,
    },
    /// Number of names does not match the number of offsets.
    NameCountMismatch {
        /// Number of offsets.
        offsets: usize,
        /// Number of names supplied.
        names: usize,
    },
    /// A name was used twice in a named stencil or layered stencil.
    DuplicateName {
        /// The repeated name.
        name: String,
    },
    /// Kernel weights do not have one entry per offset.
    WeightLengthMismatch {
        /// Number of offsets.
        offsets: usize,
        /// Number of weights supplied.
        weights: usize,
    },
    /// Layers of a layered stencil have different dimensionality.
    LayerDimensionMismatch {
        /// Position of the offending layer.
        layer: usize,
        /// Dimensionality of the first layer.
        expected: usize,
        /// Dimensionality of the offending layer.
        got: usize,
    },
}

impl GeometryError {
    /// Error category. All geometry errors are construction errors.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Construction
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimensions => write!(f, "stencil must have at least one dimension"),
            Self::UnsupportedDimensions { shape, ndims, min } => {
                write!(f, "{shape} requires at least {min} dimensions, got {ndims}")
            }
            Self::Empty => write!(f, "explicit offset list is empty"),
            Self::CoordLengthMismatch {
                index,
                expected,
                got,
            } => write!(
                f,
                "offset {index} has length {got}, expected {expected} (length of the first offset)"
            ),
            Self::RadiusTooLarge { radius, max } => {
                write!(f, "radius {radius} exceeds the largest supported radius {max}")
            }
            Self::InvalidAnnulus { outer, inner } => write!(
                f,
                "annulus inner radius {inner} must be less than outer radius {outer}"
            ),
            Self::InvalidBounds { axis, lo, hi } => {
                write!(f, "rectangle axis {axis} has lo {lo} > hi {hi}")
            }
            Self::NameCountMismatch { offsets, names } => {
                write!(f, "{names} names supplied for {offsets} offsets")
            }
            Self::DuplicateName { name } => write!(f, "duplicate name '{name}'"),
            Self::WeightLengthMismatch { offsets, weights } => {
                write!(f, "{weights} kernel weights supplied for {offsets} offsets")
            }
            Self::LayerDimensionMismatch {
                layer,
                expected,
                got,
            } => write!(
                f,
                "layer {layer} has {got} dimensions, expected {expected}"
            ),
        }
    }
}

impl Error for GeometryError {}

/// Errors from constructing a stencil array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// Boundary condition and padding cannot be combined.
    IncompatiblePadding {
        /// Boundary condition name.
        boundary: &'static str,
        /// Padding name.
        padding: &'static str,
    },
    /// Halo width is smaller than the stencil radius.
    HaloTooSmall {
        /// Requested halo width.
        width: u32,
        /// Stencil radius.
        radius: u32,
    },
    /// A caller-supplied halo buffer has no interior left on some axis.
    HaloExceedsGrid {
        /// Axis index.
        axis: usize,
        /// Buffer extent on that axis.
        len: usize,
        /// Halo width.
        width: u32,
    },
    /// Grid dimensionality differs from stencil dimensionality.
    DimensionMismatch {
        /// Grid dimensionality.
        grid: usize,
        /// Stencil dimensionality.
        stencil: usize,
    },
    /// The logical grid has a zero-length axis.
    EmptyGrid,
}

impl ArrayError {
    /// Error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            _ => ErrorKind::Construction,
        }
    }
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompatiblePadding { boundary, padding } => {
                write!(f, "boundary {boundary} cannot be used with {padding} padding")
            }
            Self::HaloTooSmall { width, radius } => {
                write!(f, "halo width {width} is smaller than stencil radius {radius}")
            }
            Self::HaloExceedsGrid { axis, len, width } => write!(
                f,
                "buffer axis {axis} has length {len}, leaving no interior inside a halo of width {width}"
            ),
            Self::DimensionMismatch { grid, stencil } => write!(
                f,
                "grid has {grid} dimensions but stencil has {stencil}"
            ),
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
        }
    }
}

impl Error for ArrayError {}

/// Errors from a mapping pass, raised before any cell is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapError {
    /// An array taking part in the pass has the wrong dimensionality.
    DimensionMismatch {
        /// Which array: `"dest"` or `"aux N"`.
        array: String,
        /// Expected dimensionality.
        expected: usize,
        /// Actual dimensionality.
        got: usize,
    },
    /// An array taking part in the pass has incompatible extents.
    SizeMismatch {
        /// Which array: `"dest"` or `"aux N"`.
        array: String,
        /// Description of the accepted extents.
        expected: String,
        /// Actual extents.
        got: Vec<usize>,
    },
}

impl MapError {
    /// Error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::SizeMismatch { .. } => ErrorKind::Size,
        }
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionMismatch {
                array,
                expected,
                got,
            } => write!(f, "{array} has {got} dimensions, expected {expected}"),
            Self::SizeMismatch {
                array,
                expected,
                got,
            } => write!(f, "{array} has extents {got:?}, expected {expected}"),
        }
    }
}

impl Error for MapError {}

/// Errors from a one-call pass that builds its stencil array first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StencilError {
    /// The stencil array could not be built.
    Array(ArrayError),
    /// The pass itself was rejected.
    Map(MapError),
}

impl StencilError {
    /// Error category of the wrapped error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Array(e) => e.kind(),
            Self::Map(e) => e.kind(),
        }
    }
}

impl fmt::Display for StencilError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(e) => write!(f, "stencil array: {e}"),
            Self::Map(e) => write!(f, "stencil pass: {e}"),
        }
    }
}

impl Error for StencilError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Array(e) => Some(e),
            Self::Map(e) => Some(e),
        }
    }
}

impl From<ArrayError> for StencilError {
    fn from(e: ArrayError) -> Self {
        Self::Array(e)
    }
}

impl From<MapError> for StencilError {
    fn from(e: MapError) -> Self {
        Self::Map(e)
    }
}
