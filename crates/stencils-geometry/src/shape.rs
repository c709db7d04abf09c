//! Named stencil shapes and the offset-generation table.

use stencils_core::coord::{self, BoxIter, Coord};
use stencils_core::GeometryError;

/// Largest radius a shape accepts: offsets are `i32` per axis.
pub const MAX_RADIUS: u32 = i32::MAX as u32;

/// A named, radius-parameterised stencil shape.
///
/// Every shape is generated the same way: enumerate the cube
/// `[-R, R]^N` in row-major order and keep the offsets accepted by the
/// shape's predicate ([`Shape::contains`]). The shape tag plus its
/// parameters fully determine cardinality and order.
///
/// # Examples
///
/// ```
/// use stencils_geometry::Shape;
///
/// let moore = Shape::Moore { radius: 1, ndims: 2 };
/// assert_eq!(moore.generate().unwrap().len(), 8);
///
/// let von_neumann = Shape::VonNeumann { radius: 2, ndims: 2 };
/// assert_eq!(von_neumann.generate().unwrap().len(), 12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Every offset within Chebyshev distance `radius`, center included.
    Window {
        /// Chebyshev radius.
        radius: u32,
        /// Dimensionality.
        ndims: usize,
    },
    /// Every offset within Chebyshev distance `radius`, center excluded.
    Moore {
        /// Chebyshev radius.
        radius: u32,
        /// Dimensionality.
        ndims: usize,
    },
    /// Offsets within Manhattan distance `radius`, center excluded.
    /// Identical to Moore in one dimension.
    VonNeumann {
        /// Manhattan radius.
        radius: u32,
        /// Dimensionality.
        ndims: usize,
    },
    /// Offsets with at most one nonzero component, center included.
    Cross {
        /// Arm length.
        radius: u32,
        /// Dimensionality.
        ndims: usize,
    },
    /// A bar along the last axis, center included.
    Horizontal {
        /// Half length.
        radius: u32,
        /// Dimensionality.
        ndims: usize,
    },
    /// A bar along the second-to-last axis, center included.
    Vertical {
        /// Half length.
        radius: u32,
        /// Dimensionality (at least 2).
        ndims: usize,
    },
    /// The forward diagonal `(-k, k, ..., k)`, center excluded.
    ForwardSlash {
        /// Half length.
        radius: u32,
        /// Dimensionality (at least 2).
        ndims: usize,
    },
    /// The backward diagonal `(k, k, ..., k)`, center excluded.
    BackSlash {
        /// Half length.
        radius: u32,
        /// Dimensionality (at least 2).
        ndims: usize,
    },
    /// Every diagonal direction, center excluded.
    AngledCross {
        /// Half length.
        radius: u32,
        /// Dimensionality (at least 2).
        ndims: usize,
    },
    /// A diamond (cross-polytope) of Manhattan radius `radius`, center included.
    Diamond {
        /// Manhattan radius.
        radius: u32,
        /// Dimensionality.
        ndims: usize,
    },
    /// Offsets within Euclidean distance `radius`, center excluded.
    Circle {
        /// Euclidean radius.
        radius: u32,
        /// Dimensionality.
        ndims: usize,
    },
    /// Offsets with Euclidean distance in `(inner, outer]`.
    Annulus {
        /// Outer Euclidean radius (inclusive).
        outer: u32,
        /// Inner Euclidean radius (exclusive). Must be less than `outer`.
        inner: u32,
        /// Dimensionality.
        ndims: usize,
    },
    /// The axis-aligned compass points at distance `radius`.
    Cardinal {
        /// Distance along the axis.
        radius: u32,
        /// Dimensionality.
        ndims: usize,
    },
    /// The diagonal compass points, every component `±radius`.
    Ordinal {
        /// Distance along each axis.
        radius: u32,
        /// Dimensionality.
        ndims: usize,
    },
}

impl Shape {
    /// Human-readable shape name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Window { .. } => "Window",
            Self::Moore { .. } => "Moore",
            Self::VonNeumann { .. } => "VonNeumann",
            Self::Cross { .. } => "Cross",
            Self::Horizontal { .. } => "Horizontal",
            Self::Vertical { .. } => "Vertical",
            Self::ForwardSlash { .. } => "ForwardSlash",
            Self::BackSlash { .. } => "BackSlash",
            Self::AngledCross { .. } => "AngledCross",
            Self::Diamond { .. } => "Diamond",
            Self::Circle { .. } => "Circle",
            Self::Annulus { .. } => "Annulus",
            Self::Cardinal { .. } => "Cardinal",
            Self::Ordinal { .. } => "Ordinal",
        }
    }

    /// Dimensionality parameter.
    pub fn ndims(&self) -> usize {
        match *self {
            Self::Window { ndims, .. }
            | Self::Moore { ndims, .. }
            | Self::VonNeumann { ndims, .. }
            | Self::Cross { ndims, .. }
            | Self::Horizontal { ndims, .. }
            | Self::Vertical { ndims, .. }
            | Self::ForwardSlash { ndims, .. }
            | Self::BackSlash { ndims, .. }
            | Self::AngledCross { ndims, .. }
            | Self::Diamond { ndims, .. }
            | Self::Circle { ndims, .. }
            | Self::Annulus { ndims, .. }
            | Self::Cardinal { ndims, .. }
            | Self::Ordinal { ndims, .. } => ndims,
        }
    }

    /// Half-width of the enumeration cube: the radius, or the outer radius
    /// for [`Shape::Annulus`].
    pub fn extent(&self) -> u32 {
        match *self {
            Self::Annulus { outer, .. } => outer,
            Self::Window { radius, .. }
            | Self::Moore { radius, .. }
            | Self::VonNeumann { radius, .. }
            | Self::Cross { radius, .. }
            | Self::Horizontal { radius, .. }
            | Self::Vertical { radius, .. }
            | Self::ForwardSlash { radius, .. }
            | Self::BackSlash { radius, .. }
            | Self::AngledCross { radius, .. }
            | Self::Diamond { radius, .. }
            | Self::Circle { radius, .. }
            | Self::Cardinal { radius, .. }
            | Self::Ordinal { radius, .. } => radius,
        }
    }

    /// Smallest dimensionality the shape is defined for.
    pub fn min_ndims(&self) -> usize {
        match self {
            Self::Vertical { .. }
            | Self::ForwardSlash { .. }
            | Self::BackSlash { .. }
            | Self::AngledCross { .. } => 2,
            _ => 1,
        }
    }

    /// Check the shape parameters.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let ndims = self.ndims();
        if ndims == 0 {
            return Err(GeometryError::ZeroDimensions);
        }
        if ndims < self.min_ndims() {
            return Err(GeometryError::UnsupportedDimensions {
                shape: self.name(),
                ndims,
                min: self.min_ndims(),
            });
        }
        let radius = self.extent();
        if radius > MAX_RADIUS {
            return Err(GeometryError::RadiusTooLarge {
                radius,
                max: MAX_RADIUS,
            });
        }
        if let Self::Annulus { outer, inner, .. } = *self {
            if inner >= outer {
                return Err(GeometryError::InvalidAnnulus { outer, inner });
            }
        }
        Ok(())
    }

    /// Whether `offset` (assumed inside the enumeration cube) belongs to
    /// the shape. This is the per-shape generation rule.
    pub fn contains(&self, offset: &[i32]) -> bool {
        let nonzero = offset.iter().filter(|&&v| v != 0).count();
        match *self {
            Self::Window { .. } => true,
            Self::Moore { .. } => nonzero > 0,
            Self::VonNeumann { radius, .. } => {
                let m = coord::manhattan(offset);
                m > 0 && m <= radius
            }
            Self::Cross { .. } => nonzero <= 1,
            Self::Horizontal { ndims, .. } => offset[..ndims - 1].iter().all(|&v| v == 0),
            Self::Vertical { ndims, .. } => offset
                .iter()
                .enumerate()
                .all(|(axis, &v)| axis == ndims - 2 || v == 0),
            Self::ForwardSlash { .. } => {
                let k = offset[1];
                k != 0 && offset[0] == -k && offset[1..].iter().all(|&v| v == k)
            }
            Self::BackSlash { .. } => {
                let k = offset[0];
                k != 0 && offset.iter().all(|&v| v == k)
            }
            Self::AngledCross { .. } => {
                let k = offset[0].unsigned_abs();
                k != 0 && offset.iter().all(|v| v.unsigned_abs() == k)
            }
            Self::Diamond { radius, .. } => coord::manhattan(offset) <= radius,
            Self::Circle { radius, .. } => {
                let sq = coord::squared_euclidean(offset);
                sq > 0 && sq <= (radius as u64).pow(2)
            }
            Self::Annulus { outer, inner, .. } => {
                let sq = coord::squared_euclidean(offset);
                sq > (inner as u64).pow(2) && sq <= (outer as u64).pow(2)
            }
            Self::Cardinal { radius, .. } => {
                radius > 0 && nonzero == 1 && coord::chebyshev(offset) == radius
            }
            Self::Ordinal { radius, .. } => {
                radius > 0 && offset.iter().all(|v| v.unsigned_abs() == radius)
            }
        }
    }

    /// Generate the canonical offset sequence.
    pub fn generate(&self) -> Result<Vec<Coord>, GeometryError> {
        self.validate()?;
        Ok(BoxIter::cube(self.extent(), self.ndims())
            .filter(|o| self.contains(o))
            .collect())
    }

    /// Closed-form offset count, where one exists.
    ///
    /// Used to cross-check generation; shapes without a simple closed
    /// form (Circle, Annulus) return `None`.
    pub fn expected_len(&self) -> Option<usize> {
        let n = self.ndims() as u32;
        let side = |r: u32| (2 * r as usize + 1).pow(n);
        match *self {
            Self::Window { radius, .. } => Some(side(radius)),
            Self::Moore { radius, .. } => Some(side(radius) - 1),
            Self::Cross { radius, .. } => Some(2 * radius as usize * n as usize + 1),
            Self::Horizontal { radius, .. } | Self::Vertical { radius, .. } => {
                Some(2 * radius as usize + 1)
            }
            Self::ForwardSlash { radius, .. } | Self::BackSlash { radius, .. } => {
                Some(2 * radius as usize)
            }
            Self::AngledCross { radius, .. } => Some(radius as usize * 2usize.pow(n)),
            Self::Cardinal { radius, .. } => Some(if radius == 0 { 0 } else { 2 * n as usize }),
            Self::Ordinal { radius, .. } => Some(if radius == 0 { 0 } else { 2usize.pow(n) }),
            Self::VonNeumann { radius, .. } if n == 2 => {
                Some(2 * radius as usize * (radius as usize + 1))
            }
            Self::Diamond { radius, .. } if n == 2 => {
                Some(2 * radius as usize * (radius as usize + 1) + 1)
            }
            _ => None,
        }
    }
}
