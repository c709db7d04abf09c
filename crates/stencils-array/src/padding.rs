//! Padding strategies: where out-of-grid reads are answered.

use stencils_core::ArrayError;

use crate::boundary::BoundaryKind;

/// Who owns the halo margin of a halo-padded array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HaloMode {
    /// The caller's buffer already contains the margin; nothing is copied.
    In,
    /// The array allocates `extents + 2 * width` and fills the margin.
    Out,
}

/// A halo margin around the logical grid.
///
/// The width defaults to the stencil radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Halo {
    /// Margin ownership.
    pub mode: HaloMode,
    /// Margin width; `None` means the stencil radius.
    pub width: Option<u32>,
}

impl Halo {
    /// A caller-provided margin.
    pub const fn inner() -> Self {
        Self {
            mode: HaloMode::In,
            width: None,
        }
    }

    /// An array-owned margin.
    pub const fn outer() -> Self {
        Self {
            mode: HaloMode::Out,
            width: None,
        }
    }

    /// Set an explicit margin width.
    pub const fn with_width(self, width: u32) -> Self {
        Self {
            mode: self.mode,
            width: Some(width),
        }
    }

    /// Width for a stencil of the given radius.
    ///
    /// # Errors
    ///
    /// `HaloTooSmall` if an explicit width is below the radius.
    pub fn effective_width(&self, radius: u32) -> Result<u32, ArrayError> {
        match self.width {
            None => Ok(radius),
            Some(width) if width < radius => Err(ArrayError::HaloTooSmall { width, radius }),
            Some(width) => Ok(width),
        }
    }
}

/// How neighbor reads near the grid edge are answered.
///
/// # Examples
///
/// ```
/// use stencils_array::{Halo, HaloMode, Padding};
///
/// let p = Padding::Halo(Halo::outer().with_width(3));
/// assert_eq!(p.name(), "Halo(Out)");
/// assert_eq!(p.halo().map(|h| h.mode), Some(HaloMode::Out));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Padding {
    /// No margin: reads are resolved per neighbor near the edges.
    #[default]
    Conditional,
    /// A margin of at least the stencil radius; reads never branch.
    Halo(Halo),
}

impl Padding {
    /// Human-readable name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Conditional => "Conditional",
            Self::Halo(Halo {
                mode: HaloMode::In, ..
            }) => "Halo(In)",
            Self::Halo(Halo {
                mode: HaloMode::Out,
                ..
            }) => "Halo(Out)",
        }
    }

    /// The halo settings, if any.
    pub fn halo(&self) -> Option<Halo> {
        match self {
            Self::Conditional => None,
            Self::Halo(h) => Some(*h),
        }
    }

    /// Check that `boundary` may be combined with this padding.
    ///
    /// `Use` and inner halos require each other. Every other boundary
    /// works with `Conditional` and outer halos.
    pub fn check_pairing(&self, boundary: BoundaryKind) -> Result<(), ArrayError> {
        let inner = matches!(
            self,
            Self::Halo(Halo {
                mode: HaloMode::In,
                ..
            })
        );
        if inner == (boundary == BoundaryKind::Use) {
            Ok(())
        } else {
            Err(ArrayError::IncompatiblePadding {
                boundary: boundary.name(),
                padding: self.name(),
            })
        }
    }
}

impl From<Halo> for Padding {
    fn from(halo: Halo) -> Self {
        Self::Halo(halo)
    }
}
