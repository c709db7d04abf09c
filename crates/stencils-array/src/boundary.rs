//! Boundary conditions: what a neighbor read outside the grid returns.

use smallvec::smallvec;
use stencils_core::coord::Extents;

/// Payload-free tag of a [`Boundary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// Substitute a fixed pad value.
    Remove,
    /// Trust a caller-provided margin.
    Use,
    /// Periodic: indices wrap to the opposite side.
    Wrap,
    /// Mirror across the nearest edge, repeating the edge cell.
    Reflect,
}

impl BoundaryKind {
    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Remove => "Remove",
            Self::Use => "Use",
            Self::Wrap => "Wrap",
            Self::Reflect => "Reflect",
        }
    }
}

/// How neighbor reads that fall outside the logical grid are answered.
///
/// A boundary never owns grid data; the `Remove` payload is only the
/// fallback value.
///
/// # Examples
///
/// ```
/// use stencils_array::{resolve_axis, Boundary, BoundaryKind};
///
/// let b: Boundary<f32> = Boundary::Remove(0.0);
/// assert_eq!(b.kind(), BoundaryKind::Remove);
///
/// assert_eq!(resolve_axis(-1, 5, BoundaryKind::Wrap), Some(4));
/// assert_eq!(resolve_axis(5, 5, BoundaryKind::Reflect), Some(4));
/// assert_eq!(resolve_axis(-1, 5, BoundaryKind::Remove), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Boundary<T> {
    /// Out-of-grid neighbors read as this value.
    Remove(T),
    /// Out-of-grid neighbors are read from a caller-filled halo. Only valid
    /// with inner halo padding.
    Use,
    /// Periodic boundaries.
    Wrap,
    /// Mirrored boundaries: `-1 -> 0`, `-2 -> 1`, `len -> len - 1`.
    Reflect,
}

impl<T> Boundary<T> {
    /// The payload-free tag.
    pub fn kind(&self) -> BoundaryKind {
        match self {
            Self::Remove(_) => BoundaryKind::Remove,
            Self::Use => BoundaryKind::Use,
            Self::Wrap => BoundaryKind::Wrap,
            Self::Reflect => BoundaryKind::Reflect,
        }
    }

    /// The pad value of a `Remove` boundary.
    pub fn pad(&self) -> Option<&T> {
        match self {
            Self::Remove(pad) => Some(pad),
            _ => None,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// Map one axis value onto `0..len`, or `None` if the boundary leaves it
/// outside.
///
/// In-range values are returned unchanged under every boundary. `Wrap`
/// uses Euclidean remainder. `Reflect` mirrors with period `2 * len`, so
/// overshoots larger than the axis reflect again from the other edge.
/// `Remove` and `Use` never map an outside value.
pub fn resolve_axis(value: i32, len: usize, kind: BoundaryKind) -> Option<usize> {
    let n = len as i64;
    let v = i64::from(value);
    if (0..n).contains(&v) {
        return Some(v as usize);
    }
    if n == 0 {
        return None;
    }
    match kind {
        BoundaryKind::Remove | BoundaryKind::Use => None,
        BoundaryKind::Wrap => Some(wrap_axis(value, len)),
        BoundaryKind::Reflect => Some(reflect_axis(value, len)),
    }
}

/// Periodic axis index. `len` must be non-zero.
pub fn wrap_axis(value: i32, len: usize) -> usize {
    debug_assert!(len > 0);
    i64::from(value).rem_euclid(len as i64) as usize
}

/// Mirrored axis index with period `2 * len`. `len` must be non-zero.
pub fn reflect_axis(value: i32, len: usize) -> usize {
    debug_assert!(len > 0);
    let n = len as i64;
    let m = i64::from(value).rem_euclid(2 * n);
    let mirrored = if m < n { m } else { 2 * n - 1 - m };
    mirrored as usize
}

/// Outcome of resolving one raw neighbor coordinate against a grid.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution<'a, T> {
    /// The coordinate is inside the grid as given.
    InBounds,
    /// The coordinate was wrapped or reflected to this in-bounds index.
    Adjusted(Extents),
    /// The coordinate is outside; read this pad value instead.
    Substitute(&'a T),
    /// The coordinate is outside and the boundary offers no substitute.
    Outside,
}

/// Resolve a raw coordinate against grid `extents`, axis by axis.
///
/// A coordinate outside on several axes has each axis resolved with the
/// same rule before the index is assembled.
pub fn resolve<'a, T>(boundary: &'a Boundary<T>, extents: &[usize], raw: &[i32]) -> Resolution<'a, T> {
    debug_assert_eq!(extents.len(), raw.len());
    let inside = raw
        .iter()
        .zip(extents)
        .all(|(&v, &len)| v >= 0 && (v as usize) < len);
    if inside {
        return Resolution::InBounds;
    }

    let kind = boundary.kind();
    let mut index: Extents = smallvec![0; raw.len()];
    for (axis, (&v, &len)) in raw.iter().zip(extents).enumerate() {
        match resolve_axis(v, len, kind) {
            Some(i) => index[axis] = i,
            None => {
                return match boundary.pad() {
                    Some(pad) => Resolution::Substitute(pad),
                    None => Resolution::Outside,
                }
            }
        }
    }
    Resolution::Adjusted(index)
}
