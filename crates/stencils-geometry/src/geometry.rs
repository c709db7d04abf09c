//! The `Geometry` stencil: an immutable, shared offset table.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use smallvec::SmallVec;
use stencils_core::coord::{BoxIter, Coord};
use stencils_core::GeometryError;

use crate::cache;
use crate::shape::Shape;
use crate::stencil::{derive_tables, radius_of, Stencil};

/// Where a geometry's offsets came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Generated from a named shape.
    Shape(Shape),
    /// Offsets supplied verbatim.
    Positional,
    /// Offsets supplied verbatim with a name per offset.
    Named,
    /// Every offset of an explicit per-axis box.
    Rectangle,
}

struct GeometryData {
    origin: Origin,
    ndims: usize,
    radius: u32,
    offsets: Vec<Coord>,
    distances: Vec<f64>,
    zones: Vec<usize>,
    /// Name -> offset position. Insertion order equals offset order.
    names: Option<IndexMap<String, usize>>,
}

/// An ordered, immutable set of offsets around a center cell.
///
/// Cloning a `Geometry` is an `Arc` bump; the offset table is built once
/// and shared by every array and every cell that uses it.
///
/// # Examples
///
/// ```
/// use stencils_geometry::{Geometry, Stencil};
///
/// let moore = Geometry::moore(1, 2).unwrap();
/// assert_eq!(moore.len(), 8);
/// assert_eq!(moore.radius(), 1);
/// assert_eq!(moore.diameter(), 3);
///
/// let named = Geometry::named([("west", [0, -1]), ("east", [0, 1])]).unwrap();
/// assert_eq!(named.position("east"), Some(1));
/// ```
#[derive(Clone)]
pub struct Geometry {
    data: Arc<GeometryData>,
}

impl Geometry {
    fn from_parts(origin: Origin, ndims: usize, offsets: Vec<Coord>) -> Self {
        let (distances, zones) = derive_tables(&offsets);
        Self {
            data: Arc::new(GeometryData {
                origin,
                ndims,
                radius: radius_of(&offsets),
                offsets,
                distances,
                zones,
                names: None,
            }),
        }
    }

    /// Build a geometry from a shape, sharing a memoized table when the
    /// same shape has been built before.
    pub fn from_shape(shape: Shape) -> Result<Self, GeometryError> {
        cache::get_or_generate(shape)
    }

    /// Build a geometry from a shape without consulting the memo table.
    pub(crate) fn generate_uncached(shape: Shape) -> Result<Self, GeometryError> {
        let offsets = shape.generate()?;
        Ok(Self::from_parts(Origin::Shape(shape), shape.ndims(), offsets))
    }

    /// [`Shape::Window`]: the full `(2R+1)^N` cube, center included.
    pub fn window(radius: u32, ndims: usize) -> Result<Self, GeometryError> {
        Self::from_shape(Shape::Window { radius, ndims })
    }

    /// [`Shape::Moore`]: the cube without its center.
    pub fn moore(radius: u32, ndims: usize) -> Result<Self, GeometryError> {
        Self::from_shape(Shape::Moore { radius, ndims })
    }

    /// [`Shape::VonNeumann`]: Manhattan ball without its center.
    pub fn von_neumann(radius: u32, ndims: usize) -> Result<Self, GeometryError> {
        Self::from_shape(Shape::VonNeumann { radius, ndims })
    }

    /// [`Shape::Cross`]: axis arms plus the center.
    pub fn cross(radius: u32, ndims: usize) -> Result<Self, GeometryError> {
        Self::from_shape(Shape::Cross { radius, ndims })
    }

    /// [`Shape::Horizontal`]: a bar along the last axis.
    pub fn horizontal(radius: u32, ndims: usize) -> Result<Self, GeometryError> {
        Self::from_shape(Shape::Horizontal { radius, ndims })
    }

    /// [`Shape::Vertical`]: a bar along the second-to-last axis.
    pub fn vertical(radius: u32, ndims: usize) -> Result<Self, GeometryError> {
        Self::from_shape(Shape::Vertical { radius, ndims })
    }

    /// [`Shape::ForwardSlash`]: the forward diagonal.
    pub fn forward_slash(radius: u32, ndims: usize) -> Result<Self, GeometryError> {
        Self::from_shape(Shape::ForwardSlash { radius, ndims })
    }

    /// [`Shape::BackSlash`]: the backward diagonal.
    pub fn back_slash(radius: u32, ndims: usize) -> Result<Self, GeometryError> {
        Self::from_shape(Shape::BackSlash { radius, ndims })
    }

    /// [`Shape::AngledCross`]: every diagonal direction.
    pub fn angled_cross(radius: u32, ndims: usize) -> Result<Self, GeometryError> {
        Self::from_shape(Shape::AngledCross { radius, ndims })
    }

    /// [`Shape::Diamond`]: Manhattan ball including its center.
    pub fn diamond(radius: u32, ndims: usize) -> Result<Self, GeometryError> {
        Self::from_shape(Shape::Diamond { radius, ndims })
    }

    /// [`Shape::Circle`]: Euclidean ball without its center.
    pub fn circle(radius: u32, ndims: usize) -> Result<Self, GeometryError> {
        Self::from_shape(Shape::Circle { radius, ndims })
    }

    /// [`Shape::Annulus`]: Euclidean shell `(inner, outer]`.
    pub fn annulus(outer: u32, inner: u32, ndims: usize) -> Result<Self, GeometryError> {
        Self::from_shape(Shape::Annulus {
            outer,
            inner,
            ndims,
        })
    }

    /// [`Shape::Cardinal`]: axis compass points at distance `radius`.
    pub fn cardinal(radius: u32, ndims: usize) -> Result<Self, GeometryError> {
        Self::from_shape(Shape::Cardinal { radius, ndims })
    }

    /// [`Shape::Ordinal`]: diagonal compass points at distance `radius`.
    pub fn ordinal(radius: u32, ndims: usize) -> Result<Self, GeometryError> {
        Self::from_shape(Shape::Ordinal { radius, ndims })
    }

    /// Build a geometry from explicit offsets, kept in the given order.
    ///
    /// Dimensionality is the length of the first offset; every other
    /// offset must have the same length. Radius is the largest absolute
    /// component over all offsets.
    pub fn positional<I, C>(coords: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[i32]>,
    {
        let (ndims, offsets) = collect_offsets(coords)?;
        Ok(Self::from_parts(Origin::Positional, ndims, offsets))
    }

    /// Build a geometry from `(name, offset)` pairs.
    ///
    /// Values gathered with a named geometry can be read by name through
    /// [`Neighborhood::by_name`](crate::Neighborhood::by_name).
    pub fn named<I, N, C>(entries: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: AsRef<[i32]>,
    {
        let (names, coords): (Vec<String>, Vec<C>) =
            entries.into_iter().map(|(n, c)| (n.into(), c)).unzip();
        let (ndims, offsets) = collect_offsets(coords)?;
        Self::from_parts(Origin::Named, ndims, offsets).with_names(names)
    }

    /// Attach one name per offset to an existing geometry.
    ///
    /// # Errors
    ///
    /// `NameCountMismatch` if the number of names differs from the number
    /// of offsets, `DuplicateName` if a name repeats.
    pub fn with_names<I, N>(self, names: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let offsets = self.data.offsets.len();
        if names.len() != offsets {
            return Err(GeometryError::NameCountMismatch {
                offsets,
                names: names.len(),
            });
        }
        let mut table = IndexMap::with_capacity(names.len());
        for (position, name) in names.into_iter().enumerate() {
            if table.contains_key(&name) {
                return Err(GeometryError::DuplicateName { name });
            }
            table.insert(name, position);
        }
        let data = &self.data;
        Ok(Self {
            data: Arc::new(GeometryData {
                origin: Origin::Named,
                ndims: data.ndims,
                radius: data.radius,
                offsets: data.offsets.clone(),
                distances: data.distances.clone(),
                zones: data.zones.clone(),
                names: Some(table),
            }),
        })
    }

    /// Every offset of the box with per-axis inclusive `(lo, hi)` bounds,
    /// in row-major order.
    pub fn rectangle(bounds: &[(i32, i32)]) -> Result<Self, GeometryError> {
        if bounds.is_empty() {
            return Err(GeometryError::ZeroDimensions);
        }
        if let Some((axis, &(lo, hi))) = bounds.iter().enumerate().find(|(_, (lo, hi))| lo > hi) {
            return Err(GeometryError::InvalidBounds { axis, lo, hi });
        }
        let lo: Coord = bounds.iter().map(|b| b.0).collect();
        let hi: Coord = bounds.iter().map(|b| b.1).collect();
        let offsets = BoxIter::new(&lo, &hi).collect();
        Ok(Self::from_parts(Origin::Rectangle, bounds.len(), offsets))
    }

    /// How this geometry was built.
    pub fn origin(&self) -> Origin {
        self.data.origin
    }

    /// The generating shape, if any.
    pub fn shape(&self) -> Option<Shape> {
        match self.data.origin {
            Origin::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    /// Offset names in offset order, if the geometry is named.
    pub fn names(&self) -> Option<impl Iterator<Item = &str> + '_> {
        self.data
            .names
            .as_ref()
            .map(|table| table.keys().map(String::as_str))
    }

    /// Name of the offset at `position`, if the geometry is named.
    pub fn name_of(&self, position: usize) -> Option<&str> {
        self.data
            .names
            .as_ref()?
            .get_index(position)
            .map(|(name, _)| name.as_str())
    }

    /// Raw neighbor coordinates around `center`, one per offset.
    ///
    /// These do not know about any grid: nothing is wrapped or reflected.
    pub fn indices(&self, center: &[i32]) -> Vec<Coord> {
        self.data
            .offsets
            .iter()
            .map(|o| o.iter().zip(center).map(|(d, c)| c + d).collect())
            .collect()
    }

    /// `true` if both handles share one offset table.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.data, &b.data)
    }
}

/// Validate an explicit offset list and convert it to `Coord`s.
pub(crate) fn collect_offsets<I, C>(coords: I) -> Result<(usize, Vec<Coord>), GeometryError>
where
    I: IntoIterator<Item = C>,
    C: AsRef<[i32]>,
{
    let offsets: Vec<Coord> = coords
        .into_iter()
        .map(|c| SmallVec::from_slice(c.as_ref()))
        .collect();
    let ndims = offsets.first().ok_or(GeometryError::Empty)?.len();
    if ndims == 0 {
        return Err(GeometryError::ZeroDimensions);
    }
    if let Some((index, bad)) = offsets.iter().enumerate().find(|(_, o)| o.len() != ndims) {
        return Err(GeometryError::CoordLengthMismatch {
            index,
            expected: ndims,
            got: bad.len(),
        });
    }
    Ok((ndims, offsets))
}

impl Stencil for Geometry {
    fn ndims(&self) -> usize {
        self.data.ndims
    }

    fn radius(&self) -> u32 {
        self.data.radius
    }

    fn offsets(&self) -> &[Coord] {
        &self.data.offsets
    }

    fn distances(&self) -> &[f64] {
        &self.data.distances
    }

    fn distance_zones(&self) -> &[usize] {
        &self.data.zones
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.data.names.as_ref()?.get(name).copied()
    }
}

impl PartialEq for Geometry {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
            || (self.data.ndims == other.data.ndims
                && self.data.offsets == other.data.offsets
                && self.data.names == other.data.names)
    }
}

impl fmt::Debug for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Geometry")
            .field("origin", &self.data.origin)
            .field("ndims", &self.data.ndims)
            .field("radius", &self.data.radius)
            .field("len", &self.data.offsets.len())
            .finish()
    }
}

/// Draws 2D geometries as a `diameter x diameter` character grid:
/// `#` for offsets, `+` for an excluded center, `.` elsewhere.
impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.data.origin {
            Origin::Shape(shape) => shape.name(),
            Origin::Positional => "Positional",
            Origin::Named => "Named",
            Origin::Rectangle => "Rectangle",
        };
        write!(
            f,
            "{label} (radius {}, {} dims, {} offsets)",
            self.data.radius,
            self.data.ndims,
            self.data.offsets.len()
        )?;
        if self.data.ndims != 2 {
            return Ok(());
        }
        let r = self.data.radius as i32;
        for row in -r..=r {
            writeln!(f)?;
            for col in -r..=r {
                let included = self
                    .data
                    .offsets
                    .iter()
                    .any(|o| o[0] == row && o[1] == col);
                let glyph = match (included, row == 0 && col == 0) {
                    (true, _) => '#',
                    (false, true) => '+',
                    (false, false) => '.',
                };
                write!(f, "{glyph}")?;
            }
        }
        Ok(())
    }
}
