//! Composite stencils made of independent layers.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use indexmap::IndexMap;
use stencils_core::coord::Coord;
use stencils_core::GeometryError;

use crate::geometry::Geometry;
use crate::kernel::Kernel;
use crate::stencil::{derive_tables, Stencil};

struct LayeredData<S> {
    layers: Vec<S>,
    names: Option<IndexMap<String, usize>>,
    /// Range of each layer inside the flattened tables.
    spans: Vec<Range<usize>>,
    ndims: usize,
    radius: u32,
    offsets: Vec<Coord>,
    distances: Vec<f64>,
    zones: Vec<usize>,
}

/// Several independent stencils gathered in one pass.
///
/// The flattened offsets are the layer offsets concatenated in layer order;
/// layers may overlap. A neighborhood gathered through a `Layered` stencil
/// splits back into one group per layer with
/// [`Neighborhood::layer`](crate::Neighborhood::layer).
///
/// # Examples
///
/// ```
/// use stencils_geometry::{Geometry, Layered, Stencil};
///
/// let layered = Layered::named([
///     ("near", Geometry::von_neumann(1, 2).unwrap()),
///     ("far", Geometry::cardinal(3, 2).unwrap()),
/// ])
/// .unwrap();
/// assert_eq!(layered.len(), 8);
/// assert_eq!(layered.radius(), 3);
/// assert_eq!(layered.span(1), Some(4..8));
/// ```
pub struct Layered<S = Geometry> {
    data: Arc<LayeredData<S>>,
}

impl<S: Stencil> Layered<S> {
    /// Combine unnamed layers.
    ///
    /// # Errors
    ///
    /// `Empty` without layers; `LayerDimensionMismatch` if a layer's
    /// dimensionality differs from the first layer's.
    pub fn new(layers: impl IntoIterator<Item = S>) -> Result<Self, GeometryError> {
        Self::build(layers.into_iter().collect(), None)
    }

    /// Combine layers keyed by name, keeping the given order.
    pub fn named<I, N>(entries: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
    {
        let mut names = IndexMap::new();
        let mut layers = Vec::new();
        for (name, layer) in entries {
            let name = name.into();
            if names.contains_key(&name) {
                return Err(GeometryError::DuplicateName { name });
            }
            names.insert(name, layers.len());
            layers.push(layer);
        }
        Self::build(layers, Some(names))
    }

    fn build(
        layers: Vec<S>,
        names: Option<IndexMap<String, usize>>,
    ) -> Result<Self, GeometryError> {
        let ndims = layers.first().ok_or(GeometryError::Empty)?.ndims();
        let mut spans = Vec::with_capacity(layers.len());
        let mut offsets = Vec::new();
        for (layer, stencil) in layers.iter().enumerate() {
            if stencil.ndims() != ndims {
                return Err(GeometryError::LayerDimensionMismatch {
                    layer,
                    expected: ndims,
                    got: stencil.ndims(),
                });
            }
            let start = offsets.len();
            offsets.extend_from_slice(stencil.offsets());
            spans.push(start..offsets.len());
        }
        let radius = layers.iter().map(Stencil::radius).max().unwrap_or(0);
        let (distances, zones) = derive_tables(&offsets);
        Ok(Self {
            data: Arc::new(LayeredData {
                layers,
                names,
                spans,
                ndims,
                radius,
                offsets,
                distances,
                zones,
            }),
        })
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.data.layers.len()
    }

    /// The `i`-th layer.
    pub fn layer(&self, i: usize) -> Option<&S> {
        self.data.layers.get(i)
    }

    /// All layers in order.
    pub fn layers(&self) -> &[S] {
        &self.data.layers
    }

    /// Index of a named layer.
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.data.names.as_ref()?.get(name).copied()
    }

    /// Position range of the `i`-th layer inside the flattened offsets.
    pub fn span(&self, i: usize) -> Option<Range<usize>> {
        self.data.spans.get(i).cloned()
    }

    /// Position ranges of every layer.
    pub fn spans(&self) -> &[Range<usize>] {
        &self.data.spans
    }
}

impl<S> Clone for Layered<S> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<S: Stencil> Stencil for Layered<S> {
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
}

impl<S: fmt::Debug> fmt::Debug for Layered<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layered")
            .field("layers", &self.data.layers)
            .field("names", &self.data.names.as_ref().map(|n| n.keys().collect::<Vec<_>>()))
            .finish()
    }
}

/// One layer of a [`Layered`] stencil whose layers differ in type.
///
/// `Layered<S>` holds layers of a single type. `Layered<Layer<W>>` mixes
/// plain geometries, weighted kernels and nested layered stencils in one
/// pass.
///
/// # Examples
///
/// ```
/// use stencils_geometry::{Geometry, Kernel, Layer, Layered, Stencil};
///
/// let smooth = Kernel::new(Geometry::window(1, 2).unwrap(), vec![1.0 / 9.0; 9]).unwrap();
/// let mixed = Layered::new([
///     Layer::from(smooth),
///     Layer::from(Geometry::cardinal(2, 2).unwrap()),
/// ])
/// .unwrap();
/// assert_eq!(mixed.len(), 13);
/// assert!(mixed.layer(0).unwrap().kernel().is_some());
/// assert!(mixed.layer(1).unwrap().kernel().is_none());
/// ```
pub enum Layer<W = f64> {
    /// An unweighted geometry.
    Plain(Geometry),
    /// A geometry with one weight per offset.
    Weighted(Kernel<W>),
    /// A layered stencil used as a single layer.
    Nested(Layered<Layer<W>>),
}

impl<W> Layer<W> {
    /// The kernel of a weighted layer.
    pub fn kernel(&self) -> Option<&Kernel<W>> {
        match self {
            Self::Weighted(k) => Some(k),
            _ => None,
        }
    }

    /// The sub-layers of a nested layer.
    pub fn nested(&self) -> Option<&Layered<Layer<W>>> {
        match self {
            Self::Nested(l) => Some(l),
            _ => None,
        }
    }
}

macro_rules! each_layer {
    ($layer:expr, $s:ident => $body:expr) => {
        match $layer {
            Layer::Plain($s) => $body,
            Layer::Weighted($s) => $body,
            Layer::Nested($s) => $body,
        }
    };
}

impl<W> Clone for Layer<W> {
    fn clone(&self) -> Self {
        match self {
            Self::Plain(g) => Self::Plain(g.clone()),
            Self::Weighted(k) => Self::Weighted(k.clone()),
            Self::Nested(l) => Self::Nested(l.clone()),
        }
    }
}

impl<W: Send + Sync> Stencil for Layer<W> {
    fn ndims(&self) -> usize {
        each_layer!(self, s => s.ndims())
    }

    fn radius(&self) -> u32 {
        each_layer!(self, s => s.radius())
    }

    fn offsets(&self) -> &[Coord] {
        each_layer!(self, s => s.offsets())
    }

    fn distances(&self) -> &[f64] {
        each_layer!(self, s => s.distances())
    }

    fn distance_zones(&self) -> &[usize] {
        each_layer!(self, s => s.distance_zones())
    }

    fn position(&self, name: &str) -> Option<usize> {
        each_layer!(self, s => s.position(name))
    }
}

impl<W> From<Geometry> for Layer<W> {
    fn from(g: Geometry) -> Self {
        Self::Plain(g)
    }
}

impl<W> From<Kernel<W>> for Layer<W> {
    fn from(k: Kernel<W>) -> Self {
        Self::Weighted(k)
    }
}

impl<W> From<Layered<Layer<W>>> for Layer<W> {
    fn from(l: Layered<Layer<W>>) -> Self {
        Self::Nested(l)
    }
}

impl<W: fmt::Debug> fmt::Debug for Layer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        each_layer!(self, s => fmt::Debug::fmt(s, f))
    }
}
