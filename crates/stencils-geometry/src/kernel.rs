//! Weighted stencils.

use std::fmt;
use std::iter::Sum;
use std::sync::Arc;

use stencils_core::coord::Coord;
use stencils_core::GeometryError;

use crate::geometry::Geometry;
use crate::stencil::{Stencil, Weighted};

/// A stencil paired with one weight per offset.
///
/// The kernel delegates every geometric query to its inner stencil, so it
/// can be handed to a stencil array in place of that stencil. Neighborhoods
/// gathered through a kernel expose
/// [`kernel_product`](crate::Neighborhood::kernel_product).
///
/// # Examples
///
/// ```
/// use stencils_geometry::{Geometry, Kernel, Stencil};
///
/// let blur = Kernel::new(Geometry::window(1, 1).unwrap(), vec![0.25, 0.5, 0.25]).unwrap();
/// assert_eq!(blur.len(), 3);
/// assert_eq!(blur.weight_sum(), 1.0);
/// ```
pub struct Kernel<W, S = Geometry> {
    stencil: S,
    weights: Arc<[W]>,
}

impl<W, S: Stencil> Kernel<W, S> {
    /// Pair `stencil` with `weights`, given in offset order.
    ///
    /// # Errors
    ///
    /// `WeightLengthMismatch` if there is not exactly one weight per offset.
    pub fn new(stencil: S, weights: impl Into<Vec<W>>) -> Result<Self, GeometryError> {
        let weights = weights.into();
        if weights.len() != stencil.len() {
            return Err(GeometryError::WeightLengthMismatch {
                offsets: stencil.len(),
                weights: weights.len(),
            });
        }
        Ok(Self {
            stencil,
            weights: weights.into(),
        })
    }

    /// Derive each weight from the offset's Euclidean distance.
    pub fn from_fn(stencil: S, mut f: impl FnMut(f64) -> W) -> Self {
        let weights: Vec<W> = stencil.distances().iter().map(|&d| f(d)).collect();
        Self {
            stencil,
            weights: weights.into(),
        }
    }

    /// The wrapped stencil.
    pub fn stencil(&self) -> &S {
        &self.stencil
    }

    /// Weights in offset order.
    pub fn weights(&self) -> &[W] {
        &self.weights
    }

    /// Sum of all weights.
    pub fn weight_sum(&self) -> W
    where
        W: Clone + Sum<W>,
    {
        self.weights.iter().cloned().sum()
    }
}

impl<W, S: Clone> Clone for Kernel<W, S> {
    fn clone(&self) -> Self {
        Self {
            stencil: self.stencil.clone(),
            weights: Arc::clone(&self.weights),
        }
    }
}

impl<W, S> Stencil for Kernel<W, S>
where
    W: Send + Sync,
    S: Stencil,
{
    fn ndims(&self) -> usize {
        self.stencil.ndims()
    }

    fn radius(&self) -> u32 {
        self.stencil.radius()
    }

    fn offsets(&self) -> &[Coord] {
        self.stencil.offsets()
    }

    fn distances(&self) -> &[f64] {
        self.stencil.distances()
    }

    fn distance_zones(&self) -> &[usize] {
        self.stencil.distance_zones()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.stencil.position(name)
    }
}

impl<W, S> Weighted for Kernel<W, S>
where
    W: Send + Sync,
    S: Stencil,
{
    type Weight = W;

    fn weights(&self) -> &[W] {
        &self.weights
    }
}

impl<W: fmt::Debug, S: fmt::Debug> fmt::Debug for Kernel<W, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("stencil", &self.stencil)
            .field("weights", &&*self.weights)
            .finish()
    }
}
