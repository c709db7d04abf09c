//! Process-wide memo table for generated geometries.
//!
//! Generating a shape walks the whole `(2R+1)^N` cube, so geometries are
//! generated once per `Shape` and shared afterwards. The table only grows;
//! entries are small and keyed by shape parameters.

use std::sync::{OnceLock, PoisonError, RwLock};

use indexmap::IndexMap;
use stencils_core::GeometryError;

use crate::geometry::Geometry;
use crate::shape::Shape;
use crate::stencil::Stencil;

static CACHE: OnceLock<RwLock<IndexMap<Shape, Geometry>>> = OnceLock::new();

fn table() -> &'static RwLock<IndexMap<Shape, Geometry>> {
    CACHE.get_or_init(|| RwLock::new(IndexMap::new()))
}

/// Look up `shape`, generating and inserting it on a miss.
///
/// Concurrent misses on the same shape may both generate; the first
/// insert wins and every caller receives that entry.
pub fn get_or_generate(shape: Shape) -> Result<Geometry, GeometryError> {
    {
        let read = table().read().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = read.get(&shape) {
            return Ok(hit.clone());
        }
    }

    let generated = Geometry::generate_uncached(shape)?;
    log::debug!(
        "generated {} geometry (radius {}, ndims {}): {} offsets",
        shape.name(),
        shape.extent(),
        shape.ndims(),
        generated.len()
    );

    let mut write = table().write().unwrap_or_else(PoisonError::into_inner);
    Ok(write.entry(shape).or_insert(generated).clone())
}

/// Whether `shape` already has a memoized geometry.
pub fn contains(shape: &Shape) -> bool {
    table()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(shape)
}
