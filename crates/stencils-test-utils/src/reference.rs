//! Brute-force neighbor gathering.
//!
//! Deliberately naive: every neighbor coordinate is resolved by stepping it
//! back into the grid one reflection at a time, with no shared code with the
//! stencil arrays it is compared against.

use ndarray::{ArrayD, IxDyn};
use stencils_geometry::Stencil;

/// Out-of-grid rule for [`reference_neighbors`].
#[derive(Clone, Debug)]
pub enum RefEdge<T> {
    Pad(T),
    Wrap,
    Reflect,
}

fn fold_axis(mut v: i64, len: i64, edge: &RefEdge<impl Sized>) -> Option<i64> {
    match edge {
        RefEdge::Pad(_) => (0..len).contains(&v).then_some(v),
        RefEdge::Wrap => {
            while v < 0 {
                v += len;
            }
            while v >= len {
                v -= len;
            }
            Some(v)
        }
        RefEdge::Reflect => {
            while v < 0 || v >= len {
                v = if v < 0 { -1 - v } else { 2 * len - 1 - v };
            }
            Some(v)
        }
    }
}

/// Neighbor values of `center` in `grid`, in the stencil's offset order.
pub fn reference_neighbors<T: Clone, S: Stencil>(
    grid: &ArrayD<T>,
    stencil: &S,
    edge: &RefEdge<T>,
    center: &[usize],
) -> Vec<T> {
    let shape = grid.shape();
    stencil
        .offsets()
        .iter()
        .map(|offset| {
            let mut idx = Vec::with_capacity(shape.len());
            for axis in 0..shape.len() {
                let raw = center[axis] as i64 + offset[axis] as i64;
                match fold_axis(raw, shape[axis] as i64, edge) {
                    Some(v) => idx.push(v as usize),
                    None => match edge {
                        RefEdge::Pad(pad) => return pad.clone(),
                        _ => unreachable!("wrap and reflect always fold into the grid"),
                    },
                }
            }
            grid[IxDyn(&idx)].clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ramp_grid;
    use stencils_geometry::Geometry;

    #[test]
    fn reflect_folds_far_overshoot() {
        let edge: RefEdge<i64> = RefEdge::Reflect;
        assert_eq!(fold_axis(-1, 3, &edge), Some(0));
        assert_eq!(fold_axis(3, 3, &edge), Some(2));
        assert_eq!(fold_axis(-7, 3, &edge), Some(0));
    }

    #[test]
    fn wrap_corner_in_1d() {
        let g = ramp_grid(&[4]);
        let n = reference_neighbors(&g, &Geometry::moore(1, 1).unwrap(), &RefEdge::Wrap, &[0]);
        assert_eq!(n, vec![3, 1]);
    }
}
