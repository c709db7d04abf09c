use ndarray::{ArrayD, IxDyn};
use proptest::prelude::*;
use stencils_array::{Boundary, Halo, Padding, StencilArray};
use stencils_core::coord;
use stencils_geometry::{Geometry, Stencil};
use stencils_test_utils::{ramp_grid, reference_neighbors, row_times_col, RefEdge};

fn boundaries(pad: i64) -> Vec<(Boundary<i64>, RefEdge<i64>)> {
    vec![
        (Boundary::Wrap, RefEdge::Wrap),
        (Boundary::Reflect, RefEdge::Reflect),
        (Boundary::Remove(pad), RefEdge::Pad(pad)),
    ]
}

fn every_cell(shape: &[usize]) -> impl Iterator<Item = Vec<usize>> + '_ {
    (0..coord::cell_count(shape)).map(move |i| coord::unravel(i, shape).to_vec())
}

/// Conditional, outer-halo and reference reads agree on every cell.
fn assert_equivalent(grid: &ArrayD<i64>, stencil: &Geometry) {
    for (boundary, edge) in boundaries(-99) {
        let cond = StencilArray::new(grid.clone(), stencil.clone(), boundary.clone(), Padding::Conditional)
            .unwrap();
        let halo = StencilArray::new(grid.clone(), stencil.clone(), boundary.clone(), Halo::outer().into())
            .unwrap();
        for idx in every_cell(grid.shape()) {
            let expected = reference_neighbors(grid, stencil, &edge, &idx);
            let c = cond.neighbors(&idx).unwrap();
            let h = halo.neighbors(&idx).unwrap();
            assert_eq!(c.as_slice(), expected.as_slice(), "conditional {boundary:?} at {idx:?}");
            assert_eq!(h.as_slice(), expected.as_slice(), "halo {boundary:?} at {idx:?}");
        }
    }
}

#[test]
fn moore_radius_two_on_small_grid() {
    // Radius equals the grid length on axis 0: every read near the edge wraps
    // or reflects at least once.
    assert_equivalent(&ramp_grid(&[2, 5]), &Geometry::moore(2, 2).unwrap());
}

#[test]
fn asymmetric_positional_stencil() {
    let g = Geometry::positional([[0, 3], [-2, 0], [1, -1]]).unwrap();
    assert_equivalent(&ramp_grid(&[4, 4]), &g);
}

#[test]
fn three_dimensional_von_neumann() {
    assert_equivalent(&ramp_grid(&[3, 4, 2]), &Geometry::von_neumann(2, 3).unwrap());
}

#[test]
fn wider_halo_than_radius() {
    let grid = ramp_grid(&[3, 3]);
    let g = Geometry::moore(1, 2).unwrap();
    let wide = StencilArray::new(grid.clone(), g.clone(), Boundary::Reflect, Halo::outer().with_width(3).into())
        .unwrap();
    assert_eq!(wide.halo_width(), 3);
    assert_eq!(wide.as_backing().shape(), &[9, 9]);
    for idx in every_cell(&[3, 3]) {
        let expected = reference_neighbors(&grid, &g, &RefEdge::Reflect, &idx);
        assert_eq!(wide.neighbors(&idx).unwrap().as_slice(), expected.as_slice());
    }
}

#[test]
fn wrapped_corner_mean_on_row_times_col() {
    let arr = StencilArray::new(
        row_times_col(4, 4),
        Geometry::moore(1, 2).unwrap(),
        Boundary::Wrap,
        Padding::Conditional,
    )
    .unwrap();
    let hood = arr.stencil(&[0, 0]).unwrap();
    // Wrapped neighbors of (0, 0), in offset order:
    // (3,3) (3,0) (3,1) (0,3) (0,1) (1,3) (1,0) (1,1)
    let by_hand = [9.0, 0.0, 3.0, 0.0, 0.0, 3.0, 0.0, 1.0];
    assert_eq!(hood.neighbors(), &by_hand);
    let mean = hood.sum() / hood.len() as f64;
    assert_eq!(mean, by_hand.iter().sum::<f64>() / 8.0);
    assert_eq!(mean, 2.0);
}

#[test]
fn caller_margin_matches_outer_halo() {
    // An inner-halo array over the backing buffer of an outer-halo array
    // sees the same neighborhoods.
    let g = Geometry::circle(2, 2).unwrap();
    let outer = StencilArray::new(ramp_grid(&[5, 6]), g.clone(), Boundary::Wrap, Halo::outer().into())
        .unwrap();
    let inner = StencilArray::new(outer.as_backing().clone(), g, Boundary::Use, Halo::inner().into())
        .unwrap();
    assert_eq!(inner.shape(), outer.shape());
    for idx in every_cell(&[5, 6]) {
        assert_eq!(inner.neighbors(&idx), outer.neighbors(&idx));
    }
}

#[test]
fn views_exclude_margin() {
    let grid = ramp_grid(&[3, 4]);
    let arr = StencilArray::new(grid.clone(), Geometry::moore(2, 2).unwrap(), Boundary::Remove(0), Halo::outer().into())
        .unwrap();
    assert_eq!(arr.view(), grid.view());
    assert_eq!(arr.as_backing()[IxDyn(&[0, 0])], 0);
    assert_eq!(arr.into_inner().shape(), &[7, 8]);
}

proptest! {
    #[test]
    fn halo_and_conditional_agree(
        rows in 1usize..6,
        cols in 1usize..6,
        radius in 1u32..3,
        shape_pick in 0usize..4,
    ) {
        let g = match shape_pick {
            0 => Geometry::moore(radius, 2),
            1 => Geometry::von_neumann(radius, 2),
            2 => Geometry::angled_cross(radius, 2),
            _ => Geometry::circle(radius, 2),
        }
        .unwrap();
        prop_assert_eq!(g.ndims(), 2);
        assert_equivalent(&ramp_grid(&[rows, cols]), &g);
    }
}
