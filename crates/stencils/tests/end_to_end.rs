//! Whole-pipeline checks through the facade.

use stencils::ndarray::{ArrayD, IxDyn};
use stencils::prelude::*;
use stencils_test_utils::{constant_grid, ramp_grid};

fn total(arr: &StencilArray<f64>) -> f64 {
    arr.view().sum()
}

fn wrapped<S: Stencil>(grid: &ArrayD<f64>, stencil: S) -> StencilArray<f64, S> {
    StencilArray::new(grid.clone(), stencil, Boundary::Wrap, Padding::Conditional).unwrap()
}

#[test]
fn reflecting_diffusion_conserves_mass() {
    let mut grid = constant_grid(&[12, 9], 0.0);
    grid[IxDyn(&[0, 0])] = 100.0;
    grid[IxDyn(&[6, 4])] = 50.0;
    let arr = StencilArray::new(
        grid,
        Geometry::von_neumann(1, 2).unwrap(),
        Boundary::Reflect,
        Halo::outer().into(),
    )
    .unwrap();
    let before = total(&arr);

    let diffuse = |hood: Neighborhood<'_, Geometry, f64>| {
        let c = *hood.center();
        c + 0.1 * (hood.sum() - 4.0 * c)
    };
    let mut sw = SwitchingStencilArray::new(arr);
    for _ in 0..40 {
        sw = sw.map_stencil(diffuse);
    }
    let after = total(sw.source());
    assert!((after - before).abs() < 1e-9, "{before} -> {after}");
    assert!(sw.source().view().iter().all(|&v| v >= 0.0));
}

#[test]
fn layered_stencil_splits_neighborhood() {
    let layered = Layered::named([
        ("near", Geometry::von_neumann(1, 2).unwrap()),
        ("ring", Geometry::annulus(2, 1, 2).unwrap()),
    ])
    .unwrap();
    let near_len = layered.layer(0).unwrap().len();
    let arr = StencilArray::new(ramp_grid(&[6, 6]), layered, Boundary::Remove(0), Padding::Conditional)
        .unwrap();

    let out = map_stencil(
        |hood| {
            let near = hood.layer_named("near").unwrap();
            let ring = hood.layer_named("ring").unwrap();
            (near.len(), ring.len(), near.sum() + ring.sum() == hood.sum())
        },
        &arr,
    );
    for &(n, _, consistent) in out.iter() {
        assert_eq!(n, near_len);
        assert!(consistent);
    }
}

#[test]
fn weighted_kernel_matches_manual_sum() {
    let g = Geometry::moore(1, 2).unwrap();
    let weights: Vec<f64> = g.offsets().iter().map(|o| f64::from(o[0] * 3 + o[1])).collect();
    let k = Kernel::new(g.clone(), weights.clone()).unwrap();
    let grid = ArrayD::from_shape_fn(IxDyn(&[5, 4]), |i| (i[0] * 7 + i[1] * 2) as f64);

    let weighted = StencilArray::new(grid.clone(), k, Boundary::Wrap, Padding::Conditional).unwrap();
    let plain = StencilArray::new(grid, g, Boundary::Wrap, Padding::Conditional).unwrap();

    let via_kernel = map_stencil(|hood| kernel_product(&hood), &weighted);
    let manual = map_stencil(
        |hood| hood.neighbors().iter().zip(&weights).map(|(v, w)| v * w).sum::<f64>(),
        &plain,
    );
    for (a, b) in via_kernel.iter().zip(manual.iter()) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn errors_surface_through_the_prelude() {
    let err = Geometry::positional(Vec::<[i32; 2]>::new()).unwrap_err();
    assert!(matches!(err, GeometryError::Empty));

    let err = StencilArray::new(
        constant_grid(&[3, 3], 0.0),
        Geometry::moore(1, 3).unwrap(),
        Boundary::Wrap,
        Padding::Conditional,
    )
    .unwrap_err();
    assert!(matches!(err, ArrayError::DimensionMismatch { .. }));
}

#[test]
fn mixed_layers_match_their_standalone_passes() {
    let weights = vec![1.0, 2.0, 3.0, 4.0];
    let cardinal = Geometry::cardinal(1, 2).unwrap();
    let ordinal = Geometry::ordinal(1, 2).unwrap();
    let mixed = Layered::named([
        ("weighted", Layer::from(Kernel::new(cardinal.clone(), weights.clone()).unwrap())),
        ("plain", Layer::from(ordinal.clone())),
    ])
    .unwrap();
    let grid = ArrayD::from_shape_fn(IxDyn(&[5, 6]), |i| (i[0] * 10 + i[1]) as f64);

    let out = map_stencil(
        |hood| {
            let weighted = hood.layer_named("weighted").unwrap();
            let kernel = weighted.stencil().kernel().unwrap();
            (dot(weighted.neighbors(), kernel.weights()), hood.layer(1).unwrap().sum())
        },
        &wrapped(&grid, mixed),
    );
    let alone_weighted = map_stencil(
        |hood| dot(hood.neighbors(), weights.as_slice()),
        &wrapped(&grid, cardinal),
    );
    let alone_plain = map_stencil(|hood| hood.sum(), &wrapped(&grid, ordinal));
    for ((&(w, p), &aw), &ap) in out.iter().zip(alone_weighted.iter()).zip(alone_plain.iter()) {
        assert_eq!(w, aw);
        assert_eq!(p, ap);
    }
}

#[test]
fn one_call_map_from_a_bare_grid() {
    let counts = map_stencil_on(
        |hood, ()| hood.sum(),
        Geometry::von_neumann(1, 2).unwrap(),
        constant_grid(&[4, 3], 1.0),
        Boundary::Remove(0.0),
        Padding::Conditional,
        (),
    )
    .unwrap();
    assert_eq!(counts.shape(), &[4, 3]);
    assert_eq!(counts[IxDyn(&[0, 0])], 2.0);
    assert_eq!(counts[IxDyn(&[1, 1])], 4.0);

    let err = map_stencil_on(
        |hood, ()| hood.sum(),
        Geometry::moore(1, 3).unwrap(),
        constant_grid(&[4, 3], 1.0),
        Boundary::Wrap,
        Padding::Conditional,
        (),
    )
    .unwrap_err();
    assert_eq!(
        err,
        StencilError::Array(ArrayError::DimensionMismatch { grid: 2, stencil: 3 })
    );

    let scale = constant_grid(&[3, 4], 2.0);
    let err = map_stencil_on(
        |hood, (s,)| hood.sum() * s,
        Geometry::moore(1, 2).unwrap(),
        constant_grid(&[4, 3], 1.0),
        Boundary::Wrap,
        Padding::Conditional,
        (&scale,),
    )
    .unwrap_err();
    assert!(matches!(err, StencilError::Map(MapError::SizeMismatch { .. })));
}
