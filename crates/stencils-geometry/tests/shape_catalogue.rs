use stencils_core::GeometryError;
use stencils_geometry::{Geometry, Kernel, Layered, Neighborhood, Shape, Stencil, MAX_RADIUS};

fn as_vecs<S: Stencil>(s: &S) -> Vec<Vec<i32>> {
    s.offsets().iter().map(|o| o.to_vec()).collect()
}

#[test]
fn closed_form_counts_in_2d() {
    for r in 1..=4u32 {
        let r_us = r as usize;
        assert_eq!(Geometry::window(r, 2).unwrap().len(), (2 * r_us + 1).pow(2));
        assert_eq!(Geometry::moore(r, 2).unwrap().len(), (2 * r_us + 1).pow(2) - 1);
        assert_eq!(Geometry::von_neumann(r, 2).unwrap().len(), 2 * r_us * (r_us + 1));
        assert_eq!(Geometry::diamond(r, 2).unwrap().len(), 2 * r_us * (r_us + 1) + 1);
        assert_eq!(Geometry::cross(r, 2).unwrap().len(), 4 * r_us + 1);
        assert_eq!(Geometry::horizontal(r, 2).unwrap().len(), 2 * r_us + 1);
        assert_eq!(Geometry::vertical(r, 2).unwrap().len(), 2 * r_us + 1);
        assert_eq!(Geometry::forward_slash(r, 2).unwrap().len(), 2 * r_us);
        assert_eq!(Geometry::back_slash(r, 2).unwrap().len(), 2 * r_us);
        assert_eq!(Geometry::angled_cross(r, 2).unwrap().len(), 4 * r_us);
        assert_eq!(Geometry::cardinal(r, 2).unwrap().len(), 4);
        assert_eq!(Geometry::ordinal(r, 2).unwrap().len(), 4);
    }
}

#[test]
fn circle_counts() {
    assert_eq!(Geometry::circle(1, 2).unwrap().len(), 4);
    assert_eq!(Geometry::circle(2, 2).unwrap().len(), 12);
    assert_eq!(Geometry::annulus(2, 1, 2).unwrap().len(), 8);
}

#[test]
fn moore_row_major_order() {
    let g = Geometry::moore(1, 2).unwrap();
    assert_eq!(
        as_vecs(&g),
        vec![
            vec![-1, -1],
            vec![-1, 0],
            vec![-1, 1],
            vec![0, -1],
            vec![0, 1],
            vec![1, -1],
            vec![1, 0],
            vec![1, 1],
        ]
    );
}

#[test]
fn window_lines_up_with_flattened_weights() {
    // A 3x3 window over a row-major weight block: position i is row i/3, col i%3.
    let g = Geometry::window(1, 2).unwrap();
    for (i, o) in g.offsets().iter().enumerate() {
        assert_eq!(o[0], (i / 3) as i32 - 1);
        assert_eq!(o[1], (i % 3) as i32 - 1);
    }
}

#[test]
fn slashes_in_2d() {
    assert_eq!(
        as_vecs(&Geometry::forward_slash(1, 2).unwrap()),
        vec![vec![-1, 1], vec![1, -1]]
    );
    assert_eq!(
        as_vecs(&Geometry::back_slash(1, 2).unwrap()),
        vec![vec![-1, -1], vec![1, 1]]
    );
}

#[test]
fn memoized_shapes_are_equal_to_fresh_builds() {
    let shape = Shape::Diamond {
        radius: 2,
        ndims: 3,
    };
    let a = Geometry::from_shape(shape).unwrap();
    let b = Geometry::diamond(2, 3).unwrap();
    assert!(Geometry::ptr_eq(&a, &b));
    assert_eq!(a.shape(), Some(shape));
}

#[test]
fn asymmetric_positional_radius() {
    let g = Geometry::positional([[0, 3], [-1, 0]]).unwrap();
    assert_eq!(g.radius(), 3);
    assert_eq!(g.diameter(), 7);
}

#[test]
fn kernel_over_layered_stencil() {
    let layered = Layered::new([
        Geometry::cardinal(1, 2).unwrap(),
        Geometry::ordinal(1, 2).unwrap(),
    ])
    .unwrap();
    let weights = vec![2i64, 2, 2, 2, 1, 1, 1, 1];
    let k = Kernel::new(layered, weights).unwrap();
    let hood = Neighborhood::new(&k, 0, std::iter::repeat(3i64).take(8).collect());
    assert_eq!(hood.kernel_product(), 3 * 12);
    assert_eq!(k.stencil().layer_count(), 2);
}

#[test]
fn oversized_radius_is_a_construction_error() {
    let err = Geometry::moore(u32::MAX, 1).unwrap_err();
    assert_eq!(
        err,
        GeometryError::RadiusTooLarge {
            radius: u32::MAX,
            max: MAX_RADIUS
        }
    );
    assert!(Geometry::circle(MAX_RADIUS + 1, 2).is_err());
    assert!(!stencils_geometry::cache::contains(&Shape::Moore {
        radius: u32::MAX,
        ndims: 1
    }));
}
