//! Auxiliary arrays read alongside the stencil source.

use ndarray::{ArrayBase, Data, IxDyn};
use stencils_core::MapError;

/// Extra arrays whose value at each center is passed to the mapped
/// function next to the neighborhood.
///
/// Implemented for `()` (no auxiliary arrays) and for tuples of one to
/// four `&ArrayBase<_, IxDyn>`. Each array must have exactly the logical
/// shape of the source; the function receives a tuple of references to
/// the elements at the center index.
pub trait AuxArrays: Sync {
    /// What the mapped function receives per center.
    type Item;

    /// Check every array against the source's logical shape.
    fn check(&self, shape: &[usize]) -> Result<(), MapError>;

    /// Elements at `idx`. `idx` must be in bounds.
    fn at(&self, idx: &[usize]) -> Self::Item;
}

impl AuxArrays for () {
    type Item = ();

    fn check(&self, _shape: &[usize]) -> Result<(), MapError> {
        Ok(())
    }

    fn at(&self, _idx: &[usize]) -> Self::Item {}
}

fn check_one(position: usize, got: &[usize], expected: &[usize]) -> Result<(), MapError> {
    let array = format!("aux {position}");
    if got.len() != expected.len() {
        return Err(MapError::DimensionMismatch {
            array,
            expected: expected.len(),
            got: got.len(),
        });
    }
    if got != expected {
        return Err(MapError::SizeMismatch {
            array,
            expected: format!("{expected:?}"),
            got: got.to_vec(),
        });
    }
    Ok(())
}

macro_rules! impl_aux_tuple {
    ($(($n:tt, $elem:ident, $repr:ident)),+) => {
        impl<'x, $($elem, $repr),+> AuxArrays for ($(&'x ArrayBase<$repr, IxDyn>,)+)
        where
            $($elem: 'x, $repr: Data<Elem = $elem>, ArrayBase<$repr, IxDyn>: Sync,)+
        {
            type Item = ($(&'x $elem,)+);

            fn check(&self, shape: &[usize]) -> Result<(), MapError> {
                $(check_one($n, self.$n.shape(), shape)?;)+
                Ok(())
            }

            fn at(&self, idx: &[usize]) -> Self::Item {
                ($(&self.$n[idx],)+)
            }
        }
    };
}

impl_aux_tuple!((0, A0, S0));
impl_aux_tuple!((0, A0, S0), (1, A1, S1));
impl_aux_tuple!((0, A0, S0), (1, A1, S1), (2, A2, S2));
impl_aux_tuple!((0, A0, S0), (1, A1, S1), (2, A2, S2), (3, A3, S3));

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::ArrayD;

    #[test]
    fn unit_always_passes() {
        assert!(().check(&[3, 3]).is_ok());
    }

    #[test]
    fn tuple_reads_each_array() {
        let a = ArrayD::from_shape_fn(IxDyn(&[2, 2]), |i| i[0] * 10 + i[1]);
        let b = ArrayD::from_elem(IxDyn(&[2, 2]), 'x');
        let aux = (&a, &b.view());
        assert!(aux.check(&[2, 2]).is_ok());
        assert_eq!(aux.at(&[1, 1]), (&11, &'x'));
    }

    #[test]
    fn names_the_offending_array() {
        let a = ArrayD::from_elem(IxDyn(&[2, 2]), 0.0);
        let b = ArrayD::from_elem(IxDyn(&[2, 3]), 0.0);
        let c = ArrayD::from_elem(IxDyn(&[2]), 0.0);

        let err = (&a, &b).check(&[2, 2]).unwrap_err();
        assert_eq!(
            err,
            MapError::SizeMismatch {
                array: "aux 1".into(),
                expected: "[2, 2]".into(),
                got: vec![2, 3]
            }
        );

        let err = (&a, &a, &c).check(&[2, 2]).unwrap_err();
        assert_eq!(
            err,
            MapError::DimensionMismatch {
                array: "aux 2".into(),
                expected: 2,
                got: 1
            }
        );
    }
}
