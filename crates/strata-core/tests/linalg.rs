//! End-to-end numeric checks for the linear algebra surface.

use approx::assert_abs_diff_eq;
use strata_core::linalg::{self, CholeskyDecomposition, LuDecomposition};
use strata_core::prelude::*;

fn assert_all_close(actual: &Tensor<f64>, expected: &[f64], epsilon: f64) {
    assert_eq!(actual.numel(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert_abs_diff_eq!(a, *e, epsilon = epsilon);
    }
}

#[test]
fn determinant_examples() {
    let a = Tensor::from_vec(vec![4.0, 3.0, 6.0, 3.0], vec![2, 2]).unwrap();
    assert_abs_diff_eq!(a.determinant().unwrap(), -6.0);

    for n in 1..=5 {
        let eye = Tensor::<f64>::identity(n).unwrap();
        assert_abs_diff_eq!(linalg::det(&eye).unwrap(), 1.0);
    }
}

#[test]
fn matmul_example() {
    let a = Tensor::from_vec(vec![1, 2, 3, 4], vec![2, 2]).unwrap();
    let b = Tensor::from_vec(vec![5, 6, 7, 8], vec![2, 2]).unwrap();
    assert_eq!(a.matmul(&b).unwrap().to_vec(), vec![19, 22, 43, 50]);
}

#[test]
fn inverse_example() {
    let a = Tensor::from_vec(vec![4.0, 7.0, 2.0, 6.0], vec![2, 2]).unwrap();
    let inv = a.inverse().unwrap();
    assert_all_close(&inv, &[0.6, -0.7, -0.2, 0.4], 1e-9);

    let eye = a.matmul(&inv).unwrap();
    assert_all_close(&eye, &[1.0, 0.0, 0.0, 1.0], 1e-12);
}

#[test]
fn inverse_reports_zero_pivot() {
    let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 2.0, 4.0, 1.0, 1.0, 0.0, 5.0], vec![3, 3]).unwrap();
    // Row 1 minus twice row 0 leaves a zero in position (1, 1)
    let err = a.inverse().unwrap_err();
    assert_eq!(err, CoreError::SingularMatrix { pivot: 1 });
    assert_eq!(err.kind(), ErrorKind::SingularMatrix);
}

#[test]
fn inverse_in_place_is_visible_through_aliases() {
    let buf = SharedBuffer::new(vec![4.0, 7.0, 2.0, 6.0]);
    let mut a = Tensor::from_shared(buf.clone(), vec![2, 2], &TensorOptions::new()).unwrap();
    let flat = Tensor::from_shared(buf, vec![4], &TensorOptions::new()).unwrap();

    let inv = a.inverse_in_place().unwrap();
    assert_all_close(&inv, &[0.6, -0.7, -0.2, 0.4], 1e-9);
    assert_all_close(&flat, &[1.0, 0.0, 0.0, 1.0], 1e-12);
}

#[test]
fn lu_reconstructs_input() {
    let a = Tensor::from_vec(
        vec![2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 2.0],
        vec![3, 3],
    )
    .unwrap();
    let (l, u) = a.lu_decomposition().unwrap();
    assert_all_close(&l.matmul(&u).unwrap(), &a.to_vec(), 1e-12);

    let lu = LuDecomposition::decompose(&a).unwrap();
    assert_abs_diff_eq!(lu.det(), a.determinant().unwrap(), epsilon = 1e-12);
}

#[test]
fn cholesky_reconstructs_input() {
    let a = Tensor::from_vec(vec![4.0, 12.0, -16.0, 12.0, 37.0, -43.0, -16.0, -43.0, 98.0], vec![3, 3])
        .unwrap();
    let l = a.cholesky_decomposition(f64::sqrt).unwrap();
    assert_all_close(&l, &[2.0, 0.0, 0.0, 6.0, 1.0, 0.0, -8.0, 5.0, 3.0], 1e-12);
    let llt = l.matmul(&linalg::transpose(&l).unwrap()).unwrap();
    assert_all_close(&llt, &a.to_vec(), 1e-12);

    let b = Tensor::from_vec(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
    let x = CholeskyDecomposition::decompose(&a).unwrap().solve(&b).unwrap();
    assert_all_close(&a.matvec(&x).unwrap(), &[1.0, 2.0, 3.0], 1e-9);
}

#[test]
fn solve_agrees_with_inverse() {
    let a = Tensor::from_vec(vec![3.0, 2.0, -1.0, 2.0, -2.0, 4.0, -1.0, 0.5, -1.0], vec![3, 3]).unwrap();
    let b = Tensor::from_vec(vec![1.0, -2.0, 0.0], vec![3]).unwrap();
    let x = linalg::solve(&a, &b).unwrap();
    assert_all_close(&x, &[1.0, -2.0, -2.0], 1e-10);

    let via_inverse = a.inverse().unwrap().matvec(&b).unwrap();
    assert_all_close(&via_inverse, &x.to_vec(), 1e-10);
}

#[test]
fn eigen_and_svd_agree_on_spd_matrix() {
    // For a symmetric positive-definite matrix, singular values equal eigenvalues
    let a = Tensor::from_vec(vec![4.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 2.0], vec![3, 3]).unwrap();
    let (values, _) = a.eigen().unwrap();
    let (_, s, _) = a.svd().unwrap();
    for i in 0..3 {
        assert_abs_diff_eq!(
            values.get(&[i]).unwrap(),
            s.get(&[i, i]).unwrap(),
            epsilon = 1e-9
        );
    }
}

#[test]
fn strided_operands_give_logical_results() {
    // [[1, 2], [3, 4]] stored column-major at offset 1
    let opts = TensorOptions::new().layout(Layout::ColumnMajor).offset(1);
    let a = Tensor::from_vec_with(vec![0.0, 1.0, 3.0, 2.0, 4.0], vec![2, 2], &opts).unwrap();
    let b = Tensor::from_vec(vec![1.0, 1.0, 1.0, 1.0], vec![2, 2]).unwrap();

    assert_all_close(&(&a + &b), &[2.0, 3.0, 4.0, 5.0], 0.0);
    assert_all_close(&a.transpose().unwrap(), &[1.0, 3.0, 2.0, 4.0], 0.0);
    assert_abs_diff_eq!(a.determinant().unwrap(), -2.0);
}
