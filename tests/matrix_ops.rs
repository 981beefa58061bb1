//! Tests for Matrix arithmetic: broadcasting element-wise ops, matrix product and power.
//!
//! These tests check the worked example from the docs by hand and verify the
//! algebraic properties of the operations on random matrices.

use approx::assert_abs_diff_eq;
use faer::Mat;
use matwrap::{DType, MatError, Matrix};
use rand::Rng;

fn random_matrix(nrows: usize, ncols: usize) -> Matrix {
    let mut rng = rand::thread_rng();
    let vals: Vec<f64> = (0..nrows * ncols).map(|_| rng.r#gen::<f64>() * 10.0 - 5.0).collect();
    Matrix::new(Mat::from_fn(nrows, ncols, |i, j| vals[j * nrows + i])).unwrap()
}

fn assert_close(a: &Matrix, b: &Matrix) {
    assert_eq!(a.shape(), b.shape());
    let (nrows, ncols) = a.shape();
    for i in 0..nrows {
        for j in 0..ncols {
            assert_abs_diff_eq!(a.get(i, j).unwrap(), b.get(i, j).unwrap(), epsilon = 1e-10);
        }
    }
}

/// Walk through `(A + B) @ (A - B) ** 2` step by step with a broadcast row `B`.
#[test]
fn worked_example() {
    let a = Matrix::from_rows(&[[1, 2], [3, 4]]).unwrap();
    let b = Matrix::from_row(&[5, 6]).unwrap();
    assert_eq!(b.shape(), (1, 2));

    let sum = a.add(&b).unwrap();
    assert_eq!(sum.to_rows(), vec![vec![6.0, 8.0], vec![8.0, 10.0]]);
    let diff = a.sub(&b).unwrap();
    assert_eq!(diff.to_rows(), vec![vec![-4.0, -4.0], vec![-2.0, -2.0]]);
    let squared = diff.pow(2).unwrap();
    assert_eq!(squared.to_rows(), vec![vec![16.0, 16.0], vec![4.0, 4.0]]);
    let result = sum.matmul(&squared).unwrap();
    assert_eq!(result.to_rows(), vec![vec![128.0, 128.0], vec![168.0, 168.0]]);
    assert_eq!(result.dtype(), DType::Int);
    assert_eq!(result.to_string(), "[[128 128]\n [168 168]]");
}

/// Operands are borrowed and never modified.
#[test]
fn operands_are_not_mutated() {
    let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    let b = Matrix::from_row(&[5.0, 6.0]).unwrap();
    let (a0, b0) = (a.clone(), b.clone());
    let _ = a.add(&b).unwrap().mul(&b).unwrap().matmul(&a).unwrap().pow(3).unwrap();
    assert_eq!(a, a0);
    assert_eq!(b, b0);
}

/// `(A + B) - B == A` when `B` broadcasts into `A`.
#[test]
fn add_then_sub_is_identity() {
    let a = random_matrix(4, 3);
    for b in [random_matrix(4, 3), random_matrix(1, 3), random_matrix(4, 1), random_matrix(1, 1)] {
        assert_close(&a.add(&b).unwrap().sub(&b).unwrap(), &a);
    }
}

/// Element-wise multiplication commutes for equal shapes.
#[test]
fn mul_is_commutative() {
    let a = random_matrix(3, 5);
    let b = random_matrix(3, 5);
    assert_close(&a.mul(&b).unwrap(), &b.mul(&a).unwrap());
}

/// `A ** 1 == A` for integer and float exponents.
#[test]
fn pow_one_is_identity() {
    let a = random_matrix(3, 3);
    assert_close(&a.pow(1).unwrap(), &a);
    assert_close(&a.pow(1.0).unwrap(), &a);
}

/// Matrix product shapes and values against a manual triple loop.
#[test]
fn matmul_matches_manual_product() {
    let (m, k, n) = (4, 3, 2);
    let a = random_matrix(m, k);
    let b = random_matrix(k, n);
    let c = a.matmul(&b).unwrap();
    assert_eq!(c.shape(), (m, n));
    for i in 0..m {
        for j in 0..n {
            let expected: f64 = (0..k).map(|p| a.get(i, p).unwrap() * b.get(p, j).unwrap()).sum();
            assert_abs_diff_eq!(c.get(i, j).unwrap(), expected, epsilon = 1e-10);
        }
    }
}

/// Inner dimension mismatch is a dimension error, never broadcast.
#[test]
fn matmul_dimension_mismatch() {
    let a = random_matrix(2, 3);
    let b = random_matrix(2, 3);
    match a.matmul(&b) {
        Err(MatError::Dimension { lhs, rhs }) => {
            assert_eq!(lhs, (2, 3));
            assert_eq!(rhs, (2, 3));
        }
        other => panic!("expected dimension error, got {other:?}"),
    }
    let row = random_matrix(1, 3);
    assert!(matches!(row.matmul(&random_matrix(1, 3)), Err(MatError::Dimension { .. })));
}

/// Shapes that are neither equal nor 1 on an axis cannot broadcast.
#[test]
fn incompatible_broadcast() {
    let a = random_matrix(2, 3);
    let b = random_matrix(3, 3);
    for r in [a.add(&b), a.sub(&b), a.mul(&b)] {
        assert!(matches!(r, Err(MatError::Broadcast { lhs: (2, 3), rhs: (3, 3) })));
    }
}

/// A row against a column broadcasts to the outer shape.
#[test]
fn row_and_column_broadcast() {
    let row = Matrix::from_row(&[1, 2, 3]).unwrap();
    let col = Matrix::from_rows(&[[10], [20]]).unwrap();
    let sum = row.add(&col).unwrap();
    assert_eq!(sum.shape(), (2, 3));
    assert_eq!(sum.to_rows(), vec![vec![11.0, 12.0, 13.0], vec![21.0, 22.0, 23.0]]);
}

/// Mixing integer and float operands promotes to float.
#[test]
fn dtype_promotion() {
    let i = Matrix::from_row(&[1, 2]).unwrap();
    let f = Matrix::from_row(&[0.5, 0.5]).unwrap();
    assert_eq!(i.add(&i).unwrap().dtype(), DType::Int);
    assert_eq!(i.add(&f).unwrap().dtype(), DType::Float);
    assert_eq!(f.matmul(&Matrix::from_rows(&[[1], [1]]).unwrap()).unwrap().dtype(), DType::Float);
}

/// Integer results wrap like `int64` arrays instead of losing precision.
#[test]
fn integer_overflow_wraps() {
    let ten = Matrix::from_row(&[10]).unwrap();
    let big = ten.pow(20).unwrap();
    assert_eq!(big.dtype(), DType::Int);
    assert_eq!(big.get_int(0, 0), Some(7_766_279_631_452_241_920));
    assert_eq!(big.to_string(), "[[7766279631452241920]]");

    let max = Matrix::from_row(&[i64::MAX, 1]).unwrap();
    let one = Matrix::from_row(&[1]).unwrap();
    assert_eq!(max.add(&one).unwrap().get_int(0, 0), Some(i64::MIN));
    assert_eq!(max.mul(&max).unwrap().get_int(0, 0), Some(1));

    let exact = Matrix::from_row(&[(1i64 << 53) + 1]).unwrap();
    assert_eq!(exact.sub(&one).unwrap().get_int(0, 0), Some(1 << 53));
}

/// Wide integer exponents are accepted and follow the same rules.
#[test]
fn wide_exponents() {
    let a = Matrix::from_row(&[2, 3]).unwrap();
    assert_eq!(a.pow(3usize).unwrap().to_string(), "[[ 8 27]]");
    assert_eq!(a.pow(2u64).unwrap().get_int(0, 1), Some(9));
    assert_eq!(a.pow(2i128).unwrap().dtype(), DType::Int);
    assert!(matches!(a.pow(-1isize), Err(MatError::Domain(_))));
    assert!(matches!(a.pow(1i64 << 40), Err(MatError::Domain(_))));
}
