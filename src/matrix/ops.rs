//! Arithmetic on `Matrix`: broadcasting element-wise ops, matrix product and power.
//!
//! Broadcasting is ndarray's: both operands are broadcast to the larger extent
//! on each axis and `ArrayBase::broadcast` decides whether that is possible.
//! Integer operands stay `i64` with wrapping arithmetic; any float operand
//! promotes the pair to `f64`. The matrix product is ndarray's `dot`.

use super::dense::{Buffer, Matrix};
use crate::error::MatError;
use ndarray::{Array2, ArrayView2, Zip};

/// Scalar exponent for [`Matrix::pow`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Exponent {
    Int(i64),
    Float(f64),
}

macro_rules! impl_exponent_from {
    ($kind:ident as $target:ty: $($t:ty),*) => {
        $(impl From<$t> for Exponent {
            fn from(v: $t) -> Self {
                Exponent::$kind(v as $target)
            }
        })*
    };
}

impl_exponent_from!(Int as i64: i8, i16, i32, i64, u8, u16, u32);
impl_exponent_from!(Float as f64: f32, f64);

// Integers that may not fit in i64 fall back to a float exponent.
macro_rules! impl_exponent_try_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Exponent {
            fn from(v: $t) -> Self {
                i64::try_from(v).map_or(Exponent::Float(v as f64), Exponent::Int)
            }
        })*
    };
}

impl_exponent_try_from!(u64, usize, isize, i128, u128);

/// Broadcast two views to a common shape, or fail with both original shapes.
fn broadcast_pair<'a, T>(
    lhs: &'a ArrayView2<'_, T>,
    rhs: &'a ArrayView2<'_, T>,
) -> Result<(ArrayView2<'a, T>, ArrayView2<'a, T>), MatError> {
    let (l, r) = (lhs.dim(), rhs.dim());
    let target = (l.0.max(r.0), l.1.max(r.1));
    match (lhs.broadcast(target), rhs.broadcast(target)) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(MatError::Broadcast { lhs: l, rhs: r }),
    }
}

fn zip_with<T: Copy, R>(
    lhs: ArrayView2<'_, T>,
    rhs: ArrayView2<'_, T>,
    f: impl Fn(T, T) -> R,
) -> Result<Array2<R>, MatError> {
    let (x, y) = broadcast_pair(&lhs, &rhs)?;
    Ok(Zip::from(&x).and(&y).map_collect(|&a, &b| f(a, b)))
}

impl Matrix {
    fn elementwise(
        &self,
        other: &Matrix,
        int_op: fn(i64, i64) -> i64,
        float_op: fn(f64, f64) -> f64,
    ) -> Result<Matrix, MatError> {
        let data = match (self.buffer(), other.buffer()) {
            (Buffer::Int(a), Buffer::Int(b)) => Buffer::Int(zip_with(a.view(), b.view(), int_op)?),
            _ => {
                let (a, b) = (self.as_float(), other.as_float());
                Buffer::Float(zip_with(a.view(), b.view(), float_op)?)
            }
        };
        Matrix::from_buffer(data)
    }

    /// Element-wise sum with broadcasting.
    pub fn add(&self, other: &Matrix) -> Result<Matrix, MatError> {
        log::trace!("add {:?} + {:?}", self.shape(), other.shape());
        self.elementwise(other, i64::wrapping_add, |x, y| x + y)
    }

    /// Element-wise difference with broadcasting.
    pub fn sub(&self, other: &Matrix) -> Result<Matrix, MatError> {
        log::trace!("sub {:?} - {:?}", self.shape(), other.shape());
        self.elementwise(other, i64::wrapping_sub, |x, y| x - y)
    }

    /// Element-wise (Hadamard) product with broadcasting. Not the matrix product.
    pub fn mul(&self, other: &Matrix) -> Result<Matrix, MatError> {
        log::trace!("mul {:?} * {:?}", self.shape(), other.shape());
        self.elementwise(other, i64::wrapping_mul, |x, y| x * y)
    }

    /// Matrix product: `(m, k) @ (k, n) -> (m, n)`. No broadcasting.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix, MatError> {
        log::trace!("matmul {:?} @ {:?}", self.shape(), other.shape());
        if self.ncols() != other.nrows() {
            return Err(MatError::Dimension {
                lhs: self.shape(),
                rhs: other.shape(),
            });
        }
        let data = match (self.buffer(), other.buffer()) {
            (Buffer::Int(a), Buffer::Int(b)) => Buffer::Int(a.dot(b)),
            _ => Buffer::Float(self.as_float().dot(&other.as_float())),
        };
        Matrix::from_buffer(data)
    }

    /// Raise every element to `power`.
    ///
    /// Integer matrices stay integer (wrapping on overflow) under a
    /// non-negative integer exponent and reject negative integer exponents.
    /// A negative base with a fractional exponent gives NaN.
    pub fn pow(&self, power: impl Into<Exponent>) -> Result<Matrix, MatError> {
        let power = power.into();
        log::trace!("pow {:?} ** {:?}", self.shape(), power);
        let data = match (self.buffer(), power) {
            (Buffer::Int(_), Exponent::Int(e)) if e < 0 => {
                return Err(MatError::Domain(
                    "Integers to negative integer powers are not allowed",
                ));
            }
            (Buffer::Int(a), Exponent::Int(e)) => {
                let e = u32::try_from(e)
                    .map_err(|_| MatError::Domain("integer exponent exceeds u32 range"))?;
                Buffer::Int(a.mapv(|v| v.wrapping_pow(e)))
            }
            (Buffer::Float(a), Exponent::Int(e)) => match i32::try_from(e) {
                Ok(e) => Buffer::Float(a.mapv(|v| v.powi(e))),
                Err(_) => Buffer::Float(a.mapv(|v| v.powf(e as f64))),
            },
            (_, Exponent::Float(e)) => Buffer::Float(self.as_float().mapv(|v| v.powf(e))),
        };
        Matrix::from_buffer(data)
    }
}
