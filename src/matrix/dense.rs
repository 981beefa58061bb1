//! Dense matrix wrapper on top of ndarray.
//!
//! `Matrix` owns exactly one rank-2 buffer, either `Array2<i64>` or
//! `Array2<f64>`. Construction normalises 1-D input to a single row so it can
//! broadcast against 2-D operands; every other operation lives in
//! [`super::ops`] and returns a fresh `Matrix`. Faer buffers are accepted and
//! produced at the edges for interop.

use crate::error::MatError;
use faer::{ColRef, Mat};
use ndarray::{Array, Array2, ArrayView2, Axis, CowArray, Dimension, Ix2};
use num_traits::ToPrimitive;
use std::fmt::Display;

/// Element kind of the stored buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DType {
    Int,
    Float,
}

/// The stored rank-2 buffer.
#[derive(Clone, Debug, PartialEq)]
pub enum Buffer {
    Int(Array2<i64>),
    Float(Array2<f64>),
}

impl Buffer {
    pub fn dim(&self) -> (usize, usize) {
        match self {
            Buffer::Int(a) => a.dim(),
            Buffer::Float(a) => a.dim(),
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            Buffer::Int(_) => DType::Int,
            Buffer::Float(_) => DType::Float,
        }
    }
}

/// Primitive scalars accepted by the typed constructors.
pub trait Element: Copy + ToPrimitive + Display {
    const DTYPE: DType;
}

macro_rules! impl_element {
    ($kind:ident: $($t:ty),*) => {
        $(impl Element for $t {
            const DTYPE: DType = DType::$kind;
        })*
    };
}

impl_element!(Int: i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_element!(Float: f32, f64);

/// Element types an ndarray buffer can hold directly.
pub trait Native: Clone {
    fn wrap(data: Array2<Self>) -> Buffer;
}

impl Native for i64 {
    fn wrap(data: Array2<i64>) -> Buffer {
        Buffer::Int(data)
    }
}

impl Native for f64 {
    fn wrap(data: Array2<f64>) -> Buffer {
        Buffer::Float(data)
    }
}

fn collect<T: Element>(
    nrows: usize,
    ncols: usize,
    at: impl Fn(usize, usize) -> T,
) -> Result<Buffer, MatError> {
    let cells = (0..nrows).flat_map(|i| (0..ncols).map(move |j| (i, j)));
    match T::DTYPE {
        DType::Int => {
            let values = cells
                .map(|(i, j)| {
                    let v = at(i, j);
                    v.to_i64().ok_or_else(|| MatError::Overflow(v.to_string()))
                })
                .collect::<Result<Vec<i64>, MatError>>()?;
            Ok(Buffer::Int(Array2::from_shape_vec((nrows, ncols), values)?))
        }
        DType::Float => {
            let values: Vec<f64> = cells
                .map(|(i, j)| at(i, j).to_f64().unwrap_or(f64::NAN))
                .collect();
            Ok(Buffer::Float(Array2::from_shape_vec((nrows, ncols), values)?))
        }
    }
}

/// Immutable rank-2 numeric buffer.
#[derive(Clone)]
pub struct Matrix {
    data: Buffer,
}

impl Matrix {
    pub(crate) fn from_buffer(data: Buffer) -> Result<Self, MatError> {
        let (nrows, ncols) = data.dim();
        if nrows == 0 || ncols == 0 {
            return Err(MatError::Empty("matrix must have at least one row and one column"));
        }
        Ok(Matrix { data })
    }

    /// Wrap an ndarray buffer of rank 1 or 2. Rank 1 becomes a single row.
    pub fn from_array<T: Native, D: Dimension>(data: Array<T, D>) -> Result<Self, MatError> {
        let data = data.into_dyn();
        let data = match data.ndim() {
            1 => data.insert_axis(Axis(0)),
            2 => data,
            n => return Err(MatError::Rank(n)),
        };
        Self::from_buffer(T::wrap(data.into_dimensionality::<Ix2>()?))
    }

    /// Wrap a Faer buffer as a float matrix.
    pub fn new(data: Mat<f64>) -> Result<Self, MatError> {
        let (nrows, ncols) = (data.nrows(), data.ncols());
        Self::from_buffer(Buffer::Float(Array2::from_shape_fn((nrows, ncols), |(i, j)| {
            data[(i, j)]
        })))
    }

    /// Build from a 1-D Faer column, reshaped to a single row `(1, n)`.
    pub fn from_vector(values: ColRef<'_, f64>) -> Result<Self, MatError> {
        let n = values.nrows();
        Self::from_buffer(Buffer::Float(Array2::from_shape_fn((1, n), |(_, j)| values[j])))
    }

    /// Build from a 1-D sequence, reshaped to a single row `(1, n)`.
    pub fn from_row<T: Element>(values: &[T]) -> Result<Self, MatError> {
        Self::from_buffer(collect(1, values.len(), |_, j| values[j])?)
    }

    /// Build from nested rows. All rows must have the same length.
    pub fn from_rows<T: Element, R: AsRef<[T]>>(rows: &[R]) -> Result<Self, MatError> {
        let nrows = rows.len();
        if nrows == 0 {
            return Err(MatError::Empty("no rows"));
        }
        let ncols = rows[0].as_ref().len();
        for (row, r) in rows.iter().enumerate() {
            let found = r.as_ref().len();
            if found != ncols {
                return Err(MatError::Ragged { row, expected: ncols, found });
            }
        }
        Self::from_buffer(collect(nrows, ncols, |i, j| rows[i].as_ref()[j])?)
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn nrows(&self) -> usize {
        self.shape().0
    }

    pub fn ncols(&self) -> usize {
        self.shape().1
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn buffer(&self) -> &Buffer {
        &self.data
    }

    /// The integer buffer, if this is an integer matrix.
    pub fn as_int(&self) -> Option<ArrayView2<'_, i64>> {
        match &self.data {
            Buffer::Int(a) => Some(a.view()),
            Buffer::Float(_) => None,
        }
    }

    /// Float view of the buffer; integer buffers are converted.
    pub fn as_float(&self) -> CowArray<'_, f64, Ix2> {
        match &self.data {
            Buffer::Int(a) => CowArray::from(a.mapv(|v| v as f64)),
            Buffer::Float(a) => CowArray::from(a.view()),
        }
    }

    /// Element at `(i, j)` as `f64`, or `None` when out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        match &self.data {
            Buffer::Int(a) => a.get((i, j)).map(|&v| v as f64),
            Buffer::Float(a) => a.get((i, j)).copied(),
        }
    }

    /// Integer element at `(i, j)`; `None` for float matrices or out of bounds.
    pub fn get_int(&self, i: usize, j: usize) -> Option<i64> {
        self.as_int().and_then(|a| a.get((i, j)).copied())
    }

    /// Float copy as a Faer buffer.
    pub fn to_mat(&self) -> Mat<f64> {
        let a = self.as_float();
        Mat::from_fn(self.nrows(), self.ncols(), |i, j| a[[i, j]])
    }

    /// Row-major float copy of the elements.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.as_float().outer_iter().map(|row| row.to_vec()).collect()
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        match (&self.data, &other.data) {
            (Buffer::Int(a), Buffer::Int(b)) => a == b,
            _ => self.as_float() == other.as_float(),
        }
    }
}
