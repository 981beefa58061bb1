//! Construction from dynamically shaped nested input.
//!
//! A `serde_json::Value` (or a JSON literal such as `"[[1, 2], [3, 4]]"`) is
//! checked for numeric leaves and uniform nesting, turned into an ndarray
//! `ArrayD`, and handed to [`Matrix::from_array`] for the rank check.

use super::dense::Matrix;
use crate::error::MatError;
use ndarray::{ArrayD, IxDyn};
use serde_json::{Number, Value};
use std::str::FromStr;

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Shape of a nested value, outermost dimension first.
fn shape_of(v: &Value) -> Result<Vec<usize>, MatError> {
    match v {
        Value::Number(_) => Ok(Vec::new()),
        Value::Array(items) => {
            let Some(first) = items.first() else {
                return Ok(vec![0]);
            };
            let inner = shape_of(first)?;
            for (row, item) in items.iter().enumerate().skip(1) {
                let s = shape_of(item)?;
                if s != inner {
                    return Err(MatError::Ragged {
                        row,
                        expected: inner.first().copied().unwrap_or(0),
                        found: s.first().copied().unwrap_or(0),
                    });
                }
            }
            let mut shape = Vec::with_capacity(inner.len() + 1);
            shape.push(items.len());
            shape.extend(inner);
            Ok(shape)
        }
        other => Err(MatError::Type(format!(
            "data must be a numeric sequence, found {}",
            kind(other)
        ))),
    }
}

fn leaves<'a>(v: &'a Value, out: &mut Vec<&'a Number>) {
    match v {
        Value::Number(n) => out.push(n),
        Value::Array(items) => items.iter().for_each(|item| leaves(item, out)),
        _ => {}
    }
}

impl Matrix {
    /// Build from a nested JSON value of rank 1 or 2.
    ///
    /// All-integer input gives an integer matrix; integers beyond the `i64`
    /// range are rejected unless a float elsewhere makes the matrix float.
    pub fn from_value(value: &Value) -> Result<Self, MatError> {
        let shape = IxDyn(&shape_of(value)?);
        let mut numbers = Vec::new();
        leaves(value, &mut numbers);

        if numbers.iter().all(|n| n.is_i64() || n.is_u64()) {
            let values = numbers
                .iter()
                .map(|n| n.as_i64().ok_or_else(|| MatError::Overflow(n.to_string())))
                .collect::<Result<Vec<i64>, MatError>>()?;
            Matrix::from_array(ArrayD::from_shape_vec(shape, values)?)
        } else {
            let values: Vec<f64> = numbers
                .iter()
                .map(|n| n.as_f64().unwrap_or(f64::NAN))
                .collect();
            Matrix::from_array(ArrayD::from_shape_vec(shape, values)?)
        }
    }
}

impl FromStr for Matrix {
    type Err = MatError;

    /// Parse a JSON array literal, e.g. `"[[1, 2], [3, 4]]"` or `"[5, 6]"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(s)?;
        Matrix::from_value(&value)
    }
}
