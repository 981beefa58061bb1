//! Text rendering for `Matrix`.
//!
//! `Display` prints the plain buffer form (`[[1 2]\n [3 4]]`), `Debug` the
//! constructor-style form (`Matrix(array([[1, 2],\n       [3, 4]]))`).
//! Elements in a matrix share one column width. Integers print exactly.
//! Floats print positionally with at most 8 fractional digits, trailing zeros
//! dropped and aligned on the point, unless the magnitudes call for
//! scientific notation (`1.e-10`), as numpy decides it.

use super::dense::{Buffer, Matrix};
use ndarray::ArrayView2;
use std::fmt;

const FLOAT_PRECISION: usize = 8;

/// One rendered float: integer text and everything after the point, or a
/// non-finite word.
enum Part {
    Number { int: String, tail: String },
    Special(&'static str),
}

fn special(v: f64) -> Part {
    Part::Special(if v.is_nan() {
        "nan"
    } else if v > 0.0 {
        "inf"
    } else {
        "-inf"
    })
}

/// Scientific notation when the nonzero finite magnitudes span too wide a range.
fn use_scientific(a: &ArrayView2<'_, f64>) -> bool {
    let mut magnitudes = a.iter().map(|v| v.abs()).filter(|v| v.is_finite() && *v != 0.0);
    let Some(first) = magnitudes.next() else {
        return false;
    };
    let (min, max) = magnitudes.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    max >= 1e8 || min < 1e-4 || max / min > 1e3
}

fn positional(v: f64) -> Part {
    if !v.is_finite() {
        return special(v);
    }
    let s = format!("{:.*}", FLOAT_PRECISION, v);
    match s.split_once('.') {
        Some((int, frac)) => Part::Number {
            int: int.to_string(),
            tail: frac.trim_end_matches('0').to_string(),
        },
        None => Part::Number { int: s, tail: String::new() },
    }
}

fn split_exp(s: &str) -> (&str, &str, i32) {
    let (mantissa, exp) = s.split_once('e').unwrap_or((s, "0"));
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    (int, frac, exp.parse().unwrap_or(0))
}

/// Shared mantissa precision is the longest shortest-round-trip mantissa;
/// exponents have at least two digits.
fn scientific(a: &ArrayView2<'_, f64>) -> Vec<Part> {
    let precision = a
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| split_exp(&format!("{v:e}")).1.len())
        .max()
        .unwrap_or(0);
    let exp_width = a
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| split_exp(&format!("{v:e}")).2.unsigned_abs().to_string().len())
        .fold(2, usize::max);
    a.iter()
        .map(|&v| {
            if !v.is_finite() {
                return special(v);
            }
            let s = format!("{v:.precision$e}");
            let (int, frac, exp) = split_exp(&s);
            let sign = if exp < 0 { '-' } else { '+' };
            Part::Number {
                int: int.to_string(),
                tail: format!("{frac}e{sign}{:0>exp_width$}", exp.unsigned_abs()),
            }
        })
        .collect()
}

fn float_cells(a: ArrayView2<'_, f64>) -> Vec<String> {
    let parts = if use_scientific(&a) {
        scientific(&a)
    } else {
        a.iter().map(|&v| positional(v)).collect()
    };
    let numbers = || {
        parts.iter().filter_map(|p| match p {
            Part::Number { int, tail } => Some((int.len(), tail.len())),
            Part::Special(_) => None,
        })
    };
    let int_w = numbers().map(|(i, _)| i).max().unwrap_or(0);
    let tail_w = numbers().map(|(_, t)| t).max().unwrap_or(0);
    let width = int_w + 1 + tail_w;
    parts
        .into_iter()
        .map(|p| match p {
            Part::Number { int, tail } => format!("{int:>int_w$}.{tail:<tail_w$}"),
            Part::Special(s) => format!("{s:>width$}"),
        })
        .collect()
}

fn int_cells(a: ArrayView2<'_, i64>) -> Vec<String> {
    let text: Vec<String> = a.iter().map(i64::to_string).collect();
    let width = text.iter().map(String::len).max().unwrap_or(0);
    text.into_iter().map(|s| format!("{s:>width$}")).collect()
}

fn render(m: &Matrix, sep: &str, row_sep: &str) -> String {
    let cells = match m.buffer() {
        Buffer::Int(a) => int_cells(a.view()),
        Buffer::Float(a) => float_cells(a.view()),
    };
    let rows: Vec<String> = cells
        .chunks(m.ncols())
        .map(|r| format!("[{}]", r.join(sep)))
        .collect();
    format!("[{}]", rows.join(row_sep))
}

impl Matrix {
    /// Constructor-style rendering of the buffer alone: `array([[1, 2],\n       [3, 4]])`.
    pub fn repr_buffer(&self) -> String {
        format!("array({})", render(self, ", ", ",\n       "))
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, " ", "\n "))
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matrix({})", self.repr_buffer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_display_and_repr() {
        let m = Matrix::from_rows(&[[1, 2], [3, 40]]).unwrap();
        assert_eq!(m.to_string(), "[[ 1  2]\n [ 3 40]]");
        assert_eq!(
            format!("{m:?}"),
            "Matrix(array([[ 1,  2],\n       [ 3, 40]]))"
        );
    }

    #[test]
    fn float_display_aligns_on_point() {
        let m = Matrix::from_rows(&[[1.0, 2.5], [3.0, -4.0]]).unwrap();
        assert_eq!(m.to_string(), "[[ 1.   2.5]\n [ 3.  -4. ]]");
    }

    #[test]
    fn non_finite_values() {
        let m = Matrix::from_row(&[f64::NAN, 1.5]).unwrap();
        assert_eq!(m.to_string(), "[[nan 1.5]]");
        let m = Matrix::from_row(&[f64::NAN, 1e-10]).unwrap();
        assert_eq!(m.to_string(), "[[   nan 1.e-10]]");
    }

    #[test]
    fn wide_magnitudes_switch_to_scientific() {
        let m = Matrix::from_row(&[1e-10]).unwrap();
        assert_eq!(m.to_string(), "[[1.e-10]]");
        assert_eq!(format!("{m:?}"), "Matrix(array([[1.e-10]]))");
        assert_eq!(Matrix::from_row(&[1e20]).unwrap().to_string(), "[[1.e+20]]");
        assert_eq!(
            Matrix::from_row(&[1.0, 1.5e4]).unwrap().to_string(),
            "[[1.0e+00 1.5e+04]]"
        );
        assert_eq!(
            Matrix::from_row(&[-1e-5, 1.0]).unwrap().to_string(),
            "[[-1.e-05  1.e+00]]"
        );
        assert_eq!(
            Matrix::from_row(&[1e-300, 1e-10]).unwrap().to_string(),
            "[[1.e-300 1.e-010]]"
        );
    }

    #[test]
    fn zeros_do_not_force_scientific() {
        let m = Matrix::from_row(&[0.0, 0.5]).unwrap();
        assert_eq!(m.to_string(), "[[0.  0.5]]");
    }

    #[test]
    fn large_integers_print_exactly() {
        let m = Matrix::from_row(&[(1i64 << 53) + 1, -1]).unwrap();
        assert_eq!(m.to_string(), "[[9007199254740993               -1]]");
    }
}
