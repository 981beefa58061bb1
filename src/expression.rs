//! The example expression `(A + B) @ (A - B) ** 2`, evaluated under an [`Instrument`].

use crate::core::traits::{Call, Instrument};
use crate::error::MatError;
use crate::matrix::Matrix;

/// Human-readable form of the expression computed by [`evaluate`].
pub const EXPRESSION: &str = "(A + B) @ (A - B) ** 2";

/// `A = [[1, 2], [3, 4]]` and `B = [5, 6]`, a row broadcast against `A`.
pub fn example_operands() -> Result<(Matrix, Matrix), MatError> {
    let a = Matrix::from_rows(&[[1, 2], [3, 4]])?;
    let b = Matrix::from_row(&[5, 6])?;
    Ok((a, b))
}

/// Compute `(a + b) @ (a - b) ** 2`, reporting each step to `inst`.
pub fn evaluate(a: &Matrix, b: &Matrix, inst: &mut impl Instrument) -> Result<Matrix, MatError> {
    inst.enter(Call::Evaluate);
    let out = steps(a, b, inst);
    inst.exit(Call::Evaluate);
    out
}

fn steps(a: &Matrix, b: &Matrix, inst: &mut impl Instrument) -> Result<Matrix, MatError> {
    let sum = inst.scope(Call::Add, || a.add(b))?;
    let diff = inst.scope(Call::Sub, || a.sub(b))?;
    let squared = inst.scope(Call::Pow, || diff.pow(2))?;
    inst.scope(Call::Matmul, || sum.matmul(&squared))
}

/// Evaluate the expression `iterations` times and return the last result.
pub fn compute(
    a: &Matrix,
    b: &Matrix,
    iterations: usize,
    inst: &mut impl Instrument,
) -> Result<Matrix, MatError> {
    if iterations == 0 {
        return Err(MatError::Empty("iterations must be at least 1"));
    }
    let mut result = evaluate(a, b, inst)?;
    for _ in 1..iterations {
        result = evaluate(a, b, inst)?;
    }
    Ok(result)
}
