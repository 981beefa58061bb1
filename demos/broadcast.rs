use matwrap::{MatError, Matrix};

fn main() -> Result<(), MatError> {
    env_logger::init();

    // A 3x3 grid plus a row and a column, broadcast along opposite axes
    let grid: Matrix = "[[1, 2, 3], [4, 5, 6], [7, 8, 9]]".parse()?;
    let row = Matrix::from_row(&[10, 20, 30])?;
    let col = Matrix::from_rows(&[[0.5], [1.5], [2.5]])?;

    println!("grid + row =\n{}", grid.add(&row)?);
    println!("grid * col =\n{}", grid.mul(&col)?);
    println!("row @ grid = {:?}", row.matmul(&grid)?);
    println!("grid ** 0.5 =\n{}", grid.pow(0.5)?);

    match grid.matmul(&row) {
        Ok(m) => println!("unexpected: {m:?}"),
        Err(e) => println!("grid @ row fails: {e}"),
    }
    Ok(())
}
