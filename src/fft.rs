//! 2-D discrete Fourier transforms and zero-frequency shifts
//!
//! Transforms are applied separably with [rustfft]: first along the columns
//! (contiguous in [nalgebra]'s column-major storage), then along the rows.
//! The forward transform is unnormalized, the inverse transform is scaled by
//! `1/(rows*cols)` so that `ifft2(fft2(x)) == x`.

use nalgebra::DMatrix;
use rustfft::{num_complex::Complex64, FftDirection, FftPlanner};

/// Complex valued grid
pub type ComplexGrid = DMatrix<Complex64>;

/// Lifts a real grid into the complex plane
pub fn complexify(grid: &DMatrix<f64>) -> ComplexGrid {
    grid.map(|x| Complex64::new(x, 0f64))
}

fn transform_columns(
    planner: &mut FftPlanner<f64>,
    grid: &mut ComplexGrid,
    direction: FftDirection,
) {
    let n_row = grid.nrows();
    if n_row == 0 {
        return;
    }
    let fft = planner.plan_fft(n_row, direction);
    grid.as_mut_slice()
        .chunks_exact_mut(n_row)
        .for_each(|column| fft.process(column));
}

fn fft2_with(grid: &ComplexGrid, direction: FftDirection) -> ComplexGrid {
    let mut planner = FftPlanner::new();
    let mut buffer = grid.clone();
    transform_columns(&mut planner, &mut buffer, direction);
    let mut buffer = buffer.transpose();
    transform_columns(&mut planner, &mut buffer, direction);
    buffer.transpose()
}

/// Forward 2-D DFT
pub fn fft2(grid: &ComplexGrid) -> ComplexGrid {
    fft2_with(grid, FftDirection::Forward)
}

/// Inverse 2-D DFT, normalized by the number of samples
pub fn ifft2(grid: &ComplexGrid) -> ComplexGrid {
    let n = (grid.nrows() * grid.ncols()).max(1) as f64;
    fft2_with(grid, FftDirection::Inverse).map(|z| z / n)
}

/// Circularly rolls a grid by `(row_shift, col_shift)` samples
fn roll<T: nalgebra::Scalar>(grid: &DMatrix<T>, row_shift: usize, col_shift: usize) -> DMatrix<T> {
    let (n_row, n_col) = grid.shape();
    DMatrix::from_fn(n_row, n_col, |i, j| {
        grid[((i + n_row - row_shift) % n_row, (j + n_col - col_shift) % n_col)].clone()
    })
}

/// Moves the zero-frequency sample from the corner to the center
pub fn fftshift<T: nalgebra::Scalar>(grid: &DMatrix<T>) -> DMatrix<T> {
    let (n_row, n_col) = grid.shape();
    roll(grid, n_row / 2, n_col / 2)
}

/// Moves the zero-frequency sample from the center back to the corner
pub fn ifftshift<T: nalgebra::Scalar>(grid: &DMatrix<T>) -> DMatrix<T> {
    let (n_row, n_col) = grid.shape();
    roll(grid, n_row - n_row / 2, n_col - n_col / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_abs_diff(a: &ComplexGrid, b: &ComplexGrid) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(a, b)| (a - b).norm())
            .fold(0f64, f64::max)
    }

    #[test]
    fn impulse_has_flat_spectrum() {
        let mut grid = ComplexGrid::zeros(4, 6);
        grid[(0, 0)] = Complex64::new(1., 0.);
        let spectrum = fft2(&grid);
        assert!(spectrum.iter().all(|z| (z - Complex64::new(1., 0.)).norm() < 1e-12));
    }

    #[test]
    fn dc_bin_is_the_sum() {
        let grid = complexify(&DMatrix::from_fn(5, 3, |i, j| (i * 3 + j) as f64));
        let spectrum = fft2(&grid);
        assert!((spectrum[(0, 0)].re - (0..15).sum::<usize>() as f64).abs() < 1e-9);
    }

    #[test]
    fn inverse_undoes_forward() {
        let grid = complexify(&DMatrix::from_fn(7, 8, |i, j| ((i * 31 + j * 17) % 11) as f64));
        let back = ifft2(&fft2(&grid));
        assert!(max_abs_diff(&grid, &back) < 1e-10);
    }

    #[test]
    fn fftshift_centers_the_origin() {
        for n in [4usize, 5] {
            let mut grid = DMatrix::<f64>::zeros(n, n);
            grid[(0, 0)] = 1.;
            let shifted = fftshift(&grid);
            assert_eq!(shifted[(n / 2, n / 2)], 1.);
            assert_eq!(ifftshift(&shifted), grid);
        }
    }

    #[test]
    fn shifts_are_inverse_for_odd_sizes() {
        let grid = DMatrix::from_fn(5, 7, |i, j| (i * 7 + j) as f64);
        assert_eq!(ifftshift(&fftshift(&grid)), grid);
        assert_eq!(fftshift(&ifftshift(&grid)), grid);
    }
}
