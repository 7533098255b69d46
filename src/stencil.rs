//! Diffusion operators over periodic grids.
//!
//! Every operator reads the whole input grid and writes a fresh grid of the
//! same shape. Neighbours that fall off an edge wrap to the opposite edge.

use crate::grid::Grid;
use crate::utils::{get_wrapping_index, wrap};
use lazy_static::lazy_static;
use rayon::prelude::*;

/// Standard deviation of the smoothing kernel used by [`gaussian_laplacian`].
pub const GAUSSIAN_SIGMA: f64 = 3.0;

/// Kernel half-width in units of sigma.
const GAUSSIAN_TRUNCATE: f64 = 4.0;

lazy_static! {
    /// Normalised 1D Gaussian and its second derivative, sampled at `-r..=r`.
    static ref GAUSSIAN_KERNELS: (Vec<f64>, Vec<f64>) = gaussian_kernels(GAUSSIAN_SIGMA);
}

fn gaussian_kernels(sigma: f64) -> (Vec<f64>, Vec<f64>) {
    let radius = (GAUSSIAN_TRUNCATE * sigma + 0.5) as isize;
    let variance = sigma * sigma;

    let mut smooth: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x * x) as f64 / variance).exp())
        .collect();
    let total: f64 = smooth.iter().sum();
    smooth.iter_mut().for_each(|w| *w /= total);

    let second = (-radius..=radius)
        .zip(&smooth)
        .map(|(x, w)| w * ((x * x) as f64 - variance) / (variance * variance))
        .collect();

    (smooth, second)
}

/// Runs `f(species, plane, out_row, row)` over every row of every species plane,
/// rows in parallel.
fn map_rows<F>(grid: &Grid, f: F) -> Grid
where
    F: Fn(usize, &[f64], &mut [f64], usize) + Sync,
{
    let (species, height, width) = grid.shape();
    let mut out = Grid::zeros(species, height, width);
    if grid.plane_len() == 0 {
        return out;
    }

    for s in 0..species {
        let plane = grid.plane(s);
        out.plane_mut(s)
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, out_row)| f(s, plane, out_row, row));
    }

    out
}

/// 3x3 box average of every species plane.
pub fn local_average(grid: &Grid) -> Grid {
    let (_, height, width) = grid.shape();

    map_rows(grid, |_, plane, out_row, row| {
        let row = row as isize;
        for (col, out) in out_row.iter_mut().enumerate() {
            let col = col as isize;
            let mut sum = 0.0;
            for dr in -1..=1 {
                for dc in -1..=1 {
                    sum += plane[get_wrapping_index(row + dr, col + dc, height, width)];
                }
            }
            *out = sum / 9.0;
        }
    })
}

fn check_coefficients(grid: &Grid, coefficients: &[f64]) {
    assert_eq!(
        grid.species(),
        coefficients.len(),
        "one diffusion coefficient per species is required"
    );
}

/// 5-point Laplacian of every species plane, scaled by that species' coefficient.
pub fn laplacian(grid: &Grid, coefficients: &[f64]) -> Grid {
    check_coefficients(grid, coefficients);
    let (_, height, width) = grid.shape();

    map_rows(grid, |s, plane, out_row, row| {
        let row = row as isize;
        for (col, out) in out_row.iter_mut().enumerate() {
            let col = col as isize;
            let at = |dr: isize, dc: isize| plane[get_wrapping_index(row + dr, col + dc, height, width)];

            let lap = at(-1, 0) + at(1, 0) + at(0, -1) + at(0, 1) - 4.0 * at(0, 0);
            *out = coefficients[s] * lap;
        }
    })
}

/// Periodic 1D correlation of `kernel` along the rows axis of one plane.
fn correlate_rows(plane: &[f64], height: usize, width: usize, kernel: &[f64]) -> Vec<f64> {
    let radius = (kernel.len() / 2) as isize;
    let mut out = vec![0.0; plane.len()];

    out.par_chunks_mut(width).enumerate().for_each(|(row, out_row)| {
        for (k, weight) in kernel.iter().enumerate() {
            let src = wrap(row as isize + k as isize - radius, height) * width;
            for (o, v) in out_row.iter_mut().zip(&plane[src..src + width]) {
                *o += weight * v;
            }
        }
    });

    out
}

/// Periodic 1D correlation of `kernel` along the columns axis of one plane.
fn correlate_cols(plane: &[f64], width: usize, kernel: &[f64]) -> Vec<f64> {
    let radius = (kernel.len() / 2) as isize;
    let mut out = vec![0.0; plane.len()];

    out.par_chunks_mut(width)
        .zip(plane.par_chunks(width))
        .for_each(|(out_row, in_row)| {
            for (col, o) in out_row.iter_mut().enumerate() {
                *o = kernel
                    .iter()
                    .enumerate()
                    .map(|(k, weight)| weight * in_row[wrap(col as isize + k as isize - radius, width)])
                    .sum();
            }
        });

    out
}

/// Laplacian of the Gaussian-smoothed grid (sigma = [`GAUSSIAN_SIGMA`]),
/// scaled per species.
///
/// The operator is separable: the second derivative of the Gaussian along one
/// axis times the Gaussian along the other, summed over both axes.
pub fn gaussian_laplacian(grid: &Grid, coefficients: &[f64]) -> Grid {
    check_coefficients(grid, coefficients);
    let (species, height, width) = grid.shape();
    let mut out = Grid::zeros(species, height, width);
    if grid.plane_len() == 0 {
        return out;
    }

    let (smooth, second) = &*GAUSSIAN_KERNELS;

    for s in 0..species {
        let plane = grid.plane(s);
        let d2_rows = correlate_cols(&correlate_rows(plane, height, width, second), width, smooth);
        let d2_cols = correlate_cols(&correlate_rows(plane, height, width, smooth), width, second);

        let coefficient = coefficients[s];
        out.plane_mut(s)
            .iter_mut()
            .zip(d2_rows.iter().zip(&d2_cols))
            .for_each(|(o, (a, b))| *o = coefficient * (a + b));
    }

    out
}
