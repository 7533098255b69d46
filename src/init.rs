//! Initial conditions: random symmetric grids, variable coefficients and
//! the center perturbation.

use crate::error::{EngineError, Result};
use crate::grid::Grid;
use crate::utils::{map_t_of_range_a_to_range_b, wrap};
use log::debug;
use rand::Rng;
use std::f64::consts::PI;

/// Relative amplitude of the cosine modulation in variable coefficient mode.
const COEFFICIENT_MODULATION: f64 = 0.4;

/// Everything outside the perturbation patch is scaled by this factor.
const PERTURBATION_BACKGROUND: f64 = 0.05;

/// Draws `num_species` planes of uniform noise in `[0, 1)` and gives each one
/// `symmetry`-fold rotational symmetry.
pub fn init_grid<R: Rng>(
    num_species: usize,
    height: usize,
    width: usize,
    symmetry: usize,
    rng: &mut R,
) -> Result<Grid> {
    if symmetry == 0 {
        return Err(EngineError::InvalidModelConfig(
            "symmetry fold count must be at least 1".into(),
        ));
    }
    if num_species == 0 || height == 0 || width == 0 {
        return Err(EngineError::InvalidModelConfig(format!(
            "cannot build a {num_species}x{height}x{width} grid"
        )));
    }

    let planes = (0..num_species)
        .map(|_| {
            let noise: Vec<f64> = (0..height * width)
                .map(|_| rng.gen_range(0.0..1.0))
                .collect();
            rotate_average(&noise, height, width, symmetry)
        })
        .collect();

    debug!("initialised {num_species}x{height}x{width} grid with {symmetry}-fold symmetry");

    Grid::from_planes(height, width, planes)
}

/// Averages `symmetry` copies of `plane`, each rotated a further
/// `360 / symmetry` degrees about the plane center.
///
/// The plane keeps its shape; samples that land outside wrap around.
pub fn rotate_average(plane: &[f64], height: usize, width: usize, symmetry: usize) -> Vec<f64> {
    assert_eq!(plane.len(), height * width, "plane does not match its dimensions");
    if symmetry <= 1 {
        return plane.to_vec();
    }

    let step = 2.0 * PI / symmetry as f64;
    let mut out = vec![0.0; plane.len()];
    for k in 0..symmetry {
        let rotated = rotate_plane(plane, height, width, step * k as f64);
        out.iter_mut().zip(&rotated).for_each(|(o, r)| *o += r);
    }

    let n = symmetry as f64;
    out.iter_mut().for_each(|o| *o /= n);
    out
}

/// Catmull-Rom weights for the taps at offsets -1, 0, 1 and 2 from the cell
/// below a sample that sits `t` of the way to the next cell.
fn cubic_weights(t: f64) -> [f64; 4] {
    let (t2, t3) = (t * t, t * t * t);
    [
        0.5 * (-t + 2.0 * t2 - t3),
        0.5 * (2.0 - 5.0 * t2 + 3.0 * t3),
        0.5 * (t + 4.0 * t2 - 3.0 * t3),
        0.5 * (-t2 + t3),
    ]
}

/// Samples `plane` at a fractional position with a 4x4 Catmull-Rom kernel,
/// wrapping at the edges.
///
/// Like a cubic spline, the kernel can overshoot the input range slightly.
pub fn sample_cubic(plane: &[f64], height: usize, width: usize, row: f64, col: f64) -> f64 {
    let (r0, c0) = (row.floor(), col.floor());
    let row_weights = cubic_weights(row - r0);
    let col_weights = cubic_weights(col - c0);
    let (r0, c0) = (r0 as isize, c0 as isize);

    row_weights
        .iter()
        .enumerate()
        .map(|(i, wr)| {
            let offset = wrap(r0 + i as isize - 1, height) * width;
            let line: f64 = col_weights
                .iter()
                .enumerate()
                .map(|(j, wc)| wc * plane[offset + wrap(c0 + j as isize - 1, width)])
                .sum();
            wr * line
        })
        .sum()
}

/// Rotates a plane by `angle` radians about its center with cubic sampling
/// and periodic edges.
pub fn rotate_plane(plane: &[f64], height: usize, width: usize, angle: f64) -> Vec<f64> {
    let (sin, cos) = angle.sin_cos();
    let center_row = (height as f64 - 1.0) / 2.0;
    let center_col = (width as f64 - 1.0) / 2.0;

    let mut out = Vec::with_capacity(plane.len());
    for row in 0..height {
        let dy = row as f64 - center_row;
        for col in 0..width {
            let dx = col as f64 - center_col;
            let src_row = center_row + cos * dy - sin * dx;
            let src_col = center_col + sin * dy + cos * dx;
            out.push(sample_cubic(plane, height, width, src_row, src_col));
        }
    }

    out
}

/// Per-species coefficient planes. Plane 0 is modulated by
/// `1 + 0.4 cos(x y)`, where `x` and `y` cover one full period across the
/// plane, centred on its midpoint. The other planes stay constant.
pub fn variable_coefficient_field(base: &[f64], height: usize, width: usize) -> Grid {
    let (center_row, center_col) = ((height / 2) as f64, (width / 2) as f64);
    let (h, w) = (height as f64, width as f64);

    Grid::from_fn(base.len(), height, width, |s, row, col| {
        if s != 0 {
            return base[s];
        }
        let x = map_t_of_range_a_to_range_b(row as f64, center_row..center_row + h, 0.0..2.0 * PI);
        let y = map_t_of_range_a_to_range_b(col as f64, center_col..center_col + w, 0.0..2.0 * PI);
        base[0] * (1.0 + COEFFICIENT_MODULATION * (x * y).cos())
    })
}

/// Damps the grid to 5% and stamps a centered patch of `1 / (n + 2)` into
/// species `n`, then clamps to `[0, 0.99]`.
///
/// The patch spans `height / 10` rows and `width / 10` columns, so grids
/// smaller than 20 cells along an axis are only damped.
pub fn add_perturbation(grid: &mut Grid) {
    let (species, height, width) = grid.shape();
    let (center_row, center_col) = (height / 2, width / 2);
    let (half_rows, half_cols) = (height / 20, width / 20);

    grid.scale(PERTURBATION_BACKGROUND);

    for n in 0..species {
        let value = 1.0 / (n as f64 + 2.0);
        for row in center_row - half_rows..center_row + half_rows {
            for col in center_col - half_cols..center_col + half_cols {
                grid.set(n, row, col, value);
            }
        }
    }

    grid.clamp(0.0, 0.99);
}
