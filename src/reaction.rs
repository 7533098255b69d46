//! Reaction terms of the supported models.
//!
//! Each function returns the local, diffusion-free rate of change for every
//! cell. Coefficients are read per cell so that spatially variable fields and
//! plain scalars go through the same code.

use crate::grid::{CoefficientField, Grid};
use crate::stencil;
use rayon::prelude::*;

fn check(grid: &Grid, coefficients: &CoefficientField, species: usize, arity: usize) {
    assert_eq!(species, grid.species(), "reaction expects {species} species");
    assert_eq!(
        arity,
        coefficients.len(),
        "reaction expects {arity} coefficients"
    );
    if let CoefficientField::Field(field) = coefficients {
        assert_eq!(
            (field.height(), field.width()),
            (grid.height(), grid.width()),
            "coefficient field does not cover the grid"
        );
    }
}

/// Evaluates `f(index, values)` for every cell of a grid with `N` species and
/// writes the `N` returned rates into a fresh grid.
fn per_cell<const N: usize, F>(grid: &Grid, f: F) -> Grid
where
    F: Fn(usize, [f64; N]) -> [f64; N] + Sync,
{
    let (species, height, width) = grid.shape();
    let len = grid.plane_len();

    let rates: Vec<[f64; N]> = (0..len)
        .into_par_iter()
        .map(|i| f(i, std::array::from_fn(|s| grid.plane(s)[i])))
        .collect();

    let mut out = Grid::zeros(species, height, width);
    for s in 0..N {
        out.plane_mut(s)
            .iter_mut()
            .zip(&rates)
            .for_each(|(o, rate)| *o = rate[s]);
    }

    out
}

/// Belousov-Zhabotinsky cyclic competition between species A, B and C
/// with coefficients (alpha, beta, gamma).
pub fn belousov_zhabotinsky(grid: &Grid, coefficients: &CoefficientField) -> Grid {
    check(grid, coefficients, 3, 3);

    per_cell::<3, _>(grid, |i, [a, b, c]| {
        let alpha = coefficients.at(0, i);
        let beta = coefficients.at(1, i);
        let gamma = coefficients.at(2, i);

        [
            a * (alpha * b - gamma * c),
            b * (beta * c - alpha * a),
            c * (gamma * a - beta * b),
        ]
    })
}

/// Gray-Scott with feed rate `f` and kill rate `k`.
pub fn gray_scott(grid: &Grid, coefficients: &CoefficientField) -> Grid {
    check(grid, coefficients, 2, 2);

    per_cell::<2, _>(grid, |i, [u, v]| {
        let feed = coefficients.at(0, i);
        let kill = coefficients.at(1, i);
        let uvv = u * v * v;

        [-uvv + feed * (1.0 - u), uvv - (feed + kill) * v]
    })
}

/// FitzHugh-Nagumo activator `u` and inhibitor `v` with coefficients (a, b).
pub fn fitzhugh_nagumo(grid: &Grid, coefficients: &CoefficientField) -> Grid {
    check(grid, coefficients, 2, 2);

    per_cell::<2, _>(grid, |i, [u, v]| {
        let a = coefficients.at(0, i);
        let b = coefficients.at(1, i);

        [u - u * u * u - v + a, b * (u - v)]
    })
}

/// Cahn-Hilliard chemical potential `phi^3 - phi - a * lap(phi)`.
///
/// This is not a rate: the integrator diffuses it once more to get the
/// update.
pub fn cahn_hilliard_potential(grid: &Grid, coefficients: &CoefficientField) -> Grid {
    check(grid, coefficients, 1, 1);
    let lap = stencil::laplacian(grid, &[1.0]);

    per_cell::<1, _>(grid, |i, [phi]| {
        let a = coefficients.at(0, i);
        [phi * phi * phi - phi - a * lap.plane(0)[i]]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(species: usize, values: &[f64]) -> Grid {
        Grid::from_fn(species, 3, 3, |s, _, _| values[s])
    }

    fn assert_plane(grid: &Grid, species: usize, expected: f64) {
        for &v in grid.plane(species) {
            assert!((v - expected).abs() < 1e-12, "{v} != {expected}");
        }
    }

    #[test]
    fn test_belousov_zhabotinsky() {
        let grid = uniform(3, &[0.2, 0.5, 0.1]);
        let coefficients = CoefficientField::Scalar(vec![1.0, 1.2, 0.8]);
        let rates = belousov_zhabotinsky(&grid, &coefficients);

        assert_plane(&rates, 0, 0.2 * (1.0 * 0.5 - 0.8 * 0.1));
        assert_plane(&rates, 1, 0.5 * (1.2 * 0.1 - 1.0 * 0.2));
        assert_plane(&rates, 2, 0.1 * (0.8 * 0.2 - 1.2 * 0.5));
    }

    #[test]
    fn test_belousov_zhabotinsky_balanced_coefficients_conserve_mass() {
        let grid = Grid::from_fn(3, 4, 4, |s, r, c| 0.1 * (s + 1) as f64 + 0.01 * (r * 4 + c) as f64);
        let rates = belousov_zhabotinsky(&grid, &CoefficientField::Scalar(vec![1.0, 1.0, 1.0]));

        for i in 0..16 {
            let total: f64 = (0..3).map(|s| rates.plane(s)[i]).sum();
            assert!(total.abs() < 1e-12);
        }
    }

    #[test]
    fn test_gray_scott() {
        let grid = uniform(2, &[0.8, 0.3]);
        let rates = gray_scott(&grid, &CoefficientField::Scalar(vec![0.0374, 0.0584]));
        let uvv = 0.8 * 0.3 * 0.3;

        assert_plane(&rates, 0, -uvv + 0.0374 * 0.2);
        assert_plane(&rates, 1, uvv - (0.0374 + 0.0584) * 0.3);
    }

    #[test]
    fn test_fitzhugh_nagumo() {
        let grid = uniform(2, &[0.5, 0.25]);
        let rates = fitzhugh_nagumo(&grid, &CoefficientField::Scalar(vec![-0.005, 10.0]));

        assert_plane(&rates, 0, 0.5 - 0.125 - 0.25 - 0.005);
        assert_plane(&rates, 1, 10.0 * 0.25);
    }

    #[test]
    fn test_cahn_hilliard_potential_of_flat_field() {
        let grid = uniform(1, &[0.5]);
        let mu = cahn_hilliard_potential(&grid, &CoefficientField::Scalar(vec![0.05]));
        assert_plane(&mu, 0, 0.125 - 0.5);
    }

    #[test]
    fn test_cahn_hilliard_potential_includes_curvature() {
        let mut grid = Grid::zeros(1, 5, 5);
        grid.set(0, 2, 2, 0.5);
        let mu = cahn_hilliard_potential(&grid, &CoefficientField::Scalar(vec![0.1]));

        // lap = -2.0 at the peak, 0.5 at its four neighbours.
        assert!((mu.get(0, 2, 2) - (0.125 - 0.5 + 0.2)).abs() < 1e-12);
        assert!((mu.get(0, 1, 2) - (-0.05)).abs() < 1e-12);
    }

    #[test]
    fn test_variable_coefficients_are_read_per_cell() {
        let grid = uniform(2, &[0.5, 0.25]);
        let field = Grid::from_fn(2, 3, 3, |s, r, _| if s == 0 { r as f64 } else { 1.0 });
        let rates = fitzhugh_nagumo(&grid, &CoefficientField::Field(field));

        let base = 0.5 - 0.125 - 0.25;
        assert!((rates.get(0, 0, 1) - base).abs() < 1e-12);
        assert!((rates.get(0, 2, 1) - (base + 2.0)).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "reaction expects 3 species")]
    fn test_species_mismatch_is_fatal() {
        belousov_zhabotinsky(&Grid::zeros(2, 3, 3), &CoefficientField::Scalar(vec![1.0; 3]));
    }
}
