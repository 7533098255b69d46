//! Multi-species concentration grids.
//!
//! A [`Grid`] stores `species` planes of `height` x `width` cells in one
//! contiguous buffer, plane after plane, each plane in row-major order.

use crate::error::{EngineError, Result};
use itertools::Itertools;
use std::fmt;

/// `(species, height, width)`
pub type Shape = (usize, usize, usize);

#[derive(Clone, PartialEq)]
pub struct Grid {
    species: usize,
    height: usize,
    width: usize,
    data: Vec<f64>,
}

impl Grid {
    pub fn zeros(species: usize, height: usize, width: usize) -> Self {
        Self::filled(species, height, width, 0.0)
    }

    pub fn filled(species: usize, height: usize, width: usize, value: f64) -> Self {
        Self {
            species,
            height,
            width,
            data: vec![value; species * height * width],
        }
    }

    /// Builds a grid by evaluating `f(species, row, col)` for every cell.
    pub fn from_fn<F>(species: usize, height: usize, width: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> f64,
    {
        let data = (0..species)
            .cartesian_product(0..height)
            .cartesian_product(0..width)
            .map(|((s, row), col)| f(s, row, col))
            .collect();

        Self {
            species,
            height,
            width,
            data,
        }
    }

    pub fn from_vec(species: usize, height: usize, width: usize, data: Vec<f64>) -> Result<Self> {
        let expected = species * height * width;
        if data.len() != expected {
            return Err(EngineError::ShapeMismatch(format!(
                "buffer of {} values cannot hold a {}x{}x{} grid ({} values)",
                data.len(),
                species,
                height,
                width,
                expected
            )));
        }

        Ok(Self {
            species,
            height,
            width,
            data,
        })
    }

    /// Stacks equally sized planes into one grid.
    pub fn from_planes(height: usize, width: usize, planes: Vec<Vec<f64>>) -> Result<Self> {
        let plane_len = height * width;
        if let Some((i, plane)) = planes.iter().find_position(|p| p.len() != plane_len) {
            return Err(EngineError::ShapeMismatch(format!(
                "plane {} has {} values, expected {}x{}",
                i,
                plane.len(),
                height,
                width
            )));
        }

        Ok(Self {
            species: planes.len(),
            height,
            width,
            data: planes.concat(),
        })
    }

    pub fn shape(&self) -> Shape {
        (self.species, self.height, self.width)
    }

    pub fn species(&self) -> usize {
        self.species
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn plane_len(&self) -> usize {
        self.height * self.width
    }

    pub fn plane(&self, species: usize) -> &[f64] {
        let len = self.plane_len();
        &self.data[species * len..(species + 1) * len]
    }

    pub fn plane_mut(&mut self, species: usize) -> &mut [f64] {
        let len = self.plane_len();
        &mut self.data[species * len..(species + 1) * len]
    }

    pub fn planes(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.plane_len().max(1)).take(self.species)
    }

    pub fn get(&self, species: usize, row: usize, col: usize) -> f64 {
        self.data[self.index(species, row, col)]
    }

    pub fn set(&mut self, species: usize, row: usize, col: usize, value: f64) {
        let index = self.index(species, row, col);
        self.data[index] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn scale(&mut self, factor: f64) {
        self.data.iter_mut().for_each(|v| *v *= factor);
    }

    /// `self += factor * other`
    pub fn add_scaled(&mut self, other: &Grid, factor: f64) {
        assert_eq!(self.shape(), other.shape(), "add_scaled on mismatched grids");
        self.data
            .iter_mut()
            .zip(&other.data)
            .for_each(|(a, b)| *a += factor * b);
    }

    pub fn clamp(&mut self, min: f64, max: f64) {
        self.data.iter_mut().for_each(|v| *v = v.clamp(min, max));
    }

    /// Smallest and largest value of one species plane.
    pub fn min_max(&self, species: usize) -> Option<(f64, f64)> {
        self.plane(species)
            .iter()
            .copied()
            .minmax_by(|a, b| a.total_cmp(b))
            .into_option()
    }

    pub fn mean(&self, species: usize) -> f64 {
        let plane = self.plane(species);
        if plane.is_empty() {
            return 0.0;
        }
        plane.iter().sum::<f64>() / plane.len() as f64
    }

    fn index(&self, species: usize, row: usize, col: usize) -> usize {
        debug_assert!(species < self.species && row < self.height && col < self.width);
        (species * self.height + row) * self.width + col
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("species", &self.species)
            .field("height", &self.height)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

/// Reaction coefficients, either one scalar per species or one full plane per species.
#[derive(Debug, Clone, PartialEq)]
pub enum CoefficientField {
    Scalar(Vec<f64>),
    Field(Grid),
}

impl CoefficientField {
    /// Number of coefficients (planes, in field mode).
    pub fn len(&self) -> usize {
        match self {
            CoefficientField::Scalar(values) => values.len(),
            CoefficientField::Field(grid) => grid.species(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coefficient `n` at flat plane index `index`.
    #[inline]
    pub fn at(&self, n: usize, index: usize) -> f64 {
        match self {
            CoefficientField::Scalar(values) => values[n],
            CoefficientField::Field(grid) => grid.plane(n)[index],
        }
    }

    /// Fails unless a field covers exactly a `height` x `width` plane.
    pub fn check_plane(&self, height: usize, width: usize) -> Result<()> {
        match self {
            CoefficientField::Scalar(_) => Ok(()),
            CoefficientField::Field(grid) if grid.height() == height && grid.width() == width => {
                Ok(())
            }
            CoefficientField::Field(grid) => Err(EngineError::ShapeMismatch(format!(
                "coefficient field planes are {}x{}, grid planes are {}x{}",
                grid.height(),
                grid.width(),
                height,
                width
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let grid = Grid::from_fn(2, 3, 4, |s, row, col| (s * 100 + row * 10 + col) as f64);

        assert_eq!((2, 3, 4), grid.shape());
        assert_eq!(123.0, grid.get(1, 2, 3));
        assert_eq!(&[10.0, 11.0, 12.0, 13.0], &grid.plane(0)[4..8]);
        assert_eq!(2, grid.planes().count());
    }

    #[test]
    fn test_from_vec_rejects_bad_length() {
        let err = Grid::from_vec(2, 3, 3, vec![0.0; 17]).unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch(_)));
        let message = err.to_string();
        assert!(message.contains("17") && message.contains("18"), "{message}");
    }

    #[test]
    fn test_from_planes() {
        let grid = Grid::from_planes(1, 2, vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!((2, 1, 2), grid.shape());
        assert_eq!(3.0, grid.get(1, 0, 0));

        assert!(Grid::from_planes(1, 2, vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn test_add_scaled_and_clamp() {
        let mut a = Grid::filled(1, 2, 2, 0.5);
        let b = Grid::filled(1, 2, 2, 1.0);
        a.add_scaled(&b, 2.0);
        assert!(a.as_slice().iter().all(|&v| v == 2.5));

        a.clamp(0.0, 0.99);
        assert!(a.as_slice().iter().all(|&v| v == 0.99));
    }

    #[test]
    fn test_min_max_mean() {
        let grid = Grid::from_vec(1, 2, 2, vec![0.1, 0.4, 0.2, 0.3]).unwrap();
        assert_eq!(Some((0.1, 0.4)), grid.min_max(0));
        assert!((grid.mean(0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_coefficient_field() {
        let scalar = CoefficientField::Scalar(vec![0.1, 0.2]);
        assert_eq!(0.2, scalar.at(1, 99));
        assert!(scalar.check_plane(5, 5).is_ok());

        let field = CoefficientField::Field(Grid::from_fn(1, 2, 2, |_, r, c| (r * 2 + c) as f64));
        assert_eq!(3.0, field.at(0, 3));
        assert!(field.check_plane(2, 2).is_ok());
        assert!(field.check_plane(2, 3).is_err());
    }
}
