//! Per-model update steps and the [`Simulation`] that drives them.

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::grid::{CoefficientField, Grid};
use crate::init::{add_perturbation, init_grid};
use crate::model::{Model, ModelSpec};
use crate::reaction;
use crate::stencil;
use log::{debug, trace};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Arc;

fn finish(model: Model, mut next: Grid) -> Grid {
    let (min, max) = model.clamp_range();
    next.clamp(min, max);
    next
}

/// Local averaging stands in for diffusion; the reaction acts on the
/// averaged grid.
pub fn step_belousov_zhabotinsky(grid: &Grid, coefficients: &CoefficientField) -> Grid {
    let model = Model::BelousovZhabotinsky;
    let mut next = stencil::local_average(grid);
    let rates = reaction::belousov_zhabotinsky(&next, coefficients);
    next.add_scaled(&rates, model.dt());
    finish(model, next)
}

pub fn step_gray_scott(grid: &Grid, coefficients: &CoefficientField) -> Grid {
    let model = Model::GrayScott;
    let diffusion = stencil::laplacian(grid, model.diffusion_coefficients());
    let rates = reaction::gray_scott(grid, coefficients);

    let mut next = grid.clone();
    next.add_scaled(&diffusion, model.dt());
    next.add_scaled(&rates, model.dt());
    finish(model, next)
}

pub fn step_fitzhugh_nagumo(grid: &Grid, coefficients: &CoefficientField) -> Grid {
    let model = Model::FitzHughNagumo;
    let diffusion = stencil::gaussian_laplacian(grid, model.diffusion_coefficients());
    let rates = reaction::fitzhugh_nagumo(grid, coefficients);

    let mut next = grid.clone();
    next.add_scaled(&diffusion, model.dt());
    next.add_scaled(&rates, model.dt());
    finish(model, next)
}

/// The chemical potential is diffused again; there is no separate rate term.
pub fn step_cahn_hilliard(grid: &Grid, coefficients: &CoefficientField) -> Grid {
    let model = Model::CahnHilliard;
    let potential = reaction::cahn_hilliard_potential(grid, coefficients);
    let diffusion = stencil::gaussian_laplacian(&potential, model.diffusion_coefficients());

    let mut next = grid.clone();
    next.add_scaled(&diffusion, model.dt());
    finish(model, next)
}

/// Owns the grid for one run.
///
/// Every step computes into a new buffer and swaps it in, so a snapshot handed
/// out earlier keeps the generation it was taken from.
pub struct Simulation {
    spec: ModelSpec,
    grid: Arc<Grid>,
    steps_taken: u64,
}

impl Simulation {
    pub fn new(spec: ModelSpec, grid: Grid) -> Result<Self> {
        spec.validate(&grid)?;

        debug!(
            "{} simulation on a {:?} grid, dt = {}, {} steps per frame",
            spec.model,
            grid.shape(),
            spec.dt(),
            spec.sub_steps()
        );

        Ok(Self {
            spec,
            grid: Arc::new(grid),
            steps_taken: 0,
        })
    }

    /// Builds the initial grid, coefficients and perturbation a config asks for.
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::from_config_with_rng(config, &mut rng)
    }

    pub fn from_config_with_rng<R: rand::Rng>(config: &SimulationConfig, rng: &mut R) -> Result<Self> {
        let model = config.model;
        let mut spec = ModelSpec::new(model, config.resolved_coefficients()?)?;
        if config.variable_coefficients {
            spec = spec.into_variable(config.height, config.width);
        }

        let mut grid = init_grid(
            model.species_count(),
            config.height,
            config.width,
            config.symmetry,
            rng,
        )?;
        if config.perturbation || model.requires_perturbation() {
            add_perturbation(&mut grid);
        }

        Self::new(spec, grid)
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    pub fn model(&self) -> Model {
        self.spec.model
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Read-only view of the current generation.
    pub fn snapshot(&self) -> Arc<Grid> {
        Arc::clone(&self.grid)
    }

    pub fn step(&mut self) {
        let next = self.spec.step(&self.grid);
        self.grid = Arc::new(next);
        self.steps_taken += 1;
        trace!("step {}", self.steps_taken);
    }

    pub fn advance(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Runs one frame's worth of steps and returns the resulting snapshot.
    pub fn advance_frame(&mut self) -> Arc<Grid> {
        self.advance(self.spec.sub_steps());
        self.snapshot()
    }
}
