use crate::error::{EngineError, Result};
use crate::grid::{CoefficientField, Grid};
use crate::init::variable_coefficient_field;
use crate::integrator;
use crate::model_presets;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Model {
    #[default]
    BelousovZhabotinsky,
    GrayScott,
    FitzHughNagumo,
    CahnHilliard,
}

impl Model {
    pub fn name(&self) -> &'static str {
        match self {
            Model::BelousovZhabotinsky => "Belousov-Zhabotinsky",
            Model::GrayScott => "Gray-Scott",
            Model::FitzHughNagumo => "FitzHugh-Nagumo",
            Model::CahnHilliard => "Cahn-Hilliard",
        }
    }

    pub fn all() -> Vec<Model> {
        use Model::*;
        vec![BelousovZhabotinsky, GrayScott, FitzHughNagumo, CahnHilliard]
    }

    pub fn species_count(&self) -> usize {
        match self {
            Model::BelousovZhabotinsky => 3,
            Model::GrayScott | Model::FitzHughNagumo => 2,
            Model::CahnHilliard => 1,
        }
    }

    /// Every model takes one reaction coefficient per species.
    pub fn coefficient_count(&self) -> usize {
        self.species_count()
    }

    /// Fixed integration time step.
    pub fn dt(&self) -> f64 {
        match self {
            Model::BelousovZhabotinsky => 1.0,
            Model::GrayScott => 0.05,
            Model::FitzHughNagumo => 0.01,
            Model::CahnHilliard => 0.05,
        }
    }

    /// Integration steps per rendered frame.
    pub fn sub_steps(&self) -> usize {
        match self {
            Model::BelousovZhabotinsky => 1,
            Model::GrayScott => 50,
            Model::FitzHughNagumo => 10,
            Model::CahnHilliard => 50,
        }
    }

    /// Closed range every value is clamped to after a step.
    pub fn clamp_range(&self) -> (f64, f64) {
        match self {
            Model::CahnHilliard => (-0.99, 0.99),
            _ => (0.0, 0.99),
        }
    }

    /// Per-species diffusion coefficients, for the models that use them.
    pub fn diffusion_coefficients(&self) -> &'static [f64] {
        match self {
            Model::BelousovZhabotinsky => &[],
            Model::GrayScott => &[0.16, 0.08],
            Model::FitzHughNagumo => &[1.0, 100.0],
            Model::CahnHilliard => &[0.5],
        }
    }

    pub fn default_coefficients(&self) -> Vec<f64> {
        match self {
            Model::BelousovZhabotinsky => model_presets::BZ_DEFAULT.to_vec(),
            Model::GrayScott => {
                let (feed, kill) = model_presets::GRAY_SCOTT_DEFAULT;
                vec![feed, kill]
            }
            Model::FitzHughNagumo => model_presets::FITZHUGH_NAGUMO_DEFAULT.to_vec(),
            Model::CahnHilliard => model_presets::CAHN_HILLIARD_DEFAULT.to_vec(),
        }
    }

    /// Gray-Scott only develops patterns from a seeded disturbance.
    pub fn requires_perturbation(&self) -> bool {
        matches!(self, Model::GrayScott)
    }

    /// Advances `grid` by one integration step. Panics if the grid or the
    /// coefficients do not fit the model.
    pub fn step(&self, grid: &Grid, coefficients: &CoefficientField) -> Grid {
        match self {
            Model::BelousovZhabotinsky => integrator::step_belousov_zhabotinsky(grid, coefficients),
            Model::GrayScott => integrator::step_gray_scott(grid, coefficients),
            Model::FitzHughNagumo => integrator::step_fitzhugh_nagumo(grid, coefficients),
            Model::CahnHilliard => integrator::step_cahn_hilliard(grid, coefficients),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Model {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match key.as_str() {
            "bz" | "belousov-zhabotinsky" => Ok(Model::BelousovZhabotinsky),
            "gs" | "gray-scott" => Ok(Model::GrayScott),
            "fn" | "fhn" | "fitzhugh-nagumo" => Ok(Model::FitzHughNagumo),
            "ch" | "cahn-hilliard" => Ok(Model::CahnHilliard),
            _ => Err(EngineError::InvalidModelConfig(format!("unknown model {s:?}"))),
        }
    }
}

/// A model together with the coefficients it runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    pub model: Model,
    pub coefficients: CoefficientField,
}

impl ModelSpec {
    pub fn new(model: Model, coefficients: Vec<f64>) -> Result<Self> {
        if coefficients.len() != model.coefficient_count() {
            return Err(EngineError::InvalidModelConfig(format!(
                "{} takes {} coefficients, got {}",
                model,
                model.coefficient_count(),
                coefficients.len()
            )));
        }

        Ok(Self {
            model,
            coefficients: CoefficientField::Scalar(coefficients),
        })
    }

    pub fn with_default_coefficients(model: Model) -> Self {
        Self {
            model,
            coefficients: CoefficientField::Scalar(model.default_coefficients()),
        }
    }

    /// Switches to spatially variable coefficients over a `height` x `width`
    /// plane. A spec that already has a field keeps it.
    pub fn into_variable(self, height: usize, width: usize) -> Self {
        let coefficients = match self.coefficients {
            CoefficientField::Scalar(base) => {
                CoefficientField::Field(variable_coefficient_field(&base, height, width))
            }
            field => field,
        };

        Self {
            model: self.model,
            coefficients,
        }
    }

    pub fn species_count(&self) -> usize {
        self.model.species_count()
    }

    pub fn dt(&self) -> f64 {
        self.model.dt()
    }

    pub fn sub_steps(&self) -> usize {
        self.model.sub_steps()
    }

    /// Fails unless `grid` and the coefficients fit this model.
    pub fn validate(&self, grid: &Grid) -> Result<()> {
        if grid.species() != self.species_count() {
            return Err(EngineError::InvalidModelConfig(format!(
                "{} needs {} species, grid has {}",
                self.model,
                self.species_count(),
                grid.species()
            )));
        }
        if self.coefficients.len() != self.model.coefficient_count() {
            return Err(EngineError::InvalidModelConfig(format!(
                "{} takes {} coefficients, got {}",
                self.model,
                self.model.coefficient_count(),
                self.coefficients.len()
            )));
        }
        self.coefficients.check_plane(grid.height(), grid.width())
    }

    pub fn step(&self, grid: &Grid) -> Grid {
        self.model.step(grid, &self.coefficients)
    }
}
