pub mod config;
pub mod error;
pub mod grid;
pub mod init;
pub mod integrator;
pub mod model;
pub mod model_presets;
pub mod reaction;
pub mod stencil;
mod utils;

// Re-export commonly used items
pub use config::SimulationConfig;
pub use error::EngineError;
pub use grid::{CoefficientField, Grid};
pub use init::{add_perturbation, init_grid, variable_coefficient_field};
pub use integrator::Simulation;
pub use model::{Model, ModelSpec};
