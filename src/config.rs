//! Run configuration read from the environment (and a `.env` file, if any).
//!
//! | variable                   | meaning                                  |
//! |----------------------------|------------------------------------------|
//! | `BZ_MODEL`                 | `bz`, `gray-scott`, `fitzhugh-nagumo`, `cahn-hilliard` |
//! | `BZ_HEIGHT`, `BZ_WIDTH`    | grid size                                |
//! | `BZ_SYMMETRY`              | rotational fold count of the initial grid |
//! | `BZ_COEFFICIENTS`          | comma separated reaction coefficients    |
//! | `BZ_PRESET`                | named Gray-Scott (feed, kill) pair       |
//! | `BZ_VARIABLE_COEFFICIENTS` | cosine-modulate the first coefficient    |
//! | `BZ_PERTURBATION`          | seed a patch in the grid center          |
//! | `BZ_SEED`                  | random seed; entropy when unset          |
//! | `BZ_FRAMES`                | frames the runner renders                |

use crate::error::{EngineError, Result};
use crate::model::Model;
use crate::model_presets;
use log::debug;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub model: Model,
    pub height: usize,
    pub width: usize,
    pub symmetry: usize,
    /// `None` selects the model's defaults.
    pub coefficients: Option<Vec<f64>>,
    pub variable_coefficients: bool,
    pub perturbation: bool,
    pub seed: Option<u64>,
    pub frames: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            model: Model::default(),
            height: 64,
            width: 64,
            symmetry: 1,
            coefficients: None,
            variable_coefficients: false,
            perturbation: false,
            seed: None,
            frames: 100,
        }
    }
}

impl SimulationConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            debug!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("BZ_MODEL") {
            config.model = value.parse().map_err(|e: EngineError| config_error("BZ_MODEL", &value, e))?;
        }
        if let Some(value) = lookup("BZ_HEIGHT") {
            config.height = parse("BZ_HEIGHT", &value)?;
        }
        if let Some(value) = lookup("BZ_WIDTH") {
            config.width = parse("BZ_WIDTH", &value)?;
        }
        if let Some(value) = lookup("BZ_SYMMETRY") {
            config.symmetry = parse("BZ_SYMMETRY", &value)?;
        }
        if let Some(value) = lookup("BZ_COEFFICIENTS") {
            config.coefficients = parse_list("BZ_COEFFICIENTS", &value)?;
        }
        if let Some(value) = lookup("BZ_PRESET") {
            if config.model != Model::GrayScott {
                return Err(config_error("BZ_PRESET", &value, "presets only apply to Gray-Scott"));
            }
            if config.coefficients.is_some() {
                return Err(config_error("BZ_PRESET", &value, "conflicts with BZ_COEFFICIENTS"));
            }
            let (feed, kill) = model_presets::gray_scott_preset(&value)
                .ok_or_else(|| config_error("BZ_PRESET", &value, "unknown preset"))?;
            config.coefficients = Some(vec![feed, kill]);
        }
        if let Some(value) = lookup("BZ_VARIABLE_COEFFICIENTS") {
            config.variable_coefficients = parse_flag("BZ_VARIABLE_COEFFICIENTS", &value)?;
        }
        if let Some(value) = lookup("BZ_PERTURBATION") {
            config.perturbation = parse_flag("BZ_PERTURBATION", &value)?;
        }
        if let Some(value) = lookup("BZ_SEED") {
            config.seed = Some(parse("BZ_SEED", &value)?);
        }
        if let Some(value) = lookup("BZ_FRAMES") {
            config.frames = parse("BZ_FRAMES", &value)?;
        }

        Ok(config)
    }

    /// The coefficients the model will run with. Extra values are dropped,
    /// too few is an error.
    pub fn resolved_coefficients(&self) -> Result<Vec<f64>> {
        let arity = self.model.coefficient_count();
        match &self.coefficients {
            None => Ok(self.model.default_coefficients()),
            Some(values) if values.len() >= arity => Ok(values[..arity].to_vec()),
            Some(values) => Err(EngineError::InvalidModelConfig(format!(
                "{} takes {} coefficients, got {}",
                self.model,
                arity,
                values.len()
            ))),
        }
    }
}

fn config_error(key: &str, value: &str, reason: impl ToString) -> EngineError {
    EngineError::Config {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: ToString,
{
    value.trim().parse().map_err(|e: T::Err| config_error(key, value, e))
}

/// An empty list means "use the defaults".
fn parse_list(key: &str, value: &str) -> Result<Option<Vec<f64>>> {
    let values = value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| parse(key, part))
        .collect::<Result<Vec<f64>>>()?;

    Ok(if values.is_empty() { None } else { Some(values) })
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(config_error(key, value, "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<SimulationConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SimulationConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(SimulationConfig::default(), config);
        assert_eq!(Model::BelousovZhabotinsky, config.model);
        assert_eq!(vec![1.0, 1.0, 1.0], config.resolved_coefficients().unwrap());
    }

    #[test]
    fn test_reads_every_key() {
        let config = config_from(&[
            ("BZ_MODEL", "fitzhugh-nagumo"),
            ("BZ_HEIGHT", "30"),
            ("BZ_WIDTH", " 40 "),
            ("BZ_SYMMETRY", "6"),
            ("BZ_COEFFICIENTS", "-0.01, 8"),
            ("BZ_VARIABLE_COEFFICIENTS", "yes"),
            ("BZ_PERTURBATION", "1"),
            ("BZ_SEED", "99"),
            ("BZ_FRAMES", "12"),
        ])
        .unwrap();

        assert_eq!(
            SimulationConfig {
                model: Model::FitzHughNagumo,
                height: 30,
                width: 40,
                symmetry: 6,
                coefficients: Some(vec![-0.01, 8.0]),
                variable_coefficients: true,
                perturbation: true,
                seed: Some(99),
                frames: 12,
            },
            config
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        for (key, value) in [
            ("BZ_MODEL", "oregonator"),
            ("BZ_HEIGHT", "-3"),
            ("BZ_COEFFICIENTS", "1.0,abc"),
            ("BZ_PERTURBATION", "maybe"),
        ] {
            match config_from(&[(key, value)]) {
                Err(EngineError::Config { key: k, .. }) => assert_eq!(key, k),
                other => panic!("{key}={value} gave {other:?}"),
            }
        }
    }

    #[test]
    fn test_coefficients_are_truncated_to_arity() {
        let config = config_from(&[("BZ_MODEL", "ch"), ("BZ_COEFFICIENTS", "0.1,0.2,0.3")]).unwrap();
        assert_eq!(vec![0.1], config.resolved_coefficients().unwrap());

        let config = config_from(&[("BZ_MODEL", "bz"), ("BZ_COEFFICIENTS", "0.1")]).unwrap();
        assert!(matches!(
            config.resolved_coefficients(),
            Err(EngineError::InvalidModelConfig(_))
        ));
    }

    #[test]
    fn test_empty_coefficient_list_falls_back_to_defaults() {
        let config = config_from(&[("BZ_COEFFICIENTS", " , ")]).unwrap();
        assert_eq!(None, config.coefficients);
        assert_eq!(vec![1.0, 1.0, 1.0], config.resolved_coefficients().unwrap());

        let config = config_from(&[("BZ_COEFFICIENTS", "")]).unwrap();
        assert_eq!(None, config.coefficients);
    }

    #[test]
    fn test_gray_scott_preset() {
        let config = config_from(&[("BZ_MODEL", "gray-scott"), ("BZ_PRESET", "brain coral")]).unwrap();
        let (feed, kill) = model_presets::BRAIN_CORAL;
        assert_eq!(vec![feed, kill], config.resolved_coefficients().unwrap());

        for pairs in [
            vec![("BZ_MODEL", "bz"), ("BZ_PRESET", "maze")],
            vec![("BZ_MODEL", "gs"), ("BZ_PRESET", "plaid")],
            vec![("BZ_MODEL", "gs"), ("BZ_PRESET", "maze"), ("BZ_COEFFICIENTS", "0.1,0.2")],
        ] {
            match config_from(&pairs) {
                Err(EngineError::Config { key, .. }) => assert_eq!("BZ_PRESET", key),
                other => panic!("{pairs:?} gave {other:?}"),
            }
        }
    }
}
