//! # Configuration
//!
//! Settings of the chain rule engine and the critical point search read from TOML:
//!
//! ```toml
//! [logging]
//! loglevel = "debug"
//! log_file = "calculus.log"
//!
//! [simplify]
//! zero_tolerance = 1e-12
//! max_expand_power = 8
//! max_multiple_angle = 8
//!
//! [critical_points]
//! x_range = [-5, 5]
//! y_range = [-5, 5]
//! grid_points = 11
//! tolerance = 1e-10
//! max_iterations = 50
//! dedup_tolerance = 1e-6
//! ```
//! Every section and key is optional; missing values keep their defaults.
use crate::calculus::critical_points::CriticalPointSearch;
use crate::error::CalculusError;
use crate::symbolic::symbolic_simplify::SimplifySettings;
use std::fs;
use std::path::Path;
use toml::{Table, Value};

#[derive(Clone, Debug, PartialEq)]
pub struct CalculusConfig {
    pub loglevel: Option<String>,
    pub log_file: Option<String>,
    pub simplify: SimplifySettings,
    pub critical_points: CriticalPointSearch,
}

impl Default for CalculusConfig {
    fn default() -> Self {
        CalculusConfig {
            loglevel: Some("info".to_string()),
            log_file: None,
            simplify: SimplifySettings::default(),
            critical_points: CriticalPointSearch::default(),
        }
    }
}

fn section<'a>(table: &'a Table, name: &str) -> Result<Option<&'a Table>, CalculusError> {
    match table.get(name) {
        None => Ok(None),
        Some(Value::Table(t)) => Ok(Some(t)),
        Some(other) => Err(CalculusError::Config(format!(
            "[{}] must be a table, got {}",
            name, other
        ))),
    }
}

// integers are accepted where floats are expected
fn float(table: &Table, key: &str) -> Result<Option<f64>, CalculusError> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::Float(f)) => Ok(Some(*f)),
        Some(Value::Integer(i)) => Ok(Some(*i as f64)),
        Some(other) => Err(CalculusError::Config(format!("{} must be a number, got {}", key, other))),
    }
}

fn count(table: &Table, key: &str) -> Result<Option<usize>, CalculusError> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::Integer(i)) if *i >= 0 => Ok(Some(*i as usize)),
        Some(other) => Err(CalculusError::Config(format!(
            "{} must be a non-negative integer, got {}",
            key, other
        ))),
    }
}

fn string(table: &Table, key: &str) -> Result<Option<String>, CalculusError> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(CalculusError::Config(format!("{} must be a string, got {}", key, other))),
    }
}

fn range(table: &Table, key: &str) -> Result<Option<(f64, f64)>, CalculusError> {
    let bad = || CalculusError::Config(format!("{} must be an array of two numbers", key));
    match table.get(key) {
        None => Ok(None),
        Some(Value::Array(items)) if items.len() == 2 => {
            let bounds = items
                .iter()
                .map(|v| match v {
                    Value::Float(f) => Ok(*f),
                    Value::Integer(i) => Ok(*i as f64),
                    _ => Err(bad()),
                })
                .collect::<Result<Vec<f64>, CalculusError>>()?;
            if bounds[0] > bounds[1] {
                return Err(CalculusError::Config(format!("{} lower bound exceeds upper bound", key)));
            }
            Ok(Some((bounds[0], bounds[1])))
        }
        Some(_) => Err(bad()),
    }
}

impl CalculusConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, CalculusError> {
        let table: Table = input
            .parse()
            .map_err(|e: toml::de::Error| CalculusError::Config(e.to_string()))?;
        let mut config = CalculusConfig::default();

        if let Some(logging) = section(&table, "logging")? {
            if let Some(level) = string(logging, "loglevel")? {
                crate::Utils::logger::parse_loglevel(&level)?;
                config.loglevel = Some(level);
            }
            config.log_file = string(logging, "log_file")?;
        }
        if let Some(simplify) = section(&table, "simplify")? {
            let s = &mut config.simplify;
            if let Some(v) = float(simplify, "zero_tolerance")? {
                s.zero_tolerance = v;
            }
            if let Some(v) = count(simplify, "max_expand_power")? {
                s.max_expand_power = v as u32;
            }
            if let Some(v) = count(simplify, "max_multiple_angle")? {
                s.max_multiple_angle = v as u32;
            }
        }
        if let Some(search) = section(&table, "critical_points")? {
            let c = &mut config.critical_points;
            if let Some(v) = range(search, "x_range")? {
                c.x_range = v;
            }
            if let Some(v) = range(search, "y_range")? {
                c.y_range = v;
            }
            if let Some(v) = count(search, "grid_points")? {
                c.grid_points = v;
            }
            if let Some(v) = float(search, "tolerance")? {
                c.tolerance = v;
            }
            if let Some(v) = count(search, "max_iterations")? {
                c.max_iterations = v;
            }
            if let Some(v) = float(search, "dedup_tolerance")? {
                c.dedup_tolerance = v;
            }
        }
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CalculusError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| CalculusError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// installs the logger described by the [logging] section
    pub fn init_logger(&self) -> Result<(), CalculusError> {
        crate::Utils::logger::init_logger(self.loglevel.as_deref(), self.log_file.as_deref())
    }
}
