//! JSON configuration loading.
//!
//! Schema (every field optional):
//!
//! ```json
//! {
//!   "aggregator": {
//!     "volume_count": 192,
//!     "time_window_ns": 5.0,
//!     "energy_cut": 1.0,
//!     "kill_above_energy_cut": true,
//!     "allowed_momentum_transfer": 1e-6,
//!     "lineage": {
//!       "scattering_offset": 10,
//!       "secondary_multiplication": 100,
//!       "background": 0
//!     }
//!   }
//! }
//! ```

use crate::Result;
use scintsim_core::{AggregatorConfig, LineageConstants};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Deserialize, Default)]
#[serde(default)]
struct JsonConfig {
    aggregator: JsonAggregator,
}

#[derive(Deserialize)]
#[serde(default)]
struct JsonAggregator {
    volume_count: usize,
    time_window_ns: f64,
    energy_cut: Option<f64>,
    kill_above_energy_cut: bool,
    allowed_momentum_transfer: Option<f64>,
    lineage: JsonLineage,
}

impl Default for JsonAggregator {
    fn default() -> Self {
        let defaults = AggregatorConfig::default();
        Self {
            volume_count: defaults.volume_count,
            time_window_ns: defaults.time_window_ns,
            energy_cut: defaults.energy_cut,
            kill_above_energy_cut: defaults.kill_above_energy_cut,
            allowed_momentum_transfer: defaults.allowed_momentum_transfer,
            lineage: JsonLineage::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct JsonLineage {
    scattering_offset: i64,
    secondary_multiplication: i64,
    background: i64,
}

impl Default for JsonLineage {
    fn default() -> Self {
        let defaults = LineageConstants::default();
        Self {
            scattering_offset: defaults.scattering_offset,
            secondary_multiplication: defaults.secondary_multiplication,
            background: defaults.background,
        }
    }
}

impl From<JsonConfig> for AggregatorConfig {
    fn from(config: JsonConfig) -> Self {
        let json = config.aggregator;
        AggregatorConfig {
            volume_count: json.volume_count,
            time_window_ns: json.time_window_ns,
            energy_cut: json.energy_cut,
            kill_above_energy_cut: json.kill_above_energy_cut,
            allowed_momentum_transfer: json.allowed_momentum_transfer,
            lineage: LineageConstants {
                scattering_offset: json.lineage.scattering_offset,
                secondary_multiplication: json.lineage.secondary_multiplication,
                background: json.lineage.background,
            },
        }
    }
}

/// Parses an aggregator configuration from a JSON string.
///
/// Missing fields take their defaults; the result is validated.
///
/// # Errors
/// Returns a JSON error for malformed input and a core error if the
/// configuration fails validation.
pub fn parse_config(json: &str) -> Result<AggregatorConfig> {
    let config: JsonConfig = serde_json::from_str(json)?;
    let config = AggregatorConfig::from(config);
    config.validate()?;
    Ok(config)
}

/// Loads an aggregator configuration from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read, is malformed, or the
/// configuration fails validation.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AggregatorConfig> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: JsonConfig = serde_json::from_reader(reader)?;
    let config = AggregatorConfig::from(config);
    config.validate()?;
    Ok(config)
}
