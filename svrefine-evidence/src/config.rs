use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregator::Orientation;
use crate::consts::DEFAULT_SPLIT_READ_WINDOW;
use crate::errors::{AggregatorError, Result};

fn default_window() -> u32 {
    DEFAULT_SPLIT_READ_WINDOW
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct AggregatorConfig {
    #[serde(default = "default_window")]
    pub window: u32,
    pub orientation: Orientation,
}

impl AggregatorConfig {
    pub fn new(window: u32, orientation: Orientation) -> AggregatorConfig {
        AggregatorConfig {
            window,
            orientation,
        }
    }

    pub fn from_toml_str(toml_str: &str) -> Result<AggregatorConfig> {
        Ok(toml::from_str(toml_str)?)
    }
}

impl TryFrom<&Path> for AggregatorConfig {
    type Error = AggregatorError;

    ///
    /// Read an aggregator config.
    ///
    /// # Arguments
    /// - path: Path to the config file (a .toml) file.
    fn try_from(path: &Path) -> Result<AggregatorConfig> {
        let toml_str = read_to_string(path)?;
        AggregatorConfig::from_toml_str(&toml_str)
    }
}
