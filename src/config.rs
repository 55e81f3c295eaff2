use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::basis::Variant;
use crate::error::Result;
use crate::table::{CalibrationTable, CsvFormat};
use crate::Real;

fn all_variants() -> Vec<Variant> {
    Variant::ALL.to_vec()
}

/// On-disk description of a thermistor and the models to fit to it
///
/// ```toml
/// name = "Simu"
/// description = "Simulated NTC"
/// table = "simu.csv"
/// variants = ["simplified", "standard"]
///
/// [format]
/// delimiter = ";"
/// has_headers = true
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Path to the calibration table. Relative paths are resolved against the directory of the
    /// configuration file when it is read with [`Config::from_file`].
    pub table: PathBuf,
    /// Models to fit, in order. Defaults to every variant.
    #[serde(default = "all_variants")]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub format: CsvFormat,
}

impl Config {
    /// Parse a configuration from TOML text
    ///
    /// # Errors
    /// Returns an error if `text` is not valid TOML or does not describe a `Config`.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a configuration file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, or under the same conditions as
    /// [`Config::parse`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut config = Self::parse(&text)?;
        if config.table.is_relative() {
            if let Some(directory) = path.parent() {
                config.table = directory.join(&config.table);
            }
        }
        info!(config = ?path, table = ?config.table, "read thermistor configuration");
        Ok(config)
    }

    /// Read the calibration table the configuration points at
    ///
    /// # Errors
    /// Returns an error under the conditions of [`CalibrationTable::from_file`].
    pub fn load_table<E: Real + DeserializeOwned>(&self) -> Result<CalibrationTable<E>> {
        CalibrationTable::from_file(
            self.name.clone(),
            self.description.clone(),
            &self.table,
            &self.format,
        )
    }
}
