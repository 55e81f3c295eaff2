use std::fs;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::{as_f64, tabs, Real};

/// Layout of a delimited calibration file
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CsvFormat {
    /// Field separator, a single ASCII character
    pub delimiter: char,
    pub has_headers: bool,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_headers: false,
        }
    }
}

#[derive(Deserialize)]
struct Row<E>(E, E);

/// An ordered map from temperature in Celsius to thermistor resistance in Ohm
///
/// Temperatures are unique and held in ascending order. Lookup is by exact key only, there is no
/// interpolation between rows. Keys should be the literal values read from the source table
/// rather than re-derived floats, otherwise equality comparison will miss.
#[derive(Clone, Debug)]
pub struct CalibrationTable<E> {
    name: String,
    description: String,
    /// (temperature, resistance) pairs sorted by temperature
    samples: Vec<(E, E)>,
}

impl<E: Real> CalibrationTable<E> {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            samples: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Insert a new temperature resistance pair
    ///
    /// # Errors
    /// - [`Error::DuplicateKey`] if `temperature` is already present
    /// - [`Error::InvalidSample`] if the temperature is not finite or not above absolute zero,
    ///   or the resistance is not finite and positive
    pub fn add(&mut self, temperature: E, resistance: E) -> Result<()> {
        let invalid = |reason| Error::InvalidSample {
            temperature: as_f64(temperature),
            resistance: as_f64(resistance),
            reason,
        };
        if !temperature.is_finite() {
            return Err(invalid("temperature must be finite"));
        }
        if temperature <= tabs() {
            return Err(invalid("temperature must be above absolute zero"));
        }
        if !resistance.is_finite() || resistance <= E::zero() {
            return Err(invalid("resistance must be finite and positive"));
        }

        // Neither key can be NaN past the checks above, so the ordering is total
        match self
            .samples
            .binary_search_by(|(t, _)| t.partial_cmp(&temperature).expect("finite keys"))
        {
            Ok(_) => Err(Error::DuplicateKey {
                table: self.name.clone(),
                temperature: as_f64(temperature),
            }),
            Err(index) => {
                self.samples.insert(index, (temperature, resistance));
                Ok(())
            }
        }
    }

    /// All temperatures in the table, ascending
    pub fn temperatures(&self) -> impl ExactSizeIterator<Item = E> + '_ {
        self.samples.iter().map(|&(t, _)| t)
    }

    /// All (temperature, resistance) pairs, ascending by temperature
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (E, E)> + '_ {
        self.samples.iter().copied()
    }

    /// Resistance recorded at exactly `temperature`
    ///
    /// # Errors
    /// [`Error::NotFound`] if `temperature` is not a key of the table. There is no nearest-match
    /// fallback.
    pub fn resistance_of(&self, temperature: E) -> Result<E> {
        self.samples
            .binary_search_by(|(t, _)| {
                t.partial_cmp(&temperature)
                    .unwrap_or(std::cmp::Ordering::Less)
            })
            .map(|index| self.samples[index].1)
            .map_err(|_| Error::NotFound {
                table: self.name.clone(),
                temperature: as_f64(temperature),
            })
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl<E: Real + DeserializeOwned> CalibrationTable<E> {
    /// Read a two column (temperature, resistance) table from delimited text
    ///
    /// # Errors
    /// Returns an error if a row cannot be parsed as two numbers, or if any row is rejected by
    /// [`CalibrationTable::add`].
    pub fn from_reader<R: Read>(
        name: impl Into<String>,
        description: impl Into<String>,
        reader: R,
        format: &CsvFormat,
    ) -> Result<Self> {
        let mut table = Self::new(name, description);
        let delimiter = u8::try_from(format.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                Error::InvalidFormat(format!(
                    "delimiter {:?} is not a single ASCII character",
                    format.delimiter
                ))
            })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(format.has_headers)
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        for (line, result) in rdr.deserialize().enumerate() {
            let Row(temperature, resistance): Row<E> = result?;
            if let Err(e) = table.add(temperature, resistance) {
                warn!(table = table.name(), line = line + 1, "rejected calibration row: {e}");
                return Err(e);
            }
            debug!(%temperature, %resistance, "read calibration row");
        }

        info!(
            table = table.name(),
            samples = table.count(),
            "loaded calibration table"
        );
        Ok(table)
    }

    /// Create a `CalibrationTable` from an on-disk representation
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, or under the same conditions as
    /// [`CalibrationTable::from_reader`].
    pub fn from_file(
        name: impl Into<String>,
        description: impl Into<String>,
        filepath: &Path,
        format: &CsvFormat,
    ) -> Result<Self> {
        let file = fs::read(filepath)?;
        Self::from_reader(name, description, &file[..], format)
    }
}
