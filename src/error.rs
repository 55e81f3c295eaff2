use thiserror::Error;

/// Everything that can go wrong while building or evaluating a thermistor model
#[derive(Debug, Error)]
pub enum Error {
    /// A temperature was inserted into a table which already holds it
    #[error("temperature {temperature} is already present in calibration table `{table}`")]
    DuplicateKey { table: String, temperature: f64 },
    /// Exact-match lookup of a temperature which is not a key of the table
    #[error("temperature {temperature} not found in calibration table `{table}`")]
    NotFound { table: String, temperature: f64 },
    /// A sample that can never take part in a fit
    #[error("invalid calibration sample (T = {temperature}, R = {resistance}): {reason}")]
    InvalidSample {
        temperature: f64,
        resistance: f64,
        reason: &'static str,
    },
    /// The calibration samples do not span the requested basis
    #[error("degenerate fit: {0}")]
    DegenerateFit(String),
    /// An evaluation was requested outside the domain of the fitted polynomial
    #[error("domain error: {0}")]
    Domain(String),
    /// A calibration file layout which cannot be parsed
    #[error("invalid table format: {0}")]
    InvalidFormat(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = ::std::result::Result<T, Error>;
