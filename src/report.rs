use std::fmt;

use itertools::Itertools;

use crate::basis::{Variant, COEFFICIENTS};
use crate::model::SteinhartHartModel;
use crate::Real;

/// A calibration row evaluated through a fitted model
#[derive(Clone, Debug)]
pub struct ReportRow<E> {
    pub temperature: E,
    pub resistance: E,
    /// Model temperature at the tabulated resistance, or why it could not be evaluated
    pub calculated_temperature: Result<E, String>,
    /// Model resistance at the tabulated temperature, or why it could not be evaluated
    pub calculated_resistance: Result<E, String>,
}

impl<E: Real> ReportRow<E> {
    /// Absolute difference between tabulated and model temperature
    pub fn temperature_error(&self) -> Option<E> {
        self.calculated_temperature
            .as_ref()
            .ok()
            .map(|&calculated| (calculated - self.temperature).abs())
    }
}

/// How well a model reproduces the table it was fitted to
#[derive(Clone, Debug)]
pub struct Report<E> {
    name: String,
    description: String,
    variant: Variant,
    coefficients: [E; COEFFICIENTS],
    rows: Vec<ReportRow<E>>,
}

impl<E: Real> Report<E> {
    pub fn new(model: &SteinhartHartModel<E>) -> Self {
        let rows = model
            .table()
            .iter()
            .map(|(temperature, resistance)| ReportRow {
                temperature,
                resistance,
                calculated_temperature: model
                    .calc_temperature(resistance)
                    .map_err(|e| e.to_string()),
                calculated_resistance: model
                    .calc_resistance(temperature)
                    .map_err(|e| e.to_string()),
            })
            .collect();

        Self {
            name: model.name().to_owned(),
            description: model.description().to_owned(),
            variant: model.variant(),
            coefficients: model.coefficients(),
            rows,
        }
    }

    pub fn rows(&self) -> &[ReportRow<E>] {
        &self.rows
    }

    /// The largest temperature error over all rows, with the tabulated temperature it occurs at
    pub fn max_error(&self) -> Option<(E, E)> {
        self.rows
            .iter()
            .filter_map(|row| row.temperature_error().map(|error| (error, row.temperature)))
            .fold(None, |max, (error, temperature)| match max {
                Some((max_error, _)) if max_error >= error => max,
                _ => Some((error, temperature)),
            })
    }

    /// The polynomial written highest degree first, skipping vanishing terms
    pub fn polynomial(&self) -> String {
        let terms = self
            .coefficients
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, coefficient)| **coefficient != E::zero())
            .map(|(degree, coefficient)| match degree {
                0 => format!("{coefficient:.6e}"),
                1 => format!("{coefficient:.6e} * x"),
                _ => format!("{coefficient:.6e} * x^{degree}"),
            })
            .join(" + ");
        if terms.is_empty() {
            "0".to_owned()
        } else {
            terms
        }
    }
}

fn capitalised(variant: Variant) -> String {
    let name = variant.name();
    name[..1].to_uppercase() + &name[1..]
}

impl<E: Real> fmt::Display for Report<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} model: {} ({})",
            capitalised(self.variant),
            self.name,
            self.description
        )?;
        writeln!(f, "{}", "-".repeat(72))?;
        writeln!(f, "Steinhart-Hart polynomial: {}", self.polynomial())?;
        writeln!(f)?;

        for row in &self.rows {
            write!(
                f,
                "temperature={:>6.1}\tresistance={:>10.1}",
                row.temperature, row.resistance
            )?;
            match &row.calculated_temperature {
                Ok(t) => write!(f, "\tcalculated temperature={t:>9.2}")?,
                Err(e) => write!(f, "\tcalculated temperature=<{e}>")?,
            }
            match &row.calculated_resistance {
                Ok(r) => writeln!(f, "\tcalculated resistance={r:>10.2}")?,
                Err(e) => writeln!(f, "\tcalculated resistance=<{e}>")?,
            }
        }
        writeln!(f)?;

        match self.max_error() {
            Some((error, temperature)) => writeln!(
                f,
                "Maximal error={error:>7.5} at temperature={temperature:>5.1}"
            )?,
            None => writeln!(f, "Maximal error=n/a")?,
        }
        writeln!(f, "{}", "=".repeat(72))
    }
}
