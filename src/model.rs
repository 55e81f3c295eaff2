use ndarray::ArrayView1;
use tracing::{debug, info};

use crate::basis::{Variant, COEFFICIENTS};
use crate::error::{Error, Result};
use crate::math::value;
use crate::polyfit::{fit, FitResult, Samples};
use crate::roots::{solve_cubic, solve_linear};
use crate::table::CalibrationTable;
use crate::{as_f64, tabs, Real};

/// A thermistor characterised by a Steinhart-Hart polynomial
///
/// The polynomial relates inverse absolute temperature to the logarithm of resistance,
///
/// $$
///     \frac{1}{T} = a_0 + a_1 \ln R + a_2 (\ln R)^2 + a_3 (\ln R)^3,
/// $$
///
/// with the coefficients fitted by least squares to a calibration table when the model is built.
/// The model owns the snapshot of the table it was fitted to and never changes after
/// construction.
#[derive(Clone, Debug)]
pub struct SteinhartHartModel<E> {
    table: CalibrationTable<E>,
    samples: Samples<E>,
    fit: FitResult<E>,
    /// Fitted coefficients lowest degree first, unused degrees hold zero
    coefficients: [E; COEFFICIENTS],
}

impl<E: Real> SteinhartHartModel<E> {
    /// Fit `variant` to `table`
    ///
    /// # Errors
    /// [`Error::DegenerateFit`] if the table has fewer rows than the variant has basis vectors,
    /// or if the rows are not distinct enough in resistance to determine the fit.
    pub fn new(table: CalibrationTable<E>, variant: Variant) -> Result<Self> {
        let samples = Samples::from_table(&table);
        let fit = fit(&samples, variant)?;

        let mut coefficients = [E::zero(); COEFFICIENTS];
        for (coefficient, &fitted) in coefficients.iter_mut().zip(fit.solution()) {
            *coefficient = fitted;
        }
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(Error::DegenerateFit(format!(
                "fit of table `{}` produced non-finite coefficients {coefficients:?}",
                table.name()
            )));
        }

        info!(
            table = table.name(),
            %variant,
            coefficients = ?coefficients,
            "built thermistor model"
        );

        Ok(Self {
            table,
            samples,
            fit,
            coefficients,
        })
    }

    /// Temperature in Celsius at `resistance` in Ohm
    ///
    /// # Errors
    /// [`Error::Domain`] if `resistance` is not finite and positive, or if the polynomial is not
    /// positive at `ln(resistance)`, which would be an absolute temperature at or below zero.
    pub fn calc_temperature(&self, resistance: E) -> Result<E> {
        if !resistance.is_finite() || resistance <= E::zero() {
            return Err(Error::Domain(format!(
                "resistance must be finite and positive, got {resistance}"
            )));
        }

        let inverse_temperature = value(ArrayView1::from(&self.coefficients[..]), resistance.ln());
        if inverse_temperature <= E::zero() {
            return Err(Error::Domain(format!(
                "polynomial evaluates to {inverse_temperature:e} at R = {resistance}, \
                 no absolute temperature corresponds"
            )));
        }

        let temperature = E::one() / inverse_temperature + tabs();
        if !temperature.is_finite() {
            return Err(Error::Domain(format!(
                "temperature at R = {resistance} is not finite"
            )));
        }
        Ok(temperature)
    }

    /// Resistance in Ohm at `temperature` in Celsius
    ///
    /// The simplified model inverts in closed form. The standard and extended models solve the
    /// cubic in `ln(R)` by Cardano's formula and reject temperatures at which the cubic has three
    /// real roots.
    ///
    /// # Errors
    /// [`Error::Domain`] if `temperature` is not finite or not above absolute zero, if the
    /// leading coefficient of the polynomial is zero, if the cubic has three real roots, or if
    /// the resistance overflows.
    pub fn calc_resistance(&self, temperature: E) -> Result<E> {
        if !temperature.is_finite() || temperature <= tabs() {
            return Err(Error::Domain(format!(
                "temperature must be finite and above absolute zero, got {temperature}"
            )));
        }

        let inverse_temperature = E::one() / (temperature - tabs());
        let [a0, a1, a2, a3] = self.coefficients;
        let shifted = a0 - inverse_temperature;

        let log_resistance = match self.variant() {
            Variant::Simplified => solve_linear(shifted, a1)?,
            Variant::Standard | Variant::Extended => solve_cubic([shifted, a1, a2, a3])?,
        };
        debug!(%temperature, %log_resistance, "inverted Steinhart-Hart polynomial");

        let resistance = log_resistance.exp();
        if !resistance.is_finite() || resistance <= E::zero() {
            return Err(Error::Domain(format!(
                "resistance at T = {temperature} is out of range (ln R = {})",
                as_f64(log_resistance)
            )));
        }
        Ok(resistance)
    }

    /// The fitted coefficients, lowest degree first and zero padded to four entries
    pub const fn coefficients(&self) -> [E; COEFFICIENTS] {
        self.coefficients
    }

    pub const fn variant(&self) -> Variant {
        self.fit.variant()
    }

    pub const fn fit(&self) -> &FitResult<E> {
        &self.fit
    }

    /// The calibration samples in fitting coordinates
    pub const fn samples(&self) -> &Samples<E> {
        &self.samples
    }

    pub fn name(&self) -> &str {
        self.table.name()
    }

    pub fn description(&self) -> &str {
        self.table.description()
    }

    pub const fn table(&self) -> &CalibrationTable<E> {
        &self.table
    }
}
