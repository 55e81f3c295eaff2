use ndarray_rand::rand::Rng;

use crate::table::CalibrationTable;

/// Steinhart-Hart coefficients (A, B, C) of a common 10 kOhm NTC
pub const NTC_10K: [f64; 3] = [1.009_249_522e-3, 2.378_405_444e-4, 2.019_202_697e-7];

/// (R0, T0, beta) of a 10 kOhm NTC with a beta of 3950 K
pub const BETA_3950: (f64, f64, f64) = (10_000.0, 25.0, 3950.0);

/// Resistance at `temperature` for a standard Steinhart-Hart thermistor
///
/// Solves `C w^3 + B w + A = 1/T` for `w = ln(R)` by Newton iteration. The cubic is monotonic
/// for positive `B` and `C` so the iteration converges from any start.
pub fn resistance_at([a, b, c]: [f64; 3], temperature: f64) -> f64 {
    let y = 1. / (temperature + 273.15);
    let mut w: f64 = 9.0;
    for _ in 0..100 {
        let step = (c * w.powi(3) + b * w + a - y) / (3. * c * w.powi(2) + b);
        w -= step;
        if step.abs() < 1e-15 {
            break;
        }
    }
    w.exp()
}

/// A table sampling an exact Steinhart-Hart thermistor at the given whole degrees
pub fn steinhart_hart_table(
    coefficients: [f64; 3],
    temperatures: impl IntoIterator<Item = i32>,
) -> CalibrationTable<f64> {
    let mut table = CalibrationTable::new("synthetic", "exact Steinhart-Hart thermistor");
    for t in temperatures {
        let t = f64::from(t);
        table.add(t, resistance_at(coefficients, t)).unwrap();
    }
    table
}

/// A table of `num_samples` rows for a randomly perturbed NTC, with measurement noise
///
/// Temperatures are spread over -40 C to 150 C with random spacing, resistances are perturbed by
/// up to 0.1 % so the rows never lie exactly on a cubic.
#[allow(clippy::cast_precision_loss)]
pub fn random_physical_table(rng: &mut impl Rng, num_samples: usize) -> CalibrationTable<f64> {
    let [a, b, c] = NTC_10K;
    let coefficients = [
        a * rng.gen_range(0.9..1.1),
        b * rng.gen_range(0.9..1.1),
        c * rng.gen_range(0.75..1.25),
    ];
    let step = 190. / num_samples as f64;

    let mut table = CalibrationTable::new("random", "randomly perturbed NTC");
    for n in 0..num_samples {
        let t = (-40. + step * n as f64 + rng.gen_range(0.0..step / 2.)).round();
        let noise = 1. + rng.gen_range(-1e-3..1e-3);
        // Rounding to whole degrees cannot collide, the spacing is wider than one degree
        table.add(t, resistance_at(coefficients, t) * noise).unwrap();
    }
    table
}
