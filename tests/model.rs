use ndarray_rand::rand::{Rng, SeedableRng};
use rand_isaac::Isaac64Rng;
use serde::Serialize;
use tempdir::TempDir;

use steinhart_hart::config::Config;
use steinhart_hart::report::Report;
use steinhart_hart::table::CsvFormat;
use steinhart_hart::{CalibrationTable, Error, Result, SteinhartHartModel, Variant};

/// Steinhart-Hart coefficients (A, B, C) of a common 10 kOhm NTC
const NTC_10K: [f64; 3] = [1.009_249_522e-3, 2.378_405_444e-4, 2.019_202_697e-7];

fn resistance_at([a, b, c]: [f64; 3], temperature: f64) -> f64 {
    let y = 1. / (temperature + 273.15);
    let mut w: f64 = 9.0;
    for _ in 0..100 {
        w -= (c * w.powi(3) + b * w + a - y) / (3. * c * w.powi(2) + b);
    }
    w.exp()
}

#[derive(Serialize)]
struct Row {
    temperature: f64,
    resistance: f64,
}

/// Write a datasheet style table, resistances rounded to 0.1 Ohm, and a config pointing at it
fn write_datasheet(working_dir: &TempDir, variants: Vec<Variant>) -> Result<std::path::PathBuf> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(working_dir.path().join("ntc.csv"))
        .unwrap();
    for t in (-40..=125).step_by(5) {
        let temperature = f64::from(t);
        let resistance = (resistance_at(NTC_10K, temperature) * 10.).round() / 10.;
        wtr.serialize(Row {
            temperature,
            resistance,
        })
        .unwrap();
    }
    wtr.flush()?;

    let config = Config {
        name: "NTC10K".to_owned(),
        description: "10 kOhm NTC datasheet".to_owned(),
        table: "ntc.csv".into(),
        variants,
        format: CsvFormat::default(),
    };
    let config_path = working_dir.path().join("ntc.toml");
    std::fs::write(&config_path, toml::to_string(&config).unwrap())?;
    Ok(config_path)
}

#[test]
fn datasheet_round_trip_stays_within_tolerance() -> Result<()> {
    let tmp_dir = TempDir::new("datasheet_round_trip_stays_within_tolerance").unwrap();
    let config_path = write_datasheet(&tmp_dir, Variant::ALL.to_vec())?;

    let config = Config::from_file(&config_path)?;
    let table: CalibrationTable<f64> = config.load_table()?;
    assert_eq!(table.count(), 34);
    assert_eq!(table.name(), "NTC10K");

    for variant in config.variants {
        let model = SteinhartHartModel::new(table.clone(), variant)?;
        let (temperature_tolerance, resistance_tolerance) = match variant {
            Variant::Simplified => (5.0, 0.2),
            Variant::Standard | Variant::Extended => (0.01, 1e-3),
        };

        for (t, r) in model.table().iter() {
            let calculated_t = model.calc_temperature(r)?;
            assert!(
                (calculated_t - t).abs() < temperature_tolerance,
                "{variant}: T({r}) = {calculated_t}, expected {t}"
            );
            let calculated_r = model.calc_resistance(t)?;
            assert!(
                (calculated_r / r - 1.).abs() < resistance_tolerance,
                "{variant}: R({t}) = {calculated_r}, expected {r}"
            );
        }

        let report = Report::new(&model);
        let (max_error, _) = report.max_error().expect("every row evaluates");
        assert!(max_error < temperature_tolerance);
    }

    Ok(())
}

#[test]
fn inverse_undoes_forward_off_the_calibration_grid() -> Result<()> {
    let seed = 40;
    let mut rng = Isaac64Rng::seed_from_u64(seed);

    let tmp_dir = TempDir::new("inverse_undoes_forward_off_the_calibration_grid").unwrap();
    let config_path = write_datasheet(&tmp_dir, vec![Variant::Standard, Variant::Extended])?;
    let config = Config::from_file(&config_path)?;
    let table: CalibrationTable<f64> = config.load_table()?;

    for variant in config.variants {
        let model = SteinhartHartModel::new(table.clone(), variant)?;
        for _ in 0..100 {
            let resistance = rng.gen_range(500.0..200_000.0);
            let temperature = model.calc_temperature(resistance)?;
            approx::assert_relative_eq!(
                model.calc_resistance(temperature)?,
                resistance,
                max_relative = 1e-9
            );
        }
    }
    Ok(())
}

#[test]
fn table_contract_is_enforced() {
    let mut table: CalibrationTable<f64> = CalibrationTable::new("contract", "");
    table.add(25.0, 10_000.0).unwrap();

    assert!(matches!(
        table.add(25.0, 9_000.0),
        Err(Error::DuplicateKey { .. })
    ));
    assert!(matches!(
        table.resistance_of(30.0),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn constant_resistance_file_cannot_be_fitted() -> Result<()> {
    let tmp_dir = TempDir::new("constant_resistance_file_cannot_be_fitted").unwrap();
    let table_path = tmp_dir.path().join("flat.csv");
    std::fs::write(&table_path, "0,4700\n20,4700\n40,4700\n60,4700\n")?;

    let table: CalibrationTable<f64> =
        CalibrationTable::from_file("flat", "", &table_path, &CsvFormat::default())?;

    for variant in Variant::ALL {
        assert!(matches!(
            SteinhartHartModel::new(table.clone(), variant),
            Err(Error::DegenerateFit(_))
        ));
    }
    Ok(())
}

#[test]
fn missing_table_file_is_an_io_error() {
    let tmp_dir = TempDir::new("missing_table_file_is_an_io_error").unwrap();
    let result: Result<CalibrationTable<f64>> = CalibrationTable::from_file(
        "missing",
        "",
        &tmp_dir.path().join("nope.csv"),
        &CsvFormat::default(),
    );
    assert!(matches!(result, Err(Error::Io(_))));
}
