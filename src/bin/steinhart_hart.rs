use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, Level};

use steinhart_hart::config::Config;
use steinhart_hart::report::Report;
use steinhart_hart::table::{CalibrationTable, CsvFormat};
use steinhart_hart::{SteinhartHartModel, Variant};

#[derive(Parser, Debug)]
#[command(name = "steinhart_hart")]
#[command(
    about = "Fit Steinhart-Hart polynomials to a thermistor calibration table",
    long_about = None
)]
struct Args {
    /// TOML description of the thermistor
    #[arg(short, long, conflicts_with = "table", required_unless_present = "table")]
    config: Option<PathBuf>,

    /// Two column (temperature, resistance) calibration table
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Thermistor name, when reading a table directly
    #[arg(long, default_value = "thermistor")]
    name: String,

    /// Thermistor description, when reading a table directly
    #[arg(long, default_value = "")]
    description: String,

    /// Field separator of the calibration table
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// The calibration table starts with a header row
    #[arg(long)]
    has_headers: bool,

    /// Model to fit, may be repeated. Defaults to the configured variants, or all of them.
    #[arg(short = 'm', long = "variant")]
    variants: Vec<Variant>,

    /// Resistance in Ohm to convert to temperature, may be repeated
    #[arg(short, long)]
    resistance: Vec<f64>,

    /// Temperature in Celsius to convert to resistance, may be repeated
    #[arg(short = 'T', long)]
    temperature: Vec<f64>,

    /// Log every fitting step
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> steinhart_hart::Result<()> {
    let (table, configured_variants) = match (&args.config, &args.table) {
        (Some(path), _) => {
            let config = Config::from_file(path)?;
            (config.load_table::<f64>()?, config.variants)
        }
        (None, Some(path)) => {
            let format = CsvFormat {
                delimiter: args.delimiter,
                has_headers: args.has_headers,
            };
            let table =
                CalibrationTable::from_file(&args.name, &args.description, path, &format)?;
            (table, Variant::ALL.to_vec())
        }
        (None, None) => unreachable!("clap requires either --config or --table"),
    };

    let variants = if args.variants.is_empty() {
        configured_variants
    } else {
        args.variants.clone()
    };

    for variant in variants {
        let model = SteinhartHartModel::new(table.clone(), variant)?;
        print!("{}", Report::new(&model));

        for &resistance in &args.resistance {
            match model.calc_temperature(resistance) {
                Ok(temperature) => {
                    println!("resistance={resistance:>10.1}\t-> temperature={temperature:>9.3}");
                }
                Err(e) => println!("resistance={resistance:>10.1}\t-> {e}"),
            }
        }
        for &temperature in &args.temperature {
            match model.calc_resistance(temperature) {
                Ok(resistance) => {
                    println!("temperature={temperature:>6.1}\t-> resistance={resistance:>10.2}");
                }
                Err(e) => println!("temperature={temperature:>6.1}\t-> {e}"),
            }
        }
        if !(args.resistance.is_empty() && args.temperature.is_empty()) {
            println!();
        }
    }

    Ok(())
}
