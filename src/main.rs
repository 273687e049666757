//! Soil nutrient prediction CLI
//!
//! Usage: `npk <TEMPERATURE> <HUMIDITY> <PH> <RAINFALL>`
//!
//! Prints a single JSON line with the predicted nitrogen, phosphorus and
//! potassium levels.

use clap::Parser;
use npk::predict::ARGUMENT_COUNT_ERROR;
use npk::{Config, Result};

#[derive(Parser)]
#[command(name = "npk")]
#[command(
    about = "Predict soil nitrogen, phosphorus and potassium from climate readings",
    long_about = None
)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Model path (without the .mpk extension), overrides the config file
    #[arg(short, long)]
    model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    // Everything from the first value on is taken verbatim, so `-inf`,
    // `-.5` or `-abc` reach the predictor instead of the flag parser.
    /// Temperature, humidity, ph and rainfall, in that order
    #[arg(
        value_name = "VALUE",
        num_args = 1..,
        allow_hyphen_values = true,
        trailing_var_arg = true
    )]
    values: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging (stderr, so stdout carries only the JSON line)
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let [temperature, humidity, ph, rainfall] = match <[String; 4]>::try_from(cli.values) {
        Ok(values) => values,
        Err(values) => {
            log::debug!("Expected 4 values, got {}", values.len());
            commands::print_error(ARGUMENT_COUNT_ERROR);
            std::process::exit(1);
        }
    };

    // Load or create config
    let mut config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    if let Some(model) = cli.model {
        config.data.model_path = model;
    }

    if let Err(e) = commands::predict(&config, &temperature, &humidity, &ph, &rainfall) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use npk::model::{InferenceBackend, ModelHandle};
    use npk::predict::{PredictionOutcome, Predictor};

    pub fn predict(
        config: &Config,
        temperature: &str,
        humidity: &str,
        ph: &str,
        rainfall: &str,
    ) -> Result<()> {
        let device = Default::default();
        let model = ModelHandle::<InferenceBackend>::load(
            &config.data.model_path,
            &config.model,
            device,
        )?;

        let predictor = Predictor::new(model);
        let outcome = predictor.predict(temperature, humidity, ph, rainfall)?;

        if outcome.is_error() {
            log::warn!("Could not parse input values");
        }

        println!("{}", outcome.to_json()?);
        Ok(())
    }

    pub fn print_error(message: &str) {
        let outcome = PredictionOutcome::error(message);
        match outcome.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}
