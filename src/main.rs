//! soaralarm command line
//!
//! Usage:
//! ```bash
//! # Show the site catalog
//! soaralarm sites
//!
//! # Classify a forecast batch for soaring sites between 10:00 and 18:00
//! soaralarm forecast --series knmi.json --from 10:00 --to 18:00
//!
//! # Thermal forecast with a custom catalog
//! soaralarm forecast --series coo.json --mode thermal --catalog sites.json
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use soaralarm::forecast::{ForecastBatch, select_model};
use soaralarm::{
    ForecastError, PreferenceWindow, SiteCatalog, SiteKind, SoarAlarmConfig, logging,
    soar_forecast, thermal_forecast,
};

#[derive(Parser)]
#[command(
    name = "soaralarm",
    version,
    about = "Flight-suitability forecasts for paragliding sites",
    long_about = "Classifies hourly weather forecasts for slope-soaring and thermal sites and picks the best site per day."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to <config dir>/soaralarm/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the site catalog as JSON
    Sites {
        /// JSON site list (overrides the configured catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Classify forecast batches and print the report as JSON
    Forecast {
        /// Forecast batch files, one batch or a list of batches each
        #[arg(long, required = true, num_args = 1..)]
        series: Vec<PathBuf>,

        /// JSON site list (overrides the configured catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Site type to classify (soar or thermal)
        #[arg(long)]
        mode: Option<SiteKind>,

        /// Weather model to use when batches of several models are given
        #[arg(long)]
        model: Option<String>,

        /// Earliest preferred time of day, HH:MM
        #[arg(long)]
        from: Option<String>,

        /// Latest preferred time of day, HH:MM
        #[arg(long)]
        to: Option<String>,

        /// Reference date for day labels (defaults to the local date)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:?}");
            eprintln!("Error: {e:#}");
            if let Some(error) = e.downcast_ref::<ForecastError>() {
                eprintln!("{}", error.user_message());
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = SoarAlarmConfig::load_from_path(cli.config)?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Sites { catalog } => {
            if catalog.is_some() {
                config.catalog.path = catalog;
            }
            let catalog = config.load_catalog()?;
            write_json(&catalog.sites())
        }
        Command::Forecast {
            series,
            catalog,
            mode,
            model,
            from,
            to,
            today,
        } => {
            if catalog.is_some() {
                config.catalog.path = catalog;
            }
            if let Some(mode) = mode {
                config.preferences.mode = mode.to_string();
            }
            if let Some(model) = model {
                config.preferences.model = model;
            }
            if let Some(from) = from {
                config.preferences.time_range_start = from;
            }
            if let Some(to) = to {
                config.preferences.time_range_end = to;
            }
            config.validate()?;

            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            forecast(&config, &series, today)
        }
    }
}

fn forecast(config: &SoarAlarmConfig, paths: &[PathBuf], today: NaiveDate) -> Result<()> {
    let catalog: SiteCatalog = config.load_catalog()?;
    let kind = config.site_kind()?;
    let preference: PreferenceWindow = config.preference_window()?;

    let batches = load_batches(paths)?;
    let batch = select_model(batches, &config.preferences.model)
        .context("No forecast batches in the given files")?;
    info!(
        "Classifying {} series of model {} for {kind} sites",
        batch.sites.len(),
        batch.model
    );

    let indexed = batch.index(&catalog, kind)?;
    // The report of the usable sites is printed even when some were left out
    let malformed = match kind {
        SiteKind::Soar => {
            let report = soar_forecast(&catalog, &indexed, &preference, today)?;
            write_json(&report)?;
            report.malformed_input()
        }
        SiteKind::Thermal => {
            let report = thermal_forecast(&catalog, &indexed, today)?;
            write_json(&report)?;
            report.malformed_input()
        }
    };
    match malformed {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

fn load_batches(paths: &[PathBuf]) -> Result<Vec<ForecastBatch>> {
    let mut batches = Vec::new();
    for path in paths {
        batches.extend(load_file(path)?);
    }
    Ok(batches)
}

fn load_file(path: &Path) -> Result<Vec<ForecastBatch>> {
    ForecastBatch::load(path)
        .with_context(|| format!("Failed to read forecast batches from {}", path.display()))
}

fn write_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("Failed to write JSON output")?;
    writeln!(stdout)?;
    Ok(())
}
