use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use authlog_geo::config::{AnalyzerConfig, DEFAULT_DATABASE, DEFAULT_OUTPUT, DEFAULT_TOP};
use authlog_geo::report::{write_country_csv, write_json, write_summary};
use authlog_geo::{analyze, MaxMindLookup};

#[derive(Parser)]
#[command(name = "authlog-geo")]
#[command(author, version, about = "Tally failed SSH password attempts by address, user and country")]
struct Cli {
    /// Input log files
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// MaxMind GeoLite2/GeoIP2 country or city database
    #[arg(short, long, default_value = DEFAULT_DATABASE)]
    database: PathBuf,

    /// Where to write the country CSV
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Entries shown per ranking
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP)]
    top: usize,

    /// Year for syslog timestamps (default: current year)
    #[arg(long)]
    year: Option<i32>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AnalyzerConfig {
        database: cli.database,
        output: cli.output,
        top: cli.top,
        ..AnalyzerConfig::default()
    };
    if let Some(year) = cli.year {
        config.year = year;
    }

    let lookup = MaxMindLookup::open(&config.database)
        .with_context(|| format!("cannot use GeoIP database {}", config.database.display()))?;

    let analysis = analyze(&cli.inputs, &lookup, config.year)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        write_json(&mut out, &analysis, config.top)?;
    } else {
        write_summary(&mut out, &analysis, config.top).context("failed to print summary")?;
    }
    out.flush()?;

    write_country_csv(&config.output, &analysis.countries)
        .context("country CSV export aborted")?;

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout carries the report; diagnostics go to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
