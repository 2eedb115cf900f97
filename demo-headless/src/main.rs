use clap::{Parser, ValueEnum};
use fire_danger_core::{
    Assessment, CachedProvider, EngineConfig, ErrorBody, FireDangerEngine, FireDangerError,
    FixtureProvider, GeoScalarProvider, SyntheticProvider, ThreatRequest,
};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Which reports to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Threat,
    Spread,
    Both,
}

/// Fire danger and threat scoring for a point and time
#[derive(Parser, Debug)]
#[command(name = "fire-danger")]
#[command(about = "FWI-based fire danger, spread direction and threat score", long_about = None)]
struct Args {
    /// Latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,

    /// Longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<String>,

    /// ISO-8601 timestamp (RFC 3339, or naive date/date-time read as UTC)
    #[arg(long)]
    datetime: Option<String>,

    /// Fire power weight (clamped to 0.1-1.0 before renormalizing)
    #[arg(long)]
    w_fire: Option<f64>,

    /// Spread weight
    #[arg(long)]
    w_spread: Option<f64>,

    /// Population exposure weight
    #[arg(long)]
    w_exposure: Option<f64>,

    /// Reports to produce
    #[arg(long, value_enum, default_value_t = Mode::Both)]
    mode: Mode,

    /// Engine configuration JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Answer from a fixture JSON instead of the synthetic provider
    #[arg(long, conflicts_with = "seed")]
    fixture: Option<PathBuf>,

    /// Seed for the synthetic provider
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Days before the query day that feed the FWI recurrence (overrides config)
    #[arg(long)]
    spinup_days: Option<u32>,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

fn to_json(value: &impl serde::Serialize, pretty: bool) -> String {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.unwrap_or_else(|e| format!(r#"{{"error":"serialization failed: {e}"}}"#))
}

fn build_provider(args: &Args) -> Result<Arc<dyn GeoScalarProvider>, FireDangerError> {
    if let Some(path) = &args.fixture {
        info!("Using fixture provider from {}", path.display());
        Ok(Arc::new(FixtureProvider::from_path(path)?))
    } else {
        info!("Using synthetic provider with seed {}", args.seed);
        Ok(Arc::new(SyntheticProvider::new(args.seed)))
    }
}

fn run(args: &Args) -> Result<Assessment, FireDangerError> {
    let request = ThreatRequest {
        lat: args.lat.clone().map(Value::String),
        lon: args.lon.clone().map(Value::String),
        datetime: args.datetime.clone(),
        w_fire: args.w_fire.map(Value::from),
        w_spread: args.w_spread.map(Value::from),
        w_exposure: args.w_exposure.map(Value::from),
    };

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    // Requests are validated before any provider is built
    let query = request.validate(&config.default_weights)?;

    if let Some(days) = args.spinup_days {
        config.spinup_days = days;
    }

    let provider = CachedProvider::new(build_provider(args)?);
    let engine = FireDangerEngine::new(provider, config)?;

    match args.mode {
        Mode::Threat => Ok(Assessment {
            threat: Some(engine.assess_threat(&query)?),
            spread: None,
        }),
        Mode::Spread => Ok(Assessment {
            threat: None,
            spread: Some(engine.assess_spread(&query)?),
        }),
        Mode::Both => engine.assess(&query),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(assessment) => {
            println!("{}", to_json(&assessment, args.pretty));
            ExitCode::SUCCESS
        }
        Err(err) => {
            let body = ErrorBody::from(&err);
            if err.is_client_error() {
                println!("{}", to_json(&body, args.pretty));
                ExitCode::from(2)
            } else {
                error!("Assessment failed: {err}");
                println!("{}", to_json(&body, args.pretty));
                ExitCode::from(1)
            }
        }
    }
}
