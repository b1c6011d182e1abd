//! Binary entry point for `car-advisor`.
//!
//! This module provides the command-line interface for car-advisor with options
//! for configuration file paths and logging verbosity. It initializes the
//! necessary components and starts the service.

use std::process::ExitCode;

use car_advisor::base::{
    config::Config,
    types::{RelayError, Void},
};
use clap::Parser;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing::error;
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Car-advisor – a single-page car buying advisor backed by a hosted LLM.
///
/// Configuration can come from `config.toml` or `CAR_ADVISOR_*` environment
/// variables.  The advisor serves a web form, relays each question to the
/// configured provider, and shows the answer.
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// Override the config file path (optional).
    ///
    /// By default, the advisor will look for a config file at `.hidden/config.toml`
    /// in the current directory.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Export spans over OTLP (HTTP) to the collector named by the standard
    /// `OTEL_EXPORTER_OTLP_*` environment variables.
    #[arg(long)]
    otlp: bool,
}

/// Main entry point for the car-advisor binary.
///
/// Sets up logging based on verbosity, loads configuration, and starts the advisor.
/// Startup failures (missing credential, missing dataset) are logged once and
/// end the process with a failure status.
#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = init_tracing(&args) {
        eprintln!("Cannot set up logging: {err:#}");
        return ExitCode::FAILURE;
    }

    let result = match Config::load(args.config.as_deref()) {
        Ok(config) => car_advisor::start(config).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<RelayError>() {
                Some(relay) if relay.is_fatal() => error!("Cannot start: {relay}"),
                _ => error!("Exiting with error: {err:#}"),
            }

            ExitCode::FAILURE
        }
    }
}

fn init_tracing(args: &Args) -> Void {
    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer.

    let stdout = tracing_subscriber::fmt::layer()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    // Prepare the otlp layer.

    let otel = if args.otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("car-advisor");
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stdout).try_init()?;

    Ok(())
}
