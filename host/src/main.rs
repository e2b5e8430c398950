//! Calc Hub command-line host
//!
//! Runs one calculator module through the runtime, printing its result and
//! a performance report.

mod cli;
mod config;
mod render;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::HostConfig;
use module_loader::{CalculatorRuntime, ModuleRegistry};
use perf::{MetricsRecorder, PerformanceReport, SharedConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let host_config = match &cli.config {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };
    let config = SharedConfig::new(host_config.performance_config());
    let recorder = Arc::new(
        MetricsRecorder::new()
            .with_capacity(host_config.metrics_capacity)
            .with_config(config),
    );
    let runtime = CalculatorRuntime::with_parts(
        ModuleRegistry::builtin(),
        recorder,
        host_config.result_cache.clone(),
    );

    tracing::info!(calculator = %cli.calculator, "Starting calc host");

    // Dropping the handle does not stop the preload
    let _warm_up = runtime.warm_up();

    let inputs = cli.record();
    for _ in 0..cli.repeat.max(1) {
        let outputs = runtime.compute(&cli.calculator, &inputs).await?;
        print!("{}", render::render_timed(runtime.recorder(), &cli.calculator, &outputs));
    }

    let report: PerformanceReport = runtime.report();
    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        eprintln!("{}", report);
    }
    Ok(())
}
