use clap::Parser;
use ream_aggregator::cli::{
    Cli, Commands,
    aggregate::{AggregateConfig, run_aggregate},
    verbosity::Verbosity,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn setup_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn aggregate(config: AggregateConfig) {
    setup_logging(config.verbosity);
    if let Err(err) = run_aggregate(&config) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Aggregate(config) => aggregate(config),
    }
}
