pub mod aggregate;
pub mod constants;
pub mod verbosity;

use clap::{Parser, Subcommand};

use crate::cli::aggregate::AggregateConfig;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Aggregate a batch of attestations sharing the same data
    #[command(name = "aggregate")]
    Aggregate(AggregateConfig),
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ream_attestation_aggregation::AggregationStrategy;

    use super::*;
    use crate::cli::verbosity::Verbosity;

    #[test]
    fn test_cli_aggregate_command() {
        let cli = Cli::parse_from([
            "program",
            "aggregate",
            "--input",
            "attestations.yaml",
            "--strategy",
            "naive",
            "--verbosity",
            "4",
        ]);

        match cli.command {
            Commands::Aggregate(config) => {
                assert_eq!(config.input, PathBuf::from("attestations.yaml"));
                assert_eq!(config.output, None);
                assert_eq!(config.strategy, AggregationStrategy::Naive);
                assert_eq!(config.verbosity, Verbosity::Debug);
            }
        }
    }

    #[test]
    fn test_cli_aggregate_defaults() {
        let cli = Cli::parse_from(["program", "aggregate", "--input", "in.json"]);

        match cli.command {
            Commands::Aggregate(config) => {
                assert_eq!(config.strategy, AggregationStrategy::InPlace);
                assert_eq!(config.verbosity, Verbosity::Info);
            }
        }
    }

    #[test]
    fn test_cli_rejects_unknown_strategy() {
        let result = Cli::try_parse_from([
            "program",
            "aggregate",
            "--input",
            "in.json",
            "--strategy",
            "exact",
        ]);
        assert!(result.is_err());
    }
}
