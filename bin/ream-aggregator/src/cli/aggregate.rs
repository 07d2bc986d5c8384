use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use clap::Parser;
use ream_attestation_aggregation::{AggregationOutcome, AggregationStrategy};
use ream_consensus_misc::attestation::Attestation;
use tracing::{info, warn};

use crate::cli::{
    constants::{DEFAULT_STRATEGY, DEFAULT_VERBOSITY},
    verbosity::{Verbosity, verbosity_parser},
};

#[derive(Debug, Parser)]
pub struct AggregateConfig {
    #[arg(short, long, help = "Verbosity level, from 1 (error) to 5 (trace)", default_value = DEFAULT_VERBOSITY, value_parser = verbosity_parser)]
    pub verbosity: Verbosity,

    #[arg(
        long,
        help = "JSON or YAML file holding a list of attestations with identical data"
    )]
    pub input: PathBuf,

    #[arg(long, help = "Where to write the aggregated attestations, stdout if unset")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Choose naive or in-place", default_value = DEFAULT_STRATEGY, value_parser = strategy_parser)]
    pub strategy: AggregationStrategy,
}

pub fn strategy_parser(s: &str) -> Result<AggregationStrategy, String> {
    s.parse::<AggregationStrategy>()
        .map_err(|err| err.to_string())
}

/// Reads attestations from a YAML file when the extension says so, JSON otherwise.
pub fn read_attestations(path: &Path) -> anyhow::Result<Vec<Attestation>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read attestations from {}", path.display()))?;

    match path.extension().and_then(|extension| extension.to_str()) {
        Some("yaml" | "yml") => serde_yaml::from_str(&content)
            .map_err(|err| anyhow!("Failed to parse YAML attestations: {err}")),
        _ => serde_json::from_str(&content)
            .map_err(|err| anyhow!("Failed to parse JSON attestations: {err}")),
    }
}

pub fn write_attestations(path: Option<&Path>, attestations: &[Attestation]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(attestations)?;
    match path {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("Failed to write attestations to {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

pub fn run_aggregate(config: &AggregateConfig) -> anyhow::Result<AggregationOutcome> {
    let attestations = read_attestations(&config.input)?;
    let input_count = attestations.len();

    let outcome = match config.strategy.aggregate(attestations) {
        Ok(outcome) => outcome,
        Err(failure) => {
            warn!(
                partial = failure.partial.len(),
                "Aggregation aborted, writing the attestations produced so far"
            );
            write_attestations(config.output.as_deref(), &failure.partial)?;
            return Err(failure).context("Failed to aggregate attestations");
        }
    };
    if outcome.is_unchanged() {
        warn!("Attestation bitlists differ in length, writing them unaggregated");
    }
    info!(
        strategy = %config.strategy,
        input = input_count,
        output = outcome.attestations().len(),
        "Aggregated attestations"
    );

    write_attestations(config.output.as_deref(), outcome.attestations())?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use ream_bls::{
        BLSSignature, PrivateKey,
        traits::{Aggregatable, Signable},
    };
    use ream_consensus_misc::{
        attestation::AggregationBits, attestation_data::AttestationData, checkpoint::Checkpoint,
    };
    use tree_hash::TreeHash;

    use super::*;

    fn attestation(pattern: &str) -> Attestation {
        let data = AttestationData {
            slot: 10,
            index: 0,
            beacon_block_root: B256::repeat_byte(0xaa),
            source: Checkpoint::default(),
            target: Checkpoint {
                epoch: 1,
                root: B256::repeat_byte(0xbb),
            },
        };
        let mut aggregation_bits = AggregationBits::with_capacity(pattern.len()).unwrap();
        let mut signatures = vec![];
        for (index, flag) in pattern.chars().enumerate() {
            if flag == '1' {
                aggregation_bits.set(index, true).unwrap();
                let mut key = [0u8; 32];
                key[31] = index as u8 + 1;
                let private_key = PrivateKey {
                    inner: B256::from(key),
                };
                signatures.push(private_key.sign(data.tree_hash_root().as_slice()).unwrap());
            }
        }
        Attestation {
            aggregation_bits,
            data,
            signature: BLSSignature::aggregate(&signatures.iter().collect::<Vec<_>>()).unwrap(),
        }
    }

    fn config(input: PathBuf, output: PathBuf, strategy: AggregationStrategy) -> AggregateConfig {
        AggregateConfig {
            verbosity: Verbosity::Info,
            input,
            output: Some(output),
            strategy,
        }
    }

    #[test]
    fn test_strategy_parser() {
        assert_eq!(strategy_parser("naive"), Ok(AggregationStrategy::Naive));
        assert!(strategy_parser("fastest").is_err());
    }

    #[test]
    fn test_aggregate_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("attestations.json");
        let output = dir.path().join("aggregated.json");
        let attestations = vec![attestation("1000"), attestation("0110"), attestation("0001")];
        fs::write(&input, serde_json::to_string(&attestations).unwrap()).unwrap();

        let outcome =
            run_aggregate(&config(input, output.clone(), AggregationStrategy::Naive)).unwrap();
        assert_eq!(outcome.attestations().len(), 1);

        let written = read_attestations(&output).unwrap();
        assert_eq!(written, outcome.into_attestations());
        assert_eq!(written[0].aggregation_bits.num_set_bits(), 4);
    }

    #[test]
    fn test_aggregate_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("attestations.yaml");
        let output = dir.path().join("aggregated.json");
        let attestations = vec![attestation("1100"), attestation("1100")];
        fs::write(&input, serde_yaml::to_string(&attestations).unwrap()).unwrap();

        let outcome =
            run_aggregate(&config(input, output, AggregationStrategy::InPlace)).unwrap();
        assert_eq!(outcome.attestations(), &attestations[..1]);
    }

    #[test]
    fn test_partial_result_written_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("attestations.json");
        let output = dir.path().join("aggregated.json");
        let mut attestations = vec![
            attestation("1100"),
            attestation("0011"),
            attestation("1000"),
            attestation("0100"),
        ];
        attestations[2].signature = BLSSignature::from_bytes(&[0xff; 96]).unwrap();
        fs::write(&input, serde_json::to_string(&attestations).unwrap()).unwrap();

        let err = run_aggregate(&config(input, output.clone(), AggregationStrategy::Naive))
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to aggregate attestations");

        let written = read_attestations(&output).unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(written[0].aggregation_bits.num_set_bits(), 4);
        assert_eq!(written[1], attestations[2]);
        assert_eq!(written[2], attestations[3]);
    }

    #[test]
    fn test_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_attestations(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read attestations from"));
    }
}
