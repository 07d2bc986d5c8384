use std::{fmt::Display, str::FromStr};

use ream_consensus_misc::attestation::Attestation;
use thiserror::Error;

use crate::{
    engine::{AggregationOutcome, aggregate, aggregate_in_place},
    errors::AggregationFailure,
};

/// How the aggregation engine stores attestations while it runs. Both strategies produce the
/// same aggregates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AggregationStrategy {
    /// Copies the input and allocates a new result.
    Naive,
    /// Reuses the input's buffer for the result.
    #[default]
    InPlace,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid aggregation strategy: {0}, expected naive or in-place")]
pub struct ParseStrategyError(pub String);

impl AggregationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationStrategy::Naive => "naive",
            AggregationStrategy::InPlace => "in-place",
        }
    }

    pub fn aggregate(
        self,
        attestations: Vec<Attestation>,
    ) -> Result<AggregationOutcome, AggregationFailure> {
        match self {
            AggregationStrategy::Naive => aggregate(&attestations),
            AggregationStrategy::InPlace => aggregate_in_place(attestations),
        }
    }
}

impl FromStr for AggregationStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "naive" => AggregationStrategy::Naive,
            "in-place" | "in_place" => AggregationStrategy::InPlace,
            _ => return Err(ParseStrategyError(s.to_string())),
        })
    }
}

impl Display for AggregationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
