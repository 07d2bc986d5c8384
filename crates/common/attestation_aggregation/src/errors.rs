use ream_bls::errors::BLSError;
use ream_consensus_misc::attestation::Attestation;
use thiserror::Error;

use crate::bitfield::BitfieldError;

#[derive(Error, Debug, PartialEq)]
pub enum AggregationError {
    #[error("Invalid max cover problem: {0}")]
    InvalidProblem(&'static str),
    #[error("Bitlists are of different lengths")]
    BitsLengthMismatch,
    #[error("Cannot aggregate {0} attestations, at least 2 are required")]
    InvalidAttestationCount(usize),
    #[error("Failed to aggregate signatures of {count} attestations: {source}")]
    SignatureAggregation {
        count: usize,
        #[source]
        source: BLSError,
    },
    #[error(transparent)]
    Bitfield(BitfieldError),
}

impl AggregationError {
    /// Whether the caller should treat this as a failure. Batches mixing bitlist lengths are
    /// expected and are returned untouched instead.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::BitsLengthMismatch)
    }
}

impl From<BitfieldError> for AggregationError {
    fn from(err: BitfieldError) -> Self {
        match err {
            BitfieldError::LengthMismatch { .. } => Self::BitsLengthMismatch,
            err => Self::Bitfield(err),
        }
    }
}

/// A failed aggregation call. `partial` holds the aggregates completed before the failure
/// followed by every attestation that was not consumed yet; it is empty when the batch was
/// rejected up front.
#[derive(Error, Debug)]
#[error("Attestation aggregation aborted with {} attestations left", .partial.len())]
pub struct AggregationFailure {
    #[source]
    pub error: AggregationError,
    pub partial: Vec<Attestation>,
}

impl AggregationFailure {
    pub fn new(error: AggregationError, partial: Vec<Attestation>) -> Self {
        Self { error, partial }
    }
}
