//! Max-cover aggregation of attestations that share the same [`AttestationData`].
//!
//! Attestations whose aggregation bits are pairwise disjoint are merged into aggregates, picked
//! round by round with a greedy approximation of the maximum coverage problem. Two storage
//! strategies run the same rounds: [`aggregate`] copies the caller's slice, while
//! [`aggregate_in_place`] consumes the caller's vector and reuses its buffer.
//!
//! [`AttestationData`]: ream_consensus_misc::attestation_data::AttestationData

pub mod bitfield;
pub mod engine;
pub mod errors;
pub mod max_cover;
pub mod store;
pub mod strategy;

#[cfg(test)]
pub(crate) mod test_utils;

pub use engine::{AggregationOutcome, aggregate, aggregate_in_place};
pub use errors::{AggregationError, AggregationFailure};
pub use strategy::AggregationStrategy;
