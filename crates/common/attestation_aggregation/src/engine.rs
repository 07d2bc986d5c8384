use ream_bls::{BLSSignature, traits::Aggregatable};
use ream_consensus_misc::attestation::Attestation;
use ream_metrics::{
    ATTESTATION_AGGREGATES_PRODUCED, ATTESTATION_AGGREGATION_TIME, inc_int_counter_vec,
    start_timer_vec, stop_timer,
};
use ssz_types::typenum::U2048;
use tracing::{debug, warn};

use crate::{
    bitfield::BitListExt,
    errors::{AggregationError, AggregationFailure},
    max_cover::{CoverageSolution, MaxCoverProblem},
    store::{AttestationStore, CopyingStore, InPlaceStore},
    strategy::AggregationStrategy,
};

#[derive(Debug, Clone, PartialEq)]
pub enum AggregationOutcome {
    /// Aggregates in creation order followed by the attestations left unaggregated.
    Aggregated(Vec<Attestation>),
    /// The batch mixed bitlist lengths and is returned as received.
    Unchanged(Vec<Attestation>),
}

impl AggregationOutcome {
    pub fn attestations(&self) -> &[Attestation] {
        match self {
            Self::Aggregated(attestations) | Self::Unchanged(attestations) => attestations,
        }
    }

    pub fn into_attestations(self) -> Vec<Attestation> {
        match self {
            Self::Aggregated(attestations) | Self::Unchanged(attestations) => attestations,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged(_))
    }
}

/// Aggregates attestations sharing the same data into as few non-overlapping aggregates as the
/// greedy max cover finds. `attestations` is left untouched.
pub fn aggregate(attestations: &[Attestation]) -> Result<AggregationOutcome, AggregationFailure> {
    if attestations.len() < 2 {
        return Ok(AggregationOutcome::Aggregated(attestations.to_vec()));
    }
    if !should_aggregate(attestations)? {
        return Ok(AggregationOutcome::Unchanged(attestations.to_vec()));
    }

    run(
        CopyingStore::new(attestations),
        attestations.len(),
        AggregationStrategy::Naive,
    )
    .map(AggregationOutcome::Aggregated)
}

/// Same as [`aggregate`], reusing the buffer of `attestations` for the result.
pub fn aggregate_in_place(
    attestations: Vec<Attestation>,
) -> Result<AggregationOutcome, AggregationFailure> {
    if attestations.len() < 2 {
        return Ok(AggregationOutcome::Aggregated(attestations));
    }
    if !should_aggregate(&attestations)? {
        return Ok(AggregationOutcome::Unchanged(attestations));
    }

    let total = attestations.len();
    run(
        InPlaceStore::new(attestations)?,
        total,
        AggregationStrategy::InPlace,
    )
    .map(AggregationOutcome::Aggregated)
}

/// Checks that the batch can be aggregated: it is not empty, the first bitlist is not empty and
/// every bitlist has the length of the first.
pub fn validate_attestations(attestations: &[Attestation]) -> Result<(), AggregationError> {
    let first = attestations
        .first()
        .ok_or(AggregationError::InvalidProblem("empty list"))?;
    let len = first.aggregation_bits.len();
    if len == 0 {
        return Err(AggregationError::InvalidProblem("bitlist cannot be empty"));
    }
    if attestations
        .iter()
        .any(|attestation| attestation.aggregation_bits.len() != len)
    {
        return Err(AggregationError::BitsLengthMismatch);
    }
    Ok(())
}

fn should_aggregate(attestations: &[Attestation]) -> Result<bool, AggregationFailure> {
    match validate_attestations(attestations) {
        Ok(()) => Ok(true),
        Err(error) if !error.is_fatal() => {
            debug!(
                count = attestations.len(),
                "Skipping aggregation of attestations with mismatched bitlist lengths"
            );
            Ok(false)
        }
        Err(error) => Err(AggregationFailure::new(error, vec![])),
    }
}

fn run<S: AttestationStore>(
    mut store: S,
    total: usize,
    strategy: AggregationStrategy,
) -> Result<Vec<Attestation>, AggregationFailure> {
    let timer = start_timer_vec(&ATTESTATION_AGGREGATION_TIME, &[strategy.as_str()]);
    let result = run_rounds(&mut store, total);
    stop_timer(timer);
    inc_int_counter_vec(
        &ATTESTATION_AGGREGATES_PRODUCED,
        store.aggregated_len() as u64,
        &[strategy.as_str()],
    );

    match result {
        Ok(()) => Ok(store.finish()),
        Err(error) => {
            warn!(
                %strategy,
                aggregated = store.aggregated_len(),
                unaggregated = store.unaggregated().len(),
                "Attestation aggregation aborted: {error}"
            );
            Err(AggregationFailure::new(error, store.into_partial()))
        }
    }
}

/// Each round replaces at least two attestations with one, so `total / 2` rounds exhaust every
/// possible merge.
fn run_rounds<S: AttestationStore>(store: &mut S, total: usize) -> Result<(), AggregationError> {
    let Some(first) = store.unaggregated().first() else {
        return Ok(());
    };
    let mut solution = CoverageSolution::new(first.aggregation_bits.len())?;

    for round in 0..total / 2 {
        if store.unaggregated().len() < 2 {
            break;
        }
        MaxCoverProblem::from_attestations(store.unaggregated()).cover_into(
            total,
            false,
            &mut solution,
        )?;
        if solution.selected.len() < 2 {
            break;
        }

        if store.has_aggregate(&solution.coverage) {
            debug!(round, "Discarding attestations matching an existing aggregate");
            store.discard(&solution.selected);
            continue;
        }

        let aggregate = aggregate_selected(store.unaggregated(), &solution)?;
        debug!(
            round,
            selected = solution.selected.len(),
            bits = aggregate.aggregation_bits.count(),
            "Aggregated attestations"
        );
        store.push_aggregate(&solution.selected, aggregate)?;
    }
    Ok(())
}

/// Builds the aggregate of the selected attestations. Data is taken from the first one since
/// every attestation of the batch carries the same data.
fn aggregate_selected(
    unaggregated: &[Attestation],
    solution: &CoverageSolution<U2048>,
) -> Result<Attestation, AggregationError> {
    let count = solution.selected.len();
    if count < 2 {
        return Err(AggregationError::InvalidAttestationCount(count));
    }

    let signatures = solution
        .selected
        .iter()
        .map(|&position| &unaggregated[position].signature)
        .collect::<Vec<_>>();
    let signature = BLSSignature::aggregate(&signatures)
        .map_err(|source| AggregationError::SignatureAggregation { count, source })?;

    Ok(Attestation {
        aggregation_bits: solution.coverage.clone(),
        data: unaggregated[solution.selected[0]].data.clone(),
        signature,
    })
}

#[cfg(test)]
mod tests {
    use ream_bls::{errors::BLSError, traits::Verifiable};
    use tracing_test::traced_test;
    use tree_hash::TreeHash;

    use super::*;
    use crate::test_utils::{attestation, attestation_data, bits, patterns, public_keys};

    fn batch(input: &[&str]) -> Vec<Attestation> {
        input.iter().map(|pattern| attestation(pattern)).collect()
    }

    /// Runs both strategies, checks they agree and returns the naive result.
    fn aggregate_both(input: &[&str]) -> Vec<String> {
        let naive = aggregate(&batch(input)).unwrap();
        let in_place = aggregate_in_place(batch(input)).unwrap();
        assert_eq!(naive, in_place);
        assert!(!naive.is_unchanged());
        patterns(naive.attestations())
    }

    fn assert_verifies(attestation: &Attestation) {
        let public_keys = public_keys(&attestation.aggregation_bits);
        let public_keys = public_keys.iter().collect::<Vec<_>>();
        assert!(
            attestation
                .signature
                .fast_aggregate_verify(public_keys, attestation.data.tree_hash_root().as_slice())
                .unwrap()
        );
    }

    #[test]
    fn test_disjoint_attestations_merge_into_one() {
        assert_eq!(
            aggregate_both(&["100100", "010010", "001000"]),
            vec!["111110"]
        );
    }

    #[test]
    fn test_overlapping_attestation_survives() {
        assert_eq!(
            aggregate_both(&["100100", "010010", "001100"]),
            vec!["110110", "001100"]
        );
    }

    #[test]
    fn test_identical_attestations_collapse() {
        assert_eq!(aggregate_both(&["11000", "11000"]), vec!["11000"]);
    }

    #[test]
    fn test_single_attestation_unchanged() {
        let input = batch(&["0110"]);
        assert_eq!(
            aggregate(&input).unwrap(),
            AggregationOutcome::Aggregated(input.clone())
        );
        assert_eq!(
            aggregate_in_place(input.clone()).unwrap(),
            AggregationOutcome::Aggregated(input)
        );
    }

    #[test]
    fn test_empty_input_unchanged() {
        assert_eq!(
            aggregate(&[]).unwrap(),
            AggregationOutcome::Aggregated(vec![])
        );
        assert_eq!(
            aggregate_in_place(vec![]).unwrap(),
            AggregationOutcome::Aggregated(vec![])
        );
    }

    #[test]
    #[traced_test]
    fn test_mismatched_lengths_returned_unchanged() {
        let input = batch(&["1000", "01000", "0010"]);

        let outcome = aggregate(&input).unwrap();
        assert!(outcome.is_unchanged());
        assert_eq!(outcome.attestations(), input.as_slice());

        let outcome = aggregate_in_place(input.clone()).unwrap();
        assert_eq!(outcome, AggregationOutcome::Unchanged(input));
        assert!(logs_contain(
            "Skipping aggregation of attestations with mismatched bitlist lengths"
        ));
    }

    #[test]
    fn test_empty_first_bitlist_is_fatal() {
        let empty = Attestation {
            aggregation_bits: bits(""),
            ..attestation("1")
        };
        let input = vec![empty.clone(), empty];

        let failure = aggregate(&input).unwrap_err();
        assert_eq!(
            failure.error,
            AggregationError::InvalidProblem("bitlist cannot be empty")
        );
        assert!(failure.partial.is_empty());

        let failure = aggregate_in_place(input).unwrap_err();
        assert!(failure.error.is_fatal());
        assert!(failure.partial.is_empty());
    }

    #[test]
    fn test_duplicate_coverage_is_discarded() {
        // The second round selects "1000", "0010", "0100" and "0001", whose union equals the
        // first aggregate.
        assert_eq!(
            aggregate_both(&["1010", "0101", "1000", "0010", "0100", "0001"]),
            vec!["1111"]
        );
    }

    #[test]
    fn test_signature_failure_returns_partial_result() {
        let mut input = batch(&["1100", "0011", "1000", "0100"]);
        input[2].signature = BLSSignature::from_bytes(&[0xff; 96]).unwrap();

        let expected_error = AggregationError::SignatureAggregation {
            count: 2,
            source: BLSError::InvalidSignature,
        };

        let failure = aggregate(&input).unwrap_err();
        assert_eq!(failure.error, expected_error);
        assert_eq!(patterns(&failure.partial), vec!["1111", "1000", "0100"]);

        let failure = aggregate_in_place(input).unwrap_err();
        assert_eq!(failure.error, expected_error);
        assert_eq!(patterns(&failure.partial), vec!["1111", "1000", "0100"]);
    }

    #[test]
    fn test_aggregates_verify() {
        let input = batch(&["10000001", "01000010", "00100100", "00011000", "11000000"]);
        let outcome = aggregate_in_place(input).unwrap();

        assert_eq!(
            patterns(outcome.attestations()),
            vec!["11111111", "11000000"]
        );
        for attestation in outcome.attestations() {
            assert_eq!(attestation.data, attestation_data());
            assert_verifies(attestation);
        }
    }

    #[test]
    fn test_aggregate_selected_requires_two_attestations() {
        let input = batch(&["10", "01"]);
        let solution = CoverageSolution {
            selected: vec![0],
            coverage: bits("10"),
        };
        assert_eq!(
            aggregate_selected(&input, &solution),
            Err(AggregationError::InvalidAttestationCount(1))
        );
    }
}
