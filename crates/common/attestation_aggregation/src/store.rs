use std::cmp::Ordering;

use ream_consensus_misc::attestation::{AggregationBits, Attestation};

use crate::{
    bitfield::{BitListExt, empty_bitlist},
    errors::{AggregationError, AggregationFailure},
};

/// Storage for one aggregation call: the aggregates produced so far and the attestations that
/// are still candidates for aggregation.
///
/// Positions passed to [`Self::push_aggregate`] and [`Self::discard`] index into
/// [`Self::unaggregated`] and are sorted ascending.
pub trait AttestationStore {
    fn unaggregated(&self) -> &[Attestation];

    fn aggregated_len(&self) -> usize;

    /// Whether an aggregate with exactly this coverage was already produced.
    fn has_aggregate(&self, coverage: &AggregationBits) -> bool;

    /// Stores `aggregate` and drops the attestations it was built from.
    fn push_aggregate(
        &mut self,
        selected: &[usize],
        aggregate: Attestation,
    ) -> Result<(), AggregationError>;

    /// Drops the selected attestations without producing an aggregate.
    fn discard(&mut self, selected: &[usize]);

    /// Aggregates in creation order, followed by the unaggregated attestations that are not
    /// contained in another one.
    fn finish(self) -> Vec<Attestation>;

    /// Aggregates followed by every unaggregated attestation, unfiltered.
    fn into_partial(self) -> Vec<Attestation>;
}

/// Keeps aggregates and leftovers in separate vectors, working on a copy of the input.
#[derive(Debug)]
pub struct CopyingStore {
    aggregated: Vec<Attestation>,
    unaggregated: Vec<Attestation>,
}

impl CopyingStore {
    pub fn new(attestations: &[Attestation]) -> Self {
        Self {
            aggregated: Vec::with_capacity(attestations.len()),
            unaggregated: attestations.to_vec(),
        }
    }
}

impl AttestationStore for CopyingStore {
    fn unaggregated(&self) -> &[Attestation] {
        &self.unaggregated
    }

    fn aggregated_len(&self) -> usize {
        self.aggregated.len()
    }

    fn has_aggregate(&self, coverage: &AggregationBits) -> bool {
        self.aggregated
            .iter()
            .any(|attestation| attestation.aggregation_bits == *coverage)
    }

    fn push_aggregate(
        &mut self,
        selected: &[usize],
        aggregate: Attestation,
    ) -> Result<(), AggregationError> {
        self.aggregated.push(aggregate);
        self.discard(selected);
        Ok(())
    }

    fn discard(&mut self, selected: &[usize]) {
        let mut position = 0;
        self.unaggregated.retain(|_| {
            let keep = selected.binary_search(&position).is_err();
            position += 1;
            keep
        });
    }

    fn finish(self) -> Vec<Attestation> {
        let mut attestations = self.aggregated;
        attestations.extend(filter_contained(self.unaggregated));
        attestations
    }

    fn into_partial(self) -> Vec<Attestation> {
        let mut attestations = self.aggregated;
        attestations.extend(self.unaggregated);
        attestations
    }
}

/// Orders attestations by descending number of set bits, then by descending bits so the order
/// is total.
pub fn by_coverage_descending(left: &Attestation, right: &Attestation) -> Ordering {
    right
        .aggregation_bits
        .count()
        .cmp(&left.aggregation_bits.count())
        .then_with(|| {
            right
                .aggregation_bits
                .iter()
                .cmp(left.aggregation_bits.iter())
        })
}

/// Removes attestations whose bits are contained in those of another attestation.
///
/// Attestations are sorted with [`by_coverage_descending`] and each one is compared only against
/// the last one kept.
pub fn filter_contained(mut attestations: Vec<Attestation>) -> Vec<Attestation> {
    if attestations.len() < 2 {
        return attestations;
    }
    attestations.sort_by(by_coverage_descending);
    attestations
        .dedup_by(|candidate, kept| kept.aggregation_bits.contains(&candidate.aggregation_bits));
    attestations
}

/// Works inside the caller's vector: `attestations[..boundary]` holds aggregates,
/// `attestations[boundary..]` the attestations not aggregated yet.
///
/// An aggregate overwrites the slot of its first constituent and is rotated to the boundary,
/// then the remaining constituents are compacted out by swapping. Unaggregated attestations
/// keep their relative order and the buffer is never reallocated.
#[derive(Debug)]
pub struct InPlaceStore {
    attestations: Vec<Attestation>,
    boundary: usize,
    /// Union of all aggregates produced so far.
    covered: AggregationBits,
}

impl InPlaceStore {
    /// Takes ownership of `attestations`. On failure they are handed back untouched.
    pub fn new(attestations: Vec<Attestation>) -> Result<Self, AggregationFailure> {
        let len = attestations
            .first()
            .map_or(0, |attestation| attestation.aggregation_bits.len());
        match empty_bitlist(len) {
            Ok(covered) => Ok(Self {
                attestations,
                boundary: 0,
                covered,
            }),
            Err(err) => Err(AggregationFailure::new(err.into(), attestations)),
        }
    }

    /// Drops `base + position` for every position, scanning from `start`. Positions are
    /// ascending and none lies below `start - base`.
    fn compact(&mut self, base: usize, start: usize, positions: &[usize]) {
        let mut removed = positions.iter().map(|position| base + position).peekable();
        let mut write = start;
        for read in start..self.attestations.len() {
            if removed.next_if_eq(&read).is_some() {
                continue;
            }
            self.attestations.swap(write, read);
            write += 1;
        }
        self.attestations.truncate(write);
    }
}

impl AttestationStore for InPlaceStore {
    fn unaggregated(&self) -> &[Attestation] {
        &self.attestations[self.boundary..]
    }

    fn aggregated_len(&self) -> usize {
        self.boundary
    }

    fn has_aggregate(&self, coverage: &AggregationBits) -> bool {
        self.covered.contains(coverage)
            && self.attestations[..self.boundary]
                .iter()
                .any(|attestation| attestation.aggregation_bits == *coverage)
    }

    fn push_aggregate(
        &mut self,
        selected: &[usize],
        aggregate: Attestation,
    ) -> Result<(), AggregationError> {
        let Some((&first, rest)) = selected.split_first() else {
            return Err(AggregationError::InvalidAttestationCount(0));
        };
        aggregate.aggregation_bits.union_into(&mut self.covered)?;

        let base = self.boundary;
        let slot = base + first;
        self.attestations[slot] = aggregate;
        self.attestations[base..=slot].rotate_right(1);
        self.boundary += 1;

        // Rotation only touched slots up to `slot`, every remaining position lies beyond it.
        self.compact(base, slot + 1, rest);
        Ok(())
    }

    fn discard(&mut self, selected: &[usize]) {
        if let Some(&first) = selected.first() {
            self.compact(self.boundary, self.boundary + first, selected);
        }
    }

    fn finish(mut self) -> Vec<Attestation> {
        let survivors = &mut self.attestations[self.boundary..];
        survivors.sort_unstable_by(by_coverage_descending);

        let mut kept = 0;
        for index in 0..survivors.len() {
            if kept > 0
                && survivors[kept - 1]
                    .aggregation_bits
                    .contains(&survivors[index].aggregation_bits)
            {
                continue;
            }
            survivors.swap(kept, index);
            kept += 1;
        }

        self.attestations.truncate(self.boundary + kept);
        self.attestations
    }

    fn into_partial(self) -> Vec<Attestation> {
        self.attestations
    }
}
