use ream_consensus_misc::attestation::Attestation;
use ssz_types::{
    BitList,
    typenum::{U2048, Unsigned},
};
use tracing::trace;

use crate::{
    bitfield::{BitListExt, empty_bitlist},
    errors::AggregationError,
};

/// Anything carrying a bitlist the max cover solver can select on.
pub trait CoverCandidate {
    type Length: Unsigned + Clone;

    fn bits(&self) -> &BitList<Self::Length>;
}

impl<N: Unsigned + Clone> CoverCandidate for BitList<N> {
    type Length = N;

    fn bits(&self) -> &BitList<N> {
        self
    }
}

impl CoverCandidate for Attestation {
    type Length = U2048;

    fn bits(&self) -> &BitList<U2048> {
        &self.aggregation_bits
    }
}

/// Greedy approximation of the maximum coverage problem over a list of bitlists.
///
/// Every round picks the candidate adding the most uncovered bits, ties going to the candidate
/// listed first, until the selection limit is hit or no candidate adds anything. When overlaps
/// are not allowed only candidates disjoint from everything selected so far are considered, so
/// each covered bit comes from exactly one selected candidate.
///
/// The candidates are borrowed as they are, so building a problem never allocates.
#[derive(Debug)]
pub struct MaxCoverProblem<'a, T> {
    pub candidates: &'a [T],
}

/// Candidates picked by [`MaxCoverProblem::cover`] and the union of their bits.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSolution<N: Unsigned + Clone> {
    /// Positions in the candidate list, ascending.
    pub selected: Vec<usize>,
    pub coverage: BitList<N>,
}

impl<N: Unsigned + Clone> CoverageSolution<N> {
    pub fn new(len: usize) -> Result<Self, AggregationError> {
        Ok(Self {
            selected: vec![],
            coverage: empty_bitlist(len)?,
        })
    }
}

impl<'a> MaxCoverProblem<'a, Attestation> {
    pub fn from_attestations(attestations: &'a [Attestation]) -> Self {
        Self::new(attestations)
    }
}

impl<'a, T: CoverCandidate> MaxCoverProblem<'a, T> {
    pub fn new(candidates: &'a [T]) -> Self {
        Self { candidates }
    }

    /// Selects at most `limit` candidates maximizing the number of covered bits.
    pub fn cover(
        &self,
        limit: usize,
        allow_overlaps: bool,
    ) -> Result<CoverageSolution<T::Length>, AggregationError> {
        let len = self.validate()?;
        let mut solution = CoverageSolution::new(len)?;
        self.solve(limit, allow_overlaps, &mut solution)?;
        Ok(solution)
    }

    /// Same as [`Self::cover`], writing into `solution` so its buffers are reused across calls.
    pub fn cover_into(
        &self,
        limit: usize,
        allow_overlaps: bool,
        solution: &mut CoverageSolution<T::Length>,
    ) -> Result<(), AggregationError> {
        let len = self.validate()?;
        solution.selected.clear();
        if solution.coverage.len() == len {
            solution.coverage.reset()?;
        } else {
            solution.coverage = empty_bitlist(len)?;
        }
        self.solve(limit, allow_overlaps, solution)
    }

    fn validate(&self) -> Result<usize, AggregationError> {
        let first = self
            .candidates
            .first()
            .ok_or(AggregationError::InvalidProblem("empty list"))?
            .bits();
        let len = first.len();

        for candidate in self.candidates.iter().map(T::bits) {
            if candidate.is_empty() {
                return Err(AggregationError::InvalidProblem(
                    "bitlist cannot be empty",
                ));
            }
            if candidate.len() != len {
                return Err(AggregationError::BitsLengthMismatch);
            }
        }
        Ok(len)
    }

    fn solve(
        &self,
        limit: usize,
        allow_overlaps: bool,
        solution: &mut CoverageSolution<T::Length>,
    ) -> Result<(), AggregationError> {
        while solution.selected.len() < limit {
            let mut best: Option<(usize, usize)> = None;
            for (position, candidate) in self.candidates.iter().map(T::bits).enumerate() {
                if solution.selected.contains(&position) {
                    continue;
                }
                let gain = if allow_overlaps {
                    candidate.count_new(&solution.coverage)
                } else if candidate.overlaps(&solution.coverage) {
                    continue;
                } else {
                    candidate.count()
                };
                if gain > best.map_or(0, |(_, best_gain)| best_gain) {
                    best = Some((position, gain));
                }
            }

            let Some((position, gain)) = best else {
                break;
            };
            trace!(position, gain, "Selected max cover candidate");
            self.candidates[position]
                .bits()
                .union_into(&mut solution.coverage)?;
            solution.selected.push(position);
        }

        solution.selected.sort_unstable();
        Ok(())
    }
}
