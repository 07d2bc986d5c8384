use ssz::{Decode, Encode};
use ssz_types::{BitList, typenum::Unsigned};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitfieldError {
    #[error("Bitlist lengths differ: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("Bitlist length {len} exceeds maximum {max}")]
    ExceedsMaxLength { len: usize, max: usize },
    #[error("Bit index {index} is out of bounds for length {len}")]
    OutOfBounds { index: usize, len: usize },
    #[error("Failed to decode bitlist: {0}")]
    Decode(String),
}

/// Creates a bitlist of `len` bits, all unset.
pub fn empty_bitlist<N: Unsigned + Clone>(len: usize) -> Result<BitList<N>, BitfieldError> {
    BitList::with_capacity(len).map_err(|_| BitfieldError::ExceedsMaxLength {
        len,
        max: N::to_usize(),
    })
}

/// Set algebra over equal-length bitlists.
///
/// Binary operations refuse bitlists of different lengths instead of padding the shorter one,
/// since bit positions only mean the same committee member when the lengths agree.
pub trait BitListExt: Sized {
    fn decode(bytes: &[u8]) -> Result<Self, BitfieldError>;

    /// SSZ encoding, including the delimiting length bit.
    fn encode(&self) -> Vec<u8>;

    fn count(&self) -> usize;

    fn checked_and(&self, other: &Self) -> Result<Self, BitfieldError>;

    fn checked_or(&self, other: &Self) -> Result<Self, BitfieldError>;

    fn checked_xor(&self, other: &Self) -> Result<Self, BitfieldError>;

    /// Whether every bit set in `other` is also set in `self`. Bitlists of different lengths
    /// never contain each other.
    fn contains(&self, other: &Self) -> bool;

    /// Positions of the set bits, ascending.
    fn indices(&self) -> Vec<usize>;

    /// Whether any bit is set in both bitlists.
    fn overlaps(&self, other: &Self) -> bool;

    /// Number of bits set in `self` but not in `covered`.
    fn count_new(&self, covered: &Self) -> usize;

    /// ORs `self` into `destination` without allocating.
    fn union_into(&self, destination: &mut Self) -> Result<(), BitfieldError>;

    /// Unsets every bit, keeping the length.
    fn reset(&mut self) -> Result<(), BitfieldError>;
}

impl<N: Unsigned + Clone> BitListExt for BitList<N> {
    fn decode(bytes: &[u8]) -> Result<Self, BitfieldError> {
        BitList::from_ssz_bytes(bytes).map_err(|err| BitfieldError::Decode(format!("{err:?}")))
    }

    fn encode(&self) -> Vec<u8> {
        self.as_ssz_bytes()
    }

    fn count(&self) -> usize {
        self.num_set_bits()
    }

    fn checked_and(&self, other: &Self) -> Result<Self, BitfieldError> {
        ensure_same_len(self, other)?;
        Ok(self.intersection(other))
    }

    fn checked_or(&self, other: &Self) -> Result<Self, BitfieldError> {
        ensure_same_len(self, other)?;
        Ok(self.union(other))
    }

    fn checked_xor(&self, other: &Self) -> Result<Self, BitfieldError> {
        ensure_same_len(self, other)?;
        Ok(self.union(other).difference(&self.intersection(other)))
    }

    fn contains(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(ours, theirs)| ours || !theirs)
    }

    fn indices(&self) -> Vec<usize> {
        self.iter()
            .enumerate()
            .filter_map(|(index, bit)| bit.then_some(index))
            .collect()
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.iter()
            .zip(other.iter())
            .any(|(ours, theirs)| ours && theirs)
    }

    fn count_new(&self, covered: &Self) -> usize {
        self.iter()
            .zip(covered.iter())
            .filter(|(ours, theirs)| *ours && !*theirs)
            .count()
    }

    fn union_into(&self, destination: &mut Self) -> Result<(), BitfieldError> {
        ensure_same_len(self, destination)?;
        let len = destination.len();
        for (index, bit) in self.iter().enumerate() {
            if bit {
                destination
                    .set(index, true)
                    .map_err(|_| BitfieldError::OutOfBounds { index, len })?;
            }
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<(), BitfieldError> {
        let len = self.len();
        for index in 0..len {
            self.set(index, false)
                .map_err(|_| BitfieldError::OutOfBounds { index, len })?;
        }
        Ok(())
    }
}

fn ensure_same_len<N: Unsigned + Clone>(
    left: &BitList<N>,
    right: &BitList<N>,
) -> Result<(), BitfieldError> {
    if left.len() != right.len() {
        return Err(BitfieldError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(())
}
