use ream_bls::BLSSignature;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{BitList, typenum::U2048};
use tree_hash_derive::TreeHash;

use crate::attestation_data::AttestationData;

/// One bit per member of the committee, set when that member's signature is included.
pub type AggregationBits = BitList<U2048>;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Attestation {
    pub aggregation_bits: AggregationBits,
    pub data: AttestationData,
    pub signature: BLSSignature,
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use ssz::{Decode, Encode};

    use super::*;
    use crate::checkpoint::Checkpoint;

    fn attestation() -> Attestation {
        let mut aggregation_bits = AggregationBits::with_capacity(6).unwrap();
        aggregation_bits.set(0, true).unwrap();
        aggregation_bits.set(3, true).unwrap();

        Attestation {
            aggregation_bits,
            data: AttestationData {
                slot: 12,
                index: 1,
                beacon_block_root: B256::repeat_byte(0x11),
                source: Checkpoint::default(),
                target: Checkpoint {
                    epoch: 1,
                    root: B256::repeat_byte(0x22),
                },
            },
            signature: BLSSignature::default(),
        }
    }

    #[test]
    fn test_ssz_round_trip() {
        let attestation = attestation();
        let decoded = Attestation::from_ssz_bytes(&attestation.as_ssz_bytes()).unwrap();
        assert_eq!(decoded, attestation);
    }

    #[test]
    fn test_json_uses_quoted_integers() {
        let json = serde_json::to_value(attestation()).unwrap();
        assert_eq!(json["data"]["slot"], "12");
        assert_eq!(json["data"]["target"]["epoch"], "1");

        let decoded: Attestation = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, attestation());
    }
}
