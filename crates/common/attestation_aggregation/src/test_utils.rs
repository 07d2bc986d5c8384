use alloy_primitives::B256;
use ream_bls::{
    BLSSignature, PrivateKey, PublicKey,
    traits::{Aggregatable, Signable},
};
use ream_consensus_misc::{
    attestation::{AggregationBits, Attestation},
    attestation_data::AttestationData,
    checkpoint::Checkpoint,
};
use tree_hash::TreeHash;

use crate::bitfield::BitListExt;

/// Builds a bitlist from a pattern such as `"100100"`.
pub fn bits(pattern: &str) -> AggregationBits {
    let mut bitlist = AggregationBits::with_capacity(pattern.len()).expect("pattern too long");
    for (index, flag) in pattern.chars().enumerate() {
        bitlist
            .set(index, flag == '1')
            .expect("index is within capacity");
    }
    bitlist
}

pub fn attestation_data() -> AttestationData {
    AttestationData {
        slot: 64,
        index: 3,
        beacon_block_root: B256::repeat_byte(0x42),
        source: Checkpoint {
            epoch: 1,
            root: B256::repeat_byte(0x01),
        },
        target: Checkpoint {
            epoch: 2,
            root: B256::repeat_byte(0x02),
        },
    }
}

pub fn private_key(validator_index: usize) -> PrivateKey {
    let mut bytes = [0u8; 32];
    bytes[31] = u8::try_from(validator_index + 1).expect("committee fits in a byte");
    PrivateKey {
        inner: B256::from(bytes),
    }
}

pub fn public_keys(bitlist: &AggregationBits) -> Vec<PublicKey> {
    bitlist
        .indices()
        .into_iter()
        .map(|index| private_key(index).public_key().expect("valid private key"))
        .collect()
}

/// An attestation signed by every committee member whose bit is set in `pattern`.
pub fn attestation(pattern: &str) -> Attestation {
    let data = attestation_data();
    let message = data.tree_hash_root();
    let aggregation_bits = bits(pattern);

    let signatures = aggregation_bits
        .indices()
        .into_iter()
        .map(|index| {
            private_key(index)
                .sign(message.as_slice())
                .expect("signing succeeds")
        })
        .collect::<Vec<_>>();
    let signature = BLSSignature::aggregate(&signatures.iter().collect::<Vec<_>>())
        .expect("pattern has at least one bit set");

    Attestation {
        aggregation_bits,
        data,
        signature,
    }
}

/// Bit patterns of `attestations`, in order.
pub fn patterns(attestations: &[Attestation]) -> Vec<String> {
    attestations
        .iter()
        .map(|attestation| {
            attestation
                .aggregation_bits
                .iter()
                .map(|bit| if bit { '1' } else { '0' })
                .collect()
        })
        .collect()
}
