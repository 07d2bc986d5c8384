use alloy_primitives::B256;
use rand::Rng;
use ream_bls::{
    BLSSignature, PrivateKey, PublicKey,
    traits::{Aggregatable, Signable, Verifiable},
};
use ream_consensus_misc::{
    attestation::{AggregationBits, Attestation},
    attestation_data::AttestationData,
    checkpoint::Checkpoint,
};
use tree_hash::TreeHash;

/// A committee of validators with deterministic keys, all signing the same [`AttestationData`].
pub struct Committee {
    pub data: AttestationData,
    pub public_keys: Vec<PublicKey>,
    signatures: Vec<BLSSignature>,
}

impl Committee {
    pub fn new(size: usize) -> Self {
        let data = AttestationData {
            slot: 1024,
            index: 7,
            beacon_block_root: B256::repeat_byte(0x5e),
            source: Checkpoint {
                epoch: 30,
                root: B256::repeat_byte(0x1e),
            },
            target: Checkpoint {
                epoch: 32,
                root: B256::repeat_byte(0x2e),
            },
        };
        let message = data.tree_hash_root();

        let (public_keys, signatures) = (0..size)
            .map(|index| {
                let mut bytes = [0u8; 32];
                bytes[30] = 0x01;
                bytes[31] = u8::try_from(index).expect("committee fits in a byte");
                let private_key = PrivateKey {
                    inner: B256::from(bytes),
                };
                (
                    private_key.public_key().expect("valid private key"),
                    private_key
                        .sign(message.as_slice())
                        .expect("signing succeeds"),
                )
            })
            .unzip();

        Self {
            data,
            public_keys,
            signatures,
        }
    }

    pub fn size(&self) -> usize {
        self.public_keys.len()
    }

    /// An attestation signed by the members whose flag is `'1'` in `pattern`.
    pub fn attestation(&self, pattern: &str) -> Attestation {
        let flags = pattern.chars().map(|flag| flag == '1').collect::<Vec<_>>();
        self.attestation_from_flags(&flags)
    }

    pub fn attestation_from_flags(&self, flags: &[bool]) -> Attestation {
        let mut aggregation_bits =
            AggregationBits::with_capacity(flags.len()).expect("committee fits in a bitlist");
        let mut signatures = vec![];
        for (index, &flag) in flags.iter().enumerate() {
            if flag {
                aggregation_bits
                    .set(index, true)
                    .expect("index is within capacity");
                signatures.push(&self.signatures[index]);
            }
        }

        Attestation {
            aggregation_bits,
            data: self.data.clone(),
            signature: BLSSignature::aggregate(&signatures).expect("at least one signer"),
        }
    }

    /// `count` attestations over the whole committee, each with at least one signer.
    pub fn random_batch(&self, rng: &mut impl Rng, count: usize, density: f64) -> Vec<Attestation> {
        (0..count)
            .map(|_| {
                let mut flags = (0..self.size())
                    .map(|_| rng.random_bool(density))
                    .collect::<Vec<_>>();
                if !flags.contains(&true) {
                    flags[rng.random_range(0..self.size())] = true;
                }
                self.attestation_from_flags(&flags)
            })
            .collect()
    }

    pub fn verify(&self, attestation: &Attestation) -> bool {
        let public_keys = attestation
            .aggregation_bits
            .iter()
            .zip(&self.public_keys)
            .filter_map(|(bit, public_key)| bit.then_some(public_key))
            .collect::<Vec<_>>();
        attestation
            .signature
            .fast_aggregate_verify(public_keys, attestation.data.tree_hash_root().as_slice())
            .unwrap_or(false)
    }
}

/// Union of the bits of every attestation, `None` for an empty list.
pub fn union(attestations: &[Attestation]) -> Option<AggregationBits> {
    let (first, rest) = attestations.split_first()?;
    Some(rest.iter().fold(first.aggregation_bits.clone(), |covered, attestation| {
        covered.union(&attestation.aggregation_bits)
    }))
}

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
