use alloy_primitives::B256;
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// Secret scalar of a validator. Signing and deriving the public key fail with
/// [`BLSError::InvalidPrivateKey`] when `inner` does not decode to a scalar of the curve order.
///
/// [`BLSError::InvalidPrivateKey`]: crate::errors::BLSError::InvalidPrivateKey
#[derive(Debug, PartialEq, Clone, Encode, Decode, TreeHash, Default, Eq, Hash)]
pub struct PrivateKey {
    pub inner: B256,
}
