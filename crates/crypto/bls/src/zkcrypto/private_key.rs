use bls12_381::{
    G1Projective, G2Projective, Scalar,
    hash_to_curve::{ExpandMsgXmd, HashToCurve},
};

use crate::{
    PrivateKey, PublicKey,
    constants::DST,
    errors::BLSError,
    signature::BLSSignature,
    traits::{Signable, ZkcryptoSignable},
};

impl PrivateKey {
    /// Scalars are read little-endian.
    fn to_scalar(&self) -> Result<Scalar, BLSError> {
        Scalar::from_bytes(&self.inner.0)
            .into_option()
            .ok_or(BLSError::InvalidPrivateKey)
    }

    pub fn public_key(&self) -> Result<PublicKey, BLSError> {
        Ok(PublicKey::from(G1Projective::generator() * self.to_scalar()?))
    }
}

impl Signable for PrivateKey {
    type Error = BLSError;

    fn sign(&self, message: &[u8]) -> Result<BLSSignature, Self::Error> {
        let hash_point = <G2Projective as HashToCurve<ExpandMsgXmd<sha2::Sha256>>>::hash_to_curve(
            [message],
            DST,
        );

        Ok(BLSSignature::from(hash_point * self.to_scalar()?))
    }
}

impl ZkcryptoSignable for PrivateKey {}
