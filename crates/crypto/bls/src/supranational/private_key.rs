use blst::min_pk::SecretKey as BlstSecretKey;

use crate::{
    PrivateKey, PublicKey,
    constants::DST,
    errors::BLSError,
    signature::BLSSignature,
    traits::{Signable, SupranationalSignable},
};

impl PrivateKey {
    /// Scalars are read big-endian.
    fn to_blst_secret_key(&self) -> Result<BlstSecretKey, BLSError> {
        BlstSecretKey::from_bytes(self.inner.as_slice()).map_err(|_| BLSError::InvalidPrivateKey)
    }

    pub fn public_key(&self) -> Result<PublicKey, BLSError> {
        PublicKey::try_from(self.to_blst_secret_key()?.sk_to_pk())
    }
}

impl Signable for PrivateKey {
    type Error = BLSError;

    fn sign(&self, message: &[u8]) -> Result<BLSSignature, Self::Error> {
        let signature = self.to_blst_secret_key()?.sign(message, DST, &[]);
        BLSSignature::try_from(signature)
    }
}

impl SupranationalSignable for PrivateKey {}
