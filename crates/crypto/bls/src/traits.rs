use crate::{PublicKey, errors::BLSError, signature::BLSSignature};

pub trait Aggregatable<T> {
    type Error;

    /// Combines `items` into a single value. The result does not depend on the order of
    /// `items`, and at least one item is required.
    fn aggregate(items: &[&T]) -> Result<T, Self::Error>;
}

pub trait ZkcryptoAggregatable<T>: Aggregatable<T, Error = BLSError> {}
pub trait SupranationalAggregatable<T>: Aggregatable<T, Error = BLSError> {}

pub trait Signable {
    type Error;

    fn sign(&self, message: &[u8]) -> Result<BLSSignature, Self::Error>;
}

pub trait ZkcryptoSignable: Signable<Error = BLSError> {}
pub trait SupranationalSignable: Signable<Error = BLSError> {}

pub trait Verifiable {
    type Error;

    /// Verifies a BLS signature against a public key and message.
    ///
    /// # Arguments
    /// * `public_key` - The public key to verify against
    /// * `message` - The message that was signed
    ///
    /// # Returns
    /// * `Result<bool, BLSError>` - Ok(true) if the signature is valid, Ok(false) if verification
    ///   fails, or Err if there are issues with signature or public key bytes
    fn verify(&self, public_key: &PublicKey, message: &[u8]) -> Result<bool, Self::Error>;

    /// Verifies the signature against a message using an aggregate of multiple public keys
    ///
    /// # Arguments
    /// * `public_keys` - Collection of public key references to verify against
    /// * `message` - Message that was signed
    fn fast_aggregate_verify<'a, P>(
        &self,
        public_keys: P,
        message: &[u8],
    ) -> Result<bool, Self::Error>
    where
        P: AsRef<[&'a PublicKey]>;
}

pub trait ZkcryptoVerifiable: Verifiable<Error = BLSError> {}
pub trait SupranationalVerifiable: Verifiable<Error = BLSError> {}
