pub mod constants;
pub mod errors;
pub mod private_key;
pub mod public_key;
pub mod signature;
pub mod traits;

#[cfg(feature = "supranational")]
pub mod supranational;
#[cfg(feature = "zkcrypto")]
pub mod zkcrypto;

#[cfg(all(feature = "supranational", feature = "zkcrypto"))]
compile_error!("features `supranational` and `zkcrypto` are mutually exclusive");

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::BLSSignature;
