#![warn(clippy::unwrap_used)]

pub mod attestation;
pub mod attestation_data;
pub mod checkpoint;
