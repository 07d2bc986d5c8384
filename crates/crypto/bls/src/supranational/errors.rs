use blst::BLST_ERROR;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
#[error("{0:?}")]
pub struct BlstError(pub BLST_ERROR);

impl From<BLST_ERROR> for BlstError {
    fn from(value: BLST_ERROR) -> Self {
        Self(value)
    }
}
