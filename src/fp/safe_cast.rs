use super::{Error, U256};

pub fn to_u128(value: U256) -> Result<u128, Error> {
    if value.fits_u128() {
        Ok(value.low_u128())
    } else {
        Err(Error::Overflow)
    }
}

pub fn to_i128(value: U256) -> Result<i128, Error> {
    i128::try_from(to_u128(value)?).map_err(|_| Error::Overflow)
}

/// `-value` as a signed 128-bit integer
pub fn neg_to_i128(value: U256) -> Result<i128, Error> {
    to_i128(value).map(|v| -v)
}
