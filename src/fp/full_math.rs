use super::{Error, U256};

/// `floor(a * b / denominator)` with a 512-bit intermediate product.
///
/// Fails with `DivisionByZero` if `denominator` is zero and with `DenominatorTooSmall`
/// if the quotient does not fit into 256 bits.
pub fn mul_div_floor(a: U256, b: U256, denominator: U256) -> Result<U256, Error> {
    if denominator.is_zero() {
        return Err(Error::DivisionByZero);
    }
    // cannot overflow: both factors are below 2^256
    let (product, _) = a.widen().overflowing_mul(b.widen());
    (product / denominator.widen())
        .narrow()
        .ok_or(Error::DenominatorTooSmall)
}

/// `ceil(a * b / denominator)` with a 512-bit intermediate product.
pub fn mul_div_ceil(a: U256, b: U256, denominator: U256) -> Result<U256, Error> {
    if denominator.is_zero() {
        return Err(Error::DivisionByZero);
    }
    let (product, _) = a.widen().overflowing_mul(b.widen());
    let (quotient, remainder) = product.div_mod(denominator.widen());
    let quotient = quotient.narrow().ok_or(Error::DenominatorTooSmall)?;
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        quotient
            .checked_add(U256::one())
            .ok_or(Error::DenominatorTooSmall)
    }
}

/// Dispatches to [`mul_div_ceil`] or [`mul_div_floor`]
pub fn mul_div_rounding(
    a: U256,
    b: U256,
    denominator: U256,
    round_up: bool,
) -> Result<U256, Error> {
    if round_up {
        mul_div_ceil(a, b, denominator)
    } else {
        mul_div_floor(a, b, denominator)
    }
}

/// `ceil(a / b)`
pub fn div_ceil(a: U256, b: U256) -> Result<U256, Error> {
    if b.is_zero() {
        return Err(Error::DivisionByZero);
    }
    let (quotient, remainder) = a.div_mod(b);
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        // quotient < a <= MAX whenever the remainder is non-zero
        Ok(quotient + U256::one())
    }
}
