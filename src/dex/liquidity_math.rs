//! Conversions between liquidity and token quantities over a price range.
//!
//! Rounding always favours the pool: quantities taken from a caller are rounded up,
//! quantities paid out are rounded down.
use super::{Amount, AmountDelta, ErrorKind, Liquidity, SqrtPriceX96, MIN_LIQUIDITY};
use crate::fp::{
    self, div_ceil, mul_div_ceil, mul_div_floor, mul_div_rounding, to_u128, RES_96, TWO_POW_96,
    U256,
};

/// Applies signed delta to liquidity, failing instead of wrapping
pub fn add_delta(liquidity: Liquidity, delta: i128) -> Result<Liquidity, ErrorKind> {
    if delta >= 0 {
        liquidity
            .checked_add(delta.unsigned_abs())
            .ok_or(ErrorKind::Overflow)
    } else {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or(ErrorKind::LiquidityUnderflow)
    }
}

fn ordered(a: SqrtPriceX96, b: SqrtPriceX96) -> (SqrtPriceX96, SqrtPriceX96) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Amount of token0 backing `liquidity` between two prices.
///
/// `L * (upper - lower) / (upper * lower)`, rounded up if `round_up`
pub fn qty0_delta(
    sqrt_price_a: SqrtPriceX96,
    sqrt_price_b: SqrtPriceX96,
    liquidity: Liquidity,
    round_up: bool,
) -> Result<U256, fp::Error> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);
    if lower.is_zero() {
        return Err(fp::Error::DivisionByZero);
    }
    let numerator1 = U256::from(liquidity) << RES_96;
    let numerator2 = upper - lower;
    if round_up {
        div_ceil(mul_div_ceil(numerator1, numerator2, upper)?, lower)
    } else {
        Ok(mul_div_floor(numerator1, numerator2, upper)? / lower)
    }
}

/// Amount of token1 backing `liquidity` between two prices.
///
/// `L * (upper - lower)`, rounded up if `round_up`
pub fn qty1_delta(
    sqrt_price_a: SqrtPriceX96,
    sqrt_price_b: SqrtPriceX96,
    liquidity: Liquidity,
    round_up: bool,
) -> Result<U256, fp::Error> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);
    mul_div_rounding(U256::from(liquidity), upper - lower, TWO_POW_96, round_up)
}

/// Token delta of adding (positive) or removing (negative) liquidity.
///
/// Adding rounds up and yields a positive amount owed to the pool,
/// removing rounds down and yields a negative amount owed to the owner.
pub fn qty0_signed(
    lower: SqrtPriceX96,
    upper: SqrtPriceX96,
    liquidity: Liquidity,
    is_add: bool,
) -> Result<AmountDelta, fp::Error> {
    let qty = qty0_delta(lower, upper, liquidity, is_add)?;
    if is_add {
        fp::to_i128(qty)
    } else {
        fp::neg_to_i128(qty)
    }
}

/// See [`qty0_signed`]
pub fn qty1_signed(
    lower: SqrtPriceX96,
    upper: SqrtPriceX96,
    liquidity: Liquidity,
    is_add: bool,
) -> Result<AmountDelta, fp::Error> {
    let qty = qty1_delta(lower, upper, liquidity, is_add)?;
    if is_add {
        fp::to_i128(qty)
    } else {
        fp::neg_to_i128(qty)
    }
}

/// Token quantities the pool must hold before it can be unlocked at `sqrt_price`.
///
/// They back `MIN_LIQUIDITY` of reinvestment liquidity and are never paid out.
pub fn unlock_qtys(sqrt_price: SqrtPriceX96) -> Result<(Amount, Amount), fp::Error> {
    let min_liquidity = U256::from(MIN_LIQUIDITY);
    let qty0 = mul_div_ceil(min_liquidity, TWO_POW_96, sqrt_price)?;
    let qty1 = mul_div_ceil(min_liquidity, sqrt_price, TWO_POW_96)?;
    Ok((to_u128(qty0)?, to_u128(qty1)?))
}

/// Token quantities released by removing `liquidity` of reinvestment liquidity at `sqrt_price`
pub fn qtys_from_burn_rtokens(
    sqrt_price: SqrtPriceX96,
    liquidity: Liquidity,
) -> Result<(Amount, Amount), fp::Error> {
    let liquidity = U256::from(liquidity);
    let qty0 = mul_div_floor(liquidity, TWO_POW_96, sqrt_price)?;
    let qty1 = mul_div_floor(liquidity, sqrt_price, TWO_POW_96)?;
    Ok((to_u128(qty0)?, to_u128(qty1)?))
}

/// Largest liquidity over `lower..upper` payable with `qty0` of token0
pub fn liquidity_from_qty0(
    lower: SqrtPriceX96,
    upper: SqrtPriceX96,
    qty0: Amount,
) -> Result<Liquidity, fp::Error> {
    let (lower, upper) = ordered(lower, upper);
    let scaled = mul_div_floor(lower, upper, TWO_POW_96)?;
    to_u128(mul_div_floor(scaled, U256::from(qty0), upper - lower)?)
}

/// Largest liquidity over `lower..upper` payable with `qty1` of token1
pub fn liquidity_from_qty1(
    lower: SqrtPriceX96,
    upper: SqrtPriceX96,
    qty1: Amount,
) -> Result<Liquidity, fp::Error> {
    let (lower, upper) = ordered(lower, upper);
    to_u128(mul_div_floor(U256::from(qty1), TWO_POW_96, upper - lower)?)
}

/// Largest liquidity over `lower..upper` payable with both quantities at `current` price
pub fn liquidity_from_qties(
    current: SqrtPriceX96,
    lower: SqrtPriceX96,
    upper: SqrtPriceX96,
    qty0: Amount,
    qty1: Amount,
) -> Result<Liquidity, fp::Error> {
    let (lower, upper) = ordered(lower, upper);
    if current <= lower {
        liquidity_from_qty0(lower, upper, qty0)
    } else if current >= upper {
        liquidity_from_qty1(lower, upper, qty1)
    } else {
        Ok(std::cmp::min(
            liquidity_from_qty0(current, upper, qty0)?,
            liquidity_from_qty1(lower, current, qty1)?,
        ))
    }
}
