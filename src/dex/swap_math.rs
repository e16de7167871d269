//! Single swap step within a price interval where liquidity is constant.
//!
//! Swap fees are not taken out of the traded amounts. Instead the fee is converted
//! into extra reinvestment liquidity `delta_l`, which is added to the pool's active
//! liquidity while the price moves. All closed forms below assume the step spans no
//! more than [`MAX_TICK_DISTANCE`](super::MAX_TICK_DISTANCE) ticks.
//!
//! Notation: `L` is active liquidity, `p` current square root price, `t` target one,
//! `f` fee in basis points, `F` basis point divisor.
use super::{AmountDelta, BasisPoints, Liquidity, SqrtPriceX96, BASIS_POINT_DIVISOR};
use crate::fp::{
    self, mul_div_ceil, mul_div_floor, smaller_root_of_quad_eqn, to_i128, RES_96, TWO_POW_96,
    U256,
};

const FEE_UNITS: u32 = BASIS_POINT_DIVISOR as u32;
const TWO_FEE_UNITS: u32 = 2 * FEE_UNITS;

/// Outcome of one swap step
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SwapStep {
    /// Consumed part of the specified amount, same sign as specified amount
    pub used: AmountDelta,
    /// Amount of the other token: negative for exact input (paid to trader),
    /// positive for exact output (owed by trader)
    pub returned: AmountDelta,
    /// Reinvestment liquidity produced by the step's fee
    pub delta_l: Liquidity,
    pub next_sqrt_price: SqrtPriceX96,
}

fn checked_mul(a: U256, b: U256) -> Result<U256, fp::Error> {
    a.checked_mul(b).ok_or(fp::Error::Overflow)
}

fn checked_sub(a: U256, b: U256) -> Result<U256, fp::Error> {
    a.checked_sub(b).ok_or(fp::Error::Overflow)
}

fn abs_diff(a: SqrtPriceX96, b: SqrtPriceX96) -> U256 {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

/// Swaps within `[current, target]` price interval.
///
/// `specified` is positive for exact input, negative for exact output;
/// `is_token0` tells which token it is denominated in.
/// The step either consumes the whole `specified` amount, or reaches `target` price.
pub fn compute_swap_step(
    liquidity: Liquidity,
    current: SqrtPriceX96,
    target: SqrtPriceX96,
    fee: BasisPoints,
    specified: AmountDelta,
    is_exact_input: bool,
    is_token0: bool,
) -> Result<SwapStep, fp::Error> {
    if current == target {
        return Ok(SwapStep {
            used: 0,
            returned: 0,
            delta_l: 0,
            next_sqrt_price: current,
        });
    }
    let specified_abs = U256::from(specified.unsigned_abs());
    let reach = calc_reach_amount(liquidity, current, target, fee, is_exact_input, is_token0)?;
    // exact output also caps on equality, so that rounding never asks for more than specified
    let capped = if is_exact_input {
        reach > specified_abs
    } else {
        reach >= specified_abs
    };

    let (used_abs, delta_l, next_sqrt_price) = if capped {
        let delta_l = estimate_incremental_liquidity(
            specified_abs,
            liquidity,
            current,
            fee,
            is_exact_input,
            is_token0,
        )?;
        let next = calc_final_price(
            specified_abs,
            liquidity,
            delta_l,
            current,
            is_exact_input,
            is_token0,
        )?;
        (specified_abs, delta_l, next)
    } else {
        let delta_l = calc_incremental_liquidity(
            reach,
            liquidity,
            current,
            target,
            is_exact_input,
            is_token0,
        )?;
        (reach, delta_l, target)
    };
    let returned = calc_returned_amount(
        liquidity,
        current,
        next_sqrt_price,
        delta_l,
        is_exact_input,
        is_token0,
    )?;
    let used = if is_exact_input {
        to_i128(used_abs)?
    } else {
        fp::neg_to_i128(used_abs)?
    };
    Ok(SwapStep {
        used,
        returned,
        delta_l: fp::to_u128(delta_l)?,
        next_sqrt_price,
    })
}

/// Magnitude of the specified amount needed to move price from `current` to `target`.
///
/// Rounded down, so that crossing a tick never requires more than the trader specified.
pub fn calc_reach_amount(
    liquidity: Liquidity,
    current: SqrtPriceX96,
    target: SqrtPriceX96,
    fee: BasisPoints,
    is_exact_input: bool,
    is_token0: bool,
) -> Result<U256, fp::Error> {
    let liquidity = U256::from(liquidity);
    let fee = U256::from(fee);
    let two_fee_units = U256::from(TWO_FEE_UNITS);
    let price_diff = abs_diff(current, target);

    match (is_exact_input, is_token0) {
        // 2 * L * |t - p| / (p * (2t - f * p / F))
        (true, true) => {
            let denominator = checked_sub(checked_mul(two_fee_units, target)?, fee * current)?;
            let numerator = mul_div_floor(liquidity, two_fee_units * price_diff, denominator)?;
            mul_div_floor(numerator, TWO_POW_96, current)
        }
        // 2 * L * |t - p| * p / (2p - f * t / F)
        (true, false) => {
            let denominator = checked_sub(checked_mul(two_fee_units, current)?, fee * target)?;
            let numerator = mul_div_floor(liquidity, two_fee_units * price_diff, denominator)?;
            mul_div_floor(numerator, current, TWO_POW_96)
        }
        // L * |t - p| * (2p - f * (p + t) / F) / (p * t * (2p - f * t / F))
        (false, true) => {
            let denominator = checked_sub(checked_mul(two_fee_units, current)?, fee * target)?;
            let numerator = checked_sub(denominator, fee * current)?;
            let numerator = mul_div_floor(liquidity << RES_96, numerator, denominator)?;
            Ok(mul_div_floor(numerator, price_diff, current)? / target)
        }
        // L * |t - p| * (2t - f * (t + p) / F) / (2t - f * p / F)
        (false, false) => {
            let denominator = checked_sub(checked_mul(two_fee_units, target)?, fee * current)?;
            let numerator = checked_sub(denominator, fee * target)?;
            let numerator = mul_div_floor(liquidity, numerator, denominator)?;
            mul_div_floor(numerator, price_diff, TWO_POW_96)
        }
    }
}

/// Reinvestment liquidity from the fee of a step which stops before target price.
///
/// Exact input has a closed form; exact output is the smaller root of
/// `f * x^2 - 2 * b * x + c = 0`.
pub fn estimate_incremental_liquidity(
    abs_delta: U256,
    liquidity: Liquidity,
    current: SqrtPriceX96,
    fee: BasisPoints,
    is_exact_input: bool,
    is_token0: bool,
) -> Result<U256, fp::Error> {
    let fee = U256::from(fee);
    if is_exact_input {
        let fee_qty = checked_mul(abs_delta, fee)?;
        return if is_token0 {
            // f * delta * p / 2
            mul_div_floor(current, fee_qty, U256::from(TWO_FEE_UNITS) << RES_96)
        } else {
            // f * delta / (2 * p)
            mul_div_floor(TWO_POW_96, fee_qty, U256::from(TWO_FEE_UNITS) * current)
        };
    }
    if fee.is_zero() {
        return Ok(U256::zero());
    }
    let liquidity = U256::from(liquidity);
    let fee_units = U256::from(FEE_UNITS);
    let b = (fee_units - fee) * liquidity;
    let c = checked_mul(fee * liquidity, abs_delta)?;
    let scaled_delta = checked_mul(fee_units, abs_delta)?;
    let (b, c) = if is_token0 {
        (
            checked_sub(b, mul_div_floor(scaled_delta, current, TWO_POW_96)?)?,
            mul_div_floor(c, current, TWO_POW_96)?,
        )
    } else {
        (
            checked_sub(b, mul_div_floor(scaled_delta, TWO_POW_96, current)?)?,
            mul_div_floor(c, TWO_POW_96, current)?,
        )
    };
    smaller_root_of_quad_eqn(fee, b, c)
}

/// Reinvestment liquidity from the fee of a step which reaches `next` price exactly.
///
/// Rounded down; may be zero for tiny amounts.
pub fn calc_incremental_liquidity(
    abs_delta: U256,
    liquidity: Liquidity,
    current: SqrtPriceX96,
    next: SqrtPriceX96,
    is_exact_input: bool,
    is_token0: bool,
) -> Result<U256, fp::Error> {
    let liquidity = U256::from(liquidity);
    let apply = |base: U256| {
        if is_exact_input {
            base.checked_add(abs_delta).ok_or(fp::Error::Overflow)
        } else {
            checked_sub(base, abs_delta)
        }
    };
    let total = if is_token0 {
        // next * (L / p +- delta)
        let virtual_qty = apply(mul_div_floor(liquidity, TWO_POW_96, current)?)?;
        mul_div_floor(next, virtual_qty, TWO_POW_96)?
    } else {
        // (L * p +- delta) / next
        let virtual_qty = apply(mul_div_floor(liquidity, current, TWO_POW_96)?)?;
        mul_div_floor(virtual_qty, TWO_POW_96, next)?
    };
    // rounding may push total below liquidity for tiny amounts
    Ok(total.saturating_sub(liquidity))
}

/// Price after a step which consumes `abs_delta` and adds `delta_l` reinvestment liquidity
pub fn calc_final_price(
    abs_delta: U256,
    liquidity: Liquidity,
    delta_l: U256,
    current: SqrtPriceX96,
    is_exact_input: bool,
    is_token0: bool,
) -> Result<SqrtPriceX96, fp::Error> {
    let liquidity = U256::from(liquidity);
    let total_liquidity = liquidity
        .checked_add(delta_l)
        .ok_or(fp::Error::Overflow)?;
    if is_token0 {
        let virtual_delta = mul_div_floor(abs_delta, current, TWO_POW_96)?;
        if is_exact_input {
            // price goes down, round up
            let denominator = liquidity
                .checked_add(virtual_delta)
                .ok_or(fp::Error::Overflow)?;
            mul_div_ceil(total_liquidity, current, denominator)
        } else {
            // price goes up, round down
            mul_div_floor(total_liquidity, current, checked_sub(liquidity, virtual_delta)?)
        }
    } else {
        let virtual_delta = mul_div_floor(abs_delta, TWO_POW_96, current)?;
        if is_exact_input {
            // price goes up, round down
            let numerator = liquidity
                .checked_add(virtual_delta)
                .ok_or(fp::Error::Overflow)?;
            mul_div_floor(numerator, current, total_liquidity)
        } else {
            // price goes down, round up
            mul_div_ceil(checked_sub(liquidity, virtual_delta)?, current, total_liquidity)
        }
    }
}

/// Amount of the unspecified token for a step from `current` to `next` price.
///
/// Rounded against the trader: output is made smaller, input larger.
pub fn calc_returned_amount(
    liquidity: Liquidity,
    current: SqrtPriceX96,
    next: SqrtPriceX96,
    delta_l: U256,
    is_exact_input: bool,
    is_token0: bool,
) -> Result<AmountDelta, fp::Error> {
    let liquidity = U256::from(liquidity);
    let returned = if is_token0 {
        let fee_part = to_i128(mul_div_ceil(delta_l, next, TWO_POW_96)?)?;
        let price_part = if is_exact_input {
            // price goes down, token1 leaves the pool
            fp::neg_to_i128(mul_div_floor(liquidity, checked_sub(current, next)?, TWO_POW_96)?)?
        } else {
            to_i128(mul_div_ceil(liquidity, checked_sub(next, current)?, TWO_POW_96)?)?
        };
        fee_part.checked_add(price_part)
    } else {
        let total_liquidity = liquidity
            .checked_add(delta_l)
            .ok_or(fp::Error::Overflow)?;
        let after = to_i128(mul_div_ceil(total_liquidity, TWO_POW_96, next)?)?;
        let before = fp::neg_to_i128(mul_div_floor(liquidity, TWO_POW_96, current)?)?;
        after.checked_add(before)
    }
    .ok_or(fp::Error::Overflow)?;

    // a single unit of output is a rounding artifact
    if is_exact_input && returned == 1 {
        Ok(0)
    } else {
        Ok(returned)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::cast_possible_wrap)]
    use super::*;
    use crate::dex::Tick;
    use rstest::rstest;

    fn price(tick: i32) -> SqrtPriceX96 {
        Tick::new(tick).unwrap().sqrt_price()
    }

    const LIQUIDITY: Liquidity = 1_000_000_000_000_000_000;

    #[test]
    fn same_price_is_noop() {
        let step = compute_swap_step(LIQUIDITY, price(5), price(5), 30, 1000, true, true).unwrap();
        assert_eq!(step.used, 0);
        assert_eq!(step.returned, 0);
        assert_eq!(step.delta_l, 0);
        assert_eq!(step.next_sqrt_price, price(5));
    }

    #[rstest]
    #[case::exact_in_token0(true, true, -20)]
    #[case::exact_in_token1(true, false, 20)]
    #[case::exact_out_token0(false, true, 20)]
    #[case::exact_out_token1(false, false, -20)]
    fn reaching_target_price(
        #[case] is_exact_input: bool,
        #[case] is_token0: bool,
        #[case] target_tick: i32,
    ) {
        let (current, target) = (price(0), price(target_tick));
        let huge = if is_exact_input { i128::MAX } else { -i128::MAX };
        let step =
            compute_swap_step(LIQUIDITY, current, target, 30, huge, is_exact_input, is_token0)
                .unwrap();
        assert_eq!(step.next_sqrt_price, target);
        assert_eq!(step.used.signum(), huge.signum());
        // other token moves the opposite way
        assert_eq!(step.returned.signum(), -huge.signum());
        assert!(step.delta_l > 0);

        let reach =
            calc_reach_amount(LIQUIDITY, current, target, 30, is_exact_input, is_token0).unwrap();
        assert_eq!(U256::from(step.used.unsigned_abs()), reach);
    }

    #[rstest]
    #[case::exact_in_token0(true, true, -20, 1_000_000_000)]
    #[case::exact_in_token1(true, false, 20, 1_000_000_000)]
    #[case::exact_out_token0(false, true, 20, -1_000_000_000)]
    #[case::exact_out_token1(false, false, -20, -1_000_000_000)]
    fn stopping_short_of_target(
        #[case] is_exact_input: bool,
        #[case] is_token0: bool,
        #[case] target_tick: i32,
        #[case] specified: i128,
    ) {
        let (current, target) = (price(0), price(target_tick));
        let step = compute_swap_step(
            LIQUIDITY,
            current,
            target,
            30,
            specified,
            is_exact_input,
            is_token0,
        )
        .unwrap();
        assert_eq!(step.used, specified);
        // price moved towards target, but did not reach it
        let (low, high) = if current < target {
            (current, target)
        } else {
            (target, current)
        };
        assert!(step.next_sqrt_price != current && step.next_sqrt_price != target);
        assert!(low <= step.next_sqrt_price && step.next_sqrt_price <= high);
        // no more than ~fee in value is lost, the rest comes out the other side
        let returned = step.returned.unsigned_abs();
        let expected = specified.unsigned_abs();
        assert!(returned > expected * 99 / 100 && returned < expected * 101 / 100);
    }

    #[test]
    fn exact_input_token1_known_values() {
        let step =
            compute_swap_step(LIQUIDITY, price(0), price(20), 30, 1_000_000_000_000, true, false)
                .unwrap();
        assert_eq!(step.used, 1_000_000_000_000);
        assert_eq!(step.returned, -996_999_002_998);
        assert_eq!(step.delta_l, 1_500_000_000);
        assert_eq!(
            step.next_sqrt_price,
            U256::from_dec_str("79228241623584489422504809746").unwrap()
        );
    }

    #[test]
    fn zero_fee_exact_output_adds_no_liquidity() {
        let step =
            compute_swap_step(LIQUIDITY, price(0), price(-20), 0, -1_000_000, false, false).unwrap();
        assert_eq!(step.delta_l, 0);
        assert_eq!(step.used, -1_000_000);
        assert!(step.returned >= 1_000_000);
    }

    #[test]
    fn single_unit_output_is_rounded_to_zero() {
        assert_eq!(
            calc_returned_amount(LIQUIDITY, price(0), price(0), U256::zero(), true, false),
            Ok(0)
        );
        let returned = calc_returned_amount(
            LIQUIDITY,
            price(0),
            price(0) - U256::one(),
            U256::zero(),
            true,
            true,
        )
        .unwrap();
        assert!(returned <= 0);
    }

    #[rstest]
    fn output_never_exceeds_fee_free_amount(
        #[values(1, 999, 123_456_789)] amount: i128,
        #[values(true, false)] is_token0: bool,
    ) {
        let (current, target) = if is_token0 {
            (price(0), price(-480))
        } else {
            (price(0), price(480))
        };
        let no_fee = compute_swap_step(LIQUIDITY, current, target, 0, amount, true, is_token0)
            .unwrap();
        let with_fee = compute_swap_step(LIQUIDITY, current, target, 30, amount, true, is_token0)
            .unwrap();
        assert!(with_fee.returned >= no_fee.returned);
        assert!(no_fee.returned <= 0);
    }
}
