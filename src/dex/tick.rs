use bitvec::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{ErrorKind, SqrtPriceX96};
use crate::fp::U256;

pub const MIN_TICK: i32 = -887_272;
pub const MAX_TICK: i32 = -MIN_TICK;

/// Square root price of `MIN_TICK`, as Q64.96
pub const MIN_SQRT_PRICE: SqrtPriceX96 = U256([4_295_128_739, 0, 0, 0]);

/// Square root price of `MAX_TICK`, as Q64.96
/// ```
/// # use elastic_pool::dex::{Tick, MAX_SQRT_PRICE};
/// assert_eq!(
///     MAX_SQRT_PRICE.to_string(),
///     "1461446703485210103287273052203988822378723970342"
/// );
/// assert_eq!(Tick::MAX.sqrt_price(), MAX_SQRT_PRICE);
/// ```
pub const MAX_SQRT_PRICE: SqrtPriceX96 =
    U256([0x5d95_1d52_6398_8d26, 0xefd1_fc6a_5064_8849, 0xfffd_8963, 0]);

/// `1 / sqrt(1.0001^(2^i))` as Q128.128, for every bit `i` of a tick index.
#[allow(clippy::unreadable_literal)]
const TICK_RATIOS_X128: [u128; 20] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
    0x48a170391f7dc42444e8fa2,
];

#[derive(Copy, Clone, Debug, Default, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
/// A point on the price scale, `price = 1.0001^tick`
pub struct Tick(i32);

impl Tick {
    pub const MIN: Self = Self(MIN_TICK);
    pub const MAX: Self = Self(MAX_TICK);
    pub const ZERO: Self = Self(0);

    pub fn new(value: i32) -> Result<Self, ErrorKind> {
        if Self::is_valid(value) {
            Ok(Self(value))
        } else {
            Err(ErrorKind::TickOutOfBounds)
        }
    }

    pub const fn is_valid(value: i32) -> bool {
        MIN_TICK <= value && value <= MAX_TICK
    }

    pub const fn index(&self) -> i32 {
        self.0
    }

    pub fn shifted(&self, step: i32) -> Result<Self, ErrorKind> {
        Tick::new(
            self.index()
                .checked_add(step)
                .ok_or(ErrorKind::TickOutOfBounds)?,
        )
    }

    /// Whether the tick is usable as a position bound for given tick distance
    pub const fn is_aligned(&self, tick_distance: i32) -> bool {
        tick_distance > 0 && self.index() % tick_distance == 0
    }

    /// `sqrt(1.0001^tick)` as Q64.96, rounded up.
    ///
    /// Multiplies precalculated ratios for every set bit of `|tick|`,
    /// then inverts the result for positive ticks.
    pub fn sqrt_price(&self) -> SqrtPriceX96 {
        let ratio = self
            .index()
            .unsigned_abs()
            .view_bits::<Lsb0>() // least significant bit has position 0
            .iter_ones()
            // |tick| <= MAX_TICK < 2^20, so bit index is always within the table
            .map(|bit| U256::from(TICK_RATIOS_X128[bit]))
            .fold(U256::one() << 128u32, |ratio, scale_by| {
                (ratio * scale_by) >> 128u32
            });
        let ratio = if self.index() > 0 {
            U256::MAX / ratio
        } else {
            ratio
        };
        // Q128.128 -> Q64.96, rounding up
        let round_up = u64::from(ratio.low_u64() & 0xffff_ffff != 0);
        (ratio >> 32u32) + U256::from(round_up)
    }

    /// The greatest tick whose square root price is not above `sqrt_price`.
    ///
    /// Accepts prices in `MIN_SQRT_PRICE..MAX_SQRT_PRICE`.
    pub fn from_sqrt_price(sqrt_price: SqrtPriceX96) -> Result<Self, ErrorKind> {
        if sqrt_price < MIN_SQRT_PRICE || sqrt_price >= MAX_SQRT_PRICE {
            return Err(ErrorKind::PriceOutOfBounds);
        }
        let (mut low, mut high) = (MIN_TICK, MAX_TICK);
        while low < high {
            let mid = low + (high - low + 1) / 2;
            if Tick(mid).sqrt_price() <= sqrt_price {
                low = mid;
            } else {
                high = mid - 1;
            }
        }
        Ok(Tick(low))
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<i32> for Tick {
    type Error = ErrorKind;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Tick::new(value)
    }
}

/// Largest per-tick gross liquidity for given tick distance,
/// so that all usable ticks together cannot exceed `u128::MAX`.
pub const fn max_tick_liquidity(tick_distance: i32) -> u128 {
    // number of usable ticks on both sides of zero
    let num_ticks = (MAX_TICK / tick_distance) as u128 * 2;
    u128::MAX / num_ticks
}
