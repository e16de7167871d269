//! Concentrated-liquidity pool engine.
//!
//! Leaf-first:
//! * [`tick`], [`liquidity_math`], [`swap_math`] - pure price and quantity math
//! * [`tick_ledger`] - initialized ticks, linked in ascending order
//! * [`position`] - per-(owner, range) liquidity and fee snapshots
//! * [`reinvestment`] - fee compounding and the reinvestment claim token
//! * [`pool`] - the pool state machine: unlock, mint, burn, swap, flash
//! * [`vesting`] - anti-snipe vesting of freshly earned fees, used by position managers
//! * [`config`], [`factory`] - fee tiers, protocol fee, pool registry
//! * [`host`] - in-memory token ledger, oracle, event log and atomic call runner
pub use config::{FactoryConfig, FeeTier};
pub use errors::*;
pub use factory::Factory;
pub use pool::{
    Env, LiquidityState, LockState, Pool, PoolConfig, PoolData, PoolState, PositionChange,
    SwapResult,
};
pub use position::{PositionKey, PositionState, PositionStore};
pub use reinvestment::ClaimToken;
pub use tick::{max_tick_liquidity, Tick, MAX_SQRT_PRICE, MAX_TICK, MIN_SQRT_PRICE, MIN_TICK};
pub use tick_ledger::{TickLedger, TickLink, TickState};
pub use traits::{FlashCallback, Logger, MintCallback, Oracle, SwapCallback, TokenLedger};
pub use util_types::*;
pub use vesting::{FeeVesting, ImmediateRelease, LinearVesting, VestingOutcome, VestingRecord};

pub mod config;
mod errors;
pub mod factory;
pub mod host;
pub mod liquidity_math;
pub mod pool;
pub mod position;
pub mod reinvestment;
pub mod swap_math;
pub mod tick;
pub mod tick_ledger;
mod traits;
mod util_types;
pub mod vesting;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod dex_tests_liquidity;
#[cfg(test)]
mod dex_tests_swap;

use static_assertions::const_assert;

use crate::fp::U256;

pub type BasisPoints = u16;
pub type Liquidity = u128;
/// Token quantity
pub type Amount = u128;
/// Signed token quantity, positive means owed to the pool
pub type AmountDelta = i128;
/// Square root of price as Q64.96
pub type SqrtPriceX96 = U256;
/// Fee growth per unit of liquidity as Q*.96, wraps around modulo 2^256
pub type FeeGrowth = U256;
/// Seconds per unit of liquidity as Q32.96, wraps around modulo 2^128
pub type SecondsPerLiquidity = u128;
/// Seconds since Unix epoch
pub type Timestamp = u32;

pub const BASIS_POINT_DIVISOR: BasisPoints = 10_000;
/// Upper bound of government share of reinvested fees, 20%
pub const MAX_GOVERNMENT_FEE: BasisPoints = 2_000;
/// Upper bound of swap fee rate of a tier, 10%
pub const MAX_SWAP_FEE: BasisPoints = 1_000;
/// Reinvestment liquidity seeded on unlock, never withdrawable
pub const MIN_LIQUIDITY: Liquidity = 100_000;
/// Largest number of ticks a single swap step may span, about 5% of price
pub const MAX_TICK_DISTANCE: i32 = 480;
/// How many initialized ticks insertion may walk past the caller's hint
pub const MAX_TICK_TRAVEL: usize = 10;

const_assert!(MAX_GOVERNMENT_FEE < BASIS_POINT_DIVISOR);
const_assert!(MAX_SWAP_FEE < BASIS_POINT_DIVISOR);
// swap step formulas rely on `2 * BASIS_POINT_DIVISOR` not overflowing basis points type
const_assert!((BASIS_POINT_DIVISOR as u32) * 2 <= BasisPoints::MAX as u32);
const_assert!(MAX_TICK_DISTANCE > 0 && MAX_TICK_DISTANCE < MAX_TICK);

pub fn validate_government_fee(fee: BasisPoints) -> Result<BasisPoints, ErrorKind> {
    if fee <= MAX_GOVERNMENT_FEE {
        Ok(fee)
    } else {
        Err(ErrorKind::IllegalFee)
    }
}

pub fn validate_swap_fee(fee: BasisPoints) -> Result<BasisPoints, ErrorKind> {
    if 0 < fee && fee <= MAX_SWAP_FEE {
        Ok(fee)
    } else {
        Err(ErrorKind::IllegalFee)
    }
}
