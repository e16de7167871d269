//! Concentrated-liquidity pool engine with auto-compounding swap fees.
//!
//! * [`fp`] holds 256/512-bit integers and full-precision mul-div helpers.
//! * [`dex`] holds the pool engine: tick ledger, position store, reinvestment accounting,
//!   swap engine, pool state machine, anti-snipe fee vesting and the host collaborators.
pub mod dex;
pub mod fp;

pub use dex::{
    AccountId, Amount, AmountDelta, BasisPoints, Error, ErrorKind, FeeGrowth, Liquidity, PoolId,
    Result, SqrtPriceX96, Tick, Timestamp, TokenId,
};
pub use fp::{U256, U512};
