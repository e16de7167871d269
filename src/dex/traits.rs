use std::fmt;

use super::{
    AccountId, Amount, AmountDelta, BasisPoints, Env, ErrorKind, Liquidity, Pool, PoolId, Result,
    SqrtPriceX96, Tick, Timestamp, TokenId,
};
use crate::fp::U256;

/// Fungible token balances, as seen by pools.
///
/// Pools never trust transfer results alone: whatever they are owed is verified
/// by comparing own balances before and after a callback.
pub trait TokenLedger {
    fn balance_of(&self, token: &TokenId, account: &AccountId) -> Amount;

    fn transfer(
        &mut self,
        token: &TokenId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), ErrorKind>;
}

/// Time series of pool ticks, for time-weighted average prices
pub trait Oracle {
    fn initialize(&mut self, pool: &AccountId, now: Timestamp) -> Result<(), ErrorKind>;

    /// Records that `tick` and `liquidity` were active from the previous sample until `now`
    fn write(
        &mut self,
        pool: &AccountId,
        now: Timestamp,
        tick: Tick,
        liquidity: Liquidity,
    ) -> Result<(), ErrorKind>;

    /// Tick cumulatives `seconds_agos` before `now`, `tick` being the current one
    fn observe(
        &self,
        pool: &AccountId,
        now: Timestamp,
        seconds_agos: &[Timestamp],
        tick: Tick,
    ) -> Result<Vec<i64>, ErrorKind>;
}

/// Sink of pool events.
///
/// Events are expected to be kept only if the operation emitting them succeeds.
pub trait Logger {
    fn log(&mut self, args: fmt::Arguments<'_>);

    fn log_create_pool_event(&mut self, pool_id: &PoolId, pool: &AccountId, tick_distance: i32);

    fn log_fee_configuration_event(&mut self, fee_to: Option<&AccountId>, government_fee: BasisPoints);

    fn log_initialize_event(&mut self, pool: &AccountId, sqrt_price: &SqrtPriceX96, tick: Tick);

    fn log_mint_event(
        &mut self,
        pool: &AccountId,
        sender: &AccountId,
        owner: &AccountId,
        ticks: (Tick, Tick),
        liquidity: Liquidity,
        amounts: (Amount, Amount),
    );

    fn log_burn_event(
        &mut self,
        pool: &AccountId,
        owner: &AccountId,
        ticks: (Tick, Tick),
        liquidity: Liquidity,
        amounts: (Amount, Amount),
    );

    fn log_burn_rtokens_event(
        &mut self,
        pool: &AccountId,
        owner: &AccountId,
        qty: &U256,
        amounts: (Amount, Amount),
    );

    fn log_collect_rtokens_event(
        &mut self,
        pool: &AccountId,
        owner: &AccountId,
        ticks: (Tick, Tick),
        qty: &U256,
    );

    #[allow(clippy::too_many_arguments)]
    fn log_swap_event(
        &mut self,
        pool: &AccountId,
        sender: &AccountId,
        recipient: &AccountId,
        deltas: (AmountDelta, AmountDelta),
        sqrt_price: &SqrtPriceX96,
        liquidity: Liquidity,
        tick: Tick,
    );

    fn log_flash_event(
        &mut self,
        pool: &AccountId,
        sender: &AccountId,
        recipient: &AccountId,
        amounts: (Amount, Amount),
        paid: (Amount, Amount),
    );

    fn log_tick_update_event(
        &mut self,
        pool: &AccountId,
        tick: Tick,
        liquidity_gross: Liquidity,
        liquidity_net: i128,
    );
}

/// Invoked by [`Pool::mint`] to collect token quantities for added liquidity
pub trait MintCallback {
    fn mint_callback(
        &mut self,
        pool: &mut Pool,
        env: &mut Env<'_>,
        qty0: Amount,
        qty1: Amount,
        data: &[u8],
    ) -> Result<()>;
}

/// Invoked by [`Pool::swap`] after output was sent, to collect swap input.
///
/// Positive delta is owed to the pool.
pub trait SwapCallback {
    fn swap_callback(
        &mut self,
        pool: &mut Pool,
        env: &mut Env<'_>,
        delta0: AmountDelta,
        delta1: AmountDelta,
        data: &[u8],
    ) -> Result<()>;
}

/// Invoked by [`Pool::flash`] after the loan was sent; must return it together with fees
pub trait FlashCallback {
    fn flash_callback(
        &mut self,
        pool: &mut Pool,
        env: &mut Env<'_>,
        fee0: Amount,
        fee1: Amount,
        data: &[u8],
    ) -> Result<()>;
}
