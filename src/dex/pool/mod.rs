//! Pool state machine.
//!
//! A pool goes `Uninitialized -> Unlocked` once, via [`Pool::unlock_pool`].
//! Every mutating operation then runs as `Unlocked -> Locked -> Unlocked` through
//! [`Pool::with_lock`], which also restores the pool state if the operation fails.
//! Callbacks receive the locked pool back, so any re-entrant call fails with
//! [`ErrorKind::Locked`] while views keep working.
use crate::dex::{
    AccountId, Amount, AmountDelta, BasisPoints, ErrorKind, FactoryConfig, FeeGrowth, Liquidity,
    Logger, Oracle, PoolId, PositionKey, PositionState, Result, SecondsPerLiquidity,
    SqrtPriceX96, Tick, TickLink, TickState, Timestamp, TokenLedger,
};
use crate::error_here;
use crate::fp::U256;

pub mod pool_impl;
pub mod pool_state;

pub use pool_state::{LockState, PoolData, PoolState};

/// Collaborators and context of a single pool call
pub struct Env<'a> {
    /// Account calling the pool: position manager, router or trader
    pub caller: AccountId,
    pub now: Timestamp,
    pub config: &'a FactoryConfig,
    pub ledger: &'a mut dyn TokenLedger,
    pub oracle: &'a mut dyn Oracle,
    pub logger: &'a mut dyn Logger,
}

/// Immutable parameters of a pool, fixed at creation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    pub id: PoolId,
    /// Account holding pool's token reserves
    pub address: AccountId,
    pub tick_distance: i32,
    pub max_tick_liquidity: Liquidity,
}

impl PoolConfig {
    pub fn swap_fee(&self) -> BasisPoints {
        self.id.fee()
    }
}

/// `(base_l, reinvest_l, reinvest_l_last)`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LiquidityState {
    pub base_l: Liquidity,
    pub reinvest_l: Liquidity,
    pub reinvest_l_last: Liquidity,
}

/// Token quantities of a mint or burn, and position's fee growth snapshot after it
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PositionChange {
    pub qty0: Amount,
    pub qty1: Amount,
    pub fee_growth_inside_last: FeeGrowth,
}

/// Net token deltas of a swap, positive ones were paid to the pool
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SwapResult {
    pub delta0: AmountDelta,
    pub delta1: AmountDelta,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pool {
    config: PoolConfig,
    lock: LockState,
    state: PoolState,
}

impl Pool {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            lock: LockState::Uninitialized,
            // placeholder price, replaced on unlock
            state: PoolState::new(PoolData::new(U256::zero(), Tick::ZERO, 0)),
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn address(&self) -> &AccountId {
        &self.config.address
    }

    pub fn lock_state(&self) -> LockState {
        self.lock
    }

    /// Runs `f` holding the lock.
    ///
    /// Fails fast if the pool is locked or uninitialized. If `f` fails,
    /// pool state is restored to what it was before the call.
    pub fn with_lock<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        match self.lock {
            LockState::Uninitialized => return Err(error_here!(ErrorKind::NotInitialized)),
            LockState::Locked => return Err(error_here!(ErrorKind::Locked)),
            LockState::Unlocked => {}
        }
        let snapshot = self.state.clone();
        self.lock = LockState::Locked;
        let result = f(self);
        self.lock = LockState::Unlocked;
        if result.is_err() {
            self.state = snapshot;
        }
        result
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.lock == LockState::Uninitialized {
            return Err(error_here!(ErrorKind::NotInitialized));
        }
        Ok(())
    }

    // Views

    /// Price, ticks and accumulators
    pub fn pool_data(&self) -> &PoolData {
        &self.state.data
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    /// `(sqrt_price, current_tick, nearest_current_tick, locked)`
    pub fn pool_state(&self) -> (SqrtPriceX96, Tick, Tick, bool) {
        let data = &self.state.data;
        (
            data.sqrt_price,
            data.current_tick,
            data.nearest_current_tick,
            self.lock == LockState::Locked,
        )
    }

    pub fn liquidity_state(&self) -> LiquidityState {
        let data = &self.state.data;
        LiquidityState {
            base_l: data.base_l,
            reinvest_l: data.reinvest_l,
            reinvest_l_last: data.reinvest_l_last,
        }
    }

    pub fn fee_growth_global(&self) -> FeeGrowth {
        self.state.data.fee_growth_global
    }

    /// `(seconds_per_liquidity_global, last_update_time)`
    pub fn seconds_per_liquidity_data(&self) -> (SecondsPerLiquidity, Timestamp) {
        let data = &self.state.data;
        (
            data.seconds_per_liquidity_global,
            data.seconds_per_liquidity_update_time,
        )
    }

    /// Seconds per unit of liquidity the price spent within `lower..upper` up to `now`
    pub fn seconds_per_liquidity_inside(
        &self,
        (tick_lower, tick_upper): (Tick, Tick),
        now: Timestamp,
    ) -> Result<SecondsPerLiquidity> {
        self.ensure_initialized()?;
        PositionKey::new(self.config.address, tick_lower, tick_upper)?;
        let data = &self.state.data;
        Ok(self.state.ticks.seconds_per_liquidity_inside(
            (tick_lower, tick_upper),
            data.current_tick,
            data.seconds_per_liquidity_at(now),
        ))
    }

    pub fn tick(&self, tick: Tick) -> Option<&TickState> {
        self.state.ticks.state(tick)
    }

    pub fn tick_link(&self, tick: Tick) -> Option<&TickLink> {
        self.state.ticks.link(tick)
    }

    /// Initialized ticks in ascending order, sentinels included
    pub fn initialized_ticks(&self) -> impl Iterator<Item = Tick> + '_ {
        self.state.ticks.iter_initialized()
    }

    pub fn position(&self, owner: &AccountId, (tick_lower, tick_upper): (Tick, Tick)) -> PositionState {
        let key = PositionKey {
            owner: *owner,
            tick_lower,
            tick_upper,
        };
        self.state
            .positions
            .get(&key)
            .copied()
            .unwrap_or_default()
    }

    pub fn rtoken_balance(&self, account: &AccountId) -> U256 {
        self.state.claim_token.balance_of(account)
    }

    pub fn rtoken_supply(&self) -> U256 {
        self.state.claim_token.total_supply()
    }

    /// Tick cumulatives `seconds_agos` before `now`
    pub fn observe(
        &self,
        oracle: &dyn Oracle,
        now: Timestamp,
        seconds_agos: &[Timestamp],
    ) -> Result<Vec<i64>> {
        self.ensure_initialized()?;
        oracle
            .observe(
                &self.config.address,
                now,
                seconds_agos,
                self.state.data.current_tick,
            )
            .map_err(|e| error_here!(e))
    }
}
