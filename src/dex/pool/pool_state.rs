use num_traits::WrappingAdd;

use crate::dex::{
    reinvestment, AccountId, ClaimToken, ErrorKind, FeeGrowth, FactoryConfig, Liquidity,
    PositionStore, SecondsPerLiquidity, SqrtPriceX96, Tick, TickLedger, Timestamp, MIN_LIQUIDITY,
};
use crate::fp::{RES_96, U256};

/// Reentrancy guard of a pool
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LockState {
    /// Pool has no price yet, every operation but unlock fails
    #[default]
    Uninitialized,
    Unlocked,
    /// An operation is in flight, re-entrant calls fail
    Locked,
}

/// Price, liquidity and global accumulators of a pool
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PoolData {
    pub sqrt_price: SqrtPriceX96,
    pub current_tick: Tick,
    /// Greatest initialized tick not above the current one
    pub nearest_current_tick: Tick,
    /// Liquidity of positions active at current price
    pub base_l: Liquidity,
    /// Liquidity compounded from swap fees, always active
    pub reinvest_l: Liquidity,
    /// `reinvest_l` at the last fee settlement
    pub reinvest_l_last: Liquidity,
    pub fee_growth_global: FeeGrowth,
    pub seconds_per_liquidity_global: SecondsPerLiquidity,
    pub seconds_per_liquidity_update_time: Timestamp,
}

impl PoolData {
    /// Pool data right after unlocking at `sqrt_price`
    pub fn new(sqrt_price: SqrtPriceX96, current_tick: Tick, now: Timestamp) -> Self {
        Self {
            sqrt_price,
            current_tick,
            nearest_current_tick: Tick::MIN,
            base_l: 0,
            reinvest_l: MIN_LIQUIDITY,
            reinvest_l_last: MIN_LIQUIDITY,
            fee_growth_global: U256::zero(),
            seconds_per_liquidity_global: 0,
            seconds_per_liquidity_update_time: now,
        }
    }

    /// Advances seconds per liquidity up to `now`, with `base_l` active since the last update.
    ///
    /// The accumulator wraps around, like fee growth.
    pub fn sync_seconds_per_liquidity(
        &mut self,
        now: Timestamp,
        base_l: Liquidity,
    ) -> SecondsPerLiquidity {
        let elapsed = now.saturating_sub(self.seconds_per_liquidity_update_time);
        if elapsed > 0 {
            self.seconds_per_liquidity_update_time = now;
            self.seconds_per_liquidity_global = self
                .seconds_per_liquidity_global
                .wrapping_add(seconds_per_liquidity_increment(elapsed, base_l));
        }
        self.seconds_per_liquidity_global
    }

    /// Seconds per liquidity as it would be synced at `now`, without updating anything
    pub fn seconds_per_liquidity_at(&self, now: Timestamp) -> SecondsPerLiquidity {
        let elapsed = now.saturating_sub(self.seconds_per_liquidity_update_time);
        self.seconds_per_liquidity_global
            .wrapping_add(seconds_per_liquidity_increment(elapsed, self.base_l))
    }
}

fn seconds_per_liquidity_increment(elapsed: Timestamp, base_l: Liquidity) -> SecondsPerLiquidity {
    if base_l == 0 {
        return 0;
    }
    // (elapsed << 96) < 2^128 and base_l >= 1, so the quotient fits 129 bits; upper bit is dropped
    ((U256::from(elapsed) << RES_96) / U256::from(base_l)).low_u128()
}

/// Everything a pool owns, restored as a whole if an operation fails
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolState {
    pub data: PoolData,
    pub ticks: TickLedger,
    pub positions: PositionStore,
    pub claim_token: ClaimToken,
}

impl PoolState {
    pub fn new(data: PoolData) -> Self {
        Self {
            data,
            ticks: TickLedger::new(),
            positions: PositionStore::default(),
            claim_token: ClaimToken::default(),
        }
    }

    /// Converts reinvestment liquidity grown since the last settlement into claim tokens.
    ///
    /// Government share goes to the fee recipient, the rest to `pool` on behalf of
    /// in-range positions, raising fee growth per unit of `base_l`.
    /// Returns the updated global fee growth.
    pub fn sync_fee_growth(
        &mut self,
        config: &FactoryConfig,
        pool: &AccountId,
        update_reinvest_l_last: bool,
    ) -> Result<FeeGrowth, ErrorKind> {
        let PoolData {
            base_l,
            reinvest_l,
            reinvest_l_last,
            ..
        } = self.data;
        let rmint_qty = reinvestment::calc_rmint_qty(
            reinvest_l,
            reinvest_l_last,
            base_l,
            self.claim_token.total_supply(),
        )?;
        if !rmint_qty.is_zero() {
            let (fee_to, government_fee) = config.fee_configuration();
            let (government_qty, lp_qty) =
                reinvestment::split_government_fee(rmint_qty, government_fee);
            if let Some(fee_to) = fee_to {
                self.claim_token.mint(&fee_to, government_qty)?;
            }
            self.claim_token.mint(pool, lp_qty)?;
            let increment = reinvestment::fee_growth_increment(lp_qty, base_l)?;
            self.data.fee_growth_global =
                WrappingAdd::wrapping_add(&self.data.fee_growth_global, &increment);
        }
        if update_reinvest_l_last {
            self.data.reinvest_l_last = reinvest_l;
        }
        Ok(self.data.fee_growth_global)
    }
}
