use std::collections::BTreeMap;

use num_traits::WrappingSub;

use super::{liquidity_math, AccountId, ErrorKind, FeeGrowth, Liquidity, Tick};
use crate::fp::{mul_div_floor, TWO_POW_96, U256};

/// Position is identified by its owner and price range
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositionKey {
    pub owner: AccountId,
    pub tick_lower: Tick,
    pub tick_upper: Tick,
}

impl PositionKey {
    pub fn new(owner: AccountId, tick_lower: Tick, tick_upper: Tick) -> Result<Self, ErrorKind> {
        if tick_lower >= tick_upper {
            return Err(ErrorKind::InvalidTickRange);
        }
        Ok(Self {
            owner,
            tick_lower,
            tick_upper,
        })
    }

    pub fn range(&self) -> (Tick, Tick) {
        (self.tick_lower, self.tick_upper)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionState {
    pub liquidity: Liquidity,
    /// Fee growth inside the range at the last update
    pub fee_growth_inside_last: FeeGrowth,
    /// Claim tokens earned but not yet collected
    pub rtoken_owed: U256,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionStore {
    positions: BTreeMap<PositionKey, PositionState>,
}

impl PositionStore {
    pub fn get(&self, key: &PositionKey) -> Option<&PositionState> {
        self.positions.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PositionKey, &PositionState)> {
        self.positions.iter()
    }

    /// Settles fees earned by current liquidity since last update, then applies `liquidity_delta`.
    ///
    /// Returns claim tokens earned by the position during this update.
    /// `fee_growth_inside` going backwards is treated as wrapped around.
    pub fn update(
        &mut self,
        key: &PositionKey,
        liquidity_delta: i128,
        fee_growth_inside: FeeGrowth,
    ) -> Result<U256, ErrorKind> {
        if key.tick_lower >= key.tick_upper {
            return Err(ErrorKind::InvalidTickRange);
        }
        let current = self.positions.get(key).copied().unwrap_or_default();

        let growth = WrappingSub::wrapping_sub(&fee_growth_inside, &current.fee_growth_inside_last);
        let earned = mul_div_floor(growth, U256::from(current.liquidity), TWO_POW_96)?;
        let updated = PositionState {
            liquidity: liquidity_math::add_delta(current.liquidity, liquidity_delta)?,
            fee_growth_inside_last: fee_growth_inside,
            rtoken_owed: current
                .rtoken_owed
                .checked_add(earned)
                .ok_or(ErrorKind::Overflow)?,
        };
        self.positions.insert(*key, updated);
        Ok(earned)
    }

    /// Takes out all claim tokens owed to the position.
    ///
    /// Records of fully burnt positions are dropped once nothing is owed.
    pub fn sweep(&mut self, key: &PositionKey) -> Result<U256, ErrorKind> {
        let position = self
            .positions
            .get_mut(key)
            .ok_or(ErrorKind::InvalidParams)?;
        let owed = std::mem::take(&mut position.rtoken_owed);
        if position.liquidity == 0 {
            self.positions.remove(key);
        }
        Ok(owed)
    }
}
