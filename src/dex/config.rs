//! Process-wide pool configuration, owned by the factory.
//!
//! Pools never hold configuration themselves: every operation receives a reference
//! to the current [`FactoryConfig`] and reads it once.
use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    max_tick_liquidity, validate_government_fee, validate_swap_fee, AccountId, BasisPoints,
    ErrorKind, Liquidity, Result, Timestamp,
};
use crate::{ensure_here, error_here};

/// Tick distances are kept small enough for a swap step to stay within a few percent
pub const MAX_TICK_DISTANCE_OF_TIER: i32 = 16_384;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeeTier {
    /// Position bounds must be multiples of this value
    pub tick_distance: i32,
    /// Upper bound of gross liquidity referencing a single tick
    pub max_tick_liquidity: Liquidity,
}

impl FeeTier {
    pub fn new(tick_distance: i32) -> Result<Self, ErrorKind> {
        if tick_distance <= 0 || tick_distance >= MAX_TICK_DISTANCE_OF_TIER {
            return Err(ErrorKind::InvalidParams);
        }
        Ok(Self {
            tick_distance,
            max_tick_liquidity: max_tick_liquidity(tick_distance),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactoryConfig {
    owner: AccountId,
    fee_to: Option<AccountId>,
    government_fee: BasisPoints,
    fee_tiers: BTreeMap<BasisPoints, FeeTier>,
    /// `None` if minting is open to everyone
    whitelist: Option<BTreeSet<AccountId>>,
    vesting_period: Timestamp,
}

/// Swap fee in basis points to tick distance
const DEFAULT_FEE_TIERS: [(BasisPoints, i32); 4] = [(1, 1), (4, 8), (30, 60), (100, 200)];

impl FactoryConfig {
    pub fn new(owner: AccountId) -> Self {
        let fee_tiers = DEFAULT_FEE_TIERS
            .iter()
            .filter_map(|(fee, tick_distance)| Some((*fee, FeeTier::new(*tick_distance).ok()?)))
            .collect();
        Self {
            owner,
            fee_to: None,
            government_fee: 0,
            fee_tiers,
            whitelist: None,
            vesting_period: 0,
        }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Recipient and share of the government fee.
    ///
    /// Share is reported as zero while there is no recipient.
    pub fn fee_configuration(&self) -> (Option<AccountId>, BasisPoints) {
        match self.fee_to {
            Some(fee_to) => (Some(fee_to), self.government_fee),
            None => (None, 0),
        }
    }

    pub fn fee_tier(&self, fee: BasisPoints) -> Result<&FeeTier, ErrorKind> {
        self.fee_tiers.get(&fee).ok_or(ErrorKind::UnknownFeeTier)
    }

    pub fn fee_tiers(&self) -> impl Iterator<Item = (&BasisPoints, &FeeTier)> {
        self.fee_tiers.iter()
    }

    pub fn is_whitelisted(&self, account: &AccountId) -> bool {
        self.whitelist
            .as_ref()
            .map_or(true, |whitelist| whitelist.contains(account))
    }

    pub fn vesting_period(&self) -> Timestamp {
        self.vesting_period
    }

    fn ensure_owner(&self, caller: &AccountId) -> Result<()> {
        ensure_here!(*caller == self.owner, ErrorKind::PermissionDenied);
        Ok(())
    }

    pub fn set_owner(&mut self, caller: &AccountId, owner: AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        self.owner = owner;
        Ok(())
    }

    /// Changes only affect fees settled afterwards
    pub fn update_fee_configuration(
        &mut self,
        caller: &AccountId,
        fee_to: Option<AccountId>,
        government_fee: BasisPoints,
    ) -> Result<()> {
        self.ensure_owner(caller)?;
        self.government_fee = validate_government_fee(government_fee).map_err(|e| error_here!(e))?;
        self.fee_to = fee_to;
        Ok(())
    }

    pub fn enable_fee_tier(
        &mut self,
        caller: &AccountId,
        fee: BasisPoints,
        tick_distance: i32,
    ) -> Result<()> {
        self.ensure_owner(caller)?;
        validate_swap_fee(fee).map_err(|e| error_here!(e))?;
        ensure_here!(!self.fee_tiers.contains_key(&fee), ErrorKind::FeeTierExists);
        let tier = FeeTier::new(tick_distance).map_err(|e| error_here!(e))?;
        self.fee_tiers.insert(fee, tier);
        Ok(())
    }

    /// Overrides per-tick liquidity cap of an enabled tier, for pools created afterwards
    pub fn set_max_tick_liquidity(
        &mut self,
        caller: &AccountId,
        fee: BasisPoints,
        max_tick_liquidity: Liquidity,
    ) -> Result<()> {
        self.ensure_owner(caller)?;
        ensure_here!(max_tick_liquidity > 0, ErrorKind::InvalidParams);
        let tier = self
            .fee_tiers
            .get_mut(&fee)
            .ok_or_else(|| error_here!(ErrorKind::UnknownFeeTier))?;
        tier.max_tick_liquidity = max_tick_liquidity;
        Ok(())
    }

    pub fn enable_whitelist(&mut self, caller: &AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        self.whitelist.get_or_insert_with(BTreeSet::new);
        Ok(())
    }

    pub fn disable_whitelist(&mut self, caller: &AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        self.whitelist = None;
        Ok(())
    }

    /// Adds position managers to the whitelist, enabling it if needed
    pub fn add_to_whitelist<'a>(
        &mut self,
        caller: &AccountId,
        accounts: impl IntoIterator<Item = &'a AccountId>,
    ) -> Result<()> {
        self.ensure_owner(caller)?;
        self.whitelist
            .get_or_insert_with(BTreeSet::new)
            .extend(accounts.into_iter().copied());
        Ok(())
    }

    pub fn remove_from_whitelist<'a>(
        &mut self,
        caller: &AccountId,
        accounts: impl IntoIterator<Item = &'a AccountId>,
    ) -> Result<()> {
        self.ensure_owner(caller)?;
        if let Some(whitelist) = self.whitelist.as_mut() {
            for account in accounts {
                whitelist.remove(account);
            }
        }
        Ok(())
    }

    pub fn set_vesting_period(&mut self, caller: &AccountId, period: Timestamp) -> Result<()> {
        self.ensure_owner(caller)?;
        self.vesting_period = period;
        Ok(())
    }
}
