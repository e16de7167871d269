use std::collections::BTreeMap;

use super::{
    AccountId, BasisPoints, ErrorKind, FactoryConfig, Logger, Pool, PoolConfig, PoolId, Result,
    TokenId,
};
use crate::{ensure_here, error_here};

/// Tag of derived pool addresses
const POOL_ADDRESS_TAG: u8 = b'P';

/// Registry of pools and owner of their shared configuration
#[derive(Clone, Debug)]
pub struct Factory {
    config: FactoryConfig,
    pools: BTreeMap<PoolId, Pool>,
    pool_count: u64,
}

impl Factory {
    pub fn new(owner: AccountId) -> Self {
        Self::with_config(FactoryConfig::new(owner))
    }

    pub fn with_config(config: FactoryConfig) -> Self {
        Self {
            config,
            pools: BTreeMap::new(),
            pool_count: 0,
        }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Configuration setters check the caller themselves
    pub fn config_mut(&mut self) -> &mut FactoryConfig {
        &mut self.config
    }

    /// Creates an uninitialized pool for a token pair and an enabled fee tier.
    ///
    /// Tokens may come in any order. Returns the pool id and the address holding its reserves.
    pub fn create_pool(
        &mut self,
        tokens: (TokenId, TokenId),
        fee: BasisPoints,
        logger: &mut dyn Logger,
    ) -> Result<(PoolId, AccountId)> {
        let (id, _) = PoolId::try_from_pair(tokens, fee)?;
        let tier = *self.config.fee_tier(fee)?;
        ensure_here!(!self.pools.contains_key(&id), ErrorKind::PoolExists);

        self.pool_count += 1;
        let address = AccountId::derived(POOL_ADDRESS_TAG, self.pool_count);
        let pool = Pool::new(PoolConfig {
            id,
            address,
            tick_distance: tier.tick_distance,
            max_tick_liquidity: tier.max_tick_liquidity,
        });
        self.pools.insert(id, pool);
        logger.log_create_pool_event(&id, &address, tier.tick_distance);
        Ok((id, address))
    }

    pub fn pool(&self, id: &PoolId) -> Result<&Pool> {
        self.pools
            .get(id)
            .ok_or_else(|| error_here!(ErrorKind::PoolNotFound))
    }

    /// Pool together with the configuration its operations need
    pub fn pool_mut(&mut self, id: &PoolId) -> Result<(&mut Pool, &FactoryConfig)> {
        let pool = self
            .pools
            .get_mut(id)
            .ok_or_else(|| error_here!(ErrorKind::PoolNotFound))?;
        Ok((pool, &self.config))
    }

    /// Looks a pool up by its tokens in any order
    pub fn find_pool(&self, tokens: (TokenId, TokenId), fee: BasisPoints) -> Result<&Pool> {
        let (id, _) = PoolId::try_from_pair(tokens, fee)?;
        self.pool(&id)
    }

    pub fn pools(&self) -> impl Iterator<Item = (&PoolId, &Pool)> {
        self.pools.iter()
    }
}
