//! In-memory host of pools.
//!
//! Provides the collaborators pools expect from their environment: token balances,
//! an observation oracle, an event log and a clock. [`Host::call_pool`] runs pool
//! operations atomically, the way a transaction would run on chain.
use crate::dex::{
    AccountId, BasisPoints, Env, Factory, FactoryConfig, Logger, Pool, PoolId, Result,
    Timestamp, TokenId,
};

mod ledger;
mod logger;
mod oracle;
mod payer;

pub use ledger::InMemoryLedger;
pub use logger::{Event, EventLog};
pub use oracle::{Observation, ObservationLog};
pub use payer::{DirectPayer, FlashRepayer};

#[derive(Clone, Debug)]
pub struct Host {
    pub factory: Factory,
    pub ledger: InMemoryLedger,
    pub oracle: ObservationLog,
    pub logger: EventLog,
    pub now: Timestamp,
}

impl Host {
    pub fn new(owner: AccountId) -> Self {
        Self::with_factory(Factory::new(owner))
    }

    pub fn with_factory(factory: Factory) -> Self {
        Self {
            factory,
            ledger: InMemoryLedger::new(),
            oracle: ObservationLog::new(),
            logger: EventLog::new(),
            now: 0,
        }
    }

    pub fn advance_time(&mut self, seconds: Timestamp) {
        self.now = self.now.saturating_add(seconds);
    }

    pub fn pool(&self, id: &PoolId) -> Result<&Pool> {
        self.factory.pool(id)
    }

    pub fn create_pool(&mut self, tokens: (TokenId, TokenId), fee: BasisPoints) -> Result<(PoolId, AccountId)> {
        let result = self.factory.create_pool(tokens, fee, &mut self.logger);
        self.settle_logs(result.is_ok());
        result
    }

    /// Runs `f` over the pool as `caller`.
    ///
    /// If `f` fails, the pool, token balances, oracle and events are restored
    /// to what they were before the call.
    pub fn call_pool<R>(
        &mut self,
        caller: AccountId,
        pool_id: &PoolId,
        f: impl FnOnce(&mut Pool, &mut Env<'_>) -> Result<R>,
    ) -> Result<R> {
        let ledger = self.ledger.clone();
        let oracle = self.oracle.clone();
        let (pool, config) = self.factory.pool_mut(pool_id)?;
        let snapshot = pool.clone();
        let mut env = Env {
            caller,
            now: self.now,
            config,
            ledger: &mut self.ledger,
            oracle: &mut self.oracle,
            logger: &mut self.logger,
        };
        let result = f(pool, &mut env);
        if result.is_err() {
            *pool = snapshot;
            self.ledger = ledger;
            self.oracle = oracle;
        }
        self.settle_logs(result.is_ok());
        result
    }

    /// Changes factory configuration, keeping it intact on failure
    pub fn configure(
        &mut self,
        f: impl FnOnce(&mut FactoryConfig) -> Result<()>,
    ) -> Result<()> {
        let snapshot = self.factory.config().clone();
        let result = f(self.factory.config_mut());
        if result.is_err() {
            *self.factory.config_mut() = snapshot;
        }
        result
    }

    pub fn update_fee_configuration(
        &mut self,
        caller: &AccountId,
        fee_to: Option<AccountId>,
        government_fee: BasisPoints,
    ) -> Result<()> {
        let result = self
            .factory
            .config_mut()
            .update_fee_configuration(caller, fee_to, government_fee);
        if result.is_ok() {
            self.logger
                .log_fee_configuration_event(fee_to.as_ref(), government_fee);
        }
        self.settle_logs(result.is_ok());
        result
    }

    /// Tick cumulatives of a pool `seconds_agos` before now
    pub fn observe(&self, pool_id: &PoolId, seconds_agos: &[Timestamp]) -> Result<Vec<i64>> {
        self.pool(pool_id)?
            .observe(&self.oracle, self.now, seconds_agos)
    }

    fn settle_logs(&mut self, success: bool) {
        if success {
            self.logger.commit();
        } else {
            self.logger.reject();
        }
    }
}
