use std::fmt;

use crate::dex::{
    AccountId, Amount, AmountDelta, BasisPoints, Liquidity, Logger, PoolId, SqrtPriceX96, Tick,
};
use crate::fp::U256;

/// Every event a pool or factory may emit.
/// Keeps all values directly, so tests can match on them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Message(String),
    CreatePool {
        pool_id: PoolId,
        pool: AccountId,
        tick_distance: i32,
    },
    FeeConfiguration {
        fee_to: Option<AccountId>,
        government_fee: BasisPoints,
    },
    Initialize {
        pool: AccountId,
        sqrt_price: SqrtPriceX96,
        tick: Tick,
    },
    Mint {
        pool: AccountId,
        sender: AccountId,
        owner: AccountId,
        ticks: (Tick, Tick),
        liquidity: Liquidity,
        amounts: (Amount, Amount),
    },
    Burn {
        pool: AccountId,
        owner: AccountId,
        ticks: (Tick, Tick),
        liquidity: Liquidity,
        amounts: (Amount, Amount),
    },
    BurnRTokens {
        pool: AccountId,
        owner: AccountId,
        qty: U256,
        amounts: (Amount, Amount),
    },
    CollectRTokens {
        pool: AccountId,
        owner: AccountId,
        ticks: (Tick, Tick),
        qty: U256,
    },
    Swap {
        pool: AccountId,
        sender: AccountId,
        recipient: AccountId,
        deltas: (AmountDelta, AmountDelta),
        sqrt_price: SqrtPriceX96,
        liquidity: Liquidity,
        tick: Tick,
    },
    Flash {
        pool: AccountId,
        sender: AccountId,
        recipient: AccountId,
        amounts: (Amount, Amount),
        paid: (Amount, Amount),
    },
    TickUpdate {
        pool: AccountId,
        tick: Tick,
        liquidity_gross: Liquidity,
        liquidity_net: i128,
    },
}

/// Event sink with persistent and mutable parts.
///
/// Events of an operation in flight go to the mutable part, and are either
/// committed into the persistent part or dropped when the operation ends.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    persistent: Vec<Event>,
    mutable: Vec<Event>,
    prev_log_index: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves all entries from mutable part into persistent one,
    /// used when some operation succeeds
    pub fn commit(&mut self) {
        self.prev_log_index = self.persistent.len();
        self.persistent.append(&mut self.mutable);
    }

    /// Drops all entries from mutable part
    pub fn reject(&mut self) {
        self.mutable.clear();
    }

    pub fn logs(&self) -> &[Event] {
        &self.persistent
    }

    /// Events recorded by the last commit
    pub fn latest_logs(&self) -> &[Event] {
        &self.persistent[self.prev_log_index..]
    }
}

impl Logger for EventLog {
    fn log(&mut self, args: fmt::Arguments<'_>) {
        self.mutable.push(Event::Message(fmt::format(args)));
    }

    fn log_create_pool_event(&mut self, pool_id: &PoolId, pool: &AccountId, tick_distance: i32) {
        self.mutable.push(Event::CreatePool {
            pool_id: *pool_id,
            pool: *pool,
            tick_distance,
        });
    }

    fn log_fee_configuration_event(&mut self, fee_to: Option<&AccountId>, government_fee: BasisPoints) {
        self.mutable.push(Event::FeeConfiguration {
            fee_to: fee_to.copied(),
            government_fee,
        });
    }

    fn log_initialize_event(&mut self, pool: &AccountId, sqrt_price: &SqrtPriceX96, tick: Tick) {
        self.mutable.push(Event::Initialize {
            pool: *pool,
            sqrt_price: *sqrt_price,
            tick,
        });
    }

    fn log_mint_event(
        &mut self,
        pool: &AccountId,
        sender: &AccountId,
        owner: &AccountId,
        ticks: (Tick, Tick),
        liquidity: Liquidity,
        amounts: (Amount, Amount),
    ) {
        self.mutable.push(Event::Mint {
            pool: *pool,
            sender: *sender,
            owner: *owner,
            ticks,
            liquidity,
            amounts,
        });
    }

    fn log_burn_event(
        &mut self,
        pool: &AccountId,
        owner: &AccountId,
        ticks: (Tick, Tick),
        liquidity: Liquidity,
        amounts: (Amount, Amount),
    ) {
        self.mutable.push(Event::Burn {
            pool: *pool,
            owner: *owner,
            ticks,
            liquidity,
            amounts,
        });
    }

    fn log_burn_rtokens_event(
        &mut self,
        pool: &AccountId,
        owner: &AccountId,
        qty: &U256,
        amounts: (Amount, Amount),
    ) {
        self.mutable.push(Event::BurnRTokens {
            pool: *pool,
            owner: *owner,
            qty: *qty,
            amounts,
        });
    }

    fn log_collect_rtokens_event(
        &mut self,
        pool: &AccountId,
        owner: &AccountId,
        ticks: (Tick, Tick),
        qty: &U256,
    ) {
        self.mutable.push(Event::CollectRTokens {
            pool: *pool,
            owner: *owner,
            ticks,
            qty: *qty,
        });
    }

    fn log_swap_event(
        &mut self,
        pool: &AccountId,
        sender: &AccountId,
        recipient: &AccountId,
        deltas: (AmountDelta, AmountDelta),
        sqrt_price: &SqrtPriceX96,
        liquidity: Liquidity,
        tick: Tick,
    ) {
        self.mutable.push(Event::Swap {
            pool: *pool,
            sender: *sender,
            recipient: *recipient,
            deltas,
            sqrt_price: *sqrt_price,
            liquidity,
            tick,
        });
    }

    fn log_flash_event(
        &mut self,
        pool: &AccountId,
        sender: &AccountId,
        recipient: &AccountId,
        amounts: (Amount, Amount),
        paid: (Amount, Amount),
    ) {
        self.mutable.push(Event::Flash {
            pool: *pool,
            sender: *sender,
            recipient: *recipient,
            amounts,
            paid,
        });
    }

    fn log_tick_update_event(
        &mut self,
        pool: &AccountId,
        tick: Tick,
        liquidity_gross: Liquidity,
        liquidity_net: i128,
    ) {
        self.mutable.push(Event::TickUpdate {
            pool: *pool,
            tick,
            liquidity_gross,
            liquidity_net,
        });
    }
}
