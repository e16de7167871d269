use super::{new_account_id, new_token_id};
use crate::dex::{
    host::{DirectPayer, Event, Host},
    liquidity_math, AccountId, Amount, AmountDelta, BasisPoints, Env, Liquidity, Pool, PoolId,
    PositionChange, Result, SqrtPriceX96, SwapResult, Tick, TokenId, TokenLedger, MAX_SQRT_PRICE,
    MIN_SQRT_PRICE,
};
use crate::fp::U256;

/// Balance given to accounts created by [`Sandbox::new_funded_account`]
pub const DEFAULT_FUNDS: Amount = 1_000_000_000_000_000_000_000_000;

/// Host with a single pool of two fresh tokens
///
/// Example of typical usage:
/// ```ignore
/// let mut sandbox = Sandbox::new(30);
/// sandbox.unlock_at_tick(0).unwrap();
/// let lp = sandbox.new_funded_account();
/// sandbox.mint(&lp, (-600, 600), 1_000_000).unwrap();
/// let trader = sandbox.new_funded_account();
/// sandbox.swap(&trader, 1_000, true, None).unwrap();
/// ```
pub struct Sandbox {
    pub host: Host,
    pub owner: AccountId,
    pub pool_id: PoolId,
    pub pool_address: AccountId,
}

impl Sandbox {
    /// Uninitialized pool in `fee` tier
    pub fn new(fee: BasisPoints) -> Self {
        let owner = new_account_id();
        let mut host = Host::new(owner);
        // big enough to start far from zero, so time going backwards is never needed
        host.now = 1_000_000;
        let (pool_id, pool_address) = host
            .create_pool((new_token_id(), new_token_id()), fee)
            .expect("fee tier is enabled");
        Self {
            host,
            owner,
            pool_id,
            pool_address,
        }
    }

    pub fn token0(&self) -> TokenId {
        *self.pool_id.token0()
    }

    pub fn token1(&self) -> TokenId {
        *self.pool_id.token1()
    }

    pub fn pool(&self) -> &Pool {
        self.host
            .pool(&self.pool_id)
            .expect("sandbox pool always exists")
    }

    pub fn tick_distance(&self) -> i32 {
        self.pool().config().tick_distance
    }

    pub fn fund(&mut self, account: &AccountId, qty0: Amount, qty1: Amount) {
        let (token0, token1) = (self.token0(), self.token1());
        self.host.ledger.mint(&token0, account, qty0).unwrap();
        self.host.ledger.mint(&token1, account, qty1).unwrap();
    }

    pub fn new_funded_account(&mut self) -> AccountId {
        let account = new_account_id();
        self.fund(&account, DEFAULT_FUNDS, DEFAULT_FUNDS);
        account
    }

    /// `(token0, token1)` balances of `account`
    pub fn balances(&self, account: &AccountId) -> (Amount, Amount) {
        (
            self.host.ledger.balance_of(&self.token0(), account),
            self.host.ledger.balance_of(&self.token1(), account),
        )
    }

    pub fn reserves(&self) -> (Amount, Amount) {
        self.balances(&self.pool_address)
    }

    /// Runs pool operation atomically as `caller`
    pub fn call<R>(
        &mut self,
        caller: &AccountId,
        f: impl FnOnce(&mut Pool, &mut Env<'_>) -> Result<R>,
    ) -> Result<R> {
        let pool_id = self.pool_id;
        self.host.call_pool(*caller, &pool_id, f)
    }

    /// Funds the pool with the quantities unlock requires, then unlocks it
    pub fn unlock(&mut self, sqrt_price: SqrtPriceX96) -> Result<()> {
        let (qty0, qty1) = liquidity_math::unlock_qtys(sqrt_price)?;
        let pool_address = self.pool_address;
        self.fund(&pool_address, qty0, qty1);
        let owner = self.owner;
        self.call(&owner, |pool, env| pool.unlock_pool(env, sqrt_price))
    }

    pub fn unlock_at_tick(&mut self, tick: i32) -> Result<()> {
        self.unlock(Tick::new(tick)?.sqrt_price())
    }

    /// Greatest initialized tick not above `tick`
    pub fn hint(&self, tick: Tick) -> Tick {
        self.pool()
            .initialized_ticks()
            .take_while(|initialized| *initialized <= tick)
            .last()
            .unwrap_or(Tick::MIN)
    }

    /// Mints liquidity to `account`'s position, paid by the same account
    pub fn mint(
        &mut self,
        account: &AccountId,
        (lower, upper): (i32, i32),
        qty: Liquidity,
    ) -> Result<PositionChange> {
        let ticks = (Tick::new(lower)?, Tick::new(upper)?);
        let hints = [self.hint(ticks.0), self.hint(ticks.1)];
        let recipient = *account;
        self.call(account, |pool, env| {
            pool.mint(
                env,
                &recipient,
                ticks,
                hints,
                qty,
                &mut DirectPayer::new(recipient),
                &[],
            )
        })
    }

    pub fn burn(
        &mut self,
        account: &AccountId,
        (lower, upper): (i32, i32),
        qty: Liquidity,
    ) -> Result<PositionChange> {
        let ticks = (Tick::new(lower)?, Tick::new(upper)?);
        self.call(account, |pool, env| pool.burn(env, ticks, qty))
    }

    /// Swaps as `account`, who also receives the output.
    ///
    /// Without `limit` the price may move all the way to the bound.
    pub fn swap(
        &mut self,
        account: &AccountId,
        swap_qty: AmountDelta,
        is_token0: bool,
        limit: Option<SqrtPriceX96>,
    ) -> Result<SwapResult> {
        let will_up_tick = (swap_qty > 0) != is_token0;
        let limit = limit.unwrap_or(if will_up_tick {
            MAX_SQRT_PRICE - U256::one()
        } else {
            MIN_SQRT_PRICE + U256::one()
        });
        let recipient = *account;
        self.call(account, |pool, env| {
            pool.swap(
                env,
                &recipient,
                swap_qty,
                is_token0,
                limit,
                &mut DirectPayer::new(recipient),
                &[],
            )
        })
    }

    /// Settles fees of `account`'s position and collects them
    pub fn poke_and_collect(&mut self, account: &AccountId, (lower, upper): (i32, i32)) -> Result<U256> {
        let ticks = (Tick::new(lower)?, Tick::new(upper)?);
        self.call(account, |pool, env| {
            pool.tweak_position_zero_liquidity(env, ticks)?;
            pool.collect_rtokens(env, ticks)
        })
    }

    pub fn logs(&self) -> &[Event] {
        self.host.logger.logs()
    }

    pub fn latest_logs(&self) -> &[Event] {
        self.host.logger.latest_logs()
    }
}
