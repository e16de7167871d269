#![allow(dead_code)]

use elastic_pool::dex::host::{DirectPayer, Host};
use elastic_pool::dex::{
    liquidity_math, PositionChange, SwapResult, MAX_SQRT_PRICE, MIN_SQRT_PRICE,
};
use elastic_pool::{
    AccountId, Amount, AmountDelta, BasisPoints, Liquidity, PoolId, Result, SqrtPriceX96, Tick,
    TokenId, U256,
};

pub const OWNER: AccountId = AccountId::derived(b'O', 1);
pub const ALICE: AccountId = AccountId::derived(b'U', 1);
pub const BOB: AccountId = AccountId::derived(b'U', 2);
pub const CAROL: AccountId = AccountId::derived(b'U', 3);
pub const TOKEN_A: TokenId = TokenId::derived(b'T', 1);
pub const TOKEN_B: TokenId = TokenId::derived(b'T', 2);

pub const USER_FUNDS: Amount = 1_000_000_000_000_000_000_000;
pub const START_TIME: u32 = 1_700_000_000;

/// Host with one pool of `TOKEN_A`/`TOKEN_B` and funded users
pub struct PoolSetup {
    pub host: Host,
    pub pool_id: PoolId,
    pub pool_address: AccountId,
}

impl PoolSetup {
    pub fn new(fee: BasisPoints) -> Self {
        let mut host = Host::new(OWNER);
        host.now = START_TIME;
        let (pool_id, pool_address) = host.create_pool((TOKEN_B, TOKEN_A), fee).unwrap();
        for user in [ALICE, BOB, CAROL] {
            host.ledger.mint(&TOKEN_A, &user, USER_FUNDS).unwrap();
            host.ledger.mint(&TOKEN_B, &user, USER_FUNDS).unwrap();
        }
        Self {
            host,
            pool_id,
            pool_address,
        }
    }

    pub fn unlocked(fee: BasisPoints, tick: i32) -> Self {
        let mut setup = Self::new(fee);
        setup.unlock(Tick::new(tick).unwrap().sqrt_price()).unwrap();
        setup
    }

    pub fn unlock(&mut self, sqrt_price: SqrtPriceX96) -> Result<()> {
        let (qty0, qty1) = liquidity_math::unlock_qtys(sqrt_price).unwrap();
        let address = self.pool_address;
        self.host.ledger.mint(self.pool_id.token0(), &address, qty0).unwrap();
        self.host.ledger.mint(self.pool_id.token1(), &address, qty1).unwrap();
        let pool_id = self.pool_id;
        self.host
            .call_pool(OWNER, &pool_id, |pool, env| pool.unlock_pool(env, sqrt_price))
    }

    pub fn balances(&self, account: &AccountId) -> (Amount, Amount) {
        use elastic_pool::dex::TokenLedger;
        (
            self.host.ledger.balance_of(self.pool_id.token0(), account),
            self.host.ledger.balance_of(self.pool_id.token1(), account),
        )
    }

    fn hint(&self, tick: Tick) -> Tick {
        self.host
            .pool(&self.pool_id)
            .unwrap()
            .initialized_ticks()
            .take_while(|initialized| *initialized <= tick)
            .last()
            .unwrap_or(Tick::MIN)
    }

    pub fn mint(
        &mut self,
        account: AccountId,
        (lower, upper): (i32, i32),
        liquidity: Liquidity,
    ) -> Result<PositionChange> {
        let ticks = (Tick::new(lower)?, Tick::new(upper)?);
        let hints = [self.hint(ticks.0), self.hint(ticks.1)];
        let pool_id = self.pool_id;
        self.host.call_pool(account, &pool_id, |pool, env| {
            pool.mint(
                env,
                &account,
                ticks,
                hints,
                liquidity,
                &mut DirectPayer::new(account),
                &[],
            )
        })
    }

    pub fn burn(
        &mut self,
        account: AccountId,
        (lower, upper): (i32, i32),
        liquidity: Liquidity,
    ) -> Result<PositionChange> {
        let ticks = (Tick::new(lower)?, Tick::new(upper)?);
        let pool_id = self.pool_id;
        self.host
            .call_pool(account, &pool_id, |pool, env| pool.burn(env, ticks, liquidity))
    }

    pub fn collect(&mut self, account: AccountId, (lower, upper): (i32, i32)) -> Result<U256> {
        let ticks = (Tick::new(lower)?, Tick::new(upper)?);
        let pool_id = self.pool_id;
        self.host.call_pool(account, &pool_id, |pool, env| {
            pool.tweak_position_zero_liquidity(env, ticks)?;
            pool.collect_rtokens(env, ticks)
        })
    }

    pub fn swap(
        &mut self,
        account: AccountId,
        qty: AmountDelta,
        is_token0: bool,
    ) -> Result<SwapResult> {
        let will_up_tick = (qty > 0) != is_token0;
        let limit = if will_up_tick {
            MAX_SQRT_PRICE - U256::one()
        } else {
            MIN_SQRT_PRICE + U256::one()
        };
        let pool_id = self.pool_id;
        self.host.call_pool(account, &pool_id, |pool, env| {
            pool.swap(
                env,
                &account,
                qty,
                is_token0,
                limit,
                &mut DirectPayer::new(account),
                &[],
            )
        })
    }
}
