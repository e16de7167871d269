use crate::dex::{
    host::DirectPayer,
    AccountId, Amount, AmountDelta, Env, FlashCallback, MintCallback, Pool, Result, SwapCallback,
};
use crate::fp::U256;

/// Pays `shortfall` less of every owed quantity
#[derive(Copy, Clone, Debug)]
pub struct Underpayer {
    pub payer: AccountId,
    pub shortfall: Amount,
}

impl Underpayer {
    fn short(&self, qty: Amount) -> Amount {
        qty.saturating_sub(self.shortfall)
    }
}

impl MintCallback for Underpayer {
    fn mint_callback(
        &mut self,
        pool: &mut Pool,
        env: &mut Env<'_>,
        qty0: Amount,
        qty1: Amount,
        data: &[u8],
    ) -> Result<()> {
        DirectPayer::new(self.payer).mint_callback(
            pool,
            env,
            self.short(qty0),
            self.short(qty1),
            data,
        )
    }
}

impl SwapCallback for Underpayer {
    fn swap_callback(
        &mut self,
        pool: &mut Pool,
        env: &mut Env<'_>,
        delta0: AmountDelta,
        delta1: AmountDelta,
        data: &[u8],
    ) -> Result<()> {
        let short = |delta: AmountDelta| {
            if delta > 0 {
                delta.saturating_sub(AmountDelta::try_from(self.shortfall).unwrap_or(AmountDelta::MAX))
            } else {
                delta
            }
        };
        DirectPayer::new(self.payer).swap_callback(pool, env, short(delta0), short(delta1), data)
    }
}

/// Tries to call back into the pool before paying, like a malicious token would
#[derive(Copy, Clone, Debug)]
pub struct Reentrant {
    pub payer: AccountId,
}

impl Reentrant {
    fn reenter(pool: &mut Pool, env: &mut Env<'_>) -> Result<()> {
        pool.burn_rtokens(env, U256::one(), true).map(|_| ())
    }
}

impl MintCallback for Reentrant {
    fn mint_callback(
        &mut self,
        pool: &mut Pool,
        env: &mut Env<'_>,
        qty0: Amount,
        qty1: Amount,
        data: &[u8],
    ) -> Result<()> {
        Self::reenter(pool, env)?;
        DirectPayer::new(self.payer).mint_callback(pool, env, qty0, qty1, data)
    }
}

impl SwapCallback for Reentrant {
    fn swap_callback(
        &mut self,
        pool: &mut Pool,
        env: &mut Env<'_>,
        delta0: AmountDelta,
        delta1: AmountDelta,
        data: &[u8],
    ) -> Result<()> {
        Self::reenter(pool, env)?;
        DirectPayer::new(self.payer).swap_callback(pool, env, delta0, delta1, data)
    }
}

impl FlashCallback for Reentrant {
    fn flash_callback(
        &mut self,
        pool: &mut Pool,
        env: &mut Env<'_>,
        _fee0: Amount,
        _fee1: Amount,
        _data: &[u8],
    ) -> Result<()> {
        Self::reenter(pool, env)
    }
}
