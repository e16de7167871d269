use crate::dex::{
    AccountId, Amount, AmountDelta, Env, FlashCallback, MintCallback, Pool, Result, SwapCallback,
    TokenId,
};

fn pay_pool(env: &mut Env<'_>, pool: &Pool, token: &TokenId, from: &AccountId, qty: Amount) -> Result<()> {
    if qty > 0 {
        env.ledger.transfer(token, from, pool.address(), qty)?;
    }
    Ok(())
}

/// Pays exactly what a pool asks for from `payer`'s balance
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DirectPayer {
    pub payer: AccountId,
}

impl DirectPayer {
    pub fn new(payer: AccountId) -> Self {
        Self { payer }
    }
}

impl MintCallback for DirectPayer {
    fn mint_callback(
        &mut self,
        pool: &mut Pool,
        env: &mut Env<'_>,
        qty0: Amount,
        qty1: Amount,
        _data: &[u8],
    ) -> Result<()> {
        let id = pool.config().id;
        pay_pool(env, pool, id.token0(), &self.payer, qty0)?;
        pay_pool(env, pool, id.token1(), &self.payer, qty1)
    }
}

impl SwapCallback for DirectPayer {
    fn swap_callback(
        &mut self,
        pool: &mut Pool,
        env: &mut Env<'_>,
        delta0: AmountDelta,
        delta1: AmountDelta,
        _data: &[u8],
    ) -> Result<()> {
        let id = pool.config().id;
        // negative deltas were already paid out
        let owed = |delta: AmountDelta| Amount::try_from(delta).unwrap_or_default();
        pay_pool(env, pool, id.token0(), &self.payer, owed(delta0))?;
        pay_pool(env, pool, id.token1(), &self.payer, owed(delta1))
    }
}

/// Returns a flash loan together with its fee, plus an optional `tip` on top
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlashRepayer {
    pub payer: AccountId,
    pub loan: (Amount, Amount),
    pub tip: (Amount, Amount),
}

impl FlashCallback for FlashRepayer {
    fn flash_callback(
        &mut self,
        pool: &mut Pool,
        env: &mut Env<'_>,
        fee0: Amount,
        fee1: Amount,
        _data: &[u8],
    ) -> Result<()> {
        let id = pool.config().id;
        let qty0 = self.loan.0.saturating_add(fee0).saturating_add(self.tip.0);
        let qty1 = self.loan.1.saturating_add(fee1).saturating_add(self.tip.1);
        pay_pool(env, pool, id.token0(), &self.payer, qty0)?;
        pay_pool(env, pool, id.token1(), &self.payer, qty1)
    }
}
