//! Fee reinvestment accounting.
//!
//! Swap fees grow the pool's reinvestment liquidity. On settlement the growth since the
//! last settled value is converted into newly minted claim tokens, so that existing claim
//! token holders keep their share and in-range liquidity providers receive the rest.
use std::collections::BTreeMap;

use super::{AccountId, BasisPoints, ErrorKind, FeeGrowth, Liquidity, BASIS_POINT_DIVISOR};
use crate::fp::{mul_div_floor, to_u128, U256, TWO_POW_96};

/// Claim tokens to mint for reinvestment liquidity growth `reinvest_l - reinvest_l_last`.
///
/// Only the part contributed by base liquidity is minted, so the claim token value
/// compounds for existing holders.
pub fn calc_rmint_qty(
    reinvest_l: Liquidity,
    reinvest_l_last: Liquidity,
    base_l: Liquidity,
    total_supply: U256,
) -> Result<U256, ErrorKind> {
    let growth = reinvest_l
        .checked_sub(reinvest_l_last)
        .ok_or(ErrorKind::InternalLogicError)?;
    if growth == 0 || base_l == 0 {
        return Ok(U256::zero());
    }
    let denominator = U256::from(base_l) + U256::from(reinvest_l);
    let lp_contribution = mul_div_floor(U256::from(base_l), U256::from(growth), denominator)?;
    Ok(mul_div_floor(
        total_supply,
        lp_contribution,
        U256::from(reinvest_l_last),
    )?)
}

/// Splits minted claim tokens into `(government_fee, lp_fee)`
pub fn split_government_fee(rmint_qty: U256, government_fee: BasisPoints) -> (U256, U256) {
    // government_fee < BASIS_POINT_DIVISOR, so the product cannot overflow for sane supplies
    let government = rmint_qty.saturating_mul(U256::from(government_fee))
        / U256::from(BASIS_POINT_DIVISOR);
    (government, rmint_qty - government)
}

/// Fee growth per unit of base liquidity produced by `lp_fee` claim tokens
pub fn fee_growth_increment(lp_fee: U256, base_l: Liquidity) -> Result<FeeGrowth, ErrorKind> {
    Ok(mul_div_floor(lp_fee, TWO_POW_96, U256::from(base_l))?)
}

/// Fungible claim on the pool's reinvestment liquidity
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimToken {
    total_supply: U256,
    balances: BTreeMap<AccountId, U256>,
}

impl ClaimToken {
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn balance_of(&self, account: &AccountId) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn mint(&mut self, to: &AccountId, qty: U256) -> Result<(), ErrorKind> {
        if qty.is_zero() {
            return Ok(());
        }
        self.total_supply = self
            .total_supply
            .checked_add(qty)
            .ok_or(ErrorKind::Overflow)?;
        let balance = self.balances.entry(*to).or_default();
        // bounded by total supply
        *balance += qty;
        Ok(())
    }

    pub fn burn(&mut self, from: &AccountId, qty: U256) -> Result<(), ErrorKind> {
        self.debit(from, qty)?;
        self.total_supply -= qty;
        Ok(())
    }

    pub fn transfer(&mut self, from: &AccountId, to: &AccountId, qty: U256) -> Result<(), ErrorKind> {
        if qty.is_zero() {
            return Ok(());
        }
        self.debit(from, qty)?;
        *self.balances.entry(*to).or_default() += qty;
        Ok(())
    }

    fn debit(&mut self, from: &AccountId, qty: U256) -> Result<(), ErrorKind> {
        if qty.is_zero() {
            return Ok(());
        }
        let balance = self
            .balances
            .get_mut(from)
            .ok_or(ErrorKind::InsufficientClaimBalance)?;
        *balance = balance
            .checked_sub(qty)
            .ok_or(ErrorKind::InsufficientClaimBalance)?;
        if balance.is_zero() {
            self.balances.remove(from);
        }
        Ok(())
    }
}

/// Share of `reinvest_l` released by burning `qty` out of `total_supply` claim tokens
pub fn liquidity_of_claim(
    qty: U256,
    reinvest_l: Liquidity,
    total_supply: U256,
) -> Result<Liquidity, ErrorKind> {
    let liquidity = mul_div_floor(qty, U256::from(reinvest_l), total_supply)?;
    Ok(to_u128(liquidity)?)
}
