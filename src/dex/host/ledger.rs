use std::collections::BTreeMap;

use crate::dex::{AccountId, Amount, ErrorKind, TokenId, TokenLedger};

/// Balances of every token, kept in memory
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryLedger {
    balances: BTreeMap<(TokenId, AccountId), Amount>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `amount` of `token` out of thin air, for setting up accounts
    pub fn mint(&mut self, token: &TokenId, to: &AccountId, amount: Amount) -> Result<(), ErrorKind> {
        let balance = self.balances.entry((*token, *to)).or_default();
        *balance = balance.checked_add(amount).ok_or(ErrorKind::Overflow)?;
        Ok(())
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, token: &TokenId, account: &AccountId) -> Amount {
        self.balances
            .get(&(*token, *account))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(
        &mut self,
        token: &TokenId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), ErrorKind> {
        let from_balance = self
            .balance_of(token, from)
            .checked_sub(amount)
            .ok_or(ErrorKind::InsufficientBalance)?;
        if amount == 0 || from == to {
            return Ok(());
        }
        let to_balance = self.balance_of(token, to);
        let to_balance = to_balance.checked_add(amount).ok_or(ErrorKind::Overflow)?;
        if from_balance == 0 {
            self.balances.remove(&(*token, *from));
        } else {
            self.balances.insert((*token, *from), from_balance);
        }
        self.balances.insert((*token, *to), to_balance);
        Ok(())
    }
}
