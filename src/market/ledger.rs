use crate::error::{ArbitrageError, ArbitrageResult};
use ahash::AHashMap;
use alloy_primitives::{Address, U256};
use tracing::trace;

/// Token balances keyed by `(asset, holder)`. Zero balances are never stored, so two ledgers
/// compare equal exactly when every balance matches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenLedger {
    balances: AHashMap<(Address, Address), U256>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, asset: Address, holder: Address) -> U256 {
        self.balances.get(&(asset, holder)).copied().unwrap_or_default()
    }

    /// Create `amount` of `asset` out of thin air for `holder`. Fixture setup only.
    pub fn mint(&mut self, asset: Address, holder: Address, amount: U256) -> ArbitrageResult<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let balance = self.balances.entry((asset, holder)).or_default();
        *balance = balance.checked_add(amount).ok_or(ArbitrageError::ArithmeticFault("mint"))?;
        Ok(())
    }

    pub fn transfer(&mut self, asset: Address, from: Address, to: Address, amount: U256) -> ArbitrageResult<()> {
        if amount.is_zero() {
            return Ok(());
        }

        let available = self.balance_of(asset, from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(ArbitrageError::InsufficientBalance { asset, holder: from, available, required: amount })?;
        if from == to {
            return Ok(());
        }
        let credited = self.balance_of(asset, to).checked_add(amount).ok_or(ArbitrageError::ArithmeticFault("transfer"))?;

        if remaining.is_zero() {
            self.balances.remove(&(asset, from));
        } else {
            self.balances.insert((asset, from), remaining);
        }
        self.balances.insert((asset, to), credited);
        trace!(%asset, %from, %to, %amount, "transfer");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSET: Address = Address::new([0x0A; 20]);
    const ALICE: Address = Address::new([0x01; 20]);
    const BOB: Address = Address::new([0x02; 20]);

    #[test]
    fn test_mint_and_transfer() -> ArbitrageResult<()> {
        let mut ledger = TokenLedger::new();
        ledger.mint(ASSET, ALICE, U256::from(100))?;
        ledger.transfer(ASSET, ALICE, BOB, U256::from(30))?;

        assert_eq!(ledger.balance_of(ASSET, ALICE), U256::from(70));
        assert_eq!(ledger.balance_of(ASSET, BOB), U256::from(30));
        Ok(())
    }

    #[test]
    fn test_transfer_more_than_balance() -> ArbitrageResult<()> {
        let mut ledger = TokenLedger::new();
        ledger.mint(ASSET, ALICE, U256::from(10))?;

        let result = ledger.transfer(ASSET, ALICE, BOB, U256::from(11));
        assert_eq!(
            result,
            Err(ArbitrageError::InsufficientBalance { asset: ASSET, holder: ALICE, available: U256::from(10), required: U256::from(11) })
        );
        assert_eq!(ledger.balance_of(ASSET, ALICE), U256::from(10));
        assert_eq!(ledger.balance_of(ASSET, BOB), U256::ZERO);
        Ok(())
    }

    #[test]
    fn test_self_transfer_keeps_balance() -> ArbitrageResult<()> {
        let mut ledger = TokenLedger::new();
        ledger.mint(ASSET, ALICE, U256::from(10))?;
        ledger.transfer(ASSET, ALICE, ALICE, U256::from(4))?;
        assert_eq!(ledger.balance_of(ASSET, ALICE), U256::from(10));
        Ok(())
    }

    #[test]
    fn test_drained_balance_compares_equal() -> ArbitrageResult<()> {
        let mut ledger = TokenLedger::new();
        ledger.mint(ASSET, ALICE, U256::from(10))?;
        let before = ledger.clone();

        ledger.transfer(ASSET, ALICE, BOB, U256::from(10))?;
        ledger.transfer(ASSET, BOB, ALICE, U256::from(10))?;
        ledger.mint(ASSET, BOB, U256::ZERO)?;

        assert_eq!(ledger, before);
        Ok(())
    }

    #[test]
    fn test_mint_overflow() -> ArbitrageResult<()> {
        let mut ledger = TokenLedger::new();
        ledger.mint(ASSET, ALICE, U256::MAX)?;
        assert_eq!(ledger.mint(ASSET, ALICE, U256::from(1)), Err(ArbitrageError::ArithmeticFault("mint")));
        Ok(())
    }
}
