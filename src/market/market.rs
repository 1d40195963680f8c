use super::ledger::TokenLedger;
use crate::error::{ArbitrageError, ArbitrageResult};
use crate::logic::amm_math::{checked_div, checked_mul, checked_sub};
use crate::logic::direction::Slot;
use crate::logic::pools::{ConstantProductPair, Pool};
use ahash::AHashMap;
use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Contract that receives the optimistic payout of a flash swap and settles inside the callback.
pub trait FlashSwapCallee {
    type Outcome;

    /// Where the pool sends the borrowed tokens and whom it calls back.
    fn get_address(&self) -> Address;

    /// Called by the pool after paying out `amount0`/`amount1` and before checking its invariant.
    /// `caller` is the pool itself, `initiator` whoever called `flash_swap`.
    fn on_flash_swap(
        &self,
        market: &mut Market,
        caller: Address,
        initiator: Address,
        amount0: U256,
        amount1: U256,
        data: &Bytes,
    ) -> ArbitrageResult<Self::Outcome>;
}

/// Amounts that moved through a pool in one swap, and its reserves afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub pool: Address,
    pub amount0_in: U256,
    pub amount1_in: U256,
    pub amount0_out: U256,
    pub amount1_out: U256,
    pub reserve0: U256,
    pub reserve1: U256,
}

#[derive(Clone, Debug)]
pub struct FlashSwapReceipt<O> {
    pub swap: SwapReceipt,
    /// `None` when the swap carried no callback data.
    pub callback: Option<O>,
}

/// All pools and token balances of the simulated chain.
///
/// Every public mutation is all-or-nothing: it runs against a scratch copy and only
/// replaces `self` on success, the same way a reverted call leaves no trace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Market {
    ledger: TokenLedger,
    pairs: AHashMap<Address, ConstantProductPair>,
}

impl Market {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new pair to the market. If a pair with this address already exists nothing will happen.
    pub fn add_pair(&mut self, pair: ConstantProductPair) {
        self.pairs.entry(pair.get_address()).or_insert(pair);
    }

    pub fn pair(&self, pool: Address) -> ArbitrageResult<&ConstantProductPair> {
        self.pairs.get(&pool).ok_or(ArbitrageError::UnknownPool(pool))
    }

    fn pair_mut(&mut self, pool: Address) -> ArbitrageResult<&mut ConstantProductPair> {
        self.pairs.get_mut(&pool).ok_or(ArbitrageError::UnknownPool(pool))
    }

    pub fn pairs_len(&self) -> usize {
        self.pairs.len()
    }

    pub fn balance_of(&self, asset: Address, holder: Address) -> U256 {
        self.ledger.balance_of(asset, holder)
    }

    pub fn mint(&mut self, asset: Address, holder: Address, amount: U256) -> ArbitrageResult<()> {
        self.ledger.mint(asset, holder, amount)
    }

    pub fn transfer(&mut self, asset: Address, from: Address, to: Address, amount: U256) -> ArbitrageResult<()> {
        self.ledger.transfer(asset, from, to, amount)
    }

    /// Run `f` against a scratch copy and keep its effects only if it succeeds.
    pub fn atomically<T>(&mut self, f: impl FnOnce(&mut Market) -> ArbitrageResult<T>) -> ArbitrageResult<T> {
        let mut scratch = self.clone();
        let value = f(&mut scratch)?;
        *self = scratch;
        Ok(value)
    }

    /// Deposit both assets into `pool` and sync its reserves to its balances.
    pub fn provide_liquidity(&mut self, pool: Address, amount0: U256, amount1: U256) -> ArbitrageResult<(U256, U256)> {
        self.atomically(|market| {
            let (token0, token1) = {
                let pair = market.pair(pool)?;
                (pair.token0, pair.token1)
            };
            market.ledger.mint(token0, pool, amount0)?;
            market.ledger.mint(token1, pool, amount1)?;
            market.sync(pool)
        })
    }

    /// Force the reserves of `pool` to match its token balances.
    pub fn sync(&mut self, pool: Address) -> ArbitrageResult<(U256, U256)> {
        let (token0, token1) = {
            let pair = self.pair(pool)?;
            (pair.token0, pair.token1)
        };
        let balance0 = self.ledger.balance_of(token0, pool);
        let balance1 = self.ledger.balance_of(token1, pool);
        self.pair_mut(pool)?.update_reserves(balance0, balance1);
        Ok((balance0, balance1))
    }

    /// Units of the other asset per unit of `base_asset`, floored.
    pub fn spot_price(&self, pool: Address, base_asset: Address) -> ArbitrageResult<U256> {
        let pair = self.pair(pool)?;
        let base = Slot::resolve(pair, base_asset)?;
        let reserves = pair.get_reserves();
        checked_div(base.other().pick(reserves), base.pick(reserves))
    }

    /// Plain swap: the input must already sit in the pool's balance.
    pub fn swap(&mut self, pool: Address, amount0_out: U256, amount1_out: U256, to: Address) -> ArbitrageResult<SwapReceipt> {
        self.atomically(|market| {
            let before = market.pay_out(pool, amount0_out, amount1_out, to)?;
            market.settle(&before, amount0_out, amount1_out)
        })
    }

    /// Flash swap: pay `callee` first, call it back when `data` is non-empty, then require
    /// the pool's invariant to hold on whatever balance the callback left behind.
    pub fn flash_swap<C: FlashSwapCallee>(
        &mut self,
        pool: Address,
        initiator: Address,
        amount0_out: U256,
        amount1_out: U256,
        data: &Bytes,
        callee: &C,
    ) -> ArbitrageResult<FlashSwapReceipt<C::Outcome>> {
        self.atomically(|market| {
            let recipient = callee.get_address();
            let before = market.pay_out(pool, amount0_out, amount1_out, recipient)?;

            let callback = if data.is_empty() {
                None
            } else {
                market.pair_mut(pool)?.set_locked(true);
                let outcome = callee.on_flash_swap(market, pool, initiator, amount0_out, amount1_out, data)?;
                market.pair_mut(pool)?.set_locked(false);
                Some(outcome)
            };

            let swap = market.settle(&before, amount0_out, amount1_out)?;
            Ok(FlashSwapReceipt { swap, callback })
        })
    }

    /// Validate a swap request and send the requested amounts out. Returns the pair as it was before.
    fn pay_out(&mut self, pool: Address, amount0_out: U256, amount1_out: U256, to: Address) -> ArbitrageResult<ConstantProductPair> {
        let pair = self.pair(pool)?.clone();
        if pair.is_locked() {
            return Err(ArbitrageError::PoolLocked(pool));
        }
        if amount0_out.is_zero() && amount1_out.is_zero() {
            return Err(ArbitrageError::InsufficientOutputAmount(pool));
        }
        let (reserve0, reserve1) = pair.get_reserves();
        if amount0_out >= reserve0 {
            return Err(ArbitrageError::InsufficientLiquidity { requested: amount0_out, reserve: reserve0 });
        }
        if amount1_out >= reserve1 {
            return Err(ArbitrageError::InsufficientLiquidity { requested: amount1_out, reserve: reserve1 });
        }
        if to == pair.token0 || to == pair.token1 {
            return Err(ArbitrageError::InvalidRecipient { pool, recipient: to });
        }

        self.ledger.transfer(pair.token0, pool, to, amount0_out)?;
        self.ledger.transfer(pair.token1, pool, to, amount1_out)?;
        Ok(pair)
    }

    /// Derive the amounts paid in from the balances, check the fee-adjusted product and update reserves.
    fn settle(&mut self, before: &ConstantProductPair, amount0_out: U256, amount1_out: U256) -> ArbitrageResult<SwapReceipt> {
        let pool = before.get_address();
        let (reserve0, reserve1) = before.get_reserves();
        let balance0 = self.ledger.balance_of(before.token0, pool);
        let balance1 = self.ledger.balance_of(before.token1, pool);

        let amount0_in = amount_in(balance0, reserve0, amount0_out);
        let amount1_in = amount_in(balance1, reserve1, amount1_out);
        if amount0_in.is_zero() && amount1_in.is_zero() {
            return Err(ArbitrageError::InsufficientInputAmount(pool));
        }

        let fee = before.get_fee();
        let balance0_adjusted = checked_sub(checked_mul(balance0, fee.denominator())?, checked_mul(amount0_in, fee.fee_share())?)?;
        let balance1_adjusted = checked_sub(checked_mul(balance1, fee.denominator())?, checked_mul(amount1_in, fee.fee_share())?)?;
        let k_after = checked_mul(balance0_adjusted, balance1_adjusted)?;
        let k_before = checked_mul(checked_mul(reserve0, reserve1)?, checked_mul(fee.denominator(), fee.denominator())?)?;
        if k_after < k_before {
            return Err(ArbitrageError::InvariantViolation(pool));
        }

        self.pair_mut(pool)?.update_reserves(balance0, balance1);
        debug!(%pool, %amount0_in, %amount1_in, %amount0_out, %amount1_out, "swap settled");

        Ok(SwapReceipt { pool, amount0_in, amount1_in, amount0_out, amount1_out, reserve0: balance0, reserve1: balance1 })
    }
}

/// `balance - (reserve - amount_out)` when the balance grew past what the payout left, else zero.
fn amount_in(balance: U256, reserve: U256, amount_out: U256) -> U256 {
    let floor = reserve.saturating_sub(amount_out);
    balance.saturating_sub(floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::amm_math::{FeeRate, quote_output};

    const POOL: Address = Address::new([0x11; 20]);
    const TOKEN0: Address = Address::new([0x0A; 20]);
    const TOKEN1: Address = Address::new([0x0B; 20]);
    const TRADER: Address = Address::new([0x01; 20]);

    fn market_with_pool(reserve0: u64, reserve1: u64) -> ArbitrageResult<Market> {
        let mut market = Market::new();
        market.add_pair(ConstantProductPair::new(POOL, TOKEN0, TOKEN1, FeeRate::UNISWAP_V2));
        market.provide_liquidity(POOL, U256::from(reserve0), U256::from(reserve1))?;
        Ok(market)
    }

    struct Repayer {
        address: Address,
        repay: U256,
    }

    impl FlashSwapCallee for Repayer {
        type Outcome = U256;

        fn get_address(&self) -> Address {
            self.address
        }

        fn on_flash_swap(&self, market: &mut Market, caller: Address, _: Address, _: U256, _: U256, _: &Bytes) -> ArbitrageResult<U256> {
            market.transfer(TOKEN1, self.address, caller, self.repay)?;
            Ok(self.repay)
        }
    }

    struct Reentrant;

    impl FlashSwapCallee for Reentrant {
        type Outcome = ();

        fn get_address(&self) -> Address {
            TRADER
        }

        fn on_flash_swap(&self, market: &mut Market, caller: Address, _: Address, _: U256, _: U256, _: &Bytes) -> ArbitrageResult<()> {
            market.swap(caller, U256::from(1), U256::ZERO, TRADER).map(|_| ())
        }
    }

    #[test]
    fn test_provide_liquidity_syncs_reserves() -> ArbitrageResult<()> {
        let market = market_with_pool(1000, 2000)?;
        assert_eq!(market.pair(POOL)?.get_reserves(), (U256::from(1000), U256::from(2000)));
        assert_eq!(market.spot_price(POOL, TOKEN0)?, U256::from(2));
        assert_eq!(market.spot_price(POOL, TOKEN1)?, U256::ZERO);
        Ok(())
    }

    #[test]
    fn test_add_pair_twice_keeps_first() -> ArbitrageResult<()> {
        let mut market = market_with_pool(1000, 2000)?;
        market.add_pair(ConstantProductPair::new(POOL, TOKEN1, TOKEN0, FeeRate::UNISWAP_V2));
        assert_eq!(market.pairs_len(), 1);
        assert_eq!(market.pair(POOL)?.token0, TOKEN0);
        Ok(())
    }

    #[test]
    fn test_swap_with_exact_quote() -> ArbitrageResult<()> {
        let mut market = market_with_pool(1_000_000, 1_000_000)?;
        let amount_in = U256::from(10_000);
        let amount_out = quote_output(U256::from(1_000_000), U256::from(1_000_000), amount_in, FeeRate::UNISWAP_V2)?;

        market.mint(TOKEN0, TRADER, amount_in)?;
        market.transfer(TOKEN0, TRADER, POOL, amount_in)?;
        let receipt = market.swap(POOL, U256::ZERO, amount_out, TRADER)?;

        assert_eq!(receipt.amount0_in, amount_in);
        assert_eq!(receipt.amount1_out, amount_out);
        assert_eq!(market.balance_of(TOKEN1, TRADER), amount_out);
        assert_eq!(market.pair(POOL)?.get_reserves(), (U256::from(1_010_000), U256::from(1_000_000) - amount_out));
        Ok(())
    }

    #[test]
    fn test_swap_one_more_than_quote_reverts() -> ArbitrageResult<()> {
        let mut market = market_with_pool(1_000_000, 1_000_000)?;
        let amount_in = U256::from(10_000);
        let amount_out = quote_output(U256::from(1_000_000), U256::from(1_000_000), amount_in, FeeRate::UNISWAP_V2)?;

        market.mint(TOKEN0, TRADER, amount_in)?;
        market.transfer(TOKEN0, TRADER, POOL, amount_in)?;
        let before = market.clone();

        let result = market.swap(POOL, U256::ZERO, amount_out + U256::from(1), TRADER);
        assert_eq!(result, Err(ArbitrageError::InvariantViolation(POOL)));
        assert_eq!(market, before);
        Ok(())
    }

    #[test]
    fn test_swap_request_validation() -> ArbitrageResult<()> {
        let mut market = market_with_pool(1000, 1000)?;
        assert_eq!(market.swap(POOL, U256::ZERO, U256::ZERO, TRADER), Err(ArbitrageError::InsufficientOutputAmount(POOL)));
        assert_eq!(
            market.swap(POOL, U256::from(1000), U256::ZERO, TRADER),
            Err(ArbitrageError::InsufficientLiquidity { requested: U256::from(1000), reserve: U256::from(1000) })
        );
        assert_eq!(market.swap(POOL, U256::from(1), U256::ZERO, TOKEN1), Err(ArbitrageError::InvalidRecipient { pool: POOL, recipient: TOKEN1 }));
        assert_eq!(market.swap(POOL, U256::from(1), U256::ZERO, TRADER), Err(ArbitrageError::InsufficientInputAmount(POOL)));
        assert_eq!(market.swap(TRADER, U256::from(1), U256::ZERO, TOKEN0), Err(ArbitrageError::UnknownPool(TRADER)));
        Ok(())
    }

    #[test]
    fn test_flash_swap_repaid_in_callback() -> ArbitrageResult<()> {
        let mut market = market_with_pool(1000, 1000)?;
        // 100 out of token0 needs 112 of token1 back at 0.3%
        market.mint(TOKEN1, TRADER, U256::from(112))?;
        let callee = Repayer { address: TRADER, repay: U256::from(112) };

        let receipt = market.flash_swap(POOL, TRADER, U256::from(100), U256::ZERO, &Bytes::from_static(b"1"), &callee)?;

        assert_eq!(receipt.callback, Some(U256::from(112)));
        assert_eq!(receipt.swap.amount1_in, U256::from(112));
        assert_eq!(market.pair(POOL)?.get_reserves(), (U256::from(900), U256::from(1112)));
        assert!(!market.pair(POOL)?.is_locked());
        Ok(())
    }

    #[test]
    fn test_flash_swap_short_repayment_reverts_everything() -> ArbitrageResult<()> {
        let mut market = market_with_pool(1000, 1000)?;
        market.mint(TOKEN1, TRADER, U256::from(111))?;
        let before = market.clone();
        let callee = Repayer { address: TRADER, repay: U256::from(111) };

        let result = market.flash_swap(POOL, TRADER, U256::from(100), U256::ZERO, &Bytes::from_static(b"1"), &callee);

        assert_eq!(result.err(), Some(ArbitrageError::InvariantViolation(POOL)));
        assert_eq!(market, before);
        Ok(())
    }

    #[test]
    fn test_flash_swap_without_data_skips_callback() -> ArbitrageResult<()> {
        let mut market = market_with_pool(1000, 1000)?;
        let callee = Repayer { address: TRADER, repay: U256::from(112) };

        let result = market.flash_swap(POOL, TRADER, U256::from(100), U256::ZERO, &Bytes::new(), &callee);
        assert_eq!(result.err(), Some(ArbitrageError::InsufficientInputAmount(POOL)));
        Ok(())
    }

    #[test]
    fn test_flash_swap_rejects_reentry() -> ArbitrageResult<()> {
        let mut market = market_with_pool(1000, 1000)?;
        let result = market.flash_swap(POOL, TRADER, U256::from(100), U256::ZERO, &Bytes::from_static(b"1"), &Reentrant);
        assert_eq!(result.err(), Some(ArbitrageError::PoolLocked(POOL)));
        assert!(!market.pair(POOL)?.is_locked());
        Ok(())
    }
}
