use super::amm_math::{FeeRate, checked_add, quote_output, required_input};
use super::direction::{PairDirections, Slot};
use super::plan::ArbitragePlan;
use super::pools::Pool;
use super::types::ReservesSnapshot;
use crate::error::{ArbitrageError, ArbitrageResult};
use alloy_primitives::{Address, U256};
use tracing::debug;

/// Dry-run quoting for flash arbitrage between a lending and a secondary pool.
///
/// Nothing here touches state. A caller uses it to decide whether, and how much, to
/// borrow before handing a fresh attempt to the executor.
#[derive(Debug, Clone)]
pub struct ProfitCalculator {
    lending_fee: FeeRate,
    secondary_fee: FeeRate,
    precision: U256,
}

/// Oriented reserves of both pools, resolved once per search.
struct SearchContext {
    lending_borrowed: U256,
    lending_repayment: U256,
    secondary_in: U256,
    secondary_out: U256,
}

impl ProfitCalculator {
    const MAX_ITERATIONS: usize = 256;

    pub fn new(lending_fee: FeeRate, secondary_fee: FeeRate) -> Self {
        Self { lending_fee, secondary_fee, precision: U256::from(2) }
    }

    /// Stop the search once the bracket is this narrow.
    pub fn with_precision(mut self, precision: U256) -> Self {
        self.precision = precision.max(U256::from(2));
        self
    }

    /// The plan an executor would carry out for this borrow, or the error it would abort with.
    pub fn quote(
        &self,
        lending: &ReservesSnapshot,
        secondary: &ReservesSnapshot,
        borrowed_asset: Address,
        borrowed_amount: U256,
    ) -> ArbitrageResult<ArbitragePlan> {
        ArbitragePlan::compute(lending, self.lending_fee, secondary, self.secondary_fee, borrowed_asset, borrowed_amount)
    }

    /// Find the borrow amount that maximises the surplus.
    ///
    /// Surplus is concave in the borrowed amount, so a ternary search over `[1, reserve - 1]`
    /// converges on the peak. Returns `None` when no amount in range is profitable.
    pub fn find_optimal_borrow(
        &self,
        lending: &ReservesSnapshot,
        secondary: &ReservesSnapshot,
        borrowed_asset: Address,
    ) -> ArbitrageResult<Option<ArbitragePlan>> {
        let borrowed_slot = Slot::resolve(lending, borrowed_asset)?;
        let repayment_asset = borrowed_slot.other().pick((lending.get_asset0(), lending.get_asset1()));
        let lending_directions = PairDirections::resolve(lending, borrowed_asset, repayment_asset)?;
        let secondary_directions = PairDirections::resolve(secondary, borrowed_asset, repayment_asset)?;

        let (lending_borrowed, lending_repayment) = lending_directions.orient(lending.get_reserves());
        let (secondary_in, secondary_out) = secondary_directions.orient(secondary.get_reserves());
        let ctx = SearchContext { lending_borrowed, lending_repayment, secondary_in, secondary_out };

        if lending_borrowed <= U256::from(1) {
            return Ok(None);
        }

        let mut left = U256::from(1);
        let mut right = (lending_borrowed - U256::from(1)).min(self.max_quotable(&ctx));
        if right <= left {
            return Ok(None);
        }
        let mut iterations = 0;

        while right - left > self.precision && iterations < Self::MAX_ITERATIONS {
            let one_third = (right - left) / U256::from(3);
            let mid1 = left + one_third;
            let mid2 = right - one_third;

            if self.is_better(&ctx, mid1, mid2)? {
                right = mid2;
            } else {
                left = mid1;
            }
            iterations += 1;
        }

        let mut best = left;
        for candidate in [left + (right - left) / U256::from(2), right] {
            if self.is_better(&ctx, candidate, best)? {
                best = candidate;
            }
        }

        debug!(iterations, %best, "optimal borrow search finished");

        match self.quote(lending, secondary, borrowed_asset, best) {
            Ok(plan) if !plan.surplus.is_zero() => Ok(Some(plan)),
            Ok(_) | Err(ArbitrageError::InsufficientRepayment { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Largest borrow whose legs fit in `U256`. Huge reserves would otherwise overflow
    /// the quote at the top of the bracket even though smaller borrows are fine.
    fn max_quotable(&self, ctx: &SearchContext) -> U256 {
        let (n, d) = (self.secondary_fee.numerator(), self.lending_fee.denominator());
        let by_trade = (U256::MAX / n).checked_div(ctx.secondary_out).unwrap_or(U256::MAX);
        let by_trade_denominator = U256::MAX.saturating_sub(ctx.secondary_in.saturating_mul(self.secondary_fee.denominator())) / n;
        let by_repayment = (U256::MAX / d).checked_div(ctx.lending_repayment).unwrap_or(U256::MAX);
        by_trade.min(by_trade_denominator).min(by_repayment)
    }

    /// `(trade_output, required_repayment)` for borrowing `amount`.
    fn legs(&self, ctx: &SearchContext, amount: U256) -> ArbitrageResult<(U256, U256)> {
        let trade_output = quote_output(ctx.secondary_in, ctx.secondary_out, amount, self.secondary_fee)?;
        let required = required_input(ctx.lending_repayment, ctx.lending_borrowed, amount, self.lending_fee)?;
        Ok((trade_output, required))
    }

    /// Whether borrowing `a` yields a strictly larger (possibly negative) surplus than `b`.
    fn is_better(&self, ctx: &SearchContext, a: U256, b: U256) -> ArbitrageResult<bool> {
        let (out_a, req_a) = self.legs(ctx, a)?;
        let (out_b, req_b) = self.legs(ctx, b)?;
        // out_a - req_a > out_b - req_b without leaving unsigned arithmetic
        Ok(checked_add(out_a, req_b)? > checked_add(out_b, req_a)?)
    }
}

impl Default for ProfitCalculator {
    fn default() -> Self {
        Self::new(FeeRate::UNISWAP_V2, FeeRate::UNISWAP_V2)
    }
}
