use super::amm_math::{FeeRate, quote_output, required_input};
use super::direction::{PairDirections, Slot};
use super::pools::Pool;
use super::types::ReservesSnapshot;
use crate::error::{ArbitrageError, ArbitrageResult};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Every amount of one flash arbitrage, derived from two reserve snapshots.
///
/// Borrow `borrowed_amount` of `borrowed_asset` from the lending pool, sell all of it on the
/// secondary pool for `trade_output` of `repayment_asset`, pay back `required_repayment` and
/// keep `surplus`. Building a plan never touches state; the executor and the dry-run
/// calculator share it so both agree on every amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitragePlan {
    pub lending_pool: Address,
    pub secondary_pool: Address,
    pub borrowed_asset: Address,
    pub repayment_asset: Address,
    pub borrowed_amount: U256,
    pub lending_directions: PairDirections,
    pub secondary_directions: PairDirections,
    pub trade_output: U256,
    pub required_repayment: U256,
    pub surplus: U256,
}

impl ArbitragePlan {
    pub fn compute(
        lending: &ReservesSnapshot,
        lending_fee: FeeRate,
        secondary: &ReservesSnapshot,
        secondary_fee: FeeRate,
        borrowed_asset: Address,
        borrowed_amount: U256,
    ) -> ArbitrageResult<Self> {
        let borrowed_slot = Slot::resolve(lending, borrowed_asset)?;
        let repayment_asset = borrowed_slot.other().pick((lending.get_asset0(), lending.get_asset1()));
        let lending_directions = PairDirections::resolve(lending, borrowed_asset, repayment_asset)?;
        let secondary_directions = PairDirections::resolve(secondary, borrowed_asset, repayment_asset)?;

        let (lending_borrowed_reserve, lending_repayment_reserve) = lending_directions.orient(lending.get_reserves());
        if borrowed_amount >= lending_borrowed_reserve {
            return Err(ArbitrageError::InsufficientLiquidity { requested: borrowed_amount, reserve: lending_borrowed_reserve });
        }

        let (secondary_in_reserve, secondary_out_reserve) = secondary_directions.orient(secondary.get_reserves());
        let trade_output = quote_output(secondary_in_reserve, secondary_out_reserve, borrowed_amount, secondary_fee)?;
        let required_repayment = required_input(lending_repayment_reserve, lending_borrowed_reserve, borrowed_amount, lending_fee)?;

        debug!(
            %borrowed_asset, %borrowed_amount, %trade_output, %required_repayment,
            "arbitrage plan computed"
        );

        let surplus = trade_output
            .checked_sub(required_repayment)
            .ok_or(ArbitrageError::InsufficientRepayment { obtained: trade_output, required: required_repayment })?;

        Ok(Self {
            lending_pool: lending.get_address(),
            secondary_pool: secondary.get_address(),
            borrowed_asset,
            repayment_asset,
            borrowed_amount,
            lending_directions,
            secondary_directions,
            trade_output,
            required_repayment,
            surplus,
        })
    }

    /// `(amount0_out, amount1_out)` for the lending pool's flash swap.
    pub fn lending_amounts_out(&self) -> (U256, U256) {
        self.lending_directions.borrowed.split(self.borrowed_amount)
    }

    /// `(amount0_out, amount1_out)` for the counter-trade on the secondary pool.
    pub fn secondary_amounts_out(&self) -> (U256, U256) {
        self.secondary_directions.repayment.split(self.trade_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::utils::Unit;

    fn ether(amount: u64) -> U256 {
        U256::from(amount) * Unit::ETHER.wei()
    }

    fn snapshot(pool: u8, asset0: u8, asset1: u8, reserve0: U256, reserve1: U256) -> ReservesSnapshot {
        ReservesSnapshot {
            pool: Address::repeat_byte(pool),
            asset0: Address::repeat_byte(asset0),
            asset1: Address::repeat_byte(asset1),
            reserve0,
            reserve1,
            fee: FeeRate::UNISWAP_V2,
        }
    }

    const SCARCE: u8 = 0x0A;
    const ABUNDANT: u8 = 0x0B;

    #[test]
    fn test_plan_borrow_scarce_asset() -> ArbitrageResult<()> {
        let lending = snapshot(1, SCARCE, ABUNDANT, ether(10), ether(1000));
        let secondary = snapshot(2, SCARCE, ABUNDANT, ether(10), ether(2000));

        let plan = ArbitragePlan::compute(&lending, FeeRate::UNISWAP_V2, &secondary, FeeRate::UNISWAP_V2, Address::repeat_byte(SCARCE), ether(1))?;

        assert_eq!(plan.repayment_asset, Address::repeat_byte(ABUNDANT));
        assert_eq!(plan.trade_output, U256::from_str_radix("181322178776029826316", 10).unwrap());
        assert_eq!(plan.required_repayment, U256::from_str_radix("111445447453471525689", 10).unwrap());
        assert_eq!(plan.surplus, U256::from_str_radix("69876731322558300627", 10).unwrap());
        assert_eq!(plan.lending_amounts_out(), (ether(1), U256::ZERO));
        assert_eq!(plan.secondary_amounts_out(), (U256::ZERO, plan.trade_output));
        Ok(())
    }

    #[test]
    fn test_plan_ignores_slot_order() -> ArbitrageResult<()> {
        let lending = snapshot(1, SCARCE, ABUNDANT, ether(10), ether(1000));
        let secondary = snapshot(2, SCARCE, ABUNDANT, ether(10), ether(2000));
        let lending_flipped = snapshot(1, ABUNDANT, SCARCE, ether(1000), ether(10));
        let secondary_flipped = snapshot(2, ABUNDANT, SCARCE, ether(2000), ether(10));

        let base = ArbitragePlan::compute(&lending, FeeRate::UNISWAP_V2, &secondary, FeeRate::UNISWAP_V2, Address::repeat_byte(SCARCE), ether(1))?;
        for (l, s) in [(&lending_flipped, &secondary), (&lending, &secondary_flipped), (&lending_flipped, &secondary_flipped)] {
            let plan = ArbitragePlan::compute(l, FeeRate::UNISWAP_V2, s, FeeRate::UNISWAP_V2, Address::repeat_byte(SCARCE), ether(1))?;
            assert_eq!(plan.trade_output, base.trade_output);
            assert_eq!(plan.required_repayment, base.required_repayment);
            assert_eq!(plan.surplus, base.surplus);
        }
        Ok(())
    }

    #[test]
    fn test_plan_unprofitable() {
        let lending = snapshot(1, SCARCE, ABUNDANT, ether(10), ether(1000));
        let secondary = snapshot(2, SCARCE, ABUNDANT, ether(10), ether(2000));

        let result = ArbitragePlan::compute(&lending, FeeRate::UNISWAP_V2, &secondary, FeeRate::UNISWAP_V2, Address::repeat_byte(SCARCE), ether(5));
        assert!(matches!(result, Err(ArbitrageError::InsufficientRepayment { .. })));
    }

    #[test]
    fn test_plan_wrong_pair_on_secondary() {
        let lending = snapshot(1, SCARCE, ABUNDANT, ether(10), ether(1000));
        let secondary = snapshot(2, SCARCE, 0x0C, ether(10), ether(2000));

        let result = ArbitragePlan::compute(&lending, FeeRate::UNISWAP_V2, &secondary, FeeRate::UNISWAP_V2, Address::repeat_byte(SCARCE), ether(1));
        assert_eq!(result, Err(ArbitrageError::UnknownAssetPair { pool: Address::repeat_byte(2), asset: Address::repeat_byte(ABUNDANT) }));
    }

    #[test]
    fn test_plan_borrow_exceeds_reserve() {
        let lending = snapshot(1, SCARCE, ABUNDANT, ether(10), ether(1000));
        let secondary = snapshot(2, SCARCE, ABUNDANT, ether(10), ether(2000));

        let result = ArbitragePlan::compute(&lending, FeeRate::UNISWAP_V2, &secondary, FeeRate::UNISWAP_V2, Address::repeat_byte(SCARCE), ether(10));
        assert_eq!(result, Err(ArbitrageError::InsufficientLiquidity { requested: ether(10), reserve: ether(10) }));
    }
}
