use super::pools::Pool;
use crate::error::{ArbitrageError, ArbitrageResult};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Position of an asset inside a pool's ordered pair.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Slot {
    Slot0,
    Slot1,
}

impl Slot {
    /// Find which slot of `pool` holds `asset`.
    pub fn resolve<P: Pool + ?Sized>(pool: &P, asset: Address) -> ArbitrageResult<Self> {
        if pool.get_asset0() == asset {
            Ok(Slot::Slot0)
        } else if pool.get_asset1() == asset {
            Ok(Slot::Slot1)
        } else {
            Err(ArbitrageError::UnknownAssetPair { pool: pool.get_address(), asset })
        }
    }

    pub fn other(self) -> Self {
        match self {
            Slot::Slot0 => Slot::Slot1,
            Slot::Slot1 => Slot::Slot0,
        }
    }

    /// Place `amount` in this slot of an `(amount0, amount1)` pair.
    pub fn split(self, amount: U256) -> (U256, U256) {
        match self {
            Slot::Slot0 => (amount, U256::ZERO),
            Slot::Slot1 => (U256::ZERO, amount),
        }
    }

    /// Pick this slot's value out of an `(value0, value1)` pair.
    pub fn pick<T>(self, pair: (T, T)) -> T {
        match self {
            Slot::Slot0 => pair.0,
            Slot::Slot1 => pair.1,
        }
    }
}

/// Where the borrowed and the repayment asset sit in one pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairDirections {
    pub borrowed: Slot,
    pub repayment: Slot,
}

impl PairDirections {
    /// Resolve both assets against `pool`. Fails unless the pool trades exactly this pair.
    pub fn resolve<P: Pool + ?Sized>(pool: &P, borrowed_asset: Address, repayment_asset: Address) -> ArbitrageResult<Self> {
        let borrowed = Slot::resolve(pool, borrowed_asset)?;
        let repayment = Slot::resolve(pool, repayment_asset)?;
        if borrowed == repayment {
            return Err(ArbitrageError::UnknownAssetPair { pool: pool.get_address(), asset: repayment_asset });
        }
        Ok(Self { borrowed, repayment })
    }

    /// `(reserve_borrowed, reserve_repayment)` out of the pool's `(reserve0, reserve1)`.
    pub fn orient(&self, reserves: (U256, U256)) -> (U256, U256) {
        (self.borrowed.pick(reserves), self.repayment.pick(reserves))
    }
}
