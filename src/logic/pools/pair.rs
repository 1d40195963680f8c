use super::Pool;
use crate::logic::amm_math::FeeRate;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// State of a Uniswap V2 style pair. Reserves only change through [`Market`](crate::Market).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantProductPair {
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    reserve0: U256,
    reserve1: U256,
    fee: FeeRate,
    #[serde(skip)]
    locked: bool,
}

impl ConstantProductPair {
    pub fn new(address: Address, token0: Address, token1: Address, fee: FeeRate) -> Self {
        Self { address, token0, token1, reserve0: U256::ZERO, reserve1: U256::ZERO, fee, locked: false }
    }

    pub(crate) fn update_reserves(&mut self, reserve0: U256, reserve1: U256) {
        self.reserve0 = reserve0;
        self.reserve1 = reserve1;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

impl Pool for ConstantProductPair {
    fn get_address(&self) -> Address {
        self.address
    }

    fn get_asset0(&self) -> Address {
        self.token0
    }

    fn get_asset1(&self) -> Address {
        self.token1
    }

    fn get_reserves(&self) -> (U256, U256) {
        (self.reserve0, self.reserve1)
    }

    fn get_fee(&self) -> FeeRate {
        self.fee
    }
}

impl Display for ConstantProductPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pair(fee={})@{}", self.fee, self.address)
    }
}
