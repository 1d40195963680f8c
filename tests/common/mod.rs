#![allow(dead_code)]

use alloy_primitives::utils::Unit;
use alloy_primitives::{Address, U256};
use flash_arb::{ArbitrageConfigSection, ConstantProductPair, FeeRate, FlashArbitrageur, Market};

pub const SCARCE: Address = Address::new([0x0A; 20]);
pub const ABUNDANT: Address = Address::new([0x0B; 20]);
pub const LENDING: Address = Address::new([0x11; 20]);
pub const SECONDARY: Address = Address::new([0x22; 20]);
pub const EXECUTOR: Address = Address::new([0xE0; 20]);
pub const BENEFICIARY: Address = Address::new([0xBE; 20]);

pub fn ether(amount: u64) -> U256 {
    U256::from(amount) * Unit::ETHER.wei()
}

pub fn wei(value: &str) -> U256 {
    U256::from_str_radix(value, 10).unwrap()
}

/// Two pairs over the same assets, each holding `(scarce, abundant)` units of liquidity.
/// `flip_*` stores the abundant asset in slot 0 of that pair.
pub fn two_pool_market(lending: (u64, u64), secondary: (u64, u64), flip_lending: bool, flip_secondary: bool) -> eyre::Result<Market> {
    let mut market = Market::new();
    for (pool, (scarce, abundant), flip) in [(LENDING, lending, flip_lending), (SECONDARY, secondary, flip_secondary)] {
        if flip {
            market.add_pair(ConstantProductPair::new(pool, ABUNDANT, SCARCE, FeeRate::UNISWAP_V2));
            market.provide_liquidity(pool, ether(abundant), ether(scarce))?;
        } else {
            market.add_pair(ConstantProductPair::new(pool, SCARCE, ABUNDANT, FeeRate::UNISWAP_V2));
            market.provide_liquidity(pool, ether(scarce), ether(abundant))?;
        }
    }
    Ok(market)
}

pub fn arbitrageur() -> eyre::Result<FlashArbitrageur> {
    Ok(FlashArbitrageur::new(ArbitrageConfigSection::new(EXECUTOR, LENDING, SECONDARY, BENEFICIARY))?)
}
