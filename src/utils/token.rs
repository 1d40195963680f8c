use alloy_primitives::utils::Unit;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Asset identity plus the decimals needed to turn raw amounts into something readable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Token {
    address: Address,
    decimals: u8,
    symbol: Option<String>,
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Token {}

impl Token {
    pub fn new(address: Address) -> Token {
        Token { address, decimals: 18, symbol: None }
    }

    pub fn new_with_symbol(address: Address, symbol: &str, decimals: u8) -> Token {
        Token { address, decimals, symbol: Some(symbol.to_string()) }
    }

    pub fn get_address(&self) -> Address {
        self.address
    }

    pub fn get_symbol(&self) -> String {
        self.symbol.clone().unwrap_or(self.address.to_string())
    }

    /// `10^decimals`.
    pub fn get_exp(&self) -> U256 {
        if self.decimals == 18 { Unit::ETHER.wei() } else { U256::from(10).pow(U256::from(self.decimals)) }
    }

    /// Raw amount for `units` whole tokens.
    pub fn units(&self, units: u64) -> U256 {
        U256::from(units).saturating_mul(self.get_exp())
    }

    /// Lossy, for logs and reports only.
    pub fn to_float(&self, value: U256) -> f64 {
        let (whole, rem) = value.div_rem(self.get_exp());
        match (u64::try_from(whole), u128::try_from(rem)) {
            (Ok(whole), Ok(rem)) => whole as f64 + rem as f64 / 10f64.powi(self.decimals as i32),
            _ => f64::INFINITY,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get_symbol())
    }
}
