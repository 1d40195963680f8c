//! Constant-product swap math on integer reserves.
//!
//! Both functions work on `U256` with checked arithmetic so an overflow surfaces as
//! [`ArbitrageError::ArithmeticFault`] instead of wrapping. `quote_output` floors and
//! `required_input` rounds up, which keeps every quote on the pool's side of the invariant.

use crate::error::{ArbitrageError, ArbitrageResult};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Fraction of the input that counts towards the swap after the pool fee,
/// e.g. 997/1000 for a 0.3% fee.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFeeRate")]
pub struct FeeRate {
    numerator: u64,
    denominator: u64,
}

#[derive(Deserialize)]
struct RawFeeRate {
    numerator: u64,
    denominator: u64,
}

impl TryFrom<RawFeeRate> for FeeRate {
    type Error = ArbitrageError;

    fn try_from(raw: RawFeeRate) -> Result<Self, Self::Error> {
        FeeRate::new(raw.numerator, raw.denominator)
    }
}

impl FeeRate {
    /// 0.3% fee as charged by Uniswap V2 style pairs.
    pub const UNISWAP_V2: FeeRate = FeeRate { numerator: 997, denominator: 1000 };

    pub fn new(numerator: u64, denominator: u64) -> ArbitrageResult<Self> {
        if numerator == 0 || denominator == 0 || numerator > denominator {
            return Err(ArbitrageError::InvalidFeeRate { numerator, denominator });
        }
        Ok(Self { numerator, denominator })
    }

    pub fn numerator(&self) -> U256 {
        U256::from(self.numerator)
    }

    pub fn denominator(&self) -> U256 {
        U256::from(self.denominator)
    }

    /// The part of the denominator kept by the pool (`D - N`).
    pub fn fee_share(&self) -> U256 {
        U256::from(self.denominator - self.numerator)
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::UNISWAP_V2
    }
}

impl Display for FeeRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

pub(crate) fn checked_add(a: U256, b: U256) -> ArbitrageResult<U256> {
    a.checked_add(b).ok_or(ArbitrageError::ArithmeticFault("addition"))
}

pub(crate) fn checked_sub(a: U256, b: U256) -> ArbitrageResult<U256> {
    a.checked_sub(b).ok_or(ArbitrageError::ArithmeticFault("subtraction"))
}

pub(crate) fn checked_mul(a: U256, b: U256) -> ArbitrageResult<U256> {
    a.checked_mul(b).ok_or(ArbitrageError::ArithmeticFault("multiplication"))
}

pub(crate) fn checked_div(a: U256, b: U256) -> ArbitrageResult<U256> {
    a.checked_div(b).ok_or(ArbitrageError::ArithmeticFault("division"))
}

/// Amount received for selling `amount_in` into a pool holding `reserve_in`/`reserve_out`.
///
/// `amount_out = floor(amount_in * N * reserve_out / (reserve_in * D + amount_in * N))`
pub fn quote_output(reserve_in: U256, reserve_out: U256, amount_in: U256, fee: FeeRate) -> ArbitrageResult<U256> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(ArbitrageError::InsufficientLiquidity { requested: amount_in, reserve: reserve_out.min(reserve_in) });
    }

    let amount_in_with_fee = checked_mul(amount_in, fee.numerator())?;
    let numerator = checked_mul(amount_in_with_fee, reserve_out)?;
    let denominator = checked_add(checked_mul(reserve_in, fee.denominator())?, amount_in_with_fee)?;

    checked_div(numerator, denominator)
}

/// Smallest input that buys `amount_out` from a pool holding `reserve_in`/`reserve_out`.
///
/// `amount_in = floor(reserve_in * amount_out * D / ((reserve_out - amount_out) * N)) + 1`
///
/// The `+ 1` is unconditional: the result is never below the exact rational input.
pub fn required_input(reserve_in: U256, reserve_out: U256, amount_out: U256, fee: FeeRate) -> ArbitrageResult<U256> {
    if amount_out >= reserve_out {
        return Err(ArbitrageError::InsufficientLiquidity { requested: amount_out, reserve: reserve_out });
    }
    if reserve_in.is_zero() {
        return Err(ArbitrageError::InsufficientLiquidity { requested: amount_out, reserve: reserve_in });
    }

    let numerator = checked_mul(checked_mul(reserve_in, amount_out)?, fee.denominator())?;
    let denominator = checked_mul(checked_sub(reserve_out, amount_out)?, fee.numerator())?;

    checked_add(checked_div(numerator, denominator)?, U256::from(1))
}
