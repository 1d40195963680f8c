use alloy_primitives::{Address, U256};

/// Every way an arbitrage attempt can fail. Any of these aborts the enclosing atomic unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArbitrageError {
    #[error("callback from {caller} rejected, expected lending pool {expected}")]
    UnauthorizedCallback { caller: Address, expected: Address },
    #[error("insufficient liquidity: requested {requested}, reserve {reserve}")]
    InsufficientLiquidity { requested: U256, reserve: U256 },
    #[error("asset {asset} is not traded by pool {pool}")]
    UnknownAssetPair { pool: Address, asset: Address },
    #[error("insufficient repayment: trade returned {obtained}, lending pool requires {required}")]
    InsufficientRepayment { obtained: U256, required: U256 },
    #[error("arithmetic fault in {0}")]
    ArithmeticFault(&'static str),

    #[error("exactly one borrowed amount must be non-zero, got ({amount0}, {amount1})")]
    InvalidBorrowAmounts { amount0: U256, amount1: U256 },
    #[error("{holder} holds {available} of {asset}, needs {required}")]
    InsufficientBalance { asset: Address, holder: Address, available: U256, required: U256 },
    #[error("pool {0}: insufficient input amount")]
    InsufficientInputAmount(Address),
    #[error("pool {0}: insufficient output amount")]
    InsufficientOutputAmount(Address),
    #[error("pool {pool}: invalid recipient {recipient}")]
    InvalidRecipient { pool: Address, recipient: Address },
    #[error("pool {0}: constant product invariant violated")]
    InvariantViolation(Address),
    #[error("pool {0} is locked")]
    PoolLocked(Address),
    #[error("unknown pool {0}")]
    UnknownPool(Address),
    #[error("invalid fee rate {numerator}/{denominator}")]
    InvalidFeeRate { numerator: u64, denominator: u64 },
}

pub type ArbitrageResult<T> = Result<T, ArbitrageError>;
