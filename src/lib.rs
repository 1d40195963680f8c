// Three-Layer Architecture
pub mod market;     // State Layer: token ledger, constant-product pairs, atomic mutation
pub mod logic;      // Logic Layer: swap math, slot resolution, arbitrage plans
pub mod execution;  // Execution Layer: flash swap callback, config, atomic units

pub mod error;

// Common utilities and types
pub mod utils;

// Re-export key components from each layer
pub use error::{ArbitrageError, ArbitrageResult};
pub use execution::{ArbitrageConfigSection, FlashArbitrageur, TransactionExecutor};
pub use logic::{
    ArbitrageAttempt, ArbitragePlan, ArbitrageReport, AttemptState, ConstantProductPair, FeeRate, PairDirections, Pool,
    ProfitCalculator, ReservesSnapshot, Slot, quote_output, required_input,
};
pub use market::{FlashSwapCallee, FlashSwapReceipt, Market, SwapReceipt, TokenLedger};
pub use utils::{ConfigLoader, ConfigLoaderSync, LoadConfigError, Token};
