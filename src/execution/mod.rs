/// Execution Layer
///
/// Carries out a flash arbitrage against the market:
/// - Configuration of the executor and the two pools it works between
/// - The flash swap callback that trades, repays and forwards the surplus
/// - One atomic unit per attempt

pub mod config;
pub mod flash_arbitrageur;
pub mod transaction_executor;

pub use config::{ArbitrageConfigRoot, ArbitrageConfigSection};
pub use flash_arbitrageur::FlashArbitrageur;
pub use transaction_executor::TransactionExecutor;
