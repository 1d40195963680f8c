/// Market Layer
///
/// In-memory stand-in for the chain the executor runs against:
/// - Token balances per holder
/// - Constant-product pairs with plain and flash swaps
/// - All-or-nothing mutation through scratch copies

pub mod ledger;
pub mod market;

pub use ledger::TokenLedger;
pub use market::{FlashSwapCallee, FlashSwapReceipt, Market, SwapReceipt};
