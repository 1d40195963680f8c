use crate::error::ArbitrageResult;
use crate::market::Market;
use alloy_primitives::Address;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

/// Runs one top-level transaction against the market.
///
/// Everything the closure does, including nested pool calls and callbacks, lands together or
/// not at all. A failure anywhere leaves reserves and balances exactly as they were.
#[derive(Debug, Default)]
pub struct TransactionExecutor {
    origin: Address,
    committed: AtomicU64,
    reverted: AtomicU64,
}

impl TransactionExecutor {
    pub fn new(origin: Address) -> Self {
        Self { origin, ..Self::default() }
    }

    pub fn execute<T>(&self, market: &mut Market, label: &str, f: impl FnOnce(&mut Market) -> ArbitrageResult<T>) -> ArbitrageResult<T> {
        match market.atomically(f) {
            Ok(value) => {
                self.committed.fetch_add(1, Ordering::Relaxed);
                info!(origin = %self.origin, label, "transaction committed");
                Ok(value)
            }
            Err(e) => {
                self.reverted.fetch_add(1, Ordering::Relaxed);
                warn!(origin = %self.origin, label, error = %e, "transaction reverted");
                Err(e)
            }
        }
    }

    /// `(committed, reverted)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.committed.load(Ordering::Relaxed), self.reverted.load(Ordering::Relaxed))
    }
}
