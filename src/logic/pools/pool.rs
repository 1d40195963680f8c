use crate::logic::amm_math::FeeRate;
use crate::logic::types::ReservesSnapshot;
use alloy_primitives::{Address, U256};

/// Read side of a constant-product pool: identity, ordered assets, reserves and fee.
///
/// Swaps are not part of the trait because they move tokens; they go through
/// [`Market::swap`](crate::Market::swap) and [`Market::flash_swap`](crate::Market::flash_swap).
pub trait Pool {
    fn get_address(&self) -> Address;

    fn get_asset0(&self) -> Address;

    fn get_asset1(&self) -> Address;

    fn get_reserves(&self) -> (U256, U256);

    fn get_fee(&self) -> FeeRate;

    /// Read everything once so an attempt never queries the pool twice.
    fn snapshot(&self) -> ReservesSnapshot {
        let (reserve0, reserve1) = self.get_reserves();
        ReservesSnapshot {
            pool: self.get_address(),
            asset0: self.get_asset0(),
            asset1: self.get_asset1(),
            reserve0,
            reserve1,
            fee: self.get_fee(),
        }
    }
}
