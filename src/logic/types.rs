use super::amm_math::FeeRate;
use super::plan::ArbitragePlan;
use super::pools::Pool;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Pool state read once at the start of an attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservesSnapshot {
    pub pool: Address,
    pub asset0: Address,
    pub asset1: Address,
    pub reserve0: U256,
    pub reserve1: U256,
    pub fee: FeeRate,
}

impl Pool for ReservesSnapshot {
    fn get_address(&self) -> Address {
        self.pool
    }

    fn get_asset0(&self) -> Address {
        self.asset0
    }

    fn get_asset1(&self) -> Address {
        self.asset1
    }

    fn get_reserves(&self) -> (U256, U256) {
        (self.reserve0, self.reserve1)
    }

    fn get_fee(&self) -> FeeRate {
        self.fee
    }

    fn snapshot(&self) -> ReservesSnapshot {
        *self
    }
}

/// Lifecycle of one arbitrage attempt. `Committed` and `Aborted` are terminal.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Default, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptState {
    #[default]
    Idle,
    AwaitingSettlement,
    Committed,
    Aborted,
}

impl AttemptState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, AttemptState::Committed | AttemptState::Aborted)
    }
}

/// The single attempt living inside one callback invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArbitrageAttempt {
    pub lending_pool: Address,
    pub borrowed_asset: Address,
    pub borrowed_amount: U256,
    state: AttemptState,
    plan: Option<ArbitragePlan>,
}

impl ArbitrageAttempt {
    /// Idle -> AwaitingSettlement.
    pub fn begin(lending_pool: Address, borrowed_asset: Address, borrowed_amount: U256) -> Self {
        Self { lending_pool, borrowed_asset, borrowed_amount, state: AttemptState::AwaitingSettlement, plan: None }
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn plan(&self) -> Option<&ArbitragePlan> {
        self.plan.as_ref()
    }

    pub fn commit(mut self, plan: ArbitragePlan) -> Self {
        debug_assert_eq!(self.state, AttemptState::AwaitingSettlement);
        self.plan = Some(plan);
        self.state = AttemptState::Committed;
        self
    }

    pub fn abort(mut self) -> Self {
        debug_assert_eq!(self.state, AttemptState::AwaitingSettlement);
        self.state = AttemptState::Aborted;
        self
    }
}

/// Outcome of a committed flash arbitrage, as returned to the caller of
/// [`FlashArbitrageur::initiate`](crate::FlashArbitrageur::initiate).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrageReport {
    pub lending_pool: Address,
    pub secondary_pool: Address,
    pub borrowed_asset: Address,
    pub borrowed_amount: U256,
    pub repayment_asset: Address,
    pub trade_output: U256,
    pub required_repayment: U256,
    pub surplus: U256,
    pub beneficiary: Address,
    pub state: AttemptState,
}

impl ArbitrageReport {
    pub fn from_plan(plan: &ArbitragePlan, beneficiary: Address) -> Self {
        Self {
            lending_pool: plan.lending_pool,
            secondary_pool: plan.secondary_pool,
            borrowed_asset: plan.borrowed_asset,
            borrowed_amount: plan.borrowed_amount,
            repayment_asset: plan.repayment_asset,
            trade_output: plan.trade_output,
            required_repayment: plan.required_repayment,
            surplus: plan.surplus,
            beneficiary,
            state: AttemptState::Committed,
        }
    }
}
