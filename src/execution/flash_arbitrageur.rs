use super::config::ArbitrageConfigSection;
use super::transaction_executor::TransactionExecutor;
use crate::error::{ArbitrageError, ArbitrageResult};
use crate::logic::{ArbitrageAttempt, ArbitragePlan, ArbitrageReport, ReservesSnapshot, Slot};
use crate::logic::pools::Pool;
use crate::market::{FlashSwapCallee, Market};
use crate::utils::config_loader::LoadConfigError;
use crate::utils::constants::FLASH_SWAP_CALLBACK_DATA;
use alloy_primitives::{Address, Bytes, U256};
use tracing::{debug, info, warn};

/// Borrows from the lending pool, sells the loan on the secondary pool, repays the lending pool
/// and forwards what is left to the beneficiary, all inside the lending pool's callback.
///
/// Holds no capital of its own between attempts: anything it ends up with is either repaid or
/// forwarded before the callback returns.
#[derive(Debug)]
pub struct FlashArbitrageur {
    config: ArbitrageConfigSection,
    executor: TransactionExecutor,
}

impl FlashArbitrageur {
    pub fn new(config: ArbitrageConfigSection) -> Result<Self, LoadConfigError> {
        config.validate()?;
        let executor = TransactionExecutor::new(config.executor);
        Ok(Self { config, executor })
    }

    pub fn get_config(&self) -> &ArbitrageConfigSection {
        &self.config
    }

    pub fn get_executor(&self) -> &TransactionExecutor {
        &self.executor
    }

    /// Borrow `amount` of `borrowed_asset` from the lending pool and run the whole arbitrage
    /// as one transaction. On error the market is left untouched.
    pub fn initiate(&self, market: &mut Market, borrowed_asset: Address, amount: U256) -> ArbitrageResult<ArbitrageReport> {
        let lending_pool = self.config.lending_pool;
        self.executor.execute(market, "flash arbitrage", |market| {
            let slot = Slot::resolve(market.pair(lending_pool)?, borrowed_asset)?;
            let (amount0_out, amount1_out) = slot.split(amount);
            debug!(%lending_pool, %borrowed_asset, %amount, %slot, "requesting flash swap");

            let data = Bytes::from_static(FLASH_SWAP_CALLBACK_DATA);
            let receipt = market.flash_swap(lending_pool, self.config.executor, amount0_out, amount1_out, &data, self)?;

            let plan = receipt
                .callback
                .as_ref()
                .and_then(ArbitrageAttempt::plan)
                .ok_or(ArbitrageError::InsufficientInputAmount(lending_pool))?;
            Ok(ArbitrageReport::from_plan(plan, self.config.beneficiary))
        })
    }

    /// Trade, settle and distribute. Nothing is transferred unless the trade covers the repayment.
    fn settle(&self, market: &mut Market, lending: &ReservesSnapshot, borrowed_asset: Address, borrowed_amount: U256) -> ArbitrageResult<ArbitragePlan> {
        let me = self.config.executor;
        let secondary = market.pair(self.config.secondary_pool)?.snapshot();
        let plan = ArbitragePlan::compute(lending, self.config.lending_fee, &secondary, self.config.secondary_fee, borrowed_asset, borrowed_amount)?;

        market.transfer(borrowed_asset, me, plan.secondary_pool, borrowed_amount)?;
        let (amount0_out, amount1_out) = plan.secondary_amounts_out();
        market.swap(plan.secondary_pool, amount0_out, amount1_out, me)?;

        market.transfer(plan.repayment_asset, me, plan.lending_pool, plan.required_repayment)?;

        if !plan.surplus.is_zero() {
            market.transfer(plan.repayment_asset, me, self.config.beneficiary, plan.surplus)?;
        }
        Ok(plan)
    }
}

impl FlashSwapCallee for FlashArbitrageur {
    type Outcome = ArbitrageAttempt;

    fn get_address(&self) -> Address {
        self.config.executor
    }

    fn on_flash_swap(
        &self,
        market: &mut Market,
        caller: Address,
        initiator: Address,
        amount0: U256,
        amount1: U256,
        _data: &Bytes,
    ) -> ArbitrageResult<ArbitrageAttempt> {
        if caller != self.config.lending_pool {
            return Err(ArbitrageError::UnauthorizedCallback { caller, expected: self.config.lending_pool });
        }

        let (borrowed_slot, borrowed_amount) = match (amount0.is_zero(), amount1.is_zero()) {
            (false, true) => (Slot::Slot0, amount0),
            (true, false) => (Slot::Slot1, amount1),
            _ => return Err(ArbitrageError::InvalidBorrowAmounts { amount0, amount1 }),
        };

        let lending = market.pair(caller)?.snapshot();
        let borrowed_asset = borrowed_slot.pick((lending.asset0, lending.asset1));
        let attempt = ArbitrageAttempt::begin(caller, borrowed_asset, borrowed_amount);
        debug!(%initiator, %borrowed_asset, %borrowed_amount, state = %attempt.state(), "flash swap callback");

        match self.settle(market, &lending, borrowed_asset, borrowed_amount) {
            Ok(plan) => {
                info!(
                    lending_pool = %plan.lending_pool,
                    secondary_pool = %plan.secondary_pool,
                    trade_output = %plan.trade_output,
                    required_repayment = %plan.required_repayment,
                    surplus = %plan.surplus,
                    "arbitrage settled"
                );
                Ok(attempt.commit(plan))
            }
            Err(e) => {
                let attempt = attempt.abort();
                warn!(%borrowed_asset, %borrowed_amount, state = %attempt.state(), error = %e, "arbitrage aborted");
                Err(e)
            }
        }
    }
}
