/// Logic Layer
///
/// Pure arbitrage math, no state:
/// - Constant-product quotes with explicit rounding
/// - Slot resolution between the two pools' token orderings
/// - Plans shared by the executor and the dry-run calculator

pub mod amm_math;
pub mod direction;
pub mod plan;
pub mod pools;
pub mod profit_calculator;
pub mod types;

pub use amm_math::{FeeRate, quote_output, required_input};
pub use direction::{PairDirections, Slot};
pub use plan::ArbitragePlan;
pub use pools::{ConstantProductPair, Pool};
pub use profit_calculator::ProfitCalculator;
pub use types::{ArbitrageAttempt, ArbitrageReport, AttemptState, ReservesSnapshot};
