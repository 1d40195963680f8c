use crate::logic::FeeRate;
use crate::utils::config_loader::{ConfigLoader, ConfigLoaderSync, LoadConfigError, load_from_file, load_from_file_sync};
use alloy_primitives::Address;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct ArbitrageConfigRoot {
    pub arbitrage: ArbitrageConfigSection,
}

/// Wiring of one flash arbitrageur: which pool lends, which pool takes the counter-trade and
/// who keeps the surplus. Fixed for the executor's lifetime.
#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArbitrageConfigSection {
    /// Address the executor holds balances under and receives callbacks at.
    pub executor: Address,
    pub lending_pool: Address,
    pub secondary_pool: Address,
    pub beneficiary: Address,
    #[serde(default)]
    pub lending_fee: FeeRate,
    #[serde(default)]
    pub secondary_fee: FeeRate,
}

impl ArbitrageConfigSection {
    pub fn new(executor: Address, lending_pool: Address, secondary_pool: Address, beneficiary: Address) -> Self {
        Self {
            executor,
            lending_pool,
            secondary_pool,
            beneficiary,
            lending_fee: FeeRate::default(),
            secondary_fee: FeeRate::default(),
        }
    }

    pub fn with_fees(self, lending_fee: FeeRate, secondary_fee: FeeRate) -> Self {
        Self { lending_fee, secondary_fee, ..self }
    }

    pub fn validate(&self) -> Result<(), LoadConfigError> {
        if self.lending_pool == self.secondary_pool {
            return Err(LoadConfigError::ConfigError(format!("lending and secondary pool are both {}", self.lending_pool)));
        }
        for (name, address) in [
            ("executor", self.executor),
            ("lending_pool", self.lending_pool),
            ("secondary_pool", self.secondary_pool),
            ("beneficiary", self.beneficiary),
        ] {
            if address.is_zero() {
                return Err(LoadConfigError::ConfigError(format!("{name} is the zero address")));
            }
        }
        if self.executor == self.lending_pool || self.executor == self.secondary_pool {
            return Err(LoadConfigError::ConfigError("executor cannot be one of the pools".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigLoader for ArbitrageConfigSection {
    type SectionType = ArbitrageConfigSection;

    async fn load_section_from_file(file_name: String) -> Result<Self::SectionType, LoadConfigError> {
        let root: ArbitrageConfigRoot = load_from_file(file_name).await?;
        root.arbitrage.validate()?;
        Ok(root.arbitrage)
    }
}

impl ConfigLoaderSync for ArbitrageConfigSection {
    type SectionType = ArbitrageConfigSection;

    fn load_section_from_file_sync(file_name: String) -> Result<Self::SectionType, LoadConfigError> {
        let root: ArbitrageConfigRoot = load_from_file_sync(file_name)?;
        root.arbitrage.validate()?;
        Ok(root.arbitrage)
    }
}
