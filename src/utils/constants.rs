use alloy_primitives::{Address, address};

/// Any non-empty payload turns a swap into a flash swap; the executor does not read it.
pub const FLASH_SWAP_CALLBACK_DATA: &[u8] = b"1";

/// Fixture identities used by the demo and benches.
#[non_exhaustive]
pub struct FixtureAddress;

impl FixtureAddress {
    pub const WAVAX: Address = address!("0x00000000000000000000000000000000000a0a0a");
    pub const USDT: Address = address!("0x00000000000000000000000000000000000b0b0b");
    pub const LENDING_PAIR: Address = address!("0x0000000000000000000000000000000000001111");
    pub const SECONDARY_PAIR: Address = address!("0x0000000000000000000000000000000000002222");
    pub const EXECUTOR: Address = address!("0x000000000000000000000000000000000000e0e0");
    pub const BENEFICIARY: Address = address!("0x000000000000000000000000000000000000beef");
    pub const DEPLOYER: Address = address!("0x000000000000000000000000000000000000d0d0");
}
