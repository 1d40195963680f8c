//! Borrow 1 WAVAX from the cheaper pool, sell it on the dearer one and print the report.
//!
//! `RUST_LOG=debug cargo run --example flash_arbitrage`

use flash_arb::utils::FixtureAddress;
use flash_arb::{ArbitrageConfigSection, ConfigLoader, ConstantProductPair, FlashArbitrageur, Market, Pool, ProfitCalculator, Token};
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/arbitrage.toml");

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))).init();

    let config = ArbitrageConfigSection::load_section_from_file(CONFIG_FILE.to_string()).await?;

    let wavax = Token::new_with_symbol(FixtureAddress::WAVAX, "WAVAX", 18);
    let usdt = Token::new_with_symbol(FixtureAddress::USDT, "USDT", 18);

    let mut market = Market::new();
    market.add_pair(ConstantProductPair::new(config.lending_pool, wavax.get_address(), usdt.get_address(), config.lending_fee));
    market.add_pair(ConstantProductPair::new(config.secondary_pool, wavax.get_address(), usdt.get_address(), config.secondary_fee));
    market.provide_liquidity(config.lending_pool, wavax.units(10), usdt.units(1000))?;
    market.provide_liquidity(config.secondary_pool, wavax.units(10), usdt.units(2000))?;

    info!(
        lending = %market.spot_price(config.lending_pool, wavax.get_address())?,
        secondary = %market.spot_price(config.secondary_pool, wavax.get_address())?,
        "{usdt} per {wavax} before"
    );

    let calculator = ProfitCalculator::new(config.lending_fee, config.secondary_fee);
    let lending = market.pair(config.lending_pool)?.snapshot();
    let secondary = market.pair(config.secondary_pool)?.snapshot();
    if let Some(best) = calculator.find_optimal_borrow(&lending, &secondary, wavax.get_address())? {
        info!(borrow = wavax.to_float(best.borrowed_amount), surplus = usdt.to_float(best.surplus), "best possible borrow");
    }

    let beneficiary = config.beneficiary;
    let arb = FlashArbitrageur::new(config)?;
    let report = arb.initiate(&mut market, wavax.get_address(), wavax.units(1))?;

    info!(
        lending = %market.spot_price(report.lending_pool, wavax.get_address())?,
        secondary = %market.spot_price(report.secondary_pool, wavax.get_address())?,
        "{usdt} per {wavax} after"
    );
    info!(surplus = usdt.to_float(market.balance_of(usdt.get_address(), beneficiary)), "beneficiary balance");

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
