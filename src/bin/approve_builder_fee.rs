use hl_signer::{prelude::Result, ClientConfig, ExchangeClient};
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let config = ClientConfig::from_env()?;

    let exchange_client = ExchangeClient::new(
        None,
        config.wallet()?,
        Some(config.network),
        None,
        config.vault_address,
    )
    .await?
    .with_signature_chain_id(config.signature_chain_id.clone());

    let max_fee_rate = "0.1%";
    let builder = "0xF5Bc9107916B91A3Ea5966cd2e51655D21B7Eb02";

    let resp = exchange_client
        .approve_builder_fee(builder, max_fee_rate)
        .await?;
    info!("resp: {resp:#?}");
    Ok(())
}
