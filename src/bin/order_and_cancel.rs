use hl_signer::{
    prelude::Result, ClientCancelRequest, ClientConfig, ClientLimit, ClientOrder,
    ClientOrderRequest, ExchangeClient, ExchangeDataStatus, Tif,
};
use log::{info, warn};
use uuid::Uuid;

// Rests a far-from-market ETH bid on testnet, then cancels it.
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let config = ClientConfig::from_env()?;
    let wallet = config.wallet()?;

    let exchange_client = ExchangeClient::new(
        None,
        wallet,
        Some(config.network),
        None,
        config.vault_address,
    )
    .await?
    .with_signature_chain_id(config.signature_chain_id.clone());
    info!("trading as {:?}", exchange_client.address());

    let order = ClientOrderRequest {
        asset: "ETH".to_string(),
        is_buy: true,
        reduce_only: false,
        limit_px: 1000.0,
        sz: 0.01,
        cloid: Some(Uuid::new_v4()),
        order_type: ClientOrder::Limit(ClientLimit { tif: Tif::Gtc }),
    };

    let response = exchange_client.order(order).await?;
    info!("order placed: {response:?}");

    let oid = match response.statuses().first() {
        Some(ExchangeDataStatus::Resting(order)) => order.oid,
        other => {
            warn!("order did not rest: {other:?}");
            return Ok(());
        }
    };

    let response = exchange_client
        .cancel(ClientCancelRequest {
            asset: "ETH".to_string(),
            oid,
        })
        .await?;
    info!("order cancelled: {response:?}");
    Ok(())
}
