use hl_signer::{
    prelude::Result, BaseUrl, ClientCancelRequest, ClientConfig, ClientLimit, ClientOrder,
    ClientOrderRequest, DigestSigner, ExchangeClient, Tif, UnsignedTransactionBuilder,
    UnsignedTransactionComponents,
};
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let builder = UnsignedTransactionBuilder::new(
        None,                   // Use default HTTP client
        Some(BaseUrl::Testnet), // Use testnet
        None,                   // Fetch meta automatically
        None,                   // No vault address
    )
    .await?;
    println!("UnsignedTransactionBuilder initialized");

    println!("\nExample 1: unsigned order");
    let order = ClientOrderRequest {
        asset: "ETH".to_string(),
        is_buy: true,
        reduce_only: false,
        limit_px: 2000.0,
        sz: 0.1,
        cloid: None,
        order_type: ClientOrder::Limit(ClientLimit { tif: Tif::Gtc }),
    };
    let unsigned_order = builder.prepare_unsigned_order(order, None)?;
    print_unsigned_components("Order", &unsigned_order)?;

    println!("\nExample 2: unsigned USDC transfer");
    let unsigned_transfer = builder
        .prepare_unsigned_usdc_transfer("100", "0x1234567890123456789012345678901234567890")?;
    print_unsigned_components("USDC Transfer", &unsigned_transfer)?;

    println!("\nExample 3: unsigned cancel");
    let unsigned_cancel = builder.prepare_unsigned_cancel(ClientCancelRequest {
        asset: "ETH".to_string(),
        oid: 12345,
    })?;
    print_unsigned_components("Cancel", &unsigned_cancel)?;

    println!("\nExample 4: unsigned withdraw");
    let unsigned_withdraw = builder
        .prepare_unsigned_withdraw("50", "0x1234567890123456789012345678901234567890")?;
    print_unsigned_components("Withdraw", &unsigned_withdraw)?;

    // With a key configured, play the external signer and post the cancel.
    if let Ok(config) = ClientConfig::from_env() {
        let wallet = config.wallet()?;
        let signature = unsigned_cancel.sign(&wallet)?;
        info!("signed by {:?}: {signature}", wallet.address());

        let exchange_client =
            ExchangeClient::new(None, wallet, Some(BaseUrl::Testnet), None, None).await?;
        let response = exchange_client
            .post(unsigned_cancel.into_payload(signature))
            .await;
        println!("\nCancel response: {response:?}");
    }

    Ok(())
}

fn print_unsigned_components(
    action_type: &str,
    components: &UnsignedTransactionComponents,
) -> Result<()> {
    println!("  Action Type: {action_type}");
    println!("  Nonce: {}", components.nonce);
    println!("  Digest to Sign: {:?}", components.digest_to_sign);
    println!(
        "  Is L1 Agent Signature: {}",
        components.is_l1_agent_signature
    );
    println!("  Vault Address: {:?}", components.vault_address);
    println!(
        "  EIP-712 Domain Chain ID: {:?}",
        components.eip712_domain_chain_id
    );
    println!(
        "  EIP-712 Hyperliquid Chain Name: {:?}",
        components.eip712_hyperliquid_chain_name
    );
    println!("  Action Payload JSON: {}", components.action_payload_json()?);
    Ok(())
}
