use ethers::types::H160;
use reqwest::Client;

use crate::{
    exchange::{
        ActionBuilder, BuilderInfo, ClientCancelRequest, ClientCancelRequestCloid,
        ClientModifyRequest, ClientOrderRequest, Grouping,
    },
    info::InfoClient,
    meta::{AssetRegistry, Meta},
    nonce::NonceManager,
    prelude::*,
    req::HttpClient,
    unsigned::UnsignedTransactionComponents,
    BaseUrl,
};

/// Prepares transactions for a signer that lives outside this process.
///
/// Mirrors the signing operations of `ExchangeClient` but stops at the digest. Nonces come from
/// the builder's own sequencer.
#[derive(Debug)]
pub struct UnsignedTransactionBuilder {
    pub actions: ActionBuilder,
    pub expires_after: Option<u64>,
    nonces: NonceManager,
    // No key material here
}

impl UnsignedTransactionBuilder {
    pub async fn new(
        client: Option<Client>,
        base_url_override: Option<BaseUrl>,
        meta_override: Option<Meta>,
        vault_address: Option<H160>,
    ) -> Result<Self> {
        let client = client.unwrap_or_default();
        let base_url = base_url_override.unwrap_or(BaseUrl::Mainnet);

        let info_for_setup = InfoClient::new(Some(client.clone()), Some(base_url));
        let registry = info_for_setup.asset_registry(meta_override).await?;

        Ok(Self::from_registry(
            Some(client),
            Some(base_url),
            registry,
            vault_address,
        ))
    }

    pub fn from_registry(
        client: Option<Client>,
        base_url: Option<BaseUrl>,
        registry: AssetRegistry,
        vault_address: Option<H160>,
    ) -> Self {
        // Only the network matters here; nothing is posted.
        let is_mainnet = HttpClient::new(client, base_url).is_mainnet();
        UnsignedTransactionBuilder {
            actions: ActionBuilder::new(registry, is_mainnet).with_vault_address(vault_address),
            expires_after: None,
            nonces: NonceManager::new(),
        }
    }

    pub fn with_signature_chain_id(mut self, signature_chain_id: impl Into<String>) -> Self {
        self.actions = self.actions.with_signature_chain_id(signature_chain_id);
        self
    }

    pub fn with_expires_after(mut self, expires_after: Option<u64>) -> Self {
        self.expires_after = expires_after;
        self
    }

    fn prepare(
        &self,
        action: crate::exchange::Action,
        nonce: u64,
    ) -> Result<UnsignedTransactionComponents> {
        self.actions.prepare(action, nonce, self.expires_after)
    }

    pub fn prepare_unsigned_order(
        &self,
        order: ClientOrderRequest,
        builder: Option<BuilderInfo>,
    ) -> Result<UnsignedTransactionComponents> {
        self.prepare_unsigned_bulk_order(vec![order], Grouping::Na, builder)
    }

    pub fn prepare_unsigned_bulk_order(
        &self,
        orders: Vec<ClientOrderRequest>,
        grouping: Grouping,
        builder: Option<BuilderInfo>,
    ) -> Result<UnsignedTransactionComponents> {
        let action = self.actions.order(orders, grouping, builder)?;
        self.prepare(action, self.nonces.next_nonce())
    }

    pub fn prepare_unsigned_cancel(
        &self,
        cancel: ClientCancelRequest,
    ) -> Result<UnsignedTransactionComponents> {
        let action = self.actions.cancel(vec![cancel])?;
        self.prepare(action, self.nonces.next_nonce())
    }

    pub fn prepare_unsigned_cancel_by_cloid(
        &self,
        cancel: ClientCancelRequestCloid,
    ) -> Result<UnsignedTransactionComponents> {
        let action = self.actions.cancel_by_cloid(vec![cancel])?;
        self.prepare(action, self.nonces.next_nonce())
    }

    pub fn prepare_unsigned_modify(
        &self,
        modify: ClientModifyRequest,
    ) -> Result<UnsignedTransactionComponents> {
        let action = self.actions.modify(vec![modify])?;
        self.prepare(action, self.nonces.next_nonce())
    }

    pub fn prepare_unsigned_update_leverage(
        &self,
        leverage: u32,
        coin: &str,
        is_cross: bool,
    ) -> Result<UnsignedTransactionComponents> {
        let action = self.actions.update_leverage(leverage, coin, is_cross)?;
        self.prepare(action, self.nonces.next_nonce())
    }

    pub fn prepare_unsigned_update_isolated_margin(
        &self,
        amount: f64,
        coin: &str,
    ) -> Result<UnsignedTransactionComponents> {
        let action = self.actions.update_isolated_margin(amount, coin)?;
        self.prepare(action, self.nonces.next_nonce())
    }

    pub fn prepare_unsigned_usdc_transfer(
        &self,
        amount: &str,
        destination: &str,
    ) -> Result<UnsignedTransactionComponents> {
        let nonce = self.nonces.next_nonce();
        self.prepare(self.actions.usd_send(amount, destination, nonce), nonce)
    }

    pub fn prepare_unsigned_withdraw(
        &self,
        amount: &str,
        destination: &str,
    ) -> Result<UnsignedTransactionComponents> {
        let nonce = self.nonces.next_nonce();
        self.prepare(self.actions.withdraw(amount, destination, nonce), nonce)
    }

    pub fn prepare_unsigned_class_transfer(
        &self,
        usdc: f64,
        to_perp: bool,
    ) -> Result<UnsignedTransactionComponents> {
        let nonce = self.nonces.next_nonce();
        self.prepare(self.actions.class_transfer(usdc, to_perp, nonce), nonce)
    }

    pub fn prepare_unsigned_approve_agent(
        &self,
        agent_address: H160,
        agent_name: Option<String>,
    ) -> Result<UnsignedTransactionComponents> {
        let nonce = self.nonces.next_nonce();
        self.prepare(
            self.actions.approve_agent(agent_address, agent_name, nonce),
            nonce,
        )
    }

    pub fn prepare_unsigned_approve_builder_fee(
        &self,
        builder: &str,
        max_fee_rate: &str,
    ) -> Result<UnsignedTransactionComponents> {
        let nonce = self.nonces.next_nonce();
        self.prepare(
            self.actions.approve_builder_fee(builder, max_fee_rate, nonce),
            nonce,
        )
    }
}
