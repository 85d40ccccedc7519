use std::{collections::HashMap, fmt, sync::Arc};

use ethers::{
    signers::LocalWallet,
    types::{H160, H256},
};
use log::{debug, info};
use reqwest::Client;
use serde::Serialize;

use crate::{
    exchange::{
        action_builder::ActionBuilder,
        actions::{
            BulkCancel, BulkCancelCloid, BulkModify, BulkOrder, CustomUserSignedAction, Grouping,
            UpdateIsolatedMargin, UpdateLeverage, UserSignedAction, VaultTransfer,
        },
        builder::BuilderInfo,
        cancel::{ClientCancelRequest, ClientCancelRequestCloid},
        exchange_responses::{ExchangeResponse, ExchangeResponseStatus},
        modify::ClientModifyRequest,
        order::{ClientOrderRequest, MarketOrderParams},
    },
    info::InfoClient,
    meta::{AssetRegistry, Meta},
    nonce::NonceManager,
    prelude::*,
    req::HttpClient,
    signature::{action_hash, DigestSigner, Signature},
    unsigned::UnsignedTransactionComponents,
    BaseUrl, Error,
};

/// Actions authorised through a phantom agent over their hash.
///
/// Variant payloads serialize their fields in declaration order, which is the order the exchange
/// hashes them in.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum L1Action {
    Order(BulkOrder),
    BatchModify(BulkModify),
    Cancel(BulkCancel),
    CancelByCloid(BulkCancelCloid),
    UpdateLeverage(UpdateLeverage),
    UpdateIsolatedMargin(UpdateIsolatedMargin),
    VaultTransfer(VaultTransfer),
}

impl L1Action {
    pub fn action_type(&self) -> &'static str {
        match self {
            L1Action::Order(_) => "order",
            L1Action::BatchModify(_) => "batchModify",
            L1Action::Cancel(_) => "cancel",
            L1Action::CancelByCloid(_) => "cancelByCloid",
            L1Action::UpdateLeverage(_) => "updateLeverage",
            L1Action::UpdateIsolatedMargin(_) => "updateIsolatedMargin",
            L1Action::VaultTransfer(_) => "vaultTransfer",
        }
    }

    pub fn hash(
        &self,
        nonce: u64,
        vault_address: Option<H160>,
        expires_after: Option<u64>,
    ) -> Result<H256> {
        action_hash(self, nonce, vault_address, expires_after)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Action {
    L1(L1Action),
    UserSigned(UserSignedAction),
}

impl Action {
    pub fn action_type(&self) -> &str {
        match self {
            Action::L1(action) => action.action_type(),
            Action::UserSigned(action) => action.action_type(),
        }
    }

    pub fn carries_own_scope(&self) -> bool {
        match self {
            Action::L1(_) => false,
            Action::UserSigned(action) => action.carries_own_scope(),
        }
    }
}

impl From<L1Action> for Action {
    fn from(action: L1Action) -> Self {
        Action::L1(action)
    }
}

impl From<UserSignedAction> for Action {
    fn from(action: UserSignedAction) -> Self {
        Action::UserSigned(action)
    }
}

/// Body of a `POST /exchange`.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExchangePayload {
    pub action: Action,
    pub signature: Signature,
    pub nonce: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_address: Option<H160>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_after: Option<u64>,
}

pub struct ExchangeClient {
    http_client: HttpClient,
    info_client: InfoClient,
    pub wallet: Arc<dyn DigestSigner>,
    pub actions: ActionBuilder,
    pub expires_after: Option<u64>,
    nonces: NonceManager,
}

impl fmt::Debug for ExchangeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeClient")
            .field("http_client", &self.http_client)
            .field("wallet", &self.wallet.address())
            .field("actions", &self.actions)
            .field("expires_after", &self.expires_after)
            .field("nonces", &self.nonces)
            .finish()
    }
}

impl ExchangeClient {
    /// Connects to `base_url` (mainnet by default) and loads asset metadata. A supplied `meta`
    /// skips the perp metadata request; spot metadata is always fetched.
    pub async fn new<S: DigestSigner + 'static>(
        client: Option<Client>,
        wallet: S,
        base_url: Option<BaseUrl>,
        meta: Option<Meta>,
        vault_address: Option<H160>,
    ) -> Result<ExchangeClient> {
        let client = client.unwrap_or_default();
        let base_url = base_url.unwrap_or(BaseUrl::Mainnet);
        let info_client = InfoClient::new(Some(client.clone()), Some(base_url));
        let registry = info_client.asset_registry(meta).await?;
        info!("loaded {} assets from {}", registry.len(), base_url.get_url());

        Ok(Self::from_registry(
            Some(client),
            wallet,
            Some(base_url),
            registry,
            vault_address,
        ))
    }

    /// Builds a client around an already known registry without touching the network.
    pub fn from_registry<S: DigestSigner + 'static>(
        client: Option<Client>,
        wallet: S,
        base_url: Option<BaseUrl>,
        registry: AssetRegistry,
        vault_address: Option<H160>,
    ) -> ExchangeClient {
        let http_client = HttpClient::new(client, base_url);
        let actions = ActionBuilder::new(registry, http_client.is_mainnet())
            .with_vault_address(vault_address);
        ExchangeClient {
            info_client: InfoClient {
                http_client: http_client.clone(),
            },
            http_client,
            wallet: Arc::new(wallet),
            actions,
            expires_after: None,
            nonces: NonceManager::new(),
        }
    }

    pub fn with_signature_chain_id(mut self, signature_chain_id: impl Into<String>) -> Self {
        self.actions = self.actions.with_signature_chain_id(signature_chain_id);
        self
    }

    /// Points the client at another API root. The network the client signs for, and with it the
    /// phantom agent source and `hyperliquidChain`, is re-derived from the new URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into();
        self.info_client.http_client.base_url = api_url.clone();
        self.http_client.base_url = api_url;
        self.actions.is_mainnet = self.http_client.is_mainnet();
        self
    }

    pub fn api_url(&self) -> &str {
        &self.http_client.base_url
    }

    /// Requests signed after `expires_after` (ms timestamp) are rejected by the exchange.
    pub fn with_expires_after(mut self, expires_after: Option<u64>) -> Self {
        self.expires_after = expires_after;
        self
    }

    pub fn address(&self) -> H160 {
        self.wallet.address()
    }

    pub fn vault_address(&self) -> Option<H160> {
        self.actions.vault_address
    }

    pub fn next_nonce(&self) -> u64 {
        self.nonces.next_nonce()
    }

    /// Hashes `action` under `nonce` with this client's vault and expiry.
    pub fn prepare_action(
        &self,
        action: Action,
        nonce: u64,
    ) -> Result<UnsignedTransactionComponents> {
        self.actions.prepare(action, nonce, self.expires_after)
    }

    /// Signs `action` under `nonce` and returns the payload, ready to post.
    pub fn sign_action(&self, action: Action, nonce: u64) -> Result<ExchangePayload> {
        let components = self.prepare_action(action, nonce)?;
        let signature = components.sign(self.wallet.as_ref())?;
        debug!("signed {} nonce {nonce}: {signature}", components.action.action_type());
        Ok(components.into_payload(signature))
    }

    async fn sign_and_post(&self, action: Action, nonce: u64) -> Result<ExchangeResponse> {
        let payload = self.sign_action(action, nonce)?;
        self.post(payload).await
    }

    pub async fn post(&self, payload: ExchangePayload) -> Result<ExchangeResponse> {
        let data =
            serde_json::to_string(&payload).map_err(|e| Error::JsonParse(e.to_string()))?;
        info!(
            "posting {} with nonce {}",
            payload.action.action_type(),
            payload.nonce
        );
        debug!("payload {data}");

        let output = self.http_client.post("/exchange", data).await?;
        serde_json::from_str::<ExchangeResponseStatus>(&output)
            .map_err(|e| Error::JsonParse(format!("{e}: {output}")))?
            .into_result()
    }

    pub async fn order(&self, order: ClientOrderRequest) -> Result<ExchangeResponse> {
        self.bulk_order(vec![order]).await
    }

    pub async fn order_with_builder(
        &self,
        order: ClientOrderRequest,
        builder: BuilderInfo,
    ) -> Result<ExchangeResponse> {
        self.bulk_order_with_builder(vec![order], Some(builder)).await
    }

    pub async fn bulk_order(&self, orders: Vec<ClientOrderRequest>) -> Result<ExchangeResponse> {
        self.bulk_order_with_builder(orders, None).await
    }

    pub async fn bulk_order_with_builder(
        &self,
        orders: Vec<ClientOrderRequest>,
        builder: Option<BuilderInfo>,
    ) -> Result<ExchangeResponse> {
        self.grouped_order(orders, Grouping::Na, builder).await
    }

    /// Orders sharing a TP/SL grouping, e.g. an entry with its take-profit and stop-loss.
    pub async fn grouped_order(
        &self,
        orders: Vec<ClientOrderRequest>,
        grouping: Grouping,
        builder: Option<BuilderInfo>,
    ) -> Result<ExchangeResponse> {
        let action = self.actions.order(orders, grouping, builder)?;
        self.sign_and_post(action, self.next_nonce()).await
    }

    /// Immediate-or-cancel order priced `slippage` through the reference price.
    pub async fn market_open(&self, params: MarketOrderParams) -> Result<ExchangeResponse> {
        self.bulk_market_order(vec![params], None).await
    }

    pub async fn market_open_with_builder(
        &self,
        params: MarketOrderParams,
        builder: BuilderInfo,
    ) -> Result<ExchangeResponse> {
        self.bulk_market_order(vec![params], Some(builder)).await
    }

    /// Several market orders in one action. Mids are fetched once, and only when some order
    /// lacks a reference price.
    pub async fn bulk_market_order(
        &self,
        orders: Vec<MarketOrderParams>,
        builder: Option<BuilderInfo>,
    ) -> Result<ExchangeResponse> {
        let mids = if orders.iter().any(|params| params.px.is_none()) {
            self.info_client.all_mids().await?
        } else {
            HashMap::new()
        };
        let orders = orders
            .into_iter()
            .map(|params| {
                let px = match params.px {
                    Some(px) => px,
                    None => mid_price(&mids, &params.asset)?,
                };
                Ok(params.into_order(px))
            })
            .collect::<Result<Vec<_>>>()?;
        self.grouped_order(orders, Grouping::Na, builder).await
    }

    pub async fn cancel(&self, cancel: ClientCancelRequest) -> Result<ExchangeResponse> {
        self.bulk_cancel(vec![cancel]).await
    }

    pub async fn bulk_cancel(&self, cancels: Vec<ClientCancelRequest>) -> Result<ExchangeResponse> {
        let action = self.actions.cancel(cancels)?;
        self.sign_and_post(action, self.next_nonce()).await
    }

    pub async fn cancel_by_cloid(
        &self,
        cancel: ClientCancelRequestCloid,
    ) -> Result<ExchangeResponse> {
        self.bulk_cancel_by_cloid(vec![cancel]).await
    }

    pub async fn bulk_cancel_by_cloid(
        &self,
        cancels: Vec<ClientCancelRequestCloid>,
    ) -> Result<ExchangeResponse> {
        let action = self.actions.cancel_by_cloid(cancels)?;
        self.sign_and_post(action, self.next_nonce()).await
    }

    pub async fn modify(&self, modify: ClientModifyRequest) -> Result<ExchangeResponse> {
        self.bulk_modify(vec![modify]).await
    }

    pub async fn bulk_modify(
        &self,
        modifies: Vec<ClientModifyRequest>,
    ) -> Result<ExchangeResponse> {
        let action = self.actions.modify(modifies)?;
        self.sign_and_post(action, self.next_nonce()).await
    }

    pub async fn update_leverage(
        &self,
        leverage: u32,
        coin: &str,
        is_cross: bool,
    ) -> Result<ExchangeResponse> {
        let action = self.actions.update_leverage(leverage, coin, is_cross)?;
        self.sign_and_post(action, self.next_nonce()).await
    }

    pub async fn update_isolated_margin(
        &self,
        amount: f64,
        coin: &str,
    ) -> Result<ExchangeResponse> {
        let action = self.actions.update_isolated_margin(amount, coin)?;
        self.sign_and_post(action, self.next_nonce()).await
    }

    pub async fn vault_transfer(
        &self,
        is_deposit: bool,
        usd: f64,
        vault_address: Option<H160>,
    ) -> Result<ExchangeResponse> {
        let action = self.actions.vault_transfer(is_deposit, usd, vault_address)?;
        self.sign_and_post(action, self.next_nonce()).await
    }

    pub async fn usdc_transfer(&self, amount: &str, destination: &str) -> Result<ExchangeResponse> {
        let nonce = self.next_nonce();
        let action = self.actions.usd_send(amount, destination, nonce);
        self.sign_and_post(action, nonce).await
    }

    pub async fn class_transfer(&self, usdc: f64, to_perp: bool) -> Result<ExchangeResponse> {
        let nonce = self.next_nonce();
        let action = self.actions.class_transfer(usdc, to_perp, nonce);
        self.sign_and_post(action, nonce).await
    }

    pub async fn withdraw_from_bridge(
        &self,
        amount: &str,
        destination: &str,
    ) -> Result<ExchangeResponse> {
        let nonce = self.next_nonce();
        let action = self.actions.withdraw(amount, destination, nonce);
        self.sign_and_post(action, nonce).await
    }

    pub async fn spot_transfer(
        &self,
        amount: &str,
        destination: &str,
        token: &str,
    ) -> Result<ExchangeResponse> {
        let nonce = self.next_nonce();
        let action = self.actions.spot_send(amount, destination, token, nonce);
        self.sign_and_post(action, nonce).await
    }

    /// Creates a fresh agent key, approves it for this account and returns the key as hex.
    pub async fn approve_agent(
        &self,
        agent_name: Option<String>,
    ) -> Result<(String, ExchangeResponse)> {
        let agent = LocalWallet::new(&mut rand::thread_rng());
        let key = hex::encode(agent.signer().to_bytes());
        let agent_address = ethers::signers::Signer::address(&agent);
        info!("approving agent {agent_address:?}");

        let nonce = self.next_nonce();
        let action = self.actions.approve_agent(agent_address, agent_name, nonce);
        let response = self.sign_and_post(action, nonce).await?;
        Ok((key, response))
    }

    /// `max_fee_rate` is a percentage string such as `"0.1%"`.
    pub async fn approve_builder_fee(
        &self,
        builder: &str,
        max_fee_rate: &str,
    ) -> Result<ExchangeResponse> {
        let nonce = self.next_nonce();
        let action = self.actions.approve_builder_fee(builder, max_fee_rate, nonce);
        self.sign_and_post(action, nonce).await
    }

    pub async fn user_signed_action(
        &self,
        action: CustomUserSignedAction,
    ) -> Result<ExchangeResponse> {
        let action = self.actions.custom_user_signed(action);
        self.sign_and_post(action, self.next_nonce()).await
    }
}

fn mid_price(mids: &HashMap<String, String>, coin: &str) -> Result<f64> {
    let mid = mids
        .get(coin)
        .ok_or_else(|| Error::UnknownCoin(coin.to_string()))?;
    mid.parse::<f64>()
        .map_err(|e| Error::JsonParse(format!("mid price {mid:?} for {coin}: {e}")))
}
