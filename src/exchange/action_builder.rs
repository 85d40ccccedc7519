use ethers::types::H160;
use log::debug;

use crate::{
    consts::{DEFAULT_SIGNATURE_CHAIN_ID, USD_DECIMALS},
    exchange::{
        actions::{
            ApproveAgent, ApproveBuilderFee, BulkCancel, BulkCancelCloid, BulkModify, BulkOrder,
            CustomUserSignedAction, Grouping, SpotSend, UpdateIsolatedMargin, UpdateLeverage,
            UsdClassTransfer, UsdSend, UserSignedAction, VaultTransfer, Withdraw3,
        },
        builder::BuilderInfo,
        cancel::{ClientCancelRequest, ClientCancelRequestCloid},
        exchange_client::{Action, L1Action},
        modify::ClientModifyRequest,
        order::ClientOrderRequest,
    },
    helpers::{float_to_int, float_to_string_for_hashing},
    meta::AssetRegistry,
    prelude::*,
    unsigned::UnsignedTransactionComponents,
    Error,
};

/// Turns caller requests into wire actions and binds them to a nonce.
///
/// Holds everything the pipeline needs short of the key: asset metadata, network, default vault
/// and the chain id user-signed actions declare.
#[derive(Debug, Clone)]
pub struct ActionBuilder {
    pub registry: AssetRegistry,
    pub is_mainnet: bool,
    pub signature_chain_id: String,
    pub vault_address: Option<H160>,
}

impl ActionBuilder {
    pub fn new(registry: AssetRegistry, is_mainnet: bool) -> Self {
        ActionBuilder {
            registry,
            is_mainnet,
            signature_chain_id: DEFAULT_SIGNATURE_CHAIN_ID.to_string(),
            vault_address: None,
        }
    }

    pub fn with_vault_address(mut self, vault_address: Option<H160>) -> Self {
        self.vault_address = vault_address;
        self
    }

    pub fn with_signature_chain_id(mut self, signature_chain_id: impl Into<String>) -> Self {
        self.signature_chain_id = signature_chain_id.into();
        self
    }

    pub fn hyperliquid_chain(&self) -> String {
        if self.is_mainnet {
            "Mainnet".to_string()
        } else {
            "Testnet".to_string()
        }
    }

    /// Hashes and wraps `action` for signing. Nothing is signed or sent.
    pub fn prepare(
        &self,
        action: Action,
        nonce: u64,
        expires_after: Option<u64>,
    ) -> Result<UnsignedTransactionComponents> {
        debug!("preparing {} with nonce {nonce}", action.action_type());
        UnsignedTransactionComponents::prepare(
            action,
            nonce,
            self.vault_address,
            expires_after,
            self.is_mainnet,
        )
    }

    pub fn order(
        &self,
        orders: Vec<ClientOrderRequest>,
        grouping: Grouping,
        builder: Option<BuilderInfo>,
    ) -> Result<Action> {
        let orders = orders
            .into_iter()
            .map(|order| order.convert(&self.registry))
            .collect::<Result<Vec<_>>>()?;
        let builder = builder.map(|builder| BuilderInfo::new(&builder.builder, builder.fee));
        Ok(L1Action::Order(BulkOrder {
            orders,
            grouping,
            builder,
        })
        .into())
    }

    pub fn cancel(&self, cancels: Vec<ClientCancelRequest>) -> Result<Action> {
        let cancels = cancels
            .into_iter()
            .map(|cancel| cancel.convert(&self.registry))
            .collect::<Result<Vec<_>>>()?;
        Ok(L1Action::Cancel(BulkCancel { cancels }).into())
    }

    pub fn cancel_by_cloid(&self, cancels: Vec<ClientCancelRequestCloid>) -> Result<Action> {
        let cancels = cancels
            .into_iter()
            .map(|cancel| cancel.convert(&self.registry))
            .collect::<Result<Vec<_>>>()?;
        Ok(L1Action::CancelByCloid(BulkCancelCloid { cancels }).into())
    }

    pub fn modify(&self, modifies: Vec<ClientModifyRequest>) -> Result<Action> {
        let modifies = modifies
            .into_iter()
            .map(|modify| modify.convert(&self.registry))
            .collect::<Result<Vec<_>>>()?;
        Ok(L1Action::BatchModify(BulkModify { modifies }).into())
    }

    pub fn update_leverage(&self, leverage: u32, coin: &str, is_cross: bool) -> Result<Action> {
        Ok(L1Action::UpdateLeverage(UpdateLeverage {
            asset: self.registry.asset(coin)?,
            is_cross,
            leverage,
        })
        .into())
    }

    /// `amount` in USD; negative removes margin from the position.
    pub fn update_isolated_margin(&self, amount: f64, coin: &str) -> Result<Action> {
        Ok(L1Action::UpdateIsolatedMargin(UpdateIsolatedMargin {
            asset: self.registry.asset(coin)?,
            is_buy: true,
            ntli: float_to_int(amount, USD_DECIMALS),
        })
        .into())
    }

    /// Moves `usd` into or out of `vault_address`, or the configured vault when none is given.
    pub fn vault_transfer(
        &self,
        is_deposit: bool,
        usd: f64,
        vault_address: Option<H160>,
    ) -> Result<Action> {
        let vault_address = vault_address
            .or(self.vault_address)
            .ok_or_else(|| Error::Config("vault transfer needs a vault address".to_string()))?;
        let usd = u64::try_from(float_to_int(usd, USD_DECIMALS))
            .map_err(|_| Error::EncodingFailure(format!("negative vault transfer amount {usd}")))?;
        Ok(L1Action::VaultTransfer(VaultTransfer {
            vault_address,
            is_deposit,
            usd,
        })
        .into())
    }

    pub fn usd_send(&self, amount: &str, destination: &str, time: u64) -> Action {
        UserSignedAction::from(UsdSend {
            signature_chain_id: self.signature_chain_id.clone(),
            hyperliquid_chain: self.hyperliquid_chain(),
            destination: destination.to_string(),
            amount: amount.to_string(),
            time,
        })
        .into()
    }

    pub fn spot_send(&self, amount: &str, destination: &str, token: &str, time: u64) -> Action {
        UserSignedAction::from(SpotSend {
            signature_chain_id: self.signature_chain_id.clone(),
            hyperliquid_chain: self.hyperliquid_chain(),
            destination: destination.to_string(),
            token: token.to_string(),
            amount: amount.to_string(),
            time,
        })
        .into()
    }

    pub fn withdraw(&self, amount: &str, destination: &str, time: u64) -> Action {
        UserSignedAction::from(Withdraw3 {
            signature_chain_id: self.signature_chain_id.clone(),
            hyperliquid_chain: self.hyperliquid_chain(),
            destination: destination.to_string(),
            amount: amount.to_string(),
            time,
        })
        .into()
    }

    /// Spot <-> perp transfer. With a vault configured the transfer targets that sub-account.
    pub fn class_transfer(&self, usdc: f64, to_perp: bool, nonce: u64) -> Action {
        let mut amount = float_to_string_for_hashing(usdc);
        if let Some(vault_address) = self.vault_address {
            amount = format!("{amount} subaccount:{vault_address:?}");
        }
        UserSignedAction::from(UsdClassTransfer {
            signature_chain_id: self.signature_chain_id.clone(),
            hyperliquid_chain: self.hyperliquid_chain(),
            amount,
            to_perp,
            nonce,
        })
        .into()
    }

    pub fn approve_agent(
        &self,
        agent_address: H160,
        agent_name: Option<String>,
        nonce: u64,
    ) -> Action {
        UserSignedAction::from(ApproveAgent {
            signature_chain_id: self.signature_chain_id.clone(),
            hyperliquid_chain: self.hyperliquid_chain(),
            agent_address,
            agent_name: agent_name.unwrap_or_default(),
            nonce,
        })
        .into()
    }

    pub fn approve_builder_fee(&self, builder: &str, max_fee_rate: &str, nonce: u64) -> Action {
        UserSignedAction::from(ApproveBuilderFee {
            signature_chain_id: self.signature_chain_id.clone(),
            hyperliquid_chain: self.hyperliquid_chain(),
            max_fee_rate: max_fee_rate.to_string(),
            builder: builder.to_lowercase(),
            nonce,
        })
        .into()
    }

    /// Any other user-signed action. The configured chain id is filled in when the fields lack one.
    pub fn custom_user_signed(&self, mut custom: CustomUserSignedAction) -> Action {
        custom
            .fields
            .entry("signatureChainId")
            .or_insert_with(|| self.signature_chain_id.clone().into());
        UserSignedAction::Custom(custom).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{
        cancel::ClientCancelRequest,
        order::{ClientLimit, ClientOrder, Tif},
    };
    use serde_json::json;

    fn actions() -> ActionBuilder {
        let mut registry = AssetRegistry::default();
        registry.insert("BTC", 0, 5);
        registry.insert("ETH", 1, 4);
        ActionBuilder::new(registry, false)
    }

    fn vault() -> H160 {
        "0x1234567890123456789012345678901234567890".parse().unwrap()
    }

    #[test]
    fn order_batch_wire_shape() {
        let action = actions()
            .order(
                vec![ClientOrderRequest {
                    asset: "ETH".to_string(),
                    is_buy: true,
                    reduce_only: false,
                    limit_px: 2000.0,
                    sz: 0.1,
                    cloid: None,
                    order_type: ClientOrder::Limit(ClientLimit { tif: Tif::Gtc }),
                }],
                Grouping::Na,
                Some(BuilderInfo {
                    builder: "0xF5Bc9107916B91A3Ea5966cd2e51655D21B7Eb02".to_string(),
                    fee: 10,
                }),
            )
            .unwrap();

        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({
                "type": "order",
                "orders": [{"a": 1, "b": true, "p": "2000", "s": "0.1", "r": false, "t": {"limit": {"tif": "Gtc"}}}],
                "grouping": "na",
                "builder": {"b": "0xf5bc9107916b91a3ea5966cd2e51655d21b7eb02", "f": 10}
            })
        );
    }

    #[test]
    fn unknown_coin_aborts_the_whole_batch() {
        let result = actions().cancel(vec![
            ClientCancelRequest {
                asset: "BTC".to_string(),
                oid: 1,
            },
            ClientCancelRequest {
                asset: "XYZ".to_string(),
                oid: 2,
            },
        ]);
        assert!(matches!(result, Err(Error::UnknownCoin(coin)) if coin == "XYZ"));
    }

    #[test]
    fn margin_and_vault_amounts_in_micro_usd() {
        let margin = actions().update_isolated_margin(-12.5, "BTC").unwrap();
        assert_eq!(
            serde_json::to_value(&margin).unwrap(),
            json!({"type": "updateIsolatedMargin", "asset": 0, "isBuy": true, "ntli": -12_500_000})
        );

        let transfer = actions().vault_transfer(true, 15.0, Some(vault())).unwrap();
        assert_eq!(
            serde_json::to_value(&transfer).unwrap(),
            json!({
                "type": "vaultTransfer",
                "vaultAddress": "0x1234567890123456789012345678901234567890",
                "isDeposit": true,
                "usd": 15_000_000
            })
        );

        assert!(matches!(
            actions().vault_transfer(true, 1.0, None),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn leverage_wire_shape() {
        let action = actions().update_leverage(10, "ETH", false).unwrap();
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({"type": "updateLeverage", "asset": 1, "isCross": false, "leverage": 10})
        );
    }

    #[test]
    fn user_signed_actions_carry_network_and_chain_id() {
        let actions = actions().with_signature_chain_id("0xa4b1");
        let action = actions.usd_send("1", "0x0d1d9635d0640821d15e323ac8adadfa9c111414", 7);
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["hyperliquidChain"], "Testnet");
        assert_eq!(value["signatureChainId"], "0xa4b1");
        assert_eq!(value["time"], 7);

        let mainnet = ActionBuilder::new(AssetRegistry::default(), true);
        assert_eq!(mainnet.hyperliquid_chain(), "Mainnet");
    }

    #[test]
    fn class_transfer_names_the_vault_subaccount() {
        let plain = serde_json::to_value(actions().class_transfer(10.5, true, 1)).unwrap();
        assert_eq!(plain["amount"], "10.5");

        let scoped = actions().with_vault_address(Some(vault()));
        let value = serde_json::to_value(scoped.class_transfer(10.5, true, 1)).unwrap();
        assert_eq!(
            value["amount"],
            "10.5 subaccount:0x1234567890123456789012345678901234567890"
        );
    }

    #[test]
    fn builder_address_lowercased_for_approval() {
        let action =
            actions().approve_builder_fee("0xABCDEF0000000000000000000000000000000001", "0.1%", 3);
        let value = serde_json::to_value(action).unwrap();
        assert_eq!(value["builder"], "0xabcdef0000000000000000000000000000000001");
        assert_eq!(value["maxFeeRate"], "0.1%");
    }
}
