use ethers::types::{transaction::eip712::Eip712DomainType, H160};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{
    exchange::{
        builder::BuilderInfo, cancel::CancelRequest, cancel::CancelRequestCloid,
        modify::ModifyRequest, order::OrderRequest,
    },
    prelude::*,
    signature::{typed_field, user_signed_envelope, TypedDataEnvelope},
    Error,
};

/// How the orders of one batch relate to each other.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Grouping {
    #[default]
    Na,
    NormalTpsl,
    PositionTpsl,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BulkOrder {
    pub orders: Vec<OrderRequest>,
    pub grouping: Grouping,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder: Option<BuilderInfo>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BulkCancel {
    pub cancels: Vec<CancelRequest>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BulkCancelCloid {
    pub cancels: Vec<CancelRequestCloid>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BulkModify {
    pub modifies: Vec<ModifyRequest>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeverage {
    pub asset: u32,
    pub is_cross: bool,
    pub leverage: u32,
}

/// `ntli` is the margin delta in micro-USD; negative removes margin.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIsolatedMargin {
    pub asset: u32,
    pub is_buy: bool,
    pub ntli: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VaultTransfer {
    pub vault_address: H160,
    pub is_deposit: bool,
    pub usd: u64,
}

/// A user-signed action kind: its wire tag, EIP-712 primary type and field schema.
pub trait UserSignedKind: Serialize {
    const TYPE: &'static str;
    const PRIMARY_TYPE: &'static str;

    fn schema() -> Vec<Eip712DomainType>;
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsdSend {
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    pub destination: String,
    pub amount: String,
    pub time: u64,
}

impl UserSignedKind for UsdSend {
    const TYPE: &'static str = "usdSend";
    const PRIMARY_TYPE: &'static str = "HyperliquidTransaction:UsdSend";

    fn schema() -> Vec<Eip712DomainType> {
        vec![
            typed_field("hyperliquidChain", "string"),
            typed_field("destination", "string"),
            typed_field("amount", "string"),
            typed_field("time", "uint64"),
        ]
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpotSend {
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    pub destination: String,
    /// `NAME:tokenId`, e.g. `PURR:0xc1fb593aeffbeb02f85e0308e9956a90`.
    pub token: String,
    pub amount: String,
    pub time: u64,
}

impl UserSignedKind for SpotSend {
    const TYPE: &'static str = "spotSend";
    const PRIMARY_TYPE: &'static str = "HyperliquidTransaction:SpotSend";

    fn schema() -> Vec<Eip712DomainType> {
        vec![
            typed_field("hyperliquidChain", "string"),
            typed_field("destination", "string"),
            typed_field("token", "string"),
            typed_field("amount", "string"),
            typed_field("time", "uint64"),
        ]
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Withdraw3 {
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    pub destination: String,
    pub amount: String,
    pub time: u64,
}

impl UserSignedKind for Withdraw3 {
    const TYPE: &'static str = "withdraw3";
    const PRIMARY_TYPE: &'static str = "HyperliquidTransaction:Withdraw";

    fn schema() -> Vec<Eip712DomainType> {
        vec![
            typed_field("hyperliquidChain", "string"),
            typed_field("destination", "string"),
            typed_field("amount", "string"),
            typed_field("time", "uint64"),
        ]
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsdClassTransfer {
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    pub amount: String,
    pub to_perp: bool,
    pub nonce: u64,
}

impl UserSignedKind for UsdClassTransfer {
    const TYPE: &'static str = "usdClassTransfer";
    const PRIMARY_TYPE: &'static str = "HyperliquidTransaction:UsdClassTransfer";

    fn schema() -> Vec<Eip712DomainType> {
        vec![
            typed_field("hyperliquidChain", "string"),
            typed_field("amount", "string"),
            typed_field("toPerp", "bool"),
            typed_field("nonce", "uint64"),
        ]
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApproveAgent {
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    pub agent_address: H160,
    pub agent_name: String,
    pub nonce: u64,
}

impl UserSignedKind for ApproveAgent {
    const TYPE: &'static str = "approveAgent";
    const PRIMARY_TYPE: &'static str = "HyperliquidTransaction:ApproveAgent";

    fn schema() -> Vec<Eip712DomainType> {
        vec![
            typed_field("hyperliquidChain", "string"),
            typed_field("agentAddress", "address"),
            typed_field("agentName", "string"),
            typed_field("nonce", "uint64"),
        ]
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApproveBuilderFee {
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    /// Percentage string, e.g. `"0.1%"`.
    pub max_fee_rate: String,
    pub builder: String,
    pub nonce: u64,
}

impl UserSignedKind for ApproveBuilderFee {
    const TYPE: &'static str = "approveBuilderFee";
    const PRIMARY_TYPE: &'static str = "HyperliquidTransaction:ApproveBuilderFee";

    fn schema() -> Vec<Eip712DomainType> {
        vec![
            typed_field("hyperliquidChain", "string"),
            typed_field("maxFeeRate", "string"),
            typed_field("builder", "address"),
            typed_field("nonce", "uint64"),
        ]
    }
}

/// A user-signed action the crate has no typed struct for.
///
/// `fields` must include `signatureChainId` and every field named in `schema`.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomUserSignedAction {
    pub action_type: String,
    pub primary_type: String,
    pub schema: Vec<Eip712DomainType>,
    pub fields: Map<String, Value>,
}

/// Action signed over its own fields rather than through a phantom agent.
#[derive(Debug, Clone, PartialEq)]
pub enum UserSignedAction {
    UsdSend(UsdSend),
    SpotSend(SpotSend),
    Withdraw3(Withdraw3),
    UsdClassTransfer(UsdClassTransfer),
    ApproveAgent(ApproveAgent),
    ApproveBuilderFee(ApproveBuilderFee),
    Custom(CustomUserSignedAction),
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    #[serde(rename = "type")]
    action_type: &'static str,
    #[serde(flatten)]
    action: &'a T,
}

fn tagged<S: Serializer, T: UserSignedKind>(
    serializer: S,
    action: &T,
) -> std::result::Result<S::Ok, S::Error> {
    Tagged {
        action_type: T::TYPE,
        action,
    }
    .serialize(serializer)
}

impl Serialize for UserSignedAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            UserSignedAction::UsdSend(action) => tagged(serializer, action),
            UserSignedAction::SpotSend(action) => tagged(serializer, action),
            UserSignedAction::Withdraw3(action) => tagged(serializer, action),
            UserSignedAction::UsdClassTransfer(action) => tagged(serializer, action),
            UserSignedAction::ApproveAgent(action) => tagged(serializer, action),
            UserSignedAction::ApproveBuilderFee(action) => tagged(serializer, action),
            UserSignedAction::Custom(custom) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", &custom.action_type)?;
                for (key, value) in custom.fields.iter().filter(|(key, _)| *key != "type") {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl UserSignedAction {
    pub fn action_type(&self) -> &str {
        match self {
            UserSignedAction::UsdSend(_) => UsdSend::TYPE,
            UserSignedAction::SpotSend(_) => SpotSend::TYPE,
            UserSignedAction::Withdraw3(_) => Withdraw3::TYPE,
            UserSignedAction::UsdClassTransfer(_) => UsdClassTransfer::TYPE,
            UserSignedAction::ApproveAgent(_) => ApproveAgent::TYPE,
            UserSignedAction::ApproveBuilderFee(_) => ApproveBuilderFee::TYPE,
            UserSignedAction::Custom(custom) => &custom.action_type,
        }
    }

    pub fn primary_type(&self) -> &str {
        match self {
            UserSignedAction::UsdSend(_) => UsdSend::PRIMARY_TYPE,
            UserSignedAction::SpotSend(_) => SpotSend::PRIMARY_TYPE,
            UserSignedAction::Withdraw3(_) => Withdraw3::PRIMARY_TYPE,
            UserSignedAction::UsdClassTransfer(_) => UsdClassTransfer::PRIMARY_TYPE,
            UserSignedAction::ApproveAgent(_) => ApproveAgent::PRIMARY_TYPE,
            UserSignedAction::ApproveBuilderFee(_) => ApproveBuilderFee::PRIMARY_TYPE,
            UserSignedAction::Custom(custom) => &custom.primary_type,
        }
    }

    pub fn schema(&self) -> Vec<Eip712DomainType> {
        match self {
            UserSignedAction::UsdSend(_) => UsdSend::schema(),
            UserSignedAction::SpotSend(_) => SpotSend::schema(),
            UserSignedAction::Withdraw3(_) => Withdraw3::schema(),
            UserSignedAction::UsdClassTransfer(_) => UsdClassTransfer::schema(),
            UserSignedAction::ApproveAgent(_) => ApproveAgent::schema(),
            UserSignedAction::ApproveBuilderFee(_) => ApproveBuilderFee::schema(),
            UserSignedAction::Custom(custom) => custom.schema.clone(),
        }
    }

    /// Field map as posted, `type` included.
    pub fn fields(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self).map_err(|e| Error::EncodingFailure(e.to_string()))? {
            Value::Object(fields) => Ok(fields),
            other => Err(Error::EncodingFailure(format!(
                "user-signed action encoded as {other}"
            ))),
        }
    }

    pub fn envelope(&self) -> Result<TypedDataEnvelope> {
        user_signed_envelope(self.primary_type(), &self.schema(), &self.fields()?)
    }

    /// USD sends and class transfers name their own account, so the request never carries a
    /// vault address for them.
    pub fn carries_own_scope(&self) -> bool {
        matches!(
            self,
            UserSignedAction::UsdSend(_) | UserSignedAction::UsdClassTransfer(_)
        )
    }
}

macro_rules! user_signed_from {
    ($($kind:ident),*) => {
        $(
            impl From<$kind> for UserSignedAction {
                fn from(action: $kind) -> Self {
                    UserSignedAction::$kind(action)
                }
            }
        )*
    };
}

user_signed_from!(
    UsdSend,
    SpotSend,
    Withdraw3,
    UsdClassTransfer,
    ApproveAgent,
    ApproveBuilderFee
);

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::U256;
    use serde_json::json;

    fn usd_send() -> UsdSend {
        UsdSend {
            signature_chain_id: "0x66eee".to_string(),
            hyperliquid_chain: "Testnet".to_string(),
            destination: "0x0d1d9635d0640821d15e323ac8adadfa9c111414".to_string(),
            amount: "1".to_string(),
            time: 1_700_000_000_000,
        }
    }

    #[test]
    fn tagged_with_type_first() {
        let json = serde_json::to_string(&UserSignedAction::from(usd_send())).unwrap();
        assert!(json.starts_with(r#"{"type":"usdSend","signatureChainId":"0x66eee""#));
    }

    #[test]
    fn grouping_wire_names() {
        assert_eq!(serde_json::to_value(Grouping::Na).unwrap(), json!("na"));
        assert_eq!(
            serde_json::to_value(Grouping::NormalTpsl).unwrap(),
            json!("normalTpsl")
        );
        assert_eq!(
            serde_json::to_value(Grouping::PositionTpsl).unwrap(),
            json!("positionTpsl")
        );
    }

    #[test]
    fn every_schema_field_is_serialized() {
        let actions: Vec<UserSignedAction> = vec![
            usd_send().into(),
            SpotSend {
                signature_chain_id: "0x66eee".to_string(),
                hyperliquid_chain: "Testnet".to_string(),
                destination: "0x0d1d9635d0640821d15e323ac8adadfa9c111414".to_string(),
                token: "PURR:0xc1fb593aeffbeb02f85e0308e9956a90".to_string(),
                amount: "2".to_string(),
                time: 1,
            }
            .into(),
            Withdraw3 {
                signature_chain_id: "0x66eee".to_string(),
                hyperliquid_chain: "Testnet".to_string(),
                destination: "0x0d1d9635d0640821d15e323ac8adadfa9c111414".to_string(),
                amount: "3".to_string(),
                time: 1,
            }
            .into(),
            UsdClassTransfer {
                signature_chain_id: "0x66eee".to_string(),
                hyperliquid_chain: "Testnet".to_string(),
                amount: "4".to_string(),
                to_perp: true,
                nonce: 1,
            }
            .into(),
            ApproveAgent {
                signature_chain_id: "0x66eee".to_string(),
                hyperliquid_chain: "Testnet".to_string(),
                agent_address: H160::repeat_byte(0x11),
                agent_name: String::new(),
                nonce: 1,
            }
            .into(),
            ApproveBuilderFee {
                signature_chain_id: "0x66eee".to_string(),
                hyperliquid_chain: "Testnet".to_string(),
                max_fee_rate: "0.1%".to_string(),
                builder: "0xf5bc9107916b91a3ea5966cd2e51655d21b7eb02".to_string(),
                nonce: 1,
            }
            .into(),
        ];

        for action in actions {
            let fields = action.fields().unwrap();
            assert_eq!(fields["type"], json!(action.action_type()));
            for field in action.schema() {
                assert!(
                    fields.contains_key(&field.name),
                    "{} misses {}",
                    action.action_type(),
                    field.name
                );
            }
            let envelope = action.envelope().unwrap();
            assert_eq!(envelope.primary_type, action.primary_type());
            assert_eq!(envelope.domain.chain_id, Some(U256::from(421_614)));
            assert!(crate::signature::signing_hash(&envelope).is_ok());
        }
    }

    #[test]
    fn own_scope_only_for_usd_send_and_class_transfer() {
        assert!(UserSignedAction::from(usd_send()).carries_own_scope());
        assert!(!UserSignedAction::from(Withdraw3 {
            signature_chain_id: "0x66eee".to_string(),
            hyperliquid_chain: "Testnet".to_string(),
            destination: "0x00".to_string(),
            amount: "1".to_string(),
            time: 1,
        })
        .carries_own_scope());
    }

    #[test]
    fn custom_action_requires_chain_id() {
        let fields = json!({"hyperliquidChain": "Testnet", "code": "abc", "nonce": 9})
            .as_object()
            .cloned()
            .unwrap();
        let mut custom = CustomUserSignedAction {
            action_type: "setReferrer".to_string(),
            primary_type: "HyperliquidTransaction:SetReferrer".to_string(),
            schema: vec![
                typed_field("hyperliquidChain", "string"),
                typed_field("code", "string"),
                typed_field("nonce", "uint64"),
            ],
            fields,
        };
        assert!(matches!(
            UserSignedAction::Custom(custom.clone()).envelope(),
            Err(Error::MissingChainId)
        ));

        custom
            .fields
            .insert("signatureChainId".to_string(), json!("0xa4b1"));
        let action = UserSignedAction::Custom(custom);
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.starts_with(r#"{"type":"setReferrer""#));
        assert_eq!(
            action.envelope().unwrap().domain.chain_id,
            Some(U256::from(42_161))
        );
    }
}
