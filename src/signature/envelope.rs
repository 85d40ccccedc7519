use std::collections::BTreeMap;

use ethers::types::{
    transaction::eip712::{EIP712Domain, Eip712, Eip712DomainType, TypedData},
    H160, H256, U256,
};
use serde_json::{Map, Value};

use crate::{
    consts::{
        DOMAIN_VERSION, L1_CHAIN_ID, L1_DOMAIN_NAME, MAINNET_SOURCE, SIGNATURE_CHAIN_ID_FIELD,
        TESTNET_SOURCE, USER_SIGNED_DOMAIN_NAME,
    },
    prelude::*,
    Error,
};

/// EIP-712 typed data: domain, named schemas, primary type and message.
pub type TypedDataEnvelope = TypedData;

const AGENT_PRIMARY_TYPE: &str = "Agent";
const DOMAIN_TYPE: &str = "EIP712Domain";

/// Network discriminator plus action digest, signed in place of the action itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhantomAgent {
    pub source: String,
    pub connection_id: H256,
}

impl PhantomAgent {
    pub fn new(connection_id: H256, is_mainnet: bool) -> Self {
        let source = if is_mainnet {
            MAINNET_SOURCE
        } else {
            TESTNET_SOURCE
        };
        PhantomAgent {
            source: source.to_string(),
            connection_id,
        }
    }

    pub fn envelope(&self) -> TypedDataEnvelope {
        l1_envelope(self)
    }
}

pub fn typed_field(name: &str, r#type: &str) -> Eip712DomainType {
    Eip712DomainType {
        name: name.to_string(),
        r#type: r#type.to_string(),
    }
}

fn domain_types() -> Vec<Eip712DomainType> {
    vec![
        typed_field("name", "string"),
        typed_field("version", "string"),
        typed_field("chainId", "uint256"),
        typed_field("verifyingContract", "address"),
    ]
}

fn domain(name: &str, chain_id: U256) -> EIP712Domain {
    EIP712Domain {
        name: Some(name.to_string()),
        version: Some(DOMAIN_VERSION.to_string()),
        chain_id: Some(chain_id),
        verifying_contract: Some(H160::zero()),
        salt: None,
    }
}

/// Envelope for order, cancel, leverage, margin and vault actions.
pub fn l1_envelope(agent: &PhantomAgent) -> TypedDataEnvelope {
    let types = BTreeMap::from([
        (
            AGENT_PRIMARY_TYPE.to_string(),
            vec![
                typed_field("source", "string"),
                typed_field("connectionId", "bytes32"),
            ],
        ),
        (DOMAIN_TYPE.to_string(), domain_types()),
    ]);
    let message = BTreeMap::from([
        ("source".to_string(), Value::String(agent.source.clone())),
        (
            "connectionId".to_string(),
            Value::String(format!("{:?}", agent.connection_id)),
        ),
    ]);

    TypedData {
        domain: domain(L1_DOMAIN_NAME, U256::from(L1_CHAIN_ID)),
        types,
        primary_type: AGENT_PRIMARY_TYPE.to_string(),
        message,
    }
}

/// Envelope for actions signed over their own fields.
///
/// `signatureChainId` must be present in `action`; it becomes the domain chain id and is left
/// out of the signed message. The schema fixes which fields are signed and in what order.
pub fn user_signed_envelope(
    primary_type: &str,
    schema: &[Eip712DomainType],
    action: &Map<String, Value>,
) -> Result<TypedDataEnvelope> {
    let chain_id = action
        .get(SIGNATURE_CHAIN_ID_FIELD)
        .ok_or(Error::MissingChainId)
        .and_then(parse_signature_chain_id)?;

    let message = action
        .iter()
        .filter(|(key, _)| key.as_str() != SIGNATURE_CHAIN_ID_FIELD)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    let types = BTreeMap::from([
        (primary_type.to_string(), schema.to_vec()),
        (DOMAIN_TYPE.to_string(), domain_types()),
    ]);

    Ok(TypedData {
        domain: domain(USER_SIGNED_DOMAIN_NAME, chain_id),
        types,
        primary_type: primary_type.to_string(),
        message,
    })
}

/// Accepts `"0x"`-prefixed hex, a decimal string, or a JSON integer.
pub fn parse_signature_chain_id(value: &Value) -> Result<U256> {
    let invalid = || Error::InvalidChainId(value.to_string());
    match value {
        Value::String(s) => {
            let s = s.trim();
            match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some("") => Err(invalid()),
                Some(hex) => U256::from_str_radix(hex, 16).map_err(|_| invalid()),
                None if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                    U256::from_dec_str(s).map_err(|_| invalid())
                }
                None => Err(invalid()),
            }
        }
        Value::Number(n) => n.as_u64().map(U256::from).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// `keccak256(0x1901 || domainSeparator || hashStruct(message))`.
pub fn signing_hash(envelope: &TypedDataEnvelope) -> Result<H256> {
    envelope
        .encode_eip712()
        .map(H256)
        .map_err(|e| Error::EncodingFailure(e.to_string()))
}
