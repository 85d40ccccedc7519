use ethers::types::{H160, H256, U256};
use serde_json::Value;

use crate::{
    exchange::{Action, ExchangePayload},
    prelude::*,
    signature::{
        sign_digest, signing_hash, DigestSigner, PhantomAgent, Signature, TypedDataEnvelope,
    },
    Error,
};

/// Everything an external signer needs, and everything needed afterwards to post the result.
#[derive(Debug, Clone)]
pub struct UnsignedTransactionComponents {
    pub action: Action,
    pub nonce: u64,
    pub digest_to_sign: H256,
    /// Typed data behind `digest_to_sign`, for wallets that sign EIP-712 structures themselves.
    pub envelope: TypedDataEnvelope,

    pub vault_address: Option<H160>,
    pub expires_after: Option<u64>,
    pub eip712_domain_chain_id: Option<U256>, // 1337 for the L1 agent, the declared chain otherwise
    pub eip712_hyperliquid_chain_name: Option<String>, // "Mainnet" or "Testnet", user-signed only
    pub is_l1_agent_signature: bool,
}

impl UnsignedTransactionComponents {
    pub fn prepare(
        action: Action,
        nonce: u64,
        vault_address: Option<H160>,
        expires_after: Option<u64>,
        is_mainnet: bool,
    ) -> Result<Self> {
        let vault_address = if action.carries_own_scope() {
            None
        } else {
            vault_address
        };

        let (envelope, is_l1_agent_signature) = match &action {
            Action::L1(l1_action) => {
                let connection_id = l1_action.hash(nonce, vault_address, expires_after)?;
                (PhantomAgent::new(connection_id, is_mainnet).envelope(), true)
            }
            Action::UserSigned(user_signed) => (user_signed.envelope()?, false),
        };
        let digest_to_sign = signing_hash(&envelope)?;

        let eip712_hyperliquid_chain_name = envelope
            .message
            .get("hyperliquidChain")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(UnsignedTransactionComponents {
            eip712_domain_chain_id: envelope.domain.chain_id,
            eip712_hyperliquid_chain_name,
            action,
            nonce,
            digest_to_sign,
            envelope,
            vault_address,
            expires_after,
            is_l1_agent_signature,
        })
    }

    pub fn sign(&self, signer: &dyn DigestSigner) -> Result<Signature> {
        sign_digest(signer, self.digest_to_sign)
    }

    pub fn into_payload(self, signature: Signature) -> ExchangePayload {
        ExchangePayload {
            action: self.action,
            signature,
            nonce: self.nonce,
            vault_address: self.vault_address,
            expires_after: self.expires_after,
        }
    }

    /// The `action` field of the final payload.
    pub fn action_payload_json(&self) -> Result<Value> {
        serde_json::to_value(&self.action).map_err(|e| Error::JsonParse(e.to_string()))
    }
}
