use std::fmt;

use ethers::{signers::LocalWallet, types::H160};

use crate::{consts::DEFAULT_SIGNATURE_CHAIN_ID, prelude::*, BaseUrl, Error};

pub const PRIVATE_KEY_VAR: &str = "HL_PRIVATE_KEY";
pub const NETWORK_VAR: &str = "HL_NETWORK";
pub const VAULT_ADDRESS_VAR: &str = "HL_VAULT_ADDRESS";
pub const SIGNATURE_CHAIN_ID_VAR: &str = "HL_SIGNATURE_CHAIN_ID";

/// Client settings read from the environment.
#[derive(Clone)]
pub struct ClientConfig {
    /// Hex secp256k1 key, with or without `0x`.
    pub private_key: String,
    /// Defaults to testnet.
    pub network: BaseUrl,
    pub vault_address: Option<H160>,
    pub signature_chain_id: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("private_key", &"<redacted>")
            .field("network", &self.network)
            .field("vault_address", &self.vault_address)
            .field("signature_chain_id", &self.signature_chain_id)
            .finish()
    }
}

impl ClientConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let private_key = non_empty(PRIVATE_KEY_VAR)
            .ok_or_else(|| Error::Config(format!("{PRIVATE_KEY_VAR} not set")))?;
        let network = match non_empty(NETWORK_VAR) {
            Some(network) => network.parse()?,
            None => BaseUrl::Testnet,
        };
        let vault_address = non_empty(VAULT_ADDRESS_VAR)
            .map(|vault| {
                vault
                    .trim()
                    .parse::<H160>()
                    .map_err(|e| Error::Config(format!("{VAULT_ADDRESS_VAR}: {e}")))
            })
            .transpose()?;
        let signature_chain_id = non_empty(SIGNATURE_CHAIN_ID_VAR)
            .unwrap_or_else(|| DEFAULT_SIGNATURE_CHAIN_ID.to_string());

        Ok(ClientConfig {
            private_key,
            network,
            vault_address,
            signature_chain_id,
        })
    }

    pub fn wallet(&self) -> Result<LocalWallet> {
        self.private_key
            .trim()
            .trim_start_matches("0x")
            .parse()
            .map_err(|e: ethers::signers::WalletError| Error::PrivateKeyParse(e.to_string()))
    }
}
