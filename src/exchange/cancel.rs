use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{helpers::uuid_to_hex_string, meta::AssetRegistry, prelude::*};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCancelRequest {
    pub asset: String,
    pub oid: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCancelRequestCloid {
    pub asset: String,
    pub cloid: Uuid,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CancelRequest {
    #[serde(rename = "a", alias = "asset")]
    pub asset: u32,
    #[serde(rename = "o", alias = "oid")]
    pub oid: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CancelRequestCloid {
    pub asset: u32,
    pub cloid: String,
}

impl ClientCancelRequest {
    pub fn convert(self, registry: &AssetRegistry) -> Result<CancelRequest> {
        Ok(CancelRequest {
            asset: registry.asset(&self.asset)?,
            oid: self.oid,
        })
    }
}

impl ClientCancelRequestCloid {
    pub fn convert(self, registry: &AssetRegistry) -> Result<CancelRequestCloid> {
        Ok(CancelRequestCloid {
            asset: registry.asset(&self.asset)?,
            cloid: uuid_to_hex_string(self.cloid),
        })
    }
}
