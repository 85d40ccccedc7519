use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    exchange::order::{ClientOrderRequest, OrderRequest},
    helpers::uuid_to_hex_string,
    meta::AssetRegistry,
    prelude::*,
};

/// Which resting order to replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientOrderId {
    Oid(u64),
    Cloid(Uuid),
}

impl From<u64> for ClientOrderId {
    fn from(oid: u64) -> Self {
        ClientOrderId::Oid(oid)
    }
}

impl From<Uuid> for ClientOrderId {
    fn from(cloid: Uuid) -> Self {
        ClientOrderId::Cloid(cloid)
    }
}

/// An exchange order id, or a client order id in hex.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum OrderId {
    Oid(u64),
    Cloid(String),
}

impl From<ClientOrderId> for OrderId {
    fn from(id: ClientOrderId) -> Self {
        match id {
            ClientOrderId::Oid(oid) => OrderId::Oid(oid),
            ClientOrderId::Cloid(cloid) => OrderId::Cloid(uuid_to_hex_string(cloid)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientModifyRequest {
    pub oid: ClientOrderId,
    pub order: ClientOrderRequest,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ModifyRequest {
    pub oid: OrderId,
    pub order: OrderRequest,
}

impl ClientModifyRequest {
    pub fn convert(self, registry: &AssetRegistry) -> Result<ModifyRequest> {
        Ok(ModifyRequest {
            oid: self.oid.into(),
            order: self.order.convert(registry)?,
        })
    }
}
