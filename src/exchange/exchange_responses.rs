use serde::{Deserialize, Serialize};

use crate::{prelude::*, Error};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RestingOrder {
    pub oid: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilledOrder {
    pub total_sz: String,
    pub avg_px: String,
    pub oid: u64,
}

/// Outcome of one entry in a batch, in request order.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ExchangeDataStatus {
    Success,
    WaitingForFill,
    WaitingForTrigger,
    Error(String),
    Resting(RestingOrder),
    Filled(FilledOrder),
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ExchangeDataStatuses {
    pub statuses: Vec<ExchangeDataStatus>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ExchangeResponse {
    #[serde(rename = "type")]
    pub response_type: String,
    pub data: Option<ExchangeDataStatuses>,
}

impl ExchangeResponse {
    pub fn statuses(&self) -> &[ExchangeDataStatus] {
        self.data
            .as_ref()
            .map(|data| data.statuses.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(tag = "status", content = "response")]
pub enum ExchangeResponseStatus {
    Ok(ExchangeResponse),
    Err(String),
}

impl ExchangeResponseStatus {
    pub fn into_result(self) -> Result<ExchangeResponse> {
        match self {
            ExchangeResponseStatus::Ok(response) => Ok(response),
            ExchangeResponseStatus::Err(message) => Err(Error::ExchangeRejected(message)),
        }
    }
}
