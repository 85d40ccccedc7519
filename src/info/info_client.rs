use std::collections::HashMap;

use log::debug;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    meta::{AssetRegistry, Meta, SpotMeta},
    prelude::*,
    req::HttpClient,
    BaseUrl, Error,
};

#[derive(Serialize, Debug, Clone, Copy)]
#[serde(tag = "type", rename_all = "camelCase")]
enum InfoRequest {
    Meta,
    SpotMeta,
    AllMids,
}

/// Read-only `/info` queries the signing pipeline depends on: asset metadata and mid prices.
#[derive(Debug, Clone)]
pub struct InfoClient {
    pub http_client: HttpClient,
}

impl InfoClient {
    pub fn new(client: Option<Client>, base_url: Option<BaseUrl>) -> Self {
        InfoClient {
            http_client: HttpClient::new(client, base_url),
        }
    }

    async fn send_info_request<T: DeserializeOwned>(&self, info_request: InfoRequest) -> Result<T> {
        let data =
            serde_json::to_string(&info_request).map_err(|e| Error::JsonParse(e.to_string()))?;
        debug!("info request {data}");
        let return_data = self.http_client.post("/info", data).await?;
        serde_json::from_str(&return_data).map_err(|e| Error::JsonParse(e.to_string()))
    }

    pub async fn meta(&self) -> Result<Meta> {
        self.send_info_request(InfoRequest::Meta).await
    }

    pub async fn spot_meta(&self) -> Result<SpotMeta> {
        self.send_info_request(InfoRequest::SpotMeta).await
    }

    pub async fn all_mids(&self) -> Result<HashMap<String, String>> {
        self.send_info_request(InfoRequest::AllMids).await
    }

    /// Fetches perp and spot metadata and builds the registry. A supplied `meta` skips the
    /// perp metadata request.
    pub async fn asset_registry(&self, meta: Option<Meta>) -> Result<AssetRegistry> {
        let meta = match meta {
            Some(meta) => meta,
            None => self.meta().await?,
        };
        let spot_meta = self.spot_meta().await?;
        Ok(AssetRegistry::from_meta(&meta, Some(&spot_meta)))
    }
}
