use std::collections::HashMap;

use log::warn;
use serde::Deserialize;

use crate::{consts::SPOT_ASSET_OFFSET, prelude::*, Error};

#[derive(Deserialize, Debug, Clone)]
pub struct Meta {
    pub universe: Vec<AssetMeta>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AssetMeta {
    pub name: String,
    pub sz_decimals: u32,
    #[serde(default)]
    pub max_leverage: Option<u32>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SpotMeta {
    pub universe: Vec<SpotAssetMeta>,
    pub tokens: Vec<TokenInfo>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SpotAssetMeta {
    pub tokens: [usize; 2],
    pub name: String,
    pub index: usize,
    #[serde(default)]
    pub is_canonical: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub name: String,
    pub sz_decimals: u32,
    pub wei_decimals: u32,
    pub index: usize,
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub is_canonical: bool,
}

/// Coin symbol -> asset index and asset index -> size decimals.
///
/// Perpetuals take their position in the perp universe; spot pairs sit at `10000 + index`.
/// Built once when a client is created and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    coin_to_asset: HashMap<String, u32>,
    asset_to_sz_decimals: HashMap<u32, u32>,
}

impl AssetRegistry {
    pub fn from_meta(meta: &Meta, spot_meta: Option<&SpotMeta>) -> Self {
        let mut registry = Self::default();
        for (asset, asset_meta) in meta.universe.iter().enumerate() {
            registry.insert(&asset_meta.name, asset as u32, asset_meta.sz_decimals);
        }
        if let Some(spot_meta) = spot_meta {
            registry.add_spot_meta(spot_meta);
        }
        registry
    }

    fn add_spot_meta(&mut self, spot_meta: &SpotMeta) {
        for pair in &spot_meta.universe {
            let asset = SPOT_ASSET_OFFSET + pair.index as u32;
            let (Some(base), Some(quote)) = (
                spot_meta.tokens.get(pair.tokens[0]),
                spot_meta.tokens.get(pair.tokens[1]),
            ) else {
                warn!("spot pair {} references unknown tokens {:?}", pair.name, pair.tokens);
                continue;
            };
            self.insert(&pair.name, asset, base.sz_decimals);
            self.coin_to_asset
                .entry(format!("{}/{}", base.name, quote.name))
                .or_insert(asset);
        }
    }

    pub fn insert(&mut self, coin: &str, asset: u32, sz_decimals: u32) {
        self.coin_to_asset.insert(coin.to_string(), asset);
        self.asset_to_sz_decimals.insert(asset, sz_decimals);
    }

    pub fn asset(&self, coin: &str) -> Result<u32> {
        self.coin_to_asset
            .get(coin)
            .copied()
            .ok_or_else(|| Error::UnknownCoin(coin.to_string()))
    }

    pub fn sz_decimals(&self, asset: u32) -> Option<u32> {
        self.asset_to_sz_decimals.get(&asset).copied()
    }

    /// Asset index and size decimals for `coin`.
    pub fn resolve(&self, coin: &str) -> Result<(u32, u32)> {
        let asset = self.asset(coin)?;
        let sz_decimals = self
            .sz_decimals(asset)
            .ok_or_else(|| Error::UnknownCoin(coin.to_string()))?;
        Ok((asset, sz_decimals))
    }

    pub fn is_spot(asset: u32) -> bool {
        asset >= SPOT_ASSET_OFFSET
    }

    pub fn len(&self) -> usize {
        self.coin_to_asset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coin_to_asset.is_empty()
    }
}
