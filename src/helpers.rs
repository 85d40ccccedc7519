use std::str::FromStr;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    consts::{
        HASH_DECIMALS, LOCAL_API_URL, MAINNET_API_URL, MAX_DECIMALS_PERP, MAX_DECIMALS_SPOT,
        PRICE_SIG_FIGS, TESTNET_API_URL,
    },
    meta::AssetRegistry,
    prelude::*,
    Error,
};

/// Rounds `value` to `decimals` places, ties away from zero.
pub fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Rounds to `sig_figs` significant figures first, then to at most `max_decimals` places.
///
/// The order matters: for small prices the significant-figure pass keeps digits that the
/// decimal pass would otherwise be the one to cut.
pub fn round_to_significant_and_decimal(value: f64, sig_figs: usize, max_decimals: i32) -> f64 {
    let formatted = format!("{:.*e}", sig_figs.saturating_sub(1), value);
    let rounded = formatted.parse::<f64>().unwrap_or(value);
    round_to_decimals(rounded, max_decimals)
}

/// Price rounding the exchange accepts for `asset`: 5 significant figures, and no more than
/// 6 (perps) or 8 (spot) decimals minus the asset's size decimals.
pub fn adjust_price(price: f64, asset: u32, sz_decimals: u32) -> f64 {
    let max_decimals = if AssetRegistry::is_spot(asset) {
        MAX_DECIMALS_SPOT
    } else {
        MAX_DECIMALS_PERP
    };
    let decimals = max_decimals as i32 - sz_decimals as i32;
    round_to_significant_and_decimal(price, PRICE_SIG_FIGS, decimals)
}

/// Canonical decimal string used both on the wire and inside the action hash.
pub fn float_to_string_for_hashing(x: f64) -> String {
    let mut x = format!("{:.*}", HASH_DECIMALS, x);
    while x.ends_with('0') {
        x.pop();
    }
    if x.ends_with('.') {
        x.pop();
    }
    if x == "-0" {
        "0".to_string()
    } else {
        x
    }
}

pub fn float_to_int(x: f64, power: i32) -> i64 {
    (x * 10f64.powi(power)).round() as i64
}

pub fn slippage_price(px: f64, is_buy: bool, slippage: f64) -> f64 {
    if is_buy {
        px * (1.0 + slippage)
    } else {
        px * (1.0 - slippage)
    }
}

pub fn uuid_to_hex_string(uuid: Uuid) -> String {
    format!("0x{}", hex::encode(uuid.as_bytes()))
}

pub(crate) fn now_timestamp_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BaseUrl {
    Localhost,
    Testnet,
    Mainnet,
}

impl BaseUrl {
    pub fn get_url(&self) -> String {
        match self {
            BaseUrl::Mainnet => MAINNET_API_URL.to_string(),
            BaseUrl::Testnet => TESTNET_API_URL.to_string(),
            BaseUrl::Localhost => LOCAL_API_URL.to_string(),
        }
    }
}

impl FromStr for BaseUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(BaseUrl::Mainnet),
            "testnet" => Ok(BaseUrl::Testnet),
            "localhost" | "local" => Ok(BaseUrl::Localhost),
            other => Err(Error::Config(format!("unknown network {other:?}"))),
        }
    }
}
