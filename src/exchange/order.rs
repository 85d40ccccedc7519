use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    consts::DEFAULT_SLIPPAGE,
    helpers::{
        adjust_price, float_to_string_for_hashing, round_to_decimals, slippage_price,
        uuid_to_hex_string,
    },
    meta::AssetRegistry,
    prelude::*,
    Error,
};

/// Time in force for a resting limit order.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tif {
    /// Post only.
    Alo,
    Ioc,
    Gtc,
}

impl FromStr for Tif {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Alo" => Ok(Tif::Alo),
            "Ioc" => Ok(Tif::Ioc),
            "Gtc" => Ok(Tif::Gtc),
            other => Err(Error::InvalidOrderType(format!("unknown tif {other:?}"))),
        }
    }
}

impl fmt::Display for Tif {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tif = match self {
            Tif::Alo => "Alo",
            Tif::Ioc => "Ioc",
            Tif::Gtc => "Gtc",
        };
        f.write_str(tif)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tpsl {
    Tp,
    Sl,
}

impl FromStr for Tpsl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tp" => Ok(Tpsl::Tp),
            "sl" => Ok(Tpsl::Sl),
            other => Err(Error::InvalidOrderType(format!("unknown tpsl {other:?}"))),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Limit {
    pub tif: Tif,
}

// field order is part of the hashed encoding
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub is_market: bool,
    pub trigger_px: String,
    pub tpsl: Tpsl,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Order {
    Limit(Limit),
    Trigger(Trigger),
}

/// Order as it goes on the wire and into the action hash.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(rename = "a", alias = "asset")]
    pub asset: u32,
    #[serde(rename = "b", alias = "isBuy")]
    pub is_buy: bool,
    #[serde(rename = "p", alias = "limitPx")]
    pub limit_px: String,
    #[serde(rename = "s", alias = "sz")]
    pub sz: String,
    #[serde(rename = "r", alias = "reduceOnly", default)]
    pub reduce_only: bool,
    #[serde(rename = "t", alias = "orderType")]
    pub order_type: Order,
    #[serde(rename = "c", alias = "cloid", skip_serializing_if = "Option::is_none")]
    pub cloid: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientLimit {
    pub tif: Tif,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientTrigger {
    pub is_market: bool,
    pub trigger_px: f64,
    pub tpsl: Tpsl,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientOrder {
    Limit(ClientLimit),
    Trigger(ClientTrigger),
}

/// Order type as loosely shaped input, e.g. decoded from a config file or a UI form.
///
/// Exactly one of `limit` and `trigger` must be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderTypeSpec {
    pub limit: Option<ClientLimit>,
    pub trigger: Option<ClientTrigger>,
}

impl TryFrom<OrderTypeSpec> for ClientOrder {
    type Error = Error;

    fn try_from(spec: OrderTypeSpec) -> Result<Self> {
        match (spec.limit, spec.trigger) {
            (Some(limit), None) => Ok(ClientOrder::Limit(limit)),
            (None, Some(trigger)) => Ok(ClientOrder::Trigger(trigger)),
            (None, None) => Err(Error::InvalidOrderType(
                "one of limit or trigger is required".to_string(),
            )),
            (Some(_), Some(_)) => Err(Error::InvalidOrderType(
                "limit and trigger are mutually exclusive".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientOrderRequest {
    pub asset: String,
    pub is_buy: bool,
    pub reduce_only: bool,
    pub limit_px: f64,
    pub sz: f64,
    pub cloid: Option<Uuid>,
    pub order_type: ClientOrder,
}

/// Inputs for an IOC order priced off a reference price.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketOrderParams {
    pub asset: String,
    pub is_buy: bool,
    pub sz: f64,
    /// Set to close or shrink a position without ever opening the other side.
    pub reduce_only: bool,
    /// Reference price; the current mid is used when absent.
    pub px: Option<f64>,
    /// Fraction, e.g. `0.05` for 5%.
    pub slippage: Option<f64>,
    pub cloid: Option<Uuid>,
}

impl MarketOrderParams {
    /// IOC limit order `slippage` through `reference_px`, against the trade direction.
    pub fn into_order(self, reference_px: f64) -> ClientOrderRequest {
        let slippage = self.slippage.unwrap_or(DEFAULT_SLIPPAGE);
        ClientOrderRequest {
            asset: self.asset,
            is_buy: self.is_buy,
            reduce_only: self.reduce_only,
            limit_px: slippage_price(reference_px, self.is_buy, slippage),
            sz: self.sz,
            cloid: self.cloid,
            order_type: ClientOrder::Limit(ClientLimit { tif: Tif::Ioc }),
        }
    }
}

impl ClientOrderRequest {
    /// Resolves the coin and canonicalizes price and size for its asset.
    pub fn convert(self, registry: &AssetRegistry) -> Result<OrderRequest> {
        let (asset, sz_decimals) = registry.resolve(&self.asset)?;
        let order_type = match self.order_type {
            ClientOrder::Limit(limit) => Order::Limit(Limit { tif: limit.tif }),
            ClientOrder::Trigger(trigger) => Order::Trigger(Trigger {
                is_market: trigger.is_market,
                trigger_px: float_to_string_for_hashing(trigger.trigger_px),
                tpsl: trigger.tpsl,
            }),
        };

        Ok(OrderRequest {
            asset,
            is_buy: self.is_buy,
            limit_px: float_to_string_for_hashing(adjust_price(self.limit_px, asset, sz_decimals)),
            sz: float_to_string_for_hashing(round_to_decimals(self.sz, sz_decimals as i32)),
            reduce_only: self.reduce_only,
            order_type,
            cloid: self.cloid.map(uuid_to_hex_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AssetRegistry {
        let mut registry = AssetRegistry::default();
        registry.insert("BTC", 0, 2);
        registry.insert("PURR/USDC", 10_000, 0);
        registry
    }

    fn limit_order(asset: &str, limit_px: f64, sz: f64) -> ClientOrderRequest {
        ClientOrderRequest {
            asset: asset.to_string(),
            is_buy: true,
            reduce_only: false,
            limit_px,
            sz,
            cloid: None,
            order_type: ClientOrder::Limit(ClientLimit { tif: Tif::Gtc }),
        }
    }

    #[test]
    fn limit_order_canonicalized_for_asset() {
        let order = limit_order("BTC", 1234.5678, 1.005).convert(&registry()).unwrap();
        assert_eq!(order.asset, 0);
        assert_eq!(order.limit_px, "1234.6");
        assert_eq!(order.sz, "1");
        assert_eq!(order.order_type, Order::Limit(Limit { tif: Tif::Gtc }));
    }

    #[test]
    fn spot_order_uses_spot_precision() {
        let order = limit_order("PURR/USDC", 0.123456, 12.7).convert(&registry()).unwrap();
        assert_eq!(order.asset, 10_000);
        assert_eq!(order.limit_px, "0.12346");
        assert_eq!(order.sz, "13");
    }

    #[test]
    fn unknown_coin_fails() {
        assert_eq!(
            limit_order("DOGE", 1.0, 1.0).convert(&registry()),
            Err(Error::UnknownCoin("DOGE".to_string()))
        );
    }

    #[test]
    fn wire_keys_and_order() {
        let cloid = Uuid::from_u128(0x0123456789abcdef0123456789abcdef);
        let mut request = limit_order("BTC", 100.0, 0.5);
        request.cloid = Some(cloid);
        let json = serde_json::to_string(&request.convert(&registry()).unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"a":0,"b":true,"p":"100","s":"0.5","r":false,"t":{"limit":{"tif":"Gtc"}},"c":"0x0123456789abcdef0123456789abcdef"}"#
        );

        let wire = limit_order("BTC", 100.0, 0.5).convert(&registry()).unwrap();
        let json = serde_json::to_string(&wire).unwrap();
        assert!(!json.contains("\"c\""));
    }

    #[test]
    fn trigger_wire_shape() {
        let request = ClientOrderRequest {
            order_type: ClientOrder::Trigger(ClientTrigger {
                is_market: true,
                trigger_px: 95.50,
                tpsl: Tpsl::Sl,
            }),
            ..limit_order("BTC", 95.0, 1.0)
        };
        let order = request.convert(&registry()).unwrap();
        assert_eq!(
            serde_json::to_value(&order.order_type).unwrap(),
            serde_json::json!({"trigger": {"isMarket": true, "triggerPx": "95.5", "tpsl": "sl"}})
        );
        let json = serde_json::to_string(&order.order_type).unwrap();
        assert!(json.find("isMarket") < json.find("triggerPx"));
        assert!(json.find("triggerPx") < json.find("tpsl"));
    }

    #[test]
    fn order_type_spec_requires_exactly_one_shape() {
        let limit = ClientLimit { tif: Tif::Ioc };
        let trigger = ClientTrigger {
            is_market: false,
            trigger_px: 10.0,
            tpsl: Tpsl::Tp,
        };

        assert_eq!(
            ClientOrder::try_from(OrderTypeSpec {
                limit: Some(limit),
                trigger: None
            }),
            Ok(ClientOrder::Limit(limit))
        );
        assert!(matches!(
            ClientOrder::try_from(OrderTypeSpec {
                limit: None,
                trigger: Some(trigger.clone())
            }),
            Ok(ClientOrder::Trigger(_))
        ));
        assert!(matches!(
            ClientOrder::try_from(OrderTypeSpec::default()),
            Err(Error::InvalidOrderType(_))
        ));
        assert!(matches!(
            ClientOrder::try_from(OrderTypeSpec {
                limit: Some(limit),
                trigger: Some(trigger)
            }),
            Err(Error::InvalidOrderType(_))
        ));
    }

    #[test]
    fn tif_and_tpsl_parse() {
        assert_eq!("Alo".parse::<Tif>().unwrap(), Tif::Alo);
        assert_eq!(Tif::Ioc.to_string(), "Ioc");
        assert!(matches!("GTC".parse::<Tif>(), Err(Error::InvalidOrderType(_))));
        assert_eq!("tp".parse::<Tpsl>().unwrap(), Tpsl::Tp);
        assert!(matches!("stop".parse::<Tpsl>(), Err(Error::InvalidOrderType(_))));
    }

    #[test]
    fn reduce_only_market_close_sells_through_the_reference() {
        let order = MarketOrderParams {
            asset: "BTC".to_string(),
            is_buy: false,
            sz: 0.5,
            reduce_only: true,
            px: None,
            slippage: Some(0.01),
            cloid: None,
        }
        .into_order(2000.0);
        assert!(order.reduce_only);
        assert_eq!(order.order_type, ClientOrder::Limit(ClientLimit { tif: Tif::Ioc }));

        let wire = order.convert(&registry()).unwrap();
        assert_eq!(wire.limit_px, "1980");
        assert_eq!(wire.sz, "0.5");
        assert!(wire.reduce_only);
    }
}
