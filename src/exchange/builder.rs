use serde::{Deserialize, Serialize};

/// Builder code attached to an order batch.
///
/// The builder receives `fee` on every fill of the batch. The user must first approve a maximum
/// rate for this builder with `approveBuilderFee`, otherwise the exchange rejects the batch.
///
/// # Fee units
/// `fee` is in tenths of a basis point: `10` is 1 bp (0.01%), `100` is 10 bp (0.1%), which is
/// also the ceiling for perpetuals. Spot allows up to `1000`.
///
/// # Example
/// ```rust
/// use hl_signer::BuilderInfo;
///
/// let builder = BuilderInfo::new("0xF5Bc9107916B91A3Ea5966cd2e51655D21B7Eb02", 50);
/// assert_eq!(builder.builder, "0xf5bc9107916b91a3ea5966cd2e51655d21b7eb02");
/// ```
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BuilderInfo {
    /// Builder address, lower-case hex with `0x` prefix. It is hashed as given, so mixed case
    /// would produce a different digest than the exchange recomputes.
    #[serde(rename = "b")]
    pub builder: String,

    #[serde(rename = "f")]
    pub fee: u64,
}

impl BuilderInfo {
    pub fn new(builder: &str, fee: u64) -> Self {
        BuilderInfo {
            builder: builder.to_lowercase(),
            fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_wire_keys() {
        let builder = BuilderInfo::new("0xABCDEF0000000000000000000000000000000001", 10);
        assert_eq!(
            serde_json::to_string(&builder).unwrap(),
            r#"{"b":"0xabcdef0000000000000000000000000000000001","f":10}"#
        );
    }
}
