pub mod config;
mod consts;
mod errors;
pub mod exchange;
mod helpers;
pub mod info;
mod meta;
mod nonce;
pub mod prelude;
mod req;
pub mod signature;
pub mod unsigned;

pub use config::ClientConfig;
pub use consts::{LOCAL_API_URL, MAINNET_API_URL, TESTNET_API_URL};
pub use errors::Error;
pub use exchange::*;
pub use helpers::{
    adjust_price, float_to_int, float_to_string_for_hashing, round_to_decimals,
    round_to_significant_and_decimal, slippage_price, uuid_to_hex_string, BaseUrl,
};
pub use info::InfoClient;
pub use meta::{AssetMeta, AssetRegistry, Meta, SpotAssetMeta, SpotMeta, TokenInfo};
pub use nonce::NonceManager;
pub use signature::{DigestSigner, PhantomAgent, Signature, TypedDataEnvelope};
pub use unsigned::{UnsignedTransactionBuilder, UnsignedTransactionComponents};
