pub const MAINNET_API_URL: &str = "https://api.hyperliquid.xyz";
pub const TESTNET_API_URL: &str = "https://api.hyperliquid-testnet.xyz";
pub const LOCAL_API_URL: &str = "http://localhost:3001";

// asset ids at or above this are spot pairs
pub(crate) const SPOT_ASSET_OFFSET: u32 = 10_000;
pub(crate) const MAX_DECIMALS_PERP: u32 = 6;
pub(crate) const MAX_DECIMALS_SPOT: u32 = 8;
pub(crate) const PRICE_SIG_FIGS: usize = 5;
pub(crate) const HASH_DECIMALS: usize = 8;
pub(crate) const USD_DECIMALS: i32 = 6;

pub(crate) const NONCE_STALENESS_MS: u64 = 300_000;

pub(crate) const L1_DOMAIN_NAME: &str = "Exchange";
pub(crate) const L1_CHAIN_ID: u64 = 1337;
pub(crate) const USER_SIGNED_DOMAIN_NAME: &str = "HyperliquidSignTransaction";
pub(crate) const DOMAIN_VERSION: &str = "1";
pub(crate) const MAINNET_SOURCE: &str = "a";
pub(crate) const TESTNET_SOURCE: &str = "b";
pub(crate) const SIGNATURE_CHAIN_ID_FIELD: &str = "signatureChainId";

pub(crate) const DEFAULT_SIGNATURE_CHAIN_ID: &str = "0x66eee";
pub(crate) const DEFAULT_SLIPPAGE: f64 = 0.05;
