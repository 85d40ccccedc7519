use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // HTTP status errors surfaced from the transport
    #[error("Client error: status code: {status_code}, error code: {error_code:?}, error message: {error_message}, error data: {error_data:?}")]
    ClientRequest {
        status_code: u16,
        error_code: Option<u16>,
        error_message: String,
        error_data: Option<String>,
    },
    #[error("Server error: status code: {status_code}, error message: {error_message}")]
    ServerRequest {
        status_code: u16,
        error_message: String,
    },
    #[error("Transport error: {0:?}")]
    TransportFailure(String),
    #[error("Exchange rejected request: {0}")]
    ExchangeRejected(String),

    #[error("Unknown coin: {0}")]
    UnknownCoin(String),
    #[error("Invalid order type: {0}")]
    InvalidOrderType(String),
    #[error("No signatureChainId found in user-signed action")]
    MissingChainId,
    #[error("Invalid signatureChainId: {0:?}")]
    InvalidChainId(String),

    #[error("Signing failed: {0:?}")]
    SigningFailure(String),
    #[error("Signature must be 65 bytes, got {0}")]
    InvalidSignatureLength(usize),
    #[error("Invalid signature recovery id: {0}")]
    InvalidRecoveryId(u8),
    #[error("Canonical encoding failed: {0:?}")]
    EncodingFailure(String),

    #[error("Json parse error: {0:?}")]
    JsonParse(String),
    #[error("Private key parse error: {0:?}")]
    PrivateKeyParse(String),
    #[error("Configuration error: {0}")]
    Config(String),
}
