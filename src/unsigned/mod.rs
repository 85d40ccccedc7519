//! Transaction preparation for signers outside this process: hardware wallets, browser wallets,
//! custody services. Prepare, sign `digest_to_sign` elsewhere, then post
//! `components.into_payload(signature)` with `ExchangeClient::post`.

mod builder;
mod components;

pub use builder::UnsignedTransactionBuilder;
pub use components::UnsignedTransactionComponents;
