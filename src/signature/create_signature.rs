use ethers::types::{transaction::eip712::Eip712DomainType, H256};
use log::debug;
use serde_json::{Map, Value};

use crate::{
    prelude::*,
    signature::{
        envelope::{signing_hash, user_signed_envelope, PhantomAgent, TypedDataEnvelope},
        signer::{DigestSigner, Signature},
    },
};

pub fn sign_digest(signer: &dyn DigestSigner, digest: H256) -> Result<Signature> {
    Signature::from_bytes(&signer.sign_digest(digest)?)
}

pub fn sign_envelope(signer: &dyn DigestSigner, envelope: &TypedDataEnvelope) -> Result<Signature> {
    let digest = signing_hash(envelope)?;
    debug!("signing {} digest {digest:?}", envelope.primary_type);
    sign_digest(signer, digest)
}

/// Signs the phantom agent wrapping `connection_id`.
pub fn sign_l1_action(
    signer: &dyn DigestSigner,
    connection_id: H256,
    is_mainnet: bool,
) -> Result<Signature> {
    sign_envelope(signer, &PhantomAgent::new(connection_id, is_mainnet).envelope())
}

pub fn sign_user_signed_action(
    signer: &dyn DigestSigner,
    primary_type: &str,
    schema: &[Eip712DomainType],
    action: &Map<String, Value>,
) -> Result<Signature> {
    sign_envelope(signer, &user_signed_envelope(primary_type, schema, action)?)
}
