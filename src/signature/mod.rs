mod action_hash;
mod create_signature;
mod envelope;
mod signer;

pub use action_hash::action_hash;
pub use create_signature::{sign_digest, sign_envelope, sign_l1_action, sign_user_signed_action};
pub use envelope::{
    l1_envelope, parse_signature_chain_id, signing_hash, typed_field, user_signed_envelope,
    PhantomAgent, TypedDataEnvelope,
};
pub use signer::{DigestSigner, Signature};
