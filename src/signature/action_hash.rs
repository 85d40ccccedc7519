use ethers::{
    types::{H160, H256},
    utils::keccak256,
};
use serde::Serialize;

use crate::{prelude::*, Error};

/// Digest an L1 action is signed under.
///
/// Layout: msgpack of the action with named fields in declaration order, the nonce as 8
/// big-endian bytes, then `0x00` without a vault or `0x01` followed by the 20 vault bytes.
/// An `expires_after` appends `0x00` and its 8 big-endian bytes.
pub fn action_hash<T: Serialize + ?Sized>(
    action: &T,
    nonce: u64,
    vault_address: Option<H160>,
    expires_after: Option<u64>,
) -> Result<H256> {
    let mut bytes =
        rmp_serde::to_vec_named(action).map_err(|e| Error::EncodingFailure(e.to_string()))?;
    bytes.extend(nonce.to_be_bytes());
    match vault_address {
        Some(vault_address) => {
            bytes.push(1);
            bytes.extend(vault_address.as_bytes());
        }
        None => bytes.push(0),
    }
    if let Some(expires_after) = expires_after {
        bytes.push(0);
        bytes.extend(expires_after.to_be_bytes());
    }
    Ok(H256(keccak256(bytes)))
}
