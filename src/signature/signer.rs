use std::fmt;

use ethers::{
    signers::LocalWallet,
    types::{Signature as EthersSignature, H160, H256, U256},
};
use serde::{Deserialize, Serialize};

use crate::{prelude::*, Error};

/// Anything that can sign a raw 32-byte digest: a local key, a hardware wallet, a remote signer.
///
/// Implementations return the 65 bytes `r || s || v`, where `v` may be 0/1 or 27/28.
pub trait DigestSigner: Send + Sync {
    fn address(&self) -> H160;
    fn sign_digest(&self, digest: H256) -> Result<Vec<u8>>;
}

impl DigestSigner for LocalWallet {
    fn address(&self) -> H160 {
        ethers::signers::Signer::address(self)
    }

    fn sign_digest(&self, digest: H256) -> Result<Vec<u8>> {
        self.sign_hash(digest)
            .map(|signature| signature.to_vec())
            .map_err(|e| Error::SigningFailure(e.to_string()))
    }
}

impl<S: DigestSigner + ?Sized> DigestSigner for Box<S> {
    fn address(&self) -> H160 {
        (**self).address()
    }

    fn sign_digest(&self, digest: H256) -> Result<Vec<u8>> {
        (**self).sign_digest(digest)
    }
}

impl<S: DigestSigner + ?Sized> DigestSigner for std::sync::Arc<S> {
    fn address(&self) -> H160 {
        (**self).address()
    }

    fn sign_digest(&self, digest: H256) -> Result<Vec<u8>> {
        (**self).sign_digest(digest)
    }
}

/// Secp256k1 signature as the exchange accepts it, with `v` always 27 or 28.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub r: H256,
    pub s: H256,
    pub v: u8,
}

impl Signature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 65 {
            return Err(Error::InvalidSignatureLength(bytes.len()));
        }
        let v = match bytes[64] {
            v @ (0 | 1) => v + 27,
            v @ (27 | 28) => v,
            v => return Err(Error::InvalidRecoveryId(v)),
        };
        Ok(Signature {
            r: H256::from_slice(&bytes[..32]),
            s: H256::from_slice(&bytes[32..64]),
            v,
        })
    }

    /// 65 bytes with the recovery id as 0/1, the layout most secp256k1 libraries expect.
    pub fn to_bytes(&self) -> Result<[u8; 65]> {
        if !matches!(self.v, 27 | 28) {
            return Err(Error::InvalidRecoveryId(self.v));
        }
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(self.r.as_bytes());
        bytes[32..64].copy_from_slice(self.s.as_bytes());
        bytes[64] = self.v - 27;
        Ok(bytes)
    }

    /// Address that produced this signature over `digest`.
    pub fn recover(&self, digest: H256) -> Result<H160> {
        EthersSignature::from(*self)
            .recover(digest)
            .map_err(|e| Error::SigningFailure(e.to_string()))
    }
}

impl From<Signature> for EthersSignature {
    fn from(signature: Signature) -> Self {
        EthersSignature {
            r: U256::from_big_endian(signature.r.as_bytes()),
            s: U256::from_big_endian(signature.s.as_bytes()),
            v: signature.v as u64,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r: {:?}, s: {:?}, v: {}", self.r, self.s, self.v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::utils::keccak256;

    fn wallet() -> LocalWallet {
        "e908f86dbb4d55ac876378565aafeabc187f6690f046459397b17d9b9a19688e"
            .parse()
            .unwrap()
    }

    fn raw(v: u8) -> Vec<u8> {
        let mut bytes = vec![0x11; 32];
        bytes.extend([0x22; 32]);
        bytes.push(v);
        bytes
    }

    #[test]
    fn recovery_id_normalized_to_27_28() {
        assert_eq!(Signature::from_bytes(&raw(0)).unwrap().v, 27);
        assert_eq!(Signature::from_bytes(&raw(1)).unwrap().v, 28);
        assert_eq!(Signature::from_bytes(&raw(27)).unwrap().v, 27);
        assert_eq!(Signature::from_bytes(&raw(28)).unwrap().v, 28);
        assert_eq!(
            Signature::from_bytes(&raw(2)),
            Err(Error::InvalidRecoveryId(2))
        );
    }

    #[test]
    fn wrong_length_rejected() {
        assert_eq!(
            Signature::from_bytes(&[0u8; 64]),
            Err(Error::InvalidSignatureLength(64))
        );
        assert_eq!(
            Signature::from_bytes(&[0u8; 66]),
            Err(Error::InvalidSignatureLength(66))
        );
    }

    #[test]
    fn to_bytes_writes_zero_based_recovery_id() {
        let signature = Signature::from_bytes(&raw(28)).unwrap();
        let bytes = signature.to_bytes().unwrap();
        assert_eq!(bytes[64], 1);
        assert_eq!(&bytes[..64], &raw(28)[..64]);
        assert_eq!(Signature::from_bytes(&bytes).unwrap(), signature);

        let bad = Signature { v: 3, ..signature };
        assert_eq!(bad.to_bytes(), Err(Error::InvalidRecoveryId(3)));
    }

    #[test]
    fn serializes_as_hex_words() {
        let signature = Signature::from_bytes(&raw(27)).unwrap();
        let json = serde_json::to_value(signature).unwrap();
        assert_eq!(json["r"], format!("0x{}", "11".repeat(32)));
        assert_eq!(json["s"], format!("0x{}", "22".repeat(32)));
        assert_eq!(json["v"], 27);
    }

    #[test]
    fn local_wallet_signature_recovers_its_address() {
        let wallet = wallet();
        let digest = H256(keccak256(b"digest"));
        let signature = Signature::from_bytes(&wallet.sign_digest(digest).unwrap()).unwrap();
        assert!(matches!(signature.v, 27 | 28));
        assert_eq!(
            signature.recover(digest).unwrap(),
            DigestSigner::address(&wallet)
        );
    }

    #[test]
    fn boxed_signer_delegates() {
        let wallet = wallet();
        let boxed: Box<dyn DigestSigner> = Box::new(wallet.clone());
        let digest = H256(keccak256(b"boxed"));
        assert_eq!(boxed.address(), DigestSigner::address(&wallet));
        assert_eq!(
            boxed.sign_digest(digest).unwrap(),
            wallet.sign_digest(digest).unwrap()
        );
    }
}
