use crate::{PublicKey, Sha256};
use secp256k1::{ecdsa, Message, SecretKey, SECP256K1};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// An opaque authorization signature carried by a transaction input.
/// The bytes are only interpreted by a `SignatureVerifier`.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0[..]
    }

    /// Signs the SHA-256 digest of the message with ECDSA over secp256k1 and
    /// returns the DER-encoded signature.
    pub fn sign(message: &[u8], secret_key: &SecretKey) -> Self {
        let digest = Message::from_digest(Sha256::digest(message).to_raw());
        let signature = SECP256K1.sign_ecdsa(&digest, secret_key);
        Self(signature.serialize_der().to_vec())
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

/// The cryptographic primitive used to authorize spends:
/// `verify(message, signature, public_key) -> bool`.
///
/// Implementations must never panic on malformed input. Anything that can't be parsed is
/// simply not a valid signature.
pub trait SignatureVerifier {
    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool;
}

/// Verifies DER-encoded ECDSA signatures over the SHA-256 digest of the message.
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256k1Verifier;

impl SignatureVerifier for Secp256k1Verifier {
    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
        let signature = match ecdsa::Signature::from_der(signature.as_slice()) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        let digest = Message::from_digest(Sha256::digest(message).to_raw());
        SECP256K1
            .verify_ecdsa(&digest, &signature, public_key.inner())
            .is_ok()
    }
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for &V {
    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
        (**self).verify(message, signature, public_key)
    }
}
