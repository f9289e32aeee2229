use secp256k1::SecretKey;
use std::fmt::{Display, Formatter};

/// Length of a compressed secp256k1 public key.
pub const PUBLIC_KEY_BYTE_COUNT: usize = 33;

/// The owner of a transaction output.
/// Only the holder of the matching secret key can produce signatures that spend the output.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct PublicKey(secp256k1::PublicKey);

impl PublicKey {
    pub fn new(public_key: secp256k1::PublicKey) -> Self {
        Self(public_key)
    }

    pub fn from_secret_key(secret_key: &SecretKey) -> Self {
        Self(secp256k1::PublicKey::from_secret_key_global(secret_key))
    }

    /// Parses a compressed or uncompressed SEC1-encoded public key.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, secp256k1::Error> {
        secp256k1::PublicKey::from_slice(bytes).map(Self)
    }

    /// Returns the compressed SEC1 encoding, which is what gets signed over.
    pub fn serialize(&self) -> [u8; PUBLIC_KEY_BYTE_COUNT] {
        self.0.serialize()
    }

    pub fn inner(&self) -> &secp256k1::PublicKey {
        &self.0
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.serialize()))
    }
}
