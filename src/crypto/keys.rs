//! secp256k1 key management for ledger participants
//!
//! A participant's [`Address`] is derived from the compressed public key as
//! `RIPEMD160(SHA256(pubkey))`.

use rand::rngs::OsRng;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use thiserror::Error;

use super::address::Address;
use super::hash::{hash160, sha256};

/// Domain separator for deterministic development keys
const DEV_ACCOUNT_SEED: &[u8] = b"token-ledger dev account";

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a hex-encoded private key (optional `0x` prefix)
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let trimmed = hex_key.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Get the private key as a hex string
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Get the public key as a hex string (compressed format)
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    /// Ledger identity of this key pair
    pub fn address(&self) -> Address {
        public_key_to_address(&self.public_key)
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Convert a public key to a ledger address
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    Address::from_bytes(hash160(&public_key.serialize()))
}

/// Deterministic development key at `index`
///
/// Secret key is `SHA256(seed || index_be)`, so the same index always maps to
/// the same account across runs.
pub fn dev_account(index: u32) -> Result<KeyPair, KeyError> {
    let mut input = DEV_ACCOUNT_SEED.to_vec();
    input.extend_from_slice(&index.to_be_bytes());
    let secret_key = SecretKey::from_slice(&sha256(&input))?;
    Ok(KeyPair::from_secret_key(secret_key))
}

/// The first `count` development accounts
pub fn dev_accounts(count: u32) -> Result<Vec<KeyPair>, KeyError> {
    (0..count).map(dev_account).collect()
}
