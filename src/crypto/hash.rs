//! Hashing utilities for account identities
//!
//! Provides SHA-256 and the RIPEMD160(SHA256(x)) digest used to derive
//! account addresses from public keys.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes RIPEMD160(SHA256(data)), a 20-byte digest
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let mut ripemd = Ripemd160::new();
    ripemd.update(sha256(data));

    let mut digest = [0u8; 20];
    digest.copy_from_slice(&ripemd.finalize());
    digest
}
