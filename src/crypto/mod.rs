//! Identities for ledger participants
//!
//! This module provides:
//! - SHA-256 / HASH160 hashing
//! - secp256k1 key pairs and deterministic development accounts
//! - The fixed-width [`Address`] type used as account identity

pub mod address;
pub mod hash;
pub mod keys;

pub use address::{Address, AddressError, ADDRESS_LEN};
pub use hash::{hash160, sha256};
pub use keys::{dev_account, dev_accounts, public_key_to_address, KeyError, KeyPair};
