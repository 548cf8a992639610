//! Token Ledger: a fixed-supply fungible token ledger in Rust
//!
//! This crate provides:
//! - ERC-20 style balances, allowances, transfer / approve / transfer-from
//! - Transfer and Approval notifications on receipts and a drainable outbox
//! - A lock-guarded shared handle for multi-threaded hosts
//! - secp256k1 identities with deterministic development accounts
//! - Environment-driven deployment and a JSON scripting harness
//!
//! # Example
//!
//! ```rust
//! use token_ledger::crypto::dev_accounts;
//! use token_ledger::token::{LedgerError, Token};
//!
//! let accounts = dev_accounts(3).unwrap();
//! let owner = accounts[0].address();
//! let alice = accounts[1].address();
//! let spender = accounts[2].address();
//!
//! let mut token = Token::new("Test Token S", "TTS", 18, 1_000_000, owner);
//! token.transfer(&owner, &alice, 5_000).unwrap();
//! token.approve(&alice, &spender, 3_000).unwrap();
//!
//! let err = token.transfer_from(&spender, &alice, &owner, 3_001).unwrap_err();
//! assert!(matches!(err, LedgerError::AllowanceExceeded { .. }));
//!
//! token.transfer_from(&spender, &alice, &owner, 3_000).unwrap();
//! assert_eq!(token.allowance(&alice, &spender), 0);
//! assert_eq!(token.drain_events().len(), 3);
//! ```

pub mod cli;
pub mod crypto;
pub mod deploy;
pub mod token;

// Re-export commonly used types
pub use crypto::{Address, KeyPair};
pub use deploy::{deploy, DeployConfig, Deployment};
pub use token::{LedgerError, LedgerEvent, Receipt, SharedToken, Token, TokenMetadata};
