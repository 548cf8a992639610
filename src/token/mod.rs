//! ERC-20 style fungible token ledger
//!
//! Provides a single fixed-supply ledger with:
//! - Balances per address
//! - Allowances for delegated transfers
//! - Transfer, approve and transfer-from operations
//! - Transfer/Approval notifications returned on receipts and queued for draining
//!
//! # Example
//!
//! ```
//! use token_ledger::crypto::Address;
//! use token_ledger::token::Token;
//!
//! let creator = Address::from_bytes([1; 20]);
//! let recipient = Address::from_bytes([2; 20]);
//!
//! let mut token = Token::new("Test Token S", "TTS", 18, 1_000_000, creator);
//! let receipt = token.transfer(&creator, &recipient, 1_000).unwrap();
//!
//! assert!(receipt.success);
//! assert_eq!(token.balance_of(&recipient), 1_000);
//! ```

pub mod allowances;
pub mod balances;
pub mod events;
pub mod metadata;
pub mod shared;
pub mod token;

pub use allowances::AllowanceStore;
pub use balances::BalanceStore;
pub use events::{ApprovalEvent, LedgerEvent, Receipt, TransferEvent};
pub use metadata::TokenMetadata;
pub use shared::SharedToken;
pub use token::{LedgerError, LedgerResult, Token};
