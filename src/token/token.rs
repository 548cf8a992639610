//! ERC-20 style ledger engine
//!
//! Holds the balance and allowance stores and applies `transfer`, `approve`
//! and `transfer_from` on behalf of an explicit caller. Every check runs
//! before the first write, so a failed call leaves no trace.

use super::allowances::AllowanceStore;
use super::balances::BalanceStore;
use super::events::{ApprovalEvent, LedgerEvent, Receipt, TransferEvent};
use super::metadata::TokenMetadata;
use crate::crypto::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Ledger errors
///
/// Display strings of the first two variants are the revert reasons callers
/// match on and must not change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Transfer amount exceeds balance")]
    InsufficientBalance { have: u128, need: u128 },
    #[error("Amount exceeds allowance")]
    AllowanceExceeded { have: u128, need: u128 },
    #[error("Arithmetic overflow")]
    Overflow,
    #[error("Supply mismatch: expected {expected}, found {actual}")]
    SupplyMismatch { expected: u128, actual: u128 },
}

impl LedgerError {
    /// Revert reason as reported to callers
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// A fungible token ledger with a fixed supply
///
/// Deserializing goes through `LedgerState` and rejects any state whose
/// balances do not add up to the total supply.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "LedgerState")]
pub struct Token {
    metadata: TokenMetadata,
    balances: BalanceStore,
    allowances: AllowanceStore,
    /// Notifications not yet drained by a consumer
    #[serde(skip)]
    outbox: Vec<LedgerEvent>,
}

/// Saved form of a ledger, checked before it becomes a `Token`
#[derive(Deserialize)]
struct LedgerState {
    metadata: TokenMetadata,
    #[serde(default)]
    balances: HashMap<Address, u128>,
    #[serde(default)]
    allowances: HashMap<Address, HashMap<Address, u128>>,
}

impl TryFrom<LedgerState> for Token {
    type Error = LedgerError;

    fn try_from(state: LedgerState) -> Result<Self, Self::Error> {
        let token = Self {
            metadata: state.metadata,
            balances: BalanceStore::restore(state.balances),
            allowances: AllowanceStore::restore(state.allowances),
            outbox: Vec::new(),
        };
        token.check_supply()?;
        Ok(token)
    }
}

impl Token {
    /// Create a new ledger with the whole supply credited to `creator`
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        initial_supply: u128,
        creator: Address,
    ) -> Self {
        Self::from_metadata(TokenMetadata::new(
            name,
            symbol,
            decimals,
            initial_supply,
            creator,
        ))
    }

    pub fn from_metadata(metadata: TokenMetadata) -> Self {
        let balances = BalanceStore::genesis(metadata.creator(), metadata.total_supply());

        log::debug!(
            "Ledger {} ({}) created with supply {} for {}",
            metadata.name(),
            metadata.symbol(),
            metadata.total_supply(),
            metadata.creator()
        );

        Self {
            metadata,
            balances,
            allowances: AllowanceStore::new(),
            outbox: Vec::new(),
        }
    }

    // =========================================================================
    // View Functions
    // =========================================================================

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        self.metadata.name()
    }

    pub fn symbol(&self) -> &str {
        self.metadata.symbol()
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals()
    }

    pub fn total_supply(&self) -> u128 {
        self.metadata.total_supply()
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.balance_of(account)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances.allowance_of(owner, spender)
    }

    /// Accounts with a positive balance, largest first
    pub fn holders(&self) -> Vec<(Address, u128)> {
        let mut holders: Vec<(Address, u128)> = self
            .balances
            .holders()
            .map(|(address, balance)| (*address, balance))
            .collect();
        holders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        holders
    }

    pub fn holder_count(&self) -> usize {
        self.balances.holder_count()
    }

    /// Verify that balances still add up to the total supply
    pub fn check_supply(&self) -> LedgerResult<()> {
        let expected = self.total_supply();
        let actual = self.balances.total().ok_or(LedgerError::Overflow)?;
        if actual != expected {
            return Err(LedgerError::SupplyMismatch { expected, actual });
        }
        Ok(())
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Notifications emitted since the last drain, oldest first
    pub fn pending_events(&self) -> &[LedgerEvent] {
        &self.outbox
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn emit(&mut self, event: LedgerEvent) -> Receipt {
        self.outbox.push(event.clone());
        Receipt::single(event)
    }

    // =========================================================================
    // Mutating Functions
    // =========================================================================

    /// Move `amount` from `caller` to `to`
    ///
    /// Self-transfers and zero amounts are legal and still emit an event.
    pub fn transfer(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: u128,
    ) -> LedgerResult<Receipt> {
        if let Err(e) = self.check_move(caller, to, amount) {
            log::debug!("transfer {} -> {} of {} rejected: {}", caller, to, amount, e);
            return Err(e);
        }

        self.apply_move(caller, to, amount)?;
        log::debug!("transfer {} -> {}: {}", caller, to, amount);

        Ok(self.emit(
            TransferEvent {
                from: *caller,
                to: *to,
                amount,
            }
            .into(),
        ))
    }

    /// Set the allowance `caller` grants to `spender`
    ///
    /// Overwrites any previous allowance; it does not add to it.
    pub fn approve(
        &mut self,
        caller: &Address,
        spender: &Address,
        amount: u128,
    ) -> LedgerResult<Receipt> {
        self.allowances.set(caller, spender, amount);
        log::debug!("approve {} for {}: {}", caller, spender, amount);

        Ok(self.emit(
            ApprovalEvent {
                owner: *caller,
                spender: *spender,
                amount,
            }
            .into(),
        ))
    }

    /// Move `amount` from `from` to `to`, spending `caller`'s allowance
    ///
    /// The allowance is checked before the balance, so an over-spend reports
    /// `AllowanceExceeded` even when `from` is also under-funded.
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> LedgerResult<Receipt> {
        let allowed = self.allowances.allowance_of(from, caller);
        let checked = if amount > allowed {
            Err(LedgerError::AllowanceExceeded {
                have: allowed,
                need: amount,
            })
        } else {
            self.check_move(from, to, amount)
        };
        if let Err(e) = checked {
            log::debug!(
                "transfer_from {} -> {} by {} of {} rejected: {}",
                from,
                to,
                caller,
                amount,
                e
            );
            return Err(e);
        }

        self.allowances.consume(from, caller, amount)?;
        self.apply_move(from, to, amount)?;
        log::debug!("transfer_from {} -> {} by {}: {}", from, to, caller, amount);

        Ok(self.emit(
            TransferEvent {
                from: *from,
                to: *to,
                amount,
            }
            .into(),
        ))
    }

    /// Validate a balance move without touching state
    fn check_move(&self, from: &Address, to: &Address, amount: u128) -> LedgerResult<()> {
        let have = self.balances.balance_of(from);
        if amount > have {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }
        if from != to {
            self.balances.checked_credit(to, amount)?;
        }
        Ok(())
    }

    /// Apply a move already accepted by `check_move`
    fn apply_move(&mut self, from: &Address, to: &Address, amount: u128) -> LedgerResult<()> {
        self.balances.debit(from, amount)?;
        self.balances.credit(to, amount)
    }
}
