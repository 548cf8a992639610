//! Thread-safe handle to a single ledger
//!
//! Mutating calls hold the write lock for the whole operation; reads share
//! the read lock. Every read therefore observes the state after some prefix
//! of completed operations.

use super::events::{LedgerEvent, Receipt};
use super::token::{LedgerResult, Token};
use crate::crypto::Address;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct SharedToken {
    inner: Arc<RwLock<Token>>,
}

impl SharedToken {
    pub fn new(token: Token) -> Self {
        Self {
            inner: Arc::new(RwLock::new(token)),
        }
    }

    pub fn name(&self) -> String {
        self.inner.read().name().to_string()
    }

    pub fn symbol(&self) -> String {
        self.inner.read().symbol().to_string()
    }

    pub fn decimals(&self) -> u8 {
        self.inner.read().decimals()
    }

    pub fn total_supply(&self) -> u128 {
        self.inner.read().total_supply()
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.inner.read().balance_of(account)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.inner.read().allowance(owner, spender)
    }

    pub fn transfer(
        &self,
        caller: &Address,
        to: &Address,
        amount: u128,
    ) -> LedgerResult<Receipt> {
        self.inner.write().transfer(caller, to, amount)
    }

    pub fn approve(
        &self,
        caller: &Address,
        spender: &Address,
        amount: u128,
    ) -> LedgerResult<Receipt> {
        self.inner.write().approve(caller, spender, amount)
    }

    pub fn transfer_from(
        &self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> LedgerResult<Receipt> {
        self.inner.write().transfer_from(caller, from, to, amount)
    }

    pub fn check_supply(&self) -> LedgerResult<()> {
        self.inner.read().check_supply()
    }

    pub fn drain_events(&self) -> Vec<LedgerEvent> {
        self.inner.write().drain_events()
    }

    /// Consistent copy of the whole ledger
    pub fn snapshot(&self) -> Token {
        self.inner.read().clone()
    }

    /// Run `f` against the ledger under one read lock
    pub fn with<R>(&self, f: impl FnOnce(&Token) -> R) -> R {
        f(&self.inner.read())
    }
}

impl From<Token> for SharedToken {
    fn from(token: Token) -> Self {
        Self::new(token)
    }
}
