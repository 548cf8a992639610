//! Balance store: account -> amount
//!
//! Accounts that were never credited, or whose balance returned to zero,
//! have no entry and read as zero.

use super::token::LedgerError;
use crate::crypto::Address;
use serde::Serialize;
use std::collections::HashMap;

/// Only built through `genesis` or `restore`, so the zero-entry rule holds
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct BalanceStore {
    balances: HashMap<Address, u128>,
}

impl BalanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the whole initial supply in one account
    pub fn genesis(account: &Address, supply: u128) -> Self {
        let mut store = Self::new();
        store.store(account, supply);
        store
    }

    /// Rebuild a store from saved entries, dropping zero balances
    pub fn restore(entries: impl IntoIterator<Item = (Address, u128)>) -> Self {
        let mut store = Self::new();
        for (account, balance) in entries {
            store.store(&account, balance);
        }
        store
    }

    /// Stored balance, zero for unknown accounts
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Decrease `account` by `amount`
    pub fn debit(&mut self, account: &Address, amount: u128) -> Result<(), LedgerError> {
        let have = self.balance_of(account);
        let remaining = have
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance { have, need: amount })?;
        self.store(account, remaining);
        Ok(())
    }

    /// Increase `account` by `amount`
    pub fn credit(&mut self, account: &Address, amount: u128) -> Result<(), LedgerError> {
        let updated = self.checked_credit(account, amount)?;
        self.store(account, updated);
        Ok(())
    }

    /// Balance `account` would hold after crediting `amount`, without writing
    pub fn checked_credit(&self, account: &Address, amount: u128) -> Result<u128, LedgerError> {
        self.balance_of(account)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)
    }

    /// All accounts with a positive balance
    pub fn holders(&self) -> impl Iterator<Item = (&Address, u128)> {
        self.balances.iter().map(|(address, balance)| (address, *balance))
    }

    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Sum of all balances, `None` if it does not fit in `u128`
    pub fn total(&self) -> Option<u128> {
        self.balances
            .values()
            .try_fold(0u128, |acc, balance| acc.checked_add(*balance))
    }

    fn store(&mut self, account: &Address, balance: u128) {
        if balance == 0 {
            self.balances.remove(account);
        } else {
            self.balances.insert(*account, balance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn test_unknown_account_is_zero() {
        let store = BalanceStore::new();
        assert_eq!(store.balance_of(&addr(1)), 0);
        assert_eq!(store.holder_count(), 0);
        assert_eq!(store.total(), Some(0));
    }

    #[test]
    fn test_genesis() {
        let store = BalanceStore::genesis(&addr(1), 1_000);
        assert_eq!(store.balance_of(&addr(1)), 1_000);
        assert_eq!(store.total(), Some(1_000));

        assert_eq!(BalanceStore::genesis(&addr(1), 0).holder_count(), 0);
    }

    #[test]
    fn test_restore_drops_zero_entries() {
        let store = BalanceStore::restore(vec![(addr(1), 40), (addr(2), 0)]);
        assert_eq!(store.holder_count(), 1);
        assert_eq!(store.balance_of(&addr(2)), 0);
        assert_eq!(store.total(), Some(40));
    }

    #[test]
    fn test_credit_and_debit() {
        let mut store = BalanceStore::new();
        store.credit(&addr(1), 500).unwrap();
        store.debit(&addr(1), 200).unwrap();

        assert_eq!(store.balance_of(&addr(1)), 300);
        assert_eq!(store.total(), Some(300));
    }

    #[test]
    fn test_debit_insufficient_leaves_balance() {
        let mut store = BalanceStore::new();
        store.credit(&addr(1), 100).unwrap();

        let result = store.debit(&addr(1), 101);
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { have: 100, need: 101 })
        ));
        assert_eq!(store.balance_of(&addr(1)), 100);
    }

    #[test]
    fn test_credit_overflow() {
        let mut store = BalanceStore::new();
        store.credit(&addr(1), u128::MAX).unwrap();

        assert!(matches!(store.credit(&addr(1), 1), Err(LedgerError::Overflow)));
        assert_eq!(store.balance_of(&addr(1)), u128::MAX);
    }

    #[test]
    fn test_zero_balance_is_not_a_holder() {
        let mut store = BalanceStore::new();
        store.credit(&addr(1), 10).unwrap();
        store.credit(&addr(2), 0).unwrap();
        assert_eq!(store.holder_count(), 1);

        store.debit(&addr(1), 10).unwrap();
        assert_eq!(store.holder_count(), 0);
        assert_eq!(store.holders().count(), 0);
    }
}
