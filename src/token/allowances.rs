//! Allowance store: (owner, spender) -> amount
//!
//! Entries are independent per pair. A missing entry is an allowance of zero.

use super::token::LedgerError;
use crate::crypto::Address;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct AllowanceStore {
    /// owner -> (spender -> amount)
    allowances: HashMap<Address, HashMap<Address, u128>>,
}

impl AllowanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from saved `owner -> spender -> amount` entries
    pub fn restore(entries: HashMap<Address, HashMap<Address, u128>>) -> Self {
        let mut store = Self::new();
        for (owner, spenders) in entries {
            for (spender, amount) in spenders {
                store.set(&owner, &spender, amount);
            }
        }
        store
    }

    pub fn allowance_of(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Overwrite the allowance; zero clears the entry
    pub fn set(&mut self, owner: &Address, spender: &Address, amount: u128) {
        if amount == 0 {
            if let Some(spenders) = self.allowances.get_mut(owner) {
                spenders.remove(spender);
                if spenders.is_empty() {
                    self.allowances.remove(owner);
                }
            }
            return;
        }

        self.allowances
            .entry(*owner)
            .or_default()
            .insert(*spender, amount);
    }

    /// Spend `amount` of the allowance `owner` granted to `spender`
    pub fn consume(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let have = self.allowance_of(owner, spender);
        let remaining = have
            .checked_sub(amount)
            .ok_or(LedgerError::AllowanceExceeded { have, need: amount })?;
        self.set(owner, spender, remaining);
        Ok(())
    }

    /// Number of non-zero (owner, spender) entries
    pub fn len(&self) -> usize {
        self.allowances.values().map(HashMap::len).sum()
    }

    /// True when no allowance is outstanding
    pub fn is_empty(&self) -> bool {
        self.allowances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn test_default_is_zero() {
        let store = AllowanceStore::new();
        assert_eq!(store.allowance_of(&addr(1), &addr(2)), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_overwrites() {
        let mut store = AllowanceStore::new();
        store.set(&addr(1), &addr(2), 5_000);
        store.set(&addr(1), &addr(2), 3_000);
        assert_eq!(store.allowance_of(&addr(1), &addr(2)), 3_000);

        store.set(&addr(1), &addr(2), 0);
        assert_eq!(store.allowance_of(&addr(1), &addr(2)), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_pairs_are_independent() {
        let mut store = AllowanceStore::new();
        store.set(&addr(1), &addr(2), 100);
        store.set(&addr(1), &addr(3), 200);
        store.set(&addr(2), &addr(1), 300);

        store.set(&addr(1), &addr(2), 0);
        assert_eq!(store.allowance_of(&addr(1), &addr(3)), 200);
        assert_eq!(store.allowance_of(&addr(2), &addr(1)), 300);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_consume() {
        let mut store = AllowanceStore::new();
        store.set(&addr(1), &addr(2), 3_000);

        store.consume(&addr(1), &addr(2), 1_000).unwrap();
        assert_eq!(store.allowance_of(&addr(1), &addr(2)), 2_000);

        let result = store.consume(&addr(1), &addr(2), 2_001);
        assert!(matches!(
            result,
            Err(LedgerError::AllowanceExceeded { have: 2_000, need: 2_001 })
        ));
        assert_eq!(store.allowance_of(&addr(1), &addr(2)), 2_000);

        store.consume(&addr(1), &addr(2), 2_000).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_restore_drops_zero_entries() {
        let mut saved = HashMap::new();
        saved.insert(addr(1), HashMap::from([(addr(2), 70), (addr(3), 0)]));
        saved.insert(addr(4), HashMap::from([(addr(5), 0)]));

        let store = AllowanceStore::restore(saved);
        assert_eq!(store.len(), 1);
        assert_eq!(store.allowance_of(&addr(1), &addr(2)), 70);
        assert_eq!(store.allowance_of(&addr(4), &addr(5)), 0);
    }
}
