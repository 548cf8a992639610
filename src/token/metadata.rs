//! Token metadata
//!
//! Fixed at construction: nothing after `Token::new` can change it.

use crate::crypto::Address;
use serde::{Deserialize, Serialize};

/// Token metadata (immutable after creation)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenMetadata {
    /// Token name (e.g., "Test Token S")
    name: String,
    /// Token symbol (e.g., "TTS")
    symbol: String,
    /// Decimal places, for display scaling only
    decimals: u8,
    /// Total supply (fixed at creation)
    total_supply: u128,
    /// Identity credited with the whole supply at creation
    creator: Address,
}

impl TokenMetadata {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        total_supply: u128,
        creator: Address,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            total_supply,
            creator,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn creator(&self) -> &Address {
        &self.creator
    }

    /// Render an integer amount scaled by `decimals`
    ///
    /// `1_500` with 3 decimals renders as `"1.5"`; trailing zeros in the
    /// fractional part are dropped.
    pub fn format_amount(&self, amount: u128) -> String {
        let digits = amount.to_string();
        let decimals = self.decimals as usize;
        if decimals == 0 {
            return digits;
        }

        let padded = if digits.len() <= decimals {
            format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
        } else {
            digits
        };

        let (whole, fraction) = padded.split_at(padded.len() - decimals);
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, fraction)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(decimals: u8) -> TokenMetadata {
        TokenMetadata::new("Test Token S", "TTS", decimals, 1_000_000, Address::ZERO)
    }

    #[test]
    fn test_accessors() {
        let meta = metadata(18);
        assert_eq!(meta.name(), "Test Token S");
        assert_eq!(meta.symbol(), "TTS");
        assert_eq!(meta.decimals(), 18);
        assert_eq!(meta.total_supply(), 1_000_000);
        assert_eq!(meta.creator(), &Address::ZERO);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(metadata(0).format_amount(1_000), "1000");
        assert_eq!(metadata(3).format_amount(1_500), "1.5");
        assert_eq!(metadata(3).format_amount(2_000), "2");
        assert_eq!(metadata(3).format_amount(5), "0.005");
        assert_eq!(metadata(3).format_amount(0), "0");
        assert_eq!(metadata(18).format_amount(1_000_000), "0.000000000001");
    }
}
