//! Ledger notifications
//!
//! Every successful mutating call produces exactly one [`LedgerEvent`]. The
//! event is returned on the call's [`Receipt`] and also queued in the
//! ledger's outbox for consumers that drain in batches.

use crate::crypto::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transfer event (emitted by `transfer` and `transfer_from`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub amount: u128,
}

/// Approval event (emitted when an allowance is set)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalEvent {
    pub owner: Address,
    pub spender: Address,
    pub amount: u128,
}

/// A notification produced by the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    Transfer(TransferEvent),
    Approval(ApprovalEvent),
}

impl LedgerEvent {
    /// Event name as observers see it
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Transfer(_) => "Transfer",
            LedgerEvent::Approval(_) => "Approval",
        }
    }

    pub fn amount(&self) -> u128 {
        match self {
            LedgerEvent::Transfer(e) => e.amount,
            LedgerEvent::Approval(e) => e.amount,
        }
    }
}

impl From<TransferEvent> for LedgerEvent {
    fn from(event: TransferEvent) -> Self {
        LedgerEvent::Transfer(event)
    }
}

impl From<ApprovalEvent> for LedgerEvent {
    fn from(event: ApprovalEvent) -> Self {
        LedgerEvent::Approval(event)
    }
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerEvent::Transfer(e) => {
                write!(f, "Transfer {{ from: {}, to: {}, amount: {} }}", e.from, e.to, e.amount)
            }
            LedgerEvent::Approval(e) => write!(
                f,
                "Approval {{ owner: {}, spender: {}, amount: {} }}",
                e.owner, e.spender, e.amount
            ),
        }
    }
}

/// Outcome of a successful mutating call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Always `true`; failures are reported through `Err`
    pub success: bool,
    /// Notifications emitted by this call
    pub events: Vec<LedgerEvent>,
}

impl Receipt {
    pub(crate) fn single(event: LedgerEvent) -> Self {
        Self {
            success: true,
            events: vec![event],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_is_tagged() {
        let event = LedgerEvent::from(ApprovalEvent {
            owner: Address::ZERO,
            spender: Address::from_bytes([1; 20]),
            amount: 2_000,
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "Approval");
        assert_eq!(json["amount"], 2_000);
        assert_eq!(json["owner"], Address::ZERO.to_string());
    }

    #[test]
    fn test_event_name_and_amount() {
        let event = LedgerEvent::from(TransferEvent {
            from: Address::ZERO,
            to: Address::ZERO,
            amount: 7,
        });
        assert_eq!(event.name(), "Transfer");
        assert_eq!(event.amount(), 7);
        assert!(event.to_string().starts_with("Transfer {"));
    }

    #[test]
    fn test_receipt_single() {
        let receipt = Receipt::single(LedgerEvent::from(TransferEvent {
            from: Address::ZERO,
            to: Address::ZERO,
            amount: 0,
        }));
        assert!(receipt.success);
        assert_eq!(receipt.events.len(), 1);
    }
}
