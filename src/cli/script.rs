//! Scripted ledger sessions
//!
//! A script is a JSON document listing operations to issue against one
//! ledger, each optionally carrying the outcome it expects:
//!
//! ```json
//! {
//!   "steps": [
//!     { "op": "transfer", "caller": "#0", "to": "#1", "amount": 5000 },
//!     { "op": "approve", "caller": "#1", "spender": "#2", "amount": 3000 },
//!     { "op": "transfer_from", "caller": "#2", "from": "#1", "to": "#3",
//!       "amount": 3001, "expect": "Amount exceeds allowance" },
//!     { "op": "balance_of", "account": "#3", "expect": 0 }
//!   ]
//! }
//! ```
//!
//! Accounts are either `#N` (development account N) or an address.

use crate::crypto::{dev_account, Address, AddressError, KeyError};
use crate::deploy::TokenParams;
use crate::token::{LedgerError, LedgerEvent, Receipt, SharedToken};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Script errors
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid account index: {0:?}")]
    InvalidIndex(String),
    #[error("Invalid account reference {0:?}: {1}")]
    Account(String, AddressError),
    #[error("Key error: {0}")]
    Key(#[from] KeyError),
}

/// A parsed script
#[derive(Clone, Debug, Deserialize)]
pub struct Script {
    /// Overrides for the deployed token's parameters
    #[serde(default)]
    pub token: Option<TokenParams>,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Resolve every account reference without touching a ledger
    pub fn validate(&self) -> Result<(), ScriptError> {
        for (index, step) in self.steps.iter().enumerate() {
            for account in step.accounts() {
                if let Err(e) = account.resolve() {
                    log::error!("Step {} ({}): {}", index, step.op(), e);
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

/// Reference to an account: `#N` or an address
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AccountRef(pub String);

impl AccountRef {
    pub fn resolve(&self) -> Result<Address, ScriptError> {
        let raw = self.0.trim();
        match raw.strip_prefix('#') {
            Some(index) => {
                let index: u32 = index
                    .parse()
                    .map_err(|_| ScriptError::InvalidIndex(raw.to_string()))?;
                Ok(dev_account(index)?.address())
            }
            None => raw
                .parse()
                .map_err(|e| ScriptError::Account(raw.to_string(), e)),
        }
    }
}

/// What a step is expected to produce
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expectation {
    /// Value returned by a query
    Value(u128),
    /// `"ok"` for success, otherwise the expected revert reason
    Outcome(String),
}

impl<'de> Deserialize<'de> for Expectation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ExpectationVisitor;

        impl<'de> Visitor<'de> for ExpectationVisitor {
            type Value = Expectation;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer or a string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Expectation, E> {
                Ok(Expectation::Value(v.into()))
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<Expectation, E> {
                Ok(Expectation::Value(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Expectation, E> {
                Ok(Expectation::Outcome(v.to_string()))
            }
        }

        deserializer.deserialize_any(ExpectationVisitor)
    }
}

/// Amounts may be written as JSON integers or as decimal strings, so values
/// above `u64::MAX` can still be expressed.
fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative integer or decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
            Ok(v.into())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
            v.trim()
                .replace('_', "")
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

/// One scripted operation
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Transfer {
        caller: AccountRef,
        to: AccountRef,
        #[serde(deserialize_with = "amount")]
        amount: u128,
        #[serde(default)]
        expect: Option<Expectation>,
    },
    Approve {
        caller: AccountRef,
        spender: AccountRef,
        #[serde(deserialize_with = "amount")]
        amount: u128,
        #[serde(default)]
        expect: Option<Expectation>,
    },
    TransferFrom {
        caller: AccountRef,
        from: AccountRef,
        to: AccountRef,
        #[serde(deserialize_with = "amount")]
        amount: u128,
        #[serde(default)]
        expect: Option<Expectation>,
    },
    BalanceOf {
        account: AccountRef,
        #[serde(default)]
        expect: Option<Expectation>,
    },
    Allowance {
        owner: AccountRef,
        spender: AccountRef,
        #[serde(default)]
        expect: Option<Expectation>,
    },
}

impl Step {
    pub fn op(&self) -> &'static str {
        match self {
            Step::Transfer { .. } => "transfer",
            Step::Approve { .. } => "approve",
            Step::TransferFrom { .. } => "transfer_from",
            Step::BalanceOf { .. } => "balance_of",
            Step::Allowance { .. } => "allowance",
        }
    }

    /// Account references named by the step, in field order
    pub fn accounts(&self) -> Vec<&AccountRef> {
        match self {
            Step::Transfer { caller, to, .. } => vec![caller, to],
            Step::Approve {
                caller, spender, ..
            } => vec![caller, spender],
            Step::TransferFrom {
                caller, from, to, ..
            } => vec![caller, from, to],
            Step::BalanceOf { account, .. } => vec![account],
            Step::Allowance { owner, spender, .. } => vec![owner, spender],
        }
    }

    fn expectation(&self) -> Option<&Expectation> {
        match self {
            Step::Transfer { expect, .. }
            | Step::Approve { expect, .. }
            | Step::TransferFrom { expect, .. }
            | Step::BalanceOf { expect, .. }
            | Step::Allowance { expect, .. } => expect.as_ref(),
        }
    }
}

/// Result of executing one step
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepResult {
    Success { success: bool },
    Value { value: u128 },
    Reverted { reason: String },
}

impl StepResult {
    fn from_call(result: Result<Receipt, LedgerError>) -> (Self, Vec<LedgerEvent>) {
        match result {
            Ok(receipt) => (
                StepResult::Success {
                    success: receipt.success,
                },
                receipt.events,
            ),
            Err(e) => (StepResult::Reverted { reason: e.reason() }, Vec::new()),
        }
    }

    fn satisfies(&self, expectation: &Expectation) -> bool {
        match (self, expectation) {
            (StepResult::Value { value }, Expectation::Value(expected)) => value == expected,
            (StepResult::Value { value }, Expectation::Outcome(text)) => {
                text.trim().parse::<u128>().ok() == Some(*value)
            }
            (StepResult::Success { success }, Expectation::Outcome(text)) => {
                *success && text.eq_ignore_ascii_case("ok")
            }
            (StepResult::Reverted { reason }, Expectation::Outcome(text)) => reason == text,
            _ => false,
        }
    }
}

/// Outcome of one step
#[derive(Clone, Debug, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub op: &'static str,
    pub result: StepResult,
    pub events: Vec<LedgerEvent>,
    /// `None` when the step carried no expectation
    pub expectation_met: Option<bool>,
}

/// Outcome of a whole script
#[derive(Clone, Debug, Serialize)]
pub struct ScriptReport {
    pub steps: Vec<StepOutcome>,
    /// Every notification drained from the ledger, in emission order
    pub events: Vec<LedgerEvent>,
    pub failed_expectations: usize,
    pub supply_ok: bool,
    /// Number of calls per operation
    pub operations: BTreeMap<&'static str, usize>,
}

impl ScriptReport {
    pub fn passed(&self) -> bool {
        self.failed_expectations == 0 && self.supply_ok
    }
}

/// Execute every step of `script` against `token`
///
/// Account references are resolved up front, so a malformed script fails
/// before the first step runs. A reverted step does not stop the run; it is
/// recorded and the next step executes against the unchanged ledger.
pub fn run_script(token: &SharedToken, script: &Script) -> Result<ScriptReport, ScriptError> {
    script.validate()?;

    let mut steps = Vec::with_capacity(script.steps.len());
    let mut operations = BTreeMap::new();
    let mut failed_expectations = 0;

    for (index, step) in script.steps.iter().enumerate() {
        let (result, events) = execute(token, step)?;
        *operations.entry(step.op()).or_insert(0) += 1;

        let expectation_met = step.expectation().map(|e| result.satisfies(e));
        if expectation_met == Some(false) {
            failed_expectations += 1;
            log::warn!(
                "Step {} ({}) did not meet its expectation: {:?}",
                index,
                step.op(),
                result
            );
        }

        steps.push(StepOutcome {
            index,
            op: step.op(),
            result,
            events,
            expectation_met,
        });
    }

    let supply_ok = match token.check_supply() {
        Ok(()) => true,
        Err(e) => {
            log::error!("Supply check failed: {}", e);
            false
        }
    };

    Ok(ScriptReport {
        steps,
        events: token.drain_events(),
        failed_expectations,
        supply_ok,
        operations,
    })
}

fn execute(
    token: &SharedToken,
    step: &Step,
) -> Result<(StepResult, Vec<LedgerEvent>), ScriptError> {
    let outcome = match step {
        Step::Transfer {
            caller, to, amount, ..
        } => StepResult::from_call(token.transfer(
            &caller.resolve()?,
            &to.resolve()?,
            *amount,
        )),
        Step::Approve {
            caller,
            spender,
            amount,
            ..
        } => StepResult::from_call(token.approve(
            &caller.resolve()?,
            &spender.resolve()?,
            *amount,
        )),
        Step::TransferFrom {
            caller,
            from,
            to,
            amount,
            ..
        } => StepResult::from_call(token.transfer_from(
            &caller.resolve()?,
            &from.resolve()?,
            &to.resolve()?,
            *amount,
        )),
        Step::BalanceOf { account, .. } => (
            StepResult::Value {
                value: token.balance_of(&account.resolve()?),
            },
            Vec::new(),
        ),
        Step::Allowance { owner, spender, .. } => (
            StepResult::Value {
                value: token.allowance(&owner.resolve()?, &spender.resolve()?),
            },
            Vec::new(),
        ),
    };
    Ok(outcome)
}
