//! Option-chain snapshot types and the single open-position slot.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Contract right (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionRight {
    Call,
    Put,
}

impl std::fmt::Display for OptionRight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "C"),
            Self::Put => write!(f, "P"),
        }
    }
}

/// One row of the per-tick option-chain snapshot.
///
/// Supplied fresh by the execution collaborator on every tick and never
/// persisted; a contract is re-selected from scratch on each entry decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionContractSnapshot {
    pub symbol: String,
    pub strike: Decimal,
    pub expiry: NaiveDate,
    pub right: OptionRight,
    /// Underlying price as reported alongside this contract's quote.
    pub underlying_last_price: Decimal,
    pub ask_price: Decimal,
}

/// The at-most-one open options position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeldOption {
    pub symbol: String,
    pub expiry: NaiveDate,
}

/// Why an options position (or the whole portfolio) was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    TooCloseToExpiry,
    Exercised,
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooCloseToExpiry => write!(f, "Too close to expiration"),
            Self::Exercised => write!(f, "Option exercised"),
        }
    }
}
