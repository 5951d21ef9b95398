//! Read-only tables loaded once at startup and queried by the engines.
//!
//! Neither table owns any trading logic: `SignalTable` answers
//! date/sequence-index lookups over a predicted-price series, and
//! `BenefitSchedule` hands out one per-instrument score vector per
//! rebalancing period.

pub mod benefits;
pub mod table;

pub use benefits::BenefitSchedule;
pub use table::{SignalRecord, SignalTable};
