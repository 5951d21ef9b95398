//! Decision engines: monthly sector rotation with a trailing stop, and a
//! single-leg options entry/exit state machine driven by a prediction table.
//!
//! Both engines are event-driven and synchronous per event: every tick,
//! schedule trigger, or settlement notification is fully processed before
//! the next one arrives. Orders go out through
//! [`rotor_core::ExecutionClient`]; no fills or accounting live here.

pub mod allocation;
pub mod options_entry;
pub mod rotation;
pub mod trailing_stop;
pub mod types;

pub use allocation::normalize_weights;
pub use options_entry::{OptionsPositionManager, OptionsTick};
pub use rotation::RotationEngine;
pub use trailing_stop::{StopBreach, TrailingStopTracker};
pub use types::{CloseReason, HeldOption, OptionContractSnapshot, OptionRight};

#[cfg(test)]
pub(crate) mod test_support;
