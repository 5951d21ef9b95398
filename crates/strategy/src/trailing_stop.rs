//! Per-instrument running-peak tracking and stop-breach detection.

use rust_decimal::Decimal;
use std::collections::HashMap;

/// A price fell far enough below its running peak to trigger an exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopBreach {
    pub symbol: String,
    pub price: Decimal,
    pub peak: Decimal,
}

/// Tracks the maximum observed price per instrument since the last reset.
///
/// Detection only — placing the exit order is the caller's job.
pub struct TrailingStopTracker {
    stop_fraction: Decimal,
    peaks: HashMap<String, Decimal>,
}

impl TrailingStopTracker {
    #[must_use]
    pub fn new(stop_fraction: Decimal) -> Self {
        Self {
            stop_fraction,
            peaks: HashMap::new(),
        }
    }

    /// Feeds one price observation.
    ///
    /// The first observation for a symbol seeds the peak and never breaches.
    /// Afterwards the peak ratchets up with the price, and a breach fires iff
    /// `price < peak * (1 - stop_fraction)`.
    pub fn update(&mut self, symbol: &str, price: Decimal) -> Option<StopBreach> {
        match self.peaks.get_mut(symbol) {
            None => {
                self.peaks.insert(symbol.to_string(), price);
                None
            }
            Some(peak) => {
                *peak = (*peak).max(price);
                if price < *peak * (Decimal::ONE - self.stop_fraction) {
                    Some(StopBreach {
                        symbol: symbol.to_string(),
                        price,
                        peak: *peak,
                    })
                } else {
                    None
                }
            }
        }
    }

    /// Clears one instrument back to uninitialized.
    pub fn reset(&mut self, symbol: &str) {
        self.peaks.remove(symbol);
    }

    /// Clears every instrument. Called on full liquidation.
    pub fn reset_all(&mut self) {
        self.peaks.clear();
    }

    /// Running peak for `symbol`, if it has been observed since the last reset.
    #[must_use]
    pub fn peak(&self, symbol: &str) -> Option<Decimal> {
        self.peaks.get(symbol).copied()
    }
}
