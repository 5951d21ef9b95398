use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for the sector rotation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Fixed, ordered instrument universe. Benefit vectors are positional:
    /// component `i` always refers to `universe[i]`.
    pub universe: Vec<String>,
    /// Trailing stop distance as a fraction of the running peak
    /// (0.15 = exit when price drops 15% below the peak).
    pub stop_fraction: Decimal,
    /// Whether a stop-loss re-rotation consumes the next period's benefit
    /// vector instead of re-weighting the current one. Defaults to `false`:
    /// a mid-month exit redistributes the current vector in place.
    pub advance_period_on_stop: bool,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            universe: vec!["JETS".to_string(), "XOP".to_string(), "BDRY".to_string()],
            stop_fraction: Decimal::new(15, 2),
            advance_period_on_stop: false,
        }
    }
}

/// Configuration for the options entry/exit manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsEntryConfig {
    /// Underlying equity symbol.
    pub underlying: String,
    /// How many sequence indexes ahead to read the predicted price.
    /// 20 trading days approximates one calendar month.
    pub lookahead_periods: i64,
    /// Multiplier applied to the live price before comparing against the
    /// prediction. The prediction table was fit on pre-split prices, so the
    /// live price is scaled onto the same basis (0.25 = a 4:1 split).
    pub price_basis_scale: Decimal,
    /// Fraction of total portfolio value targeted per entry.
    pub allocation_fraction: Decimal,
    /// Divisor applied after the ask-price division when sizing; standard US
    /// equity options carry a 100-share multiplier.
    pub contract_multiplier: Decimal,
    /// Exit when `today + expiry_buffer_days` passes the contract expiry.
    pub expiry_buffer_days: i64,
}

impl Default for OptionsEntryConfig {
    fn default() -> Self {
        Self {
            underlying: "NVDA".to_string(),
            lookahead_periods: 20,
            price_basis_scale: Decimal::new(25, 2),
            allocation_fraction: Decimal::new(5, 2),
            contract_multiplier: Decimal::from(100),
            expiry_buffer_days: 4,
        }
    }
}
