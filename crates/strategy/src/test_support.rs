//! In-crate execution-client double for engine tests.

use anyhow::Result;
use async_trait::async_trait;
use rotor_core::ExecutionClient;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    TargetFraction { symbol: String, fraction: Decimal },
    MarketOrder { symbol: String, quantity: i64 },
    Liquidate { symbol: String, reason: Option<String> },
    LiquidateAll { reason: Option<String> },
}

#[derive(Default)]
pub struct RecordingClient {
    pub calls: Vec<Recorded>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_fractions(&self) -> Vec<(&str, Decimal)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Recorded::TargetFraction { symbol, fraction } => {
                    Some((symbol.as_str(), *fraction))
                }
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ExecutionClient for RecordingClient {
    async fn set_target_fraction(&mut self, symbol: &str, fraction: Decimal) -> Result<()> {
        self.calls.push(Recorded::TargetFraction {
            symbol: symbol.to_string(),
            fraction,
        });
        Ok(())
    }

    async fn market_order(&mut self, symbol: &str, quantity: i64) -> Result<String> {
        self.calls.push(Recorded::MarketOrder {
            symbol: symbol.to_string(),
            quantity,
        });
        Ok(format!("order-{}", self.calls.len()))
    }

    async fn liquidate(&mut self, symbol: &str, reason: Option<&str>) -> Result<()> {
        self.calls.push(Recorded::Liquidate {
            symbol: symbol.to_string(),
            reason: reason.map(String::from),
        });
        Ok(())
    }

    async fn liquidate_all(&mut self, reason: Option<&str>) -> Result<()> {
        self.calls.push(Recorded::LiquidateAll {
            reason: reason.map(String::from),
        });
        Ok(())
    }
}
