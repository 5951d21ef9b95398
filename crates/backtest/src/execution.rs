//! Simulated execution collaborator for backtests and integration tests.

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

use rotor_core::ExecutionClient;

/// One instruction received from an engine, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderRecord {
    TargetFraction {
        symbol: String,
        fraction: Decimal,
    },
    MarketOrder {
        order_id: String,
        symbol: String,
        quantity: i64,
    },
    Liquidate {
        symbol: String,
        reason: Option<String>,
    },
    LiquidateAll {
        reason: Option<String>,
    },
}

/// Records every instruction and tracks the current target-fraction book.
///
/// No fill modelling: the engines under test only decide, they never read
/// fills back, so a faithful order log is the whole simulation.
#[derive(Default)]
pub struct SimulatedExecutionClient {
    records: Vec<OrderRecord>,
    target_fractions: HashMap<String, Decimal>,
}

impl SimulatedExecutionClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All instructions received so far, oldest first.
    #[must_use]
    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    /// Current requested fraction for `symbol`, if any order set one.
    #[must_use]
    pub fn target_fraction(&self, symbol: &str) -> Option<Decimal> {
        self.target_fractions.get(symbol).copied()
    }

    pub fn clear_records(&mut self) {
        self.records.clear();
    }
}

#[async_trait]
impl ExecutionClient for SimulatedExecutionClient {
    async fn set_target_fraction(&mut self, symbol: &str, fraction: Decimal) -> Result<()> {
        debug!(symbol, fraction = %fraction, "Simulated target fraction");
        self.target_fractions.insert(symbol.to_string(), fraction);
        self.records.push(OrderRecord::TargetFraction {
            symbol: symbol.to_string(),
            fraction,
        });
        Ok(())
    }

    async fn market_order(&mut self, symbol: &str, quantity: i64) -> Result<String> {
        let order_id = uuid::Uuid::new_v4().to_string();
        debug!(symbol, quantity, order_id, "Simulated market order");
        self.records.push(OrderRecord::MarketOrder {
            order_id: order_id.clone(),
            symbol: symbol.to_string(),
            quantity,
        });
        Ok(order_id)
    }

    async fn liquidate(&mut self, symbol: &str, reason: Option<&str>) -> Result<()> {
        debug!(symbol, reason, "Simulated liquidation");
        self.target_fractions.insert(symbol.to_string(), Decimal::ZERO);
        self.records.push(OrderRecord::Liquidate {
            symbol: symbol.to_string(),
            reason: reason.map(String::from),
        });
        Ok(())
    }

    async fn liquidate_all(&mut self, reason: Option<&str>) -> Result<()> {
        debug!(reason, "Simulated full liquidation");
        self.target_fractions.clear();
        self.records.push(OrderRecord::LiquidateAll {
            reason: reason.map(String::from),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn tracks_target_fraction_book() {
        let mut exec = SimulatedExecutionClient::new();
        exec.set_target_fraction("JETS", dec!(0.5)).await.unwrap();
        exec.set_target_fraction("XOP", dec!(-0.5)).await.unwrap();
        assert_eq!(exec.target_fraction("JETS"), Some(dec!(0.5)));
        assert_eq!(exec.target_fraction("XOP"), Some(dec!(-0.5)));

        exec.liquidate_all(Some("rebalance")).await.unwrap();
        assert_eq!(exec.target_fraction("JETS"), None);
        assert_eq!(exec.records().len(), 3);
    }

    #[tokio::test]
    async fn market_orders_get_unique_ids() {
        let mut exec = SimulatedExecutionClient::new();
        let a = exec.market_order("NVDA_C140", 5).await.unwrap();
        let b = exec.market_order("NVDA_C140", 5).await.unwrap();
        assert_ne!(a, b);
    }
}
