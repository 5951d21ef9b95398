use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Order-issuing surface of the execution collaborator.
///
/// The decision engines never touch fills or accounting directly; they only
/// request allocations and liquidations through this trait. Signed fractions
/// are forwarded verbatim — a negative fraction is a short request.
#[async_trait]
pub trait ExecutionClient: Send + Sync {
    /// Target a fraction of total portfolio value in `symbol`.
    async fn set_target_fraction(&mut self, symbol: &str, fraction: Decimal) -> Result<()>;

    /// Submit a market order for `quantity` units (contracts for options).
    /// Returns the execution service's order id.
    async fn market_order(&mut self, symbol: &str, quantity: i64) -> Result<String>;

    /// Close the position in a single instrument.
    async fn liquidate(&mut self, symbol: &str, reason: Option<&str>) -> Result<()>;

    /// Close every open position in the account.
    async fn liquidate_all(&mut self, reason: Option<&str>) -> Result<()>;
}
