//! Single-leg options entry/exit state machine.

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use rotor_core::events::{OrderKind, OrderUpdate};
use rotor_core::{ExecutionClient, OptionsEntryConfig};
use rotor_signals::SignalTable;

use crate::types::{CloseReason, HeldOption, OptionContractSnapshot, OptionRight};

/// Per-tick inputs from the data and execution collaborators.
#[derive(Debug, Clone)]
pub struct OptionsTick {
    pub date: NaiveDate,
    pub underlying_price: Decimal,
    pub portfolio_value: Decimal,
    /// Fresh option-chain snapshot for the underlying.
    pub chain: Vec<OptionContractSnapshot>,
}

/// Enters a call position when the prediction table says the underlying will
/// rise over the lookahead window, and exits near expiry or on exercise.
///
/// At most one position is open at a time; while holding, entry evaluation
/// is skipped entirely.
pub struct OptionsPositionManager {
    config: OptionsEntryConfig,
    signals: SignalTable,
    held: Option<HeldOption>,
}

impl OptionsPositionManager {
    #[must_use]
    pub fn new(config: OptionsEntryConfig, signals: SignalTable) -> Self {
        Self {
            config,
            signals,
            held: None,
        }
    }

    /// Price/chain tick for the underlying.
    ///
    /// # Errors
    /// Propagates execution-client failures.
    pub async fn on_tick(
        &mut self,
        tick: &OptionsTick,
        exec: &mut dyn ExecutionClient,
    ) -> Result<()> {
        if let Some(held) = self.held.clone() {
            // Polled time exit: close once the buffer window reaches expiry.
            if tick.date + Duration::days(self.config.expiry_buffer_days) > held.expiry {
                info!(
                    symbol = held.symbol,
                    expiry = %held.expiry,
                    date = %tick.date,
                    "Closing option position: {}",
                    CloseReason::TooCloseToExpiry
                );
                exec.liquidate(&held.symbol, Some(&CloseReason::TooCloseToExpiry.to_string()))
                    .await?;
                self.held = None;
            }
            return Ok(());
        }

        // A table miss means no usable prediction: suppress entry for this
        // tick only, however cheap the underlying looks.
        let Some(predicted) = self
            .signals
            .value_at_offset(tick.date, self.config.lookahead_periods)
        else {
            return Ok(());
        };

        let basis_price = tick.underlying_price * self.config.price_basis_scale;
        if basis_price >= predicted {
            return Ok(());
        }

        let Some(contract) = select_call(&tick.chain) else {
            debug!(date = %tick.date, "Entry signal but no matching call contract");
            return Ok(());
        };

        let quantity =
            contract_quantity(tick.portfolio_value, contract.ask_price, &self.config);
        if quantity <= 0 {
            warn!(
                symbol = contract.symbol,
                ask = %contract.ask_price,
                portfolio_value = %tick.portfolio_value,
                "Computed contract quantity is non-positive, skipping entry"
            );
            return Ok(());
        }

        let order_id = exec.market_order(&contract.symbol, quantity).await?;
        info!(
            order_id,
            symbol = contract.symbol,
            strike = %contract.strike,
            expiry = %contract.expiry,
            quantity,
            "Bought call position"
        );
        self.held = Some(HeldOption {
            symbol: contract.symbol.clone(),
            expiry: contract.expiry,
        });
        Ok(())
    }

    /// Settlement notification from the execution collaborator.
    ///
    /// An exercise closes out the entire portfolio, not just the options leg.
    ///
    /// # Errors
    /// Propagates execution-client failures.
    pub async fn on_order_update(
        &mut self,
        update: &OrderUpdate,
        exec: &mut dyn ExecutionClient,
    ) -> Result<()> {
        if update.kind == OrderKind::OptionExercise {
            info!(order_id = update.order_id, "{}", CloseReason::Exercised);
            exec.liquidate_all(Some(&CloseReason::Exercised.to_string()))
                .await?;
            self.held = None;
        }
        Ok(())
    }

    #[must_use]
    pub fn held(&self) -> Option<&HeldOption> {
        self.held.as_ref()
    }
}

/// Deterministic contract selection: the farthest expiry in the snapshot,
/// then the call closest to at-the-money. `None` when the chain is empty or
/// holds no calls at that expiry.
#[must_use]
pub fn select_call(chain: &[OptionContractSnapshot]) -> Option<&OptionContractSnapshot> {
    let max_expiry = chain.iter().map(|c| c.expiry).max()?;
    chain
        .iter()
        .filter(|c| c.expiry == max_expiry && c.right == OptionRight::Call)
        .min_by_key(|c| (c.strike - c.underlying_last_price).abs())
}

/// Number of contracts targeting `allocation_fraction` of portfolio value,
/// truncated toward zero after dividing out the contract multiplier.
#[must_use]
pub fn contract_quantity(
    portfolio_value: Decimal,
    ask_price: Decimal,
    config: &OptionsEntryConfig,
) -> i64 {
    if ask_price <= Decimal::ZERO {
        return 0;
    }
    let contracts =
        config.allocation_fraction * portfolio_value / ask_price / config.contract_multiplier;
    contracts.trunc().to_i64().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Recorded, RecordingClient};
    use rotor_signals::SignalRecord;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn call(symbol: &str, strike: Decimal, expiry: NaiveDate) -> OptionContractSnapshot {
        OptionContractSnapshot {
            symbol: symbol.to_string(),
            strike,
            expiry,
            right: OptionRight::Call,
            underlying_last_price: dec!(140),
            ask_price: dec!(9),
        }
    }

    fn put(symbol: &str, strike: Decimal, expiry: NaiveDate) -> OptionContractSnapshot {
        OptionContractSnapshot {
            right: OptionRight::Put,
            ..call(symbol, strike, expiry)
        }
    }

    /// Table over consecutive dates with index == day offset, flat price.
    fn signals(rows: i64, predicted: Decimal) -> SignalTable {
        let start = date(2021, 1, 1);
        let records = (0..rows)
            .map(|i| SignalRecord {
                date: start + Duration::days(i),
                sequence_index: i,
                predicted_price: predicted,
            })
            .collect();
        SignalTable::from_records(records).unwrap()
    }

    fn manager(predicted: Decimal) -> OptionsPositionManager {
        OptionsPositionManager::new(OptionsEntryConfig::default(), signals(60, predicted))
    }

    fn entry_tick(chain: Vec<OptionContractSnapshot>) -> OptionsTick {
        OptionsTick {
            date: date(2021, 1, 1),
            underlying_price: dec!(560), // basis price 140
            portfolio_value: dec!(100000),
            chain,
        }
    }

    #[test]
    fn selection_prefers_max_expiry_then_atm() {
        let chain = vec![
            call("NEAR_ATM_SHORT", dec!(140), date(2021, 3, 5)),
            call("FAR_OTM", dec!(170), date(2021, 3, 19)),
            call("FAR_ATM", dec!(141), date(2021, 3, 19)),
            put("FAR_PUT_ATM", dec!(140), date(2021, 3, 19)),
        ];
        let selected = select_call(&chain).unwrap();
        assert_eq!(selected.symbol, "FAR_ATM");
        // Deterministic on repeat.
        assert_eq!(select_call(&chain).unwrap().symbol, "FAR_ATM");
    }

    #[test]
    fn selection_empty_when_no_calls_at_max_expiry() {
        assert!(select_call(&[]).is_none());
        let chain = vec![
            call("SHORT_CALL", dec!(140), date(2021, 3, 5)),
            put("FAR_PUT", dec!(140), date(2021, 3, 19)),
        ];
        assert!(select_call(&chain).is_none());
    }

    #[test]
    fn quantity_targets_five_percent_over_multiplier() {
        let config = OptionsEntryConfig::default();
        // 0.05 * 100000 / 9 / 100 = 5.55… → 5
        assert_eq!(contract_quantity(dec!(100000), dec!(9), &config), 5);
        // Too small a portfolio truncates to zero.
        assert_eq!(contract_quantity(dec!(10000), dec!(9), &config), 0);
        // Degenerate ask never divides by zero.
        assert_eq!(contract_quantity(dec!(100000), dec!(0), &config), 0);
    }

    #[tokio::test]
    async fn enters_when_prediction_beats_basis_price() {
        let mut mgr = manager(dec!(150));
        let mut exec = RecordingClient::new();
        let chain = vec![call("NVDA_C140", dec!(140), date(2021, 3, 19))];

        mgr.on_tick(&entry_tick(chain), &mut exec).await.unwrap();

        assert_eq!(
            exec.calls,
            vec![Recorded::MarketOrder { symbol: "NVDA_C140".into(), quantity: 5 }]
        );
        assert_eq!(mgr.held().unwrap().symbol, "NVDA_C140");
    }

    #[tokio::test]
    async fn stays_flat_when_prediction_below_basis_price() {
        let mut mgr = manager(dec!(130)); // basis 140 >= 130
        let mut exec = RecordingClient::new();
        let chain = vec![call("NVDA_C140", dec!(140), date(2021, 3, 19))];

        mgr.on_tick(&entry_tick(chain), &mut exec).await.unwrap();

        assert!(exec.calls.is_empty());
        assert!(mgr.held().is_none());
    }

    #[tokio::test]
    async fn missing_prediction_suppresses_entry() {
        // Lookahead of 20 runs past a 10-row table on every date.
        let mut mgr =
            OptionsPositionManager::new(OptionsEntryConfig::default(), signals(10, dec!(99999)));
        let mut exec = RecordingClient::new();
        let chain = vec![call("NVDA_C140", dec!(140), date(2021, 3, 19))];

        let tick = OptionsTick {
            underlying_price: dec!(1), // very low, but no signal
            ..entry_tick(chain)
        };
        mgr.on_tick(&tick, &mut exec).await.unwrap();

        assert!(exec.calls.is_empty());
        assert!(mgr.held().is_none());
    }

    #[tokio::test]
    async fn empty_chain_suppresses_entry() {
        let mut mgr = manager(dec!(150));
        let mut exec = RecordingClient::new();
        mgr.on_tick(&entry_tick(vec![]), &mut exec).await.unwrap();
        assert!(exec.calls.is_empty());
        assert!(mgr.held().is_none());
    }

    #[tokio::test]
    async fn non_positive_quantity_places_no_order() {
        let mut mgr = manager(dec!(150));
        let mut exec = RecordingClient::new();
        let chain = vec![call("NVDA_C140", dec!(140), date(2021, 3, 19))];
        let tick = OptionsTick {
            portfolio_value: dec!(500), // 0.05 * 500 / 9 / 100 < 1
            ..entry_tick(chain)
        };

        mgr.on_tick(&tick, &mut exec).await.unwrap();

        assert!(exec.calls.is_empty());
        assert!(mgr.held().is_none());
    }

    #[tokio::test]
    async fn no_entry_evaluation_while_holding() {
        let mut mgr = manager(dec!(150));
        let mut exec = RecordingClient::new();
        let chain = vec![call("NVDA_C140", dec!(140), date(2021, 3, 19))];

        mgr.on_tick(&entry_tick(chain.clone()), &mut exec).await.unwrap();
        mgr.on_tick(&entry_tick(chain), &mut exec).await.unwrap();

        // One buy only; the second tick is a holding no-op far from expiry.
        assert_eq!(exec.calls.len(), 1);
    }

    #[tokio::test]
    async fn exits_when_too_close_to_expiration() {
        let mut mgr = manager(dec!(150));
        let mut exec = RecordingClient::new();
        let chain = vec![call("NVDA_C140", dec!(140), date(2021, 3, 15))];
        mgr.on_tick(&entry_tick(chain), &mut exec).await.unwrap();
        exec.calls.clear();

        // 2021-03-11 + 4d = 2021-03-15, not past expiry yet.
        let mut tick = entry_tick(vec![]);
        tick.date = date(2021, 3, 11);
        mgr.on_tick(&tick, &mut exec).await.unwrap();
        assert!(mgr.held().is_some());

        // 2021-03-12 + 4d = 2021-03-16 > 2021-03-15: exit fires.
        tick.date = date(2021, 3, 12);
        mgr.on_tick(&tick, &mut exec).await.unwrap();
        assert_eq!(
            exec.calls,
            vec![Recorded::Liquidate {
                symbol: "NVDA_C140".into(),
                reason: Some("Too close to expiration".into()),
            }]
        );
        assert!(mgr.held().is_none());
    }

    #[tokio::test]
    async fn exercise_liquidates_entire_portfolio() {
        let mut mgr = manager(dec!(150));
        let mut exec = RecordingClient::new();
        let chain = vec![call("NVDA_C140", dec!(140), date(2021, 3, 19))];
        mgr.on_tick(&entry_tick(chain), &mut exec).await.unwrap();
        exec.calls.clear();

        let update = OrderUpdate {
            order_id: "order-1".to_string(),
            kind: OrderKind::OptionExercise,
        };
        mgr.on_order_update(&update, &mut exec).await.unwrap();

        assert_eq!(
            exec.calls,
            vec![Recorded::LiquidateAll { reason: Some("Option exercised".into()) }]
        );
        assert!(mgr.held().is_none());
    }

    #[tokio::test]
    async fn plain_fills_do_not_trigger_liquidation() {
        let mut mgr = manager(dec!(150));
        let mut exec = RecordingClient::new();
        let update = OrderUpdate {
            order_id: "order-1".to_string(),
            kind: OrderKind::Market,
        };
        mgr.on_order_update(&update, &mut exec).await.unwrap();
        assert!(exec.calls.is_empty());
    }
}
