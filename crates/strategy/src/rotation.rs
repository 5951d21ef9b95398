//! Monthly sector rotation with stop-loss-triggered re-rotation.

use anyhow::Result;
use rust_decimal::Decimal;
use tracing::{info, warn};

use rotor_core::events::MarketTick;
use rotor_core::{EngineError, ExecutionClient, RotationConfig};
use rotor_signals::BenefitSchedule;

use crate::allocation::normalize_weights;
use crate::trailing_stop::TrailingStopTracker;

/// Allocates capital across a fixed universe from a period-indexed benefit
/// schedule.
///
/// Two triggers feed it: the calendar's month-start event runs a full
/// rebalance (liquidate everything, consume the next benefit vector, take
/// positions), and a trailing-stop breach on any tracked instrument exits
/// that instrument and re-rotates its weight onto the rest of the current
/// vector. Which vector a breach consumes is governed by
/// [`RotationConfig::advance_period_on_stop`].
pub struct RotationEngine {
    config: RotationConfig,
    schedule: BenefitSchedule,
    tracker: TrailingStopTracker,
    /// Current period's benefits, positional against `config.universe`.
    benefits: Vec<Decimal>,
    /// Sole progress cursor into the schedule; advanced after use.
    cursor: usize,
    halted: bool,
}

impl RotationEngine {
    /// # Errors
    /// Returns an error if the schedule width does not match the universe.
    pub fn new(config: RotationConfig, schedule: BenefitSchedule) -> Result<Self> {
        if schedule.width() != config.universe.len() {
            anyhow::bail!(
                "benefit schedule width {} does not match universe size {}",
                schedule.width(),
                config.universe.len()
            );
        }
        let width = config.universe.len();
        let tracker = TrailingStopTracker::new(config.stop_fraction);
        Ok(Self {
            config,
            schedule,
            tracker,
            benefits: vec![Decimal::ZERO; width],
            cursor: 0,
            halted: false,
        })
    }

    /// Scheduled trigger: first market-open tick of each calendar month.
    ///
    /// # Errors
    /// Returns [`EngineError::BenefitScheduleExhausted`] once the schedule
    /// runs out; the engine halts and every later call fails the same way.
    pub async fn on_month_start(&mut self, exec: &mut dyn ExecutionClient) -> Result<()> {
        self.rebalance(exec).await
    }

    /// Price tick for any instrument. Non-universe symbols are ignored.
    ///
    /// # Errors
    /// Propagates execution-client failures, and schedule exhaustion when a
    /// breach is configured to consume the next period.
    pub async fn on_tick(
        &mut self,
        tick: &MarketTick,
        exec: &mut dyn ExecutionClient,
    ) -> Result<()> {
        let Some(index) = self.config.universe.iter().position(|s| *s == tick.symbol) else {
            return Ok(());
        };

        let Some(breach) = self.tracker.update(&tick.symbol, tick.price) else {
            return Ok(());
        };

        warn!(
            symbol = tick.symbol,
            price = %breach.price,
            peak = %breach.peak,
            "Trailing stop breached, rotating out"
        );

        if self.config.advance_period_on_stop {
            return self.rebalance(exec).await;
        }

        // Exit just the breached instrument: zero its slot, spread the
        // current vector's weight over the survivors. The period cursor does
        // not move.
        self.benefits[index] = Decimal::ZERO;
        self.tracker.reset(&tick.symbol);
        self.benefits = normalize_weights(&self.benefits);
        self.take_positions(exec).await
    }

    async fn rebalance(&mut self, exec: &mut dyn ExecutionClient) -> Result<()> {
        if self.halted {
            return Err(EngineError::BenefitScheduleExhausted {
                period: self.cursor,
                available: self.schedule.periods(),
            }
            .into());
        }

        info!(period = self.cursor, "Rebalancing rotation universe");
        exec.liquidate_all(Some("rebalance")).await?;
        self.reset_state();

        let Some(vector) = self.schedule.get(self.cursor) else {
            self.halted = true;
            return Err(EngineError::BenefitScheduleExhausted {
                period: self.cursor,
                available: self.schedule.periods(),
            }
            .into());
        };

        self.benefits = normalize_weights(vector);
        self.cursor += 1;
        self.take_positions(exec).await
    }

    /// Zeroes the benefit accumulator and clears all trailing state.
    fn reset_state(&mut self) {
        self.benefits.fill(Decimal::ZERO);
        self.tracker.reset_all();
    }

    async fn take_positions(&self, exec: &mut dyn ExecutionClient) -> Result<()> {
        for (symbol, weight) in self.config.universe.iter().zip(&self.benefits) {
            exec.set_target_fraction(symbol, *weight).await?;
        }
        Ok(())
    }

    #[must_use]
    pub fn period_cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    #[must_use]
    pub fn current_benefits(&self) -> &[Decimal] {
        &self.benefits
    }

    #[must_use]
    pub fn trailing_peak(&self, symbol: &str) -> Option<Decimal> {
        self.tracker.peak(symbol)
    }
}
