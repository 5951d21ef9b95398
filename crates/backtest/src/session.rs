//! Calendar-driving replay loop for the rotation engine.

use anyhow::Result;
use chrono::Datelike;
use tracing::info;

use rotor_core::events::MarketTick;
use rotor_core::ExecutionClient;
use rotor_strategy::RotationEngine;

/// Replays an ordered tick stream, standing in for the schedule service:
/// the first tick of each new calendar month fires the engine's scheduled
/// rebalance before the tick itself is processed.
///
/// The first tick of the stream only seeds the month baseline, so a
/// backtest starting mid-month waits for the next month boundary.
pub struct RotationSession<E: ExecutionClient> {
    engine: RotationEngine,
    exec: E,
    current_month: Option<(i32, u32)>,
}

impl<E: ExecutionClient> RotationSession<E> {
    pub fn new(engine: RotationEngine, exec: E) -> Self {
        Self {
            engine,
            exec,
            current_month: None,
        }
    }

    /// Feeds one tick, firing the month-start trigger when the calendar
    /// rolls over.
    ///
    /// # Errors
    /// Propagates engine errors; benefit-schedule exhaustion aborts the run.
    pub async fn process(&mut self, tick: &MarketTick) -> Result<()> {
        let month = (tick.timestamp.year(), tick.timestamp.month());
        match self.current_month {
            None => self.current_month = Some(month),
            Some(current) if current != month => {
                info!(year = month.0, month = month.1, "Month boundary, scheduled rebalance");
                self.current_month = Some(month);
                self.engine.on_month_start(&mut self.exec).await?;
            }
            Some(_) => {}
        }
        self.engine.on_tick(tick, &mut self.exec).await
    }

    /// Replays a full stream in order.
    ///
    /// # Errors
    /// Stops at the first failing tick and returns its error.
    pub async fn run(&mut self, ticks: &[MarketTick]) -> Result<()> {
        for tick in ticks {
            self.process(tick).await?;
        }
        Ok(())
    }

    #[must_use]
    pub fn engine(&self) -> &RotationEngine {
        &self.engine
    }

    #[must_use]
    pub fn execution(&self) -> &E {
        &self.exec
    }
}
