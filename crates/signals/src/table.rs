//! Predicted-price lookup table keyed by calendar date and sequence index.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// One row of the externally produced prediction series, one per trading day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRecord {
    pub date: NaiveDate,
    /// Strictly increasing with date. Lookahead queries walk this index, not
    /// the calendar — trading-day counts per month are irregular.
    pub sequence_index: i64,
    pub predicted_price: Decimal,
}

/// In-memory prediction table with secondary indexes built once at load.
#[derive(Debug)]
pub struct SignalTable {
    records: Vec<SignalRecord>,
    by_date: HashMap<NaiveDate, usize>,
    by_index: HashMap<i64, usize>,
}

impl SignalTable {
    /// Builds the table and its date/index lookups.
    ///
    /// # Errors
    /// Returns an error if sequence indexes are not strictly increasing in
    /// date order, or if a date or index appears twice.
    pub fn from_records(mut records: Vec<SignalRecord>) -> Result<Self> {
        records.sort_by_key(|r| r.date);

        let mut by_date = HashMap::with_capacity(records.len());
        let mut by_index = HashMap::with_capacity(records.len());
        let mut last_index: Option<i64> = None;

        for (pos, record) in records.iter().enumerate() {
            if let Some(prev) = last_index {
                if record.sequence_index <= prev {
                    anyhow::bail!(
                        "sequence index {} at {} does not increase past {}",
                        record.sequence_index,
                        record.date,
                        prev
                    );
                }
            }
            last_index = Some(record.sequence_index);

            if by_date.insert(record.date, pos).is_some() {
                anyhow::bail!("duplicate signal date: {}", record.date);
            }
            by_index.insert(record.sequence_index, pos);
        }

        tracing::debug!(rows = records.len(), "Signal table loaded");
        Ok(Self {
            records,
            by_date,
            by_index,
        })
    }

    /// Loads a `Date,Index,Predicted Price` CSV (the shape the prediction
    /// pipeline exports).
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or a row fails to parse.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = csv::Reader::from_path(path.as_ref())
            .with_context(|| format!("failed to open signal CSV {}", path.as_ref().display()))?;
        Self::from_csv_reader(reader)
    }

    /// Same as [`from_csv`](Self::from_csv) but over any reader.
    pub fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let date_field = row.get(0).context("signal CSV row missing date column")?;
            let date = NaiveDate::parse_from_str(date_field, "%Y-%m-%d")
                .with_context(|| format!("bad date in signal CSV: {date_field}"))?;
            let index_field = row
                .get(1)
                .context("signal CSV row missing sequence index column")?;
            let sequence_index: i64 = index_field
                .trim()
                .parse()
                .with_context(|| format!("bad sequence index in signal CSV: {index_field}"))?;
            let price_field = row
                .get(2)
                .context("signal CSV row missing predicted price column")?;
            let predicted_price = Decimal::from_str(price_field.trim())
                .with_context(|| format!("bad predicted price in signal CSV: {price_field}"))?;
            records.push(SignalRecord {
                date,
                sequence_index,
                predicted_price,
            });
        }
        Self::from_records(records)
    }

    /// Predicted price on `date`, exact match only.
    #[must_use]
    pub fn value_at(&self, date: NaiveDate) -> Option<Decimal> {
        self.by_date
            .get(&date)
            .map(|&pos| self.records[pos].predicted_price)
    }

    /// Predicted price `lookahead_periods` sequence indexes after `date`.
    ///
    /// Resolves the date to its sequence index, shifts by index arithmetic,
    /// and re-resolves. `None` when either lookup misses (unknown date, or
    /// the shifted index runs past the end of the table).
    #[must_use]
    pub fn value_at_offset(&self, date: NaiveDate, lookahead_periods: i64) -> Option<Decimal> {
        let pos = *self.by_date.get(&date)?;
        let shifted = self.records[pos].sequence_index + lookahead_periods;
        self.by_index
            .get(&shifted)
            .map(|&pos| self.records[pos].predicted_price)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
