//! Period-indexed benefit vectors for the rotation universe.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Ordered list of benefit vectors, one per rebalancing period.
///
/// Vectors are positional: component `i` of every period refers to
/// instrument `i` of the rotation universe. The schedule itself is read-only;
/// the engine owns the period cursor.
pub struct BenefitSchedule {
    periods: Vec<Vec<Decimal>>,
    width: usize,
}

impl BenefitSchedule {
    /// Builds a schedule from pre-parsed rows.
    ///
    /// # Errors
    /// Returns an error if the rows are ragged (unequal widths) or empty.
    pub fn from_rows(periods: Vec<Vec<Decimal>>) -> Result<Self> {
        let width = periods
            .first()
            .map(Vec::len)
            .context("benefit schedule has no periods")?;
        for (period, row) in periods.iter().enumerate() {
            if row.len() != width {
                anyhow::bail!(
                    "benefit schedule row {} has {} components, expected {}",
                    period,
                    row.len(),
                    width
                );
            }
        }
        Ok(Self { periods, width })
    }

    /// Loads a headerless CSV with one period per row.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, a value fails to
    /// parse, or the rows are ragged.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path.as_ref())
            .with_context(|| format!("failed to open benefit CSV {}", path.as_ref().display()))?;
        Self::from_csv_reader(reader)
    }

    /// Same as [`from_csv`](Self::from_csv) but over any reader.
    pub fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut periods = Vec::new();
        for row in reader.records() {
            let row = row?;
            let parsed: Result<Vec<Decimal>> = row
                .iter()
                .map(|field| {
                    Decimal::from_str(field.trim())
                        .with_context(|| format!("bad benefit value: {field}"))
                })
                .collect();
            periods.push(parsed?);
        }
        Self::from_rows(periods)
    }

    /// The vector for `period`, or `None` once the schedule is exhausted.
    #[must_use]
    pub fn get(&self, period: usize) -> Option<&[Decimal]> {
        self.periods.get(period).map(Vec::as_slice)
    }

    /// Number of rebalancing periods available.
    #[must_use]
    pub fn periods(&self) -> usize {
        self.periods.len()
    }

    /// Components per vector (must equal the universe size).
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }
}
