use thiserror::Error;

/// Fatal decision-engine errors.
///
/// Everything recoverable (signal misses, empty chains, zero-sized orders)
/// is handled in place by the engines; this enum covers the conditions that
/// must stop the run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The period cursor ran past the end of the benefit schedule. The
    /// schedule is static configuration, so this means the run was set up
    /// with too few periods — guessing a vector would silently trade on
    /// stale weights.
    #[error("benefit schedule exhausted: period {period} requested, {available} available")]
    BenefitScheduleExhausted { period: usize, available: usize },
}
