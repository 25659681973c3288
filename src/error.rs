use thiserror::Error;

// ---------------------------------------------------------------------------
// Core error taxonomy
// ---------------------------------------------------------------------------

/// Errors surfaced by the transform and bucketing layers.
///
/// Empty inputs (no records, no selected regions, empty date window) are
/// never errors; they produce empty output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExplorerError {
    /// An unknown frequency-mode spelling from the CLI or a config source.
    #[error("unsupported frequency mode '{0}' (expected daily, cumulative or 7day)")]
    Configuration(String),

    /// A negative (or non-finite) magnitude where a count was expected.
    /// Counts are never negative; this indicates a defect in the input data
    /// and must not be suppressed by callers.
    #[error("invalid magnitude {0}: counts must be finite and non-negative")]
    InvalidValue(f64),
}
