use thiserror::Error;

/// Configuration problems rejected before any scoring happens.
///
/// These are setup failures the caller must surface as such; a transcript
/// that merely scores badly is never an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Reference script contains no scorable sentences")]
    EmptyScript,

    #[error("Variant map references unknown unit id {unit_id} (script has {unit_count} units)")]
    UnknownVariantUnit { unit_id: usize, unit_count: usize },

    #[error("Optional-unit list references unknown unit id {unit_id} (script has {unit_count} units)")]
    UnknownOptionalUnit { unit_id: usize, unit_count: usize },

    #[error("Threshold {value} is outside the 0-100 score scale")]
    InvalidThreshold { value: f64 },

    #[error("Matcher floor {value} is outside the 0.0-1.0 range")]
    InvalidFloor { value: f64 },
}
