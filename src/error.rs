//! Error types for the extraction engine.
//!
//! Per-candidate parse failures are never errors: they are recovered or
//! silently dropped. The only fatal condition is a misconfigured grammar
//! vocabulary, which is a programming defect rather than a property of the
//! input text, and is reported at construction time.

/// Fatal configuration error raised when building an extractor.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("vocabulary has no month names")]
    MissingMonths,
    #[error("vocabulary has no weekday names")]
    MissingWeekdays,
    #[error("vocabulary term '{term}' is defined in more than one category")]
    ConflictingTerm { term: String },
    #[error("vocabulary value out of range for '{term}': {value}")]
    ValueOutOfRange { term: String, value: i64 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
