//! datescout extracts date and time phrases from free text.
//!
//! Feed in a sentence, get back every phrase that reads as a date or time,
//! each with its exact source span, the grammar rules that matched it, and
//! the concrete instants it resolves to:
//!
//! ```
//! use chrono::{TimeZone, Utc};
//!
//! let extractor = datescout::Extractor::default();
//! let reference = Utc.with_ymd_and_hms(2024, 8, 23, 9, 0, 0).unwrap();
//! let results = extractor.extract_at("lunch june 20th at noon?", reference);
//! assert_eq!(results[0].matched_text, "june 20th at noon");
//! ```
//!
//! The pipeline: the lexer tokenizes against a vocabulary, the segmenter
//! groups consecutive recognized tokens into candidates, the grammar matcher
//! parses each candidate whole, the recovery controller narrows candidates
//! that fail (end-trimming, then start-sliding), and the validator rejects
//! fragments and ambiguous bare numerals before assembling results. Inputs
//! that merely resemble dates degrade to fewer results, never to errors.

pub mod config;
pub mod error;
pub mod extractor;
pub mod grammar;
pub mod lexer;
pub mod recovery;
pub mod resolve;
pub mod segment;
pub mod validate;

pub use config::ExtractorConfig;
pub use error::ExtractError;
pub use extractor::{extract, Extractor};
pub use grammar::{ParseRuleLocation, Vocabulary};
pub use validate::DateGroup;

pub fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .format_timestamp(None)
        .format_target(false)
        .init();
}
