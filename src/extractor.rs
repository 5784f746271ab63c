//! The extraction pipeline front door.
//!
//! One `Extractor` owns a validated configuration and runs the whole
//! pipeline per call: tokenize, segment into candidates, recover a match per
//! candidate, validate, assemble. Calls share nothing mutable, so one
//! extractor can serve any number of threads.

use chrono::{DateTime, Utc};
use log::debug;

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::lexer::tokenize;
use crate::recovery::resolve_candidate;
use crate::segment::segment;
use crate::validate::{validate, DateGroup};

#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    /// Build an extractor, rejecting a configuration whose vocabulary is
    /// missing required tables.
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractError> {
        config.vocabulary.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract every date/time phrase from `text`, resolved against now.
    pub fn extract(&self, text: &str) -> Vec<DateGroup> {
        self.extract_at(text, Utc::now())
    }

    /// Extract with an explicit reference instant. Same input, same
    /// reference, same output; this is the entry point tests pin down.
    pub fn extract_at(&self, text: &str, reference: DateTime<Utc>) -> Vec<DateGroup> {
        let reference = reference.with_timezone(&self.config.timezone);
        let tokens = tokenize(text, &self.config.vocabulary);
        let candidates = segment(&tokens);
        let total = candidates.len();
        debug!("{} candidate group(s) in {} token(s)", total, tokens.len());

        // candidates come out of the segmenter in source order and each maps
        // to at most one result, so results stay in source order for free
        candidates
            .iter()
            .filter_map(|group| {
                let found = resolve_candidate(group, reference, &self.config.vocabulary)?;
                validate(found, group, text, total)
            })
            .collect()
    }
}

/// Extract with the default configuration. Convenience for one-off callers.
pub fn extract(text: &str) -> Vec<DateGroup> {
    Extractor::default().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 23, 9, 0, 0).unwrap()
    }

    #[test]
    fn default_configuration_is_valid() {
        assert!(Extractor::new(ExtractorConfig::default()).is_ok());
    }

    #[test]
    fn invalid_vocabulary_is_rejected() {
        let mut config = ExtractorConfig::default();
        config.vocabulary.months.clear();
        assert!(matches!(Extractor::new(config), Err(ExtractError::MissingMonths)));
    }

    #[test]
    fn results_are_resolved_in_the_configured_timezone() {
        let config =
            ExtractorConfig::from_toml_str(r#"timezone = "America/New_York""#).unwrap();
        let extractor = Extractor::new(config).unwrap();
        let results = extractor.extract_at("june 20th at 5pm", reference());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].resolved_values[0].to_rfc3339(), "2024-06-20T17:00:00-04:00");
    }

    #[test]
    fn no_phrases_means_empty_output() {
        let extractor = Extractor::default();
        assert!(extractor.extract_at("nothing to see here", reference()).is_empty());
    }

    #[test]
    fn multiple_phrases_come_back_in_source_order() {
        let extractor = Extractor::default();
        let results =
            extractor.extract_at("standup tomorrow, retro next friday", reference());
        assert_eq!(results.len(), 2);
        assert!(results[0].start_offset < results[1].start_offset);
        assert_eq!(results[0].matched_text, "tomorrow");
        assert_eq!(results[1].matched_text, "next friday");
    }
}
