//! Final validation and result assembly.
//!
//! A recovered match is not yet a result. Two rejection rules run against
//! the original source first:
//!
//! - letter adjacency: a matched span touching an alphabetic character on
//!   either side is a fragment of a larger word ("a5pm"), not a phrase;
//! - all-numeric ambiguity: when the input produced more than one candidate,
//!   a candidate that was nothing but numerals and never parsed an explicit
//!   date or time reads as a quantity ("1 hard drive"), not an hour.
//!
//! Survivors are packaged as [`DateGroup`] values with their span, rule
//! locations, and resolved instants.

use std::collections::HashMap;

use chrono::DateTime;
use chrono_tz::Tz;
use log::debug;
use serde::Serialize;

use crate::grammar::{rule_locations, ParseRuleLocation};
use crate::recovery::RecoveredMatch;
use crate::segment::CandidateGroup;

/// One extracted date/time phrase, with everything a caller needs to act on
/// it or to highlight it in the source text.
#[derive(Debug, Clone, Serialize)]
pub struct DateGroup {
    /// The exact source slice the grammar consumed, original casing intact.
    pub matched_text: String,
    /// The full input the phrase was found in.
    pub source_text: String,
    pub line: u32,
    /// Byte span of `matched_text` within `source_text`.
    pub start_offset: usize,
    pub end_offset: usize,
    /// Which grammar rules matched where, keyed by rule name.
    pub rule_locations: HashMap<String, Vec<ParseRuleLocation>>,
    /// The instants the phrase resolved to.
    pub resolved_values: Vec<DateTime<Tz>>,
}

/// Validate one recovered match against the original source; assemble a
/// [`DateGroup`] if it survives.
pub fn validate(
    recovered: RecoveredMatch,
    group: &CandidateGroup,
    source: &str,
    total_candidates: usize,
) -> Option<DateGroup> {
    let outcome = &recovered.outcome;

    if touches_letter(source, outcome.start, outcome.end) {
        debug!(
            "rejecting {:?}: adjacent to an alphabetic character",
            &source[outcome.start..outcome.end]
        );
        return None;
    }

    // Ambiguity is judged on the candidate as segmented, before recovery
    // narrowed it. A bare numeral that survived only because its neighbours
    // were discarded is still a bare numeral.
    let inferred_only = outcome.phrase.date.is_none()
        && outcome.phrase.time.is_some_and(|t| !t.explicit);
    if total_candidates > 1 && group.is_all_numeric() && inferred_only {
        debug!(
            "rejecting {:?}: all-numeric candidate among {} candidates",
            &source[outcome.start..outcome.end],
            total_candidates
        );
        return None;
    }

    Some(DateGroup {
        matched_text: source[outcome.start..outcome.end].to_string(),
        source_text: source.to_string(),
        line: outcome.line,
        start_offset: outcome.start,
        end_offset: outcome.end,
        rule_locations: rule_locations(&outcome.tree, source),
        resolved_values: recovered.values,
    })
}

/// True when the byte span has an alphabetic character immediately before or
/// after it.
fn touches_letter(source: &str, start: usize, end: usize) -> bool {
    let before = source[..start].chars().next_back();
    let after = source[end..].chars().next();
    before.is_some_and(|c| c.is_alphabetic()) || after.is_some_and(|c| c.is_alphabetic())
}
