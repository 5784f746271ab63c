//! Retry/recovery for candidates that fail to parse whole.
//!
//! A candidate often contains a valid phrase plus noise: a sentence that
//! continues past the date ("june 20th on ...") or lead-in words the grammar
//! has no rule for. The controller narrows the token window and re-invokes
//! the matcher: first trimming from the end (preferring the longest match,
//! cheap fix for trailing noise), then sliding the window start over the
//! original full list (fix for leading noise). Every retry gets a fresh
//! slice view of the original token array; nothing is mutated in place, so
//! any retry can re-examine tokens an earlier branch already gave up on.
//!
//! Bound: at most O(tokens) matcher invocations per candidate.

use chrono::DateTime;
use chrono_tz::Tz;
use log::debug;

use crate::grammar::{match_once, ParseOutcome, Vocabulary};
use crate::lexer::Token;
use crate::resolve::resolve;
use crate::segment::CandidateGroup;

/// A narrowed, matched, resolved candidate.
#[derive(Debug, Clone)]
pub struct RecoveredMatch {
    pub outcome: ParseOutcome,
    pub values: Vec<DateTime<Tz>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Trimming,
    Sliding,
}

/// Working window over the candidate's token list during narrowing.
#[derive(Debug)]
struct RetryState<'a> {
    tokens: &'a [Token],
    start: usize,
    end: usize,
    phase: Phase,
    discarded: usize,
}

impl<'a> RetryState<'a> {
    fn new(tokens: &'a [Token], phase: Phase) -> Self {
        Self { tokens, start: 0, end: tokens.len(), phase, discarded: 0 }
    }

    fn window(&self) -> &'a [Token] {
        &self.tokens[self.start..self.end]
    }

    fn exhausted(&self) -> bool {
        self.start >= self.end
    }

    /// Drop one token from the window's tail.
    fn trim_end(&mut self) {
        debug_assert_eq!(self.phase, Phase::Trimming);
        self.end -= 1;
        self.discarded += 1;
    }

    /// Drop the window's lead token plus any immediately following tokens
    /// with empty text.
    fn slide_start(&mut self) {
        debug_assert_eq!(self.phase, Phase::Sliding);
        self.start += 1;
        self.discarded += 1;
        while self.start < self.end && self.tokens[self.start].text.is_empty() {
            self.start += 1;
            self.discarded += 1;
        }
    }
}

/// Resolve one candidate group: full match first, then end-trimming, then
/// start-sliding. Returns the first non-empty result, or nothing once both
/// phases are exhausted.
pub fn resolve_candidate(
    group: &CandidateGroup,
    reference: DateTime<Tz>,
    vocabulary: &Vocabulary,
) -> Option<RecoveredMatch> {
    // the full group wins outright when it parses: longest plausible match
    if let Some(found) = attempt(&group.tokens, reference, vocabulary) {
        return Some(found);
    }

    let mut state = RetryState::new(&group.tokens, Phase::Trimming);
    loop {
        state.trim_end();
        if state.exhausted() {
            break;
        }
        if let Some(found) = attempt(state.window(), reference, vocabulary) {
            debug!("recovered candidate by trimming {} trailing token(s)", state.discarded);
            return Some(found);
        }
    }

    // sliding restarts from the original full list
    let mut state = RetryState::new(&group.tokens, Phase::Sliding);
    loop {
        state.slide_start();
        if state.exhausted() {
            break;
        }
        if let Some(found) = attempt(state.window(), reference, vocabulary) {
            debug!("recovered candidate by sliding past {} leading token(s)", state.discarded);
            return Some(found);
        }
    }

    debug!(
        "candidate at {}..{} exhausted without a match",
        group.start_offset, group.end_offset
    );
    None
}

/// One matcher invocation plus resolution. A parse that resolves to zero
/// values counts as no match.
fn attempt(
    tokens: &[Token],
    reference: DateTime<Tz>,
    vocabulary: &Vocabulary,
) -> Option<RecoveredMatch> {
    let outcome = match_once(tokens, vocabulary)?;
    let values = resolve(&outcome.phrase, reference);
    if values.is_empty() {
        return None;
    }
    Some(RecoveredMatch { outcome, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Vocabulary;
    use crate::lexer::tokenize;
    use crate::segment::segment;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn reference() -> DateTime<Tz> {
        chrono_tz::UTC.with_ymd_and_hms(2024, 8, 23, 9, 0, 0).unwrap()
    }

    fn only_group(text: &str) -> CandidateGroup {
        let groups = segment(&tokenize(text, Vocabulary::builtin()));
        assert_eq!(groups.len(), 1, "expected one candidate for {text:?}");
        groups.into_iter().next().unwrap()
    }

    fn recover(text: &str) -> Option<RecoveredMatch> {
        resolve_candidate(&only_group(text), reference(), Vocabulary::builtin())
    }

    #[test]
    fn full_match_returns_immediately() {
        let text = "june 20th";
        let found = recover(text).expect("should match");
        assert_eq!(&text[found.outcome.start..found.outcome.end], "june 20th");
    }

    #[test]
    fn trailing_noise_is_trimmed() {
        let text = "june 20th on";
        let found = recover(text).expect("should recover");
        assert_eq!(&text[found.outcome.start..found.outcome.end], "june 20th");
    }

    #[test]
    fn leading_noise_is_slid_past() {
        // "th" is a vocabulary word the grammar cannot start a phrase with
        let text = "th 5pm";
        let found = recover(text).expect("should recover");
        assert_eq!(&text[found.outcome.start..found.outcome.end], "5pm");
    }

    #[test]
    fn unresolvable_parse_keeps_narrowing() {
        // parses as february 30th but resolves to nothing; trimming finds
        // the bare month instead
        let text = "february 30";
        let found = recover(text).expect("should recover");
        assert_eq!(&text[found.outcome.start..found.outcome.end], "february");
        assert_eq!(found.values[0].date_naive().to_string(), "2024-02-01");
    }

    #[test]
    fn exhausted_candidate_yields_nothing() {
        assert!(recover("on the at").is_none());
    }

    #[test]
    fn narrowing_does_not_mutate_the_group() {
        let group = only_group("june 20th on");
        let before = group.tokens.clone();
        let _ = resolve_candidate(&group, reference(), Vocabulary::builtin());
        assert_eq!(group.tokens, before);
    }
}
