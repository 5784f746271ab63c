//! Candidate segmentation.
//!
//! One left-to-right pass over the token stream, partitioning it into
//! maximal contiguous runs that could plausibly contain a date/time phrase.
//! Unknown tokens are hard boundaries. Whitespace is preserved inside a run
//! so a group's span stays faithful to the source spacing, and trailing
//! low-information tokens are trimmed before a group is accepted because
//! they can never end a meaningful phrase and poison later parse attempts.

use log::trace;

use crate::lexer::{Token, TokenKind};

/// Punctuation that never ends a phrase and is stripped from group tails.
const STRIPPED_TAIL: &[&str] = &[".", ":", ",", "-", "/", "+", "'", "\""];

/// A contiguous run of tokens hypothesized to contain one date/time phrase.
///
/// Groups never overlap and are produced in source order; the original
/// substring a group spans is exactly `source[start_offset..end_offset]`.
#[derive(Debug, Clone)]
pub struct CandidateGroup {
    pub tokens: Vec<Token>,
    pub start_offset: usize,
    pub end_offset: usize,
    pub line: u32,
}

impl CandidateGroup {
    /// True when every non-whitespace token in the group is a bare number.
    /// Judged on the original, pre-recovery token list by the validator's
    /// ambiguity rule.
    pub fn is_all_numeric(&self) -> bool {
        self.tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .all(|t| t.kind == TokenKind::Number)
    }
}

/// Partition `tokens` into candidate groups. Zero-token groups are never
/// emitted.
pub fn segment(tokens: &[Token]) -> Vec<CandidateGroup> {
    let mut groups = Vec::new();
    let mut current: Option<Vec<Token>> = None;

    for token in tokens {
        match &mut current {
            None => match token.kind {
                TokenKind::Whitespace | TokenKind::Unknown | TokenKind::End => {}
                _ if token.text.is_empty() => {}
                _ => current = Some(vec![token.clone()]),
            },
            Some(buffer) => match token.kind {
                TokenKind::Unknown | TokenKind::End => {
                    close_group(&mut groups, buffer);
                    current = None;
                }
                _ => buffer.push(token.clone()),
            },
        }
    }
    if let Some(buffer) = &mut current {
        // reached here only if the stream had no End token
        close_group(&mut groups, buffer);
    }

    groups
}

fn close_group(groups: &mut Vec<CandidateGroup>, buffer: &mut Vec<Token>) {
    strip_tail(buffer);
    let (start_offset, end_offset, line) = match (buffer.first(), buffer.last()) {
        (Some(first), Some(last)) => (first.offset, last.end(), first.line),
        _ => {
            trace!("candidate emptied by tail stripping, discarded");
            return;
        }
    };
    let group =
        CandidateGroup { tokens: std::mem::take(buffer), start_offset, end_offset, line };
    trace!(
        "candidate group at {}..{} ({} tokens)",
        group.start_offset,
        group.end_offset,
        group.tokens.len()
    );
    groups.push(group);
}

fn strip_tail(buffer: &mut Vec<Token>) {
    while let Some(last) = buffer.last() {
        let strip = match last.kind {
            TokenKind::Whitespace => true,
            TokenKind::Punctuation => STRIPPED_TAIL.contains(&last.text.as_str()),
            _ => last.text.is_empty(),
        };
        if !strip {
            break;
        }
        buffer.pop();
    }
}
