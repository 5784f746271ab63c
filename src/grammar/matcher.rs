//! Grammar matching for a single candidate group.
//!
//! Recursive descent over the candidate's tokens, treating the entire
//! candidate as one date/time phrase. There is no partial credit: the
//! top-level rule must consume every token and produce at least one dated
//! component, otherwise the attempt reports no match. Outright grammar
//! rejection is an expected, frequent outcome handled by the recovery
//! controller, so it surfaces as `None` rather than an error.
//!
//! Grammar sketch:
//!
//! ```text
//! date_time_phrase := (hedge | connector)* expression ((connector | ",")* expression)?
//! expression       := explicit_date | relative_date | explicit_time
//! explicit_date    := month day? ","? year?
//!                   | day "of"? month ","? year?
//!                   | number "/" number ("/" year)?
//!                   | year "-" number "-" number
//! relative_date    := relative_day
//!                   | direction? weekday
//!                   | direction unit
//!                   | number unit ("ago" | "from" "now")?
//! explicit_time    := time_word
//!                   | hour ":" minute meridiem?
//!                   | hour meridiem
//!                   | hour "o" "'" "clock"
//!                   | hour                      (bare, value only inferred)
//! ```

use chrono::Weekday;
use log::debug;

use crate::grammar::tree::ParseNode;
use crate::grammar::vocabulary::{Direction, Meridiem, Unit, Vocabulary};
use crate::lexer::{Token, TokenKind};

/// Date component of a parsed phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSpec {
    /// Calendar date; a missing year resolves in the reference year.
    Absolute { month: u32, day: u32, year: Option<i32> },
    /// Whole-day offset from the reference ("tomorrow" is 1).
    DayOffset(i64),
    /// A weekday, optionally qualified ("next friday").
    OnWeekday { weekday: Weekday, direction: Option<Direction> },
    /// Signed shift from the reference ("in 2 weeks", "3 hours ago").
    Shift { amount: i64, unit: Unit },
}

/// Time-of-day component of a parsed phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpec {
    pub hour: u32,
    pub minute: u32,
    pub meridiem: Option<Meridiem>,
    /// False when the value was inferred from a bare numeral with no unit.
    /// The validator's ambiguity rule keys on this.
    pub explicit: bool,
}

/// Semantic summary of a successful parse.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Phrase {
    pub date: Option<DateSpec>,
    pub time: Option<TimeSpec>,
}

impl Phrase {
    fn is_empty(&self) -> bool {
        self.date.is_none() && self.time.is_none()
    }

    /// Merge a second sub-expression into this one.
    ///
    /// Keeps the original engine's assumption that the first expression is
    /// the date and the second the time. Slot-wise filling means the
    /// assumption only bites when both expressions carry the same slot
    /// (e.g. two bare numbers). Known limitation, not a contract.
    fn merged_with(self, second: Phrase) -> Phrase {
        Phrase { date: self.date.or(second.date), time: second.time.or(self.time) }
    }
}

/// A successful whole-candidate parse.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub tree: ParseNode,
    pub phrase: Phrase,
    /// Byte span of the consumed tokens in the original source.
    pub start: usize,
    pub end: usize,
    pub line: u32,
}

/// Attempt to parse the token list as one date/time phrase.
pub fn match_once(tokens: &[Token], vocabulary: &Vocabulary) -> Option<ParseOutcome> {
    let toks: Vec<&Token> = tokens
        .iter()
        .filter(|t| {
            t.kind != TokenKind::Whitespace && t.kind != TokenKind::End && !t.text.is_empty()
        })
        .collect();
    if toks.is_empty() {
        return None;
    }

    let mut parser = Parser { toks: &toks, vocabulary, pos: 0 };
    let Some((tree, phrase)) = parser.parse_phrase() else {
        debug!("grammar rejected candidate starting at {}", toks[0].offset);
        return None;
    };
    if !parser.at_end() {
        debug!(
            "grammar matched a prefix only ({} of {} tokens), rejecting",
            parser.pos,
            toks.len()
        );
        return None;
    }
    if tree.children.is_empty() || phrase.is_empty() {
        return None;
    }
    Some(ParseOutcome { start: tree.start, end: tree.end, line: tree.line, tree, phrase })
}

struct Parser<'a> {
    toks: &'a [&'a Token],
    vocabulary: &'a Vocabulary,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn at_end(&self) -> bool {
        self.pos == self.toks.len()
    }

    fn peek(&self) -> Option<&'a Token> {
        self.toks.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<&'a Token> {
        self.toks.get(self.pos + offset).copied()
    }

    /// Word text at the cursor, if the cursor is on a word.
    fn word(&self) -> Option<&'a str> {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Word => Some(&t.text),
            _ => None,
        }
    }

    fn eat_word(&mut self, text: &str) -> bool {
        if self.word() == Some(text) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_punct(&mut self, text: &str) -> bool {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Punctuation && t.text == text => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Number at the cursor within `range`, without consuming it.
    fn peek_number(&self, range: std::ops::RangeInclusive<i64>) -> Option<i64> {
        let value = self.peek()?.number()?;
        range.contains(&value).then_some(value)
    }

    /// Node covering the tokens consumed since `from`.
    fn node(&self, rule: &'static str, from: usize) -> ParseNode {
        let first = self.toks[from];
        let last = self.toks[self.pos - 1];
        ParseNode::new(rule, first.offset, last.end(), first.line)
    }

    /// True when two source-adjacent tokens abut with no gap ("20th", "5pm").
    fn abuts_previous(&self) -> bool {
        match (self.toks.get(self.pos.wrapping_sub(1)), self.peek()) {
            (Some(prev), Some(next)) => prev.end() == next.offset,
            _ => false,
        }
    }

    fn parse_phrase(&mut self) -> Option<(ParseNode, Phrase)> {
        let start = self.pos;

        // Hedges and leading connectors carry no meaning of their own but
        // belong to the phrase ("at 5", "maybe around noon").
        while let Some(word) = self.word() {
            if self.vocabulary.is_hedge(word) || self.vocabulary.is_connector(word) {
                self.pos += 1;
            } else {
                break;
            }
        }

        let (first_node, first) = self.parse_expression()?;
        let mut children = vec![first_node];
        let mut phrase = first;

        // Optional second sub-expression, reachable through connector glue.
        // If none follows, the glue is left unconsumed so the trailing-noise
        // rule (whole-candidate consumption) can reject and trigger recovery.
        let save = self.pos;
        loop {
            if self.eat_punct(",") {
                continue;
            }
            match self.word() {
                Some(word) if self.vocabulary.is_connector(word) => self.pos += 1,
                _ => break,
            }
        }
        match self.parse_expression() {
            Some((second_node, second)) => {
                children.push(second_node);
                phrase = phrase.merged_with(second);
            }
            None => self.pos = save,
        }

        let mut node = self.node("date_time_phrase", start);
        node.children = children;
        Some((node, phrase))
    }

    fn parse_expression(&mut self) -> Option<(ParseNode, Phrase)> {
        self.parse_explicit_date()
            .or_else(|| self.parse_relative_date())
            .or_else(|| self.parse_explicit_time())
    }

    // ---- explicit dates -------------------------------------------------

    fn parse_explicit_date(&mut self) -> Option<(ParseNode, Phrase)> {
        self.parse_month_first()
            .or_else(|| self.parse_day_first())
            .or_else(|| self.parse_numeric_date())
    }

    /// "june", "june 20th", "june 20, 2026"
    fn parse_month_first(&mut self) -> Option<(ParseNode, Phrase)> {
        let from = self.pos;
        let month = self.word().and_then(|w| self.vocabulary.month(w))?;
        self.pos += 1;
        let mut children = vec![self.node("month_of_year", from)];

        let day = match self.parse_day_of_month() {
            Some((day, node)) => {
                children.push(node);
                Some(day)
            }
            None => None,
        };
        let year = self.parse_year(&mut children);

        let mut node = self.node("explicit_date", from);
        node.children = children;
        let date = DateSpec::Absolute { month, day: day.unwrap_or(1), year };
        Some((node, Phrase { date: Some(date), time: None }))
    }

    /// "20th of june", "20 june 2026"
    fn parse_day_first(&mut self) -> Option<(ParseNode, Phrase)> {
        let from = self.pos;
        let (day, day_node) = self.parse_day_of_month()?;
        let mut children = vec![day_node];

        self.eat_word("of");
        let month_from = self.pos;
        let Some(month) = self.word().and_then(|w| self.vocabulary.month(w)) else {
            self.pos = from;
            return None;
        };
        self.pos += 1;
        children.push(self.node("month_of_year", month_from));
        let year = self.parse_year(&mut children);

        let mut node = self.node("explicit_date", from);
        node.children = children;
        let date = DateSpec::Absolute { month, day, year };
        Some((node, Phrase { date: Some(date), time: None }))
    }

    /// "6/20", "6/20/2026", "2026-06-20"
    fn parse_numeric_date(&mut self) -> Option<(ParseNode, Phrase)> {
        let from = self.pos;
        let first = self.peek_number(1..=9999)?;
        let separator = match self.peek_at(1) {
            Some(t) if t.kind == TokenKind::Punctuation && (t.text == "/" || t.text == "-") => {
                t.text.clone()
            }
            _ => return None,
        };

        if separator == "-" {
            // ISO order: year-month-day, year written in full
            if !(1000..=9999).contains(&first) {
                return None;
            }
            self.pos += 1;
            let year_node = self.node("year_of_date", from);
            if !self.eat_punct("-") {
                self.pos = from;
                return None;
            }
            let month_from = self.pos;
            let Some(month) = self.peek_number(1..=12) else {
                self.pos = from;
                return None;
            };
            self.pos += 1;
            let month_node = self.node("month_of_year", month_from);
            if !self.eat_punct("-") {
                self.pos = from;
                return None;
            }
            let day_from = self.pos;
            let Some(day) = self.peek_number(1..=31) else {
                self.pos = from;
                return None;
            };
            self.pos += 1;
            let day_node = self.node("day_of_month", day_from);

            let mut node = self.node("explicit_date", from);
            node.children = vec![year_node, month_node, day_node];
            let date = DateSpec::Absolute {
                month: month as u32,
                day: day as u32,
                year: Some(first as i32),
            };
            return Some((node, Phrase { date: Some(date), time: None }));
        }

        // slash order: month/day, optional /year
        if !(1..=12).contains(&first) {
            return None;
        }
        self.pos += 1;
        let month_node = self.node("month_of_year", from);
        if !self.eat_punct("/") {
            self.pos = from;
            return None;
        }
        let day_from = self.pos;
        let Some(day) = self.peek_number(1..=31) else {
            self.pos = from;
            return None;
        };
        self.pos += 1;
        let day_node = self.node("day_of_month", day_from);

        let mut children = vec![month_node, day_node];
        let mut year = None;
        let save = self.pos;
        if self.eat_punct("/") {
            let year_from = self.pos;
            match self.peek_number(1000..=9999) {
                Some(value) => {
                    self.pos += 1;
                    children.push(self.node("year_of_date", year_from));
                    year = Some(value as i32);
                }
                None => self.pos = save,
            }
        }

        let mut node = self.node("explicit_date", from);
        node.children = children;
        let date = DateSpec::Absolute { month: first as u32, day: day as u32, year };
        Some((node, Phrase { date: Some(date), time: None }))
    }

    /// Day number 1-31, optionally with an abutting ordinal suffix ("20th").
    fn parse_day_of_month(&mut self) -> Option<(u32, ParseNode)> {
        let from = self.pos;
        let day = self.peek_number(1..=31)?;
        self.pos += 1;
        if self.abuts_previous() {
            if let Some(word) = self.word() {
                if self.vocabulary.is_ordinal_suffix(word) {
                    self.pos += 1;
                }
            }
        }
        Some((day as u32, self.node("day_of_month", from)))
    }

    /// Four-digit year, optionally preceded by a comma ("june 20, 2026").
    fn parse_year(&mut self, children: &mut Vec<ParseNode>) -> Option<i32> {
        let save = self.pos;
        self.eat_punct(",");
        let from = self.pos;
        match self.peek_number(1000..=9999) {
            Some(year) => {
                self.pos += 1;
                children.push(self.node("year_of_date", from));
                Some(year as i32)
            }
            None => {
                self.pos = save;
                None
            }
        }
    }

    // ---- relative dates -------------------------------------------------

    fn parse_relative_date(&mut self) -> Option<(ParseNode, Phrase)> {
        let from = self.pos;

        // "today", "tomorrow", "yesterday"
        if let Some(offset) = self.word().and_then(|w| self.vocabulary.relative_day(w)) {
            self.pos += 1;
            let mut node = self.node("relative_date", from);
            node.children = vec![self.node("relative_day", from)];
            return Some((node, Phrase { date: Some(DateSpec::DayOffset(offset)), time: None }));
        }

        // "next friday", "last week", "this monday"
        if let Some(direction) = self.word().and_then(|w| self.vocabulary.direction(w)) {
            self.pos += 1;
            if let Some(weekday) = self.word().and_then(|w| self.vocabulary.weekday(w)) {
                let weekday_from = self.pos;
                self.pos += 1;
                let mut node = self.node("relative_date", from);
                node.children = vec![self.node("day_of_week", weekday_from)];
                let date = DateSpec::OnWeekday { weekday, direction: Some(direction) };
                return Some((node, Phrase { date: Some(date), time: None }));
            }
            if let Some(unit) = self.word().and_then(|w| self.vocabulary.unit(w)) {
                self.pos += 1;
                let amount = match direction {
                    Direction::Next | Direction::Coming => 1,
                    Direction::Last => -1,
                    Direction::This => 0,
                };
                let mut node = self.node("relative_date", from);
                node.children = vec![self.node("relative_offset", from)];
                let date = DateSpec::Shift { amount, unit };
                return Some((node, Phrase { date: Some(date), time: None }));
            }
            self.pos = from;
        }

        // bare weekday: the coming one
        if let Some(weekday) = self.word().and_then(|w| self.vocabulary.weekday(w)) {
            self.pos += 1;
            let mut node = self.node("relative_date", from);
            node.children = vec![self.node("day_of_week", from)];
            let date = DateSpec::OnWeekday { weekday, direction: None };
            return Some((node, Phrase { date: Some(date), time: None }));
        }

        // "30 minutes" / "2 days ago" / "2 weeks from now"
        if self.peek_number(0..=9999).is_some() {
            let amount = self.peek_number(0..=9999)?;
            let Some(unit) = self.peek_at(1).filter(|t| t.kind == TokenKind::Word).and_then(|t| {
                self.vocabulary.unit(&t.text)
            }) else {
                return None;
            };
            self.pos += 2;
            let mut signed = amount;
            if self.eat_word("ago") {
                signed = -amount;
            } else {
                let save = self.pos;
                if self.eat_word("from") && !self.eat_word("now") {
                    self.pos = save;
                }
            }
            let mut node = self.node("relative_date", from);
            node.children = vec![self.node("relative_offset", from)];
            let date = DateSpec::Shift { amount: signed, unit };
            return Some((node, Phrase { date: Some(date), time: None }));
        }

        None
    }

    // ---- times ------------------------------------------------------------

    fn parse_explicit_time(&mut self) -> Option<(ParseNode, Phrase)> {
        let from = self.pos;

        // "noon", "morning", "tonight"
        if let Some(hour) = self.word().and_then(|w| self.vocabulary.time_word(w)) {
            self.pos += 1;
            let mut node = self.node("explicit_time", from);
            node.children = vec![self.node("time_word", from)];
            let time = TimeSpec { hour, minute: 0, meridiem: None, explicit: true };
            return Some((node, Phrase { date: None, time: Some(time) }));
        }

        let hour = self.peek_number(0..=23)?;
        self.pos += 1;
        let hour_node = self.node("hour_of_day", from);

        // "5:30", "5:30pm"
        if self.peek().is_some_and(|t| t.kind == TokenKind::Punctuation && t.text == ":") {
            let save = self.pos;
            self.pos += 1;
            let minute_from = self.pos;
            let Some(minute) = self.peek_number(0..=59) else {
                self.pos = save;
                return self.finish_bare_hour(from, hour, hour_node);
            };
            self.pos += 1;
            let minute_node = self.node("minute_of_hour", minute_from);
            let (meridiem, meridiem_node) = self.parse_meridiem(hour);
            let mut node = self.node("explicit_time", from);
            node.children = vec![hour_node, minute_node];
            node.children.extend(meridiem_node);
            let time = TimeSpec {
                hour: hour as u32,
                minute: minute as u32,
                meridiem,
                explicit: true,
            };
            return Some((node, Phrase { date: None, time: Some(time) }));
        }

        // "5pm", "5 pm"
        if let (meridiem @ Some(_), meridiem_node) = self.parse_meridiem(hour) {
            let mut node = self.node("explicit_time", from);
            node.children = vec![hour_node];
            node.children.extend(meridiem_node);
            let time = TimeSpec { hour: hour as u32, minute: 0, meridiem, explicit: true };
            return Some((node, Phrase { date: None, time: Some(time) }));
        }

        // "5 o'clock"
        let save = self.pos;
        if (1..=12).contains(&hour)
            && self.eat_word("o")
            && self.eat_punct("'")
            && self.eat_word("clock")
        {
            let mut node = self.node("explicit_time", from);
            node.children = vec![hour_node];
            let time = TimeSpec { hour: hour as u32, minute: 0, meridiem: None, explicit: true };
            return Some((node, Phrase { date: None, time: Some(time) }));
        }
        self.pos = save;

        self.finish_bare_hour(from, hour, hour_node)
    }

    /// Bare numeral read as an hour. The value is only inferred; the
    /// validator may still reject it in ambiguous multi-candidate inputs.
    fn finish_bare_hour(
        &mut self,
        from: usize,
        hour: i64,
        hour_node: ParseNode,
    ) -> Option<(ParseNode, Phrase)> {
        let mut node = self.node("explicit_time", from);
        node.children = vec![hour_node];
        let time = TimeSpec { hour: hour as u32, minute: 0, meridiem: None, explicit: false };
        Some((node, Phrase { date: None, time: Some(time) }))
    }

    /// Meridiem marker after an hour, valid only for 1-12.
    fn parse_meridiem(&mut self, hour: i64) -> (Option<Meridiem>, Option<ParseNode>) {
        if !(1..=12).contains(&hour) {
            return (None, None);
        }
        let from = self.pos;
        match self.word().and_then(|w| self.vocabulary.meridiem(w)) {
            Some(meridiem) => {
                self.pos += 1;
                (Some(meridiem), Some(self.node("meridiem_indicator", from)))
            }
            None => (None, None),
        }
    }
}
