//! The fixed lexical catalogue the grammar matches against.
//!
//! The vocabulary is the boundary between recognized words and noise: an
//! alphabetic run that is not a vocabulary term lexes as `Unknown`, which is
//! what breaks candidate groups apart in multi-phrase inputs. The builtin
//! table covers English month/weekday names and common relative terms; hosts
//! can replace whole categories through configuration.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Weekday;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Calendar/clock unit for relative offsets ("in 2 weeks", "3 hours ago").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// 12-hour clock marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meridiem {
    Am,
    Pm,
}

/// Direction words qualifying a weekday or unit ("next friday", "last week").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Last,
    This,
    Coming,
}

/// Keyword tables for the temporal grammar. All terms are lowercase; the
/// lexer case-folds before lookup.
///
/// Missing fields in a deserialized vocabulary fall back to the builtin
/// category wholesale, so a host overriding `hedges` keeps builtin months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Month name -> month number (1-12).
    pub months: BTreeMap<String, u32>,
    /// Weekday name -> ISO weekday number (Monday = 1).
    pub weekdays: BTreeMap<String, u32>,
    /// Relative day word -> day offset from the reference ("tomorrow" -> 1).
    pub relative_days: BTreeMap<String, i64>,
    /// Time-of-day word -> anchor hour ("noon" -> 12, "evening" -> 19).
    pub time_words: BTreeMap<String, u32>,
    /// Unit word -> unit ("weeks" -> Week).
    pub units: BTreeMap<String, Unit>,
    /// Meridiem word -> marker ("pm" -> Pm).
    pub meridiems: BTreeMap<String, Meridiem>,
    /// Direction word -> direction ("next" -> Next).
    pub directions: BTreeMap<String, Direction>,
    /// Low-content joining words the phrase may flow through ("at", "on").
    pub connectors: BTreeSet<String>,
    /// Hedge words that may precede a phrase ("maybe", "around").
    pub hedges: BTreeSet<String>,
    /// Ordinal suffixes attachable to a day number ("20th").
    pub ordinal_suffixes: BTreeSet<String>,
    /// Grammar literals with no category of their own ("ago", "o", "clock").
    pub markers: BTreeSet<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        builtin().clone()
    }
}

impl Vocabulary {
    /// The builtin English vocabulary.
    pub fn builtin() -> &'static Vocabulary {
        builtin()
    }

    /// Check the table for internal consistency. This is the engine's only
    /// fatal error path: a bad table is a configuration defect, not an
    /// input-text condition.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.months.is_empty() {
            return Err(ExtractError::MissingMonths);
        }
        if self.weekdays.is_empty() {
            return Err(ExtractError::MissingWeekdays);
        }
        for (term, month) in &self.months {
            if !(1..=12).contains(month) {
                return Err(ExtractError::ValueOutOfRange {
                    term: term.clone(),
                    value: i64::from(*month),
                });
            }
        }
        for (term, day) in &self.weekdays {
            if !(1..=7).contains(day) {
                return Err(ExtractError::ValueOutOfRange {
                    term: term.clone(),
                    value: i64::from(*day),
                });
            }
        }
        for (term, hour) in &self.time_words {
            if *hour > 23 {
                return Err(ExtractError::ValueOutOfRange {
                    term: term.clone(),
                    value: i64::from(*hour),
                });
            }
        }
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for term in self.terms() {
            if !seen.insert(term) {
                return Err(ExtractError::ConflictingTerm { term: term.to_string() });
            }
        }
        Ok(())
    }

    /// True when `word` (already case-folded) is any vocabulary term.
    pub fn is_term(&self, word: &str) -> bool {
        self.months.contains_key(word)
            || self.weekdays.contains_key(word)
            || self.relative_days.contains_key(word)
            || self.time_words.contains_key(word)
            || self.units.contains_key(word)
            || self.meridiems.contains_key(word)
            || self.directions.contains_key(word)
            || self.connectors.contains(word)
            || self.hedges.contains(word)
            || self.ordinal_suffixes.contains(word)
            || self.markers.contains(word)
    }

    pub fn month(&self, word: &str) -> Option<u32> {
        self.months.get(word).copied()
    }

    pub fn weekday(&self, word: &str) -> Option<Weekday> {
        match self.weekdays.get(word).copied()? {
            1 => Some(Weekday::Mon),
            2 => Some(Weekday::Tue),
            3 => Some(Weekday::Wed),
            4 => Some(Weekday::Thu),
            5 => Some(Weekday::Fri),
            6 => Some(Weekday::Sat),
            7 => Some(Weekday::Sun),
            _ => None,
        }
    }

    pub fn relative_day(&self, word: &str) -> Option<i64> {
        self.relative_days.get(word).copied()
    }

    pub fn time_word(&self, word: &str) -> Option<u32> {
        self.time_words.get(word).copied()
    }

    pub fn unit(&self, word: &str) -> Option<Unit> {
        self.units.get(word).copied()
    }

    pub fn meridiem(&self, word: &str) -> Option<Meridiem> {
        self.meridiems.get(word).copied()
    }

    pub fn direction(&self, word: &str) -> Option<Direction> {
        self.directions.get(word).copied()
    }

    pub fn is_connector(&self, word: &str) -> bool {
        self.connectors.contains(word)
    }

    pub fn is_hedge(&self, word: &str) -> bool {
        self.hedges.contains(word)
    }

    pub fn is_ordinal_suffix(&self, word: &str) -> bool {
        self.ordinal_suffixes.contains(word)
    }

    fn terms(&self) -> impl Iterator<Item = &str> {
        self.months
            .keys()
            .chain(self.weekdays.keys())
            .chain(self.relative_days.keys())
            .chain(self.time_words.keys())
            .chain(self.units.keys())
            .chain(self.meridiems.keys())
            .chain(self.directions.keys())
            .chain(self.connectors.iter())
            .chain(self.hedges.iter())
            .chain(self.ordinal_suffixes.iter())
            .chain(self.markers.iter())
            .map(String::as_str)
    }
}

fn builtin() -> &'static Vocabulary {
    static BUILTIN: Lazy<Vocabulary> = Lazy::new(|| {
        let map_u32 = |pairs: &[(&str, u32)]| -> BTreeMap<String, u32> {
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
        };
        let set = |words: &[&str]| -> BTreeSet<String> {
            words.iter().map(|w| w.to_string()).collect()
        };

        Vocabulary {
            months: map_u32(&[
                ("january", 1),
                ("jan", 1),
                ("february", 2),
                ("feb", 2),
                ("march", 3),
                ("mar", 3),
                ("april", 4),
                ("apr", 4),
                ("may", 5),
                ("june", 6),
                ("jun", 6),
                ("july", 7),
                ("jul", 7),
                ("august", 8),
                ("aug", 8),
                ("september", 9),
                ("sept", 9),
                ("sep", 9),
                ("october", 10),
                ("oct", 10),
                ("november", 11),
                ("nov", 11),
                ("december", 12),
                ("dec", 12),
            ]),
            weekdays: map_u32(&[
                ("monday", 1),
                ("mon", 1),
                ("tuesday", 2),
                ("tue", 2),
                ("tues", 2),
                ("wednesday", 3),
                ("wed", 3),
                ("thursday", 4),
                ("thu", 4),
                ("thur", 4),
                ("thurs", 4),
                ("friday", 5),
                ("fri", 5),
                ("saturday", 6),
                ("sat", 6),
                ("sunday", 7),
                ("sun", 7),
            ]),
            relative_days: [("today", 0i64), ("tomorrow", 1), ("yesterday", -1)]
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            time_words: map_u32(&[
                ("noon", 12),
                ("midday", 12),
                ("midnight", 0),
                ("morning", 9),
                ("afternoon", 14),
                ("evening", 19),
                ("night", 20),
                ("tonight", 20),
            ]),
            units: [
                ("minute", Unit::Minute),
                ("minutes", Unit::Minute),
                ("min", Unit::Minute),
                ("mins", Unit::Minute),
                ("hour", Unit::Hour),
                ("hours", Unit::Hour),
                ("hr", Unit::Hour),
                ("hrs", Unit::Hour),
                ("day", Unit::Day),
                ("days", Unit::Day),
                ("week", Unit::Week),
                ("weeks", Unit::Week),
                ("month", Unit::Month),
                ("months", Unit::Month),
                ("year", Unit::Year),
                ("years", Unit::Year),
                ("yr", Unit::Year),
                ("yrs", Unit::Year),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect(),
            meridiems: [("am", Meridiem::Am), ("pm", Meridiem::Pm)]
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            directions: [
                ("next", Direction::Next),
                ("last", Direction::Last),
                ("this", Direction::This),
                ("coming", Direction::Coming),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect(),
            connectors: set(&["at", "on", "in", "of", "the", "by", "from", "until"]),
            hedges: set(&["about", "around", "maybe", "perhaps", "sometime", "roughly"]),
            ordinal_suffixes: set(&["st", "nd", "rd", "th"]),
            markers: set(&["ago", "now", "o", "clock"]),
        }
    });
    &BUILTIN
}
