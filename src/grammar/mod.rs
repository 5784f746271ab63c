//! The temporal grammar: vocabulary table, matcher, and parse-tree types.

pub mod matcher;
pub mod tree;
pub mod vocabulary;

pub use matcher::{match_once, DateSpec, ParseOutcome, Phrase, TimeSpec};
pub use tree::{rule_locations, ParseNode, ParseRuleLocation};
pub use vocabulary::{Direction, Meridiem, Unit, Vocabulary};
