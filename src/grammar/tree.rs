//! Parse tree nodes and rule-location extraction.
//!
//! A successful parse yields a tree of named rule nodes, each spanning the
//! tokens that rule consumed. Locations are pulled out with one explicit
//! post-order traversal into a rule-name keyed map, so callers can ask
//! "where did `month_of_year` match" without walking the tree themselves.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The matched text and position of one grammar-rule invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseRuleLocation {
    pub rule_name: String,
    pub text: String,
    pub line: u32,
    pub start: usize,
    pub end: usize,
}

/// One node of the parse tree: a named rule and the byte span of the tokens
/// it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNode {
    pub rule: &'static str,
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    pub fn new(rule: &'static str, start: usize, end: usize, line: u32) -> Self {
        Self { rule, start, end, line, children: Vec::new() }
    }
}

/// Collect every rule invocation that consumed at least one token, mapped by
/// rule name. A rule may fire more than once; locations within a name keep
/// traversal order.
pub fn rule_locations(root: &ParseNode, source: &str) -> HashMap<String, Vec<ParseRuleLocation>> {
    let mut locations: HashMap<String, Vec<ParseRuleLocation>> = HashMap::new();
    collect(root, source, &mut locations);
    locations
}

fn collect(node: &ParseNode, source: &str, out: &mut HashMap<String, Vec<ParseRuleLocation>>) {
    for child in &node.children {
        collect(child, source, out);
    }
    if node.end > node.start {
        out.entry(node.rule.to_string()).or_default().push(ParseRuleLocation {
            rule_name: node.rule.to_string(),
            text: source[node.start..node.end].to_string(),
            line: node.line,
            start: node.start,
            end: node.end,
        });
    }
}
