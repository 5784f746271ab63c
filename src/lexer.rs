//! Tokenizer for free-form input text.
//!
//! Splits text into classified tokens (word / number / punctuation /
//! whitespace / unknown) with full position tracking. Lexing is total: there
//! is no failure path, malformed or unclassifiable characters simply become
//! `Unknown` tokens, and the stream always ends with a terminal `End` token.
//!
//! Word lexemes are case-folded so the grammar can match case-insensitively,
//! but every token keeps its byte offset and length into the original source
//! so the exact original substring is always recoverable by slicing.

use crate::grammar::Vocabulary;

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Alphabetic run that is a vocabulary term.
    Word,
    /// ASCII digit run.
    Number,
    /// Single ASCII punctuation character.
    Punctuation,
    /// Whitespace run (text preserved so spans stay faithful to the source).
    Whitespace,
    /// Anything the grammar can never use, including alphabetic runs that
    /// are not vocabulary terms. Unknown tokens break candidate groups.
    Unknown,
    /// Terminal marker, always the last token.
    End,
}

/// One classified lexical unit. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Case-folded lexeme used for grammar matching.
    pub text: String,
    /// 1-based source line.
    pub line: u32,
    /// 1-based character column within the line.
    pub column: u32,
    /// Byte offset of the lexeme in the original source.
    pub offset: usize,
    /// Byte length of the lexeme in the original source.
    pub len: usize,
}

impl Token {
    /// Byte offset one past the end of the lexeme.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Parsed numeric value for `Number` tokens.
    pub fn number(&self) -> Option<i64> {
        if self.kind == TokenKind::Number { self.text.parse().ok() } else { None }
    }
}

/// Tokenize `text` against `vocabulary`. Total; always appends `End`.
pub fn tokenize(text: &str, vocabulary: &Vocabulary) -> Vec<Token> {
    Lexer::new(text, vocabulary).run()
}

struct Lexer<'a> {
    text: &'a str,
    vocabulary: &'a Vocabulary,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str, vocabulary: &'a Vocabulary) -> Self {
        Self { text, vocabulary, pos: 0, line: 1, column: 1 }
    }

    fn run(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            let token = if ch.is_whitespace() {
                self.read_run(TokenKind::Whitespace, char::is_whitespace)
            } else if ch.is_alphabetic() {
                self.read_word()
            } else if ch.is_ascii_digit() {
                self.read_run(TokenKind::Number, |c| c.is_ascii_digit())
            } else if ch.is_ascii_punctuation() {
                self.read_single(TokenKind::Punctuation)
            } else {
                self.read_run(TokenKind::Unknown, |c| {
                    !c.is_whitespace()
                        && !c.is_alphabetic()
                        && !c.is_ascii_digit()
                        && !c.is_ascii_punctuation()
                })
            };
            tokens.push(token);
        }

        tokens.push(Token {
            kind: TokenKind::End,
            text: String::new(),
            line: self.line,
            column: self.column,
            offset: self.text.len(),
            len: 0,
        });
        tokens
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn advance(&mut self, ch: char) {
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    fn read_word(&mut self) -> Token {
        let token = self.read_run(TokenKind::Word, char::is_alphabetic);
        if self.vocabulary.is_term(&token.text) {
            token
        } else {
            Token { kind: TokenKind::Unknown, ..token }
        }
    }

    fn read_single(&mut self, kind: TokenKind) -> Token {
        let (line, column, offset) = (self.line, self.column, self.pos);
        let ch = self.peek().unwrap_or_default();
        self.advance(ch);
        Token {
            kind,
            text: ch.to_lowercase().collect(),
            line,
            column,
            offset,
            len: ch.len_utf8(),
        }
    }

    fn read_run(&mut self, kind: TokenKind, matches: impl Fn(char) -> bool) -> Token {
        let (line, column, start) = (self.line, self.column, self.pos);
        while let Some(ch) = self.peek() {
            if !matches(ch) {
                break;
            }
            self.advance(ch);
        }
        Token {
            kind,
            text: self.text[start..self.pos].to_lowercase(),
            line,
            column,
            offset: start,
            len: self.pos - start,
        }
    }
}
