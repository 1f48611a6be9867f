//! SQL tokenizer using nom.
//!
//! Splits raw SQL source into statements and classifies each lexical unit.
//! This is deliberately not a SQL grammar: the tokenizer only knows enough
//! structure to find comments and bind-parameter markers. String literals,
//! quoted identifiers and comments each lex as a single token, so
//! placeholder-like text inside them is inert.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take, take_until, take_while, take_while1},
    character::complete::{char, multispace1, not_line_ending, one_of, satisfy},
    combinator::{map, opt, recognize},
    multi::many0,
    sequence::{pair, tuple},
};
use serde::{Deserialize, Serialize};

/// Classification of a lexical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Line (`--`) or block (`/* ... */`) comment, delimiters included.
    Comment,
    /// A bind-parameter marker: `$1`, `:name`, `?`, `%(name)s`.
    Placeholder,
    /// Operators and separators, including the `::` cast.
    Punctuation,
    /// Everything else: identifiers, keywords, literals, whitespace runs.
    Other,
}

/// An atomic lexical unit. Concatenating the `text` of a statement's tokens
/// reproduces the statement text exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// One top-level statement: a flat run of tokens ending at (and including)
/// a `;` separator, or at end of input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub tokens: Vec<Token>,
}

impl Statement {
    /// Tokenize a single statement's text.
    pub fn from_sql(sql: &str) -> Self {
        Self {
            tokens: tokenize(sql),
        }
    }

    /// The exact source text of this statement.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// Iterate over the placeholder tokens in source order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Token> {
        self.tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Placeholder)
    }

    /// Whether the statement contains anything beyond comments and whitespace.
    pub fn is_executable(&self) -> bool {
        self.tokens.iter().any(|t| match t.kind {
            TokenKind::Comment => false,
            TokenKind::Placeholder => true,
            TokenKind::Punctuation => t.text != ";",
            TokenKind::Other => !t.text.trim().is_empty(),
        })
    }
}

/// Tokenize a full source string into a flat token stream.
///
/// Lexing is total: unrecognizable bytes degrade to one-character punctuation
/// tokens rather than failing.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        match next_token(rest) {
            Ok((remaining, token)) => {
                rest = remaining;
                tokens.push(token);
            }
            // take(1) always succeeds on non-empty input.
            Err(_) => break,
        }
    }
    tokens
}

/// Split a source string into statements at top-level `;` separators.
///
/// Separators inside string literals, quoted identifiers and comments do not
/// split, since those lex as single tokens. The `;` stays attached to the
/// statement it ends.
pub fn split_statements(source: &str) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut current = Statement::default();
    for token in tokenize(source) {
        let ends = token.kind == TokenKind::Punctuation && token.text == ";";
        current.tokens.push(token);
        if ends {
            statements.push(std::mem::take(&mut current));
        }
    }
    if !current.tokens.is_empty() {
        statements.push(current);
    }
    statements
}

fn next_token(input: &str) -> IResult<&str, Token> {
    alt((
        map(multispace1, |s: &str| Token::new(TokenKind::Other, s)),
        map(line_comment, |s| Token::new(TokenKind::Comment, s)),
        map(block_comment, |s| Token::new(TokenKind::Comment, s)),
        map(string_literal, |s| Token::new(TokenKind::Other, s)),
        map(quoted_identifier, |s| Token::new(TokenKind::Other, s)),
        // The cast operator must win over `:name` placeholders.
        map(tag("::"), |s: &str| Token::new(TokenKind::Punctuation, s)),
        map(placeholder_marker, |s| {
            Token::new(TokenKind::Placeholder, s)
        }),
        map(word, |s| Token::new(TokenKind::Other, s)),
        map(take(1usize), |s: &str| Token::new(TokenKind::Punctuation, s)),
    ))(input)
}

/// Parse a line comment: `-- ...` up to the line break.
fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("--"), not_line_ending))(input)
}

/// Parse a block comment: `/* ... */`.
fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize(tuple((tag("/*"), take_until("*/"), tag("*/"))))(input)
}

/// Parse a single-quoted string literal with `''` escapes.
fn string_literal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        char('\''),
        many0(alt((take_while1(|c| c != '\''), tag("''")))),
        char('\''),
    )))(input)
}

/// Parse a double-quoted identifier.
fn quoted_identifier(input: &str) -> IResult<&str, &str> {
    recognize(tuple((char('"'), take_while(|c| c != '"'), char('"'))))(input)
}

/// Parse a bind-parameter marker.
fn placeholder_marker(input: &str) -> IResult<&str, &str> {
    alt((pyformat_marker, sigil_marker, recognize(char('?'))))(input)
}

/// Parse a pyformat marker: `%(name)s`, `%()s`, or a malformed variant like
/// `%(name)d`. Malformed variants still lex as placeholders so the gatherer
/// can reject them with a useful error.
fn pyformat_marker(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        tag("%("),
        take_while(|c: char| c != ')' && c != '\n'),
        char(')'),
        opt(satisfy(|c| c.is_ascii_alphabetic())),
    )))(input)
}

/// Parse a sigil marker: `$1`, `$name`, `:1`, `:name`.
fn sigil_marker(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        one_of("$:"),
        take_while1(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

/// Parse an identifier, keyword or number run.
fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}
