//! Annotation extraction.
//!
//! The lead comment line of a statement names the generated query function
//! and selects its operation kind:
//!
//! ```text
//! -- :name get_user_by_id :one
//! select * from users where id = :id;
//! ```
//!
//! Parsing is permissive: a lead line with no `:name` directive, or with an
//! unrecognized trailing token, degrades to defaults instead of erroring.
//! Documentation comments must never break compilation.

use nom::{
    IResult,
    bytes::complete::{tag, take_while1},
    character::complete::multispace1,
    sequence::{pair, preceded},
};
use serde::{Deserialize, Serialize};

/// The expected result shape of a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// A set of rows (the default).
    #[default]
    Many,
    /// A single row.
    One,
    /// A single non-record value.
    Scalar,
    /// A multi-statement script or batched execution.
    Multi,
    /// An affected-row count.
    Affected,
    /// The driver's raw cursor, unshaped.
    Raw,
}

impl OperationKind {
    /// Every kind, in declaration order.
    pub const ALL: [OperationKind; 6] = [
        OperationKind::Many,
        OperationKind::One,
        OperationKind::Scalar,
        OperationKind::Multi,
        OperationKind::Affected,
        OperationKind::Raw,
    ];

    /// Map a modifier spelling (word or glyph, without the leading `:`) to a
    /// kind. Unknown spellings map to `None`, never an error.
    pub fn from_modifier(modifier: &str) -> Option<Self> {
        match modifier {
            "many" | "*" => Some(Self::Many),
            "one" | "^" => Some(Self::One),
            "scalar" | "$" => Some(Self::Scalar),
            "multi" | "!" => Some(Self::Multi),
            "affected" | "#" => Some(Self::Affected),
            "raw" | "~" => Some(Self::Raw),
            _ => None,
        }
    }

    /// The long-form modifier word for this kind.
    pub fn word(&self) -> &'static str {
        match self {
            Self::Many => "many",
            Self::One => "one",
            Self::Scalar => "scalar",
            Self::Multi => "multi",
            Self::Affected => "affected",
            Self::Raw => "raw",
        }
    }

    /// The symbolic modifier glyph for this kind.
    pub fn glyph(&self) -> char {
        match self {
            Self::Many => '*',
            Self::One => '^',
            Self::Scalar => '$',
            Self::Multi => '!',
            Self::Affected => '#',
            Self::Raw => '~',
        }
    }
}

/// The name/modifier directive parsed from a statement's lead comment line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// `None` for anonymous (documentation-only) statements.
    pub name: Option<String>,
    pub kind: OperationKind,
}

impl Annotation {
    pub fn parse(lead: &str) -> Self {
        let (name, kind) = get_funcop(lead);
        Self { name, kind }
    }
}

/// Extract the query name and operation kind from a lead comment line.
///
/// The grammar is `:name <query_name> [... :modifier]`: a literal `:name`
/// directive, the query's name, and an optional trailing modifier token.
/// Lines without a directive yield `(None, Many)`; an unrecognized trailing
/// token is ordinary text and leaves the kind at `Many`.
pub fn get_funcop(lead: &str) -> (Option<String>, OperationKind) {
    let Ok((rest, name)) = name_directive(lead.trim()) else {
        return (None, OperationKind::Many);
    };
    let kind = rest
        .split_whitespace()
        .next_back()
        .and_then(|token| token.strip_prefix(':'))
        .and_then(OperationKind::from_modifier)
        .unwrap_or_default();
    (Some(name.to_string()), kind)
}

/// Parse the `:name <query_name>` directive.
fn name_directive(input: &str) -> IResult<&str, &str> {
    preceded(pair(tag(":name"), multispace1), query_name)(input)
}

/// Parse a query name: word characters, `-` and `_`.
fn query_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-')(input)
}
