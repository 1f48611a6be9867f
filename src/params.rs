//! Parameter gathering.
//!
//! Scans a statement's placeholder tokens and classifies each as positional
//! or keyword, producing two ordered mappings keyed by the raw placeholder
//! spelling. The raw spelling is the key (not the resolved name) because one
//! resolved name can be spelled several ways in one statement, and the
//! rewriter must replace each spelling independently.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{SquillError, SquillResult};
use crate::token::Statement;

/// How a parameter is bound at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Binding {
    /// Bound by argument order.
    Positional,
    /// Bound by name.
    Keyword,
}

/// One parameter of a compiled query's call signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub binding: Binding,
}

impl ParameterDescriptor {
    pub fn positional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binding: Binding::Positional,
        }
    }

    pub fn keyword(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binding: Binding::Keyword,
        }
    }
}

/// Raw placeholder spelling → descriptor, in first-appearance order.
pub type ParameterMap = IndexMap<String, ParameterDescriptor>;

/// Gather the positional and keyword parameters of a statement.
///
/// Numbered markers (`$1`, `:2`) become positional parameters named after the
/// embedded number (`arg1`, `arg2`); anonymous markers (`?`, `%()s`) take the
/// next unused `argN` counter; named markers (`$foo`, `:bar`, `%(baz)s`)
/// become keyword parameters. A spelling seen twice binds one descriptor.
///
/// Iteration order of the returned maps is first appearance in the source
/// text. That ordering is load-bearing: callers bind arguments by position.
pub fn gather_parameters(statement: &Statement) -> SquillResult<(ParameterMap, ParameterMap)> {
    let mut posargs = ParameterMap::new();
    let mut kwdargs = ParameterMap::new();
    let mut anon = 0usize;
    for token in statement.placeholders() {
        let raw = token.text.as_str();
        if posargs.contains_key(raw) || kwdargs.contains_key(raw) {
            continue;
        }
        let name = marker_name(raw)
            .ok_or_else(|| SquillError::malformed(raw, statement.text().trim()))?;
        if name.is_empty() {
            anon += 1;
            posargs.insert(
                raw.to_string(),
                ParameterDescriptor::positional(format!("arg{anon}")),
            );
        } else if name.chars().all(|c| c.is_ascii_digit()) {
            posargs.insert(
                raw.to_string(),
                ParameterDescriptor::positional(format!("arg{name}")),
            );
        } else if is_identifier(name) {
            kwdargs.insert(raw.to_string(), ParameterDescriptor::keyword(name));
        } else {
            return Err(SquillError::malformed(raw, statement.text().trim()));
        }
    }
    Ok((posargs, kwdargs))
}

/// Extract the embedded name from a raw placeholder spelling.
///
/// Empty string means anonymous; `None` means the spelling is not a
/// recognizable marker at all.
fn marker_name(raw: &str) -> Option<&str> {
    if let Some(rest) = raw.strip_prefix("%(") {
        return rest.strip_suffix(")s");
    }
    if raw == "?" {
        return Some("");
    }
    if let Some(rest) = raw.strip_prefix('$').or_else(|| raw.strip_prefix(':')) {
        if !rest.is_empty() {
            return Some(rest);
        }
    }
    None
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gather(sql: &str) -> (ParameterMap, ParameterMap) {
        gather_parameters(&Statement::from_sql(sql)).unwrap()
    }

    #[test]
    fn test_gather_mixed_spellings() {
        let (posargs, kwdargs) =
            gather("select * from t where a=$foo and b=%(bar)s and c=%()s and d=:2");
        let pos: Vec<(&str, &str)> = posargs
            .iter()
            .map(|(raw, p)| (raw.as_str(), p.name.as_str()))
            .collect();
        let kwd: Vec<(&str, &str)> = kwdargs
            .iter()
            .map(|(raw, p)| (raw.as_str(), p.name.as_str()))
            .collect();
        assert_eq!(pos, vec![("%()s", "arg1"), (":2", "arg2")]);
        assert_eq!(kwd, vec![("$foo", "foo"), ("%(bar)s", "bar")]);
        assert!(posargs.values().all(|p| p.binding == Binding::Positional));
        assert!(kwdargs.values().all(|p| p.binding == Binding::Keyword));
    }

    #[test]
    fn test_numbered_markers_take_their_number() {
        let (posargs, _) = gather("select * from t where a=$2 and b=$1");
        let names: Vec<&str> = posargs.values().map(|p| p.name.as_str()).collect();
        // First-appearance order, names from the embedded numbers.
        assert_eq!(names, vec!["arg2", "arg1"]);
    }

    #[test]
    fn test_repeated_spelling_binds_once() {
        let (_, kwdargs) = gather("select * from t where a=:id or b=:id");
        assert_eq!(kwdargs.len(), 1);
        assert_eq!(kwdargs[":id"].name, "id");
    }

    #[test]
    fn test_gather_is_deterministic() {
        let statement = Statement::from_sql("select ?, :a, ?, %()s from t");
        let first = gather_parameters(&statement).unwrap();
        let second = gather_parameters(&statement).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_wrapper_is_fatal() {
        let err = gather_parameters(&Statement::from_sql("select %(foo)d from t")).unwrap_err();
        assert!(matches!(
            err,
            SquillError::MalformedPlaceholder { ref placeholder, .. } if placeholder == "%(foo)d"
        ));
    }

    #[test]
    fn test_malformed_sigil_is_fatal() {
        let err = gather_parameters(&Statement::from_sql("select :1x from t")).unwrap_err();
        assert!(matches!(err, SquillError::MalformedPlaceholder { .. }));
    }

    #[test]
    fn test_no_placeholders() {
        let (posargs, kwdargs) = gather("select 1");
        assert!(posargs.is_empty());
        assert!(kwdargs.is_empty());
    }
}
