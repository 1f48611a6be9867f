//! Parameter normalization.
//!
//! Rewrites a statement's placeholders into the target driver's native
//! syntax. Rewriting operates on placeholder token spans only, so everything
//! else in the statement, including `::type` cast suffixes attached to a
//! placeholder, survives byte-for-byte.

use indexmap::IndexMap;

use crate::driver::Driver;
use crate::params::ParameterMap;
use crate::token::{Statement, TokenKind};

/// Keyword parameter name → 1-based positional index, for drivers that bind
/// strictly by position.
pub type Remapping = IndexMap<String, usize>;

/// Rewrite a statement's placeholders for the target driver.
///
/// Positional markers are renumbered contiguously from `start + 1` in
/// first-appearance order, whatever the driver. Keyword markers either become
/// the driver's named syntax (remapping `None`), or, for positional-only
/// drivers, take the next unused slots after all positional parameters, in
/// gather order — never alphabetical. The remapping is `None` rather than
/// empty when there are no keyword parameters to remap, so callers can tell
/// "nothing to remap" from "driver needs no remapping".
///
/// A statement with no placeholders comes back unchanged.
pub fn normalize_parameters(
    statement: &Statement,
    driver: Driver,
    posargs: &ParameterMap,
    kwdargs: &ParameterMap,
    start: usize,
) -> (String, Option<Remapping>) {
    if posargs.is_empty() && kwdargs.is_empty() {
        return (statement.text(), None);
    }

    let syntax = driver.syntax();
    let mut rewrites: IndexMap<&str, String> = IndexMap::new();
    for (i, raw) in posargs.keys().enumerate() {
        rewrites.insert(raw.as_str(), (syntax.positional)(start + i + 1));
    }

    let mut remapping = None;
    match syntax.keyword {
        Some(keyword) => {
            for (raw, param) in kwdargs {
                rewrites.insert(raw.as_str(), keyword(&param.name));
            }
        }
        None if !kwdargs.is_empty() => {
            let base = start + posargs.len();
            let mut map = Remapping::new();
            for (i, (raw, param)) in kwdargs.iter().enumerate() {
                let index = base + i + 1;
                rewrites.insert(raw.as_str(), (syntax.positional)(index));
                map.insert(param.name.clone(), index);
            }
            remapping = Some(map);
        }
        None => {}
    }

    let mut sql = String::with_capacity(statement.tokens.iter().map(|t| t.text.len()).sum());
    for token in &statement.tokens {
        match token.kind {
            TokenKind::Placeholder => match rewrites.get(token.text.as_str()) {
                Some(replacement) => sql.push_str(replacement),
                None => sql.push_str(&token.text),
            },
            _ => sql.push_str(&token.text),
        }
    }
    (sql, remapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterDescriptor;

    fn posargs(entries: &[(&str, &str)]) -> ParameterMap {
        entries
            .iter()
            .map(|(raw, name)| (raw.to_string(), ParameterDescriptor::positional(*name)))
            .collect()
    }

    fn kwdargs(entries: &[(&str, &str)]) -> ParameterMap {
        entries
            .iter()
            .map(|(raw, name)| (raw.to_string(), ParameterDescriptor::keyword(*name)))
            .collect()
    }

    #[test]
    fn test_normalize_postgres_mixed() {
        let statement = Statement::from_sql("select * from foo where blar=$1, bar=:bar::bar");
        let (sql, remapping) = normalize_parameters(
            &statement,
            Driver::Postgres,
            &posargs(&[("$1", "arg1")]),
            &kwdargs(&[(":bar", "bar")]),
            0,
        );
        assert_eq!(sql, "select * from foo where blar=$1, bar=$2::bar");
        let remapping = remapping.unwrap();
        assert_eq!(remapping.len(), 1);
        assert_eq!(remapping["bar"], 2);
    }

    #[test]
    fn test_normalize_psycopg_named() {
        let statement = Statement::from_sql("select * from foo where blar=:blar, bar=:bar::bar");
        let (sql, remapping) = normalize_parameters(
            &statement,
            Driver::Psycopg,
            &posargs(&[]),
            &kwdargs(&[(":bar", "bar"), (":blar", "blar")]),
            0,
        );
        assert_eq!(sql, "select * from foo where blar=%(blar)s, bar=%(bar)s::bar");
        assert_eq!(remapping, None);
    }

    #[test]
    fn test_normalize_already_native() {
        let statement = Statement::from_sql("select * from foo where blar=$1, bar=$2");
        let (sql, remapping) = normalize_parameters(
            &statement,
            Driver::Postgres,
            &posargs(&[("$1", "arg1"), ("$2", "arg2")]),
            &ParameterMap::new(),
            0,
        );
        assert_eq!(sql, "select * from foo where blar=$1, bar=$2");
        assert_eq!(remapping, None);
    }

    #[test]
    fn test_normalize_no_placeholders_is_identity() {
        let statement = Statement::from_sql("select * from foo");
        for driver in Driver::ALL {
            let (sql, remapping) = normalize_parameters(
                &statement,
                driver,
                &ParameterMap::new(),
                &ParameterMap::new(),
                7,
            );
            assert_eq!(sql, "select * from foo");
            assert_eq!(remapping, None);
        }
    }

    #[test]
    fn test_normalize_renumbers_sparse_positionals() {
        let statement = Statement::from_sql("select * from foo where a=$3 and b=$7");
        let (sql, remapping) = normalize_parameters(
            &statement,
            Driver::Postgres,
            &posargs(&[("$3", "arg3"), ("$7", "arg7")]),
            &ParameterMap::new(),
            0,
        );
        assert_eq!(sql, "select * from foo where a=$1 and b=$2");
        assert_eq!(remapping, None);
    }

    #[test]
    fn test_normalize_sqlite_rewrites_both_ways() {
        let statement = Statement::from_sql("select * from foo where a=? and b=%(bar)s");
        let (sql, remapping) = normalize_parameters(
            &statement,
            Driver::Sqlite,
            &posargs(&[("?", "arg1")]),
            &kwdargs(&[("%(bar)s", "bar")]),
            0,
        );
        assert_eq!(sql, "select * from foo where a=?1 and b=:bar");
        assert_eq!(remapping, None);
    }

    #[test]
    fn test_normalize_start_offset() {
        let statement = Statement::from_sql("update foo set a=$1 where b=:b");
        let (sql, remapping) = normalize_parameters(
            &statement,
            Driver::Postgres,
            &posargs(&[("$1", "arg1")]),
            &kwdargs(&[(":b", "b")]),
            4,
        );
        assert_eq!(sql, "update foo set a=$5 where b=$6");
        assert_eq!(remapping.unwrap()["b"], 6);
    }

    #[test]
    fn test_remapping_indices_continue_after_positionals() {
        let statement = Statement::from_sql("select * from t where a=$1 and b=:x and c=:y");
        let (_, remapping) = normalize_parameters(
            &statement,
            Driver::Postgres,
            &posargs(&[("$1", "arg1")]),
            &kwdargs(&[(":x", "x"), (":y", "y")]),
            0,
        );
        let remapping = remapping.unwrap();
        let indices: Vec<usize> = remapping.values().copied().collect();
        assert_eq!(indices, vec![2, 3]);
    }
}
