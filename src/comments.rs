//! Comment processing for annotated statements.
//!
//! The comments immediately preceding a statement carry its annotation: the
//! first line is the lead (`:name ... :modifier`), anything after it is
//! documentation for the generated query.

use crate::token::{Statement, TokenKind};

/// The annotation line and documentation extracted from a statement's leading
/// comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    /// First comment line, candidate for a `:name` annotation.
    pub lead: String,
    /// Remaining comment lines, joined with `\n`.
    pub doc: String,
}

/// Strip a single leading `--` marker and surrounding whitespace from one
/// comment line. A pure-whitespace line yields the empty string.
pub fn clean_comment(comment: &str) -> &str {
    let trimmed = comment.trim();
    trimmed.strip_prefix("--").unwrap_or(trimmed).trim()
}

/// Strip block-comment delimiters and split into trimmed lines.
///
/// Interior blank lines are preserved as empty strings: a blank separator is
/// what distinguishes an annotation line from free-text documentation, so it
/// is positionally significant.
pub fn split_comments(block: &str) -> Vec<String> {
    let body = block.trim();
    let body = body
        .strip_prefix("/**")
        .or_else(|| body.strip_prefix("/*"))
        .unwrap_or(body);
    let body = body
        .strip_suffix("**/")
        .or_else(|| body.strip_suffix("*/"))
        .unwrap_or(body);
    body.trim()
        .lines()
        .map(|line| line.trim().to_string())
        .collect()
}

/// Collect the comment lines leading a statement, stopping at the first token
/// that is neither a comment nor whitespace.
///
/// Returns `None` when the statement has no leading comment at all. A
/// documentation-only comment is not an error; the caller decides whether to
/// skip the statement.
pub fn preamble(statement: &Statement) -> Option<Preamble> {
    let mut lines = Vec::new();
    for token in &statement.tokens {
        match token.kind {
            TokenKind::Comment => {
                if token.text.starts_with("/*") {
                    lines.extend(
                        split_comments(&token.text)
                            .into_iter()
                            .filter(|line| !line.is_empty()),
                    );
                } else {
                    let cleaned = clean_comment(&token.text);
                    if !cleaned.is_empty() {
                        lines.push(cleaned.to_string());
                    }
                }
            }
            TokenKind::Other if token.text.trim().is_empty() => continue,
            _ => break,
        }
    }
    let mut lines = lines.into_iter();
    let lead = lines.next()?;
    Some(Preamble {
        lead,
        doc: lines.collect::<Vec<_>>().join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_comment() {
        assert_eq!(clean_comment("-- Comments 4 U "), "Comments 4 U");
        assert_eq!(clean_comment("   "), "");
        assert_eq!(clean_comment("--"), "");
        // Only one marker is stripped.
        assert_eq!(clean_comment("---- twice"), "-- twice");
    }

    #[test]
    fn test_split_comments_preserves_blank_lines() {
        let split = split_comments("/** line1\n\nline2 **/");
        assert_eq!(split, vec!["line1", "", "line2"]);
    }

    #[test]
    fn test_split_comments_indented_block() {
        let block = "\n    /** I've got a lot to say.\n\n    And I'm gonna say it. **/\n    ";
        let split = split_comments(block);
        assert_eq!(split, vec!["I've got a lot to say.", "", "And I'm gonna say it."]);
    }

    #[test]
    fn test_preamble_lead_and_doc() {
        let statement = Statement::from_sql(
            "-- :name get_users :many\n-- All the users.\n-- Ordered by id.\nselect * from users;",
        );
        let preamble = preamble(&statement).unwrap();
        assert_eq!(preamble.lead, ":name get_users :many");
        assert_eq!(preamble.doc, "All the users.\nOrdered by id.");
    }

    #[test]
    fn test_preamble_block_comment() {
        let statement =
            Statement::from_sql("/** :name get_users :many\n\nEverything. **/\nselect * from users;");
        let preamble = preamble(&statement).unwrap();
        assert_eq!(preamble.lead, ":name get_users :many");
        assert_eq!(preamble.doc, "Everything.");
    }

    #[test]
    fn test_preamble_absent() {
        let statement = Statement::from_sql("select * from users;");
        assert_eq!(preamble(&statement), None);
    }

    #[test]
    fn test_comment_after_sql_is_not_a_preamble() {
        let statement = Statement::from_sql("select 1 -- not a lead\n;");
        assert_eq!(preamble(&statement), None);
    }
}
