//! Operation classification.
//!
//! Four orthogonal predicates the execution layer uses to decide how to
//! shape results and whether to route a query through mutation hooks. The
//! matches are exhaustive on purpose: adding an operation kind without
//! deciding its classification must not compile.

use crate::annotation::OperationKind;
use crate::compile::CompiledQuery;

impl CompiledQuery {
    /// Whether this query may return multiple records: row sets and batched
    /// mutations.
    pub fn is_bulk(&self) -> bool {
        match self.operation {
            OperationKind::Many | OperationKind::Multi => true,
            OperationKind::One
            | OperationKind::Scalar
            | OperationKind::Affected
            | OperationKind::Raw => false,
        }
    }

    /// Whether the result is a single non-record value or a row count, i.e.
    /// not shaped as an application record.
    pub fn is_scalar(&self) -> bool {
        match self.operation {
            OperationKind::Scalar | OperationKind::Affected | OperationKind::Multi => true,
            OperationKind::Many | OperationKind::One | OperationKind::Raw => false,
        }
    }

    /// Whether this query writes data, scripts included.
    pub fn is_mutation(&self) -> bool {
        match self.operation {
            OperationKind::Affected | OperationKind::Multi => true,
            OperationKind::Many
            | OperationKind::One
            | OperationKind::Scalar
            | OperationKind::Raw => false,
        }
    }

    /// Whether this query creates or updates data.
    ///
    /// This is a lexical check: the lower-cased SQL contains `insert` or
    /// `update`. A comment or string literal containing those words is a
    /// false positive; that is an accepted limitation of the check, not
    /// something callers should try to compensate for.
    pub fn is_persist(&self) -> bool {
        let sql = self.sql.to_lowercase();
        sql.contains("insert") || sql.contains("update")
    }
}
