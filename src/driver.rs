//! Target drivers and their native placeholder syntaxes.
//!
//! The compiler's only knowledge of the execution layer is which placeholder
//! syntax it speaks. Each driver variant carries its rewrite rule as data, so
//! supporting a new driver is a table addition here, not a new conditional in
//! the normalizer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SquillError;

/// Supported target drivers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// Wire-protocol PostgreSQL drivers: `$N` markers, positional-only
    /// binding (tokio-postgres, asyncpg).
    #[default]
    Postgres,
    /// pyformat drivers: named `%(name)s` markers, anonymous `%s` positional
    /// markers (psycopg).
    Psycopg,
    /// SQLite drivers: numbered `?N` markers, named `:name` markers
    /// (rusqlite).
    Sqlite,
}

/// A driver's native placeholder rewrite rules.
///
/// `keyword` is `None` for drivers that bind strictly by position; the
/// normalizer then remaps keyword parameters onto positional slots.
pub struct PlaceholderSyntax {
    pub positional: fn(usize) -> String,
    pub keyword: Option<fn(&str) -> String>,
}

impl Driver {
    /// Every supported driver.
    pub const ALL: [Driver; 3] = [Driver::Postgres, Driver::Psycopg, Driver::Sqlite];

    /// The native placeholder syntax for this driver.
    pub fn syntax(&self) -> PlaceholderSyntax {
        match self {
            Driver::Postgres => PlaceholderSyntax {
                positional: |index| format!("${index}"),
                keyword: None,
            },
            Driver::Psycopg => PlaceholderSyntax {
                // pyformat has no numbered positional form.
                positional: |_| "%s".to_string(),
                keyword: Some(|name| format!("%({name})s")),
            },
            Driver::Sqlite => PlaceholderSyntax {
                positional: |index| format!("?{index}"),
                keyword: Some(|name| format!(":{name}")),
            },
        }
    }

    /// Whether this driver binds strictly by position.
    pub fn positional_only(&self) -> bool {
        self.syntax().keyword.is_none()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Driver::Postgres => "postgres",
            Driver::Psycopg => "psycopg",
            Driver::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Driver {
    type Err = SquillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "asyncpg" | "tokio-postgres" => Ok(Driver::Postgres),
            "psycopg" | "psycopg2" => Ok(Driver::Psycopg),
            "sqlite" | "sqlite3" | "rusqlite" => Ok(Driver::Sqlite),
            other => Err(SquillError::UnsupportedDriver(other.to_string())),
        }
    }
}
