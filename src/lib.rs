//! # squill — annotated SQL, compiled.
//!
//! > Keep writing SQL. Stop writing glue.
//!
//! squill compiles hand-written SQL with lightweight comment annotations into
//! typed, callable query descriptors: the statement rewritten to a target
//! driver's placeholder syntax, a canonical call signature, and the
//! classification the execution layer needs to shape results.
//!
//! ## Quick Example
//!
//! ```rust
//! use squill::prelude::*;
//!
//! let module = squill::compile_str(
//!     "-- :name get_user :one\n\
//!      -- Fetch a single user by id.\n\
//!      select * from users where id = :id;",
//!     Driver::Postgres,
//!     "users",
//! ).unwrap();
//!
//! let query = &module.queries["get_user"];
//! assert_eq!(query.operation, OperationKind::One);
//! assert_eq!(query.doc, "Fetch a single user by id.");
//! // Postgres binds by position: the keyword parameter is remapped.
//! assert!(query.sql.ends_with("select * from users where id = $1;"));
//! assert_eq!(query.remapping.as_ref().unwrap()["id"], 1);
//! ```
//!
//! ## Annotation syntax
//!
//! | word       | symbol | kind     | result shape          |
//! |------------|--------|----------|-----------------------|
//! | `:many`    | `:*`   | Many     | row set (default)     |
//! | `:one`     | `:^`   | One      | single row            |
//! | `:scalar`  | `:$`   | Scalar   | single value          |
//! | `:multi`   | `:!`   | Multi    | script / batch        |
//! | `:affected`| `:#`   | Affected | affected-row count    |
//! | `:raw`     | `:~`   | Raw      | driver cursor         |

pub mod annotation;
mod classify;
pub mod comments;
pub mod compile;
pub mod driver;
pub mod error;
pub mod normalize;
pub mod params;
pub mod token;

pub use compile::{CompiledQuery, QueryModule, QueryPackage, compile_path, compile_str};
pub use driver::Driver;

pub mod prelude {
    pub use crate::annotation::{Annotation, OperationKind, get_funcop};
    pub use crate::compile::{
        CompiledQuery, QueryModule, QueryPackage, compile_path, compile_str, process_sql,
    };
    pub use crate::driver::Driver;
    pub use crate::error::{SquillError, SquillResult};
    pub use crate::params::{Binding, ParameterDescriptor};
    pub use crate::token::{Statement, Token, TokenKind};
}
