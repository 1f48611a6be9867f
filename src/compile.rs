//! Statement compilation and query-source loading.
//!
//! One annotated statement compiles to one [`CompiledQuery`]: the rewritten
//! SQL, a canonical call signature, the optional keyword remapping, and the
//! declared operation kind. Whole sources compile to a [`QueryModule`], and
//! directory trees of `.sql` files to a [`QueryPackage`].
//!
//! Everything produced here is built once at load time and read-only
//! afterwards, so compiled output can be shared freely across threads.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::annotation::{OperationKind, get_funcop};
use crate::comments::{Preamble, preamble};
use crate::driver::Driver;
use crate::error::SquillResult;
use crate::normalize::{Remapping, normalize_parameters};
use crate::params::{ParameterDescriptor, gather_parameters};
use crate::token::{Statement, split_statements};

/// One annotated statement, compiled for one target driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    /// The query name from the `:name` annotation.
    pub name: String,
    /// Documentation lines following the annotation, joined with `\n`.
    pub doc: String,
    /// Statement text rewritten to the driver's placeholder syntax.
    pub sql: String,
    /// Positional parameters in first-appearance order, then keyword
    /// parameters in first-appearance order.
    pub signature: Vec<ParameterDescriptor>,
    /// Keyword name → positional index, present only when the driver binds
    /// strictly by position and keyword parameters exist.
    pub remapping: Option<Remapping>,
    pub operation: OperationKind,
}

/// All named queries compiled from one source file or string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryModule {
    pub name: String,
    /// Source path, when the module was loaded from a file.
    pub path: Option<PathBuf>,
    pub queries: IndexMap<String, CompiledQuery>,
}

impl QueryModule {
    pub fn get(&self, name: &str) -> Option<&CompiledQuery> {
        self.queries.get(name)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

/// A directory tree of query modules.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryPackage {
    pub name: String,
    pub path: PathBuf,
    pub modules: IndexMap<String, QueryModule>,
    pub packages: IndexMap<String, QueryPackage>,
}

/// Compile one statement: gather its parameters, build the call signature,
/// and normalize placeholders for the target driver.
///
/// `start` offsets the positional numbering so scripts with several
/// statements can share one contiguous numbering space.
pub fn process_sql(
    statement: &Statement,
    start: usize,
    driver: Driver,
) -> SquillResult<(String, Vec<ParameterDescriptor>, Option<Remapping>)> {
    let (posargs, kwdargs) = gather_parameters(statement)?;
    let signature = posargs
        .values()
        .cloned()
        .chain(kwdargs.values().cloned())
        .collect();
    let (sql, remapping) = normalize_parameters(statement, driver, &posargs, &kwdargs, start);
    Ok((sql, signature, remapping))
}

/// Compile one statement into a [`CompiledQuery`].
///
/// Statements with no SQL content, no leading comment, or no `:name`
/// annotation are documentation, not queries; they yield `Ok(None)`.
pub fn compile_statement(
    statement: &Statement,
    driver: Driver,
) -> SquillResult<Option<CompiledQuery>> {
    if !statement.is_executable() {
        return Ok(None);
    }
    let Some(Preamble { lead, doc }) = preamble(statement) else {
        debug!("skipping statement with no annotation comment");
        return Ok(None);
    };
    let (name, operation) = get_funcop(&lead);
    let Some(name) = name else {
        debug!("skipping statement with documentation-only comment");
        return Ok(None);
    };
    let (sql, signature, remapping) = process_sql(statement, 0, driver)?;
    debug!(query = %name, operation = ?operation, params = signature.len(), "compiled query");
    Ok(Some(CompiledQuery {
        name,
        doc,
        sql,
        signature,
        remapping,
        operation,
    }))
}

/// Compile an annotated SQL string into a [`QueryModule`].
pub fn compile_str(source: &str, driver: Driver, modname: &str) -> SquillResult<QueryModule> {
    let mut queries = IndexMap::new();
    for statement in split_statements(source) {
        if let Some(query) = compile_statement(&statement, driver)? {
            if queries.contains_key(&query.name) {
                warn!(query = %query.name, "duplicate query name, keeping the later definition");
            }
            queries.insert(query.name.clone(), query);
        }
    }
    Ok(QueryModule {
        name: modname.to_string(),
        path: None,
        queries,
    })
}

/// Compile one `.sql` file into a [`QueryModule`] named after its stem.
pub fn compile_file(path: &Path, driver: Driver) -> SquillResult<QueryModule> {
    let source = fs::read_to_string(path)?;
    let modname = file_stem(path);
    let mut module = compile_str(&source, driver, &modname)?;
    module.path = Some(path.to_path_buf());
    Ok(module)
}

/// Compile a file or a directory tree into a [`QueryPackage`].
///
/// A file becomes a single-module package. A directory is walked recursively:
/// each `.sql` file becomes a module, each subdirectory a nested package.
/// Entries are visited in sorted order so the output is deterministic.
pub fn compile_path(path: &Path, driver: Driver) -> SquillResult<QueryPackage> {
    if path.is_file() {
        let module = compile_file(path, driver)?;
        let name = module.name.clone();
        let mut modules = IndexMap::new();
        modules.insert(name.clone(), module);
        return Ok(QueryPackage {
            name,
            path: path.parent().unwrap_or(Path::new("")).to_path_buf(),
            modules,
            packages: IndexMap::new(),
        });
    }
    compile_dir(path, driver)
}

fn compile_dir(path: &Path, driver: Driver) -> SquillResult<QueryPackage> {
    let mut package = QueryPackage {
        name: file_stem(path),
        path: path.to_path_buf(),
        modules: IndexMap::new(),
        packages: IndexMap::new(),
    };
    let mut entries: Vec<PathBuf> = fs::read_dir(path)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()?;
    entries.sort();
    for child in entries {
        if child.is_dir() {
            let sub = compile_dir(&child, driver)?;
            package.packages.insert(sub.name.clone(), sub);
        } else if child.extension().is_some_and(|ext| ext == "sql") {
            let module = compile_file(&child, driver)?;
            package.modules.insert(module.name.clone(), module);
        }
    }
    Ok(package)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<locals>".to_string())
}
