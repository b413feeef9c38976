//! Dialect policy consulted while a tree is compiled.
//!
//! An [`Engine`] answers four kinds of questions:
//!
//! - how an operator symbol is spelled, or which function emulates it
//! - how a function is named, or which callback lays out its arguments
//! - which clauses the dialect supports ([`EngineOptions`])
//! - how entity types map to tables and columns ([`SchemaRegistry`])
//!
//! Feature flags change the shape of the emitted SQL, never the tree, and
//! they are checked while compiling: the same tree may fail against one
//! engine and compile fine against another.

mod config;
mod dialect;
mod schema;

pub use config::{DialectConfig, OperatorConfig};
pub use dialect::Dialect;
pub use schema::{ColumnInfo, EntityType, SchemaRegistry, TableInfo, TableMeta};

use crate::builder::QueryBuilder;
use crate::error::{SqlError, SqlResult};
use crate::fragments::Func;
use crate::ident::NameQuote;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use crate::trace::CompileTrace;

/// How an operator symbol is emitted by a dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorInfo {
    /// Emit a different symbol (e.g. `||` becomes `+`).
    Symbol(String),
    /// Emit a function call with the operands as arguments (e.g. `MOD(a, b)`).
    Function(String),
}

/// Custom layout for a function call.
pub type FunctionCompiler =
    Arc<dyn Fn(&Func, &mut QueryBuilder<'_>) -> SqlResult<()> + Send + Sync>;

/// How a function is emitted by a dialect.
#[derive(Clone, Default)]
pub struct FunctionInfo {
    /// Name to emit instead of the logical name.
    pub name: Option<String>,
    /// Callback that writes the whole call; wins over `name`.
    pub compiler: Option<FunctionCompiler>,
}

impl FunctionInfo {
    /// Register a function under its own name.
    pub fn registered() -> Self {
        Self::default()
    }

    /// Emit the function under another name.
    pub fn renamed(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            compiler: None,
        }
    }

    /// Emit the function through a custom callback.
    pub fn custom<F>(compiler: F) -> Self
    where
        F: Fn(&Func, &mut QueryBuilder<'_>) -> SqlResult<()> + Send + Sync + 'static,
    {
        Self {
            name: None,
            compiler: Some(Arc::new(compiler)),
        }
    }
}

impl fmt::Debug for FunctionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionInfo")
            .field("name", &self.name)
            .field("compiler", &self.compiler.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Pagination syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetStyle {
    /// `OFFSET n ROWS FETCH NEXT m ROWS ONLY`
    #[default]
    Offset,
    /// `LIMIT m OFFSET n`
    Limit,
}

/// Feature flags and naming rules of a dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// `SELECT TOP (n)` / `DELETE TOP (n)` are available.
    pub top_supported: bool,
    pub right_join_supported: bool,
    pub full_join_supported: bool,
    /// `SELECT DISTINCT ON (...)` is available.
    pub distinct_on_supported: bool,
    pub offset_style: OffsetStyle,
    /// `UPDATE t SET ... FROM t JOIN ...` instead of `UPDATE t JOIN ... SET ...`.
    pub update_with_from: bool,
    /// Qualify SET columns with their table name.
    pub update_set_with_table_name: bool,
    /// `DELETE alias FROM table AS alias`.
    pub delete_with_alias: bool,
    /// Multi-row INSERT as `SELECT ... UNION ALL SELECT ...`.
    pub insert_with_union: bool,
    /// Emit the `RECURSIVE` keyword for recursive CTEs.
    pub with_recursive: bool,
    /// Use `AS` between a table and its alias.
    pub table_as: bool,
    /// Table a valueless SELECT reads from (`DUAL`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_dummy_name: Option<String>,
    /// Reject functions the engine has no entry for.
    pub functions_registered_only: bool,
    /// Parameter name prefix (`@p` gives `@p0`, `@p1`, ...).
    pub parameter_prefix: String,
    pub name_quote: NameQuote,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            top_supported: false,
            right_join_supported: true,
            full_join_supported: true,
            distinct_on_supported: false,
            offset_style: OffsetStyle::Offset,
            update_with_from: false,
            update_set_with_table_name: false,
            delete_with_alias: false,
            insert_with_union: false,
            with_recursive: true,
            table_as: true,
            from_dummy_name: None,
            functions_registered_only: false,
            parameter_prefix: "@p".to_string(),
            name_quote: NameQuote::Double,
        }
    }
}

impl EngineOptions {
    /// Parse options from TOML; missing keys keep their defaults, unknown keys
    /// are rejected.
    pub fn from_toml_str(s: &str) -> SqlResult<Self> {
        Ok(toml::from_str(s)?)
    }
}

/// Dialect policy consulted by fragments at compile time.
pub trait Engine: Send + Sync {
    /// Dialect name used in error messages and logs.
    fn name(&self) -> &str;

    fn options(&self) -> &EngineOptions;

    /// Override for an operator symbol, if any.
    fn operator(&self, _symbol: &str) -> Option<&OperatorInfo> {
        None
    }

    /// Entry for a function, if any.
    fn function(&self, _name: &str) -> Option<&FunctionInfo> {
        None
    }

    /// Table metadata for an entity type.
    fn table_info(&self, entity: EntityType) -> SqlResult<&TableInfo>;

    /// Column name of an entity field.
    fn column_name(&self, entity: EntityType, field: &str) -> SqlResult<&str> {
        let info = self.table_info(entity)?;
        info.column(field).ok_or_else(|| SqlError::UnknownColumn {
            entity: entity.short_name().to_string(),
            field: field.to_string(),
        })
    }

    /// All column names of an entity, in declaration order.
    fn column_names(&self, entity: EntityType) -> SqlResult<Vec<&str>> {
        let info = self.table_info(entity)?;
        Ok(info.columns.iter().map(|c| c.name.as_str()).collect())
    }

    /// Write an escaped, possibly dotted identifier.
    fn write_name(&self, name: &str, out: &mut String) {
        self.options().name_quote.write_name(name, out);
    }

    /// Logging settings for compiled statements.
    #[cfg(feature = "tracing")]
    fn trace(&self) -> Option<&CompileTrace> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_from_toml_keep_defaults() {
        let opts = EngineOptions::from_toml_str(
            r#"
            top_supported = true
            offset_style = "limit"
            name_quote = "bracket"
            "#,
        )
        .unwrap();
        assert!(opts.top_supported);
        assert_eq!(opts.offset_style, OffsetStyle::Limit);
        assert_eq!(opts.name_quote, NameQuote::Bracket);
        assert_eq!(opts.parameter_prefix, "@p");
        assert!(opts.table_as);
    }

    #[test]
    fn options_from_bad_toml_is_config_error() {
        let err = EngineOptions::from_toml_str("offset_style = \"sideways\"").unwrap_err();
        assert!(matches!(err, SqlError::Config(_)));
    }

    #[test]
    fn options_reject_misspelled_keys() {
        let err = EngineOptions::from_toml_str("top_suported = true").unwrap_err();
        assert!(matches!(err, SqlError::Config(msg) if msg.contains("top_suported")));
    }
}
