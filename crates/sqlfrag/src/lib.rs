//! # sqlfrag
//!
//! A fragment-tree SQL builder that compiles one tree to many dialects.
//!
//! ## Features
//!
//! - **Trees, not strings**: statements are built from typed nodes (columns,
//!   operators, clauses) that implement [`Fragment`]
//! - **Parameterized by default**: values become numbered parameters
//!   (`@p0`, `@p1`, ...) in the order they are compiled
//! - **Dialect policy at compile time**: an [`Engine`] decides operator
//!   spellings, function names, quoting and which clauses are available
//! - **Precedence-aware**: nested operators are parenthesized only where needed
//! - **Debug rendering**: every node implements `Display` with inlined literals
//!
//! ## Example
//!
//! ```ignore
//! use sqlfrag::prelude::*;
//!
//! let u = Alias::new("users", "u");
//! let mut q = Query::new();
//! q.select().add(u.column("id")).add(u.column("name"));
//! q.from(u.clone());
//! q.filter(Operator::eq(u.column("status"), "active"));
//! q.offset(10).fetch(20);
//!
//! let pg = q.compile(&Dialect::postgres())?;
//! // SELECT "u"."id", "u"."name" FROM "users" AS "u" WHERE "u"."status" = @p0 LIMIT @p2 OFFSET @p1
//!
//! let mssql = q.compile(&Dialect::sqlserver())?;
//! // ... OFFSET @p1 ROWS FETCH NEXT @p2 ROWS ONLY
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod fragment;
pub mod fragments;
pub mod ident;
pub mod param;
pub mod prelude;
pub mod query;
#[cfg(feature = "tracing")]
pub mod trace;
pub mod value;

pub use builder::{QueryBuilder, QueryResult, compile_fragment};
pub use engine::{
    ColumnInfo, Dialect, DialectConfig, Engine, EngineOptions, EntityType, FunctionCompiler,
    FunctionInfo, OffsetStyle, OperatorConfig, OperatorInfo, SchemaRegistry, TableInfo, TableMeta,
};
pub use error::{SqlError, SqlResult};
pub use fragment::{Arg, Fragment, IntoFragment, Parens, Precedence};
pub use fragments::*;
pub use ident::NameQuote;
pub use param::{Param, ParamList};
pub use query::{Query, Statement};
#[cfg(feature = "tracing")]
pub use trace::CompileTrace;
pub use value::Value;
