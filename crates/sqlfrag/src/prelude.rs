//! Convenient imports for typical `sqlfrag` usage.
//!
//! ```ignore
//! use sqlfrag::prelude::*;
//! ```

pub use crate::{
    Alias, ArithOperator, Case, Cast, Column, Cte, Dialect, Engine, EngineOptions, Fragment, Func,
    JoinKind, LeftOperator, LeftQueryOperator, ListOperator, LogicalOperator, Operator, Over,
    Query, QueryOperator, QueryResult, RangeOperator, RawSql, RightOperator, SetOperator, SqlError,
    SqlResult, SqlType, TableMeta, ValList, Value,
};
