//! Node types of a query tree.
//!
//! Leaves ([`Alias`], [`Column`], [`RawSql`], ...) name things; operators
//! combine operands; clause nodes ([`Select`], [`FromClause`], [`OrderBy`], ...)
//! are the pieces [`Query`](crate::Query) assembles into a statement.

mod alias;
mod column;
mod cte;
mod delete;
mod from;
mod func;
mod insert;
mod list;
mod operator;
mod order;
mod raw;
mod select;
mod set_op;
mod top;
mod update;
mod variadic;
mod window;

pub use alias::{Alias, TableSource};
pub use column::{Column, ColumnName};
pub use cte::{Cte, With};
pub use delete::Delete;
pub use from::{FromClause, JoinFrom, JoinKind};
pub use func::{Case, Cast, Func, SqlType};
pub use insert::Insert;
pub use list::{ColList, ValList};
pub use operator::{
    LeftOperator, LeftQueryOperator, ListOperator, Operator, QueryOperator, RangeOperator,
    RightOperator, TernaryOperator,
};
pub use order::{OffsetFetch, OrderBy, SortOrder};
pub use raw::RawSql;
pub use select::Select;
pub use set_op::SetOperator;
pub use top::Top;
pub use update::Update;
pub use variadic::{ArithOperator, BitOperator, LogicalOperator};
pub use window::Over;
