//! The statement composer.
//!
//! A [`Query`] holds one statement kind (SELECT, INSERT, UPDATE or DELETE) and
//! the clauses shared between kinds. Switching the kind drops the previous
//! kind's own state (SELECT list, INSERT rows, SET pairs, DELETE targets) and
//! keeps the shared clauses, so one query can be reused to build a different
//! statement over the same FROM and WHERE.
//!
//! ```ignore
//! use sqlfrag::prelude::*;
//!
//! let users = Alias::new("users", "u");
//! let mut q = Query::new();
//! q.select().add(users.column("id")).add(users.column("name"));
//! q.from(users.clone());
//! q.filter(Operator::eq(users.column("active"), true));
//! q.order_by().add(users.column("name")).desc()?;
//! q.offset(10).fetch(20);
//!
//! let result = q.compile(&Dialect::sqlserver())?;
//! ```

use crate::builder::{QueryBuilder, QueryResult, compile_fragment};
use crate::engine::Engine;
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Arg, Fragment, IntoFragment, Precedence};
use crate::fragments::{
    Alias, Delete, FromClause, Func, Insert, JoinFrom, JoinKind, LogicalOperator, OffsetFetch,
    OrderBy, RawSql, Select, Update, ValList, With,
};
use std::fmt;

/// Which statement a [`Query`] currently builds.
#[derive(Debug, Clone, Default)]
pub enum Statement {
    #[default]
    Empty,
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    /// Keyword of the statement kind, `None` when empty.
    pub fn kind(&self) -> Option<&'static str> {
        match self {
            Statement::Empty => None,
            Statement::Select(_) => Some("SELECT"),
            Statement::Insert(_) => Some("INSERT"),
            Statement::Update(_) => Some("UPDATE"),
            Statement::Delete(_) => Some("DELETE"),
        }
    }
}

/// A SQL statement under construction.
#[derive(Debug, Clone, Default)]
pub struct Query {
    before: Option<RawSql>,
    with: Option<With>,
    statement: Statement,
    from: Option<FromClause>,
    joins: Vec<JoinFrom>,
    where_: Option<LogicalOperator>,
    group_by: Option<ValList>,
    having: Option<LogicalOperator>,
    order_by: Option<OrderBy>,
    offset: Option<OffsetFetch>,
    after: Option<RawSql>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// Drop the statement kind; shared clauses stay.
    pub fn clear_statement(&mut self) -> &mut Self {
        self.statement = Statement::Empty;
        self
    }

    /// The SELECT list, switching the query to SELECT if needed.
    pub fn select(&mut self) -> &mut Select {
        if !matches!(self.statement, Statement::Select(_)) {
            self.statement = Statement::Select(Select::new());
        }
        match &mut self.statement {
            Statement::Select(select) => select,
            _ => unreachable!(),
        }
    }

    /// Replace the SELECT list.
    pub fn set_select(&mut self, select: Select) -> &mut Self {
        self.statement = Statement::Select(select);
        self
    }

    /// Start a new INSERT into `table`; any previous rows are dropped.
    pub fn insert_into(&mut self, table: impl Into<Alias>) -> &mut Insert {
        self.statement = Statement::Insert(Insert::new(table));
        match &mut self.statement {
            Statement::Insert(insert) => insert,
            _ => unreachable!(),
        }
    }

    /// Add a VALUES row to the current INSERT.
    pub fn values(&mut self, row: ValList) -> SqlResult<&mut Self> {
        match &mut self.statement {
            Statement::Insert(insert) => {
                insert.values(row);
                Ok(self)
            }
            _ => Err(SqlError::invalid_operation("VALUES needs an INSERT statement")),
        }
    }

    /// The UPDATE statement, switching the query to UPDATE if needed.
    pub fn update(&mut self) -> &mut Update {
        if !matches!(self.statement, Statement::Update(_)) {
            self.statement = Statement::Update(Update::new());
        }
        match &mut self.statement {
            Statement::Update(update) => update,
            _ => unreachable!(),
        }
    }

    /// The DELETE statement, switching the query to DELETE if needed.
    pub fn delete(&mut self) -> &mut Delete {
        if !matches!(self.statement, Statement::Delete(_)) {
            self.statement = Statement::Delete(Delete::new());
        }
        match &mut self.statement {
            Statement::Delete(delete) => delete,
            _ => unreachable!(),
        }
    }

    pub fn with(&mut self) -> &mut With {
        self.with.get_or_insert_with(With::new)
    }

    /// Set the FROM source (a table, sub-query or CTE).
    pub fn from(&mut self, source: impl IntoFragment) -> &mut FromClause {
        self.from.insert(FromClause::new(source))
    }

    pub fn join(&mut self, kind: JoinKind, source: impl IntoFragment) -> &mut JoinFrom {
        self.joins.push(JoinFrom::new(kind, source));
        let last = self.joins.len() - 1;
        &mut self.joins[last]
    }

    pub fn inner_join(&mut self, source: impl IntoFragment) -> &mut JoinFrom {
        self.join(JoinKind::Inner, source)
    }

    pub fn left_join(&mut self, source: impl IntoFragment) -> &mut JoinFrom {
        self.join(JoinKind::Left, source)
    }

    /// The WHERE conditions, joined with AND.
    pub fn where_clause(&mut self) -> &mut LogicalOperator {
        self.where_.get_or_insert_with(LogicalOperator::and)
    }

    /// Add a WHERE condition.
    pub fn filter(&mut self, condition: impl Into<Arg>) -> &mut Self {
        self.where_clause().add(condition);
        self
    }

    pub fn group_by(&mut self) -> &mut ValList {
        self.group_by.get_or_insert_with(ValList::new)
    }

    /// The HAVING conditions, joined with AND.
    pub fn having(&mut self) -> &mut LogicalOperator {
        self.having.get_or_insert_with(LogicalOperator::and)
    }

    pub fn order_by(&mut self) -> &mut OrderBy {
        self.order_by.get_or_insert_with(OrderBy::new)
    }

    pub fn offset(&mut self, value: impl Into<Arg>) -> &mut OffsetFetch {
        self.offset.get_or_insert_with(OffsetFetch::new).offset(value)
    }

    pub fn fetch(&mut self, value: impl Into<Arg>) -> &mut OffsetFetch {
        self.offset.get_or_insert_with(OffsetFetch::new).fetch(value)
    }

    /// Raw SQL written before the statement.
    pub fn before(&mut self, raw: RawSql) -> &mut Self {
        self.before = Some(raw);
        self
    }

    /// Raw SQL written after the statement.
    pub fn after(&mut self, raw: RawSql) -> &mut Self {
        self.after = Some(raw);
        self
    }

    /// Rewrite into `SELECT COUNT(*)`, dropping ORDER BY and OFFSET.
    pub fn count(&mut self) -> &mut Self {
        let mut select = Select::new();
        select.add(Func::count_all());
        self.statement = Statement::Select(select);
        self.order_by = None;
        self.offset = None;
        self
    }

    /// Compile against an engine.
    pub fn compile(&self, engine: &dyn Engine) -> SqlResult<QueryResult> {
        compile_fragment(self, engine)
    }

    fn write_from(&self, b: &mut QueryBuilder<'_>, dummy: bool) -> SqlResult<()> {
        match &self.from {
            Some(from) => {
                from.compile(b)?;
                b.write(" ");
            }
            None if !self.joins.is_empty() => {
                return Err(SqlError::invalid_operation("JOIN without FROM"));
            }
            None => {
                if let (true, Some(name)) = (dummy, &b.options().from_dummy_name) {
                    b.write("FROM ").write(name).write(" ");
                }
            }
        }
        for join in &self.joins {
            join.compile(b)?;
            b.write(" ");
        }
        Ok(())
    }
}

impl Fragment for Query {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        if matches!(self.statement, Statement::Empty) {
            return Err(SqlError::EmptyQuery);
        }
        if let Some(before) = &self.before {
            before.compile(b)?;
            b.write(" ");
        }
        if let Some(with) = &self.with {
            with.compile(b)?;
            b.write(" ");
        }
        match &self.statement {
            Statement::Empty => return Err(SqlError::EmptyQuery),
            Statement::Select(select) => {
                select.compile(b)?;
                b.write(" ");
                self.write_from(b, true)?;
            }
            Statement::Insert(insert) => {
                insert.compile(b)?;
                b.write(" ");
            }
            Statement::Update(update) => {
                update.write_update(b, self.from.as_ref(), &self.joins)?;
                b.write(" ");
            }
            Statement::Delete(delete) => {
                delete.write_delete(b, self.from.as_ref())?;
                b.write(" ");
                self.write_from(b, false)?;
            }
        }
        if let Some(where_) = &self.where_ {
            b.write("WHERE ");
            where_.compile(b)?;
            b.write(" ");
        }
        if let Some(group_by) = &self.group_by {
            if group_by.is_empty() {
                return Err(SqlError::EmptyList("GROUP BY"));
            }
            b.write("GROUP BY ");
            group_by.compile(b)?;
            b.write(" ");
        }
        if let Some(having) = &self.having {
            b.write("HAVING ");
            having.compile(b)?;
            b.write(" ");
        }
        if let Some(order_by) = &self.order_by {
            order_by.compile(b)?;
            b.write(" ");
        }
        if let Some(offset) = &self.offset {
            offset.compile(b)?;
            b.write(" ");
        }
        if let Some(after) = &self.after {
            after.compile(b)?;
            b.write(" ");
        }
        if b.ends_with(" ") {
            b.remove_last(1);
        }
        Ok(())
    }

    fn precedence(&self) -> Precedence {
        Precedence::SubQuery
    }

    fn needs_grouping(&self) -> bool {
        self.with.is_some() || self.order_by.is_some() || self.offset.is_some()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(before) = &self.before {
            parts.push(before.to_string());
        }
        if let Some(with) = &self.with {
            parts.push(with.to_string());
        }
        match &self.statement {
            Statement::Empty => {}
            Statement::Select(select) => parts.push(select.to_string()),
            Statement::Insert(insert) => parts.push(insert.to_string()),
            Statement::Update(update) => parts.push(update.to_string()),
            Statement::Delete(delete) => parts.push(delete.to_string()),
        }
        if !matches!(self.statement, Statement::Insert(_)) {
            if let Some(from) = &self.from {
                parts.push(from.to_string());
            }
            parts.extend(self.joins.iter().map(ToString::to_string));
        }
        if let Some(where_) = &self.where_ {
            parts.push(format!("WHERE {where_}"));
        }
        if let Some(group_by) = &self.group_by {
            parts.push(format!("GROUP BY {group_by}"));
        }
        if let Some(having) = &self.having {
            parts.push(format!("HAVING {having}"));
        }
        if let Some(order_by) = &self.order_by {
            parts.push(order_by.to_string());
        }
        if let Some(offset) = &self.offset {
            parts.push(offset.to_string());
        }
        if let Some(after) = &self.after {
            parts.push(after.to_string());
        }
        f.write_str(&parts.join(" "))
    }
}

#[cfg(test)]
mod tests;
