use super::{Alias, Column, FromClause, JoinFrom, Top};
use crate::builder::QueryBuilder;
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Arg, Fragment, Parens};
use std::fmt;

fn no_target() -> SqlError {
    SqlError::invalid_operation("UPDATE needs a target table, a qualified SET column or a FROM")
}

/// `UPDATE` header and SET pairs.
///
/// The statement borrows FROM and JOINs from the enclosing query, so it is
/// written through [`Update::write_update`] rather than on its own. The
/// layout depends on [`EngineOptions::update_with_from`](crate::EngineOptions):
///
/// - `UPDATE t SET .. FROM t JOIN ..`
/// - `UPDATE t JOIN .. SET ..`
#[derive(Debug, Clone, Default)]
pub struct Update {
    top: Option<Top>,
    table: Option<Alias>,
    sets: Vec<(Column, Arg)>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit target table; defaults to the first SET column's table.
    pub fn table(&mut self, table: impl Into<Alias>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    pub fn set(&mut self, column: impl Into<Column>, value: impl Into<Arg>) -> &mut Self {
        self.sets.push((column.into(), value.into()));
        self
    }

    pub fn top(&mut self, value: impl Into<Arg>) -> &mut Self {
        self.top = Some(Top::new(value));
        self
    }

    pub fn sets(&self) -> &[(Column, Arg)] {
        &self.sets
    }

    fn target(&self) -> Option<&Alias> {
        self.table
            .as_ref()
            .or_else(|| self.sets.first().and_then(|(column, _)| column.table()))
    }

    fn write_sets(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        if self.sets.is_empty() {
            return Err(SqlError::EmptyList("SET"));
        }
        let with_table = b.options().update_set_with_table_name;
        b.write("SET ");
        for (column, value) in &self.sets {
            column.compile_with(b, with_table)?;
            b.write(" = ");
            b.write_value(value, Parens::SubQuery)?;
            b.write(", ");
        }
        b.remove_last(2);
        Ok(())
    }

    fn write_head(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        b.write("UPDATE ");
        if let Some(top) = &self.top {
            top.compile(b)?;
            b.write(" ");
        }
        Ok(())
    }

    /// Write the whole UPDATE statement, folding in the query's FROM and JOINs.
    pub fn write_update(
        &self,
        b: &mut QueryBuilder<'_>,
        from: Option<&FromClause>,
        joins: &[JoinFrom],
    ) -> SqlResult<()> {
        if b.options().update_with_from {
            if !joins.is_empty() && from.is_none() {
                return Err(SqlError::invalid_operation("JOIN without FROM"));
            }
            self.write_head(b)?;
            let target = self.target();
            let named = match (target, from) {
                (Some(target), _) => {
                    target.write_reference(b)?;
                    true
                }
                (None, Some(from)) => from.write_reference(b)?,
                (None, None) => false,
            };
            if !named {
                return Err(no_target());
            }
            b.write(" ");
            self.write_sets(b)?;
            match (from, target) {
                (Some(from), _) => {
                    b.write(" ");
                    from.compile(b)?;
                }
                // An aliased target still needs its alias declared.
                (None, Some(target)) if target.name().is_some() => {
                    b.write(" FROM ");
                    target.compile(b)?;
                }
                (None, _) => {}
            }
            for join in joins {
                b.write(" ");
                join.compile(b)?;
            }
        } else {
            self.write_head(b)?;
            match (from, self.target()) {
                (Some(from), _) => from.compile_source(b)?,
                (None, Some(target)) => target.compile(b)?,
                (None, None) => return Err(no_target()),
            }
            for join in joins {
                b.write(" ");
                join.compile(b)?;
            }
            b.write(" ");
            self.write_sets(b)?;
        }
        Ok(())
    }
}

impl fmt::Display for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UPDATE ")?;
        if let Some(top) = &self.top {
            write!(f, "{top} ")?;
        }
        if let Some(target) = self.target() {
            write!(f, "{target} ")?;
        }
        f.write_str("SET ")?;
        for (i, (column, value)) in self.sets.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{column} = {value}")?;
        }
        Ok(())
    }
}
