use super::{Alias, FromClause, Top};
use crate::builder::QueryBuilder;
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Arg, Fragment};
use std::fmt;

/// `DELETE [TOP (n)] [target, ...]` header; FROM and JOINs come from the
/// enclosing query.
///
/// With [`EngineOptions::delete_with_alias`](crate::EngineOptions) and no
/// explicit targets, the FROM source's alias (or table name) is written as
/// the target: `DELETE u FROM users AS u`.
#[derive(Debug, Clone, Default)]
pub struct Delete {
    top: Option<Top>,
    targets: Vec<Alias>,
}

impl Delete {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete from this source (multi-table deletes name several).
    pub fn target(&mut self, table: impl Into<Alias>) -> &mut Self {
        self.targets.push(table.into());
        self
    }

    pub fn top(&mut self, value: impl Into<Arg>) -> &mut Self {
        self.top = Some(Top::new(value));
        self
    }

    pub fn targets(&self) -> &[Alias] {
        &self.targets
    }

    /// Write the header; fails without a FROM clause.
    pub fn write_delete(&self, b: &mut QueryBuilder<'_>, from: Option<&FromClause>) -> SqlResult<()> {
        let from = from.ok_or_else(|| SqlError::invalid_operation("DELETE needs a FROM clause"))?;
        b.write("DELETE");
        if let Some(top) = &self.top {
            b.write(" ");
            top.compile(b)?;
        }
        if !self.targets.is_empty() {
            b.write(" ");
            for target in &self.targets {
                target.write_reference(b)?;
                b.write(", ");
            }
            b.remove_last(2);
        } else if b.options().delete_with_alias {
            b.write(" ");
            if !from.write_reference(b)? {
                return Err(SqlError::invalid_operation(
                    "DELETE needs a named FROM source to target",
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Delete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DELETE")?;
        if let Some(top) = &self.top {
            write!(f, " {top}")?;
        }
        for (i, target) in self.targets.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            target.fmt_reference(f)?;
        }
        Ok(())
    }
}
