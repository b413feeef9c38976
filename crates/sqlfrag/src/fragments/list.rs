use super::Column;
use crate::builder::QueryBuilder;
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Arg, Fragment, Parens, Precedence, fmt_args, write_args};
use std::fmt;

/// A comma-separated list of values: `IN (...)` operands, GROUP BY, VALUES rows.
///
/// Marked as a sub-query, so it is parenthesized wherever it is written as a
/// value.
#[derive(Debug, Clone, Default)]
pub struct ValList {
    items: Vec<Arg>,
}

impl ValList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: impl Into<Arg>) -> &mut Self {
        self.items.push(value.into());
        self
    }

    pub fn add_many<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.items.extend(values.into_iter().map(Into::into));
        self
    }

    /// Consuming form of [`ValList::add`].
    pub fn with(mut self, value: impl Into<Arg>) -> Self {
        self.items.push(value.into());
        self
    }

    pub fn items(&self) -> &[Arg] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<A: Into<Arg>> FromIterator<A> for ValList {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Fragment for ValList {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        if self.items.is_empty() {
            return Err(SqlError::EmptyList("values"));
        }
        write_args(b, &self.items, ", ", Parens::SubQuery)
    }

    fn precedence(&self) -> Precedence {
        Precedence::SubQuery
    }
}

impl fmt::Display for ValList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_args(f, &self.items, ", ")
    }
}

/// A comma-separated list of columns.
#[derive(Debug, Clone, Default)]
pub struct ColList {
    columns: Vec<Column>,
}

impl ColList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, column: impl Into<Column>) -> &mut Self {
        self.columns.push(column.into());
        self
    }

    pub fn add_many<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Column>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Compile the list, optionally leaving out every table qualifier.
    pub fn compile_columns(&self, b: &mut QueryBuilder<'_>, with_table: bool) -> SqlResult<()> {
        if self.columns.is_empty() {
            return Err(SqlError::EmptyList("columns"));
        }
        for column in &self.columns {
            column.compile_with(b, with_table)?;
            b.write(", ");
        }
        b.remove_last(2);
        Ok(())
    }
}

impl<C: Into<Column>> FromIterator<C> for ColList {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Fragment for ColList {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        self.compile_columns(b, true)
    }
}

impl fmt::Display for ColList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{column}")?;
        }
        Ok(())
    }
}
