use super::{Alias, ColList, Column, Top, ValList};
use crate::builder::QueryBuilder;
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Arg, Fragment, IntoFragment, Parens, write_args};
use std::fmt;
use std::sync::Arc;

/// `INSERT [TOP (n)] INTO table (cols) VALUES (..), (..)` or
/// `INSERT INTO table (cols) <query>`.
///
/// Column names are never table-qualified here, even when the same
/// [`Column`] values carry a qualifier elsewhere.
#[derive(Debug, Clone)]
pub struct Insert {
    top: Option<Top>,
    table: Alias,
    columns: ColList,
    rows: Vec<ValList>,
    source: Option<Arc<dyn Fragment>>,
}

impl Insert {
    pub fn new(table: impl Into<Alias>) -> Self {
        Self {
            top: None,
            table: table.into(),
            columns: ColList::new(),
            rows: Vec::new(),
            source: None,
        }
    }

    pub fn column(&mut self, column: impl Into<Column>) -> &mut Self {
        self.columns.add(column);
        self
    }

    pub fn columns<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Column>,
    {
        self.columns.add_many(columns);
        self
    }

    /// Add a VALUES row.
    pub fn values(&mut self, row: ValList) -> &mut Self {
        self.rows.push(row);
        self
    }

    /// Insert the rows produced by a query instead of VALUES.
    pub fn from_query(&mut self, query: impl IntoFragment) -> &mut Self {
        self.source = Some(query.into_fragment());
        self
    }

    pub fn top(&mut self, value: impl Into<Arg>) -> &mut Self {
        self.top = Some(Top::new(value));
        self
    }

    pub fn table(&self) -> &Alias {
        &self.table
    }

    pub fn rows(&self) -> &[ValList] {
        &self.rows
    }

    fn write_values(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        b.write("VALUES ");
        for row in &self.rows {
            b.write_fragment(row, Parens::Always)?;
            b.write(", ");
        }
        b.remove_last(2);
        Ok(())
    }

    fn write_union(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        let dummy = b.options().from_dummy_name.as_deref();
        for row in &self.rows {
            if row.is_empty() {
                return Err(SqlError::EmptyList("values"));
            }
            b.write("SELECT ");
            write_args(b, row.items(), ", ", Parens::SubQuery)?;
            if let Some(dummy) = dummy {
                b.write(" FROM ").write(dummy);
            }
            b.write(" UNION ALL ");
        }
        b.remove_last(" UNION ALL ".len());
        Ok(())
    }
}

impl Fragment for Insert {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        b.write("INSERT ");
        if let Some(top) = &self.top {
            top.compile(b)?;
            b.write(" ");
        }
        b.write("INTO ");
        self.table.write_table(b)?;
        if !self.columns.is_empty() {
            b.write(" (");
            self.columns.compile_columns(b, false)?;
            b.write(")");
        }
        if !self.rows.is_empty() {
            b.write(" ");
            if b.options().insert_with_union {
                self.write_union(b)?;
            } else {
                self.write_values(b)?;
            }
        } else if let Some(source) = &self.source {
            b.write(" ");
            b.write_fragment(source.as_ref(), Parens::Never)?;
        }
        Ok(())
    }
}

impl fmt::Display for Insert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("INSERT ")?;
        if let Some(top) = &self.top {
            write!(f, "{top} ")?;
        }
        write!(f, "INTO {}", self.table)?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            for (i, column) in self.columns.columns().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                match column.name() {
                    super::ColumnName::Named(name) => f.write_str(name)?,
                    super::ColumnName::Field { field, .. } => f.write_str(field)?,
                }
            }
            f.write_str(")")?;
        }
        if !self.rows.is_empty() {
            f.write_str(" VALUES ")?;
            for (i, row) in self.rows.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "({row})")?;
            }
        } else if let Some(source) = &self.source {
            write!(f, " {source}")?;
        }
        Ok(())
    }
}
