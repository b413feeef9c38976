use super::{Alias, ColList, Column};
use crate::builder::QueryBuilder;
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Fragment, IntoFragment, Parens};
use std::fmt;
use std::sync::Arc;

/// A common table expression: `name (col, ...) AS (query)`.
///
/// Used as a FROM or JOIN source, a CTE is referenced by its name only; its
/// body is written once, by the [`With`] clause that holds it.
#[derive(Debug, Clone)]
pub struct Cte {
    alias: Alias,
    columns: ColList,
    query: Option<Arc<dyn Fragment>>,
    recursive: bool,
}

impl Cte {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            alias: Alias::table(name),
            columns: ColList::new(),
            query: None,
            recursive: false,
        }
    }

    pub fn column(&mut self, name: impl Into<String>) -> &mut Self {
        self.columns.add(Column::new(name));
        self
    }

    pub fn query(&mut self, query: impl IntoFragment) -> &mut Self {
        self.query = Some(query.into_fragment());
        self
    }

    /// Consuming form of [`Cte::query`].
    pub fn with_query(mut self, query: impl IntoFragment) -> Self {
        self.query = Some(query.into_fragment());
        self
    }

    pub fn recursive(&mut self) -> &mut Self {
        self.recursive = true;
        self
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    pub fn alias(&self) -> &Alias {
        &self.alias
    }

    /// A column of this CTE, qualified by its name.
    pub fn col(&self, name: impl Into<String>) -> Column {
        self.alias.column(name)
    }

    fn name(&self) -> &str {
        match self.alias.source() {
            super::TableSource::Named(name) => name,
            super::TableSource::Entity(_) => "",
        }
    }
}

impl Fragment for Cte {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        let name = self.name();
        if name.trim().is_empty() {
            return Err(SqlError::invalid_argument("CTE name must not be empty"));
        }
        let query = self.query.as_ref().ok_or_else(|| {
            SqlError::invalid_argument(format!("CTE {name} has no query"))
        })?;
        b.write_name_part(name);
        if !self.columns.is_empty() {
            b.write(" (");
            self.columns.compile_columns(b, false)?;
            b.write(")");
        }
        b.write(" AS (");
        b.write_fragment(query.as_ref(), Parens::Never)?;
        b.write(")");
        Ok(())
    }

    fn source_alias(&self) -> Option<&Alias> {
        Some(&self.alias)
    }
}

impl fmt::Display for Cte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        if !self.columns.is_empty() {
            write!(f, " ({})", self.columns)?;
        }
        match &self.query {
            Some(query) => write!(f, " AS ({query})"),
            None => f.write_str(" AS ()"),
        }
    }
}

/// `WITH [RECURSIVE] a AS (...), b AS (...)`.
#[derive(Debug, Clone, Default)]
pub struct With {
    ctes: Vec<Cte>,
}

impl With {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, cte: Cte) -> &mut Self {
        self.ctes.push(cte);
        self
    }

    pub fn ctes(&self) -> &[Cte] {
        &self.ctes
    }

    pub fn is_empty(&self) -> bool {
        self.ctes.is_empty()
    }

    fn is_recursive(&self) -> bool {
        self.ctes.iter().any(Cte::is_recursive)
    }
}

impl Fragment for With {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        if self.ctes.is_empty() {
            return Err(SqlError::EmptyList("WITH"));
        }
        b.write("WITH ");
        if self.is_recursive() && b.options().with_recursive {
            b.write("RECURSIVE ");
        }
        for cte in &self.ctes {
            cte.compile(b)?;
            b.write(", ");
        }
        b.remove_last(2);
        Ok(())
    }
}

impl fmt::Display for With {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WITH ")?;
        if self.is_recursive() {
            f.write_str("RECURSIVE ")?;
        }
        for (i, cte) in self.ctes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{cte}")?;
        }
        Ok(())
    }
}
