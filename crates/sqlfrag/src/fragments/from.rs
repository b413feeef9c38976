use super::RawSql;
use crate::builder::QueryBuilder;
use crate::error::SqlResult;
use crate::fragment::{Arg, Fragment, IntoFragment, Parens};
use std::fmt;
use std::sync::Arc;

/// `FROM source [AS alias] [options]`.
///
/// The source is a table ([`Alias`](super::Alias)), a sub-query, or a
/// [`Cte`](super::Cte), which is written by name only.
#[derive(Debug, Clone)]
pub struct FromClause {
    source: Arc<dyn Fragment>,
    alias: Option<String>,
    options: Option<RawSql>,
}

impl FromClause {
    pub fn new(source: impl IntoFragment) -> Self {
        Self {
            source: source.into_fragment(),
            alias: None,
            options: None,
        }
    }

    /// Alias a sub-query source.
    pub fn alias(&mut self, name: impl Into<String>) -> &mut Self {
        self.alias = Some(name.into());
        self
    }

    /// Raw text written after the source, e.g. a table hint.
    pub fn options(&mut self, options: RawSql) -> &mut Self {
        self.options = Some(options);
        self
    }

    pub fn source(&self) -> &dyn Fragment {
        self.source.as_ref()
    }

    /// Write the source, its alias and options without the `FROM` keyword.
    pub fn compile_source(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        match self.source.source_alias() {
            Some(alias) => alias.compile(b)?,
            None => {
                b.write_fragment(self.source.as_ref(), Parens::SubQuery)?;
            }
        }
        if let Some(alias) = &self.alias {
            b.write(if b.options().table_as { " AS " } else { " " });
            b.write_name_part(alias);
        }
        if let Some(options) = &self.options {
            b.write(" ");
            options.compile(b)?;
        }
        Ok(())
    }

    /// Write the name other clauses use for this source. Returns `false`
    /// when the source has no name (an unaliased sub-query).
    pub fn write_reference(&self, b: &mut QueryBuilder<'_>) -> SqlResult<bool> {
        if let Some(alias) = &self.alias {
            b.write_name_part(alias);
            return Ok(true);
        }
        match self.source.source_alias() {
            Some(alias) => {
                alias.write_reference(b)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn fmt_source(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source.source_alias() {
            Some(alias) => write!(f, "{alias}")?,
            None if self.source.precedence().is_sub_query() => write!(f, "({})", self.source)?,
            None => write!(f, "{}", self.source)?,
        }
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        if let Some(options) = &self.options {
            write!(f, " {options}")?;
        }
        Ok(())
    }
}

impl Fragment for FromClause {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        b.write("FROM ");
        self.compile_source(b)
    }
}

impl fmt::Display for FromClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FROM ")?;
        self.fmt_source(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// `<kind> JOIN source [AS alias] [ON condition]`.
#[derive(Debug, Clone)]
pub struct JoinFrom {
    kind: JoinKind,
    from: FromClause,
    on: Option<Arg>,
}

impl JoinFrom {
    pub fn new(kind: JoinKind, source: impl IntoFragment) -> Self {
        Self {
            kind,
            from: FromClause::new(source),
            on: None,
        }
    }

    pub fn on(&mut self, condition: impl Into<Arg>) -> &mut Self {
        self.on = Some(condition.into());
        self
    }

    pub fn alias(&mut self, name: impl Into<String>) -> &mut Self {
        self.from.alias(name);
        self
    }

    pub fn options(&mut self, options: RawSql) -> &mut Self {
        self.from.options(options);
        self
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }
}

impl Fragment for JoinFrom {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        match self.kind {
            JoinKind::Right => b.require(b.options().right_join_supported, "RIGHT JOIN")?,
            JoinKind::Full => b.require(b.options().full_join_supported, "FULL JOIN")?,
            _ => {}
        }
        b.write(self.kind.keyword()).write(" ");
        self.from.compile_source(b)?;
        if let Some(on) = &self.on {
            b.write(" ON ");
            b.write_value(on, Parens::Never)?;
        }
        Ok(())
    }
}

impl fmt::Display for JoinFrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.kind.keyword())?;
        self.from.fmt_source(f)?;
        if let Some(on) = &self.on {
            write!(f, " ON {on}")?;
        }
        Ok(())
    }
}
