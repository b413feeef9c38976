use super::{Over, Top};
use crate::builder::QueryBuilder;
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Arg, Fragment, Parens, fmt_args, write_args};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

/// `SELECT [DISTINCT | DISTINCT ON (..)] [TOP (n)] value [OVER (..)] [AS name], ...`
///
/// `alias` and `over` apply to the items added by the most recent
/// `add`/`add_many` call.
#[derive(Debug, Clone, Default)]
pub struct Select {
    values: Vec<Arg>,
    distinct: bool,
    distinct_on: Vec<Arg>,
    top: Option<Top>,
    aliases: BTreeMap<usize, String>,
    overs: BTreeMap<usize, Over>,
    last_added: Range<usize>,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: impl Into<Arg>) -> &mut Self {
        let start = self.values.len();
        self.values.push(value.into());
        self.last_added = start..self.values.len();
        self
    }

    pub fn add_many<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        let start = self.values.len();
        self.values.extend(values.into_iter().map(Into::into));
        self.last_added = start..self.values.len();
        self
    }

    fn check_last_added(&self, what: &str) -> SqlResult<()> {
        if self.last_added.is_empty() {
            return Err(SqlError::invalid_operation(format!(
                "{what} needs a selected value"
            )));
        }
        if self.values[self.last_added.clone()]
            .iter()
            .any(Arg::is_select_all)
        {
            return Err(SqlError::invalid_operation(format!(
                "{what} cannot apply to a select-all column"
            )));
        }
        Ok(())
    }

    /// Name the last added value (`value AS name`).
    pub fn alias(&mut self, name: impl Into<String>) -> SqlResult<&mut Self> {
        self.check_last_added("AS")?;
        self.aliases.insert(self.last_added.end - 1, name.into());
        Ok(self)
    }

    /// Turn the last added values into window calls.
    pub fn over(&mut self, over: Over) -> SqlResult<&mut Self> {
        self.check_last_added("OVER")?;
        for index in self.last_added.clone() {
            self.overs.insert(index, over.clone());
        }
        Ok(self)
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    /// Add a `DISTINCT ON` expression.
    pub fn distinct_on(&mut self, value: impl Into<Arg>) -> &mut Self {
        self.distinct_on.push(value.into());
        self
    }

    pub fn top(&mut self, value: impl Into<Arg>) -> &mut Self {
        self.top = Some(Top::new(value));
        self
    }

    pub fn percent(&mut self) -> SqlResult<&mut Self> {
        self.top_mut("PERCENT")?.percent = true;
        Ok(self)
    }

    pub fn with_ties(&mut self) -> SqlResult<&mut Self> {
        self.top_mut("WITH TIES")?.with_ties = true;
        Ok(self)
    }

    fn top_mut(&mut self, what: &str) -> SqlResult<&mut Top> {
        self.top
            .as_mut()
            .ok_or_else(|| SqlError::invalid_operation(format!("{what} needs TOP")))
    }

    pub fn values(&self) -> &[Arg] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index range targeted by `alias`/`over`.
    pub fn last_added(&self) -> Range<usize> {
        self.last_added.clone()
    }
}

impl Fragment for Select {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        if self.values.is_empty() {
            return Err(SqlError::EmptyList("SELECT"));
        }
        b.write("SELECT ");
        if !self.distinct_on.is_empty() {
            b.require(b.options().distinct_on_supported, "DISTINCT ON")?;
            b.write("DISTINCT ON (");
            write_args(b, &self.distinct_on, ", ", Parens::SubQuery)?;
            b.write(") ");
        } else if self.distinct {
            b.write("DISTINCT ");
        }
        if let Some(top) = &self.top {
            top.compile(b)?;
            b.write(" ");
        }
        for (index, value) in self.values.iter().enumerate() {
            b.write_value(value, Parens::SubQuery)?;
            if let Some(over) = self.overs.get(&index) {
                b.write(" ");
                over.compile(b)?;
            }
            if let Some(alias) = self.aliases.get(&index) {
                b.write(" AS ");
                b.write_name_part(alias);
            }
            b.write(", ");
        }
        b.remove_last(2);
        Ok(())
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        if !self.distinct_on.is_empty() {
            f.write_str("DISTINCT ON (")?;
            fmt_args(f, &self.distinct_on, ", ")?;
            f.write_str(") ")?;
        } else if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        if let Some(top) = &self.top {
            write!(f, "{top} ")?;
        }
        for (index, value) in self.values.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
            if let Some(over) = self.overs.get(&index) {
                write!(f, " {over}")?;
            }
            if let Some(alias) = self.aliases.get(&index) {
                write!(f, " AS {alias}")?;
            }
        }
        Ok(())
    }
}
