use crate::builder::QueryBuilder;
use crate::engine::OffsetStyle;
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Arg, Fragment, Parens};
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Leave the direction to the database.
    #[default]
    Unspecified,
    Asc,
    Desc,
}

impl SortOrder {
    fn suffix(self) -> &'static str {
        match self {
            SortOrder::Unspecified => "",
            SortOrder::Asc => " ASC",
            SortOrder::Desc => " DESC",
        }
    }
}

/// `ORDER BY a, b DESC`.
///
/// [`OrderBy::asc`] and [`OrderBy::desc`] apply to the items added by the most
/// recent `add`/`add_many` call.
#[derive(Debug, Clone, Default)]
pub struct OrderBy {
    items: Vec<(Arg, SortOrder)>,
    last_added: Range<usize>,
}

impl OrderBy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: impl Into<Arg>) -> &mut Self {
        let start = self.items.len();
        self.items.push((item.into(), SortOrder::Unspecified));
        self.last_added = start..self.items.len();
        self
    }

    pub fn add_many<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        let start = self.items.len();
        self.items
            .extend(items.into_iter().map(|i| (i.into(), SortOrder::Unspecified)));
        self.last_added = start..self.items.len();
        self
    }

    pub fn asc(&mut self) -> SqlResult<&mut Self> {
        self.set_order(SortOrder::Asc)
    }

    pub fn desc(&mut self) -> SqlResult<&mut Self> {
        self.set_order(SortOrder::Desc)
    }

    fn set_order(&mut self, order: SortOrder) -> SqlResult<&mut Self> {
        if self.last_added.is_empty() {
            return Err(SqlError::invalid_operation(
                "cannot set a sort direction on an empty ORDER BY",
            ));
        }
        let targets = &mut self.items[self.last_added.clone()];
        if targets.iter().any(|(item, _)| item.is_select_all()) {
            return Err(SqlError::invalid_operation("cannot sort by a select-all column"));
        }
        for (_, o) in targets {
            *o = order;
        }
        Ok(self)
    }

    /// Index range targeted by `asc`/`desc`.
    pub fn last_added(&self) -> Range<usize> {
        self.last_added.clone()
    }

    pub fn items(&self) -> &[(Arg, SortOrder)] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.last_added = 0..0;
    }
}

impl Fragment for OrderBy {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        if self.items.is_empty() {
            return Err(SqlError::EmptyList("ORDER BY"));
        }
        b.write("ORDER BY ");
        for (item, order) in &self.items {
            b.write_value(item, Parens::SubQuery)?;
            b.write(order.suffix());
            b.write(", ");
        }
        b.remove_last(2);
        Ok(())
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ORDER BY ")?;
        for (i, (item, order)) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}{}", order.suffix())?;
        }
        Ok(())
    }
}

/// Pagination clause, written in the engine's [`OffsetStyle`].
///
/// Values are numbered offset first, so the limit style reads
/// `LIMIT @p1 OFFSET @p0`.
#[derive(Debug, Clone, Default)]
pub struct OffsetFetch {
    pub offset: Option<Arg>,
    pub fetch: Option<Arg>,
}

impl OffsetFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&mut self, value: impl Into<Arg>) -> &mut Self {
        self.offset = Some(value.into());
        self
    }

    pub fn fetch(&mut self, value: impl Into<Arg>) -> &mut Self {
        self.fetch = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.offset.is_none() && self.fetch.is_none()
    }
}

impl Fragment for OffsetFetch {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        if self.is_empty() {
            return Err(SqlError::EmptyList("OFFSET"));
        }
        match b.options().offset_style {
            OffsetStyle::Offset => {
                b.write("OFFSET ");
                match &self.offset {
                    Some(offset) => {
                        b.write_value(offset, Parens::SubQuery)?;
                    }
                    None => {
                        b.write("0");
                    }
                }
                b.write(" ROWS");
                if let Some(fetch) = &self.fetch {
                    b.write(" FETCH NEXT ");
                    b.write_value(fetch, Parens::SubQuery)?;
                    b.write(" ROWS ONLY");
                }
            }
            OffsetStyle::Limit => {
                let offset = match &self.offset {
                    Some(offset) => Some(
                        b.capture(|b| b.write_value(offset, Parens::SubQuery).map(|_| ()))?,
                    ),
                    None => None,
                };
                if let Some(fetch) = &self.fetch {
                    b.write("LIMIT ");
                    b.write_value(fetch, Parens::SubQuery)?;
                    if offset.is_some() {
                        b.write(" ");
                    }
                }
                if let Some(offset) = offset {
                    b.write("OFFSET ").write(&offset);
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for OffsetFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.offset {
            Some(offset) => write!(f, "OFFSET {offset} ROWS")?,
            None => f.write_str("OFFSET 0 ROWS")?,
        }
        if let Some(fetch) = &self.fetch {
            write!(f, " FETCH NEXT {fetch} ROWS ONLY")?;
        }
        Ok(())
    }
}
