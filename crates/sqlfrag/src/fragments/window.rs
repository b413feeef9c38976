use super::OrderBy;
use crate::builder::QueryBuilder;
use crate::error::SqlResult;
use crate::fragment::{Arg, Fragment, Parens, fmt_args, write_args};
use std::fmt;

/// Window specification: `OVER (PARTITION BY .. ORDER BY ..)`.
#[derive(Debug, Clone, Default)]
pub struct Over {
    partition_by: Vec<Arg>,
    order_by: OrderBy,
}

impl Over {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition_by(&mut self, value: impl Into<Arg>) -> &mut Self {
        self.partition_by.push(value.into());
        self
    }

    pub fn order_by(&mut self) -> &mut OrderBy {
        &mut self.order_by
    }
}

impl Fragment for Over {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        b.write("OVER (");
        if !self.partition_by.is_empty() {
            b.write("PARTITION BY ");
            write_args(b, &self.partition_by, ", ", Parens::SubQuery)?;
            if !self.order_by.is_empty() {
                b.write(" ");
            }
        }
        if !self.order_by.is_empty() {
            self.order_by.compile(b)?;
        }
        b.write(")");
        Ok(())
    }
}

impl fmt::Display for Over {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OVER (")?;
        if !self.partition_by.is_empty() {
            f.write_str("PARTITION BY ")?;
            fmt_args(f, &self.partition_by, ", ")?;
            if !self.order_by.is_empty() {
                f.write_str(" ")?;
            }
        }
        if !self.order_by.is_empty() {
            write!(f, "{}", self.order_by)?;
        }
        f.write_str(")")
    }
}
