use crate::builder::QueryBuilder;
use crate::error::SqlResult;
use crate::fragment::{Arg, Fragment, Parens};
use std::fmt;

/// `TOP (n) [PERCENT] [WITH TIES]` for SELECT, UPDATE and DELETE.
#[derive(Debug, Clone)]
pub struct Top {
    pub value: Arg,
    pub percent: bool,
    pub with_ties: bool,
}

impl Top {
    pub fn new(value: impl Into<Arg>) -> Self {
        Self {
            value: value.into(),
            percent: false,
            with_ties: false,
        }
    }
}

impl Fragment for Top {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        b.require(b.options().top_supported, "TOP")?;
        b.write("TOP (");
        b.write_value(&self.value, Parens::Never)?;
        b.write(")");
        if self.percent {
            b.write(" PERCENT");
        }
        if self.with_ties {
            b.write(" WITH TIES");
        }
        Ok(())
    }
}

impl fmt::Display for Top {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TOP ({})", self.value)?;
        if self.percent {
            f.write_str(" PERCENT")?;
        }
        if self.with_ties {
            f.write_str(" WITH TIES")?;
        }
        Ok(())
    }
}
