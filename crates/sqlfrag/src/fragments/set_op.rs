use super::operator::{OpForm, resolve_op};
use super::{OffsetFetch, OrderBy, With};
use crate::builder::QueryBuilder;
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Arg, Fragment, IntoFragment, Parens, Precedence};
use std::fmt;
use std::sync::Arc;

/// Operands are kept flat unless they need grouping, so
/// `(a UNION b) INTERSECT c` keeps its meaning.
fn operand_parens(operand: &dyn Fragment) -> Parens {
    if operand.needs_grouping() {
        Parens::Always
    } else {
        Parens::Never
    }
}

fn fmt_operand(f: &mut fmt::Formatter<'_>, operand: &dyn Fragment) -> fmt::Result {
    if operand.needs_grouping() {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}

/// Two queries combined: `left UNION right`, with an optional WITH, ORDER BY
/// and OFFSET that apply to the combination.
#[derive(Debug, Clone)]
pub struct SetOperator {
    pub left: Arc<dyn Fragment>,
    pub op: String,
    pub right: Arc<dyn Fragment>,
    with: Option<With>,
    order_by: Option<OrderBy>,
    offset: Option<OffsetFetch>,
}

impl SetOperator {
    pub fn new(left: impl IntoFragment, op: impl Into<String>, right: impl IntoFragment) -> Self {
        Self {
            left: left.into_fragment(),
            op: op.into(),
            right: right.into_fragment(),
            with: None,
            order_by: None,
            offset: None,
        }
    }

    pub fn union(left: impl IntoFragment, right: impl IntoFragment) -> Self {
        Self::new(left, "UNION", right)
    }

    pub fn union_all(left: impl IntoFragment, right: impl IntoFragment) -> Self {
        Self::new(left, "UNION ALL", right)
    }

    pub fn intersect(left: impl IntoFragment, right: impl IntoFragment) -> Self {
        Self::new(left, "INTERSECT", right)
    }

    pub fn except(left: impl IntoFragment, right: impl IntoFragment) -> Self {
        Self::new(left, "EXCEPT", right)
    }

    pub fn with(&mut self) -> &mut With {
        self.with.get_or_insert_with(With::new)
    }

    pub fn order_by(&mut self) -> &mut OrderBy {
        self.order_by.get_or_insert_with(OrderBy::new)
    }

    pub fn offset(&mut self, value: impl Into<Arg>) -> &mut OffsetFetch {
        self.offset.get_or_insert_with(OffsetFetch::new).offset(value)
    }

    pub fn fetch(&mut self, value: impl Into<Arg>) -> &mut OffsetFetch {
        self.offset.get_or_insert_with(OffsetFetch::new).fetch(value)
    }
}

impl Fragment for SetOperator {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        let symbol = match resolve_op(b.engine(), &self.op) {
            OpForm::Symbol(symbol) => symbol,
            OpForm::Function(name) => {
                return Err(SqlError::invalid_configuration(format!(
                    "set operator {} cannot be mapped to function {name}",
                    self.op
                )));
            }
        };
        if let Some(with) = &self.with {
            with.compile(b)?;
            b.write(" ");
        }
        b.write_fragment(self.left.as_ref(), operand_parens(self.left.as_ref()))?;
        b.write(" ").write(symbol).write(" ");
        b.write_fragment(self.right.as_ref(), operand_parens(self.right.as_ref()))?;
        if let Some(order_by) = &self.order_by {
            b.write(" ");
            order_by.compile(b)?;
        }
        if let Some(offset) = &self.offset {
            b.write(" ");
            offset.compile(b)?;
        }
        Ok(())
    }

    fn precedence(&self) -> Precedence {
        Precedence::SubQuery
    }

    fn needs_grouping(&self) -> bool {
        true
    }
}

impl fmt::Display for SetOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(with) = &self.with {
            write!(f, "{with} ")?;
        }
        fmt_operand(f, self.left.as_ref())?;
        write!(f, " {} ", self.op)?;
        fmt_operand(f, self.right.as_ref())?;
        if let Some(order_by) = &self.order_by {
            write!(f, " {order_by}")?;
        }
        if let Some(offset) = &self.offset {
            write!(f, " {offset}")?;
        }
        Ok(())
    }
}
