//! N-ary operators: one symbol repeated between any number of operands.

use super::operator::{OpForm, resolve_op};
use crate::builder::QueryBuilder;
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Arg, Fragment, Parens, Precedence};
use std::fmt;

/// Write `a op b op c`, or `F(F(a, b), c)` when the engine maps `op` to a
/// function. `wrap` decides which operands get parentheses.
fn compile_chain(
    b: &mut QueryBuilder<'_>,
    op: &str,
    items: &[Arg],
    what: &'static str,
    wrap: impl Fn(&Arg) -> bool,
) -> SqlResult<()> {
    let Some((first, rest)) = items.split_first() else {
        return Err(SqlError::EmptyList(what));
    };
    match resolve_op(b.engine(), op) {
        OpForm::Function(name) => {
            for _ in rest {
                b.write(name).write("(");
            }
            b.write_value(first, Parens::SubQuery)?;
            for item in rest {
                b.write(", ");
                b.write_value(item, Parens::SubQuery)?;
                b.write(")");
            }
        }
        OpForm::Symbol(symbol) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    b.write(" ").write(symbol).write(" ");
                }
                let parens = if wrap(item) { Parens::Always } else { Parens::Never };
                b.write_value(item, parens)?;
            }
        }
    }
    Ok(())
}

fn fmt_chain(
    f: &mut fmt::Formatter<'_>,
    op: &str,
    items: &[Arg],
    wrap: impl Fn(&Arg) -> bool,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " {op} ")?;
        }
        if wrap(item) {
            write!(f, "({item})")?;
        } else {
            write!(f, "{item}")?;
        }
    }
    Ok(())
}

fn wraps_operand(item: &Arg) -> bool {
    Parens::SubFragment.wraps(item.precedence())
}

macro_rules! variadic_operator {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            op: String,
            items: Vec<Arg>,
        }

        impl $name {
            pub fn new(op: impl Into<String>) -> Self {
                Self {
                    op: op.into(),
                    items: Vec::new(),
                }
            }

            pub fn add(&mut self, item: impl Into<Arg>) -> &mut Self {
                self.items.push(item.into());
                self
            }

            pub fn add_many<I>(&mut self, items: I) -> &mut Self
            where
                I: IntoIterator,
                I::Item: Into<Arg>,
            {
                self.items.extend(items.into_iter().map(Into::into));
                self
            }

            /// Consuming form of `add`.
            pub fn with(mut self, item: impl Into<Arg>) -> Self {
                self.items.push(item.into());
                self
            }

            pub fn op(&self) -> &str {
                &self.op
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
    };
}

variadic_operator!(
    /// Arithmetic chain: `a + b + c`, `a || b`.
    ArithOperator
);

variadic_operator!(
    /// Bitwise chain: `a & b & c`.
    BitOperator
);

variadic_operator!(
    /// Boolean chain: `a AND b AND c`.
    ///
    /// Operands that are themselves a chain with a different keyword, or
    /// sub-queries, are parenthesized; plain comparisons are not.
    LogicalOperator
);

impl ArithOperator {
    pub fn plus() -> Self {
        Self::new("+")
    }

    pub fn minus() -> Self {
        Self::new("-")
    }

    pub fn times() -> Self {
        Self::new("*")
    }

    pub fn divide() -> Self {
        Self::new("/")
    }

    pub fn modulo() -> Self {
        Self::new("%")
    }

    /// String concatenation (`||`).
    pub fn concat() -> Self {
        Self::new("||")
    }
}

impl Fragment for ArithOperator {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        compile_chain(b, &self.op, &self.items, "arithmetic operator", wraps_operand)
    }

    fn precedence(&self) -> Precedence {
        Precedence::SubFragment
    }
}

impl fmt::Display for ArithOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_chain(f, &self.op, &self.items, wraps_operand)
    }
}

impl BitOperator {
    pub fn and() -> Self {
        Self::new("&")
    }

    pub fn or() -> Self {
        Self::new("|")
    }

    pub fn xor() -> Self {
        Self::new("^")
    }
}

impl Fragment for BitOperator {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        compile_chain(b, &self.op, &self.items, "bitwise operator", wraps_operand)
    }

    fn precedence(&self) -> Precedence {
        Precedence::SubFragment
    }
}

impl fmt::Display for BitOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_chain(f, &self.op, &self.items, wraps_operand)
    }
}

impl LogicalOperator {
    pub fn and() -> Self {
        Self::new("AND")
    }

    pub fn or() -> Self {
        Self::new("OR")
    }

    fn wraps(&self, item: &Arg) -> bool {
        let Some(frag) = item.as_fragment() else {
            return false;
        };
        frag.precedence().is_sub_query()
            || frag
                .logical_op()
                .is_some_and(|op| !op.eq_ignore_ascii_case(&self.op))
    }
}

impl Fragment for LogicalOperator {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        compile_chain(b, &self.op, &self.items, "logical operator", |item| self.wraps(item))
    }

    fn precedence(&self) -> Precedence {
        Precedence::SubFragment
    }

    fn logical_op(&self) -> Option<&str> {
        Some(&self.op)
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_chain(f, &self.op, &self.items, |item| self.wraps(item))
    }
}
