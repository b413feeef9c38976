//! Fixed-arity operators.
//!
//! Every operator carries its symbol as written in SQL. The engine may map
//! the symbol to another symbol, or to a function that takes the operands as
//! arguments; that is how `a % b` becomes `MOD(a, b)` on dialects without the
//! operator.

use super::ValList;
use crate::builder::QueryBuilder;
use crate::engine::{Engine, OperatorInfo};
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Arg, Fragment, IntoFragment, Parens, Precedence, fmt_operand};
use std::fmt;
use std::sync::Arc;

/// How an operator is written after engine resolution.
pub(crate) enum OpForm<'a> {
    Symbol(&'a str),
    Function(&'a str),
}

pub(crate) fn resolve_op<'a>(engine: &'a dyn Engine, op: &'a str) -> OpForm<'a> {
    match engine.operator(op) {
        Some(OperatorInfo::Symbol(s)) => OpForm::Symbol(s),
        Some(OperatorInfo::Function(f)) => OpForm::Function(f),
        None => OpForm::Symbol(op),
    }
}

/// Write `name(a, b, ...)`.
pub(crate) fn write_call<'a, I>(b: &mut QueryBuilder<'_>, name: &str, args: I) -> SqlResult<()>
where
    I: IntoIterator<Item = &'a Arg>,
{
    b.write(name).write("(");
    for (i, arg) in args.into_iter().enumerate() {
        if i > 0 {
            b.write(", ");
        }
        b.write_value(arg, Parens::SubQuery)?;
    }
    b.write(")");
    Ok(())
}

/// Sub-query operators have no function form.
fn query_symbol<'a>(engine: &'a dyn Engine, op: &'a str) -> SqlResult<&'a str> {
    match resolve_op(engine, op) {
        OpForm::Symbol(symbol) => Ok(symbol),
        OpForm::Function(name) => Err(SqlError::invalid_configuration(format!(
            "operator {op} on a sub-query cannot be mapped to function {name}"
        ))),
    }
}

/// Symbols that read as words get a space after them (`NOT x`, but `-x`).
fn is_word(op: &str) -> bool {
    op.chars().last().is_some_and(|c| c.is_ascii_alphanumeric())
}

/// Binary operator: `left op right`.
#[derive(Debug, Clone)]
pub struct Operator {
    pub left: Arg,
    pub op: String,
    pub right: Arg,
}

impl Operator {
    pub fn new(left: impl Into<Arg>, op: impl Into<String>, right: impl Into<Arg>) -> Self {
        Self {
            left: left.into(),
            op: op.into(),
            right: right.into(),
        }
    }

    pub fn eq(left: impl Into<Arg>, right: impl Into<Arg>) -> Self {
        Self::new(left, "=", right)
    }

    pub fn ne(left: impl Into<Arg>, right: impl Into<Arg>) -> Self {
        Self::new(left, "<>", right)
    }

    pub fn lt(left: impl Into<Arg>, right: impl Into<Arg>) -> Self {
        Self::new(left, "<", right)
    }

    pub fn le(left: impl Into<Arg>, right: impl Into<Arg>) -> Self {
        Self::new(left, "<=", right)
    }

    pub fn gt(left: impl Into<Arg>, right: impl Into<Arg>) -> Self {
        Self::new(left, ">", right)
    }

    pub fn ge(left: impl Into<Arg>, right: impl Into<Arg>) -> Self {
        Self::new(left, ">=", right)
    }

    pub fn like(left: impl Into<Arg>, right: impl Into<Arg>) -> Self {
        Self::new(left, "LIKE", right)
    }
}

impl Fragment for Operator {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        match resolve_op(b.engine(), &self.op) {
            OpForm::Function(name) => write_call(b, name, [&self.left, &self.right]),
            OpForm::Symbol(symbol) => {
                b.write_value(&self.left, Parens::SubFragment)?;
                b.write(" ").write(symbol).write(" ");
                b.write_value(&self.right, Parens::SubFragment)?;
                Ok(())
            }
        }
    }

    fn precedence(&self) -> Precedence {
        Precedence::SubFragment
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_operand(f, &self.left)?;
        write!(f, " {} ", self.op)?;
        fmt_operand(f, &self.right)
    }
}

/// Membership operator: `value IN (a, b, ...)`.
#[derive(Debug, Clone)]
pub struct ListOperator {
    pub value: Arg,
    pub op: String,
    pub list: ValList,
}

impl ListOperator {
    pub fn new(value: impl Into<Arg>, op: impl Into<String>, list: ValList) -> Self {
        Self {
            value: value.into(),
            op: op.into(),
            list,
        }
    }

    pub fn in_list<I>(value: impl Into<Arg>, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        Self::new(value, "IN", items.into_iter().collect())
    }

    pub fn not_in<I>(value: impl Into<Arg>, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        Self::new(value, "NOT IN", items.into_iter().collect())
    }
}

impl Fragment for ListOperator {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        match resolve_op(b.engine(), &self.op) {
            OpForm::Function(name) => {
                // Validates the list is not empty.
                let items = b.capture(|b| self.list.compile(b))?;
                b.write(name).write("(");
                b.write_value(&self.value, Parens::SubQuery)?;
                b.write(", ").write(&items).write(")");
                Ok(())
            }
            OpForm::Symbol(symbol) => {
                b.write_value(&self.value, Parens::SubFragment)?;
                b.write(" ").write(symbol).write(" ");
                b.write_fragment(&self.list, Parens::SubQuery)?;
                Ok(())
            }
        }
    }

    fn precedence(&self) -> Precedence {
        Precedence::SubFragment
    }
}

impl fmt::Display for ListOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_operand(f, &self.value)?;
        write!(f, " {} ({})", self.op, self.list)
    }
}

/// Prefix operator: `NOT x`, `-x`.
#[derive(Debug, Clone)]
pub struct LeftOperator {
    pub op: String,
    pub value: Arg,
}

impl LeftOperator {
    pub fn new(op: impl Into<String>, value: impl Into<Arg>) -> Self {
        Self {
            op: op.into(),
            value: value.into(),
        }
    }

    pub fn not(value: impl Into<Arg>) -> Self {
        Self::new("NOT", value)
    }

    pub fn neg(value: impl Into<Arg>) -> Self {
        Self::new("-", value)
    }
}

impl Fragment for LeftOperator {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        match resolve_op(b.engine(), &self.op) {
            OpForm::Function(name) => write_call(b, name, [&self.value]),
            OpForm::Symbol(symbol) => {
                b.write(symbol);
                if is_word(symbol) {
                    b.write(" ");
                }
                b.write_value(&self.value, Parens::SubFragment)?;
                Ok(())
            }
        }
    }

    fn precedence(&self) -> Precedence {
        Precedence::SubFragment
    }
}

impl fmt::Display for LeftOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.op)?;
        if is_word(&self.op) {
            f.write_str(" ")?;
        }
        fmt_operand(f, &self.value)
    }
}

/// Postfix operator: `x IS NULL`.
#[derive(Debug, Clone)]
pub struct RightOperator {
    pub value: Arg,
    pub op: String,
}

impl RightOperator {
    pub fn new(value: impl Into<Arg>, op: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            op: op.into(),
        }
    }

    pub fn is_null(value: impl Into<Arg>) -> Self {
        Self::new(value, "IS NULL")
    }

    pub fn is_not_null(value: impl Into<Arg>) -> Self {
        Self::new(value, "IS NOT NULL")
    }
}

impl Fragment for RightOperator {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        match resolve_op(b.engine(), &self.op) {
            OpForm::Function(name) => write_call(b, name, [&self.value]),
            OpForm::Symbol(symbol) => {
                b.write_value(&self.value, Parens::SubFragment)?;
                b.write(" ").write(symbol);
                Ok(())
            }
        }
    }

    fn precedence(&self) -> Precedence {
        Precedence::SubFragment
    }
}

impl fmt::Display for RightOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_operand(f, &self.value)?;
        write!(f, " {}", self.op)
    }
}

/// Three-operand operator: `a op1 b op2 c` (e.g. `x LIKE p ESCAPE e`).
///
/// Only `op1` is resolved through the engine; a function mapping receives all
/// three operands.
#[derive(Debug, Clone)]
pub struct TernaryOperator {
    pub first: Arg,
    pub op1: String,
    pub second: Arg,
    pub op2: String,
    pub third: Arg,
}

impl TernaryOperator {
    pub fn new(
        first: impl Into<Arg>,
        op1: impl Into<String>,
        second: impl Into<Arg>,
        op2: impl Into<String>,
        third: impl Into<Arg>,
    ) -> Self {
        Self {
            first: first.into(),
            op1: op1.into(),
            second: second.into(),
            op2: op2.into(),
            third: third.into(),
        }
    }
}

impl Fragment for TernaryOperator {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        match resolve_op(b.engine(), &self.op1) {
            OpForm::Function(name) => write_call(b, name, [&self.first, &self.second, &self.third]),
            OpForm::Symbol(symbol) => {
                b.write_value(&self.first, Parens::SubFragment)?;
                b.write(" ").write(symbol).write(" ");
                b.write_value(&self.second, Parens::SubFragment)?;
                b.write(" ").write(&self.op2).write(" ");
                b.write_value(&self.third, Parens::SubFragment)?;
                Ok(())
            }
        }
    }

    fn precedence(&self) -> Precedence {
        Precedence::SubFragment
    }
}

impl fmt::Display for TernaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_operand(f, &self.first)?;
        write!(f, " {} ", self.op1)?;
        fmt_operand(f, &self.second)?;
        write!(f, " {} ", self.op2)?;
        fmt_operand(f, &self.third)
    }
}

/// `value [NOT] BETWEEN min AND max`.
///
/// The keyword is resolved like any other operator symbol; a function mapping
/// receives the value and both bounds.
#[derive(Debug, Clone)]
pub struct RangeOperator {
    pub value: Arg,
    pub op: String,
    pub min: Arg,
    pub max: Arg,
}

impl RangeOperator {
    pub fn new(
        value: impl Into<Arg>,
        op: impl Into<String>,
        min: impl Into<Arg>,
        max: impl Into<Arg>,
    ) -> Self {
        Self {
            value: value.into(),
            op: op.into(),
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn between(value: impl Into<Arg>, min: impl Into<Arg>, max: impl Into<Arg>) -> Self {
        Self::new(value, "BETWEEN", min, max)
    }

    pub fn not_between(value: impl Into<Arg>, min: impl Into<Arg>, max: impl Into<Arg>) -> Self {
        Self::new(value, "NOT BETWEEN", min, max)
    }
}

impl Fragment for RangeOperator {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        match resolve_op(b.engine(), &self.op) {
            OpForm::Function(name) => write_call(b, name, [&self.value, &self.min, &self.max]),
            OpForm::Symbol(symbol) => {
                b.write_value(&self.value, Parens::SubFragment)?;
                b.write(" ").write(symbol).write(" ");
                b.write_value(&self.min, Parens::SubFragment)?;
                b.write(" AND ");
                b.write_value(&self.max, Parens::SubFragment)?;
                Ok(())
            }
        }
    }

    fn precedence(&self) -> Precedence {
        Precedence::SubFragment
    }
}

impl fmt::Display for RangeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_operand(f, &self.value)?;
        write!(f, " {} ", self.op)?;
        fmt_operand(f, &self.min)?;
        f.write_str(" AND ")?;
        fmt_operand(f, &self.max)
    }
}

/// A value compared against a sub-query: `x IN (SELECT ...)`, `x > ALL (...)`.
#[derive(Debug, Clone)]
pub struct QueryOperator {
    pub value: Arg,
    pub op: String,
    pub query: Arc<dyn Fragment>,
}

impl QueryOperator {
    pub fn new(value: impl Into<Arg>, op: impl Into<String>, query: impl IntoFragment) -> Self {
        Self {
            value: value.into(),
            op: op.into(),
            query: query.into_fragment(),
        }
    }

    pub fn in_query(value: impl Into<Arg>, query: impl IntoFragment) -> Self {
        Self::new(value, "IN", query)
    }

    pub fn not_in_query(value: impl Into<Arg>, query: impl IntoFragment) -> Self {
        Self::new(value, "NOT IN", query)
    }
}

impl Fragment for QueryOperator {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        let symbol = query_symbol(b.engine(), &self.op)?;
        b.write_value(&self.value, Parens::SubFragment)?;
        b.write(" ").write(symbol).write(" ");
        b.write_fragment(self.query.as_ref(), Parens::Always)?;
        Ok(())
    }

    fn precedence(&self) -> Precedence {
        Precedence::SubFragment
    }
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_operand(f, &self.value)?;
        write!(f, " {} ({})", self.op, self.query)
    }
}

/// A prefix operator on a sub-query: `EXISTS (SELECT ...)`.
#[derive(Debug, Clone)]
pub struct LeftQueryOperator {
    pub op: String,
    pub query: Arc<dyn Fragment>,
}

impl LeftQueryOperator {
    pub fn new(op: impl Into<String>, query: impl IntoFragment) -> Self {
        Self {
            op: op.into(),
            query: query.into_fragment(),
        }
    }

    pub fn exists(query: impl IntoFragment) -> Self {
        Self::new("EXISTS", query)
    }

    pub fn not_exists(query: impl IntoFragment) -> Self {
        Self::new("NOT EXISTS", query)
    }
}

impl Fragment for LeftQueryOperator {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        let symbol = query_symbol(b.engine(), &self.op)?;
        b.write(symbol).write(" ");
        b.write_fragment(self.query.as_ref(), Parens::Always)?;
        Ok(())
    }

    fn precedence(&self) -> Precedence {
        Precedence::SubFragment
    }
}

impl fmt::Display for LeftQueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.op, self.query)
    }
}
