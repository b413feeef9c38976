use super::Column;
use super::operator::write_call;
use crate::builder::QueryBuilder;
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Arg, Fragment, Parens, fmt_args};
use std::fmt;

/// A function call: `NAME([DISTINCT] arg, ...)`.
///
/// The engine may rename the function or take over its layout entirely
/// through a [`FunctionCompiler`](crate::FunctionCompiler).
#[derive(Debug, Clone)]
pub struct Func {
    name: String,
    args: Vec<Arg>,
    distinct: bool,
}

impl Func {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            distinct: false,
        }
    }

    /// `COUNT(*)`.
    pub fn count_all() -> Self {
        Self::new("COUNT").arg(Column::all())
    }

    /// Append an argument.
    pub fn arg(mut self, value: impl Into<Arg>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn add(&mut self, value: impl Into<Arg>) -> &mut Self {
        self.args.push(value.into());
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Write the call in the default layout under the given name.
    ///
    /// Custom function compilers use this to fall back on the usual shape.
    pub fn write_call(&self, b: &mut QueryBuilder<'_>, name: &str) -> SqlResult<()> {
        if self.distinct {
            b.write(name).write("(DISTINCT ");
            for arg in &self.args {
                b.write_value(arg, Parens::SubQuery)?;
                b.write(", ");
            }
            if !self.args.is_empty() {
                b.remove_last(2);
            }
            b.write(")");
            Ok(())
        } else {
            write_call(b, name, &self.args)
        }
    }
}

impl Fragment for Func {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        let engine = b.engine();
        let info = engine.function(&self.name);
        if info.is_none() && engine.options().functions_registered_only {
            return Err(SqlError::invalid_configuration(format!(
                "function {} is not registered with {}",
                self.name,
                engine.name()
            )));
        }
        if let Some(compiler) = info.and_then(|i| i.compiler.as_ref()) {
            return compiler(self, b);
        }
        let name = info
            .and_then(|i| i.name.as_deref())
            .unwrap_or(&self.name);
        self.write_call(b, name)
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        fmt_args(f, &self.args, ", ")?;
        f.write_str(")")
    }
}

/// A SQL type name for casts: `VARCHAR(50)`, `DECIMAL(18, 2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlType {
    name: String,
    args: Vec<u32>,
}

impl SqlType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Add a size, precision or scale argument.
    pub fn arg(mut self, value: u32) -> Self {
        self.args.push(value);
        self
    }
}

impl Fragment for SqlType {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        b.write(&self.to_string());
        Ok(())
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// `CAST(value AS type)`.
#[derive(Debug, Clone)]
pub struct Cast {
    pub value: Arg,
    pub ty: SqlType,
}

impl Cast {
    pub fn new(value: impl Into<Arg>, ty: SqlType) -> Self {
        Self {
            value: value.into(),
            ty,
        }
    }
}

impl Fragment for Cast {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        b.write("CAST(");
        b.write_value(&self.value, Parens::SubQuery)?;
        b.write(" AS ");
        self.ty.compile(b)?;
        b.write(")");
        Ok(())
    }
}

impl fmt::Display for Cast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CAST({} AS {})", self.value, self.ty)
    }
}

/// `CASE [value] WHEN .. THEN .. [ELSE ..] END`.
#[derive(Debug, Clone, Default)]
pub struct Case {
    value: Option<Arg>,
    whens: Vec<(Arg, Arg)>,
    otherwise: Option<Arg>,
}

impl Case {
    /// Searched CASE: each WHEN is a condition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simple CASE: each WHEN is compared with `value`.
    pub fn on(value: impl Into<Arg>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn when(&mut self, when: impl Into<Arg>, then: impl Into<Arg>) -> &mut Self {
        self.whens.push((when.into(), then.into()));
        self
    }

    pub fn otherwise(&mut self, value: impl Into<Arg>) -> &mut Self {
        self.otherwise = Some(value.into());
        self
    }
}

impl Fragment for Case {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        if self.whens.is_empty() {
            return Err(SqlError::EmptyList("CASE"));
        }
        b.write("CASE");
        if let Some(value) = &self.value {
            b.write(" ");
            b.write_value(value, Parens::SubFragment)?;
        }
        for (when, then) in &self.whens {
            b.write(" WHEN ");
            b.write_value(when, Parens::SubQuery)?;
            b.write(" THEN ");
            b.write_value(then, Parens::SubQuery)?;
        }
        if let Some(otherwise) = &self.otherwise {
            b.write(" ELSE ");
            b.write_value(otherwise, Parens::SubQuery)?;
        }
        b.write(" END");
        Ok(())
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CASE")?;
        if let Some(value) = &self.value {
            write!(f, " {value}")?;
        }
        for (when, then) in &self.whens {
            write!(f, " WHEN {when} THEN {then}")?;
        }
        if let Some(otherwise) = &self.otherwise {
            write!(f, " ELSE {otherwise}")?;
        }
        f.write_str(" END")
    }
}
