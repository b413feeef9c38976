//! The output sink fragments compile into.

use crate::engine::{Engine, EngineOptions};
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Arg, Fragment, Parens};
use crate::param::ParamList;
use crate::value::Value;

/// Accumulates SQL text and parameters while a fragment tree is compiled.
///
/// One builder belongs to exactly one compile call. Parameters are named
/// `<prefix><n>` where `n` only ever grows, so names are unique within the
/// compiled statement and follow the order in which values were reached.
#[must_use]
pub struct QueryBuilder<'e> {
    engine: &'e dyn Engine,
    sql: String,
    params: ParamList,
}

impl<'e> QueryBuilder<'e> {
    /// Create an empty builder for the given engine.
    pub fn new(engine: &'e dyn Engine) -> Self {
        Self {
            engine,
            sql: String::new(),
            params: ParamList::new(),
        }
    }

    /// The engine this builder compiles for.
    pub fn engine(&self) -> &'e dyn Engine {
        self.engine
    }

    /// Shortcut for `engine().options()`.
    pub fn options(&self) -> &'e EngineOptions {
        self.engine.options()
    }

    /// Fail with a clause-not-supported error unless `supported` holds.
    pub fn require(&self, supported: bool, clause: &'static str) -> SqlResult<()> {
        if supported {
            Ok(())
        } else {
            Err(SqlError::not_supported(self.engine.name(), clause))
        }
    }

    /// Append raw SQL.
    pub fn write(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append an identifier, escaping each dotted segment.
    pub fn write_name(&mut self, name: &str) -> &mut Self {
        self.engine.write_name(name, &mut self.sql);
        self
    }

    /// Append a single identifier segment, escaped as a whole.
    pub fn write_name_part(&mut self, name: &str) -> &mut Self {
        self.options().name_quote.write_part(name, &mut self.sql);
        self
    }

    /// Register a parameter and return its name without writing it.
    pub fn add_parameter(&mut self, value: Value) -> String {
        let engine = self.engine;
        let prefix = &engine.options().parameter_prefix;
        self.params.push(prefix, value).to_string()
    }

    /// Append a value.
    ///
    /// Fragments are compiled in place under `parens`; NULL is written inline;
    /// every other value becomes a parameter placeholder.
    pub fn write_value(&mut self, value: &Arg, parens: Parens) -> SqlResult<&mut Self> {
        match value {
            Arg::Fragment(f) => self.write_fragment(f.as_ref(), parens),
            Arg::Value(Value::Null) => Ok(self.write("NULL")),
            Arg::Value(v) => {
                let name = self.add_parameter(v.clone());
                Ok(self.write(&name))
            }
        }
    }

    /// Compile a nested fragment, wrapping it when `parens` says so.
    pub fn write_fragment(&mut self, fragment: &dyn Fragment, parens: Parens) -> SqlResult<&mut Self> {
        if parens.wraps(fragment.precedence()) {
            self.sql.push('(');
            fragment.compile(self)?;
            self.sql.push(')');
        } else {
            fragment.compile(self)?;
        }
        Ok(self)
    }

    /// Run `f` and return the text it wrote instead of keeping it in place.
    ///
    /// Parameters registered by `f` stay registered, so this is how a node
    /// writes clauses in a different order than it numbers their values.
    pub fn capture<F>(&mut self, f: F) -> SqlResult<String>
    where
        F: FnOnce(&mut Self) -> SqlResult<()>,
    {
        let start = self.sql.len();
        f(&mut *self)?;
        Ok(self.sql.split_off(start))
    }

    /// Drop the last `n` bytes of text (used to strip trailing separators).
    pub fn remove_last(&mut self, n: usize) -> &mut Self {
        let mut end = self.sql.len().saturating_sub(n);
        while end > 0 && !self.sql.is_char_boundary(end) {
            end -= 1;
        }
        self.sql.truncate(end);
        self
    }

    /// Whether the text written so far ends with `suffix`.
    pub fn ends_with(&self, suffix: &str) -> bool {
        self.sql.ends_with(suffix)
    }

    /// SQL written so far.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameters registered so far.
    pub fn params(&self) -> &ParamList {
        &self.params
    }

    /// Consume the builder into the final result.
    pub fn finish(self) -> QueryResult {
        QueryResult {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// Compiled SQL plus its ordered parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub sql: String,
    pub params: ParamList,
}

impl QueryResult {
    /// Parameter value by name (`@p0`, ...).
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }
}

/// Compile any fragment against an engine.
pub fn compile_fragment(fragment: &dyn Fragment, engine: &dyn Engine) -> SqlResult<QueryResult> {
    let mut builder = QueryBuilder::new(engine);
    let result = fragment.compile(&mut builder).map(|()| builder.finish());

    #[cfg(feature = "tracing")]
    if let Some(trace) = engine.trace() {
        match &result {
            Ok(compiled) => trace.emit_compiled(engine.name(), compiled),
            Err(err) => trace.emit_failed(engine.name(), err),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Dialect;
    use crate::fragments::Column;

    #[test]
    fn values_become_numbered_parameters() {
        let engine = Dialect::sqlserver();
        let mut b = QueryBuilder::new(&engine);
        b.write_value(&Arg::from(10), Parens::Never).unwrap();
        b.write(", ");
        b.write_value(&Arg::from("x"), Parens::Never).unwrap();
        let result = b.finish();
        assert_eq!(result.sql, "@p0, @p1");
        assert_eq!(result.param("@p0"), Some(&Value::Int(10)));
        assert_eq!(result.param("@p1"), Some(&Value::Text("x".into())));
    }

    #[test]
    fn null_is_inlined() {
        let engine = Dialect::postgres();
        let mut b = QueryBuilder::new(&engine);
        b.write_value(&Arg::Value(Value::Null), Parens::Never).unwrap();
        let result = b.finish();
        assert_eq!(result.sql, "NULL");
        assert!(result.params.is_empty());
    }

    #[test]
    fn write_name_escapes_segments() {
        let engine = Dialect::sqlserver();
        let mut b = QueryBuilder::new(&engine);
        b.write_name("dbo.users");
        assert_eq!(b.sql(), "[dbo].[users]");
    }

    #[test]
    fn remove_last_strips_separator() {
        let engine = Dialect::postgres();
        let mut b = QueryBuilder::new(&engine);
        b.write("a, b, ").remove_last(2);
        assert_eq!(b.sql(), "a, b");
        b.remove_last(100);
        assert_eq!(b.sql(), "");
    }

    #[test]
    fn capture_keeps_parameters() {
        let engine = Dialect::postgres();
        let mut b = QueryBuilder::new(&engine);
        let text = b
            .capture(|b| b.write_value(&Arg::from(5), Parens::Never).map(|_| ()))
            .unwrap();
        assert_eq!(text, "@p0");
        assert_eq!(b.sql(), "");
        assert_eq!(b.params().len(), 1);
    }

    #[test]
    fn fragments_compile_in_place() {
        let engine = Dialect::postgres();
        let col = Arg::from(Column::new("name"));
        let mut b = QueryBuilder::new(&engine);
        b.write_value(&col, Parens::Always).unwrap();
        assert_eq!(b.sql(), r#"("name")"#);
    }
}
