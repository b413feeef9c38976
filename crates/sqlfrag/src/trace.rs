//! Logging of compiled statements through `tracing`.
//!
//! A [`CompileTrace`] attached to a dialect with
//! [`Dialect::with_trace`](crate::Dialect::with_trace) turns every compile
//! into one event at target `sqlfrag.compile`. The event carries the dialect
//! name, the statement's leading keyword and its parameter count, plus the
//! SQL clipped to a byte limit. Parameter values are only logged when asked
//! for. A failed compile is logged at WARN with the error instead.
//!
//! Enable via the crate feature: `sqlfrag = { features = ["tracing"] }`.

use crate::builder::QueryResult;
use crate::error::SqlError;
use std::borrow::Cow;
use std::fmt::Write;
use tracing::Level;

/// Dispatch an event at a level chosen at runtime.
macro_rules! event_at {
    ($level:expr, $($field:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($field)*),
            Level::WARN  => tracing::warn!($($field)*),
            Level::INFO  => tracing::info!($($field)*),
            Level::DEBUG => tracing::debug!($($field)*),
            Level::TRACE => tracing::trace!($($field)*),
        }
    };
}

/// Per-dialect logging settings for compiled statements.
#[derive(Debug, Clone)]
pub struct CompileTrace {
    level: Level,
    sql_limit: Option<usize>,
    show_params: bool,
}

impl Default for CompileTrace {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            sql_limit: Some(200),
            show_params: false,
        }
    }
}

impl CompileTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level of successful compile events.
    pub fn at(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Clip logged SQL to `limit` bytes; `None` logs it whole.
    pub fn sql_limit(mut self, limit: Option<usize>) -> Self {
        self.sql_limit = limit;
        self
    }

    /// Log parameter values as `@p0=5, @p1='x'`.
    pub fn show_params(mut self) -> Self {
        self.show_params = true;
        self
    }

    pub(crate) fn emit_compiled(&self, dialect: &str, result: &QueryResult) {
        let sql = clip(&result.sql, self.sql_limit);
        let params = if self.show_params {
            render_params(result)
        } else {
            String::from("-")
        };
        event_at!(
            self.level,
            target: "sqlfrag.compile",
            dialect,
            statement = leading_keyword(&result.sql),
            param_count = result.params.len(),
            params = %params,
            sql = %sql,
        );
    }

    pub(crate) fn emit_failed(&self, dialect: &str, err: &SqlError) {
        tracing::warn!(target: "sqlfrag.compile", dialect, error = %err, "compile failed");
    }
}

/// `SELECT`, `INSERT`, `WITH`, ... of a compiled statement.
fn leading_keyword(sql: &str) -> &str {
    sql.split_whitespace().next().unwrap_or("")
}

/// Cut `sql` to at most `limit` bytes on a char boundary, marking the cut.
fn clip(sql: &str, limit: Option<usize>) -> Cow<'_, str> {
    match limit {
        Some(max) if sql.len() > max => {
            let mut end = max;
            while !sql.is_char_boundary(end) {
                end -= 1;
            }
            Cow::Owned(format!("{}...", &sql[..end]))
        }
        _ => Cow::Borrowed(sql),
    }
}

fn render_params(result: &QueryResult) -> String {
    let mut out = String::new();
    for param in &result.params {
        if !out.is_empty() {
            out.push_str(", ");
        }
        let _ = write!(out, "{}={}", param.name, param.value);
    }
    out
}
