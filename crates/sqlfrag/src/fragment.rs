//! The fragment protocol shared by every node of a query tree.
//!
//! A fragment never compiles on its own: [`Fragment::compile`] receives a
//! [`QueryBuilder`] which carries the [`Engine`](crate::Engine) for the
//! dialect being targeted. The same tree can therefore be compiled against
//! any number of engines without being rebuilt.
//!
//! Every fragment also implements `Display`, a debug rendering that inlines
//! values as literals and skips engine escaping. It is meant for logs only.

use crate::builder::QueryBuilder;
use crate::error::SqlResult;
use crate::fragments::Alias;
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// How a fragment behaves when nested inside another fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precedence {
    /// Never needs parentheses (columns, functions, CASE).
    #[default]
    Atomic,
    /// Needs parentheses in another operator's operand position.
    SubFragment,
    /// Needs parentheses whenever it is used as a value.
    SubQuery,
    /// Both of the above.
    SubFragmentQuery,
}

impl Precedence {
    pub fn is_sub_fragment(self) -> bool {
        matches!(self, Precedence::SubFragment | Precedence::SubFragmentQuery)
    }

    pub fn is_sub_query(self) -> bool {
        matches!(self, Precedence::SubQuery | Precedence::SubFragmentQuery)
    }
}

/// Parentheses policy used when writing a nested fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parens {
    /// Never wrap.
    Never,
    /// Wrap sub-queries only (value positions: select lists, arguments).
    SubQuery,
    /// Wrap sub-fragments and sub-queries (operand positions).
    SubFragment,
    /// Always wrap.
    Always,
}

impl Parens {
    /// Whether a fragment with the given precedence gets wrapped.
    pub fn wraps(self, precedence: Precedence) -> bool {
        match self {
            Parens::Never => false,
            Parens::SubQuery => precedence.is_sub_query(),
            Parens::SubFragment => precedence.is_sub_fragment() || precedence.is_sub_query(),
            Parens::Always => true,
        }
    }
}

/// A compilable node of a query tree.
pub trait Fragment: fmt::Debug + fmt::Display + Send + Sync {
    /// Write this fragment into the builder.
    fn compile(&self, builder: &mut QueryBuilder<'_>) -> SqlResult<()>;

    /// Nesting behavior, consulted by the builder's parentheses policy.
    fn precedence(&self) -> Precedence {
        Precedence::Atomic
    }

    /// The chaining keyword when this fragment is an AND/OR chain.
    fn logical_op(&self) -> Option<&str> {
        None
    }

    /// The alias this fragment is referenced by when used as a FROM or JOIN
    /// source. A CTE answers with its name so its body is not emitted again.
    fn source_alias(&self) -> Option<&Alias> {
        None
    }

    /// Whether this fragment is a `*` column.
    fn is_select_all(&self) -> bool {
        false
    }

    /// Whether this fragment must be parenthesized as an operand of a set
    /// operation: it is one itself, or it carries clauses that would
    /// otherwise apply to the whole combination.
    fn needs_grouping(&self) -> bool {
        false
    }
}

/// Conversion into a shared fragment.
pub trait IntoFragment {
    fn into_fragment(self) -> Arc<dyn Fragment>;
}

impl<F: Fragment + 'static> IntoFragment for F {
    fn into_fragment(self) -> Arc<dyn Fragment> {
        Arc::new(self)
    }
}

impl IntoFragment for Arc<dyn Fragment> {
    fn into_fragment(self) -> Arc<dyn Fragment> {
        self
    }
}

/// An operand: either a scalar value or a nested fragment.
#[derive(Debug, Clone)]
pub enum Arg {
    Value(Value),
    Fragment(Arc<dyn Fragment>),
}

impl Arg {
    /// The nested fragment, if this operand is one.
    pub fn as_fragment(&self) -> Option<&dyn Fragment> {
        match self {
            Arg::Fragment(f) => Some(f.as_ref()),
            Arg::Value(_) => None,
        }
    }

    pub fn precedence(&self) -> Precedence {
        self.as_fragment()
            .map_or(Precedence::Atomic, |f| f.precedence())
    }

    pub fn is_select_all(&self) -> bool {
        self.as_fragment().is_some_and(|f| f.is_select_all())
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(v) => write!(f, "{v}"),
            Arg::Fragment(frag) => {
                if frag.precedence().is_sub_query() {
                    write!(f, "({frag})")
                } else {
                    write!(f, "{frag}")
                }
            }
        }
    }
}

impl<F: IntoFragment> From<F> for Arg {
    fn from(f: F) -> Self {
        Arg::Fragment(f.into_fragment())
    }
}

macro_rules! impl_arg_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_arg_from_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    String,
    &String,
    &str,
    Vec<u8>,
    Uuid,
    DateTime<Utc>,
    NaiveDateTime,
    NaiveDate,
    serde_json::Value,
);

#[cfg(feature = "rust_decimal")]
impl_arg_from_value!(rust_decimal::Decimal);

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

/// Write `items` separated by `sep`, each under the given parentheses policy.
pub(crate) fn write_args(
    b: &mut QueryBuilder<'_>,
    items: &[Arg],
    sep: &str,
    parens: Parens,
) -> SqlResult<()> {
    for item in items {
        b.write_value(item, parens)?;
        b.write(sep);
    }
    if !items.is_empty() {
        b.remove_last(sep.len());
    }
    Ok(())
}

/// Debug-render an operand, wrapping it like `Parens::SubFragment` would.
pub(crate) fn fmt_operand(f: &mut fmt::Formatter<'_>, item: &Arg) -> fmt::Result {
    match item {
        Arg::Fragment(frag) if Parens::SubFragment.wraps(frag.precedence()) => write!(f, "({frag})"),
        _ => write!(f, "{item}"),
    }
}

/// Debug-render `items` separated by `sep`.
pub(crate) fn fmt_args(f: &mut fmt::Formatter<'_>, items: &[Arg], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
