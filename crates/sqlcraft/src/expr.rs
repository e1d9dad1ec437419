//! The structured expression model compiled into SQL.
//!
//! Expressions form a small closed grammar instead of string templates:
//! every user value that should be parameterized is parameterized by
//! construction, while named operators and functions stay open-ended
//! (any unrecognized name compiles as a plain SQL function call).

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::pattern::SqlRegex;
use crate::statement::Statement;

/// A value marked for placeholder-based binding.
///
/// Each parameter contributes exactly one placeholder and one entry in the
/// compiled parameter vector, in left-to-right compile order. An array value
/// expands element-wise (used for `IN` lists). An optional SQL type adds a
/// cast around the placeholder; the reserved `unixtime` type instead wraps
/// the placeholder in the dialect's timestamp-construction call.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub(crate) value: Value,
    pub(crate) cast: Option<String>,
}

impl Param {
    /// An untyped parameter.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            cast: None,
        }
    }

    /// A parameter with an explicit SQL type cast.
    pub fn typed(value: impl Into<Value>, sql_type: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            cast: Some(sql_type.into()),
        }
    }

    /// A `unixtime` parameter: the value is an epoch-seconds number or the
    /// keyword `"now"` (case-insensitive).
    pub fn unixtime(value: impl Into<Value>) -> Self {
        Self::typed(value, "unixtime")
    }

    /// A `unixtime` parameter from a timestamp.
    pub fn unixtime_at(at: DateTime<Utc>) -> Self {
        Self::typed(at.timestamp(), "unixtime")
    }

    /// The wrapped value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// The value side of one conjunctive-form pair.
#[derive(Clone, Debug)]
pub enum Field {
    /// Equality against an inline-escaped literal (`Value::Null` compiles to
    /// `IS NULL`).
    Value(Value),
    /// Equality against a bound parameter.
    Param(Param),
    /// An operator applied to the column: `[op, column, ...rest]`.
    Op(String, Vec<Expr>),
    /// A pattern match against the column.
    Regex(SqlRegex),
}

/// A SQL expression.
#[derive(Clone, Debug)]
pub enum Expr {
    /// Operator/function form: a case-insensitive name applied to operands.
    Call { name: String, args: Vec<Expr> },
    /// Conjunctive form: column/value pairs, AND-joined.
    Cond(Vec<(String, Field)>),
    /// Column reference; dotted segments are escaped independently.
    Column(String),
    /// Placeholder-bound parameter.
    Param(Param),
    /// Inline literal (string/number/boolean/null), escaped, never bound.
    Value(Value),
    /// Bare regular expression; compiles to its translated pattern literal.
    Pattern(SqlRegex),
    /// Untagged sequence (IN lists, CASE branches).
    List(Vec<Expr>),
    /// An embedded sub-statement, spliced in parenthesized.
    Subquery(Statement),
}

impl Expr {
    /// Operator/function form.
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: name.into(),
            args,
        }
    }

    /// Column reference.
    pub fn col(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    /// Untyped bound parameter.
    pub fn param(value: impl Into<Value>) -> Self {
        Expr::Param(Param::new(value))
    }

    /// Inline literal.
    pub fn val(value: impl Into<Value>) -> Self {
        Expr::Value(value.into())
    }

    /// Pattern literal.
    pub fn pattern(rx: SqlRegex) -> Self {
        Expr::Pattern(rx)
    }

    /// Untagged sequence.
    pub fn list(items: Vec<Expr>) -> Self {
        Expr::List(items)
    }

    /// AND over any number of operands.
    pub fn and(args: Vec<Expr>) -> Self {
        Expr::call("AND", args)
    }

    /// OR over any number of operands.
    pub fn or(args: Vec<Expr>) -> Self {
        Expr::call("OR", args)
    }

    /// Negation.
    pub fn not(inner: Expr) -> Self {
        Expr::call("NOT", vec![inner])
    }

    /// Equality between two expressions.
    pub fn eq(left: Expr, right: Expr) -> Self {
        Expr::call("=", vec![left, right])
    }
}

impl From<Param> for Expr {
    fn from(p: Param) -> Self {
        Expr::Param(p)
    }
}

impl From<SqlRegex> for Expr {
    fn from(rx: SqlRegex) -> Self {
        Expr::Pattern(rx)
    }
}

impl From<Statement> for Expr {
    fn from(stmt: Statement) -> Self {
        Expr::Subquery(stmt)
    }
}

/// Incremental builder for the conjunctive form.
///
/// All pairs are AND-joined; insertion order is preserved.
#[derive(Clone, Debug, Default)]
pub struct Cond {
    pairs: Vec<(String, Field)>,
}

impl Cond {
    /// An empty condition set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no pairs were added.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `column = literal` (inline-escaped; `Value::Null` means IS NULL).
    pub fn value(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.pairs.push((column.into(), Field::Value(value.into())));
        self
    }

    /// `column = $n` with a bound parameter.
    pub fn param(mut self, column: impl Into<String>, param: Param) -> Self {
        self.pairs.push((column.into(), Field::Param(param)));
        self
    }

    /// `column IS NULL`.
    pub fn null(mut self, column: impl Into<String>) -> Self {
        self.pairs.push((column.into(), Field::Value(Value::Null)));
        self
    }

    /// An operator applied to the column: `op(column, ...rest)`.
    pub fn op(mut self, column: impl Into<String>, op: impl Into<String>, rest: Vec<Expr>) -> Self {
        self.pairs.push((column.into(), Field::Op(op.into(), rest)));
        self
    }

    /// A pattern match against the column.
    pub fn matches(mut self, column: impl Into<String>, rx: SqlRegex) -> Self {
        self.pairs.push((column.into(), Field::Regex(rx)));
        self
    }

    /// Finish into an [`Expr`].
    pub fn build(self) -> Expr {
        Expr::Cond(self.pairs)
    }
}

impl From<Cond> for Expr {
    fn from(cond: Cond) -> Self {
        cond.build()
    }
}
