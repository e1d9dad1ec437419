//! Recursive expression compilation.
//!
//! [`Compiler`] owns the statement buffer being built; every recursive call
//! appends to it, so concurrent compilations of different statements never
//! share state. Dispatch is driven by the [`Expr`] discriminator, which makes
//! the arity and malformed-input errors exhaustive.

use serde_json::Value;

use crate::dialect::{Dialect, QueryConfig};
use crate::error::{SqlError, SqlResult};
use crate::escape::{escape_ident, escape_string};
use crate::expr::{Expr, Field, Param};
use crate::pattern;
use crate::statement::Statement;

/// Operators that may take a single operand, emitted as `OP operand`.
fn is_unary(op: &str) -> bool {
    matches!(op, "-" | "EXISTS" | "NOT EXISTS")
}

/// Strictly binary operators: exactly two operands required.
fn is_binary(op: &str) -> bool {
    matches!(
        op,
        "=" | "!="
            | "<>"
            | "<"
            | "<="
            | ">"
            | ">="
            | "LIKE"
            | "ILIKE"
            | "NOT LIKE"
            | "NOT ILIKE"
            | "%"
            | "^"
    )
}

/// N-ary operators joined over all operands, parenthesized.
fn is_variadic(op: &str) -> bool {
    matches!(op, "AND" | "OR" | "+" | "-" | "*" | "/" | "||")
}

/// Word operators get surrounding spaces; symbol operators join tightly.
fn op_glue(op: &str) -> String {
    if op.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        format!(" {op} ")
    } else {
        op.to_string()
    }
}

/// Keyword-safety check for raw keyword arguments (`TYPE`, `EXTRACT` units).
fn check_keyword(keyword: &str) -> SqlResult<&str> {
    let ok = !keyword.is_empty()
        && keyword
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == ' ');
    if ok {
        Ok(keyword)
    } else {
        Err(SqlError::malformed(format!(
            "unsafe keyword argument: {keyword:?}"
        )))
    }
}

/// Looser check for cast target types, which may carry digits and parens
/// (`varchar(32)`, `numeric(10, 2)`).
fn check_type_name(name: &str) -> SqlResult<&str> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '(' | ')' | ',' | '_' | '[' | ']'));
    if ok {
        Ok(name)
    } else {
        Err(SqlError::malformed(format!("unsafe cast type: {name:?}")))
    }
}

fn expect_keyword_arg(op: &str, arg: &Expr) -> SqlResult<String> {
    match arg {
        Expr::Value(Value::String(s)) => Ok(s.clone()),
        Expr::Column(s) => Ok(s.clone()),
        other => Err(SqlError::malformed(format!(
            "{op} expects a keyword string argument, got {}",
            value_kind(other)
        ))),
    }
}

fn value_kind(expr: &Expr) -> &'static str {
    match expr {
        Expr::Call { .. } => "operator form",
        Expr::Cond(_) => "conjunctive form",
        Expr::Column(_) => "column reference",
        Expr::Param(_) => "parameter",
        Expr::Value(v) => match v {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        },
        Expr::Pattern(_) => "pattern",
        Expr::List(_) => "list",
        Expr::Subquery(_) => "subquery",
    }
}

/// The expression compiler: configuration plus the buffer under construction.
pub(crate) struct Compiler<'a> {
    cfg: &'a QueryConfig,
    stmt: Statement,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(cfg: &'a QueryConfig) -> Self {
        Self {
            cfg,
            stmt: Statement::new(cfg.dialect),
        }
    }

    pub(crate) fn finish(self) -> Statement {
        self.stmt
    }

    pub(crate) fn dialect(&self) -> Dialect {
        self.cfg.dialect
    }

    pub(crate) fn push(&mut self, sql: impl AsRef<str>) {
        self.stmt.push_sql(sql);
    }

    pub(crate) fn push_ident(&mut self, name: &str) {
        let escaped = escape_ident(self.cfg, name);
        self.stmt.push_sql(escaped);
    }

    pub(crate) fn splice(&mut self, sub: &Statement) {
        self.stmt.splice(sub);
    }

    /// Compile one expression, appending to the buffer.
    pub(crate) fn expr(&mut self, expr: &Expr) -> SqlResult<()> {
        match expr {
            Expr::Call { name, args } => self.call(name, args),
            Expr::Cond(pairs) => self.cond(pairs),
            Expr::Column(name) => {
                self.push_ident(name);
                Ok(())
            }
            Expr::Param(p) => self.param(p),
            Expr::Value(v) => self.literal(v),
            Expr::Pattern(rx) => {
                let lit = escape_string(self.dialect(), &pattern::literal_pattern(rx));
                self.push(lit);
                Ok(())
            }
            Expr::List(items) => {
                self.push("(");
                self.comma_list(items)?;
                self.push(")");
                Ok(())
            }
            Expr::Subquery(sub) => {
                self.push("(");
                self.splice(sub);
                self.push(")");
                Ok(())
            }
        }
    }

    fn comma_list(&mut self, items: &[Expr]) -> SqlResult<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.push(",");
            }
            self.expr(item)?;
        }
        Ok(())
    }

    // ==================== operator/function form ====================

    fn call(&mut self, name: &str, args: &[Expr]) -> SqlResult<()> {
        let op = name.trim().to_uppercase();
        if op.is_empty() {
            return Err(SqlError::malformed(
                "operator form must start with a function or operator name",
            ));
        }

        if is_unary(&op) && args.len() == 1 {
            self.push(&op);
            if op.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
                self.push(" ");
            }
            return self.expr(&args[0]);
        }

        match op.as_str() {
            "IN" | "NOT IN" => return self.in_list(&op, args),
            "IS NULL" | "IS NOT NULL" => {
                if args.len() != 1 {
                    return Err(SqlError::arity(&op, 1, args.len()));
                }
                self.expr(&args[0])?;
                self.push(" ");
                self.push(&op);
                return Ok(());
            }
            "NOT" => {
                if args.len() != 1 {
                    return Err(SqlError::arity("NOT", 1, args.len()));
                }
                self.push("NOT (");
                self.expr(&args[0])?;
                self.push(")");
                return Ok(());
            }
            "BETWEEN" | "NOT BETWEEN" => {
                if args.len() != 3 {
                    return Err(SqlError::arity(&op, 3, args.len()));
                }
                self.expr(&args[0])?;
                self.push(format!(" {op} "));
                self.expr(&args[1])?;
                self.push(" AND ");
                self.expr(&args[2])?;
                return Ok(());
            }
            "TYPE" => {
                if args.len() != 2 {
                    return Err(SqlError::arity("TYPE", 2, args.len()));
                }
                let keyword = expect_keyword_arg("TYPE", &args[0])?;
                check_keyword(&keyword)?;
                self.push(format!("{keyword} "));
                return self.expr(&args[1]);
            }
            "CAST" => {
                if args.len() != 2 {
                    return Err(SqlError::arity("CAST", 2, args.len()));
                }
                let ty = expect_keyword_arg("CAST", &args[1])?;
                check_type_name(&ty)?;
                match self.dialect() {
                    Dialect::Postgres => {
                        self.expr(&args[0])?;
                        self.push(format!("::{ty}"));
                    }
                    Dialect::MySql => {
                        self.push("CAST(");
                        self.expr(&args[0])?;
                        self.push(format!(" AS {ty})"));
                    }
                }
                return Ok(());
            }
            "EXTRACT" => {
                if args.len() != 2 {
                    return Err(SqlError::arity("EXTRACT", 2, args.len()));
                }
                let unit = expect_keyword_arg("EXTRACT", &args[0])?;
                check_keyword(&unit)?;
                self.push(format!("EXTRACT({unit} FROM "));
                self.expr(&args[1])?;
                self.push(")");
                return Ok(());
            }
            "CASE" => return self.case(args),
            _ => {}
        }

        if is_binary(&op) {
            if args.len() != 2 {
                return Err(SqlError::arity(&op, 2, args.len()));
            }
            let glue = op_glue(&op);
            self.push("(");
            self.expr(&args[0])?;
            self.push(&glue);
            self.expr(&args[1])?;
            self.push(")");
            return Ok(());
        }

        if is_variadic(&op) {
            if args.is_empty() {
                return Err(SqlError::arity_msg(&op, "at least 1", 0));
            }
            let glue = op_glue(&op);
            self.push("(");
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    self.push(&glue);
                }
                self.expr(arg)?;
            }
            self.push(")");
            return Ok(());
        }

        // Anything else is a plain SQL function call.
        let is_name = op
            .chars()
            .enumerate()
            .all(|(i, c)| c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit()));
        if !is_name {
            return Err(SqlError::malformed(format!(
                "operator form must start with a function or operator name, got {name:?}"
            )));
        }
        self.push(format!("{op}("));
        self.comma_list(args)?;
        self.push(")");
        Ok(())
    }

    fn in_list(&mut self, op: &str, args: &[Expr]) -> SqlResult<()> {
        if args.len() != 2 {
            return Err(SqlError::arity(op, 2, args.len()));
        }
        // `IN ()` is invalid in both dialects.
        let empty = match &args[1] {
            Expr::List(items) => items.is_empty(),
            Expr::Param(p) => matches!(&p.value, Value::Array(items) if items.is_empty()),
            _ => false,
        };
        if empty {
            return Err(SqlError::malformed(format!("{op} list must not be empty")));
        }
        self.expr(&args[0])?;
        self.push(format!(" {op} "));
        match &args[1] {
            Expr::List(items) => {
                self.push("(");
                self.comma_list(items)?;
                self.push(")");
                Ok(())
            }
            Expr::Param(p) if p.value.is_array() => {
                self.push("(");
                self.param(p)?;
                self.push(")");
                Ok(())
            }
            Expr::Subquery(sub) => {
                self.push("(");
                self.splice(sub);
                self.push(")");
                Ok(())
            }
            other => Err(SqlError::malformed(format!(
                "{op} operand 2 must be an array or a parameter wrapping an array, got {}",
                value_kind(other)
            ))),
        }
    }

    fn case(&mut self, args: &[Expr]) -> SqlResult<()> {
        if args.is_empty() {
            return Err(SqlError::arity_msg("CASE", "at least 1", 0));
        }
        if !args
            .iter()
            .any(|a| matches!(a, Expr::List(pair) if pair.len() == 2))
        {
            return Err(SqlError::malformed(
                "CASE requires at least one [condition, result] pair",
            ));
        }
        self.push("CASE");
        let last = args.len() - 1;
        for (i, arg) in args.iter().enumerate() {
            match arg {
                Expr::List(pair) if pair.len() == 2 => {
                    self.push(" WHEN ");
                    self.expr(&pair[0])?;
                    self.push(" THEN ");
                    self.expr(&pair[1])?;
                }
                // A single-element branch is the implicit subject when it
                // leads, the ELSE when it trails.
                Expr::List(single) if single.len() == 1 && i == 0 && args.len() > 1 => {
                    self.push(" ");
                    self.expr(&single[0])?;
                }
                // An ELSE needs at least one WHEN branch before it.
                Expr::List(single) if single.len() == 1 && i == last && args.len() > 1 => {
                    self.push(" ELSE ");
                    self.expr(&single[0])?;
                }
                other => {
                    return Err(SqlError::malformed(format!(
                        "CASE branch must be a [condition, result] pair or a single-element \
                         leading subject / trailing ELSE, got {}",
                        value_kind(other)
                    )));
                }
            }
        }
        self.push(" END");
        Ok(())
    }

    // ==================== conjunctive form ====================

    fn cond(&mut self, pairs: &[(String, Field)]) -> SqlResult<()> {
        for (i, (column, field)) in pairs.iter().enumerate() {
            if i > 0 {
                self.push(" AND ");
            }
            match field {
                Field::Value(Value::Null) => {
                    self.push_ident(column);
                    self.push(" IS NULL");
                }
                Field::Value(v) => {
                    self.push_ident(column);
                    self.push("=");
                    self.literal(v)?;
                }
                Field::Param(p) => {
                    self.push_ident(column);
                    self.push("=");
                    self.param(p)?;
                }
                Field::Op(op, rest) => {
                    let mut args = Vec::with_capacity(rest.len() + 1);
                    args.push(Expr::Column(column.clone()));
                    args.extend(rest.iter().cloned());
                    self.call(op, &args)?;
                }
                Field::Regex(rx) => {
                    let col_sql = escape_ident(self.cfg, column);
                    let sql = pattern::match_condition(self.dialect(), &col_sql, rx);
                    self.push(sql);
                }
            }
        }
        Ok(())
    }

    // ==================== parameters & literals ====================

    fn param(&mut self, p: &Param) -> SqlResult<()> {
        if let Some(cast) = &p.cast {
            if cast.eq_ignore_ascii_case("unixtime") {
                return self.unixtime_param(&p.value);
            }
        }

        if let Value::Array(items) = &p.value {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    self.push(",");
                }
                self.param(&Param {
                    value: item.clone(),
                    cast: p.cast.clone(),
                })?;
            }
            return Ok(());
        }

        match &p.cast {
            None => self.stmt.push_param(p.clone()),
            Some(ty) => {
                check_type_name(ty)?;
                match self.dialect() {
                    Dialect::Postgres => {
                        self.stmt.push_param(Param::new(p.value.clone()));
                        self.push(format!("::{ty}"));
                    }
                    Dialect::MySql => {
                        self.push("CAST(");
                        self.stmt.push_param(Param::new(p.value.clone()));
                        self.push(format!(" AS {ty})"));
                    }
                }
            }
        }
        Ok(())
    }

    fn unixtime_param(&mut self, value: &Value) -> SqlResult<()> {
        match value {
            Value::String(s) if s.eq_ignore_ascii_case("now") => {
                self.push(match self.dialect() {
                    Dialect::Postgres => "now()",
                    Dialect::MySql => "NOW()",
                });
                Ok(())
            }
            Value::Number(_) => {
                self.push(match self.dialect() {
                    Dialect::Postgres => "to_timestamp(",
                    Dialect::MySql => "FROM_UNIXTIME(",
                });
                self.stmt.push_param(Param::new(value.clone()));
                self.push(")");
                Ok(())
            }
            other => Err(SqlError::unsupported(format!(
                "unixtime parameter must be an epoch number or \"now\", got {other}"
            ))),
        }
    }

    fn literal(&mut self, value: &Value) -> SqlResult<()> {
        match value {
            Value::Null => self.push("NULL"),
            Value::Bool(b) => self.push(self.dialect().bool_literal(*b)),
            Value::Number(n) => self.push(n.to_string()),
            Value::String(s) => {
                let lit = escape_string(self.dialect(), s);
                self.push(lit);
            }
            Value::Array(_) | Value::Object(_) => {
                return Err(SqlError::unsupported(format!(
                    "no SQL encoding for inline value: {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Cond;
    use crate::pattern::SqlRegex;
    use serde_json::json;

    fn pg() -> QueryConfig {
        QueryConfig::new(Dialect::Postgres)
    }

    fn my() -> QueryConfig {
        QueryConfig::new(Dialect::MySql)
    }

    fn compile(cfg: &QueryConfig, e: &Expr) -> SqlResult<Statement> {
        let mut c = Compiler::new(cfg);
        c.expr(e)?;
        Ok(c.finish())
    }

    fn sql(cfg: &QueryConfig, e: &Expr) -> String {
        compile(cfg, e).unwrap().sql()
    }

    #[test]
    fn binary_operator() {
        let e = Expr::eq(Expr::col("age"), Expr::param(18));
        assert_eq!(sql(&pg(), &e), "(\"age\"=$1)");
        assert_eq!(sql(&my(), &e), "(`age`=?)");
    }

    #[test]
    fn binary_arity_error_names_operator() {
        let e = Expr::call("=", vec![Expr::col("a")]);
        match compile(&pg(), &e) {
            Err(SqlError::Arity { op, expected, actual }) => {
                assert_eq!(op, "=");
                assert_eq!(expected, "2");
                assert_eq!(actual, 1);
            }
            other => panic!("expected arity error, got {other:?}"),
        }
    }

    #[test]
    fn variadic_and_joins_all_operands() {
        let e = Expr::and(vec![
            Expr::eq(Expr::col("a"), Expr::param(1)),
            Expr::eq(Expr::col("b"), Expr::param(2)),
            Expr::eq(Expr::col("c"), Expr::param(3)),
        ]);
        assert_eq!(sql(&pg(), &e), "((\"a\"=$1) AND (\"b\"=$2) AND (\"c\"=$3))");
    }

    #[test]
    fn unary_minus_and_exists() {
        assert_eq!(sql(&pg(), &Expr::call("-", vec![Expr::col("x")])), "-\"x\"");
        let e = Expr::call("-", vec![Expr::col("x"), Expr::col("y")]);
        assert_eq!(sql(&pg(), &e), "(\"x\"-\"y\")");
    }

    #[test]
    fn conjunctive_equals_operator_form() {
        // {a: x, b: y} compiles to the same condition as explicit AND of
        // equalities, modulo the generic path's parentheses.
        let cond = Cond::new()
            .param("a", Param::new(1))
            .param("b", Param::new(2))
            .build();
        let stmt = compile(&pg(), &cond).unwrap();
        assert_eq!(stmt.sql(), "\"a\"=$1 AND \"b\"=$2");
        assert_eq!(stmt.params(), vec![json!(1), json!(2)]);
    }

    #[test]
    fn conjunctive_literal_is_inlined_not_bound() {
        let cond = Cond::new().value("name", "admin'--").build();
        let stmt = compile(&pg(), &cond).unwrap();
        assert_eq!(stmt.sql(), "\"name\"='admin''--'");
        assert!(stmt.params().is_empty());
    }

    #[test]
    fn conjunctive_null_and_nested_op() {
        let cond = Cond::new()
            .null("deleted_at")
            .op("age", ">", vec![Expr::param(18)])
            .build();
        assert_eq!(
            sql(&pg(), &cond),
            "\"deleted_at\" IS NULL AND (\"age\">$1)"
        );
    }

    #[test]
    fn conjunctive_regex_delegates_to_pattern_translator() {
        let cond = Cond::new()
            .matches("name", SqlRegex::new("^adm"))
            .build();
        assert_eq!(sql(&pg(), &cond), "\"name\" LIKE 'adm%'");
    }

    #[test]
    fn in_with_list_and_param_array() {
        let e = Expr::call(
            "IN",
            vec![
                Expr::col("id"),
                Expr::list(vec![Expr::param(1), Expr::param(2), Expr::param(3)]),
            ],
        );
        let stmt = compile(&pg(), &e).unwrap();
        assert_eq!(stmt.sql(), "\"id\" IN ($1,$2,$3)");
        assert_eq!(stmt.params().len(), 3);

        let e = Expr::call(
            "NOT IN",
            vec![Expr::col("id"), Expr::Param(Param::new(json!([7, 8])))],
        );
        let stmt = compile(&my(), &e).unwrap();
        assert_eq!(stmt.sql(), "`id` NOT IN (?,?)");
        assert_eq!(stmt.params(), vec![json!(7), json!(8)]);
    }

    #[test]
    fn in_rejects_scalar_operand() {
        let e = Expr::call("IN", vec![Expr::col("id"), Expr::param(1)]);
        assert!(matches!(compile(&pg(), &e), Err(SqlError::Malformed(_))));
    }

    #[test]
    fn in_rejects_empty_lists() {
        let e = Expr::call("IN", vec![Expr::col("id"), Expr::list(vec![])]);
        assert!(matches!(compile(&pg(), &e), Err(SqlError::Malformed(_))));

        let e = Expr::call(
            "NOT IN",
            vec![Expr::col("id"), Expr::Param(Param::new(json!([])))],
        );
        assert!(matches!(compile(&my(), &e), Err(SqlError::Malformed(_))));
    }

    #[test]
    fn is_null_and_not() {
        let e = Expr::call("IS NULL", vec![Expr::col("a")]);
        assert_eq!(sql(&pg(), &e), "\"a\" IS NULL");
        let e = Expr::not(Expr::call("IS NOT NULL", vec![Expr::col("a")]));
        assert_eq!(sql(&pg(), &e), "NOT (\"a\" IS NOT NULL)");
    }

    #[test]
    fn between_takes_three_operands() {
        let e = Expr::call(
            "BETWEEN",
            vec![Expr::col("age"), Expr::param(18), Expr::param(65)],
        );
        assert_eq!(sql(&pg(), &e), "\"age\" BETWEEN $1 AND $2");
        let e = Expr::call("NOT BETWEEN", vec![Expr::col("age"), Expr::param(18)]);
        assert!(matches!(
            compile(&pg(), &e),
            Err(SqlError::Arity { actual: 2, .. })
        ));
    }

    #[test]
    fn type_prefix_checks_keyword() {
        let e = Expr::call("TYPE", vec![Expr::val("DISTINCT"), Expr::col("name")]);
        assert_eq!(sql(&pg(), &e), "DISTINCT \"name\"");
        let e = Expr::call("TYPE", vec![Expr::val("DROP; --"), Expr::col("name")]);
        assert!(matches!(compile(&pg(), &e), Err(SqlError::Malformed(_))));
    }

    #[test]
    fn cast_is_dialect_specific() {
        let e = Expr::call("CAST", vec![Expr::col("age"), Expr::val("text")]);
        assert_eq!(sql(&pg(), &e), "\"age\"::text");
        assert_eq!(sql(&my(), &e), "CAST(`age` AS text)");
    }

    #[test]
    fn extract_unit_from_expr() {
        let e = Expr::call("EXTRACT", vec![Expr::val("year"), Expr::col("born")]);
        assert_eq!(sql(&pg(), &e), "EXTRACT(year FROM \"born\")");
    }

    #[test]
    fn case_with_branches_subject_and_else() {
        let e = Expr::call(
            "CASE",
            vec![
                Expr::list(vec![
                    Expr::call(">", vec![Expr::col("age"), Expr::val(18)]),
                    Expr::val("adult"),
                ]),
                Expr::list(vec![Expr::val("minor")]),
            ],
        );
        assert_eq!(
            sql(&pg(), &e),
            "CASE WHEN (\"age\">18) THEN 'adult' ELSE 'minor' END"
        );

        let e = Expr::call(
            "CASE",
            vec![
                Expr::list(vec![Expr::col("kind")]),
                Expr::list(vec![Expr::val(1), Expr::val("one")]),
            ],
        );
        assert_eq!(sql(&pg(), &e), "CASE \"kind\" WHEN 1 THEN 'one' END");
    }

    #[test]
    fn case_rejects_malformed_branch() {
        let e = Expr::call("CASE", vec![Expr::val(1)]);
        assert!(matches!(compile(&pg(), &e), Err(SqlError::Malformed(_))));
    }

    #[test]
    fn case_requires_a_when_pair() {
        // A lone single-element branch has no WHEN to attach to.
        let e = Expr::call("CASE", vec![Expr::list(vec![Expr::val(1)])]);
        assert!(matches!(compile(&pg(), &e), Err(SqlError::Malformed(_))));

        // Subject plus ELSE without any WHEN pair is just as invalid.
        let e = Expr::call(
            "CASE",
            vec![
                Expr::list(vec![Expr::col("kind")]),
                Expr::list(vec![Expr::val("fallback")]),
            ],
        );
        assert!(matches!(compile(&pg(), &e), Err(SqlError::Malformed(_))));
    }

    #[test]
    fn unknown_name_compiles_as_function_call() {
        let e = Expr::call("lower", vec![Expr::col("name")]);
        assert_eq!(sql(&pg(), &e), "LOWER(\"name\")");
        let e = Expr::call("coalesce", vec![Expr::col("a"), Expr::val(0)]);
        assert_eq!(sql(&pg(), &e), "COALESCE(\"a\",0)");
    }

    #[test]
    fn garbage_operator_name_is_malformed() {
        let e = Expr::call("1; DROP TABLE", vec![]);
        assert!(matches!(compile(&pg(), &e), Err(SqlError::Malformed(_))));
    }

    #[test]
    fn typed_param_cast_forms() {
        let e = Expr::Param(Param::typed(5, "int"));
        assert_eq!(sql(&pg(), &e), "$1::int");
        assert_eq!(sql(&my(), &e), "CAST(? AS int)");
    }

    #[test]
    fn unixtime_param_forms() {
        let e = Expr::Param(Param::unixtime(1700000000));
        let stmt = compile(&pg(), &e).unwrap();
        assert_eq!(stmt.sql(), "to_timestamp($1)");
        assert_eq!(stmt.params(), vec![json!(1700000000)]);
        assert_eq!(sql(&my(), &e), "FROM_UNIXTIME(?)");

        let e = Expr::Param(Param::unixtime("NOW"));
        let stmt = compile(&pg(), &e).unwrap();
        assert_eq!(stmt.sql(), "now()");
        assert!(stmt.params().is_empty());
        assert_eq!(sql(&my(), &e), "NOW()");
    }

    #[test]
    fn unixtime_rejects_other_values() {
        let e = Expr::Param(Param::unixtime("tomorrow"));
        assert!(matches!(compile(&pg(), &e), Err(SqlError::Unsupported(_))));
    }

    #[test]
    fn literal_kinds() {
        assert_eq!(sql(&pg(), &Expr::val(true)), "'t'");
        assert_eq!(sql(&my(), &Expr::val(true)), "true");
        assert_eq!(sql(&pg(), &Expr::val(false)), "'f'");
        assert_eq!(sql(&pg(), &Expr::val(3.5)), "3.5");
        assert_eq!(sql(&pg(), &Expr::Value(Value::Null)), "NULL");
    }

    #[test]
    fn unsupported_literal_errors() {
        let e = Expr::Value(json!({"a": 1}));
        match compile(&pg(), &e) {
            Err(SqlError::Unsupported(msg)) => assert!(msg.contains("{\"a\":1}")),
            other => panic!("expected unsupported-value error, got {other:?}"),
        }
    }

    #[test]
    fn bare_pattern_compiles_to_translated_literal() {
        let e = Expr::pattern(SqlRegex::new("^abc"));
        assert_eq!(sql(&pg(), &e), "'abc%'");
    }

    #[test]
    fn placeholders_match_param_vector_order() {
        let e = Expr::and(vec![
            Expr::eq(Expr::col("a"), Expr::param("first")),
            Expr::call(
                "IN",
                vec![Expr::col("b"), Expr::Param(Param::new(json!([2, 3])))],
            ),
            Expr::eq(Expr::col("c"), Expr::param("last")),
        ]);
        let stmt = compile(&pg(), &e).unwrap();
        assert_eq!(
            stmt.sql(),
            "((\"a\"=$1) AND \"b\" IN ($2,$3) AND (\"c\"=$4))"
        );
        assert_eq!(
            stmt.params(),
            vec![json!("first"), json!(2), json!(3), json!("last")]
        );
        assert_eq!(stmt.param_count(), 4);
    }

    #[test]
    fn case_conversion_applies_to_conjunctive_keys() {
        let cfg = pg().with_convert_case(true);
        let cond = Cond::new().param("firstName", Param::new("x")).build();
        let stmt = compile(&cfg, &cond).unwrap();
        assert_eq!(stmt.sql(), "\"first_name\"=$1");
    }
}
