use serde_json::Value;

use crate::compile::Compiler;
use crate::dialect::QueryConfig;
use crate::error::{SqlError, SqlResult};
use crate::expr::{Expr, Param};
use crate::qb::insert::{resolve_cell, InsertRow, Transform};
use crate::qb::render_condition;
use crate::statement::Statement;

/// Fluent UPDATE builder. The SET list runs through the same transform
/// pipeline as INSERT rows.
#[derive(Clone, Debug, Default)]
pub struct UpdateQuery {
    table: String,
    sets: InsertRow,
    transform: Transform,
    filters: Vec<Expr>,
    returning: Vec<String>,
}

impl UpdateQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Retarget the builder at another table.
    pub fn into_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set a column to a plain value.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.sets = self.sets.set(column, value);
        self
    }

    /// Set a column to an explicit parameter.
    pub fn set_param(mut self, column: impl Into<String>, param: Param) -> Self {
        self.sets = self.sets.set_param(column, param);
        self
    }

    /// Set a column to an expression.
    pub fn set_expr(mut self, column: impl Into<String>, expr: impl Into<Expr>) -> Self {
        self.sets = self.sets.set_expr(column, expr);
        self
    }

    /// Set a column to the engine default.
    pub fn set_default(mut self, column: impl Into<String>) -> Self {
        self.sets = self.sets.set_default(column);
        self
    }

    /// Replace the transform pipeline.
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Add a WHERE condition. Multiple calls AND together.
    pub fn filter(mut self, condition: impl Into<Expr>) -> Self {
        self.filters.push(condition.into());
        self
    }

    /// Return a column after the update, where the dialect supports it.
    pub fn returning(mut self, column: impl Into<String>) -> Self {
        self.returning.push(column.into());
        self
    }

    /// Compile into a statement for the given configuration.
    pub fn build(&self, cfg: &QueryConfig) -> SqlResult<Statement> {
        if self.sets.is_empty() {
            return Err(SqlError::config("UPDATE requires a non-empty SET list"));
        }
        let mut c = Compiler::new(cfg);
        c.push("UPDATE ");
        c.push_ident(&self.table);
        c.push(" SET ");
        let all = std::slice::from_ref(&self.sets);
        let columns: Vec<String> = self.sets.columns().map(str::to_string).collect();
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                c.push(",");
            }
            c.push_ident(col);
            c.push("=");
            let resolved = self.sets.get(col).and_then(|cell| {
                resolve_cell(&self.transform, col, cell, 0, &self.sets, all)
            });
            match resolved {
                Some(e) => c.expr(&e)?,
                None => c.push("DEFAULT"),
            }
        }
        render_condition(&mut c, "WHERE", &self.filters)?;
        if !self.returning.is_empty() && cfg.dialect.supports_returning() {
            c.push(" RETURNING ");
            for (i, col) in self.returning.iter().enumerate() {
                if i > 0 {
                    c.push(",");
                }
                c.push_ident(col);
            }
        }
        Ok(c.finish())
    }
}
