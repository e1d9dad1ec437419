use crate::compile::Compiler;
use crate::dialect::QueryConfig;
use crate::error::SqlResult;
use crate::expr::Expr;
use crate::qb::render_condition;
use crate::statement::Statement;

/// Fluent DELETE builder. An absent WHERE deletes every row; callers
/// that want a guard put one in the condition.
#[derive(Clone, Debug, Default)]
pub struct DeleteQuery {
    table: String,
    filters: Vec<Expr>,
}

impl DeleteQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
        }
    }

    /// Retarget the builder at another table.
    pub fn into_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Add a WHERE condition. Multiple calls AND together.
    pub fn filter(mut self, condition: impl Into<Expr>) -> Self {
        self.filters.push(condition.into());
        self
    }

    /// Compile into a statement for the given configuration.
    pub fn build(&self, cfg: &QueryConfig) -> SqlResult<Statement> {
        let mut c = Compiler::new(cfg);
        c.push("DELETE FROM ");
        c.push_ident(&self.table);
        render_condition(&mut c, "WHERE", &self.filters)?;
        Ok(c.finish())
    }
}
