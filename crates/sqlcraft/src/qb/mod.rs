//! Statement builders for the four statement shapes.
//!
//! Each builder is a fluent, consuming value that compiles into a
//! [`Statement`](crate::Statement) via `build(&QueryConfig)`. Compilation is
//! synchronous and side-effect free: builders can be cloned, rebuilt against
//! different configurations, and spliced into each other as subqueries.
//!
//! ```ignore
//! use sqlcraft::qb;
//!
//! let stmt = qb::select("users")
//!     .filter(Cond::new().param("status", Param::new("active")).build())
//!     .order_by("created_at")
//!     .limit(10)
//!     .build(&cfg)?;
//! ```

mod conflict;
mod delete;
mod insert;
mod select;
mod update;

pub use conflict::{ConflictRule, OnConflict};
pub use delete::DeleteQuery;
pub use insert::{Cell, ColumnTransform, InsertQuery, InsertRow, Transform, TransformFn};
pub use select::{Distinct, FieldDef, FieldSpec, SelectQuery};
pub use update::UpdateQuery;

use crate::compile::Compiler;
use crate::error::SqlResult;
use crate::expr::Expr;
use crate::statement::Statement;

/// Join kind for a table-list entry. Defaults to LEFT when omitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Left,
    Right,
    Inner,
    Full,
    Cross,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// A table position: a named table or an embedded sub-statement.
#[derive(Clone, Debug)]
pub enum TableSource {
    Name(String),
    Subquery(Statement),
}

/// One entry of a table/join list.
#[derive(Clone, Debug)]
pub struct TableRef {
    source: TableSource,
    alias: Option<String>,
    join: Option<JoinKind>,
    on: Option<Expr>,
}

impl TableRef {
    /// A named table.
    pub fn name(table: impl Into<String>) -> Self {
        Self {
            source: TableSource::Name(table.into()),
            alias: None,
            join: None,
            on: None,
        }
    }

    /// A subquery table position, spliced in parenthesized.
    pub fn subquery(stmt: Statement) -> Self {
        Self {
            source: TableSource::Subquery(stmt),
            alias: None,
            join: None,
            on: None,
        }
    }

    /// Attach an alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set an explicit join kind.
    pub fn join(mut self, kind: JoinKind) -> Self {
        self.join = Some(kind);
        self
    }

    /// Attach an ON condition.
    pub fn on(mut self, condition: impl Into<Expr>) -> Self {
        self.on = Some(condition.into());
        self
    }
}

/// Render a table list: the first entry carries no join keyword, later
/// entries default to LEFT JOIN.
pub(crate) fn render_tables(c: &mut Compiler<'_>, tables: &[TableRef]) -> SqlResult<()> {
    for (i, t) in tables.iter().enumerate() {
        if i > 0 {
            let kind = t.join.unwrap_or(JoinKind::Left);
            c.push(format!(" {} ", kind.keyword()));
        }
        match &t.source {
            TableSource::Name(name) => c.push_ident(name),
            TableSource::Subquery(sub) => {
                c.push("(");
                c.splice(sub);
                c.push(")");
            }
        }
        if let Some(alias) = &t.alias {
            c.push(" AS ");
            c.push_ident(alias);
        }
        if let Some(on) = &t.on {
            c.push(" ON ");
            c.expr(on)?;
        }
    }
    Ok(())
}

/// Shared WHERE/HAVING renderer: absent conditions render to nothing,
/// multiple conditions are AND-joined.
pub(crate) fn render_condition(
    c: &mut Compiler<'_>,
    keyword: &str,
    conditions: &[Expr],
) -> SqlResult<()> {
    if conditions.is_empty() {
        return Ok(());
    }
    c.push(format!(" {keyword} "));
    for (i, cond) in conditions.iter().enumerate() {
        if i > 0 {
            c.push(" AND ");
        }
        c.expr(cond)?;
    }
    Ok(())
}

/// Create a SELECT builder for the given table.
pub fn select(table: impl Into<String>) -> SelectQuery {
    SelectQuery::new().table(TableRef::name(table))
}

/// Create an INSERT builder for the given table.
pub fn insert(table: impl Into<String>) -> InsertQuery {
    InsertQuery::new(table)
}

/// Create an UPDATE builder for the given table.
pub fn update(table: impl Into<String>) -> UpdateQuery {
    UpdateQuery::new(table)
}

/// Create a DELETE builder for the given table.
pub fn delete(table: impl Into<String>) -> DeleteQuery {
    DeleteQuery::new(table)
}
