use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::compile::Compiler;
use crate::dialect::{Dialect, QueryConfig};
use crate::error::{SqlError, SqlResult};
use crate::expr::{Expr, Param};
use crate::qb::conflict::{render_conflict, OnConflict};
use crate::statement::Statement;

/// One cell of an insert or update row.
#[derive(Clone, Debug)]
pub enum Cell {
    /// A plain value, subject to the transform pipeline.
    Value(Value),
    /// An explicit parameter, passed through the pipeline unchanged.
    Param(Param),
    /// An arbitrary expression, compiled directly.
    Expr(Expr),
    /// The engine default, emitted as the DEFAULT keyword.
    Default,
}

/// An ordered column-to-cell row. Order is preserved: the first row's
/// key order decides the column list when none is set explicitly.
#[derive(Clone, Debug, Default)]
pub struct InsertRow {
    cells: Vec<(String, Cell)>,
}

impl InsertRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a plain value cell.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.cells.push((column.into(), Cell::Value(value.into())));
        self
    }

    /// Set an explicit parameter cell.
    pub fn set_param(mut self, column: impl Into<String>, param: Param) -> Self {
        self.cells.push((column.into(), Cell::Param(param)));
        self
    }

    /// Set an expression cell.
    pub fn set_expr(mut self, column: impl Into<String>, expr: impl Into<Expr>) -> Self {
        self.cells.push((column.into(), Cell::Expr(expr.into())));
        self
    }

    /// Set a cell to the engine default.
    pub fn set_default(mut self, column: impl Into<String>) -> Self {
        self.cells.push((column.into(), Cell::Default));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    /// The cell for a column, if present.
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, cell)| cell)
    }
}

/// A value transform: receives the plain value, the row index, the column
/// name, the owning row, and the full row set, and produces the expression
/// to compile in the value's place.
pub type TransformFn =
    Arc<dyn Fn(&Value, usize, &str, &InsertRow, &[InsertRow]) -> Expr + Send + Sync>;

/// Per-column transform override.
#[derive(Clone)]
pub enum ColumnTransform {
    /// Inline the value as a literal instead of parameterizing it.
    Disabled,
    /// Parameterize with an explicit type cast.
    Typed(String),
    /// Arbitrary transform.
    Func(TransformFn),
}

impl fmt::Debug for ColumnTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnTransform::Disabled => f.write_str("Disabled"),
            ColumnTransform::Typed(ty) => f.debug_tuple("Typed").field(ty).finish(),
            ColumnTransform::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// How plain values become SQL. The default parameterizes every plain
/// value; explicit parameters and expressions always bypass the pipeline.
#[derive(Clone, Default)]
pub enum Transform {
    /// Parameterize every plain value.
    #[default]
    Parameterize,
    /// Inline every plain value as a literal.
    Disabled,
    /// A single transform applied to every plain value.
    Global(TransformFn),
    /// Per-column overrides; unlisted columns parameterize.
    PerColumn(Vec<(String, ColumnTransform)>),
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Parameterize => f.write_str("Parameterize"),
            Transform::Disabled => f.write_str("Disabled"),
            Transform::Global(_) => f.write_str("Global(..)"),
            Transform::PerColumn(map) => f.debug_tuple("PerColumn").field(map).finish(),
        }
    }
}

/// Resolve one cell through the transform pipeline into an expression.
/// Returns `None` for the DEFAULT keyword, which has no expression form.
pub(crate) fn resolve_cell(
    transform: &Transform,
    column: &str,
    cell: &Cell,
    row_index: usize,
    row: &InsertRow,
    all: &[InsertRow],
) -> Option<Expr> {
    match cell {
        Cell::Default => None,
        Cell::Expr(e) => Some(e.clone()),
        Cell::Param(p) => Some(Expr::Param(p.clone())),
        Cell::Value(v) => Some(match transform {
            Transform::Parameterize => Expr::Param(Param::new(v.clone())),
            Transform::Disabled => Expr::Value(v.clone()),
            Transform::Global(f) => f(v, row_index, column, row, all),
            Transform::PerColumn(map) => {
                match map.iter().find(|(c, _)| c == column).map(|(_, t)| t) {
                    None => Expr::Param(Param::new(v.clone())),
                    Some(ColumnTransform::Disabled) => Expr::Value(v.clone()),
                    Some(ColumnTransform::Typed(ty)) => {
                        Expr::Param(Param::typed(v.clone(), ty.clone()))
                    }
                    Some(ColumnTransform::Func(f)) => f(v, row_index, column, row, all),
                }
            }
        }),
    }
}

/// Fluent INSERT builder.
#[derive(Clone, Debug, Default)]
pub struct InsertQuery {
    table: String,
    columns: Option<Vec<String>>,
    rows: Vec<InsertRow>,
    transform: Transform,
    unique: Option<Vec<String>>,
    conflict: Option<OnConflict>,
    returning: Option<String>,
}

impl InsertQuery {
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

    /// Set the column list explicitly. When absent the first row's key
    /// order is used.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Append one row.
    pub fn row(mut self, row: InsertRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Append many rows.
    pub fn rows(mut self, rows: impl IntoIterator<Item = InsertRow>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Append `count` rows of engine defaults.
    pub fn default_rows(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.rows.push(InsertRow::new());
        }
        self
    }

    /// Replace the transform pipeline.
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Declare the unique column set that conflict resolution targets.
    pub fn unique(mut self, columns: &[&str]) -> Self {
        self.unique = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Set the conflict policy.
    pub fn on_conflict(mut self, conflict: OnConflict) -> Self {
        self.conflict = Some(conflict);
        self
    }

    /// Request the generated id back, under the default column name.
    /// On the loose dialect this is a no-op; the driver reports the id
    /// out of band.
    pub fn returning_id(self) -> Self {
        self.returning_column("id")
    }

    /// Request a specific column back after the insert.
    pub fn returning_column(mut self, column: impl Into<String>) -> Self {
        self.returning = Some(column.into());
        self
    }

    /// Compile into a statement for the given configuration.
    pub fn build(&self, cfg: &QueryConfig) -> SqlResult<Statement> {
        if cfg.dialect == Dialect::Postgres
            && self.conflict.is_some() != self.unique.as_ref().is_some_and(|u| !u.is_empty())
        {
            return Err(SqlError::config(
                "conflict and unique must be specified together on this dialect",
            ));
        }

        let mut c = Compiler::new(cfg);
        c.push("INSERT ");
        if cfg.dialect == Dialect::MySql && matches!(self.conflict, Some(OnConflict::Ignore)) {
            c.push("IGNORE ");
        }
        c.push("INTO ");
        c.push_ident(&self.table);

        let columns: Vec<String> = match &self.columns {
            Some(columns) => columns.clone(),
            None => self
                .rows
                .first()
                .map(|row| row.columns().map(str::to_string).collect())
                .unwrap_or_default(),
        };

        if !columns.is_empty() {
            c.push("(");
            for (i, col) in columns.iter().enumerate() {
                if i > 0 {
                    c.push(",");
                }
                c.push_ident(col);
            }
            c.push(")");
        }

        if self.rows.is_empty() {
            // Zero-row idiom: a statement that inserts nothing but is
            // still valid against the table.
            c.push(" (SELECT NULL WHERE 1=0)");
        } else if columns.is_empty() {
            // Rows exist but carry no cells: all-defaults rows.
            c.push(" VALUES ");
            for (i, _) in self.rows.iter().enumerate() {
                if i > 0 {
                    c.push(",");
                }
                match cfg.dialect {
                    Dialect::Postgres => c.push("(DEFAULT)"),
                    Dialect::MySql => c.push("()"),
                }
            }
        } else {
            c.push(" VALUES ");
            for (i, row) in self.rows.iter().enumerate() {
                if i > 0 {
                    c.push(",");
                }
                c.push("(");
                for (j, col) in columns.iter().enumerate() {
                    if j > 0 {
                        c.push(",");
                    }
                    let resolved = row.get(col).and_then(|cell| {
                        resolve_cell(&self.transform, col, cell, i, row, &self.rows)
                    });
                    match resolved {
                        Some(e) => c.expr(&e)?,
                        None => c.push("DEFAULT"),
                    }
                }
                c.push(")");
            }
        }

        if let Some(conflict) = &self.conflict {
            render_conflict(&mut c, &self.table, self.unique.as_deref(), conflict)?;
        }

        if let Some(col) = &self.returning {
            if cfg.dialect.supports_returning() {
                c.push(" RETURNING ");
                c.push_ident(col);
            }
        }

        Ok(c.finish())
    }
}
