use crate::compile::Compiler;
use crate::dialect::QueryConfig;
use crate::error::SqlResult;
use crate::expr::Expr;
use crate::qb::{render_condition, render_tables, TableRef};
use crate::statement::Statement;

/// Output-field specification for a SELECT.
#[derive(Clone, Debug, Default)]
pub enum FieldSpec {
    /// `SELECT *`.
    #[default]
    All,
    /// A raw field list, emitted verbatim.
    Raw(String),
    /// A list of column names, each escaped.
    Columns(Vec<String>),
    /// Output name to definition pairs, rendered `expr AS "name"`.
    Aliased(Vec<(String, FieldDef)>),
}

/// Definition of one aliased output field.
#[derive(Clone, Debug)]
pub enum FieldDef {
    /// Pass the output name through as a plain column.
    Passthrough,
    /// An arbitrary expression.
    Expr(Expr),
}

/// DISTINCT flavor.
#[derive(Clone, Debug)]
pub enum Distinct {
    All,
    /// `DISTINCT ON (exprs)`, indexed dialect only in practice.
    On(Vec<Expr>),
}

/// Fluent SELECT builder.
///
/// Clause order is fixed at build time regardless of call order:
/// `SELECT [DISTINCT] fields [FROM tables] [WHERE] [GROUP BY] [HAVING]
/// [ORDER BY] [LIMIT] [OFFSET]`.
#[derive(Clone, Debug, Default)]
pub struct SelectQuery {
    tables: Vec<TableRef>,
    fields: FieldSpec,
    distinct: Option<Distinct>,
    filters: Vec<Expr>,
    group: Vec<String>,
    having: Vec<Expr>,
    order: Vec<(Expr, bool)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectQuery {
    /// A builder with no table list. `SELECT` without FROM is legal and
    /// useful for expression probes; a table is normally attached through
    /// [`table`](Self::table) or a [`Table`](crate::Table) facade.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a table/join entry. The first entry is the FROM target,
    /// later entries join with LEFT JOIN unless overridden.
    pub fn table(mut self, table: TableRef) -> Self {
        self.tables.push(table);
        self
    }

    pub(crate) fn has_table(&self) -> bool {
        !self.tables.is_empty()
    }

    pub(crate) fn table_first(mut self, table: TableRef) -> Self {
        self.tables.insert(0, table);
        self
    }

    /// Select the named columns, escaped.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.fields = FieldSpec::Columns(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Select a raw field list, emitted verbatim.
    pub fn raw_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = FieldSpec::Raw(fields.into());
        self
    }

    /// Add an aliased output field: `expr AS "name"`.
    pub fn field(mut self, name: impl Into<String>, def: impl Into<Expr>) -> Self {
        let entry = (name.into(), FieldDef::Expr(def.into()));
        match &mut self.fields {
            FieldSpec::Aliased(fields) => fields.push(entry),
            _ => self.fields = FieldSpec::Aliased(vec![entry]),
        }
        self
    }

    /// Add an output field whose name passes through as a plain column.
    pub fn field_passthrough(mut self, name: impl Into<String>) -> Self {
        let entry = (name.into(), FieldDef::Passthrough);
        match &mut self.fields {
            FieldSpec::Aliased(fields) => fields.push(entry),
            _ => self.fields = FieldSpec::Aliased(vec![entry]),
        }
        self
    }

    /// Replace the whole field specification.
    pub fn fields(mut self, spec: FieldSpec) -> Self {
        self.fields = spec;
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = Some(Distinct::All);
        self
    }

    pub fn distinct_on(mut self, exprs: Vec<Expr>) -> Self {
        self.distinct = Some(Distinct::On(exprs));
        self
    }

    /// Add a WHERE condition. Multiple calls AND together.
    pub fn filter(mut self, condition: impl Into<Expr>) -> Self {
        self.filters.push(condition.into());
        self
    }

    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.group.push(column.into());
        self
    }

    /// Add a HAVING condition. Multiple calls AND together.
    pub fn having(mut self, condition: impl Into<Expr>) -> Self {
        self.having.push(condition.into());
        self
    }

    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order.push((Expr::col(column), false));
        self
    }

    pub fn order_by_desc(mut self, column: impl Into<String>) -> Self {
        self.order.push((Expr::col(column), true));
        self
    }

    /// Order by an arbitrary expression.
    pub fn order_by_expr(mut self, expr: impl Into<Expr>, desc: bool) -> Self {
        self.order.push((expr.into(), desc));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Compile into a statement for the given configuration.
    pub fn build(&self, cfg: &QueryConfig) -> SqlResult<Statement> {
        let mut c = Compiler::new(cfg);
        c.push("SELECT ");
        match &self.distinct {
            Some(Distinct::All) => c.push("DISTINCT "),
            Some(Distinct::On(exprs)) => {
                c.push("DISTINCT ON (");
                for (i, e) in exprs.iter().enumerate() {
                    if i > 0 {
                        c.push(",");
                    }
                    c.expr(e)?;
                }
                c.push(") ");
            }
            None => {}
        }
        match &self.fields {
            FieldSpec::All => c.push("*"),
            FieldSpec::Raw(raw) => c.push(raw),
            FieldSpec::Columns(columns) => {
                for (i, col) in columns.iter().enumerate() {
                    if i > 0 {
                        c.push(",");
                    }
                    c.push_ident(col);
                }
            }
            FieldSpec::Aliased(fields) => {
                for (i, (name, def)) in fields.iter().enumerate() {
                    if i > 0 {
                        c.push(",");
                    }
                    match def {
                        FieldDef::Passthrough => c.push_ident(name),
                        FieldDef::Expr(e) => {
                            c.expr(e)?;
                            c.push(" AS ");
                            c.push_ident(name);
                        }
                    }
                }
            }
        }
        if !self.tables.is_empty() {
            c.push(" FROM ");
            render_tables(&mut c, &self.tables)?;
        }
        render_condition(&mut c, "WHERE", &self.filters)?;
        if !self.group.is_empty() {
            c.push(" GROUP BY ");
            for (i, col) in self.group.iter().enumerate() {
                if i > 0 {
                    c.push(",");
                }
                c.push_ident(col);
            }
        }
        render_condition(&mut c, "HAVING", &self.having)?;
        if !self.order.is_empty() {
            c.push(" ORDER BY ");
            for (i, (e, desc)) in self.order.iter().enumerate() {
                if i > 0 {
                    c.push(",");
                }
                c.expr(e)?;
                if *desc {
                    c.push(" DESC");
                }
            }
        }
        if let Some(limit) = self.limit {
            c.push(format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            c.push(format!(" OFFSET {offset}"));
        }
        Ok(c.finish())
    }
}
