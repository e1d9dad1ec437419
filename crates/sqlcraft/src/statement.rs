//! The compiled-statement intermediate form.
//!
//! A statement is an ordered list of text chunks interleaved with parameter
//! slots. Placeholder numbering happens only when the final text is asked
//! for, which lets chunk lists be spliced into each other (subquery in a
//! FROM position, `IN (subquery)`) without renumbering anything in place.

use serde_json::Value;

use crate::dialect::Dialect;
use crate::expr::Param;

#[derive(Clone, Debug)]
pub(crate) enum Chunk {
    Sql(String),
    Param(Param),
}

/// A compiled SQL statement: text chunks plus the ordered parameter vector.
#[derive(Clone, Debug)]
pub struct Statement {
    dialect: Dialect,
    chunks: Vec<Chunk>,
}

impl Statement {
    pub(crate) fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            chunks: Vec::new(),
        }
    }

    /// The dialect this statement was compiled for.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub(crate) fn push_sql(&mut self, sql: impl AsRef<str>) {
        // Extend the previous text chunk instead of accumulating tiny ones.
        if let Some(Chunk::Sql(last)) = self.chunks.last_mut() {
            last.push_str(sql.as_ref());
        } else {
            self.chunks.push(Chunk::Sql(sql.as_ref().to_string()));
        }
    }

    pub(crate) fn push_param(&mut self, param: Param) {
        self.chunks.push(Chunk::Param(param));
    }

    /// Append another statement's chunks, keeping its parameter slots in
    /// order. Numbering is recomputed when `sql()` is called.
    pub(crate) fn splice(&mut self, other: &Statement) {
        for chunk in &other.chunks {
            match chunk {
                Chunk::Sql(s) => self.push_sql(s),
                Chunk::Param(p) => self.push_param(p.clone()),
            }
        }
    }

    pub(crate) fn prepend_sql(&mut self, sql: &str) {
        self.chunks.insert(0, Chunk::Sql(sql.to_string()));
    }

    /// Materialize the final SQL text, numbering placeholders per dialect.
    pub fn sql(&self) -> String {
        let mut out = String::new();
        let mut index = 0usize;
        for chunk in &self.chunks {
            match chunk {
                Chunk::Sql(s) => out.push_str(s),
                Chunk::Param(_) => {
                    index += 1;
                    if self.dialect.indexed_placeholders() {
                        out.push('$');
                        out.push_str(&index.to_string());
                    } else {
                        out.push('?');
                    }
                }
            }
        }
        out
    }

    /// Realize the ordered parameter vector.
    pub fn params(&self) -> Vec<Value> {
        self.chunks
            .iter()
            .filter_map(|chunk| match chunk {
                Chunk::Param(p) => Some(p.value().clone()),
                Chunk::Sql(_) => None,
            })
            .collect()
    }

    /// Number of parameter slots.
    pub fn param_count(&self) -> usize {
        self.chunks
            .iter()
            .filter(|c| matches!(c, Chunk::Param(_)))
            .count()
    }

    /// Produce an `EXPLAIN [(opt, ...)] <statement>` variant.
    pub fn explain(&self, options: &[&str]) -> Statement {
        let mut out = self.clone();
        if options.is_empty() {
            out.prepend_sql("EXPLAIN ");
        } else {
            out.prepend_sql(&format!("EXPLAIN ({}) ", options.join(", ")));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn placeholder_numbering_per_dialect() {
        let mut pg = Statement::new(Dialect::Postgres);
        pg.push_sql("SELECT ");
        pg.push_param(Param::new(1));
        pg.push_sql(", ");
        pg.push_param(Param::new(2));

        assert_eq!(pg.sql(), "SELECT $1, $2");
        assert_eq!(pg.params(), vec![json!(1), json!(2)]);

        let mut my = Statement::new(Dialect::MySql);
        my.push_sql("SELECT ");
        my.push_param(Param::new(1));
        my.push_sql(", ");
        my.push_param(Param::new(2));

        assert_eq!(my.sql(), "SELECT ?, ?");
        assert_eq!(my.params(), vec![json!(1), json!(2)]);
    }

    #[test]
    fn splice_renumbers_on_demand() {
        let mut inner = Statement::new(Dialect::Postgres);
        inner.push_sql("SELECT x WHERE y = ");
        inner.push_param(Param::new("v"));

        let mut outer = Statement::new(Dialect::Postgres);
        outer.push_sql("SELECT a WHERE b = ");
        outer.push_param(Param::new("w"));
        outer.push_sql(" AND c IN (");
        outer.splice(&inner);
        outer.push_sql(")");

        assert_eq!(
            outer.sql(),
            "SELECT a WHERE b = $1 AND c IN (SELECT x WHERE y = $2)"
        );
        assert_eq!(outer.params(), vec![json!("w"), json!("v")]);
    }

    #[test]
    fn explain_variants() {
        let mut stmt = Statement::new(Dialect::Postgres);
        stmt.push_sql("SELECT 1");
        assert_eq!(stmt.explain(&[]).sql(), "EXPLAIN SELECT 1");
        assert_eq!(
            stmt.explain(&["ANALYZE", "VERBOSE"]).sql(),
            "EXPLAIN (ANALYZE, VERBOSE) SELECT 1"
        );
        // Derived statements share the original slots.
        assert_eq!(stmt.explain(&[]).params(), stmt.params());
    }
}
