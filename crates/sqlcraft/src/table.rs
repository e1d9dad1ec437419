use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::client::Executor;
use crate::dialect::QueryConfig;
use crate::error::SqlResult;
use crate::mapper::{self, KeyOf, RowShape};
use crate::qb::{DeleteQuery, InsertQuery, SelectQuery, TableRef, UpdateQuery};
use crate::row::{self, Row};
use crate::statement::Statement;

/// An executor paired with a query configuration. The entry point for
/// running builders and raw statements.
#[derive(Debug)]
pub struct Database<E: Executor> {
    executor: E,
    cfg: QueryConfig,
}

impl<E: Executor> Database<E> {
    pub fn new(executor: E, cfg: QueryConfig) -> Self {
        Self { executor, cfg }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.cfg
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub(crate) fn into_executor(self) -> E {
        self.executor
    }

    /// A facade over one named table.
    pub fn table(&self, name: impl Into<String>) -> Table<'_, E> {
        Table {
            db: self,
            name: name.into(),
        }
    }

    /// Wrap an already-compiled statement in a lazy handle.
    pub fn handle(&self, stmt: Statement) -> QueryHandle<'_, E> {
        QueryHandle { db: self, stmt }
    }

    /// Compile a SELECT against this configuration and wrap it.
    pub fn select(&self, query: &SelectQuery) -> SqlResult<QueryHandle<'_, E>> {
        Ok(self.handle(query.build(&self.cfg)?))
    }

    pub fn insert(&self, query: &InsertQuery) -> SqlResult<QueryHandle<'_, E>> {
        Ok(self.handle(query.build(&self.cfg)?))
    }

    pub fn update(&self, query: &UpdateQuery) -> SqlResult<QueryHandle<'_, E>> {
        Ok(self.handle(query.build(&self.cfg)?))
    }

    pub fn delete(&self, query: &DeleteQuery) -> SqlResult<QueryHandle<'_, E>> {
        Ok(self.handle(query.build(&self.cfg)?))
    }
}

/// A named table bound to a database. Builder factories here pin the
/// table name so call sites only supply clauses.
pub struct Table<'a, E: Executor> {
    db: &'a Database<E>,
    name: String,
}

impl<'a, E: Executor> Table<'a, E> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compile a SELECT with this table as the FROM target. A query that
    /// already carries tables gets this one prepended.
    pub fn select(&self, query: SelectQuery) -> SqlResult<QueryHandle<'a, E>> {
        let query = if query.has_table() {
            query.table_first(TableRef::name(&self.name))
        } else {
            query.table(TableRef::name(&self.name))
        };
        self.db.select(&query)
    }

    pub fn insert(&self, query: InsertQuery) -> SqlResult<QueryHandle<'a, E>> {
        self.db.insert(&query.into_table(&self.name))
    }

    pub fn update(&self, query: UpdateQuery) -> SqlResult<QueryHandle<'a, E>> {
        self.db.update(&query.into_table(&self.name))
    }

    pub fn delete(&self, query: DeleteQuery) -> SqlResult<QueryHandle<'a, E>> {
        self.db.delete(&query.into_table(&self.name))
    }
}

/// A compiled statement bound to a database, executed lazily. Nothing
/// runs until a fetch method is called, and every call re-executes.
pub struct QueryHandle<'a, E: Executor> {
    db: &'a Database<E>,
    stmt: Statement,
}

impl<'a, E: Executor> QueryHandle<'a, E> {
    /// The rendered SQL text.
    pub fn sql(&self) -> String {
        self.stmt.sql()
    }

    /// The positional parameters, in placeholder order.
    pub fn params(&self) -> Vec<Value> {
        self.stmt.params()
    }

    /// The underlying statement.
    pub fn statement(&self) -> &Statement {
        &self.stmt
    }

    /// A new handle with the statement wrapped in EXPLAIN.
    pub fn explain(&self, options: &[&str]) -> QueryHandle<'a, E> {
        QueryHandle {
            db: self.db,
            stmt: self.stmt.explain(options),
        }
    }

    /// Execute and return the raw rows, key-converted when the
    /// configuration asks for it.
    pub async fn fetch(&self) -> SqlResult<Vec<Row>> {
        let sql = self.stmt.sql();
        let params = self.stmt.params();
        tracing::debug!(sql = %sql, params = params.len(), "executing query");
        let rows = self.db.executor.query(&sql, &params).await?;
        if self.db.cfg.convert_case {
            Ok(rows.into_iter().map(row::camelize_keys).collect())
        } else {
            Ok(rows)
        }
    }

    /// Execute for the side effect, returning the affected row count.
    pub async fn execute(&self) -> SqlResult<u64> {
        let sql = self.stmt.sql();
        let params = self.stmt.params();
        tracing::debug!(sql = %sql, params = params.len(), "executing statement");
        self.db.executor.execute(&sql, &params).await
    }

    /// All rows, shaped.
    pub async fn to_array(&self, shape: Option<&RowShape>) -> SqlResult<Vec<Value>> {
        Ok(mapper::to_array(&self.fetch().await?, shape))
    }

    /// The first row, shaped, or `None`.
    pub async fn to_row(&self, shape: Option<&RowShape>) -> SqlResult<Option<Value>> {
        Ok(mapper::to_row(&self.fetch().await?, shape))
    }

    /// A keyed object of shaped rows.
    pub async fn to_object(
        &self,
        key: &KeyOf,
        shape: Option<&RowShape>,
    ) -> SqlResult<Map<String, Value>> {
        Ok(mapper::to_object(&self.fetch().await?, key, shape))
    }

    /// A grouped map of shaped rows.
    pub async fn to_map_array(
        &self,
        key: &KeyOf,
        shape: Option<&RowShape>,
    ) -> SqlResult<HashMap<String, Vec<Value>>> {
        Ok(mapper::to_map_array(&self.fetch().await?, key, shape))
    }

    /// Distinct shaped values in first-occurrence order.
    pub async fn to_set(&self, shape: Option<&RowShape>) -> SqlResult<Vec<Value>> {
        Ok(mapper::to_set(&self.fetch().await?, shape))
    }

    /// All rows decoded into `T`.
    pub async fn fetch_as<T: DeserializeOwned>(&self) -> SqlResult<Vec<T>> {
        row::decode_rows(&self.fetch().await?)
    }
}
