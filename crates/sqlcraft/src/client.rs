use std::future::Future;

use serde_json::Value;

use crate::error::SqlResult;
use crate::row::Row;

/// The execution collaborator: anything that can run compiled SQL with
/// its positional parameters.
///
/// Implementations must normalize driver result shapes to a row list;
/// a scalar or single-row result becomes a one-element vector. Failures
/// surface as [`SqlError::Execution`](crate::SqlError::Execution) and
/// are never retried here.
pub trait Executor: Send + Sync {
    /// Run a statement that produces rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = SqlResult<Vec<Row>>> + Send;

    /// Run a statement for its side effect, returning the affected count.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = SqlResult<u64>> + Send;
}

impl<E: Executor> Executor for &E {
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = SqlResult<Vec<Row>>> + Send {
        (**self).query(sql, params)
    }

    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = SqlResult<u64>> + Send {
        (**self).execute(sql, params)
    }
}

/// A source of dedicated connections, used by the transaction helper to
/// pin every statement of a unit of work to one connection.
pub trait Pool: Send + Sync {
    type Conn: Executor + Send;

    fn acquire(&self) -> impl Future<Output = SqlResult<Self::Conn>> + Send;

    fn release(&self, conn: Self::Conn) -> impl Future<Output = SqlResult<()>> + Send;
}
