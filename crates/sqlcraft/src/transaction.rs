use std::future::Future;
use std::pin::Pin;

use crate::client::{Executor, Pool};
use crate::dialect::QueryConfig;
use crate::error::{SqlError, SqlResult};
use crate::table::Database;

/// The unit-of-work callback: receives a database pinned to one pooled
/// connection and returns a boxed future.
pub type TxWork<'a, T> =
    Pin<Box<dyn Future<Output = SqlResult<T>> + Send + 'a>>;

/// Run `work` inside a transaction on a dedicated pooled connection.
///
/// BEGIN precedes the callback; a successful callback commits, a failing
/// one rolls back and propagates its own error. The connection goes back
/// to the pool on every exit path. A rollback failure is folded into the
/// reported error rather than masking the original.
pub async fn transaction<P, T, F>(pool: &P, cfg: QueryConfig, work: F) -> SqlResult<T>
where
    P: Pool,
    F: for<'a> FnOnce(&'a Database<P::Conn>) -> TxWork<'a, T>,
{
    let conn = pool.acquire().await?;
    let db = Database::new(conn, cfg);

    let result = run_in_tx(&db, work).await;

    let released = pool.release(db.into_executor()).await;
    match (result, released) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(release_err)) => Err(release_err),
        (Err(err), _) => Err(err),
    }
}

async fn run_in_tx<E, T, F>(db: &Database<E>, work: F) -> SqlResult<T>
where
    E: Executor,
    F: for<'a> FnOnce(&'a Database<E>) -> TxWork<'a, T>,
{
    db.executor().execute("BEGIN", &[]).await?;
    match work(db).await {
        Ok(value) => {
            db.executor().execute("COMMIT", &[]).await?;
            Ok(value)
        }
        Err(err) => {
            tracing::warn!(error = %err, "rolling back transaction");
            match db.executor().execute("ROLLBACK", &[]).await {
                Ok(_) => Err(err),
                Err(rollback_err) => Err(SqlError::execution(format!(
                    "{err} (rollback failed: {rollback_err})"
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    use serde_json::Value;

    use super::*;
    use crate::row::Row;

    #[derive(Clone, Default)]
    struct Log {
        statements: Arc<Mutex<Vec<String>>>,
        releases: Arc<Mutex<usize>>,
    }

    struct MockConn {
        log: Log,
        fail_on: Option<&'static str>,
    }

    impl Executor for MockConn {
        fn query(
            &self,
            sql: &str,
            _params: &[Value],
        ) -> impl Future<Output = SqlResult<Vec<Row>>> + Send {
            self.log.statements.lock().unwrap().push(sql.to_string());
            async { Ok(Vec::new()) }
        }

        fn execute(
            &self,
            sql: &str,
            _params: &[Value],
        ) -> impl Future<Output = SqlResult<u64>> + Send {
            self.log.statements.lock().unwrap().push(sql.to_string());
            let fail = self.fail_on.is_some_and(|f| sql.starts_with(f));
            async move {
                if fail {
                    Err(SqlError::execution("forced failure"))
                } else {
                    Ok(1)
                }
            }
        }
    }

    struct MockPool {
        log: Log,
        fail_on: Option<&'static str>,
    }

    impl Pool for MockPool {
        type Conn = MockConn;

        fn acquire(&self) -> impl Future<Output = SqlResult<MockConn>> + Send {
            let conn = MockConn {
                log: self.log.clone(),
                fail_on: self.fail_on,
            };
            async move { Ok(conn) }
        }

        fn release(&self, _conn: MockConn) -> impl Future<Output = SqlResult<()>> + Send {
            *self.log.releases.lock().unwrap() += 1;
            async { Ok(()) }
        }
    }

    #[tokio::test]
    async fn commits_on_success() {
        let log = Log::default();
        let pool = MockPool {
            log: log.clone(),
            fail_on: None,
        };
        let out = transaction(&pool, QueryConfig::default(), |db| {
            Box::pin(async move {
                db.executor().execute("INSERT INTO t VALUES (1)", &[]).await?;
                Ok(42)
            })
        })
        .await
        .unwrap();
        assert_eq!(out, 42);
        assert_eq!(
            *log.statements.lock().unwrap(),
            vec!["BEGIN", "INSERT INTO t VALUES (1)", "COMMIT"]
        );
        assert_eq!(*log.releases.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn rolls_back_and_propagates_callback_error() {
        let log = Log::default();
        let pool = MockPool {
            log: log.clone(),
            fail_on: None,
        };
        let err = transaction::<_, (), _>(&pool, QueryConfig::default(), |db| {
            Box::pin(async move {
                db.executor().execute("UPDATE t SET x=1", &[]).await?;
                Err(SqlError::execution("business rule violated"))
            })
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("business rule violated"));
        assert_eq!(
            *log.statements.lock().unwrap(),
            vec!["BEGIN", "UPDATE t SET x=1", "ROLLBACK"]
        );
        assert_eq!(*log.releases.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn statement_failure_rolls_back() {
        let log = Log::default();
        let pool = MockPool {
            log: log.clone(),
            fail_on: Some("UPDATE"),
        };
        let err = transaction::<_, (), _>(&pool, QueryConfig::default(), |db| {
            Box::pin(async move {
                db.executor().execute("UPDATE t SET x=1", &[]).await?;
                Ok(())
            })
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("forced failure"));
        let statements = log.statements.lock().unwrap();
        assert_eq!(statements.last().map(String::as_str), Some("ROLLBACK"));
        assert_eq!(*log.releases.lock().unwrap(), 1);
    }
}
