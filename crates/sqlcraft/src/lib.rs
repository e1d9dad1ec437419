//! # sqlcraft
//!
//! A dual-dialect SQL statement compiler and lazy query runner.
//!
//! ## Features
//!
//! - **Two dialects, one API**: target Postgres (`$n`, double quotes) or
//!   MySQL (`?`, backticks) from the same builders
//! - **Everything is an expression**: operators, function calls, conjunctive
//!   conditions, subqueries, and regex patterns compose into one tree
//! - **Parameterized by default**: plain values become driver placeholders;
//!   inlining a literal is an explicit opt-out
//! - **Upsert translation**: one conflict-rule vocabulary compiles to
//!   `ON CONFLICT ... DO UPDATE` or `ON DUPLICATE KEY UPDATE`
//! - **Pattern portability**: simple regexes become LIKE, complex ones fall
//!   back to the dialect's native operator
//! - **Lazy execution**: compiled statements are inert values; nothing runs
//!   until a fetch method is called
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use sqlcraft::{qb, Cond, Param, QueryConfig};
//!
//! let cfg = QueryConfig::default();
//!
//! let stmt = qb::select("users")
//!     .columns(&["id", "name"])
//!     .filter(Cond::new().param("status", Param::new("active")).build())
//!     .order_by_desc("created_at")
//!     .limit(10)
//!     .build(&cfg)?;
//! assert_eq!(
//!     stmt.sql(),
//!     r#"SELECT "id","name" FROM "users" WHERE "status"=$1 ORDER BY "created_at" DESC LIMIT 10"#
//! );
//! ```
//!
//! ## Running statements
//!
//! Execution goes through the [`Executor`] trait; any driver that can run
//! SQL text with positional parameters plugs in:
//!
//! ```ignore
//! let db = Database::new(my_executor, QueryConfig::default());
//! let users = db.table("users");
//! let rows = users.select(SelectQuery::new())?.fetch().await?;
//! ```

mod client;
mod compile;
mod dialect;
mod error;
mod escape;
mod expr;
mod mapper;
mod pattern;
pub mod qb;
mod row;
mod statement;
mod table;
mod transaction;

pub use client::{Executor, Pool};
pub use dialect::{Dialect, QueryConfig};
pub use error::{SqlError, SqlResult};
pub use expr::{Cond, Expr, Field, Param};
pub use mapper::{to_array, to_map_array, to_object, to_row, to_set, KeyOf, RowShape};
pub use pattern::{translate, SqlRegex, Translated};
pub use row::{camelize_keys, decode_row, decode_rows, Row};
pub use statement::Statement;
pub use table::{Database, QueryHandle, Table};
pub use transaction::{transaction, TxWork};
