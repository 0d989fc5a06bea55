//! Execution backends for rendered statements.
//!
//! A [`Runner`] executes SQL with `$n`-style parameters already bound in
//! order. Single-row queries are an optional capability: runners that support
//! them return `Some(self)` from [`Runner::as_query_row`].

use crate::error::{MergeError, MergeResult};
use async_trait::async_trait;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A database connection or transaction that statements are delegated to.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Execute a statement and return the number of affected rows.
    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> MergeResult<u64>;

    /// Execute a statement and return all rows.
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> MergeResult<Vec<Row>>;

    /// The single-row capability of this runner, if it has one.
    ///
    /// The default implementation returns `None`.
    fn as_query_row(&self) -> Option<&dyn QueryRowRunner> {
        None
    }
}

/// Runners that can return at most one row.
#[async_trait]
pub trait QueryRowRunner: Runner {
    /// Execute a statement and return its first row, if any.
    async fn query_row(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> MergeResult<Option<Row>>;
}

#[async_trait]
impl Runner for tokio_postgres::Client {
    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> MergeResult<u64> {
        tokio_postgres::Client::execute(self, sql, params)
            .await
            .map_err(MergeError::from_db_error)
    }

    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> MergeResult<Vec<Row>> {
        tokio_postgres::Client::query(self, sql, params)
            .await
            .map_err(MergeError::from_db_error)
    }

    fn as_query_row(&self) -> Option<&dyn QueryRowRunner> {
        Some(self)
    }
}

#[async_trait]
impl QueryRowRunner for tokio_postgres::Client {
    async fn query_row(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> MergeResult<Option<Row>> {
        tokio_postgres::Client::query_opt(self, sql, params)
            .await
            .map_err(MergeError::from_db_error)
    }
}
