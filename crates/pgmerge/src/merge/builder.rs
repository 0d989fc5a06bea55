//! Immutable, chainable MERGE builder.

use super::MergeData;
use crate::error::MergeResult;
use crate::expr::{Expr, SqlFragment};
use crate::param::ParamList;
use crate::placeholder::PlaceholderFormat;
use crate::row::RowResult;
use crate::runner::Runner;
use std::sync::Arc;
use tokio_postgres::Row;

/// Builder for `MERGE INTO` statements.
///
/// Every configuration method takes `&self` and returns a new builder; the
/// receiver is left untouched. Builders are cheap to clone and `Send + Sync`.
///
/// # Example
/// ```ignore
/// use pgmerge::{merge, Expr, Placeholder};
///
/// let (sql, params) = merge("users AS t")
///     .using(Expr::new("(SELECT ? AS id, ? AS name) AS s").bind(1_i64).bind("alice"))
///     .on("s.id = t.id")
///     .when_matched("UPDATE SET name = s.name")
///     .when_not_matched("INSERT (id, name) VALUES (s.id, s.name)")
///     .placeholder_format(Placeholder::Dollar)
///     .to_sql()?;
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct MergeBuilder {
    data: Arc<MergeData>,
}

impl MergeBuilder {
    pub(crate) fn from_data(data: MergeData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    /// Copy the current state, apply one change, and wrap it in a new builder.
    fn with(&self, change: impl FnOnce(&mut MergeData)) -> Self {
        let mut data = MergeData::clone(&self.data);
        change(&mut data);
        Self::from_data(data)
    }

    /// Read-only view of the current state.
    pub fn data(&self) -> &MergeData {
        &self.data
    }

    // ==================== Format / runner ====================

    /// Set the placeholder format (e.g. `Placeholder::Dollar`).
    pub fn placeholder_format(&self, format: impl PlaceholderFormat + 'static) -> Self {
        let format: Arc<dyn PlaceholderFormat> = Arc::new(format);
        self.with(|d| d.placeholder_format = format)
    }

    /// Set the runner that `exec` / `query` / `query_row` delegate to.
    pub fn run_with(&self, runner: Arc<dyn Runner>) -> Self {
        self.with(|d| d.runner = Some(runner))
    }

    // ==================== Clauses ====================

    /// Set the target table.
    pub fn table(&self, table: impl Into<String>) -> Self {
        let table = table.into();
        self.with(|d| d.table = table)
    }

    /// Add an expression before `MERGE INTO` (e.g. a `WITH` clause).
    pub fn prefix(&self, expr: impl Into<Expr>) -> Self {
        let expr = expr.into();
        self.with(|d| d.prefixes.push(expr))
    }

    /// Add an expression after the statement body.
    pub fn suffix(&self, expr: impl Into<Expr>) -> Self {
        let expr = expr.into();
        self.with(|d| d.suffixes.push(expr))
    }

    /// Set the `USING` source.
    pub fn using(&self, source: impl SqlFragment + 'static) -> Self {
        let source: Arc<dyn SqlFragment> = Arc::new(source);
        self.with(|d| d.using = Some(source))
    }

    /// Set the `ON` predicate, either as a plain string or an [`Expr`] with arguments.
    pub fn on(&self, pred: impl Into<Expr>) -> Self {
        let pred = pred.into();
        self.with(|d| d.on = Some(pred))
    }

    /// Set the `WHEN MATCHED THEN` action.
    pub fn when_matched(&self, action: impl SqlFragment + 'static) -> Self {
        let action: Arc<dyn SqlFragment> = Arc::new(action);
        self.with(|d| d.when_matched = Some(action))
    }

    /// Set the `WHEN NOT MATCHED THEN` action.
    pub fn when_not_matched(&self, action: impl SqlFragment + 'static) -> Self {
        let action: Arc<dyn SqlFragment> = Arc::new(action);
        self.with(|d| d.when_not_matched = Some(action))
    }

    /// Append `OUTPUT` columns.
    pub fn output<I, S>(&self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        self.with(|d| d.output.extend(columns))
    }

    /// Set the `OUTPUT ... INTO` target and append `OUTPUT` columns.
    pub fn output_into<I, S>(&self, into: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let into = into.into();
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        self.with(|d| {
            d.output_into = Some(into);
            d.output.extend(columns);
        })
    }

    // ==================== Build ====================

    /// Render SQL and arguments with the configured placeholder format.
    pub fn to_sql(&self) -> MergeResult<(String, ParamList)> {
        self.data.to_sql()
    }

    /// Render SQL and arguments with generic `?` markers.
    pub fn to_sql_raw(&self) -> MergeResult<(String, ParamList)> {
        self.data.to_sql_raw()
    }

    // ==================== Execute ====================

    /// Execute and return the affected row count.
    pub async fn exec(&self) -> MergeResult<u64> {
        self.data.exec().await
    }

    /// Execute and return all rows (e.g. with a `RETURNING` suffix).
    pub async fn query(&self) -> MergeResult<Vec<Row>> {
        self.data.query().await
    }

    /// Execute and return at most one row; errors are deferred to the [`RowResult`].
    pub async fn query_row(&self) -> RowResult {
        self.data.query_row().await
    }
}

impl SqlFragment for MergeBuilder {
    fn append_sql(&self, sql: &mut String, params: &mut ParamList) -> MergeResult<()> {
        self.data.append_sql(sql, params)
    }
}
