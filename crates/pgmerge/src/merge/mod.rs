//! MERGE statement state and rendering.
//!
//! [`MergeData`] is the full state of one statement. It is never mutated in
//! place by the public API: [`MergeBuilder`] copies it on every configuration
//! call, so any intermediate builder can be reused or shared across threads.
//!
//! Rendering walks a fixed clause order:
//!
//! ```text
//! [prefixes] MERGE INTO table USING source ON predicate
//!     [WHEN MATCHED THEN ...] [WHEN NOT MATCHED THEN ...]
//!     [OUTPUT cols] [INTO target] [suffixes];
//! ```
//!
//! Arguments are collected in the same order as their markers, and the
//! placeholder format is applied once to the complete statement.

mod builder;

pub use builder::MergeBuilder;

use crate::clause::ClauseList;
use crate::error::{MergeError, MergeResult};
use crate::expr::{Expr, SqlFragment};
use crate::param::ParamList;
use crate::placeholder::{Placeholder, PlaceholderFormat};
use crate::row::RowResult;
use crate::runner::Runner;
use crate::trace::{self, Operation};
use std::fmt;
use std::sync::Arc;
use tokio_postgres::Row;

/// Default truncation for SQL in log events, in bytes.
pub(crate) const DEFAULT_MAX_SQL_LENGTH: usize = 200;

/// Every clause of one MERGE statement.
#[derive(Clone)]
pub struct MergeData {
    pub(crate) placeholder_format: Arc<dyn PlaceholderFormat>,
    pub(crate) runner: Option<Arc<dyn Runner>>,
    pub(crate) max_sql_length: Option<usize>,
    pub(crate) prefixes: ClauseList,
    pub(crate) table: String,
    pub(crate) using: Option<Arc<dyn SqlFragment>>,
    pub(crate) on: Option<Expr>,
    pub(crate) when_matched: Option<Arc<dyn SqlFragment>>,
    pub(crate) when_not_matched: Option<Arc<dyn SqlFragment>>,
    pub(crate) suffixes: ClauseList,
    pub(crate) output: Vec<String>,
    pub(crate) output_into: Option<String>,
}

impl Default for MergeData {
    fn default() -> Self {
        Self {
            placeholder_format: Arc::new(Placeholder::default()),
            runner: None,
            max_sql_length: Some(DEFAULT_MAX_SQL_LENGTH),
            prefixes: ClauseList::new(),
            table: String::new(),
            using: None,
            on: None,
            when_matched: None,
            when_not_matched: None,
            suffixes: ClauseList::new(),
            output: Vec::new(),
            output_into: None,
        }
    }
}

impl fmt::Debug for MergeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeData")
            .field("placeholder_format", &self.placeholder_format)
            .field("runner", &self.runner.as_ref().map(|_| "<dyn Runner>"))
            .field("prefixes", &self.prefixes)
            .field("table", &self.table)
            .field("using", &self.using.as_ref().map(|_| "<dyn SqlFragment>"))
            .field("on", &self.on)
            .field("when_matched", &self.when_matched.as_ref().map(|_| "<dyn SqlFragment>"))
            .field(
                "when_not_matched",
                &self.when_not_matched.as_ref().map(|_| "<dyn SqlFragment>"),
            )
            .field("suffixes", &self.suffixes)
            .field("output", &self.output)
            .field("output_into", &self.output_into)
            .finish()
    }
}

impl MergeData {
    /// Target table (as written, including any alias).
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Prefix expressions.
    pub fn prefixes(&self) -> &ClauseList {
        &self.prefixes
    }

    /// Suffix expressions.
    pub fn suffixes(&self) -> &ClauseList {
        &self.suffixes
    }

    /// The ON predicate, if set.
    pub fn on(&self) -> Option<&Expr> {
        self.on.as_ref()
    }

    /// OUTPUT columns.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// OUTPUT INTO target, if set.
    pub fn output_into(&self) -> Option<&str> {
        self.output_into.as_deref()
    }

    /// Whether a runner is configured.
    pub fn has_runner(&self) -> bool {
        self.runner.is_some()
    }

    /// Render SQL and arguments, applying the placeholder format.
    pub fn to_sql(&self) -> MergeResult<(String, ParamList)> {
        let (sql, params) = self.to_sql_raw()?;
        let sql = self.placeholder_format.replace_placeholders(&sql)?;
        Ok((sql, params))
    }

    /// Render SQL and arguments with generic `?` markers.
    pub fn to_sql_raw(&self) -> MergeResult<(String, ParamList)> {
        let mut sql = String::with_capacity(128);
        let mut params = ParamList::new();
        self.append_raw(&mut sql, &mut params)?;
        Ok((sql, params))
    }

    fn append_raw(&self, sql: &mut String, params: &mut ParamList) -> MergeResult<()> {
        if self.table.is_empty() {
            return Err(MergeError::MissingTarget);
        }
        let Some(using) = &self.using else {
            return Err(MergeError::MissingUsingClause);
        };
        let Some(on) = &self.on else {
            return Err(MergeError::MissingOnClause);
        };

        if !self.prefixes.is_empty() {
            self.prefixes.append_to_sql(sql, " ", params)?;
            sql.push(' ');
        }

        sql.push_str("MERGE INTO ");
        sql.push_str(&self.table);

        sql.push_str(" USING ");
        using.append_sql(sql, params)?;

        sql.push_str(" ON ");
        on.append_sql(sql, params)?;

        if let Some(action) = &self.when_matched {
            sql.push_str(" WHEN MATCHED THEN ");
            action.append_sql(sql, params)?;
        }

        if let Some(action) = &self.when_not_matched {
            sql.push_str(" WHEN NOT MATCHED THEN ");
            action.append_sql(sql, params)?;
        }

        if !self.output.is_empty() {
            sql.push_str(" OUTPUT ");
            sql.push_str(&self.output.join(","));
        }

        if let Some(into) = self.output_into.as_deref().filter(|s| !s.is_empty()) {
            sql.push_str(" INTO ");
            sql.push_str(into);
        }

        if !self.suffixes.is_empty() {
            sql.push(' ');
            self.suffixes.append_to_sql(sql, " ", params)?;
        }

        sql.push(';');
        Ok(())
    }

    fn render_for(&self, op: Operation) -> MergeResult<(String, ParamList)> {
        match self.to_sql() {
            Ok((sql, params)) => {
                trace::statement(op, &sql, params.len(), self.max_sql_length);
                Ok((sql, params))
            }
            Err(err) => {
                trace::render_failed(op, &err);
                Err(err)
            }
        }
    }

    /// Execute via the runner, returning the affected row count.
    pub async fn exec(&self) -> MergeResult<u64> {
        let runner = self.runner.as_ref().ok_or(MergeError::RunnerNotSet)?;
        let (sql, params) = self.render_for(Operation::Exec)?;
        runner.execute(&sql, &params.as_refs()).await
    }

    /// Execute via the runner, returning all rows.
    pub async fn query(&self) -> MergeResult<Vec<Row>> {
        let runner = self.runner.as_ref().ok_or(MergeError::RunnerNotSet)?;
        let (sql, params) = self.render_for(Operation::Query)?;
        runner.query(&sql, &params.as_refs()).await
    }

    /// Execute via the runner's single-row capability.
    ///
    /// Never fails directly; see [`RowResult`].
    pub async fn query_row(&self) -> RowResult {
        let Some(runner) = &self.runner else {
            return RowResult::from_err(MergeError::RunnerNotSet);
        };
        let Some(query_row) = runner.as_query_row() else {
            return RowResult::from_err(MergeError::RunnerLacksQueryRow);
        };
        let (sql, params) = match self.render_for(Operation::QueryRow) {
            Ok(rendered) => rendered,
            Err(err) => return RowResult::from_err(err),
        };
        RowResult::new(query_row.query_row(&sql, &params.as_refs()).await)
    }
}

impl SqlFragment for MergeData {
    fn append_sql(&self, sql: &mut String, params: &mut ParamList) -> MergeResult<()> {
        self.append_raw(sql, params)
    }
}
