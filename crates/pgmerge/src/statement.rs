//! Shared defaults for the builders a caller creates.

use crate::merge::{DEFAULT_MAX_SQL_LENGTH, MergeBuilder, MergeData};
use crate::placeholder::{Placeholder, PlaceholderFormat};
use crate::runner::Runner;
use std::fmt;
use std::sync::Arc;

/// Defaults applied to every [`MergeBuilder`] created through it.
///
/// # Example
/// ```ignore
/// let stmts = StatementBuilder::postgres().run_with(Arc::new(client));
///
/// stmts.merge("users AS t")
///     .using(source)
///     .on("s.id = t.id")
///     .when_matched("UPDATE SET name = s.name")
///     .exec()
///     .await?;
/// ```
#[derive(Clone)]
pub struct StatementBuilder {
    placeholder_format: Arc<dyn PlaceholderFormat>,
    runner: Option<Arc<dyn Runner>>,
    max_sql_length: Option<usize>,
}

impl Default for StatementBuilder {
    fn default() -> Self {
        Self {
            placeholder_format: Arc::new(Placeholder::Question),
            runner: None,
            max_sql_length: Some(DEFAULT_MAX_SQL_LENGTH),
        }
    }
}

impl fmt::Debug for StatementBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementBuilder")
            .field("placeholder_format", &self.placeholder_format)
            .field("runner", &self.runner.as_ref().map(|_| "<dyn Runner>"))
            .field("max_sql_length", &self.max_sql_length)
            .finish()
    }
}

impl StatementBuilder {
    /// Create with `?` placeholders, no runner, and 200-byte SQL log truncation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with `$n` placeholders.
    pub fn postgres() -> Self {
        Self::default().placeholder_format(Placeholder::Dollar)
    }

    /// Override the placeholder format.
    pub fn placeholder_format(mut self, format: impl PlaceholderFormat + 'static) -> Self {
        self.placeholder_format = Arc::new(format);
        self
    }

    /// Set the runner.
    pub fn run_with(mut self, runner: Arc<dyn Runner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Set maximum SQL length (in bytes) shown in log events.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in log events.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Start a MERGE statement against `table`.
    pub fn merge(&self, table: impl Into<String>) -> MergeBuilder {
        MergeBuilder::from_data(MergeData {
            placeholder_format: Arc::clone(&self.placeholder_format),
            runner: self.runner.clone(),
            max_sql_length: self.max_sql_length,
            table: table.into(),
            ..MergeData::default()
        })
    }
}
