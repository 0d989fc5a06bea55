//! Single-row results with deferred errors.

use crate::error::{MergeError, MergeResult};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// The outcome of [`MergeBuilder::query_row`](crate::MergeBuilder::query_row).
///
/// `query_row` never fails by itself. Configuration, rendering, and runner
/// errors are carried here and surface on the first read.
///
/// # Example
/// ```ignore
/// let id: i64 = pgmerge::merge("users AS t")
///     // ...
///     .suffix("RETURNING t.id")
///     .run_with(client)
///     .query_row()
///     .await
///     .get("id")?;
/// ```
#[derive(Debug)]
#[must_use]
pub struct RowResult {
    inner: MergeResult<Option<Row>>,
}

impl RowResult {
    pub(crate) fn new(inner: MergeResult<Option<Row>>) -> Self {
        Self { inner }
    }

    pub(crate) fn from_err(err: MergeError) -> Self {
        Self { inner: Err(err) }
    }

    /// The carried error, if any, without consuming the result.
    pub fn error(&self) -> Option<&MergeError> {
        self.inner.as_ref().err()
    }

    /// Take the row. No row is reported as [`MergeError::NotFound`].
    pub fn row(self) -> MergeResult<Row> {
        self.inner?
            .ok_or_else(|| MergeError::not_found("merge statement returned no rows"))
    }

    /// Take the row if there is one.
    pub fn optional(self) -> MergeResult<Option<Row>> {
        self.inner
    }

    /// Read one column of the row. A carried error is returned as is.
    pub fn get<T>(self, column: &str) -> MergeResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        let row = self.row()?;
        row.try_get(column).map_err(MergeError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carried_error_surfaces_on_read() {
        let result = RowResult::from_err(MergeError::RunnerLacksQueryRow);
        assert!(matches!(result.error(), Some(MergeError::RunnerLacksQueryRow)));
        assert!(matches!(result.row(), Err(MergeError::RunnerLacksQueryRow)));
    }

    #[test]
    fn empty_result_is_not_found_only_for_row() {
        let result = RowResult::new(Ok(None));
        assert!(result.error().is_none());
        assert!(result.get::<i64>("id").unwrap_err().is_not_found());

        assert!(RowResult::new(Ok(None)).optional().unwrap().is_none());
        assert!(RowResult::new(Ok(None)).row().unwrap_err().is_not_found());
    }

    #[test]
    fn get_returns_carried_error_variant() {
        let result = RowResult::from_err(MergeError::RunnerNotSet);
        assert!(matches!(result.get::<i64>("id"), Err(MergeError::RunnerNotSet)));

        let err = RowResult::from_err(MergeError::MissingOnClause)
            .get::<String>("name")
            .unwrap_err();
        assert!(matches!(err, MergeError::MissingOnClause));
        assert!(err.is_validation());
    }
}
