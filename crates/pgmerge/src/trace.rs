//! `tracing` events for statements handed to a runner.
//!
//! Events use the `pgmerge.sql` target. Without the `tracing` feature these
//! helpers compile to nothing.

/// Which runner entry point a statement was sent through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Exec,
    Query,
    QueryRow,
}

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Operation::Exec => "exec",
            Operation::Query => "query",
            Operation::QueryRow => "query_row",
        }
    }
}

/// Truncate to at most `max_bytes` without splitting a UTF-8 character.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(feature = "tracing")]
pub(crate) fn statement(
    op: Operation,
    sql: &str,
    param_count: usize,
    max_sql_length: Option<usize>,
) {
    let shown: std::borrow::Cow<'_, str> = match max_sql_length {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)).into(),
        _ => sql.into(),
    };
    tracing::debug!(
        target: "pgmerge.sql",
        operation = op.as_str(),
        param_count,
        sql = %shown,
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn statement(
    _op: Operation,
    _sql: &str,
    _param_count: usize,
    _max_sql_length: Option<usize>,
) {
}

#[cfg(feature = "tracing")]
pub(crate) fn render_failed(op: Operation, err: &crate::MergeError) {
    tracing::warn!(
        target: "pgmerge.sql",
        operation = op.as_str(),
        error = %err,
        "merge statement could not be rendered",
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn render_failed(_op: Operation, _err: &crate::MergeError) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("MERGE INTO t", 5), "MERGE");
        assert_eq!(truncate_sql_bytes("short", 100), "short");
        // 'é' is two bytes; cutting inside it backs off to the boundary.
        assert_eq!(truncate_sql_bytes("aé", 2), "a");
    }

    #[test]
    fn operation_names() {
        assert_eq!(Operation::Exec.as_str(), "exec");
        assert_eq!(Operation::QueryRow.as_str(), "query_row");
    }
}
