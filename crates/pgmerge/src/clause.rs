//! Ordered, joinable lists of expressions (prefixes, suffixes).

use crate::error::MergeResult;
use crate::expr::{Expr, SqlFragment};
use crate::param::ParamList;

/// An ordered list of [`Expr`] rendered with a separator.
///
/// An empty list renders nothing; callers decide whether to emit a keyword or
/// a leading space around it.
#[derive(Clone, Debug, Default)]
pub struct ClauseList {
    exprs: Vec<Expr>,
}

impl ClauseList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self { exprs: Vec::new() }
    }

    /// Append an expression.
    pub fn push(&mut self, expr: Expr) {
        self.exprs.push(expr);
    }

    /// Number of expressions.
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Get all expressions.
    pub fn exprs(&self) -> &[Expr] {
        &self.exprs
    }

    /// Render each expression, `sep` between elements, appending arguments in order.
    pub fn append_to_sql(
        &self,
        sql: &mut String,
        sep: &str,
        params: &mut ParamList,
    ) -> MergeResult<()> {
        for (i, expr) in self.exprs.iter().enumerate() {
            if i > 0 {
                sql.push_str(sep);
            }
            expr.append_sql(sql, params)?;
        }
        Ok(())
    }
}

impl FromIterator<Expr> for ClauseList {
    fn from_iter<I: IntoIterator<Item = Expr>>(iter: I) -> Self {
        Self {
            exprs: iter.into_iter().collect(),
        }
    }
}
