//! SQL fragments with positional `?` arguments.
//!
//! An [`Expr`] is raw SQL text plus the values bound to its `?` markers. A
//! marker may also be bound to another [`SqlFragment`] (a sub-select, another
//! merge statement, ...); that fragment is rendered in place of the marker and
//! its own arguments are spliced in at that position.
//!
//! Fragments always render generic `?` markers. Dialect-specific numbering is
//! applied once, to the complete statement, by a
//! [`PlaceholderFormat`](crate::PlaceholderFormat).

use crate::error::MergeResult;
use crate::param::{Param, ParamList};
use crate::placeholder::{Token, scan};
use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// Anything that can render itself into a statement being assembled.
///
/// Implementations append SQL to `sql` and push their arguments onto
/// `params` in the same left-to-right order as their markers.
pub trait SqlFragment: Send + Sync {
    /// Append this fragment's SQL and arguments.
    fn append_sql(&self, sql: &mut String, params: &mut ParamList) -> MergeResult<()>;
}

impl SqlFragment for &'static str {
    fn append_sql(&self, sql: &mut String, _params: &mut ParamList) -> MergeResult<()> {
        sql.push_str(self);
        Ok(())
    }
}

impl SqlFragment for String {
    fn append_sql(&self, sql: &mut String, _params: &mut ParamList) -> MergeResult<()> {
        sql.push_str(self);
        Ok(())
    }
}

/// A value bound to one `?` marker of an [`Expr`].
#[derive(Clone)]
pub enum Arg {
    /// Bound value; the marker is kept.
    Value(Param),
    /// Nested fragment; rendered in place of the marker.
    Fragment(Arc<dyn SqlFragment>),
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(param) => f.debug_tuple("Value").field(param).finish(),
            Arg::Fragment(_) => f.debug_tuple("Fragment").field(&"<dyn SqlFragment>").finish(),
        }
    }
}

/// Raw SQL text with positional arguments.
///
/// The number of `?` markers is not checked against the number of arguments.
///
/// # Example
/// ```ignore
/// let source = Expr::new("(SELECT ? AS id, ? AS name) AS s").bind(1_i64).bind("alice");
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct Expr {
    sql: String,
    args: Vec<Arg>,
}

impl Expr {
    /// Create an expression with no arguments.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    /// Create an expression from homogeneous values.
    ///
    /// # Example
    /// ```ignore
    /// Expr::with_values("UPDATE SET a = ?, b = ?", vec![1_i32, 2_i32])
    /// ```
    pub fn with_values<T: ToSql + Send + Sync + 'static>(
        sql: impl Into<String>,
        values: Vec<T>,
    ) -> Self {
        Self::with_params(sql, values.into_iter().map(Param::new))
    }

    /// Create an expression from pre-wrapped parameters.
    pub fn with_params(sql: impl Into<String>, params: impl IntoIterator<Item = Param>) -> Self {
        Self {
            sql: sql.into(),
            args: params.into_iter().map(Arg::Value).collect(),
        }
    }

    /// Bind the next `?` to a value.
    pub fn bind<T: ToSql + Send + Sync + 'static>(self, value: T) -> Self {
        self.bind_param(Param::new(value))
    }

    /// Bind the next `?` to a pre-wrapped parameter.
    pub fn bind_param(mut self, param: Param) -> Self {
        self.args.push(Arg::Value(param));
        self
    }

    /// Bind the next `?` to a nested fragment.
    pub fn bind_fragment(mut self, fragment: impl SqlFragment + 'static) -> Self {
        self.args.push(Arg::Fragment(Arc::new(fragment)));
        self
    }

    /// The SQL text as written, before any fragment is spliced in.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bound arguments in declaration order.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Whether the SQL text is empty.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    fn has_fragments(&self) -> bool {
        self.args.iter().any(|a| matches!(a, Arg::Fragment(_)))
    }
}

impl SqlFragment for Expr {
    fn append_sql(&self, sql: &mut String, params: &mut ParamList) -> MergeResult<()> {
        if !self.has_fragments() {
            sql.push_str(&self.sql);
            for arg in &self.args {
                if let Arg::Value(param) = arg {
                    params.push_param(param.clone());
                }
            }
            return Ok(());
        }

        // Markers are found with the same scan the placeholder rewrite uses, so a
        // `?` inside a quote or comment never takes an argument.
        let mut args = self.args.iter();
        for token in scan(&self.sql).tokens {
            match token {
                Token::Text(text) => sql.push_str(text),
                Token::Escaped => sql.push_str("??"),
                Token::Marker => match args.next() {
                    Some(Arg::Value(param)) => {
                        sql.push('?');
                        params.push_param(param.clone());
                    }
                    Some(Arg::Fragment(fragment)) => fragment.append_sql(sql, params)?,
                    None => sql.push('?'),
                },
            }
        }

        // Surplus arguments are kept, mirroring the fast path.
        for arg in args {
            if let Arg::Value(param) = arg {
                params.push_param(param.clone());
            }
        }
        Ok(())
    }
}

impl From<&str> for Expr {
    fn from(sql: &str) -> Self {
        Expr::new(sql)
    }
}

impl From<String> for Expr {
    fn from(sql: String) -> Self {
        Expr::new(sql)
    }
}
