//! # pgmerge
//!
//! An immutable, composable `MERGE` statement builder.
//!
//! ## Features
//!
//! - **Immutable builders**: every call returns a new builder; intermediate builders can be reused
//! - **Deterministic rendering**: fixed clause order, arguments in marker order
//! - **Composable**: sub-selects and other fragments render in place of a `?`
//! - **Pluggable placeholders**: `?`, `$n`, `:n`, `@pn`, numbered once over the whole statement
//! - **Runner-agnostic**: execution is delegated to any [`Runner`] (e.g. `tokio_postgres::Client`)
//!
//! ## Example
//!
//! ```ignore
//! use pgmerge::{merge, Expr, Placeholder};
//! use std::sync::Arc;
//!
//! let affected = merge("inventory AS t")
//!     .using(Expr::new("(SELECT ? AS sku, ? AS qty) AS s").bind("A-1").bind(5_i32))
//!     .on("s.sku = t.sku")
//!     .when_matched("UPDATE SET qty = t.qty + s.qty")
//!     .when_not_matched("INSERT (sku, qty) VALUES (s.sku, s.qty)")
//!     .placeholder_format(Placeholder::Dollar)
//!     .run_with(Arc::new(client))
//!     .exec()
//!     .await?;
//! ```

pub mod clause;
pub mod error;
pub mod expr;
pub mod merge;
pub mod param;
pub mod placeholder;
pub mod row;
pub mod runner;
pub mod statement;

mod trace;

pub use clause::ClauseList;
pub use error::{MergeError, MergeResult};
pub use expr::{Arg, Expr, SqlFragment};
pub use merge::{MergeBuilder, MergeData};
pub use param::{Param, ParamList};
pub use placeholder::{Placeholder, PlaceholderFormat};
pub use row::RowResult;
pub use runner::{QueryRowRunner, Runner};
pub use statement::StatementBuilder;

/// Create a MERGE builder targeting `table`, with default settings.
///
/// # Example
/// ```ignore
/// let qb = pgmerge::merge("users AS t").using("staged AS s").on("s.id = t.id");
/// ```
pub fn merge(table: impl Into<String>) -> MergeBuilder {
    StatementBuilder::default().merge(table)
}
