//! Dialect-specific placeholder rewriting.
//!
//! Statements are assembled with generic `?` markers. A [`PlaceholderFormat`]
//! rewrites the *complete* statement in one pass, so numbering is global across
//! every clause and nested fragment.
//!
//! Rewriting formats follow these rules:
//! - `??` renders a literal `?` and does not consume a number (JSONB `?` operators).
//! - `?` inside `'...'` literals, `"..."` identifiers, `-- ...` line comments, and
//!   `/* ... */` block comments is left alone. A doubled quote stays inside its literal.
//! - An unterminated quote or block comment is rejected with [`MergeError::Placeholder`].
//!
//! The same scan decides which marker a nested fragment replaces, so splicing and
//! numbering always agree.
//!
//! The scanner does not know these forms:
//! - `E'...'` strings with backslash escapes. `E'it\'s ?'` ends the literal early.
//!   Write the quote doubled (`E'it''s'`) or bind the value instead.
//! - Dollar-quoted bodies (`$$ ... $$`, `$tag$ ... $tag$`). Quotes and `?` inside
//!   them are scanned like ordinary text.
//! - Nested block comments. The first `*/` closes the comment.
//!
//! Statements that need any of these should bind the text as a value or use
//! [`Placeholder::Question`], which passes the statement through unchanged.

use crate::error::{MergeError, MergeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy that turns generic `?` markers into a dialect's parameter syntax.
pub trait PlaceholderFormat: Send + Sync + fmt::Debug {
    /// Rewrite every marker in a fully assembled statement.
    fn replace_placeholders(&self, sql: &str) -> MergeResult<String>;
}

/// Built-in placeholder formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    /// `?` markers, left untouched.
    #[default]
    Question,
    /// `$1, $2, ...` (PostgreSQL).
    Dollar,
    /// `:1, :2, ...` (Oracle).
    Colon,
    /// `@p1, @p2, ...` (SQL Server).
    AtP,
}

impl Placeholder {
    fn prefix(self) -> Option<&'static str> {
        match self {
            Placeholder::Question => None,
            Placeholder::Dollar => Some("$"),
            Placeholder::Colon => Some(":"),
            Placeholder::AtP => Some("@p"),
        }
    }
}

impl PlaceholderFormat for Placeholder {
    fn replace_placeholders(&self, sql: &str) -> MergeResult<String> {
        match self.prefix() {
            None => Ok(sql.to_string()),
            Some(prefix) => replace_positional(sql, prefix),
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Placeholder::Question => "question",
            Placeholder::Dollar => "dollar",
            Placeholder::Colon => "colon",
            Placeholder::AtP => "at_p",
        })
    }
}

impl FromStr for Placeholder {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "question" | "?" => Ok(Placeholder::Question),
            "dollar" | "$" => Ok(Placeholder::Dollar),
            "colon" | ":" => Ok(Placeholder::Colon),
            "at_p" | "atp" | "@p" => Ok(Placeholder::AtP),
            other => Err(MergeError::placeholder(format!(
                "unknown placeholder format '{other}'"
            ))),
        }
    }
}

/// One piece of a scanned statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Text copied as is, including quoted sections and comments.
    Text(&'a str),
    /// A `?` that takes an argument.
    Marker,
    /// `??`, a literal `?`.
    Escaped,
}

/// A statement split into text and markers.
#[derive(Debug)]
pub(crate) struct Scan<'a> {
    pub(crate) tokens: Vec<Token<'a>>,
    /// What was left open at the end of the input, and its byte offset.
    pub(crate) unterminated: Option<(&'static str, usize)>,
}

/// Split `sql` at the `?` markers that sit outside quotes and comments.
///
/// An unterminated quote or comment turns the rest of the input into text.
pub(crate) fn scan(sql: &str) -> Scan<'_> {
    // Every delimiter is ASCII, so byte offsets always land on char boundaries.
    let bytes = sql.as_bytes();
    let mut tokens = Vec::new();
    let mut unterminated = None;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                let open = i;
                i += 1;
                loop {
                    match bytes.get(i) {
                        None => {
                            let kind = if quote == b'\'' {
                                "string literal"
                            } else {
                                "quoted identifier"
                            };
                            unterminated = Some((kind, open));
                            break;
                        }
                        Some(&b) if b == quote => {
                            if bytes.get(i + 1) == Some(&quote) {
                                i += 2;
                            } else {
                                i += 1;
                                break;
                            }
                        }
                        Some(_) => i += 1,
                    }
                }
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                i = sql[i..].find('\n').map_or(bytes.len(), |end| i + end);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => match sql[i + 2..].find("*/") {
                Some(end) => i += 2 + end + 2,
                None => {
                    unterminated = Some(("block comment", i));
                    i = bytes.len();
                }
            },
            b'?' => {
                if start < i {
                    tokens.push(Token::Text(&sql[start..i]));
                }
                if bytes.get(i + 1) == Some(&b'?') {
                    tokens.push(Token::Escaped);
                    i += 2;
                } else {
                    tokens.push(Token::Marker);
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }

    if start < bytes.len() {
        tokens.push(Token::Text(&sql[start..]));
    }
    Scan {
        tokens,
        unterminated,
    }
}

/// Replace `?` with `{prefix}{n}`, numbering from 1.
fn replace_positional(sql: &str, prefix: &str) -> MergeResult<String> {
    let scan = scan(sql);
    if let Some((kind, pos)) = scan.unterminated {
        return Err(MergeError::placeholder(format!(
            "unterminated {kind} starting at byte {pos}"
        )));
    }

    let mut out = String::with_capacity(sql.len() + 16);
    let mut n = 0usize;
    for token in scan.tokens {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Escaped => out.push('?'),
            Token::Marker => {
                n += 1;
                out.push_str(prefix);
                out.push_str(&n.to_string());
            }
        }
    }
    Ok(out)
}
