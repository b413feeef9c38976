//! Identifier escaping.
//!
//! Names are written segment by segment: `schema.table` becomes
//! `"schema"."table"` with each part escaped on its own and the separator left
//! bare. The closing quote character is doubled inside a segment, so any text
//! can be used as a name without breaking out of the quotes.

use serde::{Deserialize, Serialize};

/// How a dialect quotes identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameQuote {
    /// Write names verbatim.
    None,
    /// `"name"` (ANSI, PostgreSQL, SQLite, Oracle).
    #[default]
    Double,
    /// `[name]` (SQL Server).
    Bracket,
    /// `` `name` `` (MySQL).
    Backtick,
}

impl NameQuote {
    fn delimiters(self) -> Option<(char, char)> {
        match self {
            NameQuote::None => None,
            NameQuote::Double => Some(('"', '"')),
            NameQuote::Bracket => Some(('[', ']')),
            NameQuote::Backtick => Some(('`', '`')),
        }
    }

    /// Write a possibly dotted name, escaping every segment.
    pub(crate) fn write_name(self, name: &str, out: &mut String) {
        for (i, part) in name.split('.').enumerate() {
            if i > 0 {
                out.push('.');
            }
            self.write_part(part, out);
        }
    }

    /// Write a single segment, even if it contains a dot.
    pub(crate) fn write_part(self, part: &str, out: &mut String) {
        let Some((open, close)) = self.delimiters() else {
            out.push_str(part);
            return;
        };
        if part == "*" {
            out.push('*');
            return;
        }
        out.push(open);
        for ch in part.chars() {
            if ch == close {
                out.push(close);
            }
            out.push(ch);
        }
        out.push(close);
    }

    /// Escape a name into a new string.
    pub fn escape(self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        self.write_name(name, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_simple() {
        assert_eq!(NameQuote::Double.escape("users"), r#""users""#);
        assert_eq!(NameQuote::Bracket.escape("users"), "[users]");
        assert_eq!(NameQuote::Backtick.escape("users"), "`users`");
        assert_eq!(NameQuote::None.escape("users"), "users");
    }

    #[test]
    fn quote_dotted_segments_independently() {
        assert_eq!(NameQuote::Double.escape("dbo.users"), r#""dbo"."users""#);
        assert_eq!(NameQuote::Bracket.escape("a.b.c"), "[a].[b].[c]");
    }

    #[test]
    fn quote_escapes_closing_char() {
        assert_eq!(NameQuote::Double.escape(r#"has"quote"#), r#""has""quote""#);
        assert_eq!(NameQuote::Bracket.escape("a]b"), "[a]]b]");
    }

    #[test]
    fn star_is_never_quoted() {
        assert_eq!(NameQuote::Double.escape("u.*"), r#""u".*"#);
    }

    #[test]
    fn write_part_keeps_dots() {
        let mut out = String::new();
        NameQuote::Double.write_part("a.b", &mut out);
        assert_eq!(out, r#""a.b""#);
    }
}
