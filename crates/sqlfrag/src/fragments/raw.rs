use crate::builder::QueryBuilder;
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Arg, Fragment, Parens, Precedence};
use std::fmt;

/// Literal SQL text with positional `{0}`, `{1}`, ... placeholders.
///
/// Each placeholder is replaced by its argument, written like any other
/// value (parameter, inline NULL, or nested fragment). `{{` and `}}` produce
/// literal braces. A template may reference an argument more than once; each
/// reference registers a new parameter.
///
/// ```ignore
/// let hint = RawSql::new("WITH (NOLOCK)");
/// let cond = RawSql::new("{0} @@ to_tsquery({1})").arg(col).arg("rust");
/// ```
#[derive(Debug, Clone)]
pub struct RawSql {
    template: String,
    args: Vec<Arg>,
    sub_query: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Arg(usize),
}

fn parse_template(template: &str, arg_count: usize) -> SqlResult<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let bytes = template.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                segments.push(Segment::Text(&template[start..=i]));
                i += 2;
                start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                segments.push(Segment::Text(&template[start..=i]));
                i += 2;
                start = i;
            }
            b'{' => {
                let close = template[i + 1..].find('}').ok_or_else(|| {
                    SqlError::invalid_argument(format!("unclosed placeholder in '{template}'"))
                })?;
                let digits = &template[i + 1..i + 1 + close];
                let index: usize = digits.parse().map_err(|_| {
                    SqlError::invalid_argument(format!(
                        "malformed placeholder '{{{digits}}}' in '{template}'"
                    ))
                })?;
                if index >= arg_count {
                    return Err(SqlError::invalid_argument(format!(
                        "placeholder {{{index}}} has no argument in '{template}'"
                    )));
                }
                segments.push(Segment::Text(&template[start..i]));
                segments.push(Segment::Arg(index));
                i += close + 2;
                start = i;
            }
            b'}' => {
                return Err(SqlError::invalid_argument(format!(
                    "unmatched '}}' in '{template}'"
                )));
            }
            _ => i += 1,
        }
    }
    segments.push(Segment::Text(&template[start..]));
    segments.retain(|s| *s != Segment::Text(""));
    Ok(segments)
}

impl RawSql {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            args: Vec::new(),
            sub_query: false,
        }
    }

    /// Raw text standing for a whole query; parenthesized when used as a value.
    pub fn query(template: impl Into<String>) -> Self {
        Self {
            sub_query: true,
            ..Self::new(template)
        }
    }

    /// Append the next positional argument.
    pub fn arg(mut self, value: impl Into<Arg>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }
}

impl Fragment for RawSql {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        for segment in parse_template(&self.template, self.args.len())? {
            match segment {
                Segment::Text(text) => {
                    b.write(text);
                }
                Segment::Arg(index) => {
                    b.write_value(&self.args[index], Parens::SubQuery)?;
                }
            }
        }
        Ok(())
    }

    fn precedence(&self) -> Precedence {
        if self.sub_query {
            Precedence::SubQuery
        } else {
            Precedence::Atomic
        }
    }
}

impl fmt::Display for RawSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(segments) = parse_template(&self.template, self.args.len()) else {
            return f.write_str(&self.template);
        };
        for segment in segments {
            match segment {
                Segment::Text(text) => f.write_str(text)?,
                Segment::Arg(index) => write!(f, "{}", self.args[index])?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_escapes_and_placeholders() {
        let segments = parse_template("a {{x}} {0}", 1).unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Text("a {"),
                Segment::Text("x}"),
                Segment::Text(" "),
                Segment::Arg(0),
            ]
        );
    }

    #[test]
    fn parse_rejects_bad_templates() {
        assert!(parse_template("{0}", 0).is_err());
        assert!(parse_template("{x}", 1).is_err());
        assert!(parse_template("{0", 1).is_err());
        assert!(parse_template("a } b", 0).is_err());
    }

    #[test]
    fn display_inlines_literals() {
        let raw = RawSql::new("x = {0} OR y = {0}").arg("it's");
        assert_eq!(raw.to_string(), "x = 'it''s' OR y = 'it''s'");
    }
}
