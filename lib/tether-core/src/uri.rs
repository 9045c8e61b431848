//! URI templates.
//!
//! A small subset of [RFC 6570](https://tools.ietf.org/html/rfc6570) level 3
//! expressions, enough to describe where arguments land in a method's URL:
//!
//! | Expression | Expansion of `id = 42`, `q = "a b"` |
//! |------------|-------------------------------------|
//! | `{id}`     | `42`                                |
//! | `{+path}`  | value without encoding reserved characters |
//! | `{/id}`    | `/42`                               |
//! | `{?q}`     | `?q=a%20b`                          |
//! | `{&q}`     | `&q=a%20b`                          |
//!
//! Undefined (or `null`) variables expand to nothing.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Value};

use crate::stringify;

/// Characters encoded in every expansion except `{+var}`.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Characters encoded in `{+var}` expansions: reserved characters pass through.
const RESERVED: &AsciiSet = &UNRESERVED
    .remove(b':')
    .remove(b'/')
    .remove(b'?')
    .remove(b'#')
    .remove(b'[')
    .remove(b']')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Simple,
    Reserved,
    PathSegment,
    Query,
    QueryContinuation,
}

impl Operator {
    fn parse(expression: &str) -> (Self, &str) {
        let mut chars = expression.chars();
        let operator = match chars.next() {
            Some('+') => Self::Reserved,
            Some('/') => Self::PathSegment,
            Some('?') => Self::Query,
            Some('&') => Self::QueryContinuation,
            _ => return (Self::Simple, expression),
        };
        (operator, chars.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Expression {
        operator: Operator,
        names: Vec<String>,
    },
}

/// A parsed URI template such as `/users/{id}/todos{?page}`.
///
/// # Example
///
/// ```
/// use serde_json::{Map, json};
/// use tether_core::UriTemplate;
///
/// let template = UriTemplate::new("todos{/id}{?done}");
/// assert_eq!(template.variables(), ["id", "done"]);
///
/// let mut values = Map::new();
/// values.insert("id".to_string(), json!("100"));
/// assert_eq!(template.expand(&values), "todos/100");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl UriTemplate {
    /// Parse a template.
    ///
    /// An unterminated `{` is kept as literal text.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut segments = Vec::new();
        let mut rest = source.as_str();

        while let Some((literal, after)) = rest.split_once('{') {
            let Some((expression, tail)) = after.split_once('}') else {
                break;
            };
            if !literal.is_empty() {
                segments.push(Segment::Literal(literal.to_string()));
            }
            let (operator, names) = Operator::parse(expression);
            let names = names
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            segments.push(Segment::Expression { operator, names });
            rest = tail;
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Self { source, segments }
    }

    /// Get the template string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Variable names in order of first appearance.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        let mut variables: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Expression { names, .. } = segment {
                for name in names {
                    if !variables.contains(&name.as_str()) {
                        variables.push(name);
                    }
                }
            }
        }
        variables
    }

    /// Returns `true` if the template declares `name`.
    #[must_use]
    pub fn has_variable(&self, name: &str) -> bool {
        self.variables().contains(&name)
    }

    /// Expand the template with the given variable values.
    #[must_use]
    pub fn expand(&self, values: &Map<String, Value>) -> String {
        let mut out = String::with_capacity(self.source.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Expression { operator, names } => {
                    let defined = names.iter().filter_map(|name| {
                        values
                            .get(name)
                            .filter(|value| !value.is_null())
                            .map(|value| (name.as_str(), render(value, *operator)))
                    });
                    expand_expression(&mut out, *operator, defined);
                }
            }
        }

        out
    }
}

fn render(value: &Value, operator: Operator) -> String {
    let set = if operator == Operator::Reserved {
        RESERVED
    } else {
        UNRESERVED
    };
    let encode = |value: &Value| utf8_percent_encode(&stringify(value), set).to_string();

    match value {
        Value::Array(items) => items.iter().map(encode).collect::<Vec<_>>().join(","),
        scalar => encode(scalar),
    }
}

fn expand_expression<'a>(
    out: &mut String,
    operator: Operator,
    defined: impl Iterator<Item = (&'a str, String)>,
) {
    for (index, (name, value)) in defined.enumerate() {
        match operator {
            Operator::Simple | Operator::Reserved => {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(&value);
            }
            Operator::PathSegment => {
                out.push('/');
                out.push_str(&value);
            }
            Operator::Query | Operator::QueryContinuation => {
                let first = operator == Operator::Query && index == 0;
                out.push(if first { '?' } else { '&' });
                out.push_str(name);
                out.push('=');
                out.push_str(&value);
            }
        }
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl AsRef<str> for UriTemplate {
    fn as_ref(&self) -> &str {
        &self.source
    }
}
