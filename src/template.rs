//! Runtime text templates.
//!
//! Page and stylesheet templates can be swapped for user files at startup, so
//! they cannot be compiled in the way the listing rows are. The syntax is a
//! single construct: `{{ name }}` (inner whitespace optional) is replaced by
//! the value bound to `name`. Everything else is copied verbatim.
//!
//! Templates are parsed once, against the set of variables the caller will
//! bind. A misspelt placeholder is caught at load time instead of silently
//! rendering as nothing halfway through a tree.

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown template variable `{name}` (expected one of: {expected})")]
    UnknownVariable { name: String, expected: String },
    #[error("unterminated `{{{{` at byte {0}")]
    Unterminated(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source`, accepting only placeholders named in `variables`.
    pub fn parse(source: &str, variables: &[&str]) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after_open = &rest[start + 2..];
            let end = after_open
                .find("}}")
                .ok_or(TemplateError::Unterminated(offset + start))?;
            let name = after_open[..end].trim();
            if !variables.contains(&name) {
                return Err(TemplateError::UnknownVariable {
                    name: name.to_string(),
                    expected: variables.join(", "),
                });
            }
            segments.push(Segment::Variable(name.to_string()));

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Substitute bound values. Unbound variables render as empty strings.
    pub fn render(&self, values: &BTreeMap<&str, String>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => {
                    if let Some(value) = values.get(name.as_str()) {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }

    pub fn uses(&self, variable: &str) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Variable(name) if name == variable))
    }
}
