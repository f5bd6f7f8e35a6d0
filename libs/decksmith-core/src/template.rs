//! Card template evaluation.
//!
//! Templates use a mustache subset:
//! ```text
//! {{Front}}                 field value, empty if the field is unknown
//! {{text:Front}}            filters are accepted and ignored
//! {{#Back}}...{{/Back}}     rendered only when Back is non-empty
//! {{^Back}}...{{/Back}}     rendered only when Back is empty
//! {{! comment }}            rendered as nothing
//! ```

use crate::error::{Result, TemplateError};
use std::collections::HashMap;

/// Renders a template source against field values.
///
/// Implementations must be pure: the same inputs always produce the same
/// output. Fields the template references but the map lacks render as empty.
pub trait TemplateEvaluator {
    fn render(&self, source: &str, fields: &HashMap<&str, &str>) -> Result<String>;
}

/// Built-in evaluator for the mustache subset described in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MustacheEvaluator;

impl TemplateEvaluator for MustacheEvaluator {
    fn render(&self, source: &str, fields: &HashMap<&str, &str>) -> Result<String> {
        let nodes = parse_template(source)?;
        let mut output = String::with_capacity(source.len());
        render_nodes(&nodes, fields, &mut output);
        Ok(output)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Variable(String),
    Section {
        name: String,
        inverted: bool,
        children: Vec<Node>,
    },
}

enum Tag<'a> {
    Variable(&'a str),
    Open(&'a str),
    OpenInverted(&'a str),
    Close(&'a str),
    Comment,
}

struct OpenSection {
    name: String,
    inverted: bool,
    parent: Vec<Node>,
}

fn parse_template(source: &str) -> std::result::Result<Vec<Node>, TemplateError> {
    let mut nodes = Vec::new();
    let mut stack: Vec<OpenSection> = Vec::new();
    let mut rest = source;
    let mut offset = 0;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            nodes.push(Node::Text(rest[..start].to_string()));
        }

        let (inner, consumed) = split_tag(&rest[start..], offset + start)?;
        match classify_tag(inner, offset + start)? {
            Tag::Variable(name) => nodes.push(Node::Variable(field_name(name).to_string())),
            Tag::Open(name) | Tag::OpenInverted(name) if name.is_empty() => {
                return Err(TemplateError::EmptyTag {
                    offset: offset + start,
                });
            }
            Tag::Open(name) => stack.push(OpenSection {
                name: name.to_string(),
                inverted: false,
                parent: std::mem::take(&mut nodes),
            }),
            Tag::OpenInverted(name) => stack.push(OpenSection {
                name: name.to_string(),
                inverted: true,
                parent: std::mem::take(&mut nodes),
            }),
            Tag::Close(name) => {
                let open = stack.pop().ok_or_else(|| TemplateError::UnexpectedClose {
                    name: name.to_string(),
                })?;
                if open.name != name {
                    return Err(TemplateError::MismatchedClose {
                        expected: open.name,
                        found: name.to_string(),
                    });
                }
                let children = std::mem::replace(&mut nodes, open.parent);
                nodes.push(Node::Section {
                    name: open.name,
                    inverted: open.inverted,
                    children,
                });
            }
            Tag::Comment => {}
        }

        let advance = start + consumed;
        rest = &rest[advance..];
        offset += advance;
    }

    if !rest.is_empty() {
        nodes.push(Node::Text(rest.to_string()));
    }

    if let Some(open) = stack.pop() {
        return Err(TemplateError::UnclosedSection { name: open.name });
    }

    Ok(nodes)
}

/// Returns the tag body and the number of bytes the whole tag spans.
fn split_tag(input: &str, offset: usize) -> std::result::Result<(&str, usize), TemplateError> {
    let (open, close) = if input.starts_with("{{{") {
        ("{{{", "}}}")
    } else {
        ("{{", "}}")
    };
    let body = &input[open.len()..];
    let end = body
        .find(close)
        .ok_or(TemplateError::UnclosedTag { offset })?;
    Ok((&body[..end], open.len() + end + close.len()))
}

fn classify_tag(inner: &str, offset: usize) -> std::result::Result<Tag<'_>, TemplateError> {
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        return Err(TemplateError::EmptyTag { offset });
    }

    let tag = if let Some(rest) = trimmed.strip_prefix('#') {
        Tag::Open(rest.trim())
    } else if let Some(rest) = trimmed.strip_prefix('^') {
        Tag::OpenInverted(rest.trim())
    } else if let Some(rest) = trimmed.strip_prefix('/') {
        Tag::Close(rest.trim())
    } else if trimmed.starts_with('!') {
        Tag::Comment
    } else {
        Tag::Variable(trimmed)
    };
    Ok(tag)
}

/// Strip any `filter:` prefixes from a variable reference.
fn field_name(reference: &str) -> &str {
    reference.rsplit(':').next().unwrap_or(reference).trim()
}

fn render_nodes(nodes: &[Node], fields: &HashMap<&str, &str>, output: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => output.push_str(text),
            Node::Variable(name) => {
                if let Some(value) = fields.get(name.as_str()) {
                    output.push_str(value);
                }
            }
            Node::Section {
                name,
                inverted,
                children,
            } => {
                let present = fields
                    .get(name.as_str())
                    .is_some_and(|value| !value.trim().is_empty());
                if present != *inverted {
                    render_nodes(children, fields, output);
                }
            }
        }
    }
}
