//! Template rendering
//!
//! Templates contain `{{TOKEN}}` markers (upper-case ASCII, digits and `_`).
//! Rendering is total: every marker must be resolved from the context, and a
//! leftover marker is reported as [`SpeckitError::UnresolvedTemplateToken`].
//! Brace pairs that do not form a token name (e.g. Python `{{ }}` escapes)
//! are copied through untouched.

pub mod context;
pub mod templates;

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, SpeckitError};

pub use context::{FragmentCounts, build_context};
pub use templates::{OutputRoot, Template, TemplateId, TemplateSet, tokens};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Replacement text per token name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    values: BTreeMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a token value
    ///
    /// Values never contain markers themselves; callers sanitize free text
    /// with [`neutralize_markers`] first.
    pub fn insert(&mut self, token: &str, value: impl Into<String>) {
        let value = value.into();
        debug_assert!(
            tokens_in(&value).is_empty(),
            "context value for {token} contains a token marker"
        );
        self.values.insert(token.to_string(), value);
    }

    pub fn with(mut self, token: &str, value: impl Into<String>) -> Self {
        self.insert(token, value);
        self
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.values.contains_key(token)
    }
}

fn is_token_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

enum Piece<'a> {
    Literal(&'a str),
    Token(&'a str),
}

/// Walk `text`, yielding literal chunks and token names in order
fn walk<'a>(text: &'a str, mut visit: impl FnMut(Piece<'a>)) {
    let mut rest = text;
    while let Some(start) = rest.find(OPEN) {
        visit(Piece::Literal(&rest[..start]));
        let after = &rest[start + OPEN.len()..];
        match after.find(CLOSE) {
            Some(end) if is_token_name(&after[..end]) => {
                visit(Piece::Token(&after[..end]));
                rest = &after[end + CLOSE.len()..];
            }
            _ => {
                visit(Piece::Literal(OPEN));
                rest = after;
            }
        }
    }
    visit(Piece::Literal(rest));
}

/// Token names appearing in `text`
pub fn tokens_in(text: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    walk(text, |piece| {
        if let Piece::Token(token) = piece {
            found.insert(token.to_string());
        }
    });
    found
}

/// Break up marker delimiters in free text taken from spec documents
pub fn neutralize_markers(text: &str) -> String {
    text.replace(OPEN, "{ {").replace(CLOSE, "} }")
}

/// Substitute every token of `template` from `context`
///
/// Substitution is a single left-to-right pass, so replacement text is never
/// rescanned.
pub fn render(name: &str, template: &str, context: &TemplateContext) -> Result<String> {
    let mut output = String::with_capacity(template.len());
    let mut unresolved = BTreeSet::new();

    walk(template, |piece| match piece {
        Piece::Literal(literal) => output.push_str(literal),
        Piece::Token(token) => match context.get(token) {
            Some(value) => output.push_str(value),
            None => {
                unresolved.insert(token.to_string());
                output.push_str(OPEN);
                output.push_str(token);
                output.push_str(CLOSE);
            }
        },
    });

    if !unresolved.is_empty() {
        return Err(SpeckitError::UnresolvedTemplateToken {
            template: name.to_string(),
            tokens: unresolved.into_iter().collect(),
        });
    }

    Ok(output)
}
