//! Structured fragment extraction from spec documents
//!
//! Extraction is best-effort: it never fails, and text that does not match
//! yields an empty sequence. Only level-3 headings are considered:
//!
//! ```text
//! ### VAL002: Invoice number is mandatory      -> tagged rule
//! ### Task 2.1: Post invoice to the ERP        -> task reference
//! ```

pub mod heading;

use serde::Serialize;

pub use heading::{Heading, scan_headings};

const RULE_HEADING_LEVEL: usize = 3;

/// What a fragment describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FragmentKind {
    Validation,
    Condition,
    ProcessingRule,
    TaskRef,
}

/// Tag families recognised in business-rules documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFamily {
    Validation,
    Condition,
    ProcessingRule,
}

impl TagFamily {
    /// Tag letters preceding the rule number
    pub fn tag(self) -> &'static str {
        match self {
            TagFamily::Validation => "VAL",
            TagFamily::Condition => "COND",
            TagFamily::ProcessingRule => "REG",
        }
    }

    pub fn kind(self) -> FragmentKind {
        match self {
            TagFamily::Validation => FragmentKind::Validation,
            TagFamily::Condition => FragmentKind::Condition,
            TagFamily::ProcessingRule => FragmentKind::ProcessingRule,
        }
    }
}

/// A structured fact pulled from spec text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedFragment {
    pub kind: FragmentKind,
    pub ordinal: u32,
    pub description: String,
}

impl ExtractedFragment {
    /// Label used in generated code, e.g. `VAL003`
    pub fn label(&self) -> String {
        match self.kind {
            FragmentKind::Validation => format!("VAL{:03}", self.ordinal),
            FragmentKind::Condition => format!("COND{:03}", self.ordinal),
            FragmentKind::ProcessingRule => format!("REG{:03}", self.ordinal),
            FragmentKind::TaskRef => format!("Task {}", self.ordinal),
        }
    }
}

/// Extract tagged rules of one family
///
/// Fragments are renumbered 1..N in scan order; the numbers written in the
/// source are discarded.
pub fn extract_tagged(text: &str, family: TagFamily) -> Vec<ExtractedFragment> {
    scan_headings(text)
        .into_iter()
        .filter(|h| h.level == RULE_HEADING_LEVEL)
        .filter_map(|h| parse_tagged_label(h.text, family.tag()))
        .zip(1u32..)
        .map(|(description, ordinal)| ExtractedFragment {
            kind: family.kind(),
            ordinal,
            description: description.to_string(),
        })
        .collect()
}

/// Extract `Task <phase>.<n>: <description>` headings for one phase
///
/// The task number `n` is kept as the ordinal.
pub fn extract_task_refs(tasks_text: &str, phase: u32) -> Vec<ExtractedFragment> {
    scan_headings(tasks_text)
        .into_iter()
        .filter(|h| h.level == RULE_HEADING_LEVEL)
        .filter_map(|h| parse_task_label(h.text))
        .filter(|(p, n, _)| *p == phase && *n > 0)
        .map(|(_, n, description)| ExtractedFragment {
            kind: FragmentKind::TaskRef,
            ordinal: n,
            description: description.to_string(),
        })
        .collect()
}

/// Case-insensitive check for any of `needles` in `text`
pub fn mentions(text: &str, needles: &[&str]) -> bool {
    let haystack = text.to_lowercase();
    needles
        .iter()
        .any(|needle| haystack.contains(&needle.to_lowercase()))
}

/// `<TAG><digits><sep><description>`, tag matched case-insensitively
fn parse_tagged_label<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let head = text.get(..tag.len())?;
    if !head.eq_ignore_ascii_case(tag) {
        return None;
    }
    let rest = &text[tag.len()..];
    let (_, rest) = split_number(rest)?;
    description_after_separator(rest)
}

/// `Task <phase>.<n><sep><description>`
fn parse_task_label(text: &str) -> Option<(u32, u32, &str)> {
    const KEYWORD: &str = "task";

    let head = text.get(..KEYWORD.len())?;
    if !head.eq_ignore_ascii_case(KEYWORD) {
        return None;
    }
    let rest = &text[KEYWORD.len()..];
    let rest = rest.strip_prefix(char::is_whitespace)?.trim_start();
    let (phase, rest) = split_number(rest)?;
    let rest = rest.strip_prefix('.')?;
    let (number, rest) = split_number(rest)?;
    let description = description_after_separator(rest)?;
    Some((phase, number, description))
}

/// Leading ASCII digits and the remainder
fn split_number(text: &str) -> Option<(u32, &str)> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    let number = text[..end].parse().ok()?;
    Some((number, &text[end..]))
}

/// Require at least one `:` or whitespace, then a non-empty description
fn description_after_separator(text: &str) -> Option<&str> {
    let description = text.trim_start_matches(|c: char| c == ':' || c.is_whitespace());
    if description.len() == text.len() {
        return None;
    }
    let description = description.trim();
    (!description.is_empty()).then_some(description)
}
