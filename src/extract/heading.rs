//! Line-oriented markdown heading scanner
//!
//! Recognises ATX headings (`#` to `######`) and nothing else. Fenced code
//! blocks are skipped so commented shell snippets are not taken as headings.

/// A heading line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading<'a> {
    /// Number of leading `#`
    pub level: usize,
    /// Heading text, trimmed
    pub text: &'a str,
    /// 1-based line number
    pub line: usize,
}

const MAX_LEVEL: usize = 6;

/// Parse one line as a heading
///
/// Whitespace between the hashes and the text is optional, matching how
/// spec authors write `###VAL001: ...` as often as `### VAL001: ...`.
pub fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let level = trimmed.bytes().take_while(|b| *b == b'#').count();
    if level == 0 || level > MAX_LEVEL {
        return None;
    }
    let text = trimmed[level..].trim();
    Some((level, text.trim_end_matches('#').trim_end()))
}

/// Scan every heading in `text`, in document order
pub fn scan_headings(text: &str) -> Vec<Heading<'_>> {
    let mut headings = Vec::new();
    let mut in_fence = false;

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some((level, text)) = parse_heading(line) {
            headings.push(Heading {
                level,
                text,
                line: index + 1,
            });
        }
    }

    headings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_heading_levels() {
        assert_eq!(parse_heading("# Title"), Some((1, "Title")));
        assert_eq!(parse_heading("### VAL001: Foo"), Some((3, "VAL001: Foo")));
        assert_eq!(parse_heading("###VAL001: Foo"), Some((3, "VAL001: Foo")));
        assert_eq!(parse_heading("  ## Indented  "), Some((2, "Indented")));
        assert_eq!(parse_heading("## Closed ##"), Some((2, "Closed")));
        assert_eq!(parse_heading("####### too deep"), None);
        assert_eq!(parse_heading("plain text"), None);
        assert_eq!(parse_heading(""), None);
    }

    #[test]
    fn test_scan_skips_fenced_code() {
        let text = "# Doc\n```bash\n# not a heading\n```\n### Real\n";
        let headings = scan_headings(text);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].text, "Doc");
        assert_eq!(headings[1].text, "Real");
        assert_eq!(headings[1].line, 5);
    }
}
