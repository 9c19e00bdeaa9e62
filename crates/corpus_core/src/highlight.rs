//! Line-windowed previews and literal match highlighting.
//!
//! The helpers are pure: they never touch the source text and they treat the
//! query as a literal string, whatever punctuation it contains.

use regex::{Regex, RegexBuilder};

/// Number of lines shown in a preview unless the caller asks otherwise.
pub const DEFAULT_PREVIEW_LINES: usize = 3;

/// Line prepended to a preview whose window does not start at the top.
pub const TRUNCATED_BEFORE_MARKER: &str = "\u{2026}";

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preview {
    pub text: String,
    pub truncated_before: bool,
    pub truncated_after: bool,
}

/// Returns at most `max_lines` lines of `doc`, starting at the first line
/// that contains `query` (case-insensitive) or at the top when nothing
/// matches.
pub fn preview(doc: &str, query: &str, max_lines: usize) -> Preview {
    let lines: Vec<&str> = doc.lines().collect();
    if lines.is_empty() {
        return Preview::default();
    }

    let start = literal_matcher(query)
        .and_then(|matcher| lines.iter().position(|line| matcher.is_match(line)))
        .unwrap_or(0);
    let end = (start + max_lines).min(lines.len());

    let truncated_before = start > 0;
    let truncated_after = lines.len() - start > max_lines;

    let mut text = String::new();
    if truncated_before {
        text.push_str(TRUNCATED_BEFORE_MARKER);
        text.push('\n');
    }
    text.push_str(&lines[start..end].join("\n"));

    Preview {
        text,
        truncated_before,
        truncated_after,
    }
}

/// Wraps every occurrence of `query` in `text` with `<mark>` tags.
///
/// Matching is case-insensitive, non-overlapping and left to right. An empty
/// query returns `text` unchanged. The text itself is not escaped; use
/// [`highlight_escaped`] when the result is treated as markup.
pub fn highlight(text: &str, query: &str) -> String {
    mark_matches(text, query, String::push_str)
}

/// Like [`highlight`], but `&`, `<` and `>` in `text` are escaped as
/// entities, so the inserted tags are the only markup in the result.
pub fn highlight_escaped(text: &str, query: &str) -> String {
    mark_matches(text, query, push_escaped)
}

fn mark_matches(text: &str, query: &str, push: fn(&mut String, &str)) -> String {
    let mut out = String::with_capacity(text.len());
    let Some(matcher) = literal_matcher(query) else {
        push(&mut out, text);
        return out;
    };

    let mut last = 0;
    for found in matcher.find_iter(text) {
        push(&mut out, &text[last..found.start()]);
        out.push_str(MARK_OPEN);
        push(&mut out, found.as_str());
        out.push_str(MARK_CLOSE);
        last = found.end();
    }
    push(&mut out, &text[last..]);
    out
}

fn push_escaped(out: &mut String, segment: &str) {
    for ch in segment.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            ch => out.push(ch),
        }
    }
}

/// Builds a case-insensitive matcher for `query` taken literally.
fn literal_matcher(query: &str) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }
    // An escaped literal always compiles; the size limit is the only failure.
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .ok()
}
