//! Line annotation and restricted display rendering.
//!
//! # Responsibility
//! - Emit `<original> - **<converted>** - Meaning  ## \` for every non-blank
//!   line, using the shared substitution engine.
//! - Render annotated text for display with bold/emphasis spans only.
//!
//! # Invariants
//! - Blank (whitespace-only) lines pass through byte-for-byte.
//! - The annotation suffix, including two spaces before `##` and the
//!   trailing backslash, is a compatibility contract.
//! - Rendering escapes HTML before applying spans; embedded markup is never
//!   interpreted.

use crate::text::substitute::SubstitutionEngine;
use once_cell::sync::Lazy;
use regex::Regex;

/// Separator between the original line and the converted span.
pub const ANNOTATION_SEPARATOR: &str = " - **";
/// Literal tail of every annotation line.
pub const ANNOTATION_SUFFIX: &str = "** - Meaning  ## \\";

const MEANING_MARKER: &str = " - Meaning";

static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold regex"));
static EMPHASIS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("valid emphasis regex"));

/// Original and converted halves of one annotation line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation<'a> {
    pub original: &'a str,
    pub converted: &'a str,
}

/// One display line produced by [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedLine {
    /// Blank input line.
    Break,
    /// Escaped line with `<strong>`/`<em>` spans.
    Html(String),
}

/// Annotates every non-blank line of `text`.
pub fn annotate(engine: &SubstitutionEngine, text: &str) -> String {
    text.split('\n')
        .map(|line| annotate_line(engine, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Annotates one line; blank lines are returned unchanged.
pub fn annotate_line(engine: &SubstitutionEngine, line: &str) -> String {
    if line.trim().is_empty() {
        return line.to_string();
    }
    let converted = engine.apply(line);
    format!("{line}{ANNOTATION_SEPARATOR}{converted}{ANNOTATION_SUFFIX}")
}

/// Splits an annotation line back into its halves.
///
/// The line is split at the first separator. Only an original without
/// ` - **` is recovered intact; otherwise `original` ends at its own first
/// separator. Returns `None` for lines not produced by [`annotate_line`].
pub fn parse_annotation(line: &str) -> Option<Annotation<'_>> {
    let body = line.strip_suffix(ANNOTATION_SUFFIX)?;
    let (original, converted) = body.split_once(ANNOTATION_SEPARATOR)?;
    Some(Annotation {
        original,
        converted,
    })
}

/// Renders annotated text for display, one entry per input line.
pub fn render(text: &str) -> Vec<RenderedLine> {
    text.split('\n').map(render_line).collect()
}

/// Renders one line: escape, bold, emphasis, drop `##`, strip the trailing
/// meaning marker.
pub fn render_line(line: &str) -> RenderedLine {
    if line.trim().is_empty() {
        return RenderedLine::Break;
    }

    let escaped = escape_html(line);
    let bold = BOLD_RE.replace_all(&escaped, "<strong>$1</strong>");
    let emphasized = EMPHASIS_RE.replace_all(&bold, "<em>$1</em>");
    let unmarked = emphasized.replace("##", "");

    let trimmed = unmarked.trim_end_matches(|c: char| c == '\\' || c.is_whitespace());
    let stripped = trimmed.strip_suffix(MEANING_MARKER).map(str::to_string);
    RenderedLine::Html(stripped.unwrap_or(unmarked))
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}
