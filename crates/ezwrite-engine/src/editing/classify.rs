use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::editing::strike;

static TIMER_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^timer(\s|$)").expect("valid timer directive pattern"));

static TIMER_ARGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^timer\s*(.*)$").expect("valid timer args pattern"));

/// Semantic type of a line, derived from the line and the lines above it.
///
/// Never stored: every classification pass recomputes it from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineType {
    Text,
    Heading1,
    Heading2,
    ListHeader,
    ListItem,
    Divider,
    Timer,
}

impl LineType {
    /// Lines the user types into directly. List headers, dividers and timers
    /// render as widgets and are only removed or replaced as a whole.
    pub fn is_editable(self) -> bool {
        !matches!(self, LineType::ListHeader | LineType::Divider | LineType::Timer)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineType::Text => "text",
            LineType::Heading1 => "heading1",
            LineType::Heading2 => "heading2",
            LineType::ListHeader => "list-header",
            LineType::ListItem => "list-item",
            LineType::Divider => "divider",
            LineType::Timer => "timer",
        }
    }
}

impl std::fmt::Display for LineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a line says about itself, before looking at its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocalKind {
    ListHeader,
    Divider,
    Timer,
    Heading1,
    Heading2,
    Blank,
    Plain,
}

fn local_kind(line: &str) -> LocalKind {
    let clean = strike::clean(line).trim();
    let lower = clean.to_lowercase();

    if lower == "list" {
        LocalKind::ListHeader
    } else if lower == "line" {
        LocalKind::Divider
    } else if TIMER_DIRECTIVE.is_match(&lower) {
        LocalKind::Timer
    } else if clean.starts_with("## ") {
        LocalKind::Heading2
    } else if clean.starts_with("# ") {
        LocalKind::Heading1
    } else if clean.is_empty() {
        LocalKind::Blank
    } else {
        LocalKind::Plain
    }
}

/// Classify the line at `index`.
///
/// Only `lines[..=index]` is consulted. Directive lines classify on their own
/// text; any other non-blank line is a list item when scanning upwards
/// reaches a list header before a blank line, divider, timer or heading.
/// Blank lines are always text and close any open list. An out-of-range
/// index classifies as text.
pub fn classify<S: AsRef<str>>(lines: &[S], index: usize) -> LineType {
    let Some(line) = lines.get(index) else {
        return LineType::Text;
    };

    match local_kind(line.as_ref()) {
        LocalKind::ListHeader => return LineType::ListHeader,
        LocalKind::Divider => return LineType::Divider,
        LocalKind::Timer => return LineType::Timer,
        LocalKind::Heading2 => return LineType::Heading2,
        LocalKind::Heading1 => return LineType::Heading1,
        LocalKind::Blank => return LineType::Text,
        LocalKind::Plain => {}
    }

    for previous in lines[..index].iter().rev() {
        match local_kind(previous.as_ref()) {
            LocalKind::ListHeader => return LineType::ListItem,
            LocalKind::Plain => continue,
            LocalKind::Divider
            | LocalKind::Timer
            | LocalKind::Heading1
            | LocalKind::Heading2
            | LocalKind::Blank => return LineType::Text,
        }
    }

    LineType::Text
}

/// Classify every line of a document.
pub fn classify_all<S: AsRef<str>>(lines: &[S]) -> Vec<LineType> {
    (0..lines.len()).map(|i| classify(lines, i)).collect()
}

/// Whether the line is a `timer` directive (ignoring the strike marker and case).
pub fn is_timer_directive(line: &str) -> bool {
    local_kind(line) == LocalKind::Timer
}

/// The argument string of a timer directive: everything after the `timer`
/// token, trimmed. Empty for a bare `timer` or for non-directive lines.
pub fn timer_args(line: &str) -> String {
    let clean = strike::clean(line).trim();
    TIMER_ARGS
        .captures(clean)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
