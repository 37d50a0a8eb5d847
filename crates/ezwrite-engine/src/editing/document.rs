use crate::editing::classify::{self, LineType};
use crate::editing::strike;

/// The authoritative line array of one page.
///
/// Lines are plain strings joined by `\n`; all structure is inferred from
/// them by the classifier. `Document::from_text(&doc.text())` reproduces the
/// same lines exactly, and a document always holds at least one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Raw line texts, struck lines carrying their marker
    pub(crate) lines: Vec<String>,
    /// Version counter incremented on each change (enables change detection)
    pub(crate) version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl Document {
    /// Create a document from its persisted text form.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            version: 0,
        }
    }

    /// Create a document from raw bytes, which must be valid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    /// Create a document from an explicit line array. An empty array becomes
    /// a single empty line.
    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut doc = Self { lines, version: 0 };
        doc.ensure_one_line();
        doc
    }

    /// The persisted text form (lines joined with `\n`).
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Visible text of a line: the raw text without its strike marker.
    pub fn visible(&self, index: usize) -> &str {
        self.line(index).map(strike::clean).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Classify every line of the document.
    pub fn line_types(&self) -> Vec<LineType> {
        classify::classify_all(&self.lines)
    }

    /// Replace the whole line array, bumping the version when it differs.
    /// Returns whether anything changed.
    pub(crate) fn replace_lines(&mut self, lines: Vec<String>) -> bool {
        if lines == self.lines {
            return false;
        }
        self.lines = lines;
        self.ensure_one_line();
        self.version += 1;
        true
    }

    fn ensure_one_line(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("hello")]
    #[case("list\nbuy milk\n\nfoo")]
    #[case("trailing newline\n")]
    #[case("\n\n")]
    #[case("windows\r\nline endings")]
    fn test_text_roundtrip(#[case] text: &str) {
        let doc = Document::from_text(text);
        assert_eq!(doc.text(), text);
        assert_eq!(Document::from_text(&doc.text()), doc);
    }

    #[test]
    fn test_empty_text_has_one_line() {
        let doc = Document::from_text("");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.line(0), Some(""));
    }

    #[test]
    fn test_from_bytes_rejects_invalid_utf8() {
        assert!(Document::from_bytes(&[0xff, 0xfe]).is_err());
        let doc = Document::from_bytes(b"a\nb").unwrap();
        assert_eq!(doc.lines(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_replace_lines_bumps_version_only_on_change() {
        let mut doc = Document::from_text("a\nb");
        assert!(!doc.replace_lines(vec!["a".into(), "b".into()]));
        assert_eq!(doc.version(), 0);

        assert!(doc.replace_lines(vec!["a".into()]));
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn test_replace_with_nothing_keeps_one_line() {
        let mut doc = Document::from_text("a");
        doc.replace_lines(Vec::new());
        assert_eq!(doc.lines(), &[String::new()]);
    }

    #[test]
    fn test_visible_strips_marker() {
        let doc = Document::from_lines(vec!["list".into(), strike::mark("done")]);
        assert_eq!(doc.visible(1), "done");
        assert_eq!(doc.visible(7), "");
    }
}
