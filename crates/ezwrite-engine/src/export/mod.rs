//! Text exports of a classified document.
//!
//! Exporters only read the line array and its types; nothing in the editing
//! core depends on them.

use chrono::NaiveDate;

use crate::editing::classify::LineType;
use crate::editing::document::Document;
use crate::editing::strike;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    PlainText,
    Markdown,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::PlainText => "txt",
            ExportFormat::Markdown => "md",
        }
    }
}

/// `ezwrite-YYYY-MM-DD.<ext>`
pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!("ezwrite-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

pub fn export(doc: &Document, format: ExportFormat) -> String {
    let types = doc.line_types();
    match format {
        ExportFormat::PlainText => to_plain_text(doc.lines(), &types),
        ExportFormat::Markdown => to_markdown(doc.lines(), &types),
    }
}

/// Plain text: struck lines read `[x] <text>`, directives stay as typed.
pub fn to_plain_text<S: AsRef<str>>(lines: &[S], types: &[LineType]) -> String {
    lines
        .iter()
        .zip(types)
        .map(|(line, kind)| {
            let line = line.as_ref();
            let visible = strike::clean(line);
            match kind {
                LineType::ListHeader | LineType::Divider | LineType::Timer => {
                    visible.trim().to_string()
                }
                _ if strike::is_struck(line) => format!("[x] {visible}"),
                _ => visible.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Markdown: list items become task list entries and dividers rules. List
/// headers and timers have no Markdown form and are left out.
pub fn to_markdown<S: AsRef<str>>(lines: &[S], types: &[LineType]) -> String {
    lines
        .iter()
        .zip(types)
        .filter_map(|(line, kind)| {
            let line = line.as_ref();
            let visible = strike::clean(line);
            match kind {
                LineType::ListHeader | LineType::Timer => None,
                LineType::Divider => Some("---".to_string()),
                LineType::ListItem => {
                    let check = if strike::is_struck(line) { 'x' } else { ' ' };
                    Some(format!("- [{check}] {}", visible.trim_start()))
                }
                _ if strike::is_struck(line) => Some(format!("- [x] {visible}")),
                _ => Some(visible.to_string()),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::strike::STRUCK_MARKER;
    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Event, Options, Parser};

    fn doc(lines: &[&str]) -> Document {
        Document::from_text(&lines.join("\n"))
    }

    fn mixed() -> Document {
        let struck = format!("{STRUCK_MARKER}buy milk");
        doc(&["# Shopping", "list", &struck, "eggs", "", "line", "timer 5", "done"])
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            export(&mixed(), ExportFormat::PlainText),
            "# Shopping\nlist\n[x] buy milk\neggs\n\nline\ntimer 5\ndone"
        );
    }

    #[test]
    fn test_markdown() {
        assert_eq!(
            export(&mixed(), ExportFormat::Markdown),
            "# Shopping\n- [x] buy milk\n- [ ] eggs\n\n---\ndone"
        );
    }

    #[test]
    fn test_markdown_parses_as_task_list() {
        let markdown = export(&mixed(), ExportFormat::Markdown);
        let markers: Vec<bool> = Parser::new_ext(&markdown, Options::ENABLE_TASKLISTS)
            .filter_map(|event| match event {
                Event::TaskListMarker(checked) => Some(checked),
                _ => None,
            })
            .collect();
        assert_eq!(markers, vec![true, false]);
    }

    #[test]
    fn test_file_names() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            export_file_name(ExportFormat::PlainText, date),
            "ezwrite-2024-03-09.txt"
        );
        assert_eq!(
            export_file_name(ExportFormat::Markdown, date),
            "ezwrite-2024-03-09.md"
        );
    }
}
