use crate::editing::classify::{self, LineType};
use crate::editing::cursor::{SurfacePoint, utf16_len, utf16_to_byte};
use crate::editing::strike;

/// One node of a rendered line.
///
/// Only [`SurfaceNode::Text`] is editable; everything else is a decoration
/// the cursor mapper skips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceNode {
    /// Editable visible text
    Text(String),
    /// Checklist checkbox in front of a list item
    Checkbox { checked: bool },
    /// Fixed caption, e.g. the "list" of a list header
    Label(String),
    /// Horizontal rule of a divider
    Rule,
    /// Button removing the whole line
    DeleteButton,
    /// Mount point for a running timer widget
    TimerSlot { config: String },
}

impl SurfaceNode {
    pub fn is_editable(&self) -> bool {
        matches!(self, SurfaceNode::Text(_))
    }
}

/// Styled run of a line's text. Concatenating the segments of a line gives
/// back its text; `**` delimiters stay inside [`TextSegment::Bold`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment {
    Plain(String),
    Bold(String),
}

/// A rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceLine {
    /// Rendering type; a timer line being edited renders as text
    pub kind: LineType,
    /// Whether the source line carries the strike marker
    pub struck: bool,
    /// Whether the user can type into this line
    pub editable: bool,
    pub nodes: Vec<SurfaceNode>,
    /// Raw source of non-editable lines, returned verbatim on extraction
    source: Option<String>,
}

impl SurfaceLine {
    /// The editable text of the line (decorations excluded).
    pub fn text(&self) -> String {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                SurfaceNode::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Visible text length in UTF-16 code units.
    pub fn text_len(&self) -> usize {
        utf16_len(&self.text())
    }

    /// Split the text into plain and `**bold**` runs.
    pub fn segments(&self) -> Vec<TextSegment> {
        bold_segments(&self.text())
    }

    /// The raw line this surface line extracts back to.
    pub fn extract(&self) -> String {
        if let Some(source) = &self.source {
            return source.clone();
        }
        let text = self.text();
        if self.struck { strike::mark(&text) } else { text }
    }
}

/// The rendered, directly editable form of a document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Surface {
    lines: Vec<SurfaceLine>,
}

impl Surface {
    pub fn lines(&self) -> &[SurfaceLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&SurfaceLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Insert `text` (no newlines) at a point inside an editable text node,
    /// returning the point after the inserted text. Points outside editable
    /// text are ignored.
    pub fn insert_text(&mut self, at: SurfacePoint, text: &str) -> Option<SurfacePoint> {
        let node = self.text_node_mut(at)?;
        let byte = utf16_to_byte(node, at.offset);
        node.insert_str(byte, text);
        Some(SurfacePoint {
            offset: utf16_len(&node[..byte]) + utf16_len(text),
            ..at
        })
    }

    /// Remove the character before the point within its text node.
    pub fn delete_backward(&mut self, at: SurfacePoint) -> Option<SurfacePoint> {
        let node = self.text_node_mut(at)?;
        let end = utf16_to_byte(node, at.offset);
        let (start, _) = node[..end].char_indices().next_back()?;
        node.replace_range(start..end, "");
        Some(SurfacePoint {
            offset: utf16_len(&node[..start]),
            ..at
        })
    }

    /// Remove the character after the point within its text node.
    pub fn delete_forward(&mut self, at: SurfacePoint) -> Option<SurfacePoint> {
        let node = self.text_node_mut(at)?;
        let start = utf16_to_byte(node, at.offset);
        let ch = node[start..].chars().next()?;
        node.replace_range(start..start + ch.len_utf8(), "");
        Some(SurfacePoint {
            offset: utf16_len(&node[..start]),
            ..at
        })
    }

    fn text_node_mut(&mut self, at: SurfacePoint) -> Option<&mut String> {
        let line = self.lines.get_mut(at.line)?;
        if !line.editable {
            return None;
        }
        match line.nodes.get_mut(at.node)? {
            SurfaceNode::Text(text) => Some(text),
            _ => None,
        }
    }

    /// HTML rendering of the surface, as a content-editable host would show it.
    pub fn to_html(&self) -> String {
        use html_escape::{encode_double_quoted_attribute, encode_text};

        let mut html = String::new();
        for (index, line) in self.lines.iter().enumerate() {
            html.push_str(&format!("<div data-type=\"{}\"", line.kind));
            if !line.editable {
                html.push_str(" contenteditable=\"false\"");
            }
            if line.kind == LineType::ListItem {
                html.push_str(&format!(" data-struck=\"{}\"", line.struck));
            }
            html.push('>');

            for node in &line.nodes {
                match node {
                    SurfaceNode::Text(text) => {
                        let body = if text.is_empty() {
                            "<br>".to_string()
                        } else {
                            encode_text(text).into_owned()
                        };
                        if line.kind == LineType::ListItem {
                            html.push_str(&format!("<span class=\"ce-li-text\">{body}</span>"));
                        } else {
                            html.push_str(&body);
                        }
                    }
                    SurfaceNode::Checkbox { checked } => {
                        let class = if *checked { " ce-checked" } else { "" };
                        html.push_str(&format!(
                            "<span contenteditable=\"false\" class=\"ce-checkbox{class}\" data-action=\"toggle\" data-line=\"{index}\"></span>"
                        ));
                    }
                    SurfaceNode::Label(label) => {
                        html.push_str(&format!("<span class=\"ce-label\">{}</span>", encode_text(label)));
                    }
                    SurfaceNode::Rule => html.push_str("<hr/>"),
                    SurfaceNode::DeleteButton => html.push_str(&format!(
                        "<button data-action=\"delete\" data-line=\"{index}\">✕</button>"
                    )),
                    SurfaceNode::TimerSlot { config } => html.push_str(&format!(
                        "<span class=\"ce-timer\" data-timer-config=\"{}\" data-timer-slot=\"{index}\"></span>",
                        encode_double_quoted_attribute(config)
                    )),
                }
            }
            html.push_str("</div>");
        }
        html
    }
}

/// Render lines into a surface. `types` must come from classifying `lines`;
/// `editing_timer_line` renders that timer line as plain editable text.
pub fn render_surface<S: AsRef<str>>(
    lines: &[S],
    types: &[LineType],
    editing_timer_line: Option<usize>,
) -> Surface {
    let lines = lines
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let raw = raw.as_ref();
            let kind = types.get(index).copied().unwrap_or(LineType::Text);
            let kind = if kind == LineType::Timer && editing_timer_line == Some(index) {
                LineType::Text
            } else {
                kind
            };
            render_line(raw, kind)
        })
        .collect();
    Surface { lines }
}

fn render_line(raw: &str, kind: LineType) -> SurfaceLine {
    let struck = strike::is_struck(raw);
    let visible = strike::clean(raw).to_string();

    let (nodes, source) = match kind {
        LineType::Text | LineType::Heading1 | LineType::Heading2 => {
            (vec![SurfaceNode::Text(visible)], None)
        }
        LineType::ListItem => (
            vec![
                SurfaceNode::Checkbox { checked: struck },
                SurfaceNode::Text(visible),
            ],
            None,
        ),
        LineType::ListHeader => (
            vec![SurfaceNode::Label("list".to_string()), SurfaceNode::DeleteButton],
            Some(raw.to_string()),
        ),
        LineType::Divider => (
            vec![SurfaceNode::Rule, SurfaceNode::DeleteButton],
            Some(raw.to_string()),
        ),
        LineType::Timer => (
            vec![SurfaceNode::TimerSlot {
                config: classify::timer_args(raw),
            }],
            Some(raw.to_string()),
        ),
    };

    SurfaceLine {
        kind,
        struck,
        editable: kind.is_editable(),
        nodes,
        source,
    }
}

/// Extract the line array back out of a surface.
pub fn extract_lines(surface: &Surface) -> Vec<String> {
    surface.lines.iter().map(SurfaceLine::extract).collect()
}

fn bold_segments(text: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            break;
        };
        if close == 0 {
            // "****" has no content; keep it as plain text
            segments.push(TextSegment::Plain(rest[..open + 4].to_string()));
            rest = &rest[open + 4..];
            continue;
        }
        if open > 0 {
            segments.push(TextSegment::Plain(rest[..open].to_string()));
        }
        let end = open + 2 + close + 2;
        segments.push(TextSegment::Bold(rest[open..end].to_string()));
        rest = &rest[end..];
    }

    if !rest.is_empty() {
        segments.push(TextSegment::Plain(rest.to_string()));
    }
    segments
}
