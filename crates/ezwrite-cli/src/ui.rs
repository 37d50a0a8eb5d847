//! Drawing the engine's surface into the terminal, and mapping mouse
//! positions back onto it.

use ezwrite_engine::editing::cursor::{byte_to_utf16, utf16_to_byte};
use ezwrite_engine::editing::{LineType, LogicalCursor, SurfaceLine, SurfaceNode, TextSegment};
use ezwrite_engine::PAGE_COUNT;
use ezwrite_engine::timer::TimerView;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::App;

const DELETE_BUTTON: &str = " ✕";
const POPUP_WIDTH: u16 = 34;

/// What a mouse press landed on.
pub enum Hit {
    Checkbox(usize),
    Delete(usize),
    Text(LogicalCursor),
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(f.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" ezwrite · page {} ", app.editor.active_page() + 1));
    let area = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);
    app.editor_area = area;

    let cursor = app.editor.cursor();
    let height = usize::from(area.height.max(1));
    if cursor.line < app.scroll {
        app.scroll = cursor.line;
    } else if cursor.line >= app.scroll + height {
        app.scroll = cursor.line + 1 - height;
    }

    let timers = app.editor.timer_views();
    let lines: Vec<Line> = app
        .editor
        .surface()
        .lines()
        .iter()
        .enumerate()
        .skip(app.scroll)
        .take(height)
        .map(|(index, line)| render_line(index, line, &timers, area.width))
        .collect();
    f.render_widget(Paragraph::new(lines), area);

    let (cursor_x, cursor_y) = cursor_position(app, cursor);
    f.set_cursor_position((cursor_x, cursor_y));

    app.popup_area = None;
    if let Some(popup) = app.editor.slash_popup() {
        let rows = u16::try_from(popup.matches.len()).unwrap_or(u16::MAX) + 2;
        let y = if cursor_y + 1 + rows <= area.bottom() {
            cursor_y + 1
        } else {
            cursor_y.saturating_sub(rows)
        };
        let popup_area = Rect::new(cursor_x, y, POPUP_WIDTH, rows).intersection(f.area());

        let items: Vec<ListItem> = popup
            .matches
            .iter()
            .enumerate()
            .map(|(i, cmd)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::raw(format!("/{:<6}", cmd.name)),
                    Span::styled(cmd.description, Style::default().fg(Color::Gray)),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
        let mut state = ListState::default();
        state.select(Some(popup.highlight));

        f.render_widget(Clear, popup_area);
        f.render_stateful_widget(list, popup_area, &mut state);
        app.popup_area = Some(popup_area);
    }

    f.render_widget(Paragraph::new(status_line(app)), chunks[1]);
}

fn render_line(index: usize, line: &SurfaceLine, timers: &[TimerView], width: u16) -> Line<'static> {
    let text_style = text_style(line);
    let mut spans = Vec::new();

    for node in &line.nodes {
        match node {
            SurfaceNode::Text(_) => {
                spans.extend(line.segments().into_iter().map(|segment| match segment {
                    TextSegment::Plain(text) => Span::styled(text, text_style),
                    TextSegment::Bold(text) => {
                        Span::styled(text, text_style.add_modifier(Modifier::BOLD))
                    }
                }))
            }
            SurfaceNode::Checkbox { checked } => spans.push(Span::styled(
                if *checked { "[x] " } else { "[ ] " },
                Style::default().fg(Color::Green),
            )),
            SurfaceNode::Label(label) => spans.push(Span::styled(
                label.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            SurfaceNode::Rule => spans.push(Span::styled(
                "─".repeat(rule_width(width)),
                Style::default().fg(Color::DarkGray),
            )),
            SurfaceNode::DeleteButton => {
                spans.push(Span::styled(DELETE_BUTTON, Style::default().fg(Color::Red)))
            }
            SurfaceNode::TimerSlot { .. } => spans.push(timer_span(index, timers)),
        }
    }

    Line::from(spans)
}

fn text_style(line: &SurfaceLine) -> Style {
    let style = match line.kind {
        LineType::Heading1 => Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineType::Heading2 => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default(),
    };
    if line.struck {
        style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
    } else {
        style
    }
}

fn timer_span(index: usize, timers: &[TimerView]) -> Span<'static> {
    match timers.iter().find(|view| view.line == index) {
        Some(view) => {
            let paused = if !view.running && !view.done { " ⏸" } else { "" };
            let color = if view.done { Color::Green } else { Color::Magenta };
            Span::styled(
                format!("⏱ {} {}{paused}", view.label, view.display),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        }
        None => Span::styled("⏱ --:--", Style::default().fg(Color::DarkGray)),
    }
}

fn rule_width(width: u16) -> usize {
    usize::from(width).saturating_sub(DELETE_BUTTON.width()).max(1)
}

/// Columns taken by a decoration node.
fn node_width(node: &SurfaceNode, width: u16) -> usize {
    match node {
        SurfaceNode::Text(_) | SurfaceNode::TimerSlot { .. } => 0,
        SurfaceNode::Checkbox { .. } => "[ ] ".width(),
        SurfaceNode::Label(label) => label.width(),
        SurfaceNode::Rule => rule_width(width),
        SurfaceNode::DeleteButton => DELETE_BUTTON.width(),
    }
}

/// Columns before the editable text of a line.
fn text_indent(line: &SurfaceLine, width: u16) -> usize {
    line.nodes
        .iter()
        .take_while(|node| !matches!(node, SurfaceNode::Text(_)))
        .map(|node| node_width(node, width))
        .sum()
}

fn cursor_position(app: &App, cursor: LogicalCursor) -> (u16, u16) {
    let area = app.editor_area;
    let row = u16::try_from(cursor.line.saturating_sub(app.scroll)).unwrap_or(u16::MAX);
    let y = area.y.saturating_add(row).min(area.bottom().saturating_sub(1));

    let column = match app.editor.surface().line(cursor.line) {
        Some(line) if line.editable => {
            let text = line.text();
            let before = &text[..utf16_to_byte(&text, cursor.offset)];
            text_indent(line, area.width) + before.width()
        }
        _ => 0,
    };
    let column = u16::try_from(column).unwrap_or(u16::MAX);
    let x = area.x.saturating_add(column).min(area.right().saturating_sub(1));
    (x, y)
}

pub fn popup_entry_at(area: Rect, column: u16, row: u16) -> Option<usize> {
    let inside = column > area.x
        && column < area.right().saturating_sub(1)
        && row > area.y
        && row < area.bottom().saturating_sub(1);
    inside.then(|| usize::from(row - area.y - 1))
}

pub fn hit_test(app: &App, column: u16, row: u16) -> Option<Hit> {
    let area = app.editor_area;
    if column < area.x || column >= area.right() || row < area.y || row >= area.bottom() {
        return None;
    }
    let index = app.scroll + usize::from(row - area.y);
    let line = app.editor.surface().line(index)?;
    let column = usize::from(column - area.x);

    let mut x = 0;
    for node in &line.nodes {
        let width = node_width(node, area.width);
        let hit = column >= x && column < x + width;
        match node {
            SurfaceNode::Checkbox { .. } if hit => return Some(Hit::Checkbox(index)),
            SurfaceNode::DeleteButton if hit => return Some(Hit::Delete(index)),
            _ => {}
        }
        x += width;
    }

    if !line.editable {
        return Some(Hit::Text(LogicalCursor::new(index, 0)));
    }

    let text = line.text();
    let target = column.saturating_sub(text_indent(line, area.width));
    let mut used = 0;
    let mut byte = text.len();
    for (at, c) in text.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > target {
            byte = at;
            break;
        }
        used += w;
    }
    Some(Hit::Text(LogicalCursor::new(index, byte_to_utf16(&text, byte))))
}

fn status_line(app: &App) -> Line<'static> {
    let typing = if app.editor.is_typing() {
        Span::styled("● ", Style::default().fg(Color::Green))
    } else {
        Span::styled("○ ", Style::default().fg(Color::DarkGray))
    };
    let mut spans = vec![
        typing,
        Span::styled(
            format!("page {}/{PAGE_COUNT}  ", app.editor.active_page() + 1),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("{status}  "),
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::styled(
        "^Q quit | ^Z/^Y undo/redo | ^D check | ^K delete | ^P/^R/^S timer | ^E/^T export | F1-F5 pages",
        Style::default().fg(Color::DarkGray),
    ));
    Line::from(spans)
}
