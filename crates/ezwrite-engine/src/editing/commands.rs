use crate::editing::classify::LineType;
use crate::editing::cursor::{LogicalCursor, utf16_len, utf16_to_byte};
use crate::editing::slash::SlashCommand;
use crate::editing::strike;

/// Indent inserted by Tab
pub const INDENT: &str = "        ";

/// Direction for line reordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Structural edits. Each one computes a whole new line array and an
/// explicit cursor target; none of them reads the rendered surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Enter: split the cursor line at the cursor
    SplitLine,
    /// Backspace at the start of `line`
    MergeWithPrevious { line: usize },
    /// Delete at the end of `line`
    MergeWithNext { line: usize },
    /// Swap the cursor line with its neighbour
    MoveLine { direction: Direction },
    /// Check or uncheck a list item
    ToggleStrike { line: usize },
    DeleteLine { line: usize },
    Indent { line: usize },
    Unindent { line: usize },
    /// Insert text that may span several lines at the cursor
    InsertText { text: String },
    /// Replace the triggering line with a slash command's directive
    ApplySlash { line: usize, command: SlashCommand },
    /// Leave timer-edit mode keeping the directive
    FinalizeTimer { line: usize },
    /// Leave timer-edit mode discarding the directive
    CancelTimer { line: usize },
}

/// Outcome of compiling a command: the complete new document and where the
/// cursor goes in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub lines: Vec<String>,
    pub cursor: LogicalCursor,
}

impl Edit {
    fn new(lines: Vec<String>, line: usize, offset: usize) -> Self {
        Self {
            lines,
            cursor: LogicalCursor::new(line, offset),
        }
    }
}

fn visible_len(lines: &[String], index: usize) -> usize {
    lines
        .get(index)
        .map(|line| utf16_len(strike::clean(line)))
        .unwrap_or(0)
}

fn editable(types: &[LineType], index: usize) -> bool {
    types.get(index).is_some_and(|kind| kind.is_editable())
}

/// Split a line's visible text at a UTF-16 offset, keeping the marker with
/// the head.
fn split_visible(line: &str, offset: usize) -> (String, String) {
    let visible = strike::clean(line);
    let byte = utf16_to_byte(visible, offset);
    let head = strike::set_struck(&visible[..byte], strike::is_struck(line));
    (head, visible[byte..].to_string())
}

/// Compile `cmd` against the current lines, their types and the cursor.
/// Returns `None` when the command does not apply (e.g. moving the first
/// line up), which callers treat as a no-op.
pub(crate) fn compile_command(
    lines: &[String],
    types: &[LineType],
    cursor: LogicalCursor,
    cmd: &Cmd,
) -> Option<Edit> {
    let mut lines = lines.to_vec();
    let last = lines.len().checked_sub(1)?;

    match cmd {
        Cmd::SplitLine => {
            let at = cursor.line.min(last);
            if !editable(types, at) {
                lines.insert(at + 1, String::new());
                return Some(Edit::new(lines, at + 1, 0));
            }
            let (head, tail) = split_visible(&lines[at], cursor.offset);
            lines[at] = head;
            lines.insert(at + 1, tail);
            Some(Edit::new(lines, at + 1, 0))
        }
        Cmd::MergeWithPrevious { line } => {
            let line = *line;
            if line > last {
                return None;
            }
            if !editable(types, line) {
                lines.remove(line);
                if lines.is_empty() {
                    lines.push(String::new());
                }
                return match line.checked_sub(1) {
                    Some(previous) => {
                        let offset = visible_len(&lines, previous);
                        Some(Edit::new(lines, previous, offset))
                    }
                    None => Some(Edit::new(lines, 0, 0)),
                };
            }
            let previous = line.checked_sub(1)?;
            if !editable(types, previous) {
                lines.remove(previous);
                return Some(Edit::new(lines, previous, 0));
            }
            let joint = visible_len(&lines, previous);
            let current = lines.remove(line);
            lines[previous].push_str(strike::clean(&current));
            Some(Edit::new(lines, previous, joint))
        }
        Cmd::MergeWithNext { line } => {
            let line = *line;
            if line > last {
                return None;
            }
            if !editable(types, line) {
                lines.remove(line);
                if lines.is_empty() {
                    lines.push(String::new());
                }
                let line = line.min(lines.len() - 1);
                return Some(Edit::new(lines, line, 0));
            }
            let next = line + 1;
            if next > last {
                return None;
            }
            let joint = visible_len(&lines, line);
            if !editable(types, next) {
                lines.remove(next);
                return Some(Edit::new(lines, line, joint));
            }
            let following = lines.remove(next);
            lines[line].push_str(strike::clean(&following));
            Some(Edit::new(lines, line, joint))
        }
        Cmd::MoveLine { direction } => {
            let from = cursor.line.min(last);
            let to = match direction {
                Direction::Up => from.checked_sub(1)?,
                Direction::Down if from < last => from + 1,
                Direction::Down => return None,
            };
            lines.swap(from, to);
            Some(Edit::new(lines, to, cursor.offset))
        }
        Cmd::ToggleStrike { line } => {
            let line = *line;
            if types.get(line) != Some(&LineType::ListItem) {
                return None;
            }
            lines[line] = strike::set_struck(&lines[line], !strike::is_struck(&lines[line]));
            Some(Edit { lines, cursor })
        }
        Cmd::DeleteLine { line } => {
            let line = *line;
            if line > last {
                return None;
            }
            lines.remove(line);
            if lines.is_empty() {
                lines.push(String::new());
            }
            let target = if cursor.line > line {
                LogicalCursor::new(cursor.line - 1, cursor.offset)
            } else if cursor.line == line {
                LogicalCursor::new(line.min(lines.len() - 1), 0)
            } else {
                cursor
            };
            Some(Edit {
                lines,
                cursor: target,
            })
        }
        Cmd::Indent { line } => {
            let line = *line;
            if !editable(types, line) {
                return None;
            }
            let struck = strike::is_struck(&lines[line]);
            let indented = format!("{INDENT}{}", strike::clean(&lines[line]));
            lines[line] = strike::set_struck(&indented, struck);
            let shift = utf16_len(INDENT);
            let target = if cursor.line == line {
                LogicalCursor::new(line, cursor.offset + shift)
            } else {
                cursor
            };
            Some(Edit {
                lines,
                cursor: target,
            })
        }
        Cmd::Unindent { line } => {
            let line = *line;
            if !editable(types, line) {
                return None;
            }
            let visible = strike::clean(&lines[line]);
            let removed = visible
                .chars()
                .take(INDENT.len())
                .take_while(|&c| c == ' ')
                .count();
            if removed == 0 {
                return None;
            }
            let rest = strike::set_struck(&visible[removed..], strike::is_struck(&lines[line]));
            lines[line] = rest;
            let target = if cursor.line == line {
                LogicalCursor::new(line, cursor.offset.saturating_sub(removed))
            } else {
                cursor
            };
            Some(Edit {
                lines,
                cursor: target,
            })
        }
        Cmd::InsertText { text } => {
            let text = text.replace("\r\n", "\n").replace('\r', "\n");
            if text.is_empty() {
                return None;
            }
            let at = cursor.line.min(last);
            let mut pieces: Vec<String> = text.split('\n').map(str::to_string).collect();

            if !editable(types, at) {
                let count = pieces.len();
                let end = utf16_len(&pieces[count - 1]);
                lines.splice(at + 1..at + 1, pieces);
                return Some(Edit::new(lines, at + count, end));
            }

            let (head, tail) = split_visible(&lines[at], cursor.offset);
            let count = pieces.len();
            let end = if count == 1 {
                utf16_len(strike::clean(&head)) + utf16_len(&pieces[0])
            } else {
                utf16_len(&pieces[count - 1])
            };
            pieces[0] = format!("{head}{}", pieces[0]);
            pieces[count - 1].push_str(&tail);
            lines.splice(at..=at, pieces);
            Some(Edit::new(lines, at + count - 1, end))
        }
        Cmd::ApplySlash { line, command } => {
            let line = *line;
            if line > last {
                return None;
            }
            if command.name == "timer" {
                lines[line] = "timer ".to_string();
                return Some(Edit::new(lines, line, utf16_len("timer ")));
            }
            lines[line] = command.name.to_string();
            if line == last {
                lines.push(String::new());
            }
            Some(Edit::new(lines, line + 1, 0))
        }
        Cmd::FinalizeTimer { line } => {
            let line = *line;
            if line > last {
                return None;
            }
            lines[line] = lines[line].trim().to_string();
            if line == last {
                lines.push(String::new());
            }
            Some(Edit::new(lines, line + 1, 0))
        }
        Cmd::CancelTimer { line } => {
            let line = *line;
            if line > last {
                return None;
            }
            lines[line] = String::new();
            Some(Edit::new(lines, line, 0))
        }
    }
}
