//! Cursor mapping between the logical line model and the rendered surface.
//!
//! A [`LogicalCursor`] addresses a line and a UTF-16 offset into its visible
//! text. A [`SurfacePoint`] addresses a node of a rendered [`Surface`] line,
//! the way a DOM selection addresses a text node. Decorations (checkboxes,
//! delete buttons, timer slots) contribute nothing to the logical offset.

use serde::{Deserialize, Serialize};

use crate::editing::surface::{Surface, SurfaceNode};

/// Position in the logical line model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct LogicalCursor {
    /// Line index in the document
    pub line: usize,
    /// UTF-16 code units into the visible text (strike marker excluded)
    pub offset: usize,
}

impl LogicalCursor {
    pub fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

/// Position in the rendered surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct SurfacePoint {
    /// Surface line index
    pub line: usize,
    /// Node index within the line; `nodes.len()` means "after every node"
    pub node: usize,
    /// UTF-16 offset inside a text node, 0 otherwise
    pub offset: usize,
}

/// Length of `s` in UTF-16 code units.
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Byte index of the character boundary at or before UTF-16 `offset`.
/// Offsets past the end clamp to `s.len()`.
pub fn utf16_to_byte(s: &str, offset: usize) -> usize {
    let mut units = 0;
    for (byte, ch) in s.char_indices() {
        let next = units + ch.len_utf16();
        if next > offset {
            return byte;
        }
        units = next;
    }
    s.len()
}

/// UTF-16 offset of byte index `byte` (clamped to `s.len()`).
pub fn byte_to_utf16(s: &str, byte: usize) -> usize {
    let byte = byte.min(s.len());
    s.char_indices()
        .take_while(|(i, _)| *i < byte)
        .map(|(_, ch)| ch.len_utf16())
        .sum()
}

/// Place the surface focus at `target`.
///
/// The line clamps to the last surface line and the offset to the end of the
/// line's visible text. Lines without editable text get a point after their
/// decorations.
pub fn set_cursor(surface: &Surface, target: LogicalCursor) -> SurfacePoint {
    let Some(last) = surface.len().checked_sub(1) else {
        return SurfacePoint::default();
    };
    let line = target.line.min(last);
    let nodes = &surface.lines()[line].nodes;

    let mut remaining = target.offset;
    let mut last_text = None;
    for (index, node) in nodes.iter().enumerate() {
        if let SurfaceNode::Text(text) = node {
            let len = utf16_len(text);
            if remaining <= len {
                return SurfacePoint {
                    line,
                    node: index,
                    offset: remaining,
                };
            }
            remaining -= len;
            last_text = Some((index, len));
        }
    }

    match last_text {
        Some((node, offset)) => SurfacePoint { line, node, offset },
        None => SurfacePoint {
            line,
            node: nodes.len(),
            offset: 0,
        },
    }
}

/// Recover the logical position of a surface point.
pub fn get_cursor(surface: &Surface, point: SurfacePoint) -> LogicalCursor {
    let Some(last) = surface.len().checked_sub(1) else {
        return LogicalCursor::default();
    };
    let line = point.line.min(last);
    let nodes = &surface.lines()[line].nodes;

    let before: usize = nodes
        .iter()
        .take(point.node)
        .filter_map(|node| match node {
            SurfaceNode::Text(text) => Some(utf16_len(text)),
            _ => None,
        })
        .sum();

    let within = match nodes.get(point.node) {
        Some(SurfaceNode::Text(text)) => point.offset.min(utf16_len(text)),
        _ => 0,
    };

    LogicalCursor {
        line,
        offset: before + within,
    }
}

/// Clamp a logical cursor to what the surface can hold.
pub fn clamp(surface: &Surface, cursor: LogicalCursor) -> LogicalCursor {
    get_cursor(surface, set_cursor(surface, cursor))
}
