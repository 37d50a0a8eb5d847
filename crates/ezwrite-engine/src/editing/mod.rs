/*!
 * # Editing Core Module
 *
 * The structured-line editing engine. A page is a flat array of text lines;
 * headings, checklists, dividers and timers are inferred from the lines
 * themselves and never stored.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: the line array
 * - [`Document`] owns the raw lines of the active page
 * - Struck checklist items carry an invisible marker prefix ([`strike`])
 * - **Lossless round-trip**: saving writes the joined lines verbatim
 *
 * ### 2. Derived structure
 * - [`classify`] assigns a [`LineType`] to each line by scanning backwards
 *   over the lines above it only
 * - [`surface`] renders lines into editable text and decorations; extracting
 *   a rendered surface gives back the exact same lines
 *
 * ### 3. Two explicit sync paths
 * - **Direct**: a keystroke edits the surface in place, the lines are
 *   extracted and the surface is kept as long as no line changed type
 * - **Structural**: a [`Cmd`] computes the new line array and cursor target,
 *   and the whole surface is rebuilt from it
 *
 * ### 4. Cursor mapping
 * - [`cursor`] converts between logical `(line, utf16 offset)` positions and
 *   surface points, skipping decorations
 *
 * ## Module Structure
 *
 * - **`strike`**: strike marker codec
 * - **`classify`**: line classifier
 * - **`document`**: the owned line array
 * - **`surface`**: rendered surface model
 * - **`cursor`**: cursor mapper
 * - **`commands`**: structural edits compiled to new line arrays
 * - **`patch`**: edit results
 * - **`history`**: coalescing undo/redo
 * - **`slash`**: slash-command popup
 * - **`engine`**: the [`Editor`] tying it all together
 *
 * ## Usage Pattern
 *
 * ```rust
 * use std::rc::Rc;
 * use ezwrite_engine::editing::*;
 * use ezwrite_engine::timer::SystemClock;
 *
 * let mut editor = Editor::from_text("list\nbuy milk", Rc::new(SystemClock));
 * assert_eq!(editor.line_types(), &[LineType::ListHeader, LineType::ListItem]);
 *
 * editor.click_checkbox(1);
 * editor.handle_key(EditorKey::Enter);
 * editor.input_text("eggs");
 * assert_eq!(editor.line_types()[2], LineType::ListItem);
 * ```
 */

pub mod classify;
pub mod commands;
pub mod cursor;
pub mod document;
pub mod engine;
pub mod history;
pub mod patch;
pub mod slash;
pub mod strike;
pub mod surface;

pub use classify::{LineType, classify, classify_all};
pub use commands::{Cmd, Direction, Edit};
pub use cursor::{LogicalCursor, SurfacePoint, get_cursor, set_cursor};
pub use document::Document;
pub use engine::{Editor, EditorKey, EditorSettings, Motion};
pub use history::History;
pub use patch::{Patch, SyncPath};
pub use slash::{SLASH_COMMANDS, SlashCommand, SlashController, SlashKey, SlashOutcome, SlashPopup};
pub use surface::{Surface, SurfaceLine, SurfaceNode, TextSegment, extract_lines, render_surface};
