//! The editor: one owned state object tying the document, its rendered
//! surface, the cursor and the satellite state machines together.
//!
//! Every input goes through one of two explicit paths. The direct path
//! ([`Editor::sync_from_surface`]) applies a character edit to the surface
//! first, extracts the line array back out of it and only rebuilds when a
//! line changed type. The structural path ([`Editor::apply`]) compiles a
//! [`Cmd`] into a new line array and cursor target, then rebuilds the whole
//! surface from the model.

use std::cmp::Ordering;
use std::rc::Rc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::editing::classify::{self, LineType};
use crate::editing::commands::{Cmd, Direction, compile_command};
use crate::editing::cursor::{self, LogicalCursor, SurfacePoint, utf16_to_byte};
use crate::editing::document::Document;
use crate::editing::history::{DEFAULT_CAPACITY, DEFAULT_DEBOUNCE_MS, History};
use crate::editing::patch::{Patch, SyncPath};
use crate::editing::slash::{SlashController, SlashKey, SlashOutcome, SlashPopup};
use crate::editing::surface::{Surface, extract_lines, render_surface};
use crate::pages::{PAGE_COUNT, PageStore};
use crate::timer::{Clock, TimerBoard, TimerControl, TimerEvent, TimerId, TimerView};

/// Default time (ms) after the last edit during which the user counts as typing
pub const DEFAULT_TYPING_TIMEOUT_MS: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSettings {
    pub undo_debounce: TimeDelta,
    pub undo_capacity: usize,
    pub typing_timeout: TimeDelta,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            undo_debounce: TimeDelta::milliseconds(DEFAULT_DEBOUNCE_MS),
            undo_capacity: DEFAULT_CAPACITY,
            typing_timeout: TimeDelta::milliseconds(DEFAULT_TYPING_TIMEOUT_MS),
        }
    }
}

impl EditorSettings {
    pub fn from_millis(undo_debounce_ms: u64, undo_capacity: usize, typing_timeout_ms: u64) -> Self {
        let millis = |ms: u64| TimeDelta::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX));
        Self {
            undo_debounce: millis(undo_debounce_ms),
            undo_capacity,
            typing_timeout: millis(typing_timeout_ms),
        }
    }
}

/// Keys the editor understands, independent of any terminal or toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Escape,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    MoveLineUp,
    MoveLineDown,
    ToggleStrike,
    DeleteLine,
    Undo,
    Redo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

pub struct Editor {
    pages: PageStore,
    doc: Document,
    types: Vec<LineType>,
    surface: Surface,
    focus: SurfacePoint,
    history: History,
    slash: SlashController,
    /// Timer line whose directive is still being typed
    timer_edit: Option<usize>,
    /// List header or divider just completed by typing its keyword; it still
    /// takes characters until the cursor leaves it
    fresh_keyword: Option<usize>,
    /// Live timers, one board per page
    boards: Vec<TimerBoard>,
    clock: Rc<dyn Clock>,
    settings: EditorSettings,
    last_input: Option<DateTime<Utc>>,
    dirty: bool,
}

impl Editor {
    /// Open the active page of `pages` with the cursor at its end.
    pub fn new(pages: PageStore, clock: Rc<dyn Clock>, settings: EditorSettings) -> Self {
        let doc = Document::from_text(pages.active_text());
        let mut editor = Self {
            pages,
            doc,
            types: Vec::new(),
            surface: Surface::default(),
            focus: SurfacePoint::default(),
            history: History::new(settings.undo_debounce, settings.undo_capacity),
            slash: SlashController::default(),
            timer_edit: None,
            fresh_keyword: None,
            boards: (0..PAGE_COUNT).map(|_| TimerBoard::new()).collect(),
            clock,
            settings,
            last_input: None,
            dirty: false,
        };
        let end = editor.end_of_document();
        editor.rebuild(end);
        editor
    }

    /// A single-page editor holding `text`, with default settings.
    pub fn from_text(text: &str, clock: Rc<dyn Clock>) -> Self {
        let pages = PageStore::from_pages(vec![text.to_string()], 0);
        Self::new(pages, clock, EditorSettings::default())
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn text(&self) -> String {
        self.doc.text()
    }

    pub fn line_types(&self) -> &[LineType] {
        &self.types
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn focus(&self) -> SurfacePoint {
        self.focus
    }

    /// The logical cursor, recovered from the surface focus.
    pub fn cursor(&self) -> LogicalCursor {
        cursor::get_cursor(&self.surface, self.focus)
    }

    pub fn slash_popup(&self) -> Option<&SlashPopup> {
        self.slash.popup()
    }

    pub fn timer_edit_line(&self) -> Option<usize> {
        self.timer_edit
    }

    pub fn active_page(&self) -> usize {
        self.pages.active()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Every page's text, with the active page brought up to date.
    pub fn pages(&self) -> PageStore {
        let mut pages = self.pages.clone();
        pages.set_active_text(self.doc.text());
        pages
    }

    /// Whether anything changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// True while the last content change is more recent than the typing timeout.
    pub fn is_typing(&self) -> bool {
        self.last_input
            .is_some_and(|at| self.clock.now() - at < self.settings.typing_timeout)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn patch(&self, path: SyncPath, cursor: LogicalCursor) -> Patch {
        Patch {
            path,
            cursor,
            version: self.doc.version(),
        }
    }

    fn unchanged(&self) -> Patch {
        self.patch(SyncPath::Unchanged, self.cursor())
    }

    fn line_len(&self, line: usize) -> usize {
        self.surface.line(line).map(|l| l.text_len()).unwrap_or(0)
    }

    fn line_editable(&self, line: usize) -> bool {
        self.surface.line(line).is_some_and(|l| l.editable)
    }

    fn end_of_document(&self) -> LogicalCursor {
        let last = self.doc.len() - 1;
        LogicalCursor::new(last, cursor::utf16_len(self.doc.visible(last)))
    }

    /// Line types as the editing commands should see them: the line in
    /// timer-edit mode is ordinary text until finalised.
    fn effective_types(&self) -> Vec<LineType> {
        let mut types = self.types.clone();
        if let Some(line) = self.timer_edit
            && let Some(kind) = types.get_mut(line)
        {
            *kind = LineType::Text;
        }
        types
    }

    /// Replace the document's lines, recording the previous text in the
    /// undo history. Returns whether anything changed.
    fn record(&mut self, lines: Vec<String>, force: bool) -> bool {
        if lines.as_slice() == self.doc.lines() {
            return false;
        }
        let now = self.now();
        self.history.push(self.doc.text(), force, now);
        self.doc.replace_lines(lines);
        self.last_input = Some(now);
        self.dirty = true;
        true
    }

    /// Regenerate the surface from the document and place the cursor at
    /// `target`. A target past the last line lands at the start of the last
    /// line; an offset past the end of its line clamps to the line end.
    pub fn rebuild(&mut self, target: LogicalCursor) -> LogicalCursor {
        self.types = classify::classify_all(self.doc.lines());
        if self
            .timer_edit
            .is_some_and(|line| self.types.get(line) != Some(&LineType::Timer))
        {
            self.timer_edit = None;
        }
        self.surface = render_surface(self.doc.lines(), &self.types, self.timer_edit);

        let last = self.doc.len() - 1;
        let target = if target.line > last {
            LogicalCursor::new(last, 0)
        } else {
            target
        };
        self.focus = cursor::set_cursor(&self.surface, target);

        let now = self.now();
        let active = self.pages.active();
        self.boards[active].reconcile(self.doc.lines(), &self.types, self.timer_edit, now);

        let cursor = self.cursor();
        log::debug!(
            "rebuilt surface: {} lines, cursor {}:{}",
            self.surface.len(),
            cursor.line,
            cursor.offset
        );
        cursor
    }

    /// Direct path: the surface has already been edited in place and the
    /// focus now sits at `point`. Extract the lines, and keep the surface
    /// as it is unless some line changed type.
    pub fn sync_from_surface(&mut self, point: SurfacePoint) -> Patch {
        let cursor = cursor::get_cursor(&self.surface, point);
        let lines = extract_lines(&self.surface);

        if !self.record(lines, false) {
            self.focus = point;
            return self.patch(SyncPath::Unchanged, cursor);
        }

        let types = classify::classify_all(self.doc.lines());
        self.fresh_keyword = is_keyword_widget(types.get(cursor.line)).then_some(cursor.line);
        let previous_edit = self.timer_edit;
        // Typing a directive by hand enters timer-edit mode just like /timer
        if self.timer_edit.is_none()
            && types.get(cursor.line) == Some(&LineType::Timer)
            && self.types.get(cursor.line) != Some(&LineType::Timer)
        {
            self.timer_edit = Some(cursor.line);
        }

        let path = if types == self.types && self.timer_edit == previous_edit {
            self.focus = point;
            SyncPath::Direct
        } else {
            self.rebuild(cursor);
            SyncPath::Structural
        };

        let cursor = self.cursor();
        self.slash.refresh(cursor.line, self.doc.visible(cursor.line));
        self.patch(path, cursor)
    }

    /// Structural path: compute the new line array and cursor explicitly,
    /// then rebuild the surface from it.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let cursor = self.cursor();
        let types = self.effective_types();
        let Some(edit) = compile_command(self.doc.lines(), &types, cursor, &cmd) else {
            return self.patch(SyncPath::Unchanged, cursor);
        };

        if let Some(removed) = removed_line(&cmd, &types) {
            let active = self.pages.active();
            self.boards[active].forget_line(removed);
        }
        let line_delta = edit.lines.len() as isize - self.doc.len() as isize;
        self.record(edit.lines, true);
        self.timer_edit = match &cmd {
            Cmd::ApplySlash { line, command } if command.name == "timer" => Some(*line),
            _ => self
                .timer_edit
                .and_then(|line| follow_line(line, &cmd, &types, cursor, edit.cursor, line_delta)),
        };

        self.fresh_keyword = None;
        self.slash.close();
        let cursor = self.rebuild(edit.cursor);
        self.slash.refresh(cursor.line, self.doc.visible(cursor.line));
        self.patch(SyncPath::Structural, cursor)
    }

    pub fn handle_key(&mut self, key: EditorKey) -> Patch {
        if self.slash.is_open()
            && let Some(popup_key) = popup_key(key)
        {
            match self.slash.handle_key(popup_key) {
                SlashOutcome::Commit { line, command } => {
                    return self.apply(Cmd::ApplySlash { line, command });
                }
                SlashOutcome::Moved | SlashOutcome::Dismissed => return self.unchanged(),
                SlashOutcome::Ignored => {}
            }
        }

        let cursor = self.cursor();
        if let Some(line) = self.timer_edit
            && line == cursor.line
        {
            match key {
                EditorKey::Enter => return self.finalize_timer(line),
                EditorKey::Escape => return self.apply(Cmd::CancelTimer { line }),
                _ => {}
            }
        }

        match key {
            EditorKey::Char(c) => self.input_text(c.encode_utf8(&mut [0; 4])),
            EditorKey::Enter => self.apply(Cmd::SplitLine),
            EditorKey::Backspace => self.backspace(),
            EditorKey::Delete => self.delete_forward(),
            EditorKey::Tab => self.apply(Cmd::Indent { line: cursor.line }),
            EditorKey::BackTab => self.apply(Cmd::Unindent { line: cursor.line }),
            EditorKey::Escape => self.unchanged(),
            EditorKey::Left => self.move_cursor(Motion::Left),
            EditorKey::Right => self.move_cursor(Motion::Right),
            EditorKey::Up => self.move_cursor(Motion::Up),
            EditorKey::Down => self.move_cursor(Motion::Down),
            EditorKey::Home => self.move_cursor(Motion::LineStart),
            EditorKey::End => self.move_cursor(Motion::LineEnd),
            EditorKey::MoveLineUp => self.apply(Cmd::MoveLine {
                direction: Direction::Up,
            }),
            EditorKey::MoveLineDown => self.apply(Cmd::MoveLine {
                direction: Direction::Down,
            }),
            EditorKey::ToggleStrike => self.apply(Cmd::ToggleStrike { line: cursor.line }),
            EditorKey::DeleteLine => self.apply(Cmd::DeleteLine { line: cursor.line }),
            EditorKey::Undo => self.undo(),
            EditorKey::Redo => self.redo(),
        }
    }

    /// Type or paste `text` at the cursor. Single-line text on an editable
    /// line takes the direct path; anything else is structural.
    pub fn input_text(&mut self, text: &str) -> Patch {
        if text.is_empty() {
            return self.unchanged();
        }
        if text.contains(['\n', '\r']) {
            return self.apply(Cmd::InsertText {
                text: text.to_string(),
            });
        }
        match self.surface.insert_text(self.focus, text) {
            Some(point) => self.sync_from_surface(point),
            None if self.fresh_keyword == Some(self.cursor().line) => {
                self.edit_fresh_keyword(Some(text))
            }
            None => self.apply(Cmd::InsertText {
                text: text.to_string(),
            }),
        }
    }

    /// Keep typing on a keyword line completed a moment ago: more characters
    /// turn it back into text (`list` then `en` gives `listen`) and
    /// Backspace takes its last character off.
    fn edit_fresh_keyword(&mut self, insert: Option<&str>) -> Patch {
        let line = self.cursor().line;
        let mut lines = self.doc.lines().to_vec();
        let Some(raw) = lines.get_mut(line) else {
            return self.unchanged();
        };
        match insert {
            Some(text) => raw.push_str(text),
            None => {
                raw.pop();
            }
        }
        self.record(lines, false);

        let end = cursor::utf16_len(self.doc.visible(line));
        let cursor = self.rebuild(LogicalCursor::new(line, end));
        self.fresh_keyword = is_keyword_widget(self.types.get(line)).then_some(line);
        self.slash.refresh(cursor.line, self.doc.visible(cursor.line));
        self.patch(SyncPath::Structural, cursor)
    }

    pub fn backspace(&mut self) -> Patch {
        let cursor = self.cursor();
        if self.fresh_keyword == Some(cursor.line) {
            return self.edit_fresh_keyword(None);
        }
        if cursor.offset == 0 || !self.line_editable(cursor.line) {
            return self.apply(Cmd::MergeWithPrevious { line: cursor.line });
        }
        match self.surface.delete_backward(self.focus) {
            Some(point) => self.sync_from_surface(point),
            None => self.unchanged(),
        }
    }

    pub fn delete_forward(&mut self) -> Patch {
        let cursor = self.cursor();
        if cursor.offset >= self.line_len(cursor.line) || !self.line_editable(cursor.line) {
            return self.apply(Cmd::MergeWithNext { line: cursor.line });
        }
        match self.surface.delete_forward(self.focus) {
            Some(point) => self.sync_from_surface(point),
            None => self.unchanged(),
        }
    }

    pub fn move_cursor(&mut self, motion: Motion) -> Patch {
        let cursor = self.cursor();
        let last = self.doc.len() - 1;
        let target = match motion {
            Motion::Left if cursor.offset > 0 => {
                LogicalCursor::new(cursor.line, self.step(cursor, Motion::Left))
            }
            Motion::Left if cursor.line > 0 => {
                LogicalCursor::new(cursor.line - 1, self.line_len(cursor.line - 1))
            }
            Motion::Right if cursor.offset < self.line_len(cursor.line) => {
                LogicalCursor::new(cursor.line, self.step(cursor, Motion::Right))
            }
            Motion::Right if cursor.line < last => LogicalCursor::new(cursor.line + 1, 0),
            Motion::Left | Motion::Right => cursor,
            Motion::Up => LogicalCursor::new(cursor.line.saturating_sub(1), cursor.offset),
            Motion::Down => LogicalCursor::new((cursor.line + 1).min(last), cursor.offset),
            Motion::LineStart => LogicalCursor::new(cursor.line, 0),
            Motion::LineEnd => LogicalCursor::new(cursor.line, self.line_len(cursor.line)),
            Motion::DocumentStart => LogicalCursor::default(),
            Motion::DocumentEnd => self.end_of_document(),
        };
        self.move_to(target)
    }

    /// Offset one character left or right of `cursor`, stepping over
    /// surrogate pairs as a unit.
    fn step(&self, cursor: LogicalCursor, motion: Motion) -> usize {
        let text = self
            .surface
            .line(cursor.line)
            .map(|l| l.text())
            .unwrap_or_default();
        let byte = utf16_to_byte(&text, cursor.offset);
        match motion {
            Motion::Left => {
                let width = text[..byte].chars().next_back().map_or(0, char::len_utf16);
                cursor.offset.saturating_sub(width)
            }
            _ => {
                let width = text[byte..].chars().next().map_or(0, char::len_utf16);
                cursor.offset + width
            }
        }
    }

    /// Put the cursor at `target` (clamped). Leaving a line in timer-edit
    /// mode discards its unfinished directive.
    pub fn move_to(&mut self, target: LogicalCursor) -> Patch {
        let last = self.doc.len() - 1;
        if let Some(line) = self.timer_edit
            && line != target.line.min(last)
        {
            return self.cancel_timer_edit(line, target);
        }
        let cursor = cursor::clamp(&self.surface, target);
        if self.fresh_keyword != Some(cursor.line) {
            self.fresh_keyword = None;
        }
        self.focus = cursor::set_cursor(&self.surface, cursor);
        self.slash.cursor_moved(cursor.line);
        self.patch(SyncPath::Unchanged, cursor)
    }

    fn cancel_timer_edit(&mut self, line: usize, target: LogicalCursor) -> Patch {
        log::debug!("discarding unfinished timer directive on line {line}");
        let mut lines = self.doc.lines().to_vec();
        if let Some(text) = lines.get_mut(line) {
            text.clear();
        }
        self.timer_edit = None;
        self.fresh_keyword = None;
        self.record(lines, true);
        self.slash.close();
        let cursor = self.rebuild(target);
        self.patch(SyncPath::Structural, cursor)
    }

    /// Enter in timer-edit mode. A control token (`p`, `r`, `s`) below an
    /// existing timer operates that timer and clears the line; anything else
    /// becomes a live timer.
    fn finalize_timer(&mut self, line: usize) -> Patch {
        let args = classify::timer_args(self.doc.line(line).unwrap_or(""));
        if let Some(control) = TimerControl::from_token(&args) {
            let active = self.pages.active();
            if let Some(target) = self.boards[active].nearest_above(line) {
                let now = self.now();
                self.boards[active].control(target, control, now);
                return self.apply(Cmd::CancelTimer { line });
            }
        }
        self.apply(Cmd::FinalizeTimer { line })
    }

    pub fn undo(&mut self) -> Patch {
        match self.history.undo(self.doc.text()) {
            Some(previous) => self.restore(previous),
            None => self.unchanged(),
        }
    }

    pub fn redo(&mut self) -> Patch {
        match self.history.redo(self.doc.text()) {
            Some(next) => self.restore(next),
            None => self.unchanged(),
        }
    }

    /// Load a snapshot from the history, putting the cursor at the end of
    /// the first line that differs.
    fn restore(&mut self, text: String) -> Patch {
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let changed = first_difference(self.doc.lines(), &lines);
        self.doc.replace_lines(lines);
        self.timer_edit = None;
        self.fresh_keyword = None;
        self.slash.close();
        self.dirty = true;
        let cursor = self.rebuild(LogicalCursor::new(changed, usize::MAX));
        self.patch(SyncPath::Structural, cursor)
    }

    /// Switch to page `index`. Returns false when it is out of range or
    /// already active.
    pub fn switch_page(&mut self, index: usize) -> bool {
        if index >= PAGE_COUNT || index == self.pages.active() {
            return false;
        }
        if let Some(line) = self.timer_edit.take() {
            let mut lines = self.doc.lines().to_vec();
            if let Some(text) = lines.get_mut(line) {
                text.clear();
            }
            self.doc.replace_lines(lines);
        }

        let outgoing = self.doc.text();
        let Some(incoming) = self.pages.switch_to(index, outgoing) else {
            return false;
        };
        self.doc = Document::from_text(incoming);
        self.fresh_keyword = None;
        self.history.clear();
        self.slash.close();
        self.dirty = true;
        log::debug!("switched to page {}", index + 1);

        let end = self.end_of_document();
        self.rebuild(end);
        self.tick();
        true
    }

    /// Periodic timer re-sync for the active page.
    pub fn tick(&mut self) -> Vec<(TimerId, TimerEvent)> {
        let now = self.now();
        let active = self.pages.active();
        let events = self.boards[active].tick(now);
        for (id, event) in &events {
            log::info!("timer {}: {event:?}", id.0);
        }
        events
    }

    /// The host became visible again after possibly being suspended.
    pub fn on_visible(&mut self) -> Vec<(TimerId, TimerEvent)> {
        log::debug!("resyncing timers after becoming visible");
        self.tick()
    }

    pub fn timer_views(&self) -> Vec<TimerView> {
        self.boards[self.pages.active()].views(self.now())
    }

    /// Toggle, restart or stop the timer shown on `line`.
    pub fn control_timer(&mut self, line: usize, control: TimerControl) -> bool {
        let now = self.now();
        let active = self.pages.active();
        self.boards[active].control(line, control, now)
    }

    /// Pointer press on a list item's checkbox.
    pub fn click_checkbox(&mut self, line: usize) -> Patch {
        self.apply(Cmd::ToggleStrike { line })
    }

    /// Pointer press on the delete button of a list header or divider.
    pub fn click_delete(&mut self, line: usize) -> Patch {
        match self.types.get(line) {
            Some(LineType::ListHeader | LineType::Divider) => self.apply(Cmd::DeleteLine { line }),
            _ => self.unchanged(),
        }
    }

    /// Pointer selection of a slash popup entry.
    pub fn slash_pick(&mut self, index: usize) -> Patch {
        match self.slash.pick(index) {
            SlashOutcome::Commit { line, command } => self.apply(Cmd::ApplySlash { line, command }),
            _ => self.unchanged(),
        }
    }
}

fn popup_key(key: EditorKey) -> Option<SlashKey> {
    match key {
        EditorKey::Up => Some(SlashKey::Up),
        EditorKey::Down => Some(SlashKey::Down),
        EditorKey::Enter => Some(SlashKey::Enter),
        EditorKey::Escape => Some(SlashKey::Escape),
        EditorKey::Char(c) => c
            .to_digit(10)
            .and_then(|digit| u8::try_from(digit).ok())
            .map(SlashKey::Digit),
        _ => None,
    }
}

fn is_keyword_widget(kind: Option<&LineType>) -> bool {
    matches!(kind, Some(LineType::ListHeader | LineType::Divider))
}

/// Where the line at `line` ends up after `cmd`, or `None` when the command
/// removed or split it. `before` and `after` are the cursor around the edit
/// and `delta` is the change in line count.
fn follow_line(
    line: usize,
    cmd: &Cmd,
    types: &[LineType],
    before: LogicalCursor,
    after: LogicalCursor,
    delta: isize,
) -> Option<usize> {
    match cmd {
        Cmd::FinalizeTimer { .. } | Cmd::CancelTimer { .. } => None,
        Cmd::DeleteLine { .. } | Cmd::MergeWithPrevious { .. } | Cmd::MergeWithNext { .. } => {
            let removed = removed_line(cmd, types)?;
            match removed.cmp(&line) {
                Ordering::Equal => None,
                Ordering::Less => Some(line - 1),
                Ordering::Greater => Some(line),
            }
        }
        Cmd::MoveLine { .. } if before.line == line => Some(after.line),
        Cmd::MoveLine { .. } if after.line == line => Some(before.line),
        Cmd::SplitLine | Cmd::InsertText { .. } | Cmd::ApplySlash { .. }
            if before.line == line =>
        {
            (delta == 0 && after.line == line).then_some(line)
        }
        Cmd::SplitLine | Cmd::InsertText { .. } | Cmd::ApplySlash { .. } if before.line < line => {
            line.checked_add_signed(delta)
        }
        _ => Some(line),
    }
}

/// The line a delete or merge takes out of the document.
fn removed_line(cmd: &Cmd, types: &[LineType]) -> Option<usize> {
    let editable = |index: usize| types.get(index).is_some_and(|kind| kind.is_editable());
    match *cmd {
        Cmd::DeleteLine { line } => Some(line),
        // Backspace into a widget removes the widget, otherwise the line joins the one above
        Cmd::MergeWithPrevious { line } if editable(line) && line > 0 && !editable(line - 1) => {
            Some(line - 1)
        }
        Cmd::MergeWithPrevious { line } => Some(line),
        Cmd::MergeWithNext { line } if editable(line) => Some(line + 1),
        Cmd::MergeWithNext { line } => Some(line),
        _ => None,
    }
}

fn first_difference(before: &[String], after: &[String]) -> usize {
    before
        .iter()
        .zip(after)
        .position(|(a, b)| a != b)
        .unwrap_or(before.len().min(after.len()))
        .min(after.len().saturating_sub(1))
}
