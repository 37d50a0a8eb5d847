use std::rc::Rc;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use crate::editing::Editor;
use crate::timer::ManualClock;

/// Create a temporary data directory for a local store
pub fn create_test_store_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// A manual clock starting at a fixed instant
pub fn test_clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap())
}

/// An editor over `text` driven by a manual clock; the clock handle is
/// returned so tests can move time forward.
pub fn editor_with(text: &str) -> (Editor, ManualClock) {
    let clock = test_clock();
    let editor = Editor::from_text(text, Rc::new(clock.clone()));
    (editor, clock)
}
